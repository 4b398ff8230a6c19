//! Layered configuration for the index manager: built-in defaults, then an
//! optional TOML file, then environment variable overrides. Following the
//! teacher's defaults-then-merge shape (see `config::merge`/`config::load` in
//! the upstream project this was grounded on), scaled down to the handful of
//! knobs this core actually exposes.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::error::RagError;
use crate::language::Language;

pub const DEFAULT_SEED_BATCH_SIZE: usize = 10;
pub const DEFAULT_QUERY_TOKEN_BUFFER: u32 = 2500;

#[derive(Debug, Clone)]
pub struct ManagerConfig {
    pub rag_backend_base_url: String,
    pub enabled_base_branches: HashSet<String>,
    pub ignore_directories: Vec<String>,
    pub allowed_languages: HashSet<Language>,
    pub query_token_buffer: u32,
    pub seed_batch_size: usize,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            rag_backend_base_url: String::new(),
            enabled_base_branches: ["main".to_string()].into_iter().collect(),
            ignore_directories: Vec::new(),
            allowed_languages: Language::all().iter().copied().collect(),
            query_token_buffer: DEFAULT_QUERY_TOKEN_BUFFER,
            seed_batch_size: DEFAULT_SEED_BATCH_SIZE,
        }
    }
}

impl ManagerConfig {
    pub fn is_enabled_base_branch(&self, branch: &str) -> bool {
        self.enabled_base_branches.contains(branch)
    }

    pub fn is_allowed_language(&self, language: Language) -> bool {
        self.allowed_languages.contains(&language)
    }

    /// Load defaults, merge an optional TOML file, then merge environment
    /// overrides (`RAG_INDEX_<FIELD>`).
    pub fn load(file_path: Option<&Path>) -> Result<Self, RagError> {
        let mut config = Self::default();

        if let Some(path) = file_path {
            let contents = std::fs::read_to_string(path)
                .map_err(|err| RagError::Config(format!("reading {}: {err}", path.display())))?;
            let layer: ConfigFileLayer = toml::from_str(&contents)
                .map_err(|err| RagError::Config(format!("parsing {}: {err}", path.display())))?;
            config.apply_layer(layer)?;
        }

        config.apply_env()?;
        Ok(config)
    }

    fn apply_layer(&mut self, layer: ConfigFileLayer) -> Result<(), RagError> {
        if let Some(url) = layer.rag_backend_base_url {
            self.rag_backend_base_url = url;
        }
        if let Some(branches) = layer.enabled_base_branches {
            self.enabled_base_branches = branches.into_iter().collect();
        }
        if let Some(dirs) = layer.ignore_directories {
            self.ignore_directories = dirs;
        }
        if let Some(languages) = layer.allowed_languages {
            self.allowed_languages = languages
                .iter()
                .map(|tag| {
                    Language::parse(tag)
                        .ok_or_else(|| RagError::Config(format!("unknown language `{tag}`")))
                })
                .collect::<Result<HashSet<_>, _>>()?;
        }
        if let Some(buffer) = layer.query_token_buffer {
            self.query_token_buffer = buffer;
        }
        if let Some(batch_size) = layer.seed_batch_size {
            self.seed_batch_size = batch_size;
        }
        Ok(())
    }

    fn apply_env(&mut self) -> Result<(), RagError> {
        if let Ok(url) = std::env::var("RAG_INDEX_BACKEND_URL") {
            self.rag_backend_base_url = url;
        }
        if let Ok(branches) = std::env::var("RAG_INDEX_ENABLED_BASE_BRANCHES") {
            self.enabled_base_branches = split_list(&branches).into_iter().collect();
        }
        if let Ok(dirs) = std::env::var("RAG_INDEX_IGNORE_DIRECTORIES") {
            self.ignore_directories = split_list(&dirs);
        }
        if let Ok(buffer) = std::env::var("RAG_INDEX_QUERY_TOKEN_BUFFER") {
            self.query_token_buffer = buffer
                .parse()
                .map_err(|_| RagError::Config(format!("invalid RAG_INDEX_QUERY_TOKEN_BUFFER `{buffer}`")))?;
        }
        Ok(())
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFileLayer {
    rag_backend_base_url: Option<String>,
    enabled_base_branches: Option<Vec<String>>,
    ignore_directories: Option<Vec<String>>,
    allowed_languages: Option<Vec<String>>,
    query_token_buffer: Option<u32>,
    seed_batch_size: Option<usize>,
}
