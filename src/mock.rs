//! In-memory stand-ins for the two collaborator interfaces (`GitProvider`,
//! `RagBackend`), used by this crate's own tests and exported behind
//! `test-support` so the CLI harness (`src/bin/rag_index_manager.rs`) can
//! drive a full lifecycle without a live backend or git host.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::document::Document;
use crate::error::RagError;
use crate::git_provider::{BranchHead, FileChange, GitProvider, GitProviderResolver, TreeEntry};
use crate::rag_client::{ListDocumentsResponse, QueryResponse, RagBackend};

#[derive(Default)]
struct BackendState {
    indexes: HashMap<String, Vec<Document>>,
    next_doc_id: u64,
    calls: Vec<Call>,
}

#[derive(Debug, Clone)]
pub enum Call {
    ListIndexes,
    IndexDocuments { index: String, count: usize },
    ListDocuments { index: String, file_name: String },
    UpdateDocuments { index: String, count: usize },
    DeleteDocuments { index: String, count: usize },
    DeleteIndex { index: String },
    PersistIndex { index: String, path: String },
    LoadIndex { index: String, path: String, overwrite: bool },
    Query { index: String },
}

/// A `RagBackend` backed by an in-process map, with every call recorded so
/// tests can assert on call counts, order, and payloads the way the source
/// project's unit tests assert on a `MagicMock` (spec §8 end-to-end
/// scenarios).
#[derive(Clone, Default)]
pub struct InMemoryRagBackend {
    state: Arc<Mutex<BackendState>>,
}

impl InMemoryRagBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates `index` with no documents, as if it already existed on the
    /// backend (used to model a pre-existing base index in tests without
    /// going through `index_documents`).
    pub async fn ensure_index(&self, index: &str) {
        self.state.lock().indexes.entry(index.to_string()).or_default();
    }

    pub async fn seed_document(&self, index: &str, doc: Document) {
        self.state
            .lock()
            .indexes
            .entry(index.to_string())
            .or_default()
            .push(doc);
    }

    pub async fn documents(&self, index: &str) -> Vec<Document> {
        self.state
            .lock()
            .indexes
            .get(index)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    pub async fn call_count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.state.lock().calls.iter().filter(|c| predicate(c)).count()
    }

    pub async fn list_documents_calls(&self, index: &str) -> Vec<String> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::ListDocuments { index: i, file_name } if i == index => {
                    Some(file_name.clone())
                }
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl RagBackend for InMemoryRagBackend {
    async fn list_indexes(&self) -> Result<Vec<String>, RagError> {
        let mut state = self.state.lock();
        state.calls.push(Call::ListIndexes);
        let mut names: Vec<String> = state.indexes.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn index_documents(&self, index: &str, docs: &[Document]) -> Result<(), RagError> {
        let mut state = self.state.lock();
        state.calls.push(Call::IndexDocuments {
            index: index.to_string(),
            count: docs.len(),
        });
        let entry = state.indexes.entry(index.to_string()).or_default();
        for doc in docs {
            let mut doc = doc.clone();
            state.next_doc_id += 1;
            doc.doc_id = Some(format!("doc-{}", state.next_doc_id));
            entry.push(doc);
        }
        Ok(())
    }

    async fn list_documents(
        &self,
        index: &str,
        metadata_filter: &[(&str, &str)],
    ) -> Result<ListDocumentsResponse, RagError> {
        let file_name = metadata_filter
            .iter()
            .find(|(k, _)| *k == "file_name")
            .map(|(_, v)| v.to_string())
            .unwrap_or_default();

        let mut state = self.state.lock();
        state.calls.push(Call::ListDocuments {
            index: index.to_string(),
            file_name: file_name.clone(),
        });

        let documents = state
            .indexes
            .get(index)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| doc.metadata.file_name == file_name)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        Ok(ListDocumentsResponse { documents })
    }

    async fn update_documents(&self, index: &str, docs: &[Document]) -> Result<(), RagError> {
        let mut state = self.state.lock();
        state.calls.push(Call::UpdateDocuments {
            index: index.to_string(),
            count: docs.len(),
        });
        if let Some(existing) = state.indexes.get_mut(index) {
            for doc in docs {
                if let Some(slot) = existing.iter_mut().find(|d| d.doc_id == doc.doc_id) {
                    *slot = doc.clone();
                }
            }
        }
        Ok(())
    }

    async fn delete_documents(&self, index: &str, doc_ids: &[String]) -> Result<(), RagError> {
        let mut state = self.state.lock();
        state.calls.push(Call::DeleteDocuments {
            index: index.to_string(),
            count: doc_ids.len(),
        });
        if let Some(existing) = state.indexes.get_mut(index) {
            existing.retain(|doc| !doc.doc_id.as_ref().is_some_and(|id| doc_ids.contains(id)));
        }
        Ok(())
    }

    async fn delete_index(&self, index: &str) -> Result<(), RagError> {
        let mut state = self.state.lock();
        state.calls.push(Call::DeleteIndex {
            index: index.to_string(),
        });
        state.indexes.remove(index);
        Ok(())
    }

    async fn persist_index(&self, index: &str, path: &str) -> Result<(), RagError> {
        let docs = {
            let mut state = self.state.lock();
            state.calls.push(Call::PersistIndex {
                index: index.to_string(),
                path: path.to_string(),
            });
            state.indexes.get(index).cloned().unwrap_or_default()
        };
        let serialized = serde_json::to_vec(&docs).map_err(|err| RagError::BackendFatal(err.to_string()))?;
        std::fs::write(path, serialized)?;
        Ok(())
    }

    async fn load_index(&self, index: &str, path: &str, overwrite: bool) -> Result<(), RagError> {
        let bytes = std::fs::read(path)?;
        let docs: Vec<Document> =
            serde_json::from_slice(&bytes).map_err(|err| RagError::BackendFatal(err.to_string()))?;

        let mut state = self.state.lock();
        state.calls.push(Call::LoadIndex {
            index: index.to_string(),
            path: path.to_string(),
            overwrite,
        });
        if overwrite || !state.indexes.contains_key(index) {
            state.indexes.insert(index.to_string(), docs);
        }
        Ok(())
    }

    async fn query(
        &self,
        index: &str,
        query: &str,
        _temperature: f32,
        _max_tokens: u32,
        _top_k: u32,
    ) -> Result<QueryResponse, RagError> {
        let mut state = self.state.lock();
        state.calls.push(Call::Query {
            index: index.to_string(),
        });
        Ok(QueryResponse {
            response: format!("mock answer for `{query}` against {index}"),
            sources: Vec::new(),
        })
    }
}

/// A fixed, in-memory `GitProvider` for a single PR, mirroring the source
/// test suite's `mock_git_provider` fixture.
pub struct InMemoryGitProvider {
    pub repo_slug: String,
    pub pr_branch: String,
    pub pr_base_ref: String,
    pub default_branch: String,
    pub branches: HashMap<String, BranchHead>,
    pub tree: Vec<TreeEntry>,
    pub blobs: HashMap<String, Option<String>>,
    pub diff_files: Vec<FileChange>,
}

impl InMemoryGitProvider {
    pub fn new(repo_slug: impl Into<String>, pr_branch: impl Into<String>, pr_base_ref: impl Into<String>) -> Self {
        Self {
            repo_slug: repo_slug.into(),
            pr_branch: pr_branch.into(),
            pr_base_ref: pr_base_ref.into(),
            default_branch: "main".to_string(),
            branches: HashMap::new(),
            tree: Vec::new(),
            blobs: HashMap::new(),
            diff_files: Vec::new(),
        }
    }

    pub fn with_default_branch_commit(mut self, sha: impl Into<String>) -> Self {
        let sha = sha.into();
        let default = self.default_branch.clone();
        self.branches.insert(default, BranchHead { commit_sha: sha });
        self
    }

    pub fn with_blob(mut self, path: &str, sha: &str, content: &str) -> Self {
        self.tree.push(TreeEntry {
            path: path.to_string(),
            blob_sha: sha.to_string(),
        });
        self.blobs.insert(sha.to_string(), Some(content.to_string()));
        self
    }

    pub fn with_diff_files(mut self, files: Vec<FileChange>) -> Self {
        self.diff_files = files;
        self
    }
}

#[async_trait]
impl GitProvider for InMemoryGitProvider {
    fn repo_slug(&self) -> &str {
        &self.repo_slug
    }

    fn pr_branch(&self) -> &str {
        &self.pr_branch
    }

    fn pr_base_ref(&self) -> &str {
        &self.pr_base_ref
    }

    fn default_branch(&self) -> &str {
        &self.default_branch
    }

    async fn get_branch(&self, name: &str) -> Result<BranchHead, RagError> {
        self.branches
            .get(name)
            .cloned()
            .ok_or_else(|| RagError::ProviderUnavailable(format!("branch {name} not found")))
    }

    async fn get_git_tree(&self, _commit_sha: &str) -> Result<Vec<TreeEntry>, RagError> {
        Ok(self.tree.clone())
    }

    async fn get_git_blob(&self, blob_sha: &str) -> Result<Option<String>, RagError> {
        Ok(self.blobs.get(blob_sha).cloned().flatten())
    }

    async fn get_diff_files(&self) -> Result<Vec<FileChange>, RagError> {
        Ok(self.diff_files.clone())
    }
}

/// Resolves every PR URL to the same pre-built provider, for single-PR test
/// scenarios. A host serving many repositories would instead cache
/// providers per URL the way the source's `get_git_provider_with_context`
/// does.
pub struct SingleGitProviderResolver {
    provider: Arc<dyn GitProvider>,
}

impl SingleGitProviderResolver {
    pub fn new(provider: Arc<dyn GitProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl GitProviderResolver for SingleGitProviderResolver {
    async fn resolve(&self, _pr_url: &str) -> Result<Arc<dyn GitProvider>, RagError> {
        Ok(self.provider.clone())
    }
}
