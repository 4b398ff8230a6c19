//! Walks a branch's recursive tree at a given commit, filters and classifies
//! each blob, and bulk-indexes the result in fixed-size batches (spec §4.4).

use tracing::{error, info, warn};

use crate::config::ManagerConfig;
use crate::document::Document;
use crate::error::RagError;
use crate::git_provider::GitProvider;
use crate::language::classify;
use crate::path_filter::ignored;
use crate::rag_client::RagBackend;

/// Seeds `index` from the tree reachable at `commit_sha`, in batches of
/// `config.seed_batch_size`. Every flush but the last is best-effort: a
/// failure there is logged and the batch is dropped. The final flush is
/// fatal (spec §4.4, §7 `BackendTransient`/`BackendFatal`).
pub async fn seed_index(
    backend: &dyn RagBackend,
    provider: &dyn GitProvider,
    index: &str,
    commit_sha: &str,
    config: &ManagerConfig,
) -> Result<usize, RagError> {
    let tree = provider.get_git_tree(commit_sha).await?;
    let mut batch: Vec<Document> = Vec::with_capacity(config.seed_batch_size);
    let mut indexed = 0usize;

    for entry in tree {
        if ignored(&entry.path, &config.ignore_directories) {
            continue;
        }
        let language = match classify(&entry.path) {
            Some(language) if config.is_allowed_language(language) => Some(language),
            _ => continue,
        };

        let content = match provider.get_git_blob(&entry.blob_sha).await {
            Ok(Some(content)) => content,
            Ok(None) => {
                warn!(path = %entry.path, "blob is not decodable as utf-8, skipping");
                continue;
            }
            Err(err) => {
                warn!(path = %entry.path, error = %err, "failed to fetch blob, skipping");
                continue;
            }
        };

        batch.push(Document::new(entry.path.clone(), content, language));

        if batch.len() >= config.seed_batch_size {
            match backend.index_documents(index, &batch).await {
                Ok(()) => indexed += batch.len(),
                Err(err) => error!(index, error = %err, "batch flush failed during seeding, dropping batch"),
            }
            batch.clear();
        }
    }

    if !batch.is_empty() {
        let flushed = batch.len();
        backend.index_documents(index, &batch).await.map_err(|err| {
            error!(index, error = %err, "final seed flush failed");
            err
        })?;
        indexed += flushed;
    }

    info!(index, documents = indexed, "seeded index from tree walk");
    Ok(indexed)
}
