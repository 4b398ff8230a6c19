//! Duplicates an existing base index into a new PR-head index by
//! persist-then-load-with-overwrite (spec §4.5).

use tracing::info;

use crate::error::RagError;
use crate::rag_client::RagBackend;

/// Clones `base` into `head` via a temporary snapshot file. Any failure of
/// either step aborts the clone; the snapshot is left for the host's temp
/// directory to recycle (spec §4.5, §9 temp-path cleanup note).
pub async fn clone_index(backend: &dyn RagBackend, base: &str, head: &str) -> Result<(), RagError> {
    let snapshot_dir = std::env::temp_dir();
    let snapshot_path = snapshot_dir.join(base);
    let snapshot_path = snapshot_path
        .to_str()
        .ok_or_else(|| RagError::BackendFatal(format!("non-utf8 snapshot path for index {base}")))?;

    backend.persist_index(base, snapshot_path).await?;
    backend.load_index(head, snapshot_path, true).await?;

    info!(base, head, "cloned base index into head index");
    Ok(())
}
