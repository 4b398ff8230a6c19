//! Translates a PR's file diff into three disjoint document batches
//! (creates, updates, deletes) against a target index. Pure with respect to
//! its inputs except for the existence-probe calls to the RAG backend.

use std::collections::HashMap;

use tracing::{info, warn};

use crate::config::ManagerConfig;
use crate::document::Document;
use crate::git_provider::{EditType, FileChange};
use crate::language::classify;
use crate::path_filter::ignored;
use crate::rag_client::RagBackend;
use crate::error::RagError;

#[derive(Debug, Default, Clone)]
pub struct Plan {
    pub creates: Vec<Document>,
    pub updates: Vec<Document>,
    pub deletes: Vec<Document>,
}

impl Plan {
    pub fn is_empty(&self) -> bool {
        self.creates.is_empty() && self.updates.is_empty() && self.deletes.is_empty()
    }
}

/// Runs the filter, existence-probe, and plan passes described in spec §4.3.
pub async fn plan_diff(
    backend: &dyn RagBackend,
    index: &str,
    changes: &[FileChange],
    config: &ManagerConfig,
) -> Result<Plan, RagError> {
    let candidates: Vec<&FileChange> = changes
        .iter()
        .filter(|change| {
            if ignored(&change.filename, &config.ignore_directories) {
                info!(file = %change.filename, "skipping file in ignored directory");
                return false;
            }
            match classify(&change.filename) {
                Some(language) if config.is_allowed_language(language) => true,
                _ => {
                    info!(file = %change.filename, "skipping file not in a valid language");
                    false
                }
            }
        })
        .collect();

    let mut existing: HashMap<String, Document> = HashMap::new();
    for change in &candidates {
        let key = probe_key(change);
        let response = backend
            .list_documents(index, &[("file_name", key.as_str())])
            .await?;
        if let Some(doc) = response.documents.into_iter().next() {
            existing.insert(key, doc);
        }
    }

    let mut plan = Plan::default();
    for change in candidates {
        let key = probe_key(change);
        let current = existing.get(&key).cloned();

        if current.is_none() && change.edit_type == EditType::Deleted {
            info!(file = %change.filename, "skipping deleted file with no existing index document");
            continue;
        }

        if change.edit_type == EditType::Added || current.is_none() {
            let language = classify(&change.filename);
            let doc = Document::new(
                change.filename.clone(),
                change.head_file.clone().unwrap_or_default(),
                language,
            );
            plan.creates.push(doc);
            continue;
        }

        // `current` is `Some` from here on (the preceding branch caught the
        // absent case for every edit type, ADDED included).
        let doc = current.expect("checked above");
        match change.edit_type {
            EditType::Deleted => plan.deletes.push(doc),
            EditType::Modified => {
                let mut doc = doc;
                doc.text = change.head_file.clone().unwrap_or_default();
                plan.updates.push(doc);
            }
            EditType::Renamed => {
                let mut doc = doc;
                doc.text = change.head_file.clone().unwrap_or_default();
                doc.metadata.file_name = change.filename.clone();
                plan.updates.push(doc);
            }
            EditType::Added => unreachable!("ADDED always takes the create branch above"),
            EditType::Unknown => {
                warn!(file = %change.filename, "unknown edit type for file, skipping");
            }
        }
    }

    Ok(plan)
}

/// The existence-probe lookup key: a RENAMED file with an old name probes
/// under that old name; everything else probes under its current filename.
fn probe_key(change: &FileChange) -> String {
    if change.edit_type == EditType::Renamed {
        if let Some(old) = &change.old_filename {
            return old.clone();
        }
    }
    change.filename.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Metadata;
    use crate::mock::InMemoryRagBackend;

    fn change(filename: &str, edit_type: EditType, head: &str) -> FileChange {
        FileChange {
            filename: filename.to_string(),
            old_filename: None,
            edit_type,
            head_file: Some(head.to_string()),
        }
    }

    #[tokio::test]
    async fn added_file_with_no_prior_doc_is_a_create() {
        let backend = InMemoryRagBackend::new();
        backend.ensure_index("owner_repo_main").await;
        let config = ManagerConfig::default();

        let plan = plan_diff(
            &backend,
            "owner_repo_main",
            &[change("added.py", EditType::Added, "print('added')")],
            &config,
        )
        .await
        .expect("plan");

        assert_eq!(plan.creates.len(), 1);
        assert!(plan.updates.is_empty());
        assert!(plan.deletes.is_empty());
        assert_eq!(plan.creates[0].metadata.file_name, "added.py");
        assert_eq!(plan.creates[0].text, "print('added')");
    }

    #[tokio::test]
    async fn modified_file_with_prior_doc_is_an_update() {
        let backend = InMemoryRagBackend::new();
        backend.ensure_index("owner_repo_main").await;
        backend
            .seed_document(
                "owner_repo_main",
                Document {
                    doc_id: Some("doc1".into()),
                    text: "print('old')".into(),
                    metadata: Metadata {
                        file_name: "mod.py".into(),
                        language: None,
                        split_type: None,
                    },
                },
            )
            .await;
        let config = ManagerConfig::default();

        let plan = plan_diff(
            &backend,
            "owner_repo_main",
            &[change("mod.py", EditType::Modified, "print('new')")],
            &config,
        )
        .await
        .expect("plan");

        assert!(plan.creates.is_empty());
        assert_eq!(plan.updates.len(), 1);
        assert_eq!(plan.updates[0].doc_id.as_deref(), Some("doc1"));
        assert_eq!(plan.updates[0].text, "print('new')");
    }

    #[tokio::test]
    async fn deleted_file_with_no_prior_doc_is_skipped() {
        let backend = InMemoryRagBackend::new();
        backend.ensure_index("owner_repo_main").await;
        let config = ManagerConfig::default();

        let plan = plan_diff(
            &backend,
            "owner_repo_main",
            &[change("del.py", EditType::Deleted, "")],
            &config,
        )
        .await
        .expect("plan");

        assert!(plan.is_empty());
    }

    #[tokio::test]
    async fn rename_probes_old_name_and_updates_new_name() {
        let backend = InMemoryRagBackend::new();
        backend.ensure_index("owner_repo_main").await;
        backend
            .seed_document(
                "owner_repo_main",
                Document {
                    doc_id: Some("doc1".into()),
                    text: "print('old')".into(),
                    metadata: Metadata {
                        file_name: "old.py".into(),
                        language: None,
                        split_type: None,
                    },
                },
            )
            .await;
        let config = ManagerConfig::default();

        let file = FileChange {
            filename: "new.py".to_string(),
            old_filename: Some("old.py".to_string()),
            edit_type: EditType::Renamed,
            head_file: Some("print('renamed')".to_string()),
        };

        let plan = plan_diff(&backend, "owner_repo_main", &[file], &config)
            .await
            .expect("plan");

        assert_eq!(plan.updates.len(), 1);
        assert_eq!(plan.updates[0].metadata.file_name, "new.py");
        assert_eq!(plan.updates[0].text, "print('renamed')");

        let probes = backend.list_documents_calls("owner_repo_main").await;
        assert_eq!(probes, vec!["old.py".to_string()]);
    }

    #[tokio::test]
    async fn ignored_directory_takes_precedence_over_language() {
        let backend = InMemoryRagBackend::new();
        backend.ensure_index("owner_repo_main").await;
        let mut config = ManagerConfig::default();
        config.ignore_directories = vec!["vendor".to_string()];

        let plan = plan_diff(
            &backend,
            "owner_repo_main",
            &[change("vendor/mod.py", EditType::Added, "print('v')")],
            &config,
        )
        .await
        .expect("plan");

        assert!(plan.is_empty());
    }

    #[tokio::test]
    async fn disallowed_language_is_filtered() {
        let backend = InMemoryRagBackend::new();
        backend.ensure_index("owner_repo_main").await;
        let mut config = ManagerConfig::default();
        config.allowed_languages = [crate::language::Language::Python].into_iter().collect();

        let plan = plan_diff(
            &backend,
            "owner_repo_main",
            &[change("main.rs", EditType::Added, "fn main() {}")],
            &config,
        )
        .await
        .expect("plan");

        assert!(plan.is_empty());
    }
}
