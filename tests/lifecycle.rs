//! End-to-end scenarios against the public API, mirroring the literal
//! fixtures used to validate the lifecycle coordinator.

use std::sync::Arc;

use rag_index_manager::config::ManagerConfig;
use rag_index_manager::document::{Document, Metadata};
use rag_index_manager::git_provider::{EditType, FileChange};
use rag_index_manager::language::Language;
use rag_index_manager::mock::{InMemoryGitProvider, InMemoryRagBackend, SingleGitProviderResolver};
use rag_index_manager::naming::index_name;
use rag_index_manager::{LifecycleCoordinator, Outcome, RagError};

fn python_only_config() -> ManagerConfig {
    let mut config = ManagerConfig::default();
    config.allowed_languages = [Language::Python].into_iter().collect();
    config
}

fn build(
    provider: InMemoryGitProvider,
    backend: InMemoryRagBackend,
    config: ManagerConfig,
) -> LifecycleCoordinator {
    let resolver = Arc::new(SingleGitProviderResolver::new(Arc::new(provider)));
    LifecycleCoordinator::new(resolver, Arc::new(backend), config)
}

#[tokio::test]
async fn full_lifecycle_seed_open_query_close() {
    // A repo slug not reused by any other test in this crate: cloning goes
    // through a deterministic `<tempRoot>/<base>` snapshot path (spec §4.5),
    // so two unrelated tests cloning a same-named base concurrently would
    // race on that file.
    let provider = InMemoryGitProvider::new("octocat/hello-world", "feature/test", "main")
        .with_default_branch_commit("sha-main")
        .with_blob("test_file.py", "sha1", "print('hello world')");
    let backend = InMemoryRagBackend::new();
    let backend_mirror = backend.clone();
    let coordinator = build(provider, backend, python_only_config());

    let pr_url = "https://example.invalid/octocat/hello-world/pull/1";

    assert_eq!(
        coordinator.create_base_branch_index(pr_url).await.unwrap(),
        Outcome::Created
    );
    assert_eq!(coordinator.create_new_pr_index(pr_url).await.unwrap(), Outcome::Created);

    let response = coordinator
        .query(pr_url, "what does this repo do?", 0.0, 2500, 5)
        .await
        .expect("query should succeed against an existing head index");
    assert!(response.response.contains("what does this repo do?"));

    assert_eq!(coordinator.delete_pr_index(pr_url).await.unwrap(), Outcome::Deleted);

    let err = coordinator.query(pr_url, "anything", 0.0, 2500, 5).await.unwrap_err();
    assert!(matches!(err, RagError::IndexMissing(_)));

    let base = index_name("octocat/hello-world", "main");
    assert_eq!(backend_mirror.documents(&base).await.len(), 1);
}

#[tokio::test]
async fn rename_scenario_probes_old_name_and_writes_new_name() {
    let provider = InMemoryGitProvider::new("owner/repo", "feature/rename", "main").with_diff_files(vec![
        FileChange {
            filename: "new.py".to_string(),
            old_filename: Some("old.py".to_string()),
            edit_type: EditType::Renamed,
            head_file: Some("print('renamed content')".to_string()),
        },
    ]);
    let backend = InMemoryRagBackend::new();
    let head = index_name("owner/repo", "feature/rename");
    backend.ensure_index(&head).await;
    backend
        .seed_document(
            &head,
            Document {
                doc_id: Some("doc-old".into()),
                text: "print('old content')".into(),
                metadata: Metadata {
                    file_name: "old.py".into(),
                    language: Some(Language::Python),
                    split_type: Some(rag_index_manager::document::SplitType::Code),
                },
            },
        )
        .await;
    let backend_mirror = backend.clone();

    let coordinator = build(provider, backend, python_only_config());
    let outcome = coordinator
        .update_pr_index("https://example.invalid/owner/repo/pull/2")
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Updated);
    let probes = backend_mirror.list_documents_calls(&head).await;
    assert_eq!(probes, vec!["old.py".to_string()]);

    let docs = backend_mirror.documents(&head).await;
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].metadata.file_name, "new.py");
    assert_eq!(docs[0].text, "print('renamed content')");
}

#[tokio::test]
async fn replaying_a_synchronize_event_converges_on_the_same_document() {
    // A PR synchronize event reports the already-indexed file as MODIFIED
    // (not ADDED) on every subsequent push, so replaying it twice must
    // converge to the same single document rather than create a duplicate
    // (spec §8 invariant 2).
    let diff = vec![FileChange {
        filename: "changed.py".to_string(),
        old_filename: None,
        edit_type: EditType::Modified,
        head_file: Some("print('same content')".to_string()),
    }];
    let provider = InMemoryGitProvider::new("owner/repo", "feature/idem", "main").with_diff_files(diff);
    let backend = InMemoryRagBackend::new();
    let head = index_name("owner/repo", "feature/idem");
    backend.ensure_index(&head).await;
    backend
        .seed_document(
            &head,
            Document {
                doc_id: Some("doc-changed".into()),
                text: "print('previous content')".into(),
                metadata: Metadata {
                    file_name: "changed.py".into(),
                    language: Some(Language::Python),
                    split_type: Some(rag_index_manager::document::SplitType::Code),
                },
            },
        )
        .await;
    let backend_mirror = backend.clone();

    let coordinator = build(provider, backend, python_only_config());
    let pr_url = "https://example.invalid/owner/repo/pull/3";

    coordinator.update_pr_index(pr_url).await.unwrap();
    let after_first = backend_mirror.documents(&head).await;
    assert_eq!(after_first.len(), 1);
    assert_eq!(after_first[0].text, "print('same content')");

    coordinator.update_pr_index(pr_url).await.unwrap();
    let after_second = backend_mirror.documents(&head).await;
    assert_eq!(
        after_second.len(),
        1,
        "replaying the same synchronize event must not create a duplicate document"
    );
    assert_eq!(after_second[0].doc_id, after_first[0].doc_id);
    assert_eq!(after_second[0].text, "print('same content')");
}

#[tokio::test]
async fn policy_block_is_a_success_noop_with_no_backend_calls() {
    let provider = InMemoryGitProvider::new("owner/repo", "feature/blocked", "release");
    let backend = InMemoryRagBackend::new();
    let backend_mirror = backend.clone();
    let coordinator = build(provider, backend, python_only_config());

    let outcome = coordinator
        .create_new_pr_index("https://example.invalid/owner/repo/pull/4")
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::PolicyBlocked);
    assert!(backend_mirror.calls().await.is_empty());
}

#[tokio::test]
async fn delete_is_not_gated_by_policy() {
    let provider = InMemoryGitProvider::new("owner/repo", "feature/unpoliced", "release");
    let backend = InMemoryRagBackend::new();
    let head = index_name("owner/repo", "feature/unpoliced");
    backend.ensure_index(&head).await;
    let backend_mirror = backend.clone();
    let coordinator = build(provider, backend, python_only_config());

    let outcome = coordinator
        .delete_pr_index("https://example.invalid/owner/repo/pull/5")
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Deleted);
    assert!(backend_mirror.documents(&head).await.is_empty());
}
