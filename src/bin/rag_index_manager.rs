//! Demo command-line harness: loads configuration, wires the coordinator up
//! against in-memory mock collaborators (no real git host or RAG backend is
//! part of the core, per spec §1), and drives one full PR lifecycle end to
//! end, printing document counts at each step.
//!
//! The command-line dispatcher itself is out of scope for the core (spec
//! §1); this binary exists only to exercise it, the way the source
//! project's `cli.py` wires tools together without being part of the engine.

use std::sync::Arc;

use clap::Parser;
use rag_index_manager::config::ManagerConfig;
use rag_index_manager::coordinator::LifecycleCoordinator;
use rag_index_manager::mock::{InMemoryGitProvider, InMemoryRagBackend, SingleGitProviderResolver};

#[derive(Debug, Parser)]
#[command(name = "rag-index-manager", about = "Drive a demo PR lifecycle against in-memory collaborators")]
struct Cli {
    /// Path to a TOML configuration file layered on top of the defaults.
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// Repository slug to simulate, e.g. "owner/repo".
    #[arg(long, default_value = "owner/repo")]
    repo: String,

    /// PR source branch.
    #[arg(long, default_value = "feature/demo")]
    branch: String,

    /// PR merge-target branch.
    #[arg(long, default_value = "main")]
    base: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = ManagerConfig::load(cli.config.as_deref())?;

    let backend = InMemoryRagBackend::new();
    let provider = Arc::new(
        InMemoryGitProvider::new(cli.repo.clone(), cli.branch.clone(), cli.base.clone())
            .with_default_branch_commit("demo-sha")
            .with_blob("README.md", "blob-readme", "# demo repository")
            .with_blob("src/main.py", "blob-main", "print('hello from the demo repo')"),
    );
    let resolver = Arc::new(SingleGitProviderResolver::new(provider));
    let query_token_buffer = config.query_token_buffer;
    let coordinator = LifecycleCoordinator::new(resolver, Arc::new(backend.clone()), config);

    let pr_url = format!("https://example.invalid/{}/pull/1", cli.repo);

    let outcome = coordinator.create_base_branch_index(&pr_url).await?;
    println!("create_base_branch_index -> {outcome:?}");

    let outcome = coordinator.create_new_pr_index(&pr_url).await?;
    println!("create_new_pr_index -> {outcome:?}");

    let outcome = coordinator.update_pr_index(&pr_url).await?;
    println!("update_pr_index -> {outcome:?}");

    let response = coordinator
        .query(&pr_url, "What does this repository do?", 0.0, query_token_buffer, 5)
        .await?;
    println!("query -> {}", response.response);

    let outcome = coordinator.delete_pr_index(&pr_url).await?;
    println!("delete_pr_index -> {outcome:?}");

    let base_index = rag_index_manager::naming::index_name(&cli.repo, &cli.base);
    let documents = backend.documents(&base_index).await;
    println!("base index `{base_index}` holds {} document(s)", documents.len());

    Ok(())
}
