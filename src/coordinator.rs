//! Orchestrates the PR lifecycle operations, enforcing the enabled-base-
//! branch policy and serializing conflicting base-index work behind the
//! Manager Lock (spec §4.6, §5).

use std::sync::Arc;

use tracing::{info, warn};

use crate::cloner::clone_index;
use crate::config::ManagerConfig;
use crate::diff::{plan_diff, Plan};
use crate::error::RagError;
use crate::git_provider::GitProviderResolver;
use crate::naming::index_name;
use crate::rag_client::{QueryResponse, RagBackend};
use crate::seeder::seed_index;

/// Result of a lifecycle operation. `PolicyBlocked` and `NoOp` are both
/// success outcomes (spec §7: policy gate is *success-noop*, not an error).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Created,
    Updated,
    Deleted,
    PolicyBlocked,
    NoOp,
}

/// The single entry point of the core, holding the Manager Lock and policy
/// configuration. One instance serializes all base-index mutations across
/// every repository it manages (spec §5: "a single mutual-exclusion
/// primitive").
pub struct LifecycleCoordinator {
    resolver: Arc<dyn GitProviderResolver>,
    backend: Arc<dyn RagBackend>,
    config: ManagerConfig,
    /// The Manager Lock. Held for the full duration of a base-index mutation
    /// rather than acquired-and-immediately-released, so a waiting caller's
    /// post-acquire existence re-check (double-checked creation) actually
    /// observes the finished seed (spec §9: replaces the source's
    /// acquire-then-release barrier with a real one-shot wait).
    base_lock: tokio::sync::Mutex<()>,
}

impl LifecycleCoordinator {
    pub fn new(
        resolver: Arc<dyn GitProviderResolver>,
        backend: Arc<dyn RagBackend>,
        config: ManagerConfig,
    ) -> Self {
        Self {
            resolver,
            backend,
            config,
            base_lock: tokio::sync::Mutex::new(()),
        }
    }

    async fn index_exists(&self, index: &str) -> Result<bool, RagError> {
        Ok(self.backend.list_indexes().await?.iter().any(|name| name == index))
    }

    /// Resolve for a PR URL, targeting an enabled base branch or not. PR
    /// open/synchronize/merge events.
    pub async fn create_base_branch_index(&self, pr_url: &str) -> Result<Outcome, RagError> {
        let provider = self.resolver.resolve(pr_url).await?;
        if !self.config.is_enabled_base_branch(provider.pr_base_ref()) {
            info!(pr_url, base_ref = provider.pr_base_ref(), "base branch not enabled, skipping");
            return Ok(Outcome::PolicyBlocked);
        }

        let base = index_name(provider.repo_slug(), provider.pr_base_ref());
        let _guard = self.base_lock.lock().await;

        if self.index_exists(&base).await? {
            info!(index = %base, "base index already exists");
            return Ok(Outcome::NoOp);
        }

        let default_branch = provider.default_branch();
        let head = provider.get_branch(default_branch).await?;
        seed_index(self.backend.as_ref(), provider.as_ref(), &base, &head.commit_sha, &self.config).await?;
        info!(index = %base, "created base index from default branch tree");
        Ok(Outcome::Created)
    }

    /// For a PR that has just been merged into an enabled base branch.
    pub async fn update_base_branch_index(&self, pr_url: &str) -> Result<Outcome, RagError> {
        let provider = self.resolver.resolve(pr_url).await?;
        if !self.config.is_enabled_base_branch(provider.pr_base_ref()) {
            return Ok(Outcome::PolicyBlocked);
        }

        let base = index_name(provider.repo_slug(), provider.pr_base_ref());
        if !self.index_exists(&base).await? {
            return self.create_base_branch_index(pr_url).await;
        }

        let _guard = self.base_lock.lock().await;
        let changes = provider.get_diff_files().await?;
        let plan = plan_diff(self.backend.as_ref(), &base, &changes, &self.config).await?;
        if plan.is_empty() {
            info!(index = %base, "diff produced no changes, skipping apply");
            return Ok(Outcome::NoOp);
        }
        self.apply_plan(&base, &plan).await?;
        Ok(Outcome::Updated)
    }

    /// For PR open: clone the base index into a fresh head index, then apply
    /// the PR's diff on top so branch reuse cannot leave stale documents.
    pub async fn create_new_pr_index(&self, pr_url: &str) -> Result<Outcome, RagError> {
        let provider = self.resolver.resolve(pr_url).await?;
        if !self.config.is_enabled_base_branch(provider.pr_base_ref()) {
            return Ok(Outcome::PolicyBlocked);
        }

        let base = index_name(provider.repo_slug(), provider.pr_base_ref());
        let head = index_name(provider.repo_slug(), provider.pr_branch());

        if !self.index_exists(&base).await? {
            self.create_base_branch_index(pr_url).await?;
        }

        clone_index(self.backend.as_ref(), &base, &head).await?;
        self.update_pr_index(pr_url).await?;
        Ok(Outcome::Created)
    }

    /// Diff application against a head index. Runs lock-free: head indexes
    /// are scoped to one PR and not mutated by other events of the same PR
    /// in a well-formed webhook ordering (spec §5).
    pub async fn update_pr_index(&self, pr_url: &str) -> Result<Outcome, RagError> {
        let provider = self.resolver.resolve(pr_url).await?;
        if !self.config.is_enabled_base_branch(provider.pr_base_ref()) {
            return Ok(Outcome::PolicyBlocked);
        }

        let head = index_name(provider.repo_slug(), provider.pr_branch());
        if !self.index_exists(&head).await? {
            return self.create_new_pr_index(pr_url).await;
        }

        let changes = provider.get_diff_files().await?;
        let plan = plan_diff(self.backend.as_ref(), &head, &changes, &self.config).await?;
        if plan.is_empty() {
            info!(index = %head, "diff produced no changes, skipping apply");
            return Ok(Outcome::NoOp);
        }
        self.apply_plan(&head, &plan).await?;
        Ok(Outcome::Updated)
    }

    /// Unconditional cleanup: no policy gate, because a close event must
    /// always be able to remove an index that exists (spec §4.6).
    pub async fn delete_pr_index(&self, pr_url: &str) -> Result<Outcome, RagError> {
        let provider = self.resolver.resolve(pr_url).await?;
        let head = index_name(provider.repo_slug(), provider.pr_branch());

        if !self.index_exists(&head).await? {
            warn!(index = %head, "delete requested for an index that does not exist, skipping");
            return Ok(Outcome::NoOp);
        }

        self.backend.delete_index(&head).await?;
        Ok(Outcome::Deleted)
    }

    pub async fn query(
        &self,
        pr_url: &str,
        query: &str,
        temperature: f32,
        max_tokens: u32,
        top_k: u32,
    ) -> Result<QueryResponse, RagError> {
        let provider = self.resolver.resolve(pr_url).await?;
        let head = index_name(provider.repo_slug(), provider.pr_branch());

        if !self.index_exists(&head).await? {
            return Err(RagError::IndexMissing(head));
        }

        self.backend.query(&head, query, temperature, max_tokens, top_k).await
    }

    /// `delete → update → create`, each phase skipped entirely when its
    /// batch is empty (spec §4.3, §8 invariant 5).
    async fn apply_plan(&self, index: &str, plan: &Plan) -> Result<(), RagError> {
        if !plan.deletes.is_empty() {
            let ids: Vec<String> = plan.deletes.iter().filter_map(|doc| doc.doc_id.clone()).collect();
            self.backend.delete_documents(index, &ids).await?;
        }
        if !plan.updates.is_empty() {
            self.backend.update_documents(index, &plan.updates).await?;
        }
        if !plan.creates.is_empty() {
            self.backend.index_documents(index, &plan.creates).await?;
        }
        Ok(())
    }
}
