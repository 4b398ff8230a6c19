//! Collaborator interface for the Git hosting adapter. Concrete
//! implementations (GitHub, GitLab, Bitbucket, ...) live outside the core;
//! the manager only ever sees this trait. A `GitProviderResolver` maps a PR
//! URL to a provider instance, mirroring the source's
//! `get_git_provider_with_context(pr_url)` lookup-or-construct call.

use async_trait::async_trait;

use crate::error::RagError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditType {
    Added,
    Modified,
    Deleted,
    Renamed,
    /// Any edit kind the adapter reports that this core doesn't recognize.
    /// The diff planner logs and skips these (spec §4.3, §7 `UnknownEditType`).
    Unknown,
}

/// One entry of a PR's file diff.
#[derive(Debug, Clone)]
pub struct FileChange {
    pub filename: String,
    pub old_filename: Option<String>,
    pub edit_type: EditType,
    /// Content of the file at the PR head, if the adapter can provide it.
    /// Absent for `Deleted`.
    pub head_file: Option<String>,
}

/// One `blob` entry of a recursive tree walk.
#[derive(Debug, Clone)]
pub struct TreeEntry {
    pub path: String,
    pub blob_sha: String,
}

/// A resolved branch: the tip commit sha the seeder should walk.
#[derive(Debug, Clone)]
pub struct BranchHead {
    pub commit_sha: String,
}

#[async_trait]
pub trait GitProvider: Send + Sync {
    fn repo_slug(&self) -> &str;
    fn pr_branch(&self) -> &str;
    fn pr_base_ref(&self) -> &str;
    fn default_branch(&self) -> &str;

    async fn get_branch(&self, name: &str) -> Result<BranchHead, RagError>;
    async fn get_git_tree(&self, commit_sha: &str) -> Result<Vec<TreeEntry>, RagError>;
    /// Returns the blob's content, already base64-decoded to UTF-8 text, or
    /// `None` if the blob is not decodable (spec §4.4 `DecodeFailure`).
    async fn get_git_blob(&self, blob_sha: &str) -> Result<Option<String>, RagError>;
    async fn get_diff_files(&self) -> Result<Vec<FileChange>, RagError>;
}

/// Maps a PR URL to a `GitProvider` instance.
#[async_trait]
pub trait GitProviderResolver: Send + Sync {
    async fn resolve(&self, pr_url: &str) -> Result<std::sync::Arc<dyn GitProvider>, RagError>;
}
