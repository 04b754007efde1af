//! Core GitSurface trait and result types

use sedy_core::FileMode;
use sedy_github::GithubError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during git surface operations
#[derive(Debug, Error)]
pub enum GitSurfaceError {
    #[error("no branch checked out")]
    NotCheckedOut,

    #[error("branch '{requested}' is not the checked out branch '{checked_out}'")]
    BranchMismatch {
        requested: String,
        checked_out: String,
    },

    #[error("nothing staged to commit")]
    NothingStaged,

    #[error("commit {sha} was not produced in this session")]
    UnknownCommit { sha: String },

    #[error("GitHub operation failed: {0}")]
    Github(#[from] GithubError),
}

pub type Result<T> = std::result::Result<T, GitSurfaceError>;

/// Result of a push operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushResult {
    /// Branch that was updated
    pub branch: String,

    /// Sha the branch now points to
    pub sha: String,

    /// False when the branch already pointed to `sha` and nothing was sent
    pub updated: bool,
}

/// Branch-scoped git operations backed by a remote
///
/// Implementations keep a session cursor: the head the next commit is built
/// on. It starts at the branch tip on `checkout` and advances with every
/// `create_commit`, so consecutive commits chain on each other even though
/// nothing is pushed until the end of the batch.
pub trait GitSurface {
    /// Select the branch to commit on, returning the cursor
    ///
    /// Checking out the branch that is already checked out keeps the cursor
    /// where it is; switching branches resets it to the new branch tip.
    /// Content read at the returned ref is exactly what the next commit
    /// builds on.
    fn checkout(&mut self, branch: &str) -> Result<String>;

    /// Stage `content` at `path` for the next commit
    fn add_blob(&mut self, content: &str, mode: FileMode, path: &str) -> Result<()>;

    /// Commit the staged blobs on top of the cursor, returning the new sha
    fn create_commit(&mut self, branch: &str, message: &str) -> Result<String>;

    /// Point the remote branch at `sha`
    ///
    /// Pushing the sha the branch already points to is a no-op.
    fn push(&mut self, branch: &str, sha: &str) -> Result<PushResult>;
}
