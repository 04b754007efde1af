//! Dry-run surface: commits are simulated in memory, nothing is written

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use sedy_core::{ContentError, ContentSource, FileMode};
use serde::{Deserialize, Serialize};

use crate::adapter::{GitSurface, GitSurfaceError, PushResult, Result};

const SHA_PREFIX: &str = "dry-run-";

/// A commit that would have been created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DryRunCommit {
    pub sha: String,
    /// Previous dry-run sha, or the branch name for the first commit.
    pub parent: String,
    pub message: String,
    pub files: Vec<String>,
}

#[derive(Debug, Default)]
struct DryRunState {
    branch: Option<String>,
    head: Option<String>,
    staged: BTreeMap<String, String>,
    /// Full set of files changed since the branch tip, per simulated commit.
    snapshots: BTreeMap<String, BTreeMap<String, String>>,
    commits: Vec<DryRunCommit>,
    pushed: Option<String>,
}

/// Surface that simulates commits in memory
///
/// Selected with `sedy run --dry-run`. Shas are fabricated (`dry-run-1`,
/// `dry-run-2`, ...). Pair it with [`DryRunGitSurface::content`] so that later
/// fixes in the batch read the simulated content of earlier ones.
#[derive(Debug, Default, Clone)]
pub struct DryRunGitSurface {
    state: Rc<RefCell<DryRunState>>,
}

impl DryRunGitSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap `inner` so reads at simulated shas see simulated content.
    pub fn content<S: ContentSource>(&self, inner: S) -> DryRunContent<S> {
        DryRunContent {
            state: Rc::clone(&self.state),
            inner,
        }
    }

    /// Commits simulated so far, oldest first.
    pub fn commits(&self) -> Vec<DryRunCommit> {
        self.state.borrow().commits.clone()
    }
}

impl GitSurface for DryRunGitSurface {
    fn checkout(&mut self, branch: &str) -> Result<String> {
        let mut state = self.state.borrow_mut();
        if state.branch.as_deref() == Some(branch) {
            return Ok(state.head.clone().unwrap_or_else(|| branch.to_string()));
        }
        // The tip is never read; the branch name stands in for it.
        tracing::debug!(branch, "DryRunGitSurface: checkout");
        state.branch = Some(branch.to_string());
        state.head = Some(branch.to_string());
        state.staged.clear();
        state.pushed = None;
        Ok(branch.to_string())
    }

    fn add_blob(&mut self, content: &str, _mode: FileMode, path: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.branch.is_none() {
            return Err(GitSurfaceError::NotCheckedOut);
        }
        state
            .staged
            .insert(path.trim_start_matches('/').to_string(), content.to_string());
        Ok(())
    }

    fn create_commit(&mut self, branch: &str, message: &str) -> Result<String> {
        let mut state = self.state.borrow_mut();
        let checked_out = state.branch.clone().ok_or(GitSurfaceError::NotCheckedOut)?;
        if checked_out != branch {
            return Err(GitSurfaceError::BranchMismatch {
                requested: branch.to_string(),
                checked_out,
            });
        }
        if state.staged.is_empty() {
            return Err(GitSurfaceError::NothingStaged);
        }

        let parent = state.head.clone().unwrap_or(checked_out);
        let mut snapshot = state.snapshots.get(&parent).cloned().unwrap_or_default();
        let staged = std::mem::take(&mut state.staged);
        let files = staged.keys().cloned().collect();
        snapshot.extend(staged);

        let sha = format!("{SHA_PREFIX}{}", state.commits.len() + 1);
        tracing::info!(branch, commit = %sha, "DryRunGitSurface: commit (not created)\n{}", message);
        state.snapshots.insert(sha.clone(), snapshot);
        state.commits.push(DryRunCommit {
            sha: sha.clone(),
            parent,
            message: message.to_string(),
            files,
        });
        state.head = Some(sha.clone());
        Ok(sha)
    }

    fn push(&mut self, branch: &str, sha: &str) -> Result<PushResult> {
        let mut state = self.state.borrow_mut();
        if !state.commits.iter().any(|c| c.sha == sha) {
            return Err(GitSurfaceError::UnknownCommit {
                sha: sha.to_string(),
            });
        }
        let updated = state.pushed.as_deref() != Some(sha);
        tracing::info!(branch, sha, "DryRunGitSurface: push (not sent)");
        state.pushed = Some(sha.to_string());
        Ok(PushResult {
            branch: branch.to_string(),
            sha: sha.to_string(),
            updated,
        })
    }
}

/// Content source that overlays simulated commits on a real one.
pub struct DryRunContent<S> {
    state: Rc<RefCell<DryRunState>>,
    inner: S,
}

impl<S: ContentSource> ContentSource for DryRunContent<S> {
    fn fetch_file(&self, path: &str, git_ref: &str) -> std::result::Result<Option<String>, ContentError> {
        if !git_ref.starts_with(SHA_PREFIX) {
            return self.inner.fetch_file(path, git_ref);
        }

        let (simulated, branch) = {
            let state = self.state.borrow();
            let simulated = state
                .snapshots
                .get(git_ref)
                .and_then(|files| files.get(path.trim_start_matches('/')).cloned());
            (simulated, state.branch.clone())
        };
        match (simulated, branch) {
            (Some(content), _) => Ok(Some(content)),
            (None, Some(branch)) => self.inner.fetch_file(path, &branch),
            (None, None) => Err(ContentError::Read {
                path: path.to_string(),
                git_ref: git_ref.to_string(),
                reason: "no branch checked out".to_string(),
            }),
        }
    }
}
