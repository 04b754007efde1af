//! GitSurface over GitHub's git database API (no local working copy)

use sedy_core::{CommitterConfig, FileMode};
use sedy_github::{GithubClient, NewCommit, Signature, TreeEntry};

use crate::adapter::{GitSurface, GitSurfaceError, PushResult, Result};

/// Where the session stands on the checked out branch.
#[derive(Debug, Clone)]
struct Cursor {
    branch: String,
    /// Branch tip read at checkout.
    tip: String,
    /// Parent of the next commit: the last commit of this session, or `tip`.
    head: String,
}

/// GitHub-backed git surface
///
/// Each operation maps to REST round trips:
/// - checkout: read `refs/heads/<branch>`
/// - add_blob: create blob
/// - create_commit: read head commit, create tree on its tree, create commit
/// - push: update ref (non-forced)
pub struct GithubGitSurface {
    client: GithubClient,
    committer: Signature,
    cursor: Option<Cursor>,
    staged: Vec<TreeEntry>,
    /// Commits created in this session, oldest first.
    commits: Vec<String>,
    /// Last sha pushed in this session.
    pushed: Option<String>,
}

impl GithubGitSurface {
    pub fn new(client: GithubClient, committer: &CommitterConfig) -> Self {
        Self {
            client,
            committer: Signature {
                name: committer.name.clone(),
                email: committer.email.clone(),
            },
            cursor: None,
            staged: Vec::new(),
            commits: Vec::new(),
            pushed: None,
        }
    }

    fn cursor_for(&self, branch: &str) -> Result<&Cursor> {
        let cursor = self.cursor.as_ref().ok_or(GitSurfaceError::NotCheckedOut)?;
        if cursor.branch != branch {
            return Err(GitSurfaceError::BranchMismatch {
                requested: branch.to_string(),
                checked_out: cursor.branch.clone(),
            });
        }
        Ok(cursor)
    }
}

impl GitSurface for GithubGitSurface {
    fn checkout(&mut self, branch: &str) -> Result<String> {
        if let Some(cursor) = self.cursor.as_ref().filter(|c| c.branch == branch) {
            tracing::debug!(branch, head = %cursor.head, "already checked out, keeping cursor");
            return Ok(cursor.head.clone());
        }

        let tip = self.client.get_branch_sha(branch)?;
        tracing::info!(branch, tip = %tip, "checked out");
        self.cursor = Some(Cursor {
            branch: branch.to_string(),
            head: tip.clone(),
            tip: tip.clone(),
        });
        self.staged.clear();
        self.pushed = None;
        Ok(tip)
    }

    fn add_blob(&mut self, content: &str, mode: FileMode, path: &str) -> Result<()> {
        if self.cursor.is_none() {
            return Err(GitSurfaceError::NotCheckedOut);
        }

        let sha = self.client.create_blob(content)?;
        let path = path.trim_start_matches('/');
        tracing::debug!(path, blob = %sha, "staged blob");

        // Staging the same path twice keeps the latest blob only.
        self.staged.retain(|entry| entry.path != path);
        self.staged.push(TreeEntry::blob(path, mode, sha));
        Ok(())
    }

    fn create_commit(&mut self, branch: &str, message: &str) -> Result<String> {
        let parent = self.cursor_for(branch)?.head.clone();
        if self.staged.is_empty() {
            return Err(GitSurfaceError::NothingStaged);
        }

        let base = self.client.get_commit(&parent)?;
        let tree = self.client.create_tree(&base.tree_sha, &self.staged)?;
        let sha = self.client.create_commit(&NewCommit {
            message: message.to_string(),
            tree,
            parents: vec![parent.clone()],
            author: self.committer.clone(),
            committer: self.committer.clone(),
        })?;

        tracing::info!(branch, parent = %parent, commit = %sha, "created commit");
        self.staged.clear();
        self.commits.push(sha.clone());
        if let Some(cursor) = self.cursor.as_mut() {
            cursor.head = sha.clone();
        }
        Ok(sha)
    }

    fn push(&mut self, branch: &str, sha: &str) -> Result<PushResult> {
        let cursor = self.cursor_for(branch)?;
        if cursor.tip != sha && !self.commits.iter().any(|c| c == sha) {
            return Err(GitSurfaceError::UnknownCommit {
                sha: sha.to_string(),
            });
        }

        let unchanged = self.pushed.as_deref() == Some(sha)
            || (self.pushed.is_none() && cursor.tip == sha);
        if unchanged {
            tracing::debug!(branch, sha, "branch already at sha, nothing to push");
            return Ok(PushResult {
                branch: branch.to_string(),
                sha: sha.to_string(),
                updated: false,
            });
        }

        let now = self.client.update_branch(branch, sha, false)?;
        tracing::info!(branch, sha = %now, "pushed");
        self.pushed = Some(now.clone());
        Ok(PushResult {
            branch: branch.to_string(),
            sha: now,
            updated: true,
        })
    }
}
