// testing.rs - Recording doubles shared by the unit tests of this crate.

use std::cell::RefCell;
use std::collections::VecDeque;

use chrono::Utc;
use sedy_core::{FileMode, FixRequest, PullRequestRef, ResolvedFix, ReviewComment};
use sedy_fixer::{FixerError, Resolver};
use sedy_policy::Safeguard;
use sedy_submit::{GitSurface, GitSurfaceError, PushResult};

pub fn pull_request() -> PullRequestRef {
    PullRequestRef {
        number: 1,
        branch_ref: "branch-name".into(),
        url: "https://github.com/marmelab/sedy/pull/1".into(),
    }
}

pub fn comment(position: Option<u64>) -> ReviewComment {
    ReviewComment {
        id: 42,
        author: "username".into(),
        created_at: Utc::now(),
        url: "http://perdu.com".into(),
        file_path: "folder/to/blob.txt".into(),
        position,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitCall {
    Checkout(String),
    AddBlob {
        content: String,
        mode: FileMode,
        path: String,
    },
    Commit {
        branch: String,
        message: String,
    },
    Push {
        branch: String,
        sha: String,
    },
}

/// Records every call; the branch tip is `tip-sha` and commits are numbered
/// `commit-sha-1`, `commit-sha-2`...
#[derive(Debug, Default)]
pub struct RecordingGit {
    pub calls: Vec<GitCall>,
    fail_commit: bool,
    commits: usize,
}

impl RecordingGit {
    /// A surface whose `create_commit` always fails.
    pub fn failing() -> Self {
        Self {
            fail_commit: true,
            ..Self::default()
        }
    }

    fn head(&self) -> String {
        match self.commits {
            0 => "tip-sha".to_string(),
            n => format!("commit-sha-{n}"),
        }
    }

    pub fn pushes(&self) -> Vec<&GitCall> {
        self.calls
            .iter()
            .filter(|call| matches!(call, GitCall::Push { .. }))
            .collect()
    }
}

impl GitSurface for RecordingGit {
    fn checkout(&mut self, branch: &str) -> Result<String, GitSurfaceError> {
        self.calls.push(GitCall::Checkout(branch.to_string()));
        Ok(self.head())
    }

    fn add_blob(&mut self, content: &str, mode: FileMode, path: &str) -> Result<(), GitSurfaceError> {
        self.calls.push(GitCall::AddBlob {
            content: content.to_string(),
            mode,
            path: path.to_string(),
        });
        Ok(())
    }

    fn create_commit(&mut self, branch: &str, message: &str) -> Result<String, GitSurfaceError> {
        if self.fail_commit {
            return Err(GitSurfaceError::NothingStaged);
        }
        self.calls.push(GitCall::Commit {
            branch: branch.to_string(),
            message: message.to_string(),
        });
        self.commits += 1;
        Ok(format!("commit-sha-{}", self.commits))
    }

    fn push(&mut self, branch: &str, sha: &str) -> Result<PushResult, GitSurfaceError> {
        self.calls.push(GitCall::Push {
            branch: branch.to_string(),
            sha: sha.to_string(),
        });
        Ok(PushResult {
            branch: branch.to_string(),
            sha: sha.to_string(),
            updated: true,
        })
    }
}

pub struct FixedSafeguard(pub bool);

impl Safeguard for FixedSafeguard {
    fn check_commenter_can_commit(&self, _login: &str) -> bool {
        self.0
    }
}

/// Returns scripted resolutions in order and records the base refs it saw.
#[derive(Default)]
pub struct ScriptedResolver {
    results: RefCell<VecDeque<Option<ResolvedFix>>>,
    pub bases: RefCell<Vec<String>>,
}

impl ScriptedResolver {
    pub fn new(results: Vec<Option<ResolvedFix>>) -> Self {
        Self {
            results: RefCell::new(results.into()),
            bases: RefCell::default(),
        }
    }
}

impl Resolver for ScriptedResolver {
    fn resolve(&self, _request: &FixRequest, base_ref: &str) -> Result<Option<ResolvedFix>, FixerError> {
        self.bases.borrow_mut().push(base_ref.to_string());
        Ok(self.results.borrow_mut().pop_front().flatten())
    }
}
