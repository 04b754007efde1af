// model.rs - The parsed event and everything derived from it during a batch.
//
// A FixBatch is what the external parser hands over for one webhook delivery:
// the repository, the pull request, who sent the comments, and an ordered list
// of FixRequests. Nothing here outlives the invocation.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// `owner/name` of the repository the pull request lives in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRef {
    /// Account or organization login.
    #[serde(alias = "user")]
    pub owner: String,
    /// Repository name without the owner prefix.
    pub name: String,
}

impl RepositoryRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// The pull request whose head branch receives the fixes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestRef {
    pub number: u64,
    /// Head branch name (e.g. "fix-readme"), never changes mid-batch.
    #[serde(alias = "ref")]
    pub branch_ref: String,
    /// HTML URL of the pull request.
    pub url: String,
}

/// A comment left by a reviewer.
///
/// `position` is the line offset inside the pull request diff. Comments
/// written outside a review (in the conversation tab) have no position and
/// cannot be committed. Zero is a valid position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewComment {
    pub id: u64,
    #[serde(alias = "sender")]
    pub author: String,
    #[serde(alias = "createdDate")]
    pub created_at: DateTime<Utc>,
    pub url: String,
    #[serde(alias = "path")]
    pub file_path: String,
    #[serde(default)]
    pub position: Option<u64>,
}

impl ReviewComment {
    /// Whether the comment is anchored to a diff line.
    pub fn is_review_comment(&self) -> bool {
        self.position.is_some()
    }
}

/// How `from` is interpreted when applying a [`Match`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Plain substring.
    #[default]
    Literal,
    /// Regular expression; `to` may reference captures (`$1`).
    Pattern,
}

/// One `s/from/to/` substitution extracted from a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub kind: MatchKind,
}

impl Match {
    pub fn literal(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            kind: MatchKind::Literal,
        }
    }

    pub fn pattern(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            kind: MatchKind::Pattern,
        }
    }
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s/{}/{}/", self.from, self.to)
    }
}

/// A reviewer comment together with the substitutions it asks for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixRequest {
    pub comment: ReviewComment,
    #[serde(default)]
    pub matches: Vec<Match>,
}

impl FixRequest {
    /// At least one substitution was understood.
    pub fn has_matches(&self) -> bool {
        !self.matches.is_empty()
    }
}

/// Everything the parser extracted from one webhook delivery.
///
/// `fixes` order is the resolution order: when two requests touch the same
/// file, the later one sees the earlier one's commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixBatch {
    pub repository: RepositoryRef,
    #[serde(alias = "pullRequest")]
    pub pull_request: PullRequestRef,
    /// Login of the user who wrote the comments.
    pub sender: String,
    #[serde(default)]
    pub fixes: Vec<FixRequest>,
}

impl FixBatch {
    /// True when at least one request carries a substitution.
    pub fn has_fix(&self) -> bool {
        self.fixes.iter().any(FixRequest::has_matches)
    }
}

/// Git file mode of a staged blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileMode {
    /// Regular, non-executable file.
    #[serde(rename = "100644")]
    Blob,
}

impl FileMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileMode::Blob => "100644",
        }
    }
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// New content for one file, computed against a known base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedFix {
    pub file_path: String,
    pub base_content: String,
    pub new_content: String,
    pub applied_match: Match,
}

impl ResolvedFix {
    /// Applying the match left the file unchanged.
    pub fn is_noop(&self) -> bool {
        self.base_content == self.new_content
    }
}

/// A resolved fix as handed to the commit session.
///
/// Resolver backends fill in what they can; [`FixProposal::validate`] is the
/// single gate between this loose form and a [`ResolvedFix`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixProposal {
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub base_content: Option<String>,
    #[serde(default)]
    pub new_content: Option<String>,
    #[serde(default)]
    pub applied_match: Option<Match>,
}

/// A proposal was missing fields required to build a commit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("incomplete fix, missing: {}", missing.join(", "))]
pub struct IncompleteFix {
    pub missing: Vec<&'static str>,
}

impl FixProposal {
    pub fn validate(self) -> Result<ResolvedFix, IncompleteFix> {
        let mut missing = Vec::new();
        if self.file_path.as_deref().map_or(true, str::is_empty) {
            missing.push("file_path");
        }
        if self.base_content.is_none() {
            missing.push("base_content");
        }
        if self.new_content.is_none() {
            missing.push("new_content");
        }
        if self.applied_match.is_none() {
            missing.push("applied_match");
        }

        match (
            self.file_path,
            self.base_content,
            self.new_content,
            self.applied_match,
        ) {
            (Some(file_path), Some(base_content), Some(new_content), Some(applied_match))
                if missing.is_empty() =>
            {
                Ok(ResolvedFix {
                    file_path,
                    base_content,
                    new_content,
                    applied_match,
                })
            }
            _ => Err(IncompleteFix { missing }),
        }
    }
}

impl From<ResolvedFix> for FixProposal {
    fn from(fix: ResolvedFix) -> Self {
        Self {
            file_path: Some(fix.file_path),
            base_content: Some(fix.base_content),
            new_content: Some(fix.new_content),
            applied_match: Some(fix.applied_match),
        }
    }
}

/// A commit produced in this batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitOutcome {
    pub sha: String,
    pub file_path: String,
}

/// Why a request produced no commit without failing the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Written outside a pull request review, so no diff position.
    NotAReviewComment,
    /// No substitution could be extracted from the comment.
    NotUnderstood,
    /// None of the substitutions matched the file content.
    NoMatch,
    /// The resolved fix was structurally incomplete.
    InvalidFix,
    /// The substitution left the file unchanged.
    NoChange,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SkipReason::NotAReviewComment => "not_a_review_comment",
            SkipReason::NotUnderstood => "not_understood",
            SkipReason::NoMatch => "no_match",
            SkipReason::InvalidFix => "invalid_fix",
            SkipReason::NoChange => "no_change",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRequest {
    pub comment_id: u64,
    pub reason: SkipReason,
}
