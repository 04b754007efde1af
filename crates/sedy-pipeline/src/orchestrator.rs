// orchestrator.rs - Runs one batch of fix requests end to end.
//
// The batch walks a small state machine:
//
//   START → GATE → (per request: SKIP | RESOLVE_AND_COMMIT) → PUSH → DONE
//
// - No request carries a substitution → "no fix found", no call at all.
// - GATE denied → "not permitted", before any git call.
// - Comment outside a review → reply, record as skipped, next request.
// - Otherwise resolve against the chain base, commit, and make the new sha
//   the chain base of the next request. The first chain base is the tip sha
//   read at checkout, never the branch name.
// - PUSH once if anything was committed, otherwise "no fix found".
//
// Requests are handled strictly one after the other. Resolving two fixes
// concurrently would read the same base and the second commit would drop the
// first fix.

use std::fmt;

use serde::{Deserialize, Serialize};

use sedy_core::{
    messages, Answerer, CommitOutcome, FixBatch, FixProposal, Match, SkipReason, SkippedRequest,
};
use sedy_fixer::Resolver;
use sedy_policy::Safeguard;
use sedy_submit::GitSurface;

use crate::commit::{CommitContext, CommitSession, SessionCommit};
use crate::error::PipelineError;

/// Why a batch ended without pushing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchFailure {
    #[serde(rename = "no fix found")]
    NoFixFound,
    #[serde(rename = "not permitted")]
    NotPermitted,
}

impl fmt::Display for BatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchFailure::NoFixFound => write!(f, "no fix found"),
            BatchFailure::NotPermitted => write!(f, "not permitted"),
        }
    }
}

/// The substitutions attempted for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixTrace {
    pub comment_id: u64,
    pub matches: Vec<Match>,
}

/// Result of one batch.
///
/// `success` is true only when at least one commit was created and the
/// branch was pushed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<BatchFailure>,
    #[serde(default)]
    pub fixes: Vec<FixTrace>,
    /// Commits in creation order; the last one is what was pushed.
    #[serde(default)]
    pub commits: Vec<CommitOutcome>,
    #[serde(default)]
    pub skipped: Vec<SkippedRequest>,
}

impl BatchResult {
    fn failed(reason: BatchFailure) -> Self {
        Self {
            success: false,
            reason: Some(reason),
            fixes: Vec::new(),
            commits: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn commit_shas(&self) -> Vec<&str> {
        self.commits.iter().map(|c| c.sha.as_str()).collect()
    }
}

/// The collaborators a batch runs against.
///
/// Built per invocation; the git surface cursor lives exactly as long as the
/// batch.
pub struct Pipeline<'a> {
    safeguard: &'a dyn Safeguard,
    resolver: &'a dyn Resolver,
    git: &'a mut dyn GitSurface,
    answerer: &'a dyn Answerer,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        safeguard: &'a dyn Safeguard,
        resolver: &'a dyn Resolver,
        git: &'a mut dyn GitSurface,
        answerer: &'a dyn Answerer,
    ) -> Self {
        Self {
            safeguard,
            resolver,
            git,
            answerer,
        }
    }

    /// Process every request of `batch` in order, then push once.
    pub fn run(&mut self, batch: &FixBatch) -> Result<BatchResult, PipelineError> {
        if !batch.has_fix() {
            tracing::info!(requests = batch.fixes.len(), "no substitution in batch");
            return Ok(BatchResult::failed(BatchFailure::NoFixFound));
        }

        if !self.safeguard.check_commenter_can_commit(&batch.sender) {
            return Ok(BatchResult::failed(BatchFailure::NotPermitted));
        }

        let branch = batch.pull_request.branch_ref.as_str();
        let mut fixes = Vec::new();
        let mut commits: Vec<CommitOutcome> = Vec::new();
        let mut skipped = Vec::new();

        for request in &batch.fixes {
            let comment = &request.comment;

            if !comment.is_review_comment() {
                tracing::warn!(
                    comment_id = comment.id,
                    path = %comment.file_path,
                    "comment has no diff position"
                );
                self.answerer.reply_to_comment(
                    comment.id,
                    &messages::review_required(&batch.sender, &batch.pull_request.url),
                )?;
                skipped.push(SkippedRequest {
                    comment_id: comment.id,
                    reason: SkipReason::NotAReviewComment,
                });
                continue;
            }

            tracing::debug!(comment_id = comment.id, path = %comment.file_path, "fixing request");
            fixes.push(FixTrace {
                comment_id: comment.id,
                matches: request.matches.clone(),
            });

            let resolved = if request.has_matches() {
                // Read the tip through the surface so the content and the
                // commit parent are the same snapshot.
                let base = match commits.last() {
                    Some(last) => last.sha.clone(),
                    None => self.git.checkout(branch)?,
                };
                self.resolver.resolve(request, &base)?
            } else {
                None
            };

            if let Some(fix) = resolved.as_ref().filter(|fix| fix.is_noop()) {
                tracing::warn!(
                    comment_id = comment.id,
                    "{} leaves {} unchanged",
                    fix.applied_match,
                    fix.file_path
                );
                skipped.push(SkippedRequest {
                    comment_id: comment.id,
                    reason: SkipReason::NoChange,
                });
                continue;
            }

            let context = CommitContext {
                pull_request: &batch.pull_request,
                sender: &batch.sender,
                comment,
            };
            let outcome = CommitSession::new(&mut *self.git, self.answerer)
                .commit(&context, resolved.map(FixProposal::from))?;

            match outcome {
                SessionCommit::Committed(commit) => commits.push(commit),
                SessionCommit::NotUnderstood => skipped.push(SkippedRequest {
                    comment_id: comment.id,
                    reason: if request.has_matches() {
                        SkipReason::NoMatch
                    } else {
                        SkipReason::NotUnderstood
                    },
                }),
                SessionCommit::Invalid(_) => skipped.push(SkippedRequest {
                    comment_id: comment.id,
                    reason: SkipReason::InvalidFix,
                }),
            }
        }

        let Some(last) = commits.last() else {
            tracing::info!(skipped = skipped.len(), "nothing committed");
            return Ok(BatchResult {
                fixes,
                skipped,
                ..BatchResult::failed(BatchFailure::NoFixFound)
            });
        };

        let pushed = self.git.push(branch, &last.sha)?;
        let shas: Vec<&str> = commits.iter().map(|c| c.sha.as_str()).collect();
        tracing::info!(branch, head = %pushed.sha, commits = ?shas, "successful commits");

        Ok(BatchResult {
            success: true,
            reason: None,
            fixes,
            commits,
            skipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{comment, pull_request, FixedSafeguard, GitCall, RecordingGit, ScriptedResolver};
    use sedy_core::{FixRequest, LogAnswerer, RepositoryRef, ResolvedFix};

    fn batch(fixes: Vec<FixRequest>) -> FixBatch {
        FixBatch {
            repository: RepositoryRef::new("marmelab", "sedy"),
            pull_request: pull_request(),
            sender: "username".into(),
            fixes,
        }
    }

    fn request(id: u64, position: Option<u64>) -> FixRequest {
        let mut comment = comment(position);
        comment.id = id;
        FixRequest {
            comment,
            matches: vec![Match::literal("old", "new")],
        }
    }

    fn resolved(base: &str, new: &str) -> ResolvedFix {
        ResolvedFix {
            file_path: "folder/to/blob.txt".into(),
            base_content: base.into(),
            new_content: new.into(),
            applied_match: Match::literal("old", "new"),
        }
    }

    #[test]
    fn comment_outside_review_is_skipped_without_git() {
        let mut git = RecordingGit::default();
        let answerer = LogAnswerer::new();
        let resolver = ScriptedResolver::new(vec![]);
        let safeguard = FixedSafeguard(true);

        let result = Pipeline::new(&safeguard, &resolver, &mut git, &answerer)
            .run(&batch(vec![request(7, None)]))
            .unwrap();

        assert!(git.calls.is_empty());
        assert!(resolver.bases.borrow().is_empty());
        assert_eq!(
            answerer.replies(),
            vec![(
                7,
                ":x: @username, please write your comment in a Pull Request Review. \
                 [Add a review now](https://github.com/marmelab/sedy/pull/1/files)"
                    .to_string()
            )]
        );
        assert_eq!(result.reason, Some(BatchFailure::NoFixFound));
        assert_eq!(
            result.skipped,
            vec![SkippedRequest {
                comment_id: 7,
                reason: SkipReason::NotAReviewComment
            }]
        );
    }

    #[test]
    fn denied_commenter_stops_before_git() {
        let mut git = RecordingGit::default();
        let answerer = LogAnswerer::new();
        let resolver = ScriptedResolver::new(vec![Some(resolved("old", "new"))]);
        let safeguard = FixedSafeguard(false);

        let result = Pipeline::new(&safeguard, &resolver, &mut git, &answerer)
            .run(&batch(vec![request(1, Some(3))]))
            .unwrap();

        assert!(!result.success);
        assert_eq!(result.reason, Some(BatchFailure::NotPermitted));
        assert!(git.calls.is_empty());
        assert!(resolver.bases.borrow().is_empty());
    }

    #[test]
    fn empty_batch_is_no_fix_found() {
        let mut git = RecordingGit::default();
        let answerer = LogAnswerer::new();
        let resolver = ScriptedResolver::new(vec![]);
        let safeguard = FixedSafeguard(true);

        let result = Pipeline::new(&safeguard, &resolver, &mut git, &answerer)
            .run(&batch(vec![]))
            .unwrap();

        assert!(!result.success);
        assert_eq!(result.reason, Some(BatchFailure::NoFixFound));
        assert!(git.pushes().is_empty());
    }

    #[test]
    fn all_unresolved_is_no_fix_found_without_push() {
        let mut git = RecordingGit::default();
        let answerer = LogAnswerer::new();
        let resolver = ScriptedResolver::new(vec![None, None]);
        let safeguard = FixedSafeguard(true);

        let result = Pipeline::new(&safeguard, &resolver, &mut git, &answerer)
            .run(&batch(vec![request(1, Some(3)), request(2, Some(5))]))
            .unwrap();

        assert_eq!(result.reason, Some(BatchFailure::NoFixFound));
        assert_eq!(git.calls, vec![GitCall::Checkout("branch-name".into()); 2]);
        assert_eq!(answerer.replies().len(), 2);
        assert!(result
            .skipped
            .iter()
            .all(|s| s.reason == SkipReason::NoMatch));
    }

    #[test]
    fn first_fix_is_resolved_on_the_checked_out_tip() {
        let mut git = RecordingGit::default();
        let answerer = LogAnswerer::new();
        let resolver = ScriptedResolver::new(vec![Some(resolved("old", "new"))]);
        let safeguard = FixedSafeguard(true);

        let result = Pipeline::new(&safeguard, &resolver, &mut git, &answerer)
            .run(&batch(vec![request(1, Some(3))]))
            .unwrap();

        assert!(result.success);
        assert_eq!(*resolver.bases.borrow(), vec!["tip-sha".to_string()]);
        assert_eq!(git.calls[0], GitCall::Checkout("branch-name".into()));
    }

    #[test]
    fn second_fix_is_resolved_on_the_first_commit() {
        let mut git = RecordingGit::default();
        let answerer = LogAnswerer::new();
        let resolver = ScriptedResolver::new(vec![
            Some(resolved("old old", "new old")),
            Some(resolved("new old", "new new")),
        ]);
        let safeguard = FixedSafeguard(true);

        let result = Pipeline::new(&safeguard, &resolver, &mut git, &answerer)
            .run(&batch(vec![request(1, Some(3)), request(2, Some(4))]))
            .unwrap();

        assert_eq!(
            *resolver.bases.borrow(),
            vec!["tip-sha".to_string(), "commit-sha-1".to_string()]
        );
        assert!(result.success);
        assert_eq!(result.commit_shas(), vec!["commit-sha-1", "commit-sha-2"]);
        assert_eq!(
            git.pushes(),
            vec![&GitCall::Push {
                branch: "branch-name".into(),
                sha: "commit-sha-2".into()
            }]
        );
    }

    #[test]
    fn skipped_requests_do_not_break_the_chain() {
        let mut git = RecordingGit::default();
        let answerer = LogAnswerer::new();
        let resolver = ScriptedResolver::new(vec![Some(resolved("old", "new")), None]);
        let safeguard = FixedSafeguard(true);

        let result = Pipeline::new(&safeguard, &resolver, &mut git, &answerer)
            .run(&batch(vec![
                request(1, Some(3)),
                request(2, None),
                request(3, Some(8)),
            ]))
            .unwrap();

        assert!(result.success);
        assert_eq!(result.commit_shas(), vec!["commit-sha-1"]);
        assert_eq!(
            *resolver.bases.borrow(),
            vec!["tip-sha".to_string(), "commit-sha-1".to_string()]
        );
        assert_eq!(
            result.skipped.iter().map(|s| (s.comment_id, s.reason)).collect::<Vec<_>>(),
            vec![(2, SkipReason::NotAReviewComment), (3, SkipReason::NoMatch)]
        );
        assert_eq!(result.fixes.len(), 2);
    }

    #[test]
    fn noop_fix_is_not_committed() {
        let mut git = RecordingGit::default();
        let answerer = LogAnswerer::new();
        let resolver = ScriptedResolver::new(vec![Some(resolved("same", "same"))]);
        let safeguard = FixedSafeguard(true);

        let result = Pipeline::new(&safeguard, &resolver, &mut git, &answerer)
            .run(&batch(vec![request(1, Some(3))]))
            .unwrap();

        assert_eq!(git.calls, vec![GitCall::Checkout("branch-name".into())]);
        assert_eq!(result.skipped[0].reason, SkipReason::NoChange);
        assert_eq!(result.reason, Some(BatchFailure::NoFixFound));
    }

    #[test]
    fn request_without_matches_gets_not_understood() {
        let mut git = RecordingGit::default();
        let answerer = LogAnswerer::new();
        let resolver = ScriptedResolver::new(vec![Some(resolved("old", "new"))]);
        let safeguard = FixedSafeguard(true);
        let mut empty = request(2, Some(1));
        empty.matches.clear();

        let result = Pipeline::new(&safeguard, &resolver, &mut git, &answerer)
            .run(&batch(vec![request(1, Some(3)), empty]))
            .unwrap();

        assert!(result.success);
        assert_eq!(resolver.bases.borrow().len(), 1);
        assert_eq!(
            answerer.replies(),
            vec![(2, ":confused: @username, I did not understand the request.".to_string())]
        );
        assert_eq!(result.skipped[0].reason, SkipReason::NotUnderstood);
    }

    #[test]
    fn result_serializes_reason_as_text() {
        let json = serde_json::to_value(BatchResult::failed(BatchFailure::NotPermitted)).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["reason"], "not permitted");
    }
}
