// commit.rs - Commit session: one resolved fix in, at most one commit out.
//
// The session validates what the resolver handed over, builds the commit
// message, drives the git surface, and tells the reviewer when nothing could
// be committed. It never pushes and never remembers the previous sha; the
// orchestrator threads the chain base from one fix to the next.

use sedy_core::{
    messages, Answerer, CommitOutcome, FileMode, FixProposal, IncompleteFix, PullRequestRef,
    ReviewComment,
};
use sedy_submit::GitSurface;

use crate::error::PipelineError;

/// What a commit needs to know about where the fix came from.
#[derive(Debug, Clone, Copy)]
pub struct CommitContext<'a> {
    pub pull_request: &'a PullRequestRef,
    /// Login quoted in replies and in the commit message.
    pub sender: &'a str,
    pub comment: &'a ReviewComment,
}

/// Outcome of [`CommitSession::commit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommit {
    /// A commit was created on the branch (not pushed).
    Committed(CommitOutcome),
    /// No fix was resolved; the reviewer was told so.
    NotUnderstood,
    /// The fix was incomplete; the reviewer was warned.
    Invalid(IncompleteFix),
}

/// Commits single-file fixes on the pull request branch.
pub struct CommitSession<'a> {
    git: &'a mut dyn GitSurface,
    answerer: &'a dyn Answerer,
}

impl<'a> CommitSession<'a> {
    pub fn new(git: &'a mut dyn GitSurface, answerer: &'a dyn Answerer) -> Self {
        Self { git, answerer }
    }

    /// Commit `proposal` on the pull request branch.
    ///
    /// Missing or incomplete proposals never reach the git surface; the
    /// reviewer gets a reply instead. Reply and git failures are returned as
    /// errors.
    pub fn commit(
        &mut self,
        context: &CommitContext<'_>,
        proposal: Option<FixProposal>,
    ) -> Result<SessionCommit, PipelineError> {
        let comment_id = context.comment.id;

        let Some(proposal) = proposal else {
            tracing::info!(comment_id, "no fix resolved");
            self.answerer
                .reply_to_comment(comment_id, &messages::not_understood(context.sender))?;
            return Ok(SessionCommit::NotUnderstood);
        };

        let fix = match proposal.validate() {
            Ok(fix) => fix,
            Err(incomplete) => {
                tracing::warn!(comment_id, "refusing to commit: {}", incomplete);
                self.answerer
                    .reply_to_comment(comment_id, &messages::error_occured(context.sender))?;
                return Ok(SessionCommit::Invalid(incomplete));
            }
        };

        let branch = context.pull_request.branch_ref.as_str();
        let message = messages::commit_message(&fix.applied_match, context.sender, &context.comment.url);

        self.git.checkout(branch)?;
        self.git
            .add_blob(&fix.new_content, FileMode::Blob, &format!("/{}", fix.file_path))?;
        let sha = self.git.create_commit(branch, &message)?;

        tracing::info!(comment_id, commit = %sha, path = %fix.file_path, "committed fix");
        Ok(SessionCommit::Committed(CommitOutcome {
            sha,
            file_path: fix.file_path,
        }))
    }
}
