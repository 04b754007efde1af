// messages.rs - Literal texts the bot writes to GitHub.
//
// Reviewers see these verbatim, including the historical "occured" spelling,
// so they are kept byte-for-byte stable.

use crate::model::Match;

/// Returned to the caller when a collaborator failure aborted the batch.
/// The internal error is logged, never shown.
pub const ADMINISTRATOR_MESSAGE: &str = "An error occurred, please contact an administrator.";

/// Reply when no fix could be resolved from the comment.
pub fn not_understood(sender: &str) -> String {
    format!(":confused: @{sender}, I did not understand the request.")
}

/// Reply when a resolved fix was incomplete at commit time.
pub fn error_occured(sender: &str) -> String {
    format!(":warning: @{sender}, an error occured.\nBe sure to check all my commits!")
}

/// Reply when the comment was not written inside a pull request review.
pub fn review_required(sender: &str, pull_request_url: &str) -> String {
    format!(
        ":x: @{sender}, please write your comment in a Pull Request Review. \
         [Add a review now]({pull_request_url}/files)"
    )
}

/// Commit message for one applied substitution.
pub fn commit_message(applied: &Match, sender: &str, comment_url: &str) -> String {
    format!(
        "Typo fix s/{}/{}/\n\nAs requested by @{} at {}",
        applied.from, applied.to, sender, comment_url
    )
}
