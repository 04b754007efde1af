// answerer.rs - Answerer trait for replying to the reviewer who asked for a fix.
//
// Replies land in the review comment thread that triggered the fix. The
// GitHub implementation lives in sedy-github; LogAnswerer only records the
// reply in the log and is used for dry runs.

use std::sync::Mutex;

/// Errors from Answerer operations.
#[derive(Debug, thiserror::Error)]
pub enum AnswerError {
    #[error("reply to comment {comment_id} failed: {reason}")]
    Delivery { comment_id: u64, reason: String },

    #[error("answerer error: {0}")]
    Other(String),
}

/// Posts replies in a review comment thread.
///
/// A failed reply is returned to the caller, which decides whether it aborts
/// the batch. Implementations never swallow delivery errors.
pub trait Answerer {
    fn reply_to_comment(&self, comment_id: u64, message: &str) -> Result<(), AnswerError>;
}

/// Answerer that writes replies to the log instead of GitHub.
#[derive(Debug, Default)]
pub struct LogAnswerer {
    replies: Mutex<Vec<(u64, String)>>,
}

impl LogAnswerer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replies recorded so far, in order.
    pub fn replies(&self) -> Vec<(u64, String)> {
        self.replies
            .lock()
            .map(|replies| replies.clone())
            .unwrap_or_default()
    }
}

impl Answerer for LogAnswerer {
    fn reply_to_comment(&self, comment_id: u64, message: &str) -> Result<(), AnswerError> {
        tracing::info!(comment_id, "reply (not posted): {}", message);
        self.replies
            .lock()
            .map_err(|_| AnswerError::Other("reply log poisoned".to_string()))?
            .push((comment_id, message.to_string()));
        Ok(())
    }
}
