//! Answerer backed by pull request review comment replies

use sedy_core::{AnswerError, Answerer};

use crate::client::GithubClient;

/// Replies in the review threads of one pull request.
pub struct GithubAnswerer {
    client: GithubClient,
    pull_request: u64,
}

impl GithubAnswerer {
    pub fn new(client: GithubClient, pull_request: u64) -> Self {
        Self {
            client,
            pull_request,
        }
    }
}

impl Answerer for GithubAnswerer {
    fn reply_to_comment(&self, comment_id: u64, message: &str) -> Result<(), AnswerError> {
        let reply_id = self
            .client
            .reply_to_review_comment(self.pull_request, comment_id, message)
            .map_err(|e| AnswerError::Delivery {
                comment_id,
                reason: e.to_string(),
            })?;
        tracing::debug!(comment_id, reply_id, "replied to review comment");
        Ok(())
    }
}
