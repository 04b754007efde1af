// error.rs - Error types for GitHub REST calls.

use thiserror::Error;

/// Errors that can occur while talking to the GitHub API.
#[derive(Debug, Error)]
pub enum GithubError {
    /// The token cannot be used as an Authorization header value.
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// `api_base` is not an absolute http(s) URL.
    #[error("invalid api base url '{0}'")]
    InvalidBaseUrl(String),

    /// The HTTP client could not be built.
    #[error("http client error: {0}")]
    Client(#[source] reqwest::Error),

    /// The request never got a response (DNS, TLS, timeout...).
    #[error("github {operation} request failed: {source}")]
    Transport {
        operation: String,
        source: reqwest::Error,
    },

    /// GitHub answered with a non-success status.
    #[error("github {operation} failed with status {status}: {body}")]
    Status {
        operation: String,
        status: u16,
        body: String,
    },

    /// The response body did not have the expected shape.
    #[error("failed to decode github {operation} response: {reason}")]
    Decode { operation: String, reason: String },
}

impl GithubError {
    /// GitHub answered 404 (missing file, ref, or no access to the repository).
    pub fn is_not_found(&self) -> bool {
        matches!(self, GithubError::Status { status: 404, .. })
    }
}

pub type Result<T> = std::result::Result<T, GithubError>;
