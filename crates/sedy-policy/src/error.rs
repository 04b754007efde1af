// error.rs - Error types for the permission gate.

use thiserror::Error;

/// Errors that can occur during permission checks.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// A permission name in the configuration or from the API is not known.
    #[error("unknown permission level '{0}'")]
    UnknownPermission(String),

    /// The permission could not be looked up.
    #[error("permission lookup for '{login}' failed: {reason}")]
    LookupFailed { login: String, reason: String },
}
