// error.rs - Error types for fix resolution.

use sedy_core::ContentError;
use thiserror::Error;

/// Errors that can occur while resolving a fix.
///
/// Only infrastructure failures are errors; an unmatched substitution is not.
#[derive(Debug, Error)]
pub enum FixerError {
    /// The base content could not be read.
    #[error("content error: {0}")]
    Content(#[from] ContentError),
}
