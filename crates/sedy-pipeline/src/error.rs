// error.rs - Error types for the batch pipeline.
//
// Everything here is fatal to the batch. Request-local outcomes (unmatched
// substitution, incomplete fix, comment outside a review) are not errors;
// they are reported through SkippedRequest.

use thiserror::Error;

use sedy_core::AnswerError;
use sedy_fixer::FixerError;
use sedy_submit::GitSurfaceError;

/// Errors that abort a batch.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A reply could not be posted.
    #[error("answer error: {0}")]
    Answer(#[from] AnswerError),

    /// A git surface operation failed.
    #[error("git error: {0}")]
    Git(#[from] GitSurfaceError),

    /// Base content could not be read.
    #[error("fixer error: {0}")]
    Fixer(#[from] FixerError),
}
