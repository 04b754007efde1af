//! # sedy-pipeline
//!
//! Drives one batch of fix requests from permission gate to push.
//!
//! ```text
//! START → GATE → (per request: SKIP | RESOLVE_AND_COMMIT) → PUSH → DONE
//! ```
//!
//! ## Key invariants
//!
//! - **Ordered**: requests are resolved and committed strictly in batch order.
//! - **Chained**: each fix is resolved against the previous fix's commit, so
//!   two fixes on the same file both land.
//! - **One push**: the branch is updated once, after the loop, and only if
//!   something was committed.
//! - **Opaque failures**: infrastructure errors abort the batch and reach the
//!   caller as a generic message (see [`handler`]).

pub mod commit;
pub mod error;
pub mod handler;
pub mod orchestrator;

#[cfg(test)]
mod testing;

pub use commit::{CommitContext, CommitSession, SessionCommit};
pub use error::PipelineError;
pub use handler::{handle, InvocationResult};
pub use orchestrator::{BatchFailure, BatchResult, FixTrace, Pipeline};
