//! # sedy-core
//!
//! Shared vocabulary of the sedy typo-fix bot.
//!
//! A reviewer writes `s/teh/the/` in a pull request review comment; the
//! external parser turns the webhook delivery into a [`FixBatch`], and the
//! pipeline crates resolve, commit and push each [`FixRequest`] in order.
//!
//! ## Key components
//!
//! - [`FixBatch`], [`FixRequest`], [`Match`]: the parsed event
//! - [`ResolvedFix`] / [`FixProposal`]: resolved content, strict and loose forms
//! - [`messages`]: the literal reply and commit message templates
//! - [`SedyConfig`]: TOML configuration threaded into every constructor
//! - [`Answerer`]: replies in a review comment thread
//! - [`ContentSource`]: reads a file as of a sha or branch

pub mod answerer;
pub mod config;
pub mod content;
pub mod error;
pub mod messages;
pub mod model;

pub use answerer::{AnswerError, Answerer, LogAnswerer};
pub use config::{CommitterConfig, GithubConfig, SafeguardConfig, SedyConfig};
pub use content::{ContentError, ContentSource};
pub use error::ConfigError;
pub use model::{
    CommitOutcome, FileMode, FixBatch, FixProposal, FixRequest, IncompleteFix, Match, MatchKind,
    PullRequestRef, RepositoryRef, ResolvedFix, ReviewComment, SkipReason, SkippedRequest,
};
