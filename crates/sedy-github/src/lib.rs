//! # sedy-github
//!
//! Thin blocking client over the GitHub REST endpoints the bot needs: the
//! low-level git database (blobs, trees, commits, refs), the contents API,
//! collaborator permissions and review comment replies.
//!
//! Every call is a single round trip. Nothing is retried: a failed request
//! surfaces as a [`GithubError`] and aborts the batch upstream.

pub mod answerer;
pub mod client;
pub mod content;
pub mod error;

pub use answerer::GithubAnswerer;
pub use client::{CollaboratorPermission, GitCommit, GithubClient, NewCommit, Signature, TreeEntry};
pub use error::GithubError;
