//! Git surface for committing fixes without a working copy
//!
//! This crate provides the branch-scoped git operations the commit session
//! needs (checkout, add blob, commit, push). The core abstraction is the
//! `GitSurface` trait, with an implementation backed by GitHub's git database
//! API and a dry-run implementation that never writes.

pub mod adapter;
pub mod dry_run;
pub mod github;

pub use adapter::{GitSurface, GitSurfaceError, PushResult};
pub use dry_run::{DryRunCommit, DryRunContent, DryRunGitSurface};
pub use github::GithubGitSurface;
