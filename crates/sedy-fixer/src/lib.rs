//! # sedy-fixer
//!
//! Turns a [`FixRequest`](sedy_core::FixRequest) into new file content.
//!
//! The resolver reads the commented file as of a base ref (the branch tip
//! for the first fix of a batch, the previous fix's commit afterwards) and
//! applies the first substitution that matches. "Nothing matched" is a
//! normal outcome (`Ok(None)`), distinct from a failed read.

pub mod error;
pub mod resolver;
pub mod substitution;

pub use error::FixerError;
pub use resolver::{Resolver, SubstitutionResolver};
pub use substitution::apply;
