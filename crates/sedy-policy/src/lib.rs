//! # sedy-policy
//!
//! Permission gate in front of every write the bot makes.
//!
//! Implements the "default deny" boundary: the comment author may only
//! trigger commits when the repository reports one of the configured
//! collaborator permission levels for them. The [`CollaboratorSafeguard`]
//! returns Allow or Deny and never propagates a lookup failure.
//!
//! ## Key invariants
//!
//! - **Fail closed**: lookup error → denied. Unknown level → denied.
//! - **Read only**: the check never writes to the hosting platform.

pub mod error;
pub mod permission;
pub mod safeguard;

pub use error::PolicyError;
pub use permission::PermissionLevel;
pub use safeguard::{CollaboratorSafeguard, PermissionLookup, Safeguard, SafeguardDecision};
