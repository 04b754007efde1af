// safeguard.rs - May the comment author commit to this repository?
//
// The Safeguard is the security boundary in front of every write:
//
// 1. Look up the author's collaborator permission → failure → Deny
// 2. Take the role name if it is a known level, else the legacy permission
// 3. Neither parses → Deny
// 4. Level in the allowed set → Allow, otherwise Deny
//
// Nothing here is permissive by default. An ambiguous answer is a "no".

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use sedy_core::SafeguardConfig;
use sedy_github::{CollaboratorPermission, GithubClient};

use crate::error::PolicyError;
use crate::permission::PermissionLevel;

/// Source of collaborator permissions for one repository.
pub trait PermissionLookup {
    fn permission(&self, login: &str) -> Result<CollaboratorPermission, PolicyError>;
}

impl PermissionLookup for GithubClient {
    fn permission(&self, login: &str) -> Result<CollaboratorPermission, PolicyError> {
        self.collaborator_permission(login)
            .map_err(|e| PolicyError::LookupFailed {
                login: login.to_string(),
                reason: e.to_string(),
            })
    }
}

/// Level granted by `access`.
///
/// Organizations may define custom roles ("release-manager"); those names
/// are not levels, and the legacy `permission` field then decides.
pub fn effective_level(access: &CollaboratorPermission) -> Result<PermissionLevel, PolicyError> {
    access
        .role_name
        .as_deref()
        .and_then(|role| role.parse::<PermissionLevel>().ok())
        .map_or_else(|| access.permission.parse(), Ok)
}

/// Read-only gate: may `login` commit on the repository?
pub trait Safeguard {
    /// Never errors; any lookup failure answers `false`.
    fn check_commenter_can_commit(&self, login: &str) -> bool;
}

/// Outcome of a permission evaluation, with the reason for a denial.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum SafeguardDecision {
    Allow { level: PermissionLevel },
    Deny { reason: String },
}

impl SafeguardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, SafeguardDecision::Allow { .. })
    }
}

/// Safeguard based on the repository's collaborator permission levels.
pub struct CollaboratorSafeguard<L> {
    lookup: L,
    allowed: HashSet<PermissionLevel>,
}

impl<L: PermissionLookup> CollaboratorSafeguard<L> {
    /// Fails when the configuration names an unknown level, so a typo in
    /// `allowed_permissions` can't silently widen or empty the gate.
    pub fn new(lookup: L, config: &SafeguardConfig) -> Result<Self, PolicyError> {
        let allowed = config
            .allowed_permissions
            .iter()
            .map(|name| name.parse::<PermissionLevel>())
            .collect::<Result<HashSet<_>, _>>()?;
        Ok(Self { lookup, allowed })
    }

    pub fn evaluate(&self, login: &str) -> SafeguardDecision {
        let access = match self.lookup.permission(login) {
            Ok(access) => access,
            Err(e) => {
                return SafeguardDecision::Deny {
                    reason: e.to_string(),
                }
            }
        };

        let level = match effective_level(&access) {
            Ok(level) => level,
            Err(e) => {
                return SafeguardDecision::Deny {
                    reason: e.to_string(),
                }
            }
        };

        if self.allowed.contains(&level) {
            SafeguardDecision::Allow { level }
        } else {
            SafeguardDecision::Deny {
                reason: format!("'{login}' has '{level}' permission"),
            }
        }
    }
}

impl<L: PermissionLookup> Safeguard for CollaboratorSafeguard<L> {
    fn check_commenter_can_commit(&self, login: &str) -> bool {
        match self.evaluate(login) {
            SafeguardDecision::Allow { level } => {
                tracing::debug!(login, %level, "commenter may commit");
                true
            }
            SafeguardDecision::Deny { reason } => {
                tracing::warn!(login, "commenter may not commit: {}", reason);
                false
            }
        }
    }
}
