// permission.rs - Collaborator permission levels as reported by GitHub.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PolicyError;

/// Repository role of a collaborator, strongest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionLevel {
    Admin,
    Maintain,
    Write,
    Triage,
    Read,
    /// Not a collaborator.
    None,
}

impl PermissionLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionLevel::Admin => "admin",
            PermissionLevel::Maintain => "maintain",
            PermissionLevel::Write => "write",
            PermissionLevel::Triage => "triage",
            PermissionLevel::Read => "read",
            PermissionLevel::None => "none",
        }
    }
}

impl FromStr for PermissionLevel {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(PermissionLevel::Admin),
            "maintain" => Ok(PermissionLevel::Maintain),
            "write" | "push" => Ok(PermissionLevel::Write),
            "triage" => Ok(PermissionLevel::Triage),
            "read" | "pull" => Ok(PermissionLevel::Read),
            "none" => Ok(PermissionLevel::None),
            _ => Err(PolicyError::UnknownPermission(s.to_string())),
        }
    }
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
