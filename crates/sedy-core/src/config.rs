//! Bot configuration structures

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration from `sedy.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SedyConfig {
    /// GitHub API access
    #[serde(default)]
    pub github: GithubConfig,

    /// Identity written into every commit the bot creates
    #[serde(default)]
    pub committer: CommitterConfig,

    /// Who may trigger commits
    #[serde(default)]
    pub safeguard: SafeguardConfig,
}

/// GitHub API configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GithubConfig {
    /// REST API root; point it at a GitHub Enterprise host or a mock server
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Name of the environment variable holding the installation token
    #[serde(default = "default_token_env")]
    pub token_env: String,

    /// User-Agent header sent with every request (GitHub rejects requests without one)
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            token_env: default_token_env(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Commit author/committer identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommitterConfig {
    #[serde(default = "default_committer_name")]
    pub name: String,

    #[serde(default = "default_committer_email")]
    pub email: String,
}

impl Default for CommitterConfig {
    fn default() -> Self {
        Self {
            name: default_committer_name(),
            email: default_committer_email(),
        }
    }
}

/// Permission gate configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SafeguardConfig {
    /// Collaborator permission levels allowed to trigger commits
    #[serde(default = "default_allowed_permissions")]
    pub allowed_permissions: Vec<String>,
}

impl Default for SafeguardConfig {
    fn default() -> Self {
        Self {
            allowed_permissions: default_allowed_permissions(),
        }
    }
}

// Serde default functions
fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_token_env() -> String {
    "SEDY_GITHUB_TOKEN".to_string()
}

fn default_user_agent() -> String {
    "sedy-bot".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_committer_name() -> String {
    "Sedy".to_string()
}

fn default_committer_email() -> String {
    "sedy@users.noreply.github.com".to_string()
}

fn default_allowed_permissions() -> Vec<String> {
    vec!["admin".to_string(), "maintain".to_string(), "write".to_string()]
}

impl SedyConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file doesn't exist
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.committer.name.trim().is_empty() {
            return Err(invalid("committer.name", "must not be empty"));
        }
        if !self.committer.email.contains('@') {
            return Err(invalid("committer.email", "must be an email address"));
        }
        if self.github.timeout_secs == 0 {
            return Err(invalid("github.timeout_secs", "must be at least 1"));
        }
        if self.safeguard.allowed_permissions.is_empty() {
            return Err(invalid(
                "safeguard.allowed_permissions",
                "nobody would be allowed to commit",
            ));
        }
        Ok(())
    }
}

fn invalid(key: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
