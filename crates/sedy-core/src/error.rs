// error.rs - Error types for configuration loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading `sedy.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The config file is not valid TOML or has unexpected fields.
    #[error("invalid config at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A value parsed but makes no sense (empty committer, zero timeout...).
    #[error("invalid config value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
}
