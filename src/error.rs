//! Error types.
//!
//! Analysis itself never fails: malformed versions, modes, or unrecognised
//! declarations degrade to the least-alarming verdict and are logged. Errors
//! are reserved for loading inputs and for invalid configuration, which is
//! rejected before any resource is processed.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// The config file exists but could not be read
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`Config`](crate::config::Config)
    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// `max_permissions` is negative or wider than `0o7777`
    #[error("Invalid max_permissions {0}: expected a file mode between 0o0 and 0o7777")]
    InvalidMaxPermissions(i64),

    /// A `--max-permissions` argument that is not an octal number
    #[error("Invalid max_permissions '{0}': expected an octal mode such as 0600")]
    UnparsableMaxPermissions(String),

    /// A configured regular expression failed to compile
    #[error("Invalid pattern '{pattern}' in [patterns].{list}: {source}")]
    InvalidPattern {
        list: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Errors raised while reading declaration dumps for an audit run.
#[derive(Debug, Error)]
pub enum AuditError {
    /// IO error while reading a dump
    #[error("Failed to read declarations from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The dump is not a valid declaration document
    #[error("Failed to parse declarations from {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// No declaration dumps were found under the requested path
    #[error("No declaration dumps (*.json) found under {0}")]
    NoDumps(PathBuf),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
