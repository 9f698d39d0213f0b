//! Configuration error types.

use std::path::PathBuf;

use thiserror::Error;

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found.
    #[error("configuration file not found: {0}")]
    NotFound(PathBuf),

    /// The file exists but could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML or does not match the schema.
    #[error("cannot parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Configuration could not be written as TOML.
    #[error("cannot serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A value deserialized fine but cannot be used.
    #[error("invalid configuration: {key} {reason}")]
    Invalid {
        key: &'static str,
        reason: &'static str,
    },
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
