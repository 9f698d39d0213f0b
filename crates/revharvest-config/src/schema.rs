//! Configuration schema.

use std::time::Duration;

use revharvest_git::{DEFAULT_CONTEXT_LINES, DEFAULT_PROGRAM};
use serde::{Deserialize, Serialize};

use crate::{ConfigError, ConfigResult};

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Git invocation configuration.
    #[serde(default)]
    pub git: GitConfig,

    /// Commit queue configuration.
    #[serde(default)]
    pub queue: QueueConfig,

    /// Output configuration.
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Checks values that deserialize fine but cannot be used.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending key.
    pub fn validate(&self) -> ConfigResult<()> {
        let invalid = |key, reason| Err(ConfigError::Invalid { key, reason });

        if self.git.program.trim().is_empty() {
            return invalid("git.program", "must not be empty");
        }
        if self.git.context_lines == 0 {
            return invalid("git.context_lines", "must be at least 1");
        }
        if self.queue.capacity == 0 {
            return invalid("queue.capacity", "must be at least 1");
        }
        Ok(())
    }

    /// Renders the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Git invocation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitConfig {
    /// The git executable.
    #[serde(default = "default_program")]
    pub program: String,

    /// Context lines requested per diff.
    #[serde(default = "default_context_lines")]
    pub context_lines: u32,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            context_lines: default_context_lines(),
        }
    }
}

fn default_program() -> String {
    DEFAULT_PROGRAM.to_string()
}

fn default_context_lines() -> u32 {
    DEFAULT_CONTEXT_LINES
}

/// Commit queue configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Maximum number of buffered, unconsumed commits.
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Seconds a producer waits for queue space before giving up.
    ///
    /// Absent means producers wait until the queue has space or is closed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub put_timeout_secs: Option<u64>,
}

impl QueueConfig {
    /// Returns the producer wait limit.
    pub fn put_timeout(&self) -> Option<Duration> {
        self.put_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            put_timeout_secs: None,
        }
    }
}

fn default_capacity() -> usize {
    10
}

/// Output configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// How drained commits are printed.
    #[serde(default)]
    pub format: OutputFormat,
}

/// How drained commits are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One JSON object per line.
    #[default]
    Json,

    /// One human-readable line per commit.
    Summary,
}
