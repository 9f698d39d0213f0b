//! Configuration management for revharvest.
//!
//! This crate handles loading and validating the `revharvest.toml` configuration file.

mod error;
mod loader;
mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{CONFIG_FILE_NAME, find_config_file, load_config, load_config_or_default};
pub use schema::{Config, GitConfig, OutputConfig, OutputFormat, QueueConfig};
