//! Subcommand implementations.

pub mod extract;
pub mod init;
pub mod parse;

use anyhow::{Context, Result};
use revharvest_config::{Config, load_config_or_default};

/// Loads the nearest `revharvest.toml` above the working directory.
fn load_config() -> Result<Config> {
    let current_dir = std::env::current_dir().context("failed to determine current directory")?;
    load_config_or_default(current_dir).context("failed to load configuration")
}
