//! Locating and reading `revharvest.toml`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{Config, ConfigError, ConfigResult};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "revharvest.toml";

/// Loads and validates configuration from the given path.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed or validated.
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<Config> {
    let path = path.as_ref();
    debug!(?path, "loading configuration");

    let content = std::fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => ConfigError::NotFound(path.to_path_buf()),
        _ => ConfigError::Read {
            path: path.to_path_buf(),
            source,
        },
    })?;
    let config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()?;

    Ok(config)
}

/// Returns the nearest configuration file in `start_dir` or one of its ancestors.
pub fn find_config_file(start_dir: impl AsRef<Path>) -> Option<PathBuf> {
    start_dir
        .as_ref()
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

/// Loads the nearest configuration file above `start_dir`.
///
/// Falls back to [`Config::default`] if neither the directory nor any ancestor
/// holds a configuration file.
///
/// # Errors
///
/// Returns an error if a configuration file exists but cannot be loaded.
pub fn load_config_or_default(start_dir: impl AsRef<Path>) -> ConfigResult<Config> {
    match find_config_file(&start_dir) {
        Some(path) => load_config(path),
        None => {
            debug!("no configuration file found, using defaults");
            Ok(Config::default())
        }
    }
}
