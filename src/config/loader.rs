// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use directories::{BaseDirs, ProjectDirs};
use tracing::debug;

use crate::config::model::{Config, RawConfig};
use crate::errors::{LaunchError, Result};

/// Load a configuration file from a given path and return the raw
/// `RawConfig`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation or path resolution. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfig = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path, validate it and resolve paths
/// against the user's home directory.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<Config> {
    let raw = load_from_path(&path)?;
    raw.resolve(&home_dir()?)
}

/// Resolve a configuration for the CLI.
///
/// - An explicit `--config` path must exist; a missing file is an error.
/// - Without `--config`, the default location is used if present, otherwise
///   the built-in defaults apply (the original launcher had no config file
///   of its own, so running with nothing on disk must keep working).
pub fn load_or_default(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        return load_and_validate(path);
    }

    if let Some(path) = default_config_path() {
        if path.is_file() {
            debug!(path = %path.display(), "loading config from default location");
            return load_and_validate(&path);
        }
    }

    debug!("no config file found; using built-in defaults");
    RawConfig::default().resolve(&home_dir()?)
}

/// Default config location, e.g. `~/.config/tunup/tunup.toml` on Linux.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "tunup").map(|dirs| dirs.config_dir().join("tunup.toml"))
}

fn home_dir() -> Result<PathBuf> {
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .ok_or_else(|| LaunchError::Config("cannot determine home directory".to_string()))
}
