// src/core/paths.rs

use crate::constants::{CONFIG_DIR_NAME, SETTINGS_FILENAME, SETTINGS_PATH_ENV};
use log::debug;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while locating the settings file.
#[derive(Error, Debug)]
pub enum PathError {
    /// The platform has no config directory.
    #[error("Could not find system config directory.")]
    ConfigDirNotFound,
    /// The config directory could not be created.
    #[error("Could not create config directory at '{path}': {source}")]
    ConfigDirCreation {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Returns the shellset configuration directory (`~/.config/shellset`),
/// creating it if it doesn't exist.
pub fn get_config_dir() -> Result<PathBuf, PathError> {
    let config_path = dirs::config_dir()
        .ok_or(PathError::ConfigDirNotFound)?
        .join(CONFIG_DIR_NAME);
    ensure_dir(&config_path)?;
    Ok(config_path)
}

fn ensure_dir(path: &Path) -> Result<(), PathError> {
    if !path.exists() {
        debug!("Creating config directory '{}'", path.display());
        fs::create_dir_all(path).map_err(|e| PathError::ConfigDirCreation {
            path: path.display().to_string(),
            source: e,
        })?;
    }
    Ok(())
}

/// Resolves the settings file path.
///
/// Priority: an explicit path, then `SHELLSET_SETTINGS`, then the file in
/// the config directory. Explicit and environment paths are used as given;
/// only the default location has its directory created.
pub fn resolve_settings_path(explicit: Option<&Path>) -> Result<PathBuf, PathError> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Some(from_env) = env::var_os(SETTINGS_PATH_ENV).filter(|v| !v.is_empty()) {
        debug!("Using settings path from {}", SETTINGS_PATH_ENV);
        return Ok(PathBuf::from(from_env));
    }
    get_config_dir().map(|dir| dir.join(SETTINGS_FILENAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_explicit_path_wins() {
        let path = Path::new("/tmp/custom-settings");
        assert_eq!(resolve_settings_path(Some(path)).unwrap(), path);
    }

    #[test]
    fn test_ensure_dir_creates_nested_directories() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");

        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
        // Existing directories are left alone.
        ensure_dir(&nested).unwrap();
    }
}
