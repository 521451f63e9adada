// src/state.rs

use crate::core::builtin::BuiltinSettings;
use crate::core::persistence::PersistenceError;
use crate::core::registry::Registry;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Everything a CLI invocation works on: the registry, the settings that
/// keep it populated, and the file it was loaded from.
#[derive(Debug)]
pub struct AppState {
    /// The registry holding the built-in settings.
    pub registry: Registry,
    path: PathBuf,
    dirty: bool,
    // Owns the built-in settings for as long as the registry is in use.
    _builtins: BuiltinSettings,
}

impl AppState {
    /// Registers the built-in settings and loads `path`.
    ///
    /// A missing or empty settings file is not an error; every setting simply
    /// keeps its default.
    pub fn open(path: &Path) -> Result<Self> {
        let builtins = BuiltinSettings::new();
        let mut registry = Registry::new();
        builtins.register_all(&mut registry)?;

        match registry.load(path) {
            Ok(()) => log::debug!("Settings loaded from '{}'", path.display()),
            Err(PersistenceError::Empty(_)) => {
                log::debug!("Settings file '{}' is empty", path.display());
            }
            Err(PersistenceError::Read { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                log::debug!("No settings file at '{}', using defaults", path.display());
            }
            Err(e) => return Err(e).context("Failed to load settings"),
        }

        Ok(Self {
            registry,
            path: path.to_path_buf(),
            dirty: false,
            _builtins: builtins,
        })
    }

    /// The settings file this state was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records that a setting was changed and the file needs rewriting.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Whether a setting changed since the last save.
    pub fn needs_saving(&self) -> bool {
        self.dirty
    }

    /// Saves the settings file if anything changed since it was opened.
    pub fn commit(&mut self) -> Result<()> {
        if !self.dirty {
            log::trace!("Nothing changed, skipping save");
            return Ok(());
        }
        self.registry
            .save(&self.path)
            .with_context(|| format!("Failed to save settings to '{}'", self.path.display()))?;
        self.dirty = false;
        Ok(())
    }
}
