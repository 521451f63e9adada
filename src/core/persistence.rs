// src/core/persistence.rs

//! # Settings File Persistence
//!
//! Reads and writes the plain-text settings file:
//!
//! ```text
//! # name: <short description>
//! # type: boolean|integer|string|enum|color
//! # options: opt1,opt2        (enum only)
//! <name> = <descriptive value>
//! ```
//!
//! `load` remembers every `key = value` line it reads, with the comment block
//! above it, whether or not a registered setting claimed it. `save` writes
//! the modified registered settings first and then replays every remembered
//! entry that no registered setting accounted for, so values belonging to
//! extensions that are not loaded right now survive a save.

use crate::core::registry::Registry;
use log::{debug, trace, warn};
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::rc::Weak;
use tempfile::NamedTempFile;
use thiserror::Error;

/// Errors raised while loading or saving a settings file.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// The file could not be opened or read.
    #[error("Could not read settings file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    /// The file exists but holds no bytes.
    #[error("Settings file '{0}' is empty.")]
    Empty(String),
    /// The file is not UTF-8; it is left alone rather than rewritten lossily.
    #[error("Settings file '{path}' is not valid UTF-8: {source}")]
    InvalidUtf8 {
        path: String,
        #[source]
        source: std::string::FromUtf8Error,
    },
    /// Writing the temporary file failed.
    #[error("Could not write settings file '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },
    /// The temporary file could not be moved over the settings file.
    #[error("Could not replace settings file '{path}': {source}")]
    Persist {
        path: String,
        #[source]
        source: tempfile::PersistError,
    },
}

/// One `key = value` entry as it was read from the settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedSetting {
    comment: String,
    value: String,
    /// Scratch flag used while saving.
    saved: bool,
}

impl LoadedSetting {
    /// The comment lines directly above the entry, each ending in `\n`.
    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// The raw value text, exactly as it appeared after `=`.
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl Registry {
    /// Loads a settings file, resetting every registered setting to its
    /// default before applying the file's values.
    ///
    /// # Errors
    /// Fails without touching any setting if the file cannot be read, is
    /// empty or is not valid UTF-8. The loaded-value table is cleared in
    /// every case.
    pub fn load(&mut self, path: &Path) -> Result<(), PersistenceError> {
        self.loaded.clear();

        let bytes = fs::read(path).map_err(|source| PersistenceError::Read {
            path: path.display().to_string(),
            source,
        })?;
        if bytes.is_empty() {
            return Err(PersistenceError::Empty(path.display().to_string()));
        }

        let contents =
            String::from_utf8(bytes).map_err(|source| PersistenceError::InvalidUtf8 {
                path: path.display().to_string(),
                source,
            })?;

        self.load_str(&contents);
        debug!(
            "Loaded {} entries from '{}'",
            self.loaded.len(),
            path.display()
        );
        Ok(())
    }

    /// Applies settings file text. Invalid values are ignored and leave the
    /// setting at its default.
    pub fn load_str(&mut self, contents: &str) {
        self.loaded.clear();
        self.reset_all();

        let mut comment = String::new();
        let mut was_comment = false;

        for line in contents.split(['\n', '\r']).filter(|l| !l.is_empty()) {
            // A comment block belongs to the entry right below it.
            if !was_comment {
                comment.clear();
            }

            let line = line.trim_start();
            if line.starts_with('#') {
                was_comment = true;
                comment.push_str(line);
                comment.push('\n');
                continue;
            }
            was_comment = false;

            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim_end();
            let value = value.trim_start();

            match self.find(key) {
                Some(setting) => {
                    if !setting.borrow_mut().set(value) {
                        warn!("Ignoring invalid value '{}' for setting '{}'", value, key);
                    }
                }
                None => trace!("'{}' is not registered, keeping its value for saving", key),
            }

            self.loaded.insert(
                key.to_string(),
                LoadedSetting {
                    comment: comment.clone(),
                    value: value.to_string(),
                    saved: false,
                },
            );
        }
    }

    /// Writes the settings file through a temporary file in the same
    /// directory, replacing the file only once everything was written.
    ///
    /// A symlinked `path` is followed, so the link stays in place and its
    /// target receives the new contents. An existing file keeps its
    /// permissions.
    ///
    /// # Errors
    /// Returns an error if the directory is not writable or the file cannot
    /// be replaced.
    pub fn save(&mut self, path: &Path) -> Result<(), PersistenceError> {
        let write_error = |source: io::Error| PersistenceError::Write {
            path: path.display().to_string(),
            source,
        };

        let target = resolve_target(path);
        let dir = target
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut file = NamedTempFile::new_in(dir).map_err(write_error)?;

        if let Ok(metadata) = fs::metadata(&target) {
            file.as_file()
                .set_permissions(metadata.permissions())
                .map_err(write_error)?;
        }

        let mut writer = BufWriter::new(&mut file);
        self.write_to(&mut writer).map_err(write_error)?;
        writer.flush().map_err(write_error)?;
        drop(writer);

        file.persist(&target)
            .map_err(|source| PersistenceError::Persist {
                path: path.display().to_string(),
                source,
            })?;
        debug!("Saved settings to '{}'", target.display());
        Ok(())
    }

    /// Renders the settings file.
    ///
    /// Registered settings come first, in name order, and only when they
    /// differ from their default. Loaded entries that no registered setting
    /// claimed follow after a blank line, with their original comments.
    ///
    /// # Errors
    /// Propagates errors from `out`.
    pub fn write_to<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        for entry in self.loaded.values_mut() {
            entry.saved = false;
        }

        for handle in self.settings.values().filter_map(Weak::upgrade) {
            let setting = handle.borrow();
            if let Some(entry) = self.loaded.get_mut(setting.name()) {
                entry.saved = true;
            }

            if setting.is_default() {
                continue;
            }

            writeln!(out, "# name: {}", setting.short_desc())?;
            writeln!(out, "# type: {}", setting.setting_type())?;
            if let Some(options) = setting.options() {
                writeln!(out, "# options: {}", options)?;
            }
            write!(out, "{} = {}\n\n", setting.name(), setting.descriptive())?;
        }

        let mut first_extra = true;
        for (name, entry) in self.loaded.iter().filter(|(_, entry)| !entry.saved) {
            if first_extra {
                first_extra = false;
                writeln!(out)?;
            }
            trace!("Preserving unclaimed entry '{}'", name);
            write!(out, "{}{} = {}\n\n", entry.comment, name, entry.value)?;
        }

        Ok(())
    }

    /// The raw value text last loaded for `name`, registered or not.
    pub fn loaded_value(&self, name: &str) -> Option<&str> {
        self.loaded.get(name).map(LoadedSetting::value)
    }

    /// The full entry last loaded for `name`, including its comment block.
    pub fn loaded(&self, name: &str) -> Option<&LoadedSetting> {
        self.loaded.get(name)
    }
}

/// The file a save should replace: the final target when `path` is an
/// existing symlink, `path` itself otherwise.
fn resolve_target(path: &Path) -> PathBuf {
    match fs::canonicalize(path) {
        Ok(real) => {
            if real.as_path() != path {
                trace!("Saving through '{}' to '{}'", path.display(), real.display());
            }
            real
        }
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::registry::{SettingHandle, handle};
    use crate::core::setting::Setting;
    use tempfile::tempdir;

    struct Fixture {
        registry: Registry,
        save: SettingHandle,
        lines: SettingHandle,
        dupes: SettingHandle,
        input: SettingHandle,
    }

    fn fixture() -> Fixture {
        let save = handle(Setting::boolean("history.save", "Save history", true));
        let lines = handle(Setting::integer("history.max_lines", "Max history lines", 100));
        let dupes = handle(Setting::enumeration(
            "history.dupe_mode",
            "Duplicate handling",
            "add,ignore,erase_prev",
            2,
        ));
        let input = handle(Setting::color("color.input", "Input color", "bright yellow"));

        let mut registry = Registry::new();
        for setting in [&save, &lines, &dupes, &input] {
            registry.register(setting).unwrap();
        }
        Fixture {
            registry,
            save,
            lines,
            dupes,
            input,
        }
    }

    fn render(registry: &mut Registry) -> String {
        let mut out = Vec::new();
        registry.write_to(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_load_missing_file_leaves_settings_untouched() {
        let mut fx = fixture();
        assert!(fx.lines.borrow_mut().set("5"));

        let dir = tempdir().unwrap();
        let result = fx.registry.load(&dir.path().join("missing"));

        assert!(matches!(result, Err(PersistenceError::Read { .. })));
        assert_eq!(fx.lines.borrow().as_int(), Some(5));
    }

    #[test]
    fn test_load_empty_file_fails() {
        let mut fx = fixture();
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings");
        fs::write(&path, "").unwrap();

        assert!(matches!(
            fx.registry.load(&path),
            Err(PersistenceError::Empty(_))
        ));
    }

    #[test]
    fn test_load_resets_then_applies_values() {
        let mut fx = fixture();
        assert!(fx.lines.borrow_mut().set("5"));

        fx.registry
            .load_str("history.save = off\r\ncolor.input = red on blue\r\n");

        assert_eq!(fx.save.borrow().as_bool(), Some(false));
        assert_eq!(fx.lines.borrow().as_int(), Some(100));
        assert_eq!(fx.input.borrow().color_code(), Some("31;44"));
    }

    #[test]
    fn test_load_ignores_invalid_values_but_remembers_them() {
        let mut fx = fixture();
        fx.registry.load_str("history.max_lines = lots\n");

        assert_eq!(fx.lines.borrow().as_int(), Some(100));
        assert_eq!(fx.registry.loaded_value("history.max_lines"), Some("lots"));
    }

    #[test]
    fn test_load_trims_key_and_leading_value_whitespace() {
        let mut fx = fixture();
        fx.registry.load_str("   history.max_lines \t=   42  \n");

        assert_eq!(fx.lines.borrow().as_int(), Some(42));
        assert_eq!(fx.registry.loaded_value("history.max_lines"), Some("42  "));
    }

    #[test]
    fn test_load_splits_at_first_equals_sign() {
        let mut fx = fixture();
        fx.registry.load_str("prompt.format = a=b\n");
        assert_eq!(fx.registry.loaded_value("prompt.format"), Some("a=b"));
    }

    #[test]
    fn test_later_duplicate_key_wins() {
        let mut fx = fixture();
        fx.registry.load_str("x = 1\nx = 2\n");
        assert_eq!(fx.registry.loaded_value("x"), Some("2"));
    }

    #[test]
    fn test_comment_block_attaches_to_next_entry() {
        let mut fx = fixture();
        fx.registry
            .load_str("# orphan\nstray line\n# first\n\n  # second\nx = 1\ny = 2\n");

        assert_eq!(fx.registry.loaded("x").unwrap().comment(), "# first\n# second\n");
        assert_eq!(fx.registry.loaded("y").unwrap().comment(), "");
    }

    #[test]
    fn test_save_writes_only_modified_settings() {
        let mut fx = fixture();
        assert!(fx.dupes.borrow_mut().set("ignore"));
        assert!(fx.input.borrow_mut().set("bright red on blue"));

        let expected = "\
# name: Input color
# type: color
color.input = bright red on blue

# name: Duplicate handling
# type: enum
# options: add,ignore,erase_prev
history.dupe_mode = ignore

";
        assert_eq!(render(&mut fx.registry), expected);
    }

    #[test]
    fn test_saving_defaults_writes_nothing() {
        let mut fx = fixture();
        fx.registry
            .load_str("history.save = True\nhistory.max_lines = 100\n");

        assert_eq!(render(&mut fx.registry), "");
    }

    #[test]
    fn test_unregistered_entries_are_preserved() {
        let mut fx = fixture();
        let file = "\
# name: Save history
# type: boolean
history.save = False

# name: x
x = 5
";
        fx.registry.load_str(file);

        let expected = "\
# name: Save history
# type: boolean
history.save = False


# name: x
x = 5

";
        let first = render(&mut fx.registry);
        assert_eq!(first, expected);

        // A second load/save cycle reproduces the same file.
        fx.registry.load_str(&first);
        assert_eq!(render(&mut fx.registry), expected);
    }

    #[test]
    fn test_entry_of_dropped_setting_survives_save() {
        let mut fx = fixture();
        fx.registry.load_str("# keep me\nhistory.max_lines = 7\n");
        assert_eq!(fx.lines.borrow().as_int(), Some(7));

        drop(fx.lines);

        assert_eq!(
            render(&mut fx.registry),
            "\n# keep me\nhistory.max_lines = 7\n\n"
        );
    }

    #[test]
    fn test_save_and_load_through_file() {
        let mut fx = fixture();
        assert!(fx.lines.borrow_mut().set("2500"));
        assert!(fx.save.borrow_mut().set("no"));

        let dir = tempdir().unwrap();
        let path = dir.path().join("settings");
        fx.registry.save(&path).unwrap();

        let mut other = fixture();
        other.registry.load(&path).unwrap();
        assert_eq!(other.lines.borrow().as_int(), Some(2500));
        assert_eq!(other.save.borrow().as_bool(), Some(false));
        assert!(other.dupes.borrow().is_default());
    }

    #[test]
    fn test_load_rejects_non_utf8_file() {
        let mut fx = fixture();
        assert!(fx.lines.borrow_mut().set("5"));

        let dir = tempdir().unwrap();
        let path = dir.path().join("settings");
        let bytes: &[u8] = b"# name: greeting\nlua.greeting = caf\xe9\n";
        fs::write(&path, bytes).unwrap();

        assert!(matches!(
            fx.registry.load(&path),
            Err(PersistenceError::InvalidUtf8 { .. })
        ));
        assert_eq!(fx.lines.borrow().as_int(), Some(5));
        assert_eq!(fx.registry.loaded_value("lua.greeting"), None);
        assert_eq!(fs::read(&path).unwrap(), bytes);
    }

    #[cfg(unix)]
    #[test]
    fn test_save_writes_through_symlink() {
        let mut fx = fixture();
        let dir = tempdir().unwrap();
        let real = dir.path().join("dotfiles_settings");
        let link = dir.path().join("settings");
        fs::write(&real, "# name: x\nx = 5\n").unwrap();
        std::os::unix::fs::symlink(&real, &link).unwrap();

        fx.registry.load(&link).unwrap();
        assert!(fx.lines.borrow_mut().set("42"));
        fx.registry.save(&link).unwrap();

        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        let contents = fs::read_to_string(&real).unwrap();
        assert!(contents.contains("history.max_lines = 42\n"));
        assert!(contents.contains("# name: x\nx = 5\n"));
    }

    #[cfg(unix)]
    #[test]
    fn test_save_keeps_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let mut fx = fixture();
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings");
        fs::write(&path, "x = 1\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        fx.registry.load(&path).unwrap();
        fx.registry.save(&path).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let mut fx = fixture();
        let dir = tempdir().unwrap();
        let path = dir.path().join("no").join("such").join("settings");

        assert!(matches!(
            fx.registry.save(&path),
            Err(PersistenceError::Write { .. })
        ));
    }
}
