// src/cli/handlers/mod.rs

// One module per CLI action.

/// `clear`: reset settings to their defaults.
pub mod clear;
/// Helpers shared by the handlers.
pub mod commons;
/// `list`: print settings and values.
pub mod list;
/// `loaded`: print raw values from the file.
pub mod loaded;
/// `set`: change a setting and save.
pub mod set;
/// `show`: describe one setting.
pub mod show;
