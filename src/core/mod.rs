// src/core/mod.rs

/// Settings the tool declares for itself.
pub mod builtin;
/// Color description codec.
pub mod color;
/// Settings file location.
pub mod paths;
/// Loading and saving the settings file.
pub mod persistence;
/// The catalog of live settings.
pub mod registry;
/// Typed settings.
pub mod setting;
