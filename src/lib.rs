//! Typed shell settings: a registry of named settings, a color description
//! codec and a settings file that keeps entries nobody registered.

include!(concat!(env!("OUT_DIR"), "/translations.rs"));

/// Command-line surface.
pub mod cli;
/// File and environment names.
pub mod constants;
/// Settings, registry, color codec and persistence.
pub mod core;
/// Per-invocation application state.
pub mod state;
