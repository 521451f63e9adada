// src/constants.rs

/// The name of the shellset directory inside the system config directory.
pub const CONFIG_DIR_NAME: &str = "shellset";

/// The name of the settings file inside the shellset config directory.
pub const SETTINGS_FILENAME: &str = "settings";

/// Environment variable that overrides the settings file location.
pub const SETTINGS_PATH_ENV: &str = "SHELLSET_SETTINGS";
