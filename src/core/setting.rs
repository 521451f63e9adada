// src/core/setting.rs

//! # Settings
//!
//! A [`Setting`] is one named, typed configuration value with a default and a
//! current value. Every variant reads its value from text (`set`) and renders
//! it back (`get`, `descriptive`), which is how the settings file and the CLI
//! talk to it.

use crate::core::color::{self, ColorError};
use log::{debug, warn};
use std::fmt;
use thiserror::Error;

const TRUE_WORDS: [&str; 3] = ["true", "on", "yes"];
const FALSE_WORDS: [&str; 3] = ["false", "off", "no"];

/// The value type of a setting, as written in the `# type:` line of the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingType {
    /// `True`/`False`.
    Bool,
    /// A signed 32-bit integer.
    Int,
    /// Free text, stored verbatim.
    String,
    /// One option out of a comma-separated list.
    Enum,
    /// An SGR attribute code, written as a color description.
    Color,
}

impl SettingType {
    /// The name used in the `# type:` line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bool => "boolean",
            Self::Int => "integer",
            Self::String => "string",
            Self::Enum => "enum",
            Self::Color => "color",
        }
    }
}

impl fmt::Display for SettingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a value was rejected by [`Setting::try_set`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SetError {
    /// Not a boolean word and not a number.
    #[error("'{0}' is not a boolean (use true/false, on/off, yes/no or a number).")]
    InvalidBool(String),
    /// Does not start with a digit or `-`.
    #[error("'{0}' is not an integer.")]
    InvalidInt(String),
    /// No option of the enum is a prefix of the value.
    #[error("'{value}' does not match any of the options '{options}'.")]
    InvalidOption { value: String, options: String },
    /// The color description did not encode.
    #[error("Invalid color: {0}")]
    InvalidColor(#[from] ColorError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Stored<T> {
    default: T,
    value: T,
}

impl<T: Clone + PartialEq> Stored<T> {
    fn new(default: T) -> Self {
        Self {
            value: default.clone(),
            default,
        }
    }

    fn is_default(&self) -> bool {
        self.value == self.default
    }

    fn reset(&mut self) {
        self.value = self.default.clone();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Store {
    Bool(Stored<bool>),
    Int(Stored<i32>),
    Str(Stored<String>),
    /// `options` is the comma-separated option list; the value is an index into it.
    Enum { options: String, index: Stored<usize> },
    /// Holds the encoded attribute code, never the description.
    Color(Stored<String>),
}

/// A named, typed configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setting {
    name: String,
    short_desc: String,
    long_desc: String,
    store: Store,
}

impl Setting {
    fn with_store(name: String, short_desc: String, store: Store) -> Self {
        Self {
            name,
            short_desc,
            long_desc: String::new(),
            store,
        }
    }

    /// Creates a boolean setting.
    pub fn boolean(name: impl Into<String>, short_desc: impl Into<String>, default: bool) -> Self {
        Self::with_store(name.into(), short_desc.into(), Store::Bool(Stored::new(default)))
    }

    /// Creates an integer setting.
    pub fn integer(name: impl Into<String>, short_desc: impl Into<String>, default: i32) -> Self {
        Self::with_store(name.into(), short_desc.into(), Store::Int(Stored::new(default)))
    }

    /// Creates a free-text setting.
    pub fn string(
        name: impl Into<String>,
        short_desc: impl Into<String>,
        default: impl Into<String>,
    ) -> Self {
        Self::with_store(
            name.into(),
            short_desc.into(),
            Store::Str(Stored::new(default.into())),
        )
    }

    /// Creates an enum setting. `options` is a comma-separated list and
    /// `default_index` points into it.
    pub fn enumeration(
        name: impl Into<String>,
        short_desc: impl Into<String>,
        options: impl Into<String>,
        default_index: usize,
    ) -> Self {
        Self::with_store(
            name.into(),
            short_desc.into(),
            Store::Enum {
                options: options.into(),
                index: Stored::new(default_index),
            },
        )
    }

    /// Creates a color setting from a default *description* such as
    /// `"bright yellow"`. The description is encoded once, here.
    pub fn color(name: impl Into<String>, short_desc: impl Into<String>, default: &str) -> Self {
        let name: String = name.into();
        let encoded = color::encode(default);
        debug_assert!(
            encoded.is_ok(),
            "default color '{}' of setting '{}' is invalid",
            default,
            name
        );
        let code = encoded.unwrap_or_else(|e| {
            warn!("Default color '{}' of setting '{}' is invalid: {}", default, name, e);
            String::new()
        });
        Self::with_store(name, short_desc.into(), Store::Color(Stored::new(code)))
    }

    /// Attaches the long, multi-line description shown by `show`.
    pub fn with_long_desc(mut self, long_desc: impl Into<String>) -> Self {
        self.long_desc = long_desc.into();
        self
    }

    /// The dotted name, e.g. `history.save`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// One-line description, written as the `# name:` comment.
    pub fn short_desc(&self) -> &str {
        &self.short_desc
    }

    /// Multi-line description. Empty unless one was attached.
    pub fn long_desc(&self) -> &str {
        &self.long_desc
    }

    /// The value type of this setting.
    pub fn setting_type(&self) -> SettingType {
        match self.store {
            Store::Bool(_) => SettingType::Bool,
            Store::Int(_) => SettingType::Int,
            Store::Str(_) => SettingType::String,
            Store::Enum { .. } => SettingType::Enum,
            Store::Color(_) => SettingType::Color,
        }
    }

    /// Parses `text` into the current value.
    ///
    /// # Errors
    /// Returns a [`SetError`] and leaves the current value untouched when the
    /// text is not valid for this setting's type.
    pub fn try_set(&mut self, text: &str) -> Result<(), SetError> {
        match &mut self.store {
            Store::Bool(stored) => {
                stored.value =
                    parse_bool(text).ok_or_else(|| SetError::InvalidBool(text.to_string()))?;
            }
            Store::Int(stored) => {
                stored.value =
                    parse_int(text).ok_or_else(|| SetError::InvalidInt(text.to_string()))?;
            }
            Store::Str(stored) => stored.value = text.to_string(),
            Store::Enum { options, index } => {
                index.value =
                    option_index(options, text).ok_or_else(|| SetError::InvalidOption {
                        value: text.to_string(),
                        options: options.clone(),
                    })?;
            }
            Store::Color(stored) => stored.value = color::encode(text)?,
        }
        Ok(())
    }

    /// Like [`Setting::try_set`], reporting only whether the value was accepted.
    pub fn set(&mut self, text: &str) -> bool {
        match self.try_set(text) {
            Ok(()) => true,
            Err(e) => {
                debug!("Rejected value for setting '{}': {}", self.name, e);
                false
            }
        }
    }

    /// Restores the default value.
    pub fn reset(&mut self) {
        match &mut self.store {
            Store::Bool(stored) => stored.reset(),
            Store::Int(stored) => stored.reset(),
            Store::Str(stored) | Store::Color(stored) => stored.reset(),
            Store::Enum { index, .. } => index.reset(),
        }
    }

    /// Whether the current value equals the default.
    pub fn is_default(&self) -> bool {
        match &self.store {
            Store::Bool(stored) => stored.is_default(),
            Store::Int(stored) => stored.is_default(),
            Store::Str(stored) | Store::Color(stored) => stored.is_default(),
            Store::Enum { index, .. } => index.is_default(),
        }
    }

    /// Formats the current value. Color settings return their attribute code.
    pub fn get(&self) -> String {
        match &self.store {
            Store::Bool(stored) => String::from(if stored.value { "True" } else { "False" }),
            Store::Int(stored) => stored.value.to_string(),
            Store::Str(stored) | Store::Color(stored) => stored.value.clone(),
            Store::Enum { options, index } => split_options(options)
                .nth(index.value)
                .unwrap_or_default()
                .to_string(),
        }
    }

    /// Formats the current value the way the settings file stores it.
    /// Color settings return their description rather than the code.
    pub fn descriptive(&self) -> String {
        match &self.store {
            Store::Color(stored) => color::decode(&stored.value),
            _ => self.get(),
        }
    }

    /// The default value, formatted like [`Setting::descriptive`].
    pub fn default_descriptive(&self) -> String {
        let mut pristine = self.clone();
        pristine.reset();
        pristine.descriptive()
    }

    /// The current value of a boolean setting.
    pub fn as_bool(&self) -> Option<bool> {
        match &self.store {
            Store::Bool(stored) => Some(stored.value),
            _ => None,
        }
    }

    /// The current value of an integer setting.
    pub fn as_int(&self) -> Option<i32> {
        match &self.store {
            Store::Int(stored) => Some(stored.value),
            _ => None,
        }
    }

    /// The current value of a string setting.
    pub fn as_str(&self) -> Option<&str> {
        match &self.store {
            Store::Str(stored) => Some(&stored.value),
            _ => None,
        }
    }

    /// The index of the selected option of an enum setting.
    pub fn enum_index(&self) -> Option<usize> {
        match &self.store {
            Store::Enum { index, .. } => Some(index.value),
            _ => None,
        }
    }

    /// The comma-separated option list of an enum setting.
    pub fn options(&self) -> Option<&str> {
        match &self.store {
            Store::Enum { options, .. } => Some(options),
            _ => None,
        }
    }

    /// The SGR attribute code of a color setting.
    pub fn color_code(&self) -> Option<&str> {
        match &self.store {
            Store::Color(stored) => Some(&stored.value),
            _ => None,
        }
    }
}

/// Mirrors C's `atoi`: reads an optional `-` and the leading digits, ignores
/// anything after them, and saturates at the `i32` range.
fn leading_int(text: &str) -> i32 {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let magnitude = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, b| {
            acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
        });
    let value = if negative { -magnitude } else { magnitude };
    let clamped = value.clamp(i64::from(i32::MIN), i64::from(i32::MAX));
    i32::try_from(clamped).unwrap_or_default()
}

fn parse_bool(text: &str) -> Option<bool> {
    if TRUE_WORDS.iter().any(|w| text.eq_ignore_ascii_case(w)) {
        return Some(true);
    }
    if FALSE_WORDS.iter().any(|w| text.eq_ignore_ascii_case(w)) {
        return Some(false);
    }
    if text.starts_with(|c: char| c.is_ascii_digit()) {
        return Some(leading_int(text) != 0);
    }
    None
}

fn parse_int(text: &str) -> Option<i32> {
    if text.starts_with(|c: char| c.is_ascii_digit() || c == '-') {
        Some(leading_int(text))
    } else {
        None
    }
}

/// Iterates the options of a comma-separated list. A trailing comma does not
/// add an empty option; empty options elsewhere are kept.
fn split_options(options: &str) -> impl Iterator<Item = &str> {
    let body = options.strip_suffix(',').unwrap_or(options);
    body.split(',').filter(move |_| !options.is_empty())
}

/// First option, in declared order, that `value` starts with
/// (case-insensitive). The whole option must be present in `value`.
fn option_index(options: &str, value: &str) -> Option<usize> {
    split_options(options).position(|option| {
        value
            .as_bytes()
            .get(..option.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(option.as_bytes()))
    })
}
