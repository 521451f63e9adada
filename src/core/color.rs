// src/core/color.rs

//! # Color Codec
//!
//! Translates between the color description language users write in their
//! settings file (`"bright red on blue"`) and the compact SGR attribute code a
//! color setting stores (`"91;44"`).
//!
//! Encoding is strict: conflicting or repeated attributes reject the whole
//! description. Decoding never fails; a code it cannot describe is rendered
//! as `sgr <code>`, which encodes back to the same code.

use log::trace;
use thiserror::Error;

/// The eight base colors, in SGR order.
const COLOR_NAMES: [&str; 8] = [
    "black", "red", "green", "yellow", "blue", "magenta", "cyan", "white",
];

/// Decoded suffix meaning "no foreground and no background color".
const DEFAULT_PAIR: &str = "default on default ";
/// Decoded suffix meaning "no background color".
const DEFAULT_BACKGROUND: &str = "on default ";

/// Why a color description was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    /// `ansi`/`sgr` was followed by more than one word.
    #[error("'{0}' takes exactly one code argument.")]
    TooManyArguments(String),
    /// A second `on`.
    #[error("'on' can only be used once.")]
    RepeatedOn,
    /// `normal`/`default` after the slot already got a value.
    #[error("'{0}' conflicts with a color or default already given for the same slot.")]
    ConflictingDefault(String),
    /// `bold` after `on`.
    #[error("'bold' only applies to the foreground.")]
    BoldOnBackground,
    /// A second `bold`, `bright` or `dim` for the same slot.
    #[error("'{0}' conflicts with an earlier bold, bright or dim.")]
    ConflictingBrightness(String),
    /// `underline`/`nounderline` after `on`.
    #[error("'{0}' only applies to the foreground.")]
    UnderlineOnBackground(String),
    /// A second `underline` or `nounderline`.
    #[error("'{0}' conflicts with an earlier underline or nounderline.")]
    ConflictingUnderline(String),
    /// A second color for the same slot.
    #[error("'{0}' conflicts with a color already given for the same slot.")]
    ConflictingColor(String),
    /// A word that matches no keyword.
    #[error("Unknown color keyword '{0}'.")]
    UnknownToken(String),
}

/// The state of one color slot while a description is being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Slot {
    #[default]
    Unset,
    /// `normal` / `default` was given explicitly.
    Default,
    /// Color index: 0..8 for base colors, 8..16 for their bright variants.
    Color(u8),
}

impl Slot {
    fn color(self) -> Option<u8> {
        match self {
            Self::Color(index) => Some(index),
            Self::Unset | Self::Default => None,
        }
    }

    fn brightened(self) -> Self {
        match self {
            Self::Color(index) => Self::Color(index + 8),
            other => other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Target {
    #[default]
    Foreground,
    Background,
}

/// Attribute state accumulated while reading a description left to right.
#[derive(Debug, Default)]
struct ColorSpec {
    fg: Slot,
    bg: Slot,
    bold: Option<bool>,
    bright: Option<bool>,
    underline: Option<bool>,
    target: Target,
}

impl ColorSpec {
    fn active(&self) -> Slot {
        match self.target {
            Target::Foreground => self.fg,
            Target::Background => self.bg,
        }
    }

    fn active_mut(&mut self) -> &mut Slot {
        match self.target {
            Target::Foreground => &mut self.fg,
            Target::Background => &mut self.bg,
        }
    }

    fn apply(&mut self, token: &str) -> Result<(), ColorError> {
        if token.eq_ignore_ascii_case("on") {
            return self.switch_to_background();
        }

        if matches_keyword(token, "normal") || matches_keyword(token, "default") {
            if self.active() != Slot::Unset {
                return Err(ColorError::ConflictingDefault(token.to_string()));
            }
            *self.active_mut() = Slot::Default;
            return Ok(());
        }

        if matches_keyword(token, "bold") {
            if self.target == Target::Background {
                return Err(ColorError::BoldOnBackground);
            }
            if self.bright.is_some() {
                return Err(ColorError::ConflictingBrightness(token.to_string()));
            }
            self.bright = Some(true);
            return Ok(());
        }

        if matches_keyword(token, "bright") || matches_keyword(token, "dim") {
            if self.bright.is_some() {
                return Err(ColorError::ConflictingBrightness(token.to_string()));
            }
            self.bright = Some(matches_keyword(token, "bright"));
            return Ok(());
        }

        if matches_keyword(token, "underline") || matches_keyword(token, "nounderline") {
            if self.target == Target::Background {
                return Err(ColorError::UnderlineOnBackground(token.to_string()));
            }
            if self.underline.is_some() {
                return Err(ColorError::ConflictingUnderline(token.to_string()));
            }
            self.underline = Some(matches_keyword(token, "underline"));
            return Ok(());
        }

        let index = COLOR_NAMES
            .iter()
            .position(|name| matches_keyword(token, name))
            .ok_or_else(|| ColorError::UnknownToken(token.to_string()))?;
        if self.active().color().is_some() {
            return Err(ColorError::ConflictingColor(token.to_string()));
        }
        // COLOR_NAMES has 8 entries, so the index always fits.
        *self.active_mut() = Slot::Color(u8::try_from(index).unwrap_or_default());
        Ok(())
    }

    fn switch_to_background(&mut self) -> Result<(), ColorError> {
        if self.target == Target::Background {
            return Err(ColorError::RepeatedOn);
        }
        if self.fg.color().is_none() {
            self.bold = self.bright;
        } else if self.bright == Some(true) {
            self.fg = self.fg.brightened();
        }
        self.target = Target::Background;
        self.bright = None;
        Ok(())
    }

    /// Closes the last slot and renders the attribute code.
    fn finish(mut self) -> String {
        if self.bright == Some(true) {
            let brightened = self.active().brightened();
            *self.active_mut() = brightened;
        }
        if self.target == Target::Foreground {
            self.bold = self.bright;
        }

        let mut params: Vec<String> = Vec::with_capacity(4);

        // Brightness on a foreground color is carried by the 9x range instead.
        if self.fg.color().is_none() {
            match self.bold {
                Some(true) => params.push("1".to_string()),
                Some(false) => params.push("22".to_string()),
                None => {}
            }
        }

        match self.underline {
            Some(true) => params.push("4".to_string()),
            Some(false) => params.push("24".to_string()),
            None => {}
        }

        params.push(slot_param(self.fg, 30).to_string());
        params.push(slot_param(self.bg, 40).to_string());
        params.join(";")
    }
}

/// SGR parameter for a slot: `base + index`, `base + 60 + index` for bright
/// colors, or `base + 9` when no color was given.
fn slot_param(slot: Slot, base: u32) -> u32 {
    match slot.color() {
        Some(index) if index >= 8 => base + 60 + u32::from(index - 8),
        Some(index) => base + u32::from(index),
        None => base + 9,
    }
}

/// Keywords match on their first three letters, case-insensitively.
fn matches_keyword(token: &str, keyword: &str) -> bool {
    match (token.as_bytes().get(..3), keyword.as_bytes().get(..3)) {
        (Some(head), Some(expected)) => head.eq_ignore_ascii_case(expected),
        _ => false,
    }
}

/// Encodes a color description into an SGR attribute code.
///
/// An empty description encodes to an empty code. A description starting with
/// `ansi` or `sgr` stores the following word verbatim.
///
/// # Errors
/// Returns a [`ColorError`] naming the first conflicting or unknown keyword.
pub fn encode(text: &str) -> Result<String, ColorError> {
    let tokens: Vec<&str> = text.split(' ').filter(|t| !t.is_empty()).collect();

    let Some(first) = tokens.first() else {
        return Ok(String::new());
    };

    if first.eq_ignore_ascii_case("ansi") || first.eq_ignore_ascii_case("sgr") {
        if tokens.len() > 2 {
            return Err(ColorError::TooManyArguments(first.to_string()));
        }
        let raw = tokens.get(1).copied().unwrap_or_default();
        trace!("Storing raw attribute code '{}'", raw);
        return Ok(raw.to_string());
    }

    let mut spec = ColorSpec::default();
    for token in tokens {
        spec.apply(token)?;
    }
    let code = spec.finish();
    trace!("Encoded color '{}' as '{}'", text, code);
    Ok(code)
}

/// The position of each attribute in a describable code. Attributes must
/// appear in this order, at most once each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Category {
    Bold,
    Underline,
    Foreground,
    Background,
    Done,
}

impl Category {
    fn next(self) -> Self {
        match self {
            Self::Bold => Self::Underline,
            Self::Underline => Self::Foreground,
            Self::Foreground => Self::Background,
            Self::Background | Self::Done => Self::Done,
        }
    }
}

fn color_name(offset: u32) -> Option<&'static str> {
    usize::try_from(offset)
        .ok()
        .and_then(|i| COLOR_NAMES.get(i))
        .copied()
}

fn classify(param: u32) -> Option<(Category, String)> {
    let classified = match param {
        1 => (Category::Bold, "bold ".to_string()),
        22 => (Category::Bold, "dim ".to_string()),
        4 => (Category::Underline, "underline ".to_string()),
        24 => (Category::Underline, "nounderline ".to_string()),
        30..=37 => (Category::Foreground, format!("{} ", color_name(param - 30)?)),
        90..=97 => (Category::Foreground, format!("bright {} ", color_name(param - 90)?)),
        39 => (Category::Foreground, "default ".to_string()),
        40..=47 => (Category::Background, format!("on {} ", color_name(param - 40)?)),
        100..=107 => (
            Category::Background,
            format!("on bright {} ", color_name(param - 100)?),
        ),
        49 => (Category::Background, DEFAULT_BACKGROUND.to_string()),
        _ => return None,
    };
    Some(classified)
}

fn parse_param(part: &str) -> Option<u32> {
    if part.is_empty() {
        return None;
    }
    part.bytes().try_fold(0u32, |acc, b| {
        if b.is_ascii_digit() {
            acc.checked_mul(10)?.checked_add(u32::from(b - b'0'))
        } else {
            None
        }
    })
}

/// Removes `suffix` only when something is left in front of it.
fn strip_trailing(text: &mut String, suffix: &str) -> bool {
    if text.len() > suffix.len() && text.ends_with(suffix) {
        text.truncate(text.len() - suffix.len());
        return true;
    }
    false
}

fn describe(code: &str) -> Option<String> {
    let mut out = String::new();
    let mut expected = Category::Bold;

    for part in code.split(';').filter(|p| !p.is_empty()) {
        let (category, text) = classify(parse_param(part)?)?;
        if expected > category {
            return None;
        }
        expected = category.next();
        out.push_str(&text);
    }

    if out.is_empty() || out == DEFAULT_PAIR {
        return Some("default".to_string());
    }
    if !strip_trailing(&mut out, DEFAULT_PAIR) {
        strip_trailing(&mut out, DEFAULT_BACKGROUND);
    }
    out.truncate(out.trim_end_matches(' ').len());
    Some(out)
}

/// Decodes an SGR attribute code into the simplest equivalent description.
///
/// Codes that are not a bold/underline/foreground/background sequence in
/// that order fall back to `sgr <code>`.
pub fn decode(code: &str) -> String {
    if code.is_empty() {
        return String::new();
    }
    describe(code).unwrap_or_else(|| {
        trace!("Attribute code '{}' has no description, using sgr form", code);
        format!("sgr {}", code)
    })
}
