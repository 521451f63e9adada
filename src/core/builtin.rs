// src/core/builtin.rs

//! The shell tool's own settings. Extensions declare theirs the same way:
//! build the [`Setting`]s, keep the handles alive, and register them.

use crate::core::registry::{Registry, RegistryError, SettingHandle, handle};
use crate::core::setting::Setting;

/// Handles to every built-in setting. Dropping this removes them from the
/// registry.
#[derive(Debug)]
pub struct BuiltinSettings {
    /// `history.save`
    pub history_save: SettingHandle,
    /// `history.max_lines`
    pub history_max_lines: SettingHandle,
    /// `history.dupe_mode`
    pub history_dupe_mode: SettingHandle,
    /// `match.ignore_case`
    pub match_ignore_case: SettingHandle,
    /// `match.max_rows`
    pub match_max_rows: SettingHandle,
    /// `prompt.transient`
    pub prompt_transient: SettingHandle,
    /// `prompt.prefix`
    pub prompt_prefix: SettingHandle,
    /// `color.input`
    pub color_input: SettingHandle,
    /// `color.prompt`
    pub color_prompt: SettingHandle,
    /// `color.selection`
    pub color_selection: SettingHandle,
}

impl BuiltinSettings {
    /// Declares every built-in setting with its default.
    pub fn new() -> Self {
        Self {
            history_save: handle(
                Setting::boolean("history.save", "Save history between sessions", true)
                    .with_long_desc("Changing this takes effect for new sessions."),
            ),
            history_max_lines: handle(
                Setting::integer("history.max_lines", "Maximum history lines", 10000)
                    .with_long_desc("Zero keeps an unlimited number of lines."),
            ),
            history_dupe_mode: handle(
                Setting::enumeration(
                    "history.dupe_mode",
                    "Sets how duplicate entries are handled",
                    "add,ignore,erase_prev",
                    2,
                )
                .with_long_desc(
                    "'add' always adds the line, 'ignore' skips lines already in the \
                     history, and 'erase_prev' removes earlier copies before adding it.",
                ),
            ),
            match_ignore_case: handle(
                Setting::enumeration("match.ignore_case", "Case insensitive matching", "off,on,relaxed", 2)
                    .with_long_desc("'relaxed' also treats '-' and '_' as equal."),
            ),
            match_max_rows: handle(Setting::integer(
                "match.max_rows",
                "Rows of completions shown before asking",
                0,
            )),
            prompt_transient: handle(Setting::enumeration(
                "prompt.transient",
                "Collapse previous prompts",
                "off,always,same_dir",
                0,
            )),
            prompt_prefix: handle(Setting::string(
                "prompt.prefix",
                "Text inserted before the prompt",
                "",
            )),
            color_input: handle(Setting::color("color.input", "Input text color", "bright yellow")),
            color_prompt: handle(Setting::color("color.prompt", "Prompt color", "")),
            color_selection: handle(Setting::color(
                "color.selection",
                "Selected completion color",
                "bold on blue",
            )),
        }
    }

    fn all(&self) -> [&SettingHandle; 10] {
        [
            &self.history_save,
            &self.history_max_lines,
            &self.history_dupe_mode,
            &self.match_ignore_case,
            &self.match_max_rows,
            &self.prompt_transient,
            &self.prompt_prefix,
            &self.color_input,
            &self.color_prompt,
            &self.color_selection,
        ]
    }

    /// Registers every built-in setting.
    ///
    /// # Errors
    /// Fails on the first name already taken by another live setting.
    pub fn register_all(&self, registry: &mut Registry) -> Result<(), RegistryError> {
        for setting in self.all() {
            registry.register(setting)?;
        }
        Ok(())
    }
}

impl Default for BuiltinSettings {
    fn default() -> Self {
        Self::new()
    }
}
