// src/cli/handlers/commons.rs

// Shared helpers for the action handlers.

use anyhow::{Result, anyhow};
use colored::Colorize;

use crate::{core::registry::SettingHandle, state::AppState};

/// How many alternatives an unknown-name error suggests.
const MAX_SUGGESTIONS: usize = 5;

/// Looks up a registered setting, failing with a list of similarly named
/// settings when there is none.
pub fn find_setting(state: &AppState, name: &str) -> Result<SettingHandle> {
    if let Some(setting) = state.registry.find(name) {
        return Ok(setting);
    }

    let needle = name.to_lowercase();
    let suggestions: Vec<String> = state
        .registry
        .iter()
        .map(|s| s.borrow().name().to_string())
        .filter(|candidate| candidate.to_lowercase().contains(&needle))
        .take(MAX_SUGGESTIONS)
        .collect();

    let mut message = format!(t!("error.unknown_setting"), name = name);
    if !suggestions.is_empty() {
        message.push(' ');
        message.push_str(&format!(
            t!("error.suggestions"),
            names = suggestions.join(", ")
        ));
    }
    Err(anyhow!(message))
}

/// Prints `name = value` the way the settings file would store it.
pub fn print_assignment(setting: &SettingHandle) {
    let setting = setting.borrow();
    let value = setting.descriptive();
    let value = if setting.is_default() {
        value.normal()
    } else {
        value.bold()
    };
    println!("{} = {}", setting.name().cyan(), value);
}
