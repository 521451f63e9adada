// src/cli/handlers/list.rs

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use crate::state::AppState;

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Lists settings and their current values.")]
struct ListArgs {
    /// Only list settings whose name starts with this prefix.
    prefix: Option<String>,

    /// Only list settings that differ from their default.
    #[arg(long, short)]
    modified: bool,
}

/// The main handler for the `list` command.
pub fn handle(args: Vec<String>, state: &mut AppState) -> Result<()> {
    let list_args = ListArgs::try_parse_from(&args)?;
    let prefix = list_args.prefix.as_deref().unwrap_or_default();

    let rows: Vec<(String, String, bool)> = state
        .registry
        .iter()
        .filter_map(|handle| {
            let setting = handle.borrow();
            if !setting.name().starts_with(prefix) {
                return None;
            }
            if list_args.modified && setting.is_default() {
                return None;
            }
            Some((
                setting.name().to_string(),
                setting.descriptive(),
                setting.is_default(),
            ))
        })
        .collect();

    println!(
        "{} {}",
        t!("list.label.file").dimmed(),
        state.path().display().to_string().dimmed()
    );

    if rows.is_empty() {
        println!("{}", format!(t!("list.empty"), prefix = prefix).yellow());
        return Ok(());
    }

    let width = rows.iter().map(|(name, _, _)| name.len()).max().unwrap_or(0);
    for (name, value, is_default) in rows {
        let value = if is_default { value.normal() } else { value.bold() };
        let name = format!("{:<width$}", name, width = width);
        println!("  {}  {}", name.cyan(), value);
    }
    Ok(())
}
