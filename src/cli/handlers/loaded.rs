// src/cli/handlers/loaded.rs

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use crate::state::AppState;

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Shows the raw text read from the settings file for a name, registered or not."
)]
struct LoadedArgs {
    /// The name as it appears in the settings file.
    name: String,
}

/// The main handler for the `loaded` command.
pub fn handle(args: Vec<String>, state: &mut AppState) -> Result<()> {
    let loaded_args = LoadedArgs::try_parse_from(&args)?;

    let Some(entry) = state.registry.loaded(&loaded_args.name) else {
        println!(
            "{}",
            format!(t!("loaded.not_found"), name = loaded_args.name).yellow()
        );
        return Ok(());
    };

    if !entry.comment().is_empty() {
        print!("{}", entry.comment().dimmed());
    }
    println!("{} = {}", loaded_args.name.cyan(), entry.value());

    if state.registry.find(&loaded_args.name).is_none() {
        println!("{}", t!("loaded.unregistered").dimmed());
    }
    Ok(())
}
