// src/cli/handlers/show.rs

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use crate::{cli::handlers::commons, state::AppState};

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Displays everything known about a setting.")]
struct ShowArgs {
    /// The setting to describe.
    name: String,
}

/// The main handler for the `show` command.
pub fn handle(args: Vec<String>, state: &mut AppState) -> Result<()> {
    let show_args = ShowArgs::try_parse_from(&args)?;
    let handle = commons::find_setting(state, &show_args.name)?;
    let setting = handle.borrow();

    println!("\n--- {} ---", setting.name().yellow());
    println!(
        "  {:<13} {}",
        t!("show.label.description").blue(),
        setting.short_desc()
    );
    println!("  {:<13} {}", t!("show.label.type").blue(), setting.setting_type());
    if let Some(options) = setting.options() {
        println!(
            "  {:<13} {}",
            t!("show.label.options").blue(),
            options.replace(',', ", ")
        );
    }
    println!(
        "  {:<13} {}",
        t!("show.label.value").blue(),
        setting.descriptive().bold()
    );
    println!(
        "  {:<13} {}",
        t!("show.label.default").blue(),
        setting.default_descriptive().dimmed()
    );
    if let Some(code) = setting.color_code() {
        println!("  {:<13} {}", t!("show.label.code").blue(), code.dimmed());
    }

    if !setting.long_desc().is_empty() {
        println!("\n  {}", setting.long_desc());
    }
    Ok(())
}
