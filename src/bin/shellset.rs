// src/bin/shellset.rs

use anyhow::Result;
use clap::Parser;
use colored::*;
use shellset::{
    cli::{Cli, dispatcher},
    core::paths,
    state::AppState,
};

/// The main entry point of the `shellset` application.
/// It sets up logging, parses arguments, opens the settings file, dispatches
/// to the correct handler, and performs centralized error handling.
fn main() {
    env_logger::init();

    if let Err(e) = run_cli(Cli::parse()) {
        eprintln!("\n{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);

    let path = paths::resolve_settings_path(cli.file.as_deref())?;
    log::debug!("Using settings file '{}'", path.display());

    let mut state = AppState::open(&path)?;
    dispatcher::dispatch(cli.args, &mut state)
}
