// src/cli/handlers/clear.rs

use anyhow::Result;
use clap::Parser;

use crate::{cli::handlers::commons, state::AppState};

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Resets a setting to its default value.")]
struct ClearArgs {
    /// The setting to reset.
    name: String,
}

/// The main handler for the `clear` command.
pub fn handle(args: Vec<String>, state: &mut AppState) -> Result<()> {
    let clear_args = ClearArgs::try_parse_from(&args)?;
    let handle = commons::find_setting(state, &clear_args.name)?;

    if handle.borrow().is_default() {
        log::debug!("'{}' already has its default value", clear_args.name);
    } else {
        handle.borrow_mut().reset();
        state.mark_dirty();
        state.commit()?;
    }

    commons::print_assignment(&handle);
    Ok(())
}
