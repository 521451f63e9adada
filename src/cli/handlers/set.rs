// src/cli/handlers/set.rs

use anyhow::{Result, anyhow};
use clap::Parser;

use crate::{cli::handlers::commons, state::AppState};

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Changes a setting and saves the settings file.")]
struct SetArgs {
    /// The setting to change.
    name: String,

    /// The new value. Multiple words are joined with spaces, so color
    /// descriptions need no quoting.
    #[arg(
        required = true,
        num_args = 1..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    value: Vec<String>,
}

/// The main handler for the `set` command.
pub fn handle(args: Vec<String>, state: &mut AppState) -> Result<()> {
    let set_args = SetArgs::try_parse_from(&args)?;
    let handle = commons::find_setting(state, &set_args.name)?;
    let value = set_args.value.join(" ");

    handle.borrow_mut().try_set(&value).map_err(|e| {
        anyhow!(format!(
            t!("error.invalid_value"),
            name = set_args.name,
            reason = e
        ))
    })?;
    log::debug!("Setting '{}' changed to '{}'", set_args.name, value);

    state.mark_dirty();
    state.commit()?;
    commons::print_assignment(&handle);
    Ok(())
}
