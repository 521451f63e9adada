// src/cli/dispatcher.rs

use anyhow::Result;

use crate::{cli::handlers, state::AppState};

/// Defines a CLI action, its aliases, and its handler.
struct CommandDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    handler: fn(Vec<String>, &mut AppState) -> Result<()>,
}

/// The single source of truth for all actions.
static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "clear",
        aliases: &["reset"],
        handler: handlers::clear::handle,
    },
    CommandDefinition {
        name: "list",
        aliases: &["ls"],
        handler: handlers::list::handle,
    },
    CommandDefinition {
        name: "loaded",
        aliases: &[],
        handler: handlers::loaded::handle,
    },
    CommandDefinition {
        name: "set",
        aliases: &[],
        handler: handlers::set::handle,
    },
    CommandDefinition {
        name: "show",
        aliases: &["info"],
        handler: handlers::show::handle,
    },
];

/// Finds a command definition by its name or alias.
fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

/// Routes the positional arguments to a handler.
///
/// - `shellset` lists every setting.
/// - `shellset <action> [args...]` runs the action.
/// - `shellset <name>` shows a setting.
/// - `shellset <name> <value...>` sets it.
pub fn dispatch(all_args: Vec<String>, state: &mut AppState) -> Result<()> {
    log::debug!("Dispatching args: {:?}", all_args);

    let mut args = all_args.into_iter();
    let Some(first) = args.next() else {
        return handlers::list::handle(Vec::new(), state);
    };
    let rest: Vec<String> = args.collect();

    if let Some(command) = find_command(&first) {
        return (command.handler)(rest, state);
    }

    // Not an action, so it names a setting.
    let mut handler_args = vec![first];
    if rest.is_empty() {
        handlers::show::handle(handler_args, state)
    } else {
        handler_args.extend(rest);
        handlers::set::handle(handler_args, state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_find_command_by_name_and_alias() {
        assert_eq!(find_command("list").map(|c| c.name), Some("list"));
        assert_eq!(find_command("ls").map(|c| c.name), Some("list"));
        assert_eq!(find_command("reset").map(|c| c.name), Some("clear"));
        assert!(find_command("history.save").is_none());
    }

    #[test]
    fn test_name_and_value_shortcut_sets_and_saves() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings");
        let mut state = AppState::open(&path).unwrap();

        dispatch(args(&["color.input", "bright", "red", "on", "blue"]), &mut state).unwrap();

        let input = state.registry.find("color.input").unwrap();
        assert_eq!(input.borrow().color_code(), Some("91;44"));
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("color.input = bright red on blue\n"));
    }

    #[test]
    fn test_clear_action_restores_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings");
        let mut state = AppState::open(&path).unwrap();

        dispatch(args(&["set", "history.max_lines", "-5"]), &mut state).unwrap();
        dispatch(args(&["reset", "history.max_lines"]), &mut state).unwrap();

        let lines = state.registry.find("history.max_lines").unwrap();
        assert!(lines.borrow().is_default());
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(!written.contains("history.max_lines"));
    }

    #[test]
    fn test_invalid_value_is_an_error_and_keeps_value() {
        let dir = tempdir().unwrap();
        let mut state = AppState::open(&dir.path().join("settings")).unwrap();

        let result = dispatch(args(&["history.save", "maybe"]), &mut state);

        assert!(result.is_err());
        let save = state.registry.find("history.save").unwrap();
        assert_eq!(save.borrow().as_bool(), Some(true));
        assert!(!state.needs_saving());
    }

    #[test]
    fn test_unknown_setting_is_an_error() {
        let dir = tempdir().unwrap();
        let mut state = AppState::open(&dir.path().join("settings")).unwrap();

        assert!(dispatch(args(&["no.such.setting"]), &mut state).is_err());
        assert!(dispatch(args(&["show", "no.such.setting"]), &mut state).is_err());
    }

    #[test]
    fn test_read_only_actions_succeed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings");
        std::fs::write(&path, "# from an extension\nlua.thing = 1\n").unwrap();
        let mut state = AppState::open(&path).unwrap();

        dispatch(Vec::new(), &mut state).unwrap();
        dispatch(args(&["list", "history", "--modified"]), &mut state).unwrap();
        dispatch(args(&["history.dupe_mode"]), &mut state).unwrap();
        dispatch(args(&["loaded", "lua.thing"]), &mut state).unwrap();
        dispatch(args(&["loaded", "history.save"]), &mut state).unwrap();
        assert!(!state.needs_saving());
    }
}
