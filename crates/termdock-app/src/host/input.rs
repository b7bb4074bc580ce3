//! Line-oriented control input for the headless host.

use termdock_common::ConfigError;

use crate::keymap::{parse_keybind, KeyBind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostInput {
    /// `:key <combo>`, a shortcut press.
    Key(KeyBind),
    /// `:run <command>`
    Run(String),
    /// `:resize`
    Refit,
    /// `:sidebar`
    ToggleSidebar,
    /// `:quit` or end of input.
    Quit,
    /// Anything else goes to the focused shell, with a carriage return.
    Line(String),
}

pub fn parse_line(line: &str) -> Result<HostInput, ConfigError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let Some(rest) = line.strip_prefix(':') else {
        return Ok(HostInput::Line(line.to_string()));
    };
    let (verb, arg) = rest.split_once(' ').unwrap_or((rest, ""));
    let arg = arg.trim();
    match verb {
        "key" => parse_keybind(arg).map(HostInput::Key),
        "run" if !arg.is_empty() => Ok(HostInput::Run(arg.to_string())),
        "resize" => Ok(HostInput::Refit),
        "sidebar" => Ok(HostInput::ToggleSidebar),
        "quit" | "q" => Ok(HostInput::Quit),
        _ => Ok(HostInput::Line(line.to_string())),
    }
}
