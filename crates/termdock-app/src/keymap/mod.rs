//! Keyboard surface for pane commands.

mod confirm;
mod parse;
mod types;

pub use confirm::{CloseConfirm, ConfirmStep};
pub use parse::parse_keybind;
pub use types::{KeyBind, Modifier};

use termdock_common::ConfigError;
use termdock_config::keybinds::validate_no_duplicates;
use termdock_config::schema::KeybindConfig;
use termdock_tiling::PaneCommand;

/// What a key press resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Run(PaneCommand),
    /// Close was pressed once; waiting for the second press.
    ConfirmClose,
    CloseCancelled,
    /// Not a pane shortcut; belongs to the focused terminal.
    Passthrough,
}

/// Bound shortcuts plus the close-confirmation state.
#[derive(Debug)]
pub struct Keymap {
    bindings: Vec<(KeyBind, PaneCommand)>,
    confirm: CloseConfirm,
}

impl Keymap {
    pub fn from_config(config: &KeybindConfig) -> Result<Self, ConfigError> {
        validate_no_duplicates(config)?;
        let bindings = [
            (&config.split_right, PaneCommand::SplitRight),
            (&config.split_down, PaneCommand::SplitDown),
            (&config.close_pane, PaneCommand::ClosePane),
            (&config.focus_prev, PaneCommand::FocusPrev),
            (&config.focus_next, PaneCommand::FocusNext),
        ]
        .into_iter()
        .map(|(s, cmd)| parse_keybind(s).map(|kb| (kb, cmd)))
        .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            bindings,
            confirm: CloseConfirm::default(),
        })
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn command_for(&self, key: &KeyBind) -> Option<PaneCommand> {
        self.bindings
            .iter()
            .find(|(kb, _)| kb == key)
            .map(|(_, cmd)| *cmd)
    }

    pub fn close_pending(&self) -> bool {
        self.confirm.is_armed()
    }

    pub fn handle(&mut self, key: &KeyBind) -> KeyAction {
        if key.is_escape() {
            return match self.confirm.press_escape() {
                ConfirmStep::Cancelled => KeyAction::CloseCancelled,
                _ => KeyAction::Passthrough,
            };
        }
        match self.command_for(key) {
            Some(PaneCommand::ClosePane) => match self.confirm.press_close() {
                ConfirmStep::Confirmed => KeyAction::Run(PaneCommand::ClosePane),
                _ => KeyAction::ConfirmClose,
            },
            Some(cmd) => {
                self.confirm.reset();
                KeyAction::Run(cmd)
            }
            None => {
                self.confirm.reset();
                KeyAction::Passthrough
            }
        }
    }
}
