//! Pane keyboard shortcuts.
//!
//! Named `keybind_config` to avoid clash with the crate-level `keybinds` module.

use serde::{Deserialize, Serialize};

/// Format: "Modifier+Key" where Modifier is one of: Cmd, Option, Control, Shift.
/// `Cmd` means Super on macOS and Ctrl elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeybindConfig {
    pub split_right: String,
    pub split_down: String,
    pub close_pane: String,
    pub focus_prev: String,
    pub focus_next: String,
}

impl Default for KeybindConfig {
    fn default() -> Self {
        Self {
            split_right: "Cmd+D".into(),
            split_down: "Cmd+Shift+D".into(),
            close_pane: "Cmd+W".into(),
            focus_prev: "Cmd+[".into(),
            focus_next: "Cmd+]".into(),
        }
    }
}
