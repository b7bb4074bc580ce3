//! Terminal sizing and resize-timing configuration.

use serde::{Deserialize, Serialize};

/// Terminal configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    /// Grid size used before the first fit (valid range: 10-500).
    pub default_cols: u16,
    /// Valid range: 2-500.
    pub default_rows: u16,
    /// Animation frames to wait after mount before the first fit (valid range: 2-10).
    pub fit_frames: u8,
    /// Cell width in pixels, used to convert a pane box into columns.
    pub cell_width: f64,
    /// Cell height in pixels, used to convert a pane box into rows.
    pub cell_height: f64,
    /// Scrollback retained per backend session, in bytes.
    pub scrollback_bytes: usize,
    /// Shell override. Falls back to `$SHELL`.
    pub shell: Option<String>,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            default_cols: 80,
            default_rows: 24,
            fit_frames: 2,
            cell_width: 8.0,
            cell_height: 17.0,
            scrollback_bytes: 256 * 1024,
            shell: None,
        }
    }
}

/// Resize suppression windows around session creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizeConfig {
    /// Observations are dropped for this long after create/reconnect.
    pub suppress_ms: u64,
    /// A single catch-up fit runs this long after create/reconnect.
    /// Must be later than `suppress_ms`.
    pub deferred_fit_ms: u64,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            suppress_ms: 500,
            deferred_fit_ms: 550,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_config_partial_toml() {
        let config: TerminalConfig = toml::from_str("default_cols = 132\nshell = \"/bin/zsh\"").unwrap();
        assert_eq!(config.default_cols, 132);
        assert_eq!(config.shell.as_deref(), Some("/bin/zsh"));
        assert_eq!(config.default_rows, 24);
        assert_eq!(config.fit_frames, 2);
    }

    #[test]
    fn resize_defaults() {
        let config = ResizeConfig::default();
        assert_eq!(config.suppress_ms, 500);
        assert_eq!(config.deferred_fit_ms, 550);
    }
}
