use std::time::Duration;

use termdock_common::GridSize;
use termdock_config::TermdockConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Waiting for layout, or for the create reply.
    Connecting,
    /// Reconnected; waiting for the scrollback snapshot.
    Replaying,
    Live,
    /// Terminal. Later replies and timers are ignored.
    Disposed,
}

/// How the backend answered the create request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOrigin {
    Created,
    Reconnected,
    /// The create request failed. The session may still exist, so the pane
    /// keeps forwarding input and resizes; it just has no history.
    Unconfirmed,
}

/// Signals for the host, returned by the connector's handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectorEvent {
    /// The backend acknowledged create or reconnect. Resize suppression
    /// starts here.
    Attached(SessionOrigin),
    /// Text that was just rendered, for output observers.
    Output(String),
    /// The queued command was submitted.
    CommandSent { text: String, processing: bool },
    Exited(Option<u32>),
}

#[derive(Debug, Clone)]
pub struct ConnectorConfig {
    pub fit_frames: u8,
    /// Size used when the pane box cannot be fit at mount.
    pub default_size: GridSize,
    pub command_send_delay: Duration,
    /// Command names that toggle the processing indicator.
    pub processing_commands: Vec<String>,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self::from_config(&TermdockConfig::default())
    }
}

impl ConnectorConfig {
    pub fn from_config(config: &TermdockConfig) -> Self {
        Self {
            fit_frames: config.terminal.fit_frames,
            default_size: GridSize::new(config.terminal.default_cols, config.terminal.default_rows),
            command_send_delay: Duration::from_millis(config.commands.send_delay_ms),
            processing_commands: config.commands.processing_commands.clone(),
        }
    }

    /// `true` when the first word of `text` (path stripped) is listed.
    pub fn is_processing_command(&self, text: &str) -> bool {
        let Some(word) = text.split_whitespace().next() else {
            return false;
        };
        let name = word.rsplit('/').next().unwrap_or(word);
        self.processing_commands
            .iter()
            .any(|c| c.eq_ignore_ascii_case(name))
    }
}
