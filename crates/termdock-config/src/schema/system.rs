//! System configuration: logging, queued commands, and persistence.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Log level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
}

impl LogLevel {
    /// `tracing_subscriber::EnvFilter` directive for this level.
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Debug => "termdock=debug",
            LogLevel::Info => "termdock=info",
            LogLevel::Warning => "termdock=warn",
            LogLevel::Error => "termdock=error",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}

/// "Run this command now" behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandsConfig {
    /// Delay between the first output of a fresh pane and submitting its
    /// queued command, so the prompt is interactive (valid range: 0-10000).
    pub send_delay_ms: u64,
    /// Commands whose first word matches one of these raise the
    /// "processing" indicator when submitted.
    pub processing_commands: Vec<String>,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            send_delay_ms: 400,
            processing_commands: vec!["claude".into()],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    /// Directory for per-project layout files. Defaults to the platform data dir.
    pub layout_dir: Option<PathBuf>,
}

impl PersistenceConfig {
    pub fn resolved_layout_dir(&self) -> Option<PathBuf> {
        self.layout_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join("termdock").join("layouts")))
    }
}
