//! Configuration schema types for termdock.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod detector;
mod keybind_config;
mod system;
mod terminal;

pub use detector::*;
pub use keybind_config::*;
pub use system::*;
pub use terminal::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration. Only override what you want to change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TermdockConfig {
    pub logging: LoggingConfig,
    pub terminal: TerminalConfig,
    pub resize: ResizeConfig,
    pub detector: DetectorConfig,
    pub probe: ProbeConfig,
    pub commands: CommandsConfig,
    pub keybinds: KeybindConfig,
    pub persistence: PersistenceConfig,
}
