//! termdock configuration.
//!
//! TOML-based configuration with full validation. All sections use
//! sensible defaults so partial configs work out of the box.

pub mod keybinds;
pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{default_config_path, load_default, load_from_path, save_config_to_path};
pub use schema::{TermdockConfig, CONFIG_SCHEMA_VERSION};

use std::path::Path;

use termdock_common::ConfigError;

/// Load from `path` when given, else from the platform default location.
pub fn load_config(path: Option<&Path>) -> Result<TermdockConfig, ConfigError> {
    match path {
        Some(p) => load_from_path(p),
        None => load_default(),
    }
}
