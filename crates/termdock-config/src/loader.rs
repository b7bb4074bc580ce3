//! TOML config loading: read from a path or the platform default.

use std::path::{Path, PathBuf};

use termdock_common::ConfigError;
use tracing::{info, warn};

use crate::schema::TermdockConfig;
use crate::validation;

/// Get the platform-specific default config file path.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::ParseError("could not determine config directory".into()))?;
    Ok(config_dir.join("termdock").join("config.toml"))
}

/// Load config from a specific TOML file path.
///
/// Missing fields use serde defaults. A missing file is reported as
/// `FileNotFound`; validation problems are returned as `ValidationError`.
pub fn load_from_path(path: &Path) -> Result<TermdockConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError(format!("failed to read {}: {e}", path.display())))?;

    let config: TermdockConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    validation::validate(&config)?;

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load config from the platform default path, writing a default file
/// there on first run.
pub fn load_default() -> Result<TermdockConfig, ConfigError> {
    let path = default_config_path()?;

    match load_from_path(&path) {
        Ok(config) => Ok(config),
        Err(ConfigError::FileNotFound(_)) => {
            info!("no config found at {}, creating default", path.display());
            let config = TermdockConfig::default();
            if let Err(e) = save_config_to_path(&config, &path) {
                warn!("could not write default config: {e}");
            }
            Ok(config)
        }
        Err(e) => Err(e),
    }
}

/// Serialize `config` as TOML and write it to `path`, creating parent dirs.
pub fn save_config_to_path(config: &TermdockConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ConfigError::ParseError(format!(
                "failed to create config directory {}: {e}",
                parent.display()
            ))
        })?;
    }

    let content = toml::to_string_pretty(config)
        .map_err(|e| ConfigError::ParseError(format!("failed to serialize config: {e}")))?;

    std::fs::write(path, content).map_err(|e| {
        ConfigError::ParseError(format!("failed to write config to {}: {e}", path.display()))
    })?;

    info!("wrote config to {}", path.display());
    Ok(())
}
