//! Keybind validation utilities.

use std::collections::HashMap;

use termdock_common::ConfigError;

use crate::schema::KeybindConfig;

/// Returns all keybinds as `(name, binding)` pairs.
pub fn all_keybinds(config: &KeybindConfig) -> Vec<(&str, &str)> {
    vec![
        ("split_right", &config.split_right),
        ("split_down", &config.split_down),
        ("close_pane", &config.close_pane),
        ("focus_prev", &config.focus_prev),
        ("focus_next", &config.focus_next),
    ]
}

/// Validate that no two keybinds are mapped to the same key combination.
pub fn validate_no_duplicates(config: &KeybindConfig) -> Result<(), ConfigError> {
    let mut seen: HashMap<String, &str> = HashMap::new();

    for (name, binding) in all_keybinds(config) {
        let normalized = binding.to_lowercase().replace(' ', "");
        if let Some(existing_name) = seen.get(&normalized) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate keybind '{binding}': assigned to both '{existing_name}' and '{name}'"
            )));
        }
        seen.insert(normalized, name);
    }

    Ok(())
}
