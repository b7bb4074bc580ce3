use termdock_common::ConfigError;

use super::types::{KeyBind, Modifier};

/// Parse `"Cmd+D"`, `"Ctrl+Shift+T"` or `"Option+Period"` into a [`KeyBind`].
///
/// - `Cmd` / `Command` is `Super` on macOS and `Ctrl` elsewhere
/// - `Option` / `Opt` is `Alt`
/// - `Win` / `Super` / `Meta` is `Super`
///
/// The last token is the key, even when it spells a modifier.
pub fn parse_keybind(s: &str) -> Result<KeyBind, ConfigError> {
    let tokens: Vec<&str> = s.split('+').map(str::trim).collect();
    let Some((key, modifier_tokens)) = tokens.split_last() else {
        return Err(ConfigError::ValidationError("empty keybind".into()));
    };
    if key.is_empty() {
        return Err(ConfigError::ValidationError(format!(
            "keybind '{s}' has no key"
        )));
    }

    let modifiers = modifier_tokens
        .iter()
        .map(|token| {
            normalize_modifier(token).ok_or_else(|| {
                ConfigError::ValidationError(format!("unrecognized modifier '{token}' in '{s}'"))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(KeyBind::new(modifiers, normalize_key_name(key)))
}

fn normalize_modifier(token: &str) -> Option<Modifier> {
    match token.to_lowercase().as_str() {
        "ctrl" | "control" => Some(Modifier::Ctrl),
        "alt" | "option" | "opt" => Some(Modifier::Alt),
        "shift" => Some(Modifier::Shift),
        "cmd" | "command" => {
            if cfg!(target_os = "macos") {
                Some(Modifier::Super)
            } else {
                Some(Modifier::Ctrl)
            }
        }
        "super" | "win" | "meta" => Some(Modifier::Super),
        _ => None,
    }
}

fn normalize_key_name(token: &str) -> String {
    let lower = token.to_lowercase();
    match lower.as_str() {
        "period" => ".".into(),
        "comma" => ",".into(),
        "slash" => "/".into(),
        "bracketleft" | "leftbracket" => "[".into(),
        "bracketright" | "rightbracket" => "]".into(),
        "enter" | "return" => "Enter".into(),
        "escape" | "esc" => "Escape".into(),
        "space" => "Space".into(),
        "tab" => "Tab".into(),
        _ if token.chars().count() == 1 => token.to_uppercase(),
        _ => {
            let mut chars = lower.chars();
            match chars.next() {
                Some(c) => format!("{}{}", c.to_uppercase(), chars.as_str()),
                None => lower,
            }
        }
    }
}
