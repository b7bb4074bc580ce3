/// A keyboard modifier key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Modifier {
    Ctrl,
    /// Option on macOS.
    Alt,
    Shift,
    /// Cmd on macOS, Win on Windows.
    Super,
}

/// Zero or more modifiers (sorted, no duplicates) and a normalized key name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub modifiers: Vec<Modifier>,
    pub key: String,
}

impl KeyBind {
    pub fn new(mut modifiers: Vec<Modifier>, key: impl Into<String>) -> Self {
        modifiers.sort_unstable();
        modifiers.dedup();
        Self {
            modifiers,
            key: key.into(),
        }
    }

    pub fn is_escape(&self) -> bool {
        self.modifiers.is_empty() && self.key == "Escape"
    }
}
