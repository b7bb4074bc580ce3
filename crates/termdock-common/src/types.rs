//! Small value types shared by the session and app crates.

use serde::{Deserialize, Serialize};

/// Smallest PTY width the backend will ever be asked for.
pub const MIN_COLS: u16 = 10;

/// Smallest PTY height the backend will ever be asked for.
pub const MIN_ROWS: u16 = 2;

/// Terminal grid dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    pub cols: u16,
    pub rows: u16,
}

impl GridSize {
    pub const fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }

    /// Raise degenerate sizes to the `MIN_COLS` x `MIN_ROWS` floor.
    pub fn clamped(self) -> Self {
        Self {
            cols: self.cols.max(MIN_COLS),
            rows: self.rows.max(MIN_ROWS),
        }
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self { cols: 80, rows: 24 }
    }
}

/// On-screen content box of a pane, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaneBox {
    pub width: f64,
    pub height: f64,
}

impl PaneBox {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// A hidden pane (collapsed or detached) reports a zero-area box.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_raises_to_floor() {
        assert_eq!(GridSize::new(3, 1).clamped(), GridSize::new(10, 2));
        assert_eq!(GridSize::new(0, 0).clamped(), GridSize::new(MIN_COLS, MIN_ROWS));
    }

    #[test]
    fn clamp_keeps_normal_sizes() {
        assert_eq!(GridSize::new(120, 40).clamped(), GridSize::new(120, 40));
    }

    #[test]
    fn zero_box_is_empty() {
        assert!(PaneBox::new(0.0, 300.0).is_empty());
        assert!(!PaneBox::new(640.0, 480.0).is_empty());
    }
}
