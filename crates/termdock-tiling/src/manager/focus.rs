//! Focus handling for PaneTree.

use termdock_common::LeafId;

use crate::tree::FocusStep;

use super::PaneTree;

impl PaneTree {
    /// Move focus through the depth-first order, wrapping around.
    pub fn focus_step(&mut self, step: FocusStep) -> bool {
        let current = self.focused_or_first();
        match self.tree.adjacent_leaf(&current, step) {
            Some(next) => {
                self.focused = Some(next);
                true
            }
            None => false,
        }
    }

    pub fn focus_next(&mut self) -> bool {
        self.focus_step(FocusStep::Next)
    }

    pub fn focus_prev(&mut self) -> bool {
        self.focus_step(FocusStep::Prev)
    }

    /// Set focus to a specific leaf.
    pub fn focus(&mut self, leaf: &LeafId) -> bool {
        if self.tree.contains_leaf(leaf) {
            self.focused = Some(leaf.clone());
            true
        } else {
            false
        }
    }
}
