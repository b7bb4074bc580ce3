//! Split and close operations on PaneTree.

use termdock_common::{LeafId, SessionId};
use tracing::debug;

use crate::tree::{Direction, FocusStep, LayoutNode};

use super::PaneTree;

impl PaneTree {
    /// Split the focused leaf (first leaf if none). Focus moves to the new
    /// leaf, whose id is returned.
    pub fn split_focused(&mut self, direction: Direction) -> LeafId {
        let target = self.focused_or_first();
        self.split_at(&target, direction)
    }

    /// Split `target`, falling back to the first leaf when `target` is
    /// stale. Focus moves to the new leaf.
    pub fn split_at(&mut self, target: &LeafId, direction: Direction) -> LeafId {
        let target = if self.tree.contains_leaf(target) {
            target.clone()
        } else {
            debug!(project = %self.project, target = %target, "split target missing, splitting first leaf");
            self.tree.first_leaf().id.clone()
        };
        let Some((tree, new_id)) = self.tree.try_split(&target, direction) else {
            return target;
        };
        self.commit(tree);
        self.focused = Some(new_id.clone());
        new_id
    }

    /// Remove `leaf`. Removing the last leaf leaves a fresh one in its place.
    /// Returns `false` for an id not in the tree.
    pub fn remove(&mut self, leaf: &LeafId) -> bool {
        if !self.tree.contains_leaf(leaf) {
            return false;
        }

        let was_focused = self.focused.as_ref() == Some(leaf);
        let neighbor = self
            .tree
            .adjacent_leaf(leaf, FocusStep::Next)
            .filter(|n| n != leaf);

        let tree = self
            .tree
            .remove_terminal(leaf)
            .unwrap_or_else(LayoutNode::create_leaf);
        if was_focused || neighbor.is_none() {
            self.focused = Some(
                neighbor
                    .filter(|n| tree.contains_leaf(n))
                    .unwrap_or_else(|| tree.first_leaf().id.clone()),
            );
        }
        self.commit(tree);
        true
    }

    /// Remove the leaf showing `session`, returning its id.
    pub fn remove_by_session(&mut self, session: &SessionId) -> Option<LeafId> {
        let leaf = self.tree.find_leaf_by_session(session)?.id.clone();
        self.remove(&leaf);
        Some(leaf)
    }

    /// Grow or shrink the focused leaf within its parent split.
    pub fn resize_focused(&mut self, delta: f64) {
        let target = self.focused_or_first();
        let tree = self.tree.adjust_ratio(&target, delta);
        if tree != self.tree {
            self.commit(tree);
        }
    }
}
