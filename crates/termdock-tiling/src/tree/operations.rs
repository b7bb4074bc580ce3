//! Structural operations on the layout tree: split, remove, adjust ratio.
//!
//! None of these mutate `self`. A target id that is not in the tree yields
//! a structurally equal copy, so a stale id from a race is harmless.

use termdock_common::{LeafId, NodeId};

use super::{Direction, LayoutNode, Leaf};

enum Removal {
    NotFound,
    /// The target was removed; `None` means nothing is left of this subtree.
    Removed(Option<LayoutNode>),
}

impl LayoutNode {
    /// Split the leaf `target`, keeping it first and adding a fresh leaf
    /// second. Returns the new tree and the new leaf's id, or `None` if
    /// `target` is not in the tree.
    pub fn try_split(&self, target: &LeafId, direction: Direction) -> Option<(LayoutNode, LeafId)> {
        match self {
            LayoutNode::Leaf(leaf) if &leaf.id == target => {
                let fresh = Leaf::fresh();
                let new_id = fresh.id.clone();
                let tree = LayoutNode::split(direction, self.clone(), LayoutNode::Leaf(fresh));
                Some((tree, new_id))
            }
            LayoutNode::Leaf(_) => None,
            LayoutNode::Split {
                id,
                direction: own_direction,
                ratio,
                children,
            } => {
                let [first, second] = &**children;
                let rebuild = |first: LayoutNode, second: LayoutNode| LayoutNode::Split {
                    id: id.clone(),
                    direction: *own_direction,
                    ratio: *ratio,
                    children: Box::new([first, second]),
                };
                if let Some((new_first, new_id)) = first.try_split(target, direction) {
                    return Some((rebuild(new_first, second.clone()), new_id));
                }
                second
                    .try_split(target, direction)
                    .map(|(new_second, new_id)| (rebuild(first.clone(), new_second), new_id))
            }
        }
    }

    /// Split `target` side by side. Unknown target: unchanged copy.
    pub fn split_right(&self, target: &LeafId) -> LayoutNode {
        self.try_split(target, Direction::Horizontal)
            .map(|(tree, _)| tree)
            .unwrap_or_else(|| self.clone())
    }

    /// Split `target` top/bottom. Unknown target: unchanged copy.
    pub fn split_down(&self, target: &LeafId) -> LayoutNode {
        self.try_split(target, Direction::Vertical)
            .map(|(tree, _)| tree)
            .unwrap_or_else(|| self.clone())
    }

    /// Remove leaf `target`; its parent split collapses into the sibling.
    ///
    /// Returns `None` when `target` was the only leaf (the caller then
    /// creates a fresh one). Unknown target: unchanged copy.
    pub fn remove_terminal(&self, target: &LeafId) -> Option<LayoutNode> {
        match self.without(target) {
            Removal::NotFound => Some(self.clone()),
            Removal::Removed(rest) => rest,
        }
    }

    fn without(&self, target: &LeafId) -> Removal {
        match self {
            LayoutNode::Leaf(leaf) if &leaf.id == target => Removal::Removed(None),
            LayoutNode::Leaf(_) => Removal::NotFound,
            LayoutNode::Split {
                id,
                direction,
                ratio,
                children,
            } => {
                let [first, second] = &**children;
                let rebuild = |first: LayoutNode, second: LayoutNode| LayoutNode::Split {
                    id: id.clone(),
                    direction: *direction,
                    ratio: *ratio,
                    children: Box::new([first, second]),
                };
                match first.without(target) {
                    Removal::Removed(None) => Removal::Removed(Some(second.clone())),
                    Removal::Removed(Some(new_first)) => {
                        Removal::Removed(Some(rebuild(new_first, second.clone())))
                    }
                    Removal::NotFound => match second.without(target) {
                        Removal::Removed(None) => Removal::Removed(Some(first.clone())),
                        Removal::Removed(Some(new_second)) => {
                            Removal::Removed(Some(rebuild(first.clone(), new_second)))
                        }
                        Removal::NotFound => Removal::NotFound,
                    },
                }
            }
        }
    }

    /// Grow (positive `delta`) or shrink the leaf `target` within its parent
    /// split. The ratio is clamped to [0.1, 0.9].
    pub fn adjust_ratio(&self, target: &LeafId, delta: f64) -> LayoutNode {
        match self {
            LayoutNode::Leaf(_) => self.clone(),
            LayoutNode::Split {
                id,
                direction,
                ratio,
                children,
            } => {
                let [first, second] = &**children;
                let is_target =
                    |node: &LayoutNode| matches!(node, LayoutNode::Leaf(l) if &l.id == target);
                let (new_ratio, new_first, new_second) = if is_target(first) {
                    ((ratio + delta).clamp(0.1, 0.9), first.clone(), second.clone())
                } else if is_target(second) {
                    ((ratio - delta).clamp(0.1, 0.9), first.clone(), second.clone())
                } else {
                    (
                        *ratio,
                        first.adjust_ratio(target, delta),
                        second.adjust_ratio(target, delta),
                    )
                };
                LayoutNode::Split {
                    id: id.clone(),
                    direction: *direction,
                    ratio: new_ratio,
                    children: Box::new([new_first, new_second]),
                }
            }
        }
    }

    /// Set the ratio of split `split_id` (divider drag), clamped to [0.1, 0.9].
    pub fn with_ratio(&self, split_id: &NodeId, ratio: f64) -> LayoutNode {
        match self {
            LayoutNode::Leaf(_) => self.clone(),
            LayoutNode::Split {
                id,
                direction,
                ratio: current,
                children,
            } => {
                let new_ratio = if id == split_id {
                    ratio.clamp(0.1, 0.9)
                } else {
                    *current
                };
                LayoutNode::Split {
                    id: id.clone(),
                    direction: *direction,
                    ratio: new_ratio,
                    children: Box::new([
                        children[0].with_ratio(split_id, ratio),
                        children[1].with_ratio(split_id, ratio),
                    ]),
                }
            }
        }
    }
}
