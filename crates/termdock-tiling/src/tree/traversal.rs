//! Lookup and focus-order traversal.

use termdock_common::{LeafId, SessionId};

use super::{FocusStep, LayoutNode, Leaf};

impl LayoutNode {
    /// All leaves, depth-first, first child first. This is the focus order.
    pub fn leaves(&self) -> Vec<&Leaf> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a Leaf>) {
        match self {
            LayoutNode::Leaf(leaf) => out.push(leaf),
            LayoutNode::Split { children, .. } => {
                children[0].collect_leaves(out);
                children[1].collect_leaves(out);
            }
        }
    }

    pub fn leaf_ids(&self) -> Vec<LeafId> {
        self.leaves().into_iter().map(|l| l.id.clone()).collect()
    }

    pub fn first_leaf(&self) -> &Leaf {
        match self {
            LayoutNode::Leaf(leaf) => leaf,
            LayoutNode::Split { children, .. } => children[0].first_leaf(),
        }
    }

    pub fn find_leaf(&self, id: &LeafId) -> Option<&Leaf> {
        match self {
            LayoutNode::Leaf(leaf) if &leaf.id == id => Some(leaf),
            LayoutNode::Leaf(_) => None,
            LayoutNode::Split { children, .. } => children[0]
                .find_leaf(id)
                .or_else(|| children[1].find_leaf(id)),
        }
    }

    pub fn find_leaf_by_session(&self, session_id: &SessionId) -> Option<&Leaf> {
        self.leaves()
            .into_iter()
            .find(|l| &l.session_id == session_id)
    }

    /// The leaf before/after `current` in focus order, wrapping around.
    /// A single-leaf tree returns `current` itself; an unknown id returns `None`.
    pub fn adjacent_leaf(&self, current: &LeafId, step: FocusStep) -> Option<LeafId> {
        let ids = self.leaf_ids();
        let n = ids.len() as isize;
        let idx = ids.iter().position(|id| id == current)? as isize;
        let next = (idx + step.offset() + n) % n;
        ids.into_iter().nth(next as usize)
    }
}
