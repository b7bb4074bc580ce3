//! Core types for the layout tree: Direction, Leaf and LayoutNode.

use serde::{Deserialize, Serialize};
use termdock_common::{LeafId, NodeId, SessionId};

/// Split orientation. `Horizontal` places children side by side
/// (split right), `Vertical` stacks them (split down).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Horizontal,
    Vertical,
}

/// Direction of travel through the depth-first focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusStep {
    Prev,
    Next,
}

impl FocusStep {
    pub(crate) fn offset(self) -> isize {
        match self {
            FocusStep::Prev => -1,
            FocusStep::Next => 1,
        }
    }
}

/// A pane: a leaf id plus the backend session it displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaf {
    pub id: LeafId,
    pub session_id: SessionId,
}

impl Leaf {
    /// A leaf with a fresh id and a fresh session id.
    pub fn fresh() -> Self {
        Self {
            id: LeafId::new(),
            session_id: SessionId::new(),
        }
    }
}

/// Persistent binary split tree. Every operation returns a new tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LayoutNode {
    Leaf(Leaf),
    Split {
        id: NodeId,
        direction: Direction,
        ratio: f64,
        children: Box<[LayoutNode; 2]>,
    },
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum TreeError {
    #[error("duplicate leaf id {0}")]
    DuplicateLeaf(LeafId),

    #[error("split {id} has ratio {ratio} outside (0, 1)")]
    RatioOutOfRange { id: NodeId, ratio: f64 },
}

impl LayoutNode {
    /// A single fresh leaf: the starting tree for a project.
    pub fn create_leaf() -> Self {
        LayoutNode::Leaf(Leaf::fresh())
    }

    pub fn leaf(id: impl Into<LeafId>, session_id: impl Into<SessionId>) -> Self {
        LayoutNode::Leaf(Leaf {
            id: id.into(),
            session_id: session_id.into(),
        })
    }

    /// An even split with `first` on the left/top.
    pub fn split(direction: Direction, first: LayoutNode, second: LayoutNode) -> Self {
        LayoutNode::Split {
            id: NodeId::new(),
            direction,
            ratio: 0.5,
            children: Box::new([first, second]),
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            LayoutNode::Leaf(_) => 1,
            LayoutNode::Split { children, .. } => {
                children[0].leaf_count() + children[1].leaf_count()
            }
        }
    }

    pub fn contains_leaf(&self, id: &LeafId) -> bool {
        self.find_leaf(id).is_some()
    }

    /// Check leaf-id uniqueness and ratio bounds.
    pub fn validate(&self) -> Result<(), TreeError> {
        let mut seen = std::collections::HashSet::new();
        self.validate_into(&mut seen)
    }

    fn validate_into<'a>(
        &'a self,
        seen: &mut std::collections::HashSet<&'a LeafId>,
    ) -> Result<(), TreeError> {
        match self {
            LayoutNode::Leaf(leaf) => {
                if !seen.insert(&leaf.id) {
                    return Err(TreeError::DuplicateLeaf(leaf.id.clone()));
                }
                Ok(())
            }
            LayoutNode::Split {
                id,
                ratio,
                children,
                ..
            } => {
                if !(*ratio > 0.0 && *ratio < 1.0) {
                    return Err(TreeError::RatioOutOfRange {
                        id: id.clone(),
                        ratio: *ratio,
                    });
                }
                children[0].validate_into(seen)?;
                children[1].validate_into(seen)
            }
        }
    }
}
