//! Core type and constructors for PaneTree.

use std::sync::Arc;

use termdock_common::{LeafId, ProjectId, SessionId};
use tracing::{info, warn};

use crate::store::LayoutStore;
use crate::tree::LayoutNode;

/// One project's pane layout: the current tree, the focused leaf and the
/// store every mutation is persisted to.
pub struct PaneTree {
    pub(super) project: ProjectId,
    pub(super) tree: LayoutNode,
    pub(super) focused: Option<LeafId>,
    pub(super) store: Arc<dyn LayoutStore>,
}

impl PaneTree {
    /// Load the project's persisted layout, or start from a fresh leaf when
    /// there is none or it fails validation.
    pub fn load(project: ProjectId, store: Arc<dyn LayoutStore>) -> Self {
        let persisted = store.get_layout(&project).and_then(|tree| match tree.validate() {
            Ok(()) => Some(tree),
            Err(e) => {
                warn!(project = %project, "discarding invalid persisted layout: {e}");
                None
            }
        });

        let mut mgr = Self {
            project,
            tree: LayoutNode::create_leaf(),
            focused: None,
            store,
        };
        match persisted {
            Some(tree) => {
                info!(project = %mgr.project, leaves = tree.leaf_count(), "layout restored");
                mgr.focused = Some(tree.first_leaf().id.clone());
                mgr.tree = tree;
            }
            None => {
                mgr.focused = Some(mgr.tree.first_leaf().id.clone());
                mgr.commit(mgr.tree.clone());
            }
        }
        mgr
    }

    // -- Accessors --

    pub fn project(&self) -> &ProjectId {
        &self.project
    }

    pub fn tree(&self) -> &LayoutNode {
        &self.tree
    }

    pub fn focused(&self) -> Option<&LeafId> {
        self.focused.as_ref()
    }

    /// The focused leaf, or the first leaf if focus is unset or stale.
    pub fn focused_or_first(&self) -> LeafId {
        self.focused
            .as_ref()
            .filter(|id| self.tree.contains_leaf(id))
            .cloned()
            .unwrap_or_else(|| self.tree.first_leaf().id.clone())
    }

    pub fn leaf_count(&self) -> usize {
        self.tree.leaf_count()
    }

    pub fn leaf_ids(&self) -> Vec<LeafId> {
        self.tree.leaf_ids()
    }

    pub fn session_of(&self, leaf: &LeafId) -> Option<SessionId> {
        self.tree.find_leaf(leaf).map(|l| l.session_id.clone())
    }

    /// Replace the tree and persist it.
    pub(super) fn commit(&mut self, tree: LayoutNode) {
        self.store.set_layout(&self.project, &tree);
        self.tree = tree;
    }
}
