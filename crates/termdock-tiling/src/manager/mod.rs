//! PaneTree: one project's layout tree, focus and persistence.

mod focus;
mod operations;
mod types;

pub use types::*;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::store::{LayoutStore, MemoryLayoutStore};
    use crate::tree::{Direction, LayoutNode};
    use termdock_common::{LeafId, ProjectId};

    fn project() -> ProjectId {
        ProjectId::from("P1")
    }

    fn new_tree() -> (PaneTree, Arc<MemoryLayoutStore>) {
        let store = Arc::new(MemoryLayoutStore::new());
        let tree = PaneTree::load(project(), store.clone());
        (tree, store)
    }

    #[test]
    fn fresh_project_has_one_focused_leaf_and_is_persisted() {
        let (mgr, store) = new_tree();
        assert_eq!(mgr.leaf_count(), 1);
        assert_eq!(mgr.focused(), Some(&mgr.leaf_ids()[0]));
        assert_eq!(store.get_layout(&project()).as_ref(), Some(mgr.tree()));
    }

    #[test]
    fn load_restores_persisted_layout() {
        let store = Arc::new(MemoryLayoutStore::new());
        let saved = LayoutNode::split(
            Direction::Vertical,
            LayoutNode::leaf("a", "sa"),
            LayoutNode::leaf("b", "sb"),
        );
        store.set_layout(&project(), &saved);

        let mgr = PaneTree::load(project(), store);
        assert_eq!(mgr.tree(), &saved);
        assert_eq!(mgr.focused(), Some(&LeafId::from("a")));
    }

    #[test]
    fn load_discards_invalid_layout() {
        let store = Arc::new(MemoryLayoutStore::new());
        let dup = LayoutNode::split(
            Direction::Vertical,
            LayoutNode::leaf("a", "sa"),
            LayoutNode::leaf("a", "sb"),
        );
        store.set_layout(&project(), &dup);

        let mgr = PaneTree::load(project(), store.clone());
        assert_eq!(mgr.leaf_count(), 1);
        assert_eq!(store.get_layout(&project()).as_ref(), Some(mgr.tree()));
    }

    #[test]
    fn split_focused_moves_focus_and_persists() {
        let (mut mgr, store) = new_tree();
        let new_id = mgr.split_focused(Direction::Horizontal);
        assert_eq!(mgr.leaf_count(), 2);
        assert_eq!(mgr.focused(), Some(&new_id));
        assert_eq!(store.get_layout(&project()).as_ref(), Some(mgr.tree()));
    }

    #[test]
    fn split_stale_target_falls_back_to_first_leaf() {
        let (mut mgr, _) = new_tree();
        let first = mgr.leaf_ids()[0].clone();
        let new_id = mgr.split_at(&LeafId::from("gone"), Direction::Vertical);
        assert_eq!(mgr.leaf_ids(), vec![first, new_id]);
    }

    #[test]
    fn remove_focused_moves_focus_to_neighbor() {
        let (mut mgr, _) = new_tree();
        let first = mgr.leaf_ids()[0].clone();
        let second = mgr.split_focused(Direction::Horizontal);
        let third = mgr.split_focused(Direction::Vertical);
        assert_eq!(mgr.leaf_ids(), vec![first.clone(), second.clone(), third.clone()]);

        mgr.focus(&second);
        assert!(mgr.remove(&second));
        assert_eq!(mgr.focused(), Some(&third));
        assert_eq!(mgr.leaf_ids(), vec![first, third]);
    }

    #[test]
    fn remove_unfocused_keeps_focus() {
        let (mut mgr, _) = new_tree();
        let first = mgr.leaf_ids()[0].clone();
        let second = mgr.split_focused(Direction::Horizontal);
        assert!(mgr.remove(&first));
        assert_eq!(mgr.focused(), Some(&second));
    }

    #[test]
    fn remove_last_leaf_synthesizes_fresh_one() {
        let (mut mgr, _) = new_tree();
        let only = mgr.leaf_ids()[0].clone();
        assert!(mgr.remove(&only));
        assert_eq!(mgr.leaf_count(), 1);
        assert_ne!(mgr.leaf_ids()[0], only);
        assert_eq!(mgr.focused(), Some(&mgr.leaf_ids()[0]));
    }

    #[test]
    fn remove_unknown_returns_false() {
        let (mut mgr, _) = new_tree();
        let before = mgr.tree().clone();
        assert!(!mgr.remove(&LeafId::from("nope")));
        assert_eq!(mgr.tree(), &before);
    }

    #[test]
    fn remove_by_session_finds_leaf() {
        let (mut mgr, _) = new_tree();
        let new_id = mgr.split_focused(Direction::Horizontal);
        let session = mgr.session_of(&new_id).unwrap();
        assert_eq!(mgr.remove_by_session(&session), Some(new_id));
        assert_eq!(mgr.leaf_count(), 1);
    }

    #[test]
    fn focus_next_and_prev_wrap() {
        let (mut mgr, _) = new_tree();
        let first = mgr.leaf_ids()[0].clone();
        let second = mgr.split_focused(Direction::Horizontal);
        assert!(mgr.focus_next());
        assert_eq!(mgr.focused(), Some(&first));
        assert!(mgr.focus_prev());
        assert_eq!(mgr.focused(), Some(&second));
    }

    #[test]
    fn focus_unknown_fails() {
        let (mut mgr, _) = new_tree();
        assert!(!mgr.focus(&LeafId::from("x")));
    }

    #[test]
    fn resize_focused_changes_ratio() {
        let (mut mgr, _) = new_tree();
        let first = mgr.leaf_ids()[0].clone();
        mgr.split_focused(Direction::Horizontal);
        mgr.focus(&first);
        mgr.resize_focused(0.2);
        let LayoutNode::Split { ratio, .. } = mgr.tree() else {
            panic!("expected split");
        };
        assert!((*ratio - 0.7).abs() < 1e-9);
    }
}
