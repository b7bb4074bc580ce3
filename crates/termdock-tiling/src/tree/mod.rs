mod operations;
mod traversal;
mod types;

pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;
    use termdock_common::LeafId;

    fn id(s: &str) -> LeafId {
        LeafId::from(s)
    }

    /// 1 | (2 / 3)
    fn three_pane() -> LayoutNode {
        LayoutNode::split(
            Direction::Horizontal,
            LayoutNode::leaf("1", "s1"),
            LayoutNode::split(
                Direction::Vertical,
                LayoutNode::leaf("2", "s2"),
                LayoutNode::leaf("3", "s3"),
            ),
        )
    }

    fn assert_unique(tree: &LayoutNode) {
        let ids = tree.leaf_ids();
        let unique: std::collections::HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len(), "duplicate ids in {ids:?}");
    }

    #[test]
    fn create_leaf_is_fresh() {
        let a = LayoutNode::create_leaf();
        let b = LayoutNode::create_leaf();
        assert_eq!(a.leaf_count(), 1);
        assert_ne!(a, b);
        assert_ne!(a.first_leaf().session_id, b.first_leaf().session_id);
    }

    #[test]
    fn leaf_ids_depth_first() {
        assert_eq!(three_pane().leaf_ids(), vec![id("1"), id("2"), id("3")]);
    }

    #[test]
    fn split_right_makes_horizontal_split() {
        let tree = LayoutNode::leaf("1", "s1");
        let split = tree.split_right(&id("1"));
        assert_eq!(split.leaf_count(), 2);
        match &split {
            LayoutNode::Split {
                direction, ratio, children, ..
            } => {
                assert_eq!(*direction, Direction::Horizontal);
                assert!((*ratio - 0.5).abs() < f64::EPSILON);
                assert_eq!(children[0], tree);
            }
            LayoutNode::Leaf(_) => panic!("expected split"),
        }
    }

    #[test]
    fn split_down_nested_keeps_order() {
        let tree = three_pane();
        let split = tree.split_down(&id("2"));
        assert_eq!(split.leaf_count(), 4);
        let ids = split.leaf_ids();
        assert_eq!(ids[0], id("1"));
        assert_eq!(ids[1], id("2"));
        assert_eq!(ids[3], id("3"));
        assert_unique(&split);
    }

    #[test]
    fn split_new_leaf_gets_fresh_session() {
        let tree = LayoutNode::leaf("1", "s1");
        let (split, new_id) = tree.try_split(&id("1"), Direction::Vertical).unwrap();
        let new_leaf = split.find_leaf(&new_id).unwrap();
        assert_ne!(new_leaf.session_id.as_str(), "s1");
    }

    #[test]
    fn split_nonexistent_is_structural_noop() {
        let tree = three_pane();
        assert_eq!(tree.split_right(&id("nonexistent-id")), tree);
        assert_eq!(tree.split_down(&id("nonexistent-id")), tree);
        assert!(tree.try_split(&id("nope"), Direction::Horizontal).is_none());
    }

    #[test]
    fn remove_collapses_parent_into_sibling() {
        let tree = three_pane();
        let removed = tree.remove_terminal(&id("2")).unwrap();
        assert_eq!(removed.leaf_ids(), vec![id("1"), id("3")]);
        match &removed {
            LayoutNode::Split { children, .. } => {
                assert_eq!(children[1], LayoutNode::leaf("3", "s3"));
            }
            LayoutNode::Leaf(_) => panic!("expected split"),
        }
    }

    #[test]
    fn remove_first_child_leaves_second() {
        let tree = three_pane();
        let removed = tree.remove_terminal(&id("1")).unwrap();
        assert_eq!(removed.leaf_ids(), vec![id("2"), id("3")]);
    }

    #[test]
    fn remove_last_leaf_returns_none() {
        let tree = LayoutNode::leaf("1", "s1");
        assert!(tree.remove_terminal(&id("1")).is_none());
    }

    #[test]
    fn remove_unknown_is_noop() {
        let tree = three_pane();
        assert_eq!(tree.remove_terminal(&id("9")), Some(tree.clone()));
    }

    #[test]
    fn leaf_count_moves_by_one() {
        let mut tree = LayoutNode::create_leaf();
        for i in 0..6 {
            let ids = tree.leaf_ids();
            let target = &ids[i % ids.len()];
            let before = tree.leaf_count();
            tree = if i % 2 == 0 {
                tree.split_right(target)
            } else {
                tree.split_down(target)
            };
            assert_eq!(tree.leaf_count(), before + 1);
            assert_unique(&tree);
        }
        while tree.leaf_count() > 1 {
            let before = tree.leaf_count();
            let target = tree.leaf_ids()[before / 2].clone();
            tree = tree.remove_terminal(&target).unwrap();
            assert_eq!(tree.leaf_count(), before - 1);
            assert_unique(&tree);
        }
        let last = tree.first_leaf().id.clone();
        assert!(tree.remove_terminal(&last).is_none());
    }

    #[test]
    fn find_leaf_and_by_session() {
        let tree = three_pane();
        assert_eq!(tree.find_leaf(&id("3")).unwrap().session_id.as_str(), "s3");
        assert!(tree.find_leaf(&id("4")).is_none());
        let by_session = tree.find_leaf_by_session(&"s2".into()).unwrap();
        assert_eq!(by_session.id, id("2"));
    }

    #[test]
    fn adjacent_wraps_both_ways() {
        let tree = three_pane();
        assert_eq!(tree.adjacent_leaf(&id("1"), FocusStep::Next), Some(id("2")));
        assert_eq!(tree.adjacent_leaf(&id("3"), FocusStep::Next), Some(id("1")));
        assert_eq!(tree.adjacent_leaf(&id("1"), FocusStep::Prev), Some(id("3")));
        assert_eq!(tree.adjacent_leaf(&id("2"), FocusStep::Prev), Some(id("1")));
    }

    #[test]
    fn adjacent_single_leaf_and_unknown() {
        let tree = LayoutNode::leaf("1", "s1");
        assert_eq!(tree.adjacent_leaf(&id("1"), FocusStep::Next), Some(id("1")));
        assert_eq!(three_pane().adjacent_leaf(&id("x"), FocusStep::Next), None);
    }

    #[test]
    fn adjust_ratio_grows_first_and_clamps() {
        let tree = LayoutNode::split(
            Direction::Horizontal,
            LayoutNode::leaf("1", "s1"),
            LayoutNode::leaf("2", "s2"),
        );
        let grown = tree.adjust_ratio(&id("1"), 0.1);
        let LayoutNode::Split { ratio, .. } = &grown else {
            panic!("expected split");
        };
        assert!((*ratio - 0.6).abs() < 1e-9);

        let shrunk = tree.adjust_ratio(&id("2"), 0.9);
        let LayoutNode::Split { ratio, .. } = &shrunk else {
            panic!("expected split");
        };
        assert!((*ratio - 0.1).abs() < 1e-9);
    }

    #[test]
    fn with_ratio_targets_split_id() {
        let tree = three_pane();
        let LayoutNode::Split { id: root_id, .. } = &tree else {
            panic!("expected split");
        };
        let resized = tree.with_ratio(root_id, 0.7);
        let LayoutNode::Split { ratio, children, .. } = &resized else {
            panic!("expected split");
        };
        assert!((*ratio - 0.7).abs() < 1e-9);
        let LayoutNode::Split { ratio: inner, .. } = &children[1] else {
            panic!("expected nested split");
        };
        assert!((*inner - 0.5).abs() < 1e-9);
    }

    #[test]
    fn validate_rejects_duplicates_and_bad_ratio() {
        assert!(three_pane().validate().is_ok());

        let dup = LayoutNode::split(
            Direction::Horizontal,
            LayoutNode::leaf("1", "s1"),
            LayoutNode::leaf("1", "s2"),
        );
        assert_eq!(dup.validate(), Err(TreeError::DuplicateLeaf(id("1"))));

        let LayoutNode::Split { id, direction, children, .. } = three_pane() else {
            panic!("expected split");
        };
        let bad = LayoutNode::Split {
            id,
            direction,
            ratio: 1.0,
            children,
        };
        assert!(matches!(bad.validate(), Err(TreeError::RatioOutOfRange { .. })));
    }

    #[test]
    fn serde_round_trip_preserves_structure() {
        let tree = three_pane();
        let json = serde_json::to_string(&tree).unwrap();
        assert!(json.contains("\"type\":\"split\""));
        assert!(json.contains("\"type\":\"leaf\""));
        let back: LayoutNode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tree);
    }
}
