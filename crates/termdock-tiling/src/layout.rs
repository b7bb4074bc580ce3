//! Pane boxes for a layout tree.

use termdock_common::{LeafId, PaneBox};

use crate::tree::{Direction, LayoutNode};

/// Split `bounds` down the tree, leaving `gap` pixels between siblings.
/// Leaves come out in focus order.
pub fn pane_boxes(root: &LayoutNode, bounds: PaneBox, gap: f64) -> Vec<(LeafId, PaneBox)> {
    let mut out = Vec::new();
    layout_node(root, bounds, gap.max(0.0), &mut out);
    out
}

fn layout_node(node: &LayoutNode, bounds: PaneBox, gap: f64, out: &mut Vec<(LeafId, PaneBox)>) {
    match node {
        LayoutNode::Leaf(leaf) => out.push((leaf.id.clone(), bounds)),
        LayoutNode::Split {
            direction,
            ratio,
            children,
            ..
        } => {
            let (a, b) = match direction {
                Direction::Horizontal => {
                    let available = (bounds.width - gap).max(0.0);
                    let first = available * ratio;
                    (
                        PaneBox::new(first, bounds.height),
                        PaneBox::new((available - first).max(0.0), bounds.height),
                    )
                }
                Direction::Vertical => {
                    let available = (bounds.height - gap).max(0.0);
                    let first = available * ratio;
                    (
                        PaneBox::new(bounds.width, first),
                        PaneBox::new(bounds.width, (available - first).max(0.0)),
                    )
                }
            };
            layout_node(&children[0], a, gap, out);
            layout_node(&children[1], b, gap, out);
        }
    }
}
