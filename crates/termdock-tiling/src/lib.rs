pub mod commands;
pub mod layout;
pub mod manager;
pub mod store;
pub mod tree;

pub use commands::PaneCommand;
pub use layout::pane_boxes;
pub use manager::PaneTree;
pub use store::{FileLayoutStore, LayoutStore, MemoryLayoutStore};
pub use tree::{Direction, FocusStep, LayoutNode, Leaf};
