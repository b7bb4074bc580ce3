//! Per-project pane orchestration.
//!
//! A `ProjectPanes` owns one project's layout tree and mounts a pane
//! (session connector, resize coordinator, dev-server detector) for each
//! of its leaves. The host drives it with animation frames, backend
//! events and timer ticks; everything else flows out through the bus.

mod command_queue;
mod context;
mod events;
mod pane;
mod panes;

pub use command_queue::CommandQueue;
pub use context::PaneContext;
pub use panes::ProjectPanes;
