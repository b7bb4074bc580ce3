//! Per-pane session plumbing: the backend contract, the create-or-reconnect
//! connector with exactly-once replay, and the resize coordinator.

pub mod backend;
pub mod connector;
pub mod decode;
pub mod resize;
pub mod terminal;

pub use backend::{
    BackendCall, BackendEvent, CreateReply, CreateRequest, RecordingBackend, SessionBackend,
    Snapshot,
};
pub use connector::{ConnectionState, ConnectorConfig, ConnectorEvent, SessionConnector, SessionOrigin};
pub use resize::{ResizeCoordinator, ResizeReason, ResizeRequest, ResizeTiming};
pub use terminal::{TerminalSink, TranscriptSink};
