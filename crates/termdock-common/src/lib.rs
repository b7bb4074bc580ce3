pub mod errors;
pub mod events;
pub mod id;
pub mod types;

pub use errors::{ConfigError, DetectError, SessionError, TermdockError};
pub use events::{EventBus, Topic};
pub use id::{new_id, LeafId, NodeId, ProjectId, SessionId};
pub use types::{GridSize, PaneBox};

pub type Result<T> = std::result::Result<T, TermdockError>;
