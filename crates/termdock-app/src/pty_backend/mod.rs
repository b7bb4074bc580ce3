//! PTY backend: persistent shell sessions keyed by session id.
//!
//! Uses `portable-pty`. Sessions outlive the panes that show them, so a
//! pane remount reconnects to the same shell. Each session has a reader
//! thread that appends output to a capped scrollback and forwards it, with
//! its stream offset, over one shared `mpsc` channel.

mod io;
mod spawn;
mod types;

pub use spawn::default_shell;
pub use types::{PtyBackend, Scrollback, PTY_READ_CHUNK};
