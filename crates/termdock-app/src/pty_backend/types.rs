//! PTY backend types: scrollback, per-session handle, and the backend.

use std::collections::HashMap;
use std::io::Write;
use std::sync::mpsc;
use std::sync::Arc;

use parking_lot::Mutex;
use portable_pty::{Child, MasterPty, PtySize};
use termdock_common::SessionId;
use termdock_session::{BackendEvent, Snapshot};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Maximum bytes read from a PTY in one call (8 KB).
pub const PTY_READ_CHUNK: usize = 8_192;

// =============================================================================
// SCROLLBACK
// =============================================================================

/// The most recent output of a session plus the total bytes ever produced.
#[derive(Debug)]
pub struct Scrollback {
    data: Vec<u8>,
    end_offset: u64,
    capacity: usize,
}

impl Scrollback {
    pub fn new(capacity: usize) -> Self {
        Self {
            data: Vec::new(),
            end_offset: 0,
            capacity: capacity.max(1),
        }
    }

    /// Append a chunk, dropping the oldest bytes past capacity. Returns the
    /// stream offset of the chunk's first byte.
    pub fn push(&mut self, bytes: &[u8]) -> u64 {
        let offset = self.end_offset;
        self.end_offset += bytes.len() as u64;
        self.data.extend_from_slice(bytes);
        if self.data.len() > self.capacity {
            let excess = self.data.len() - self.capacity;
            self.data.drain(..excess);
        }
        offset
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            data: self.data.clone(),
            end_offset: self.end_offset,
        }
    }

    pub fn end_offset(&self) -> u64 {
        self.end_offset
    }
}

// =============================================================================
// SESSION HANDLE
// =============================================================================

/// One live shell. Owns the master side of its PTY pair.
pub(super) struct PtySession {
    pub(super) writer: Box<dyn Write + Send>,
    pub(super) child: Box<dyn Child + Send + Sync>,
    pub(super) master: Box<dyn MasterPty + Send>,
    pub(super) size: PtySize,
    pub(super) scrollback: Arc<Mutex<Scrollback>>,
}

// =============================================================================
// BACKEND
// =============================================================================

/// Owns every session of the process.
pub struct PtyBackend {
    pub(super) sessions: HashMap<SessionId, PtySession>,
    pub(super) shell: Option<String>,
    pub(super) scrollback_bytes: usize,
    pub(super) events_tx: mpsc::Sender<BackendEvent>,
    pub(super) events_rx: mpsc::Receiver<BackendEvent>,
}

impl PtyBackend {
    /// `shell` overrides `$SHELL`.
    pub fn new(shell: Option<String>, scrollback_bytes: usize) -> Self {
        let (events_tx, events_rx) = mpsc::channel();
        Self {
            sessions: HashMap::new(),
            shell,
            scrollback_bytes,
            events_tx,
            events_rx,
        }
    }

    pub fn contains(&self, session_id: &SessionId) -> bool {
        self.sessions.contains_key(session_id)
    }

    pub fn session_ids(&self) -> Vec<SessionId> {
        self.sessions.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================
