//! Contract between a pane and whatever owns the real PTYs.
//!
//! Requests are fire-and-forget; every reply comes back later as a
//! [`BackendEvent`] tagged with its session id, so the host can route it to
//! the pane that asked.

use std::path::PathBuf;

use termdock_common::{GridSize, SessionError, SessionId};

/// Create-or-reconnect request. Creating an id that already exists attaches
/// to the running session instead of spawning a new shell.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateRequest {
    pub session_id: SessionId,
    pub cwd: Option<PathBuf>,
    pub size: GridSize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateReply {
    /// `false` means the id was already alive and was reconnected.
    pub created: bool,
}

/// Bounded scrollback of a live session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Snapshot {
    pub data: Vec<u8>,
    /// Stream offset just past the last byte in `data`.
    pub end_offset: u64,
}

#[derive(Debug)]
pub enum BackendEvent {
    Created {
        session_id: SessionId,
        result: Result<CreateReply, SessionError>,
    },
    Buffer {
        session_id: SessionId,
        result: Result<Snapshot, SessionError>,
    },
    /// Live output. `offset` is the stream position of `bytes[0]`.
    Data {
        session_id: SessionId,
        offset: u64,
        bytes: Vec<u8>,
    },
    Exit {
        session_id: SessionId,
        code: Option<u32>,
    },
}

impl BackendEvent {
    pub fn session_id(&self) -> &SessionId {
        match self {
            BackendEvent::Created { session_id, .. }
            | BackendEvent::Buffer { session_id, .. }
            | BackendEvent::Data { session_id, .. }
            | BackendEvent::Exit { session_id, .. } => session_id,
        }
    }
}

pub trait SessionBackend {
    fn create(&mut self, request: CreateRequest);
    fn write(&mut self, session_id: &SessionId, data: &[u8]);
    fn resize(&mut self, session_id: &SessionId, size: GridSize);
    fn request_buffer(&mut self, session_id: &SessionId);
    fn kill(&mut self, session_id: &SessionId);
}

/// A request seen by [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    Create(CreateRequest),
    Write(SessionId, Vec<u8>),
    Resize(SessionId, GridSize),
    RequestBuffer(SessionId),
    Kill(SessionId),
}

/// Backend that only records what it was asked to do. Replies are fed to
/// the connector by hand, which makes it the harness for pane-level tests.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub calls: Vec<BackendCall>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&mut self) -> Vec<BackendCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn creates(&self) -> Vec<&CreateRequest> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                BackendCall::Create(req) => Some(req),
                _ => None,
            })
            .collect()
    }

    pub fn resizes(&self) -> Vec<GridSize> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                BackendCall::Resize(_, size) => Some(*size),
                _ => None,
            })
            .collect()
    }

    /// Everything written to `session_id`, concatenated.
    pub fn written(&self, session_id: &SessionId) -> Vec<u8> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                BackendCall::Write(id, data) if id == session_id => Some(data.as_slice()),
                _ => None,
            })
            .flatten()
            .copied()
            .collect()
    }
}

impl SessionBackend for RecordingBackend {
    fn create(&mut self, request: CreateRequest) {
        self.calls.push(BackendCall::Create(request));
    }

    fn write(&mut self, session_id: &SessionId, data: &[u8]) {
        self.calls
            .push(BackendCall::Write(session_id.clone(), data.to_vec()));
    }

    fn resize(&mut self, session_id: &SessionId, size: GridSize) {
        self.calls.push(BackendCall::Resize(session_id.clone(), size));
    }

    fn request_buffer(&mut self, session_id: &SessionId) {
        self.calls.push(BackendCall::RequestBuffer(session_id.clone()));
    }

    fn kill(&mut self, session_id: &SessionId) {
        self.calls.push(BackendCall::Kill(session_id.clone()));
    }
}
