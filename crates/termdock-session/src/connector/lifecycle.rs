//! SessionConnector: create or reconnect, replay, then live passthrough.

use std::path::PathBuf;
use std::time::Instant;

use termdock_common::{GridSize, SessionError, SessionId};
use tracing::{debug, error, info, warn};

use super::replay::ReplayBuffer;
use super::types::{ConnectionState, ConnectorConfig, ConnectorEvent, SessionOrigin};
use crate::backend::{BackendEvent, CreateReply, CreateRequest, SessionBackend, Snapshot};
use crate::decode::Utf8Stream;
use crate::terminal::TerminalSink;

pub struct SessionConnector {
    session_id: SessionId,
    cwd: Option<PathBuf>,
    config: ConnectorConfig,
    state: ConnectionState,
    frames_left: u8,
    create_sent: bool,
    origin: Option<SessionOrigin>,
    replay: ReplayBuffer,
    decoder: Utf8Stream,
    wrote_output: bool,
    command: Option<String>,
    command_due: Option<Instant>,
}

impl SessionConnector {
    pub fn new(session_id: SessionId, cwd: Option<PathBuf>, config: ConnectorConfig) -> Self {
        let frames_left = config.fit_frames.max(1);
        Self {
            session_id,
            cwd,
            config,
            state: ConnectionState::Connecting,
            frames_left,
            create_sent: false,
            origin: None,
            replay: ReplayBuffer::default(),
            decoder: Utf8Stream::new(),
            wrote_output: false,
            command: None,
            command_due: None,
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn origin(&self) -> Option<SessionOrigin> {
        self.origin
    }

    pub fn is_disposed(&self) -> bool {
        self.state == ConnectionState::Disposed
    }

    /// The backend knows this session, so resizes and input can go out.
    pub fn is_attached(&self) -> bool {
        self.origin.is_some() && !self.is_disposed()
    }

    pub fn has_pending_command(&self) -> bool {
        self.command.is_some()
    }

    /// Hand this pane a command to run once its shell is interactive.
    pub fn queue_command(&mut self, text: impl Into<String>, now: Instant) {
        if self.is_disposed() {
            return;
        }
        let text = text.into();
        if text.trim().is_empty() {
            return;
        }
        self.command = Some(text);
        self.command_due = self.wrote_output.then(|| now + self.config.command_send_delay);
    }

    /// Count an animation frame after mount. On the last one, issue the
    /// create request at `fitted` (or the configured default). Returns
    /// `true` when the request went out.
    pub fn on_animation_frame(
        &mut self,
        fitted: Option<GridSize>,
        backend: &mut dyn SessionBackend,
    ) -> bool {
        if self.state != ConnectionState::Connecting || self.create_sent {
            return false;
        }
        self.frames_left = self.frames_left.saturating_sub(1);
        if self.frames_left > 0 {
            return false;
        }
        let size = fitted.unwrap_or(self.config.default_size).clamped();
        debug!(session_id = %self.session_id, cols = size.cols, rows = size.rows, "creating session");
        backend.create(CreateRequest {
            session_id: self.session_id.clone(),
            cwd: self.cwd.clone(),
            size,
        });
        self.create_sent = true;
        true
    }

    pub fn handle_event(
        &mut self,
        event: BackendEvent,
        now: Instant,
        backend: &mut dyn SessionBackend,
        sink: &mut dyn TerminalSink,
    ) -> Vec<ConnectorEvent> {
        if self.is_disposed() {
            return Vec::new();
        }
        match event {
            BackendEvent::Created { result, .. } => self.handle_created(result, now, backend, sink),
            BackendEvent::Buffer { result, .. } => self.handle_buffer(result, now, sink),
            BackendEvent::Data { offset, bytes, .. } => self.handle_data(offset, &bytes, now, sink),
            BackendEvent::Exit { code, .. } => vec![ConnectorEvent::Exited(code)],
        }
    }

    fn handle_created(
        &mut self,
        result: Result<CreateReply, SessionError>,
        now: Instant,
        backend: &mut dyn SessionBackend,
        sink: &mut dyn TerminalSink,
    ) -> Vec<ConnectorEvent> {
        let mut events = Vec::new();
        if self.state != ConnectionState::Connecting || self.origin.is_some() {
            return events;
        }
        match result {
            Ok(CreateReply { created: true }) => {
                info!(session_id = %self.session_id, "session created");
                self.origin = Some(SessionOrigin::Created);
                events.push(ConnectorEvent::Attached(SessionOrigin::Created));
                self.state = ConnectionState::Live;
                let queued = self.replay.flush();
                self.render(&queued, now, sink, &mut events);
            }
            Ok(CreateReply { created: false }) => {
                info!(session_id = %self.session_id, "reconnected, replaying scrollback");
                self.origin = Some(SessionOrigin::Reconnected);
                events.push(ConnectorEvent::Attached(SessionOrigin::Reconnected));
                self.state = ConnectionState::Replaying;
                backend.request_buffer(&self.session_id);
            }
            Err(e) => {
                error!(session_id = %self.session_id, "session create failed: {e}");
                self.origin = Some(SessionOrigin::Unconfirmed);
                events.push(ConnectorEvent::Attached(SessionOrigin::Unconfirmed));
                self.state = ConnectionState::Live;
                let queued = self.replay.flush();
                self.render(&queued, now, sink, &mut events);
            }
        }
        events
    }

    fn handle_buffer(
        &mut self,
        result: Result<Snapshot, SessionError>,
        now: Instant,
        sink: &mut dyn TerminalSink,
    ) -> Vec<ConnectorEvent> {
        let mut events = Vec::new();
        if self.state != ConnectionState::Replaying {
            return events;
        }
        let bytes = match result {
            Ok(snapshot) => {
                debug!(
                    session_id = %self.session_id,
                    bytes = snapshot.data.len(),
                    queued = self.replay.queued_bytes(),
                    "replaying snapshot"
                );
                self.replay.cut_over(snapshot.data, snapshot.end_offset)
            }
            Err(e) => {
                warn!(session_id = %self.session_id, "scrollback unavailable: {e}");
                self.replay.flush()
            }
        };
        self.state = ConnectionState::Live;
        self.render(&bytes, now, sink, &mut events);
        events
    }

    fn handle_data(
        &mut self,
        offset: u64,
        bytes: &[u8],
        now: Instant,
        sink: &mut dyn TerminalSink,
    ) -> Vec<ConnectorEvent> {
        let mut events = Vec::new();
        if let Some(fresh) = self.replay.push(offset, bytes) {
            self.render(&fresh, now, sink, &mut events);
        }
        events
    }

    fn render(
        &mut self,
        bytes: &[u8],
        now: Instant,
        sink: &mut dyn TerminalSink,
        events: &mut Vec<ConnectorEvent>,
    ) {
        if bytes.is_empty() {
            return;
        }
        sink.write(bytes);
        if !self.wrote_output {
            self.wrote_output = true;
            if self.command.is_some() {
                self.command_due = Some(now + self.config.command_send_delay);
            }
        }
        let text = self.decoder.decode(bytes);
        if !text.is_empty() {
            events.push(ConnectorEvent::Output(text));
        }
    }

    /// Fire the queued command once it is due and the pane is live.
    pub fn poll(&mut self, now: Instant, backend: &mut dyn SessionBackend) -> Vec<ConnectorEvent> {
        if self.state != ConnectionState::Live {
            return Vec::new();
        }
        match self.command_due {
            Some(due) if due <= now => {}
            _ => return Vec::new(),
        }
        self.command_due = None;
        let Some(text) = self.command.take() else {
            return Vec::new();
        };
        let processing = self.config.is_processing_command(&text);
        info!(session_id = %self.session_id, command = %text, "submitting queued command");
        backend.write(&self.session_id, format!("{text}\r").as_bytes());
        vec![ConnectorEvent::CommandSent { text, processing }]
    }

    /// Keystrokes from the terminal.
    pub fn input(&mut self, bytes: &[u8], backend: &mut dyn SessionBackend) {
        if self.is_attached() {
            backend.write(&self.session_id, bytes);
        }
    }

    /// Apply a grid size to the terminal and, once attached, the backend.
    /// The size is clamped to the floor first.
    pub fn resize(
        &mut self,
        size: GridSize,
        backend: &mut dyn SessionBackend,
        sink: &mut dyn TerminalSink,
    ) {
        if self.is_disposed() {
            return;
        }
        let size = size.clamped();
        sink.resize(size);
        if self.is_attached() {
            backend.resize(&self.session_id, size);
        }
    }

    /// Unmount. The backend session keeps running.
    pub fn dispose(&mut self) {
        if self.is_disposed() {
            return;
        }
        debug!(session_id = %self.session_id, "connector disposed");
        self.state = ConnectionState::Disposed;
        self.command = None;
        self.command_due = None;
        self.replay = ReplayBuffer::default();
    }

    /// Dispose and end the backend session.
    pub fn kill(&mut self, backend: &mut dyn SessionBackend) {
        let attached = self.create_sent && !self.is_disposed();
        self.dispose();
        if attached {
            backend.kill(&self.session_id);
        }
    }
}
