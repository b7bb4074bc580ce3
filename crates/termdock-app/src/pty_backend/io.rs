//! `SessionBackend` over real PTYs, plus draining and shutdown.

use std::io::Write;
use std::sync::mpsc;

use portable_pty::PtySize;
use termdock_common::{GridSize, SessionError, SessionId};
use termdock_session::{BackendEvent, CreateReply, CreateRequest, SessionBackend};
use tracing::{debug, info, warn};

use super::spawn::{default_shell, spawn_session, SpawnRequest};
use super::types::{PtyBackend, PtySession};

impl PtySession {
    fn write_input(&mut self, data: &[u8]) -> Result<(), SessionError> {
        self.writer
            .write_all(data)
            .map_err(|e| SessionError::Pty(format!("PTY write failed: {e}")))?;
        self.writer
            .flush()
            .map_err(|e| SessionError::Pty(format!("PTY flush failed: {e}")))
    }

    fn resize(&mut self, size: GridSize) -> Result<(), SessionError> {
        let new_size = PtySize {
            rows: size.rows,
            cols: size.cols,
            pixel_width: 0,
            pixel_height: 0,
        };
        if new_size.rows == self.size.rows && new_size.cols == self.size.cols {
            return Ok(());
        }
        self.master
            .resize(new_size)
            .map_err(|e| SessionError::Pty(format!("PTY resize failed: {e}")))?;
        self.size = new_size;
        Ok(())
    }

    fn kill(&mut self) {
        if let Err(e) = self.child.kill() {
            debug!("PTY kill error (may already be dead): {e}");
        }
    }

    fn wait_exit_code(&mut self) -> Option<u32> {
        match self.child.wait() {
            Ok(status) => Some(status.exit_code()),
            Err(e) => {
                debug!("PTY wait error: {e}");
                None
            }
        }
    }
}

impl PtyBackend {
    fn reply(&self, event: BackendEvent) {
        // The receiver lives in `self`, so this only fails during teardown.
        let _ = self.events_tx.send(event);
    }

    /// Everything the sessions produced since the last call, in order.
    ///
    /// An exit for a session that is still registered reaps the child and
    /// fills in its exit code; an exit for a killed session is dropped.
    pub fn drain_events(&mut self) -> Vec<BackendEvent> {
        let mut out = Vec::new();
        loop {
            match self.events_rx.try_recv() {
                Ok(BackendEvent::Exit { session_id, .. }) => {
                    let Some(mut session) = self.sessions.remove(&session_id) else {
                        continue;
                    };
                    let code = session.wait_exit_code();
                    info!(session_id = %session_id, ?code, "shell exited");
                    out.push(BackendEvent::Exit { session_id, code });
                }
                Ok(event) => out.push(event),
                Err(mpsc::TryRecvError::Empty) | Err(mpsc::TryRecvError::Disconnected) => break,
            }
        }
        out
    }

    /// Kill every session. Used at shutdown.
    pub fn kill_all(&mut self) {
        let count = self.sessions.len();
        for (_, mut session) in self.sessions.drain() {
            session.kill();
            session.wait_exit_code();
        }
        info!(count, "all sessions killed");
    }
}

impl SessionBackend for PtyBackend {
    fn create(&mut self, request: CreateRequest) {
        let session_id = request.session_id;
        if self.sessions.contains_key(&session_id) {
            debug!(session_id = %session_id, "session alive, reconnecting");
            self.reply(BackendEvent::Created {
                session_id,
                result: Ok(CreateReply { created: false }),
            });
            return;
        }

        let shell = self.shell.clone().unwrap_or_else(default_shell);
        let spawned = spawn_session(
            SpawnRequest {
                session_id: &session_id,
                size: request.size,
                cwd: request.cwd.as_deref(),
                shell: &shell,
                scrollback_bytes: self.scrollback_bytes,
            },
            self.events_tx.clone(),
        );
        let result = match spawned {
            Ok(session) => {
                info!(session_id = %session_id, shell = %shell, "session spawned");
                self.sessions.insert(session_id.clone(), session);
                Ok(CreateReply { created: true })
            }
            Err(e) => Err(e),
        };
        self.reply(BackendEvent::Created { session_id, result });
    }

    fn write(&mut self, session_id: &SessionId, data: &[u8]) {
        let Some(session) = self.sessions.get_mut(session_id) else {
            debug!(session_id = %session_id, "write to unknown session");
            return;
        };
        if let Err(e) = session.write_input(data) {
            warn!(session_id = %session_id, "{e}");
        }
    }

    fn resize(&mut self, session_id: &SessionId, size: GridSize) {
        let Some(session) = self.sessions.get_mut(session_id) else {
            return;
        };
        if let Err(e) = session.resize(size.clamped()) {
            warn!(session_id = %session_id, "{e}");
        }
    }

    fn request_buffer(&mut self, session_id: &SessionId) {
        let result = match self.sessions.get(session_id) {
            Some(session) => Ok(session.scrollback.lock().snapshot()),
            None => Err(SessionError::NotFound(session_id.to_string())),
        };
        self.reply(BackendEvent::Buffer {
            session_id: session_id.clone(),
            result,
        });
    }

    fn kill(&mut self, session_id: &SessionId) {
        if let Some(mut session) = self.sessions.remove(session_id) {
            info!(session_id = %session_id, "killing session");
            session.kill();
            session.wait_exit_code();
        }
    }
}
