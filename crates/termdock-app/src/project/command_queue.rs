//! "Run this command now": one side pane whose shell gets a queued command.

use std::collections::HashMap;
use std::time::Instant;

use termdock_common::{LeafId, SessionId};
use termdock_session::{SessionBackend, TerminalSink};
use termdock_tiling::Direction;
use tracing::info;

use super::ProjectPanes;

/// Commands waiting for their pane to mount, and the current command pane.
#[derive(Debug, Default)]
pub struct CommandQueue {
    pending: HashMap<SessionId, String>,
    current: Option<SessionId>,
}

impl CommandQueue {
    pub fn current(&self) -> Option<&SessionId> {
        self.current.as_ref()
    }

    pub fn pending_for(&self, session: &SessionId) -> Option<&str> {
        self.pending.get(session).map(String::as_str)
    }

    pub(super) fn assign(&mut self, session: SessionId, text: String) {
        self.pending.insert(session.clone(), text);
        self.current = Some(session);
    }

    pub(super) fn take_pending(&mut self, session: &SessionId) -> Option<String> {
        self.pending.remove(session)
    }

    pub(super) fn forget(&mut self, session: &SessionId) {
        self.pending.remove(session);
        if self.current.as_ref() == Some(session) {
            self.current = None;
        }
    }
}

impl<S: TerminalSink> ProjectPanes<S> {
    /// Replace the command pane: kill the previous one, split a fresh leaf
    /// next to the focused one and queue `text` for its shell. Returns the
    /// new leaf, which is focused.
    pub fn run_command(
        &mut self,
        text: &str,
        now: Instant,
        backend: &mut dyn SessionBackend,
    ) -> LeafId {
        if let Some(previous) = self.commands.current().cloned() {
            info!(project = %self.project(), session_id = %previous, "replacing command pane");
            self.kill_session(&previous, backend);
            self.tree.remove_by_session(&previous);
        }

        let leaf = self.tree.split_focused(Direction::Horizontal);
        if let Some(session) = self.tree.session_of(&leaf) {
            info!(project = %self.project(), session_id = %session, command = %text, "command pane opened");
            self.commands.assign(session, text.to_string());
        }
        self.reconcile(now);
        leaf
    }

    pub fn command_queue(&self) -> &CommandQueue {
        &self.commands
    }
}
