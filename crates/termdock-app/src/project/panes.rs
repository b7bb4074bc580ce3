//! ProjectPanes: a project's tree plus the panes mounted for its leaves.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Instant;

use termdock_common::{LeafId, PaneBox, ProjectId, SessionId};
use termdock_session::{ConnectionState, SessionBackend, TerminalSink};
use termdock_tiling::{Direction, PaneCommand, PaneTree};
use tracing::{debug, info};

use super::command_queue::CommandQueue;
use super::pane::Pane;
use super::PaneContext;

pub struct ProjectPanes<S> {
    pub(super) tree: PaneTree,
    pub(super) cwd: Option<PathBuf>,
    pub(super) ctx: PaneContext,
    pub(super) make_sink: fn(&SessionId) -> S,
    pub(super) panes: HashMap<SessionId, Pane<S>>,
    pub(super) commands: CommandQueue,
    pub(super) mounted: bool,
}

impl<S: TerminalSink> ProjectPanes<S> {
    pub fn new(
        tree: PaneTree,
        cwd: Option<PathBuf>,
        ctx: PaneContext,
        make_sink: fn(&SessionId) -> S,
    ) -> Self {
        Self {
            tree,
            cwd,
            ctx,
            make_sink,
            panes: HashMap::new(),
            commands: CommandQueue::default(),
            mounted: false,
        }
    }

    // -- Accessors --

    pub fn project(&self) -> &ProjectId {
        self.tree.project()
    }

    pub fn tree(&self) -> &PaneTree {
        &self.tree
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn pane_count(&self) -> usize {
        self.panes.len()
    }

    /// Sessions of the tree's leaves, in focus order.
    pub fn session_ids(&self) -> Vec<SessionId> {
        self.tree
            .tree()
            .leaves()
            .into_iter()
            .map(|l| l.session_id.clone())
            .collect()
    }

    pub fn focused_session(&self) -> Option<SessionId> {
        self.tree.session_of(&self.tree.focused_or_first())
    }

    /// Whether events for `session` are being routed to a pane.
    pub fn is_subscribed(&self, session: &SessionId) -> bool {
        self.panes.contains_key(session)
    }

    pub fn state(&self, session: &SessionId) -> Option<ConnectionState> {
        self.panes.get(session).map(|p| p.connector.state())
    }

    pub fn sink(&self, session: &SessionId) -> Option<&S> {
        self.panes.get(session).map(|p| &p.sink)
    }

    /// Whether `session`'s server is being polled until it answers.
    pub fn is_awaiting_preview(&self, session: &SessionId) -> bool {
        self.panes
            .get(session)
            .and_then(|p| p.probe.as_ref())
            .is_some_and(|token| !token.is_cancelled())
    }

    pub fn leaf_of(&self, session: &SessionId) -> Option<&LeafId> {
        self.panes.get(session).map(|p| &p.leaf)
    }

    // -- Mounting --

    pub fn mount(&mut self, now: Instant) {
        if self.mounted {
            return;
        }
        info!(project = %self.project(), leaves = self.tree.leaf_count(), "mounting project");
        self.mounted = true;
        self.reconcile(now);
    }

    /// Dispose every pane. Backend sessions keep running, so a later
    /// mount reconnects and replays.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        info!(project = %self.project(), panes = self.panes.len(), "unmounting project");
        for (_, mut pane) in self.panes.drain() {
            pane.dispose();
        }
        self.mounted = false;
    }

    /// Close the project: kill its sessions and release its ports.
    pub fn close(&mut self, backend: &mut dyn SessionBackend) {
        for session in self.session_ids() {
            self.kill_session(&session, backend);
        }
        self.unmount();
        let released = self.ctx.ports.release_project(self.tree.project());
        info!(project = %self.project(), ports = ?released, "project closed");
    }

    /// Bring the mounted panes in line with the tree's leaves.
    pub(super) fn reconcile(&mut self, now: Instant) {
        if !self.mounted {
            return;
        }
        let leaves: Vec<(LeafId, SessionId)> = self
            .tree
            .tree()
            .leaves()
            .into_iter()
            .map(|l| (l.id.clone(), l.session_id.clone()))
            .collect();

        let stale: Vec<SessionId> = self
            .panes
            .keys()
            .filter(|s| !leaves.iter().any(|(_, session)| session == *s))
            .cloned()
            .collect();
        for session in stale {
            if let Some(mut pane) = self.panes.remove(&session) {
                debug!(session_id = %session, "pane unmounted");
                pane.dispose();
            }
        }

        for (leaf, session) in leaves {
            if self.panes.contains_key(&session) {
                continue;
            }
            debug!(leaf = %leaf, session_id = %session, "pane mounted");
            let sink = (self.make_sink)(&session);
            let mut pane = Pane::new(leaf, session.clone(), self.cwd.clone(), &self.ctx, sink);
            if let Some(text) = self.commands.take_pending(&session) {
                pane.connector.queue_command(text, now);
            }
            self.panes.insert(session, pane);
        }
    }

    // -- Commands --

    pub fn handle_command(
        &mut self,
        command: PaneCommand,
        now: Instant,
        backend: &mut dyn SessionBackend,
    ) {
        debug!(project = %self.project(), ?command, "pane command");
        match command {
            PaneCommand::SplitRight => {
                self.tree.split_focused(Direction::Horizontal);
            }
            PaneCommand::SplitDown => {
                self.tree.split_focused(Direction::Vertical);
            }
            PaneCommand::ClosePane => self.close_focused(backend),
            PaneCommand::FocusPrev => {
                self.tree.focus_prev();
            }
            PaneCommand::FocusNext => {
                self.tree.focus_next();
            }
        }
        self.reconcile(now);
    }

    fn close_focused(&mut self, backend: &mut dyn SessionBackend) {
        let leaf = self.tree.focused_or_first();
        if let Some(session) = self.tree.session_of(&leaf) {
            self.kill_session(&session, backend);
        }
        self.tree.remove(&leaf);
    }

    pub(super) fn kill_session(&mut self, session: &SessionId, backend: &mut dyn SessionBackend) {
        match self.panes.remove(session) {
            Some(mut pane) => pane.kill(backend),
            None => backend.kill(session),
        }
        self.commands.forget(session);
    }

    // -- Input --

    /// Keystrokes for the focused pane.
    pub fn input(&mut self, bytes: &[u8], backend: &mut dyn SessionBackend) {
        let Some(session) = self.focused_session() else {
            return;
        };
        if let Some(pane) = self.panes.get_mut(&session) {
            pane.connector.input(bytes, backend);
        }
    }

    /// New content box for `leaf`, from the layout.
    pub fn set_pane_box(&mut self, leaf: &LeafId, pane_box: PaneBox, now: Instant) {
        let Some(session) = self.tree.session_of(leaf) else {
            return;
        };
        if let Some(pane) = self.panes.get_mut(&session) {
            pane.resize.observe(pane_box, now);
        }
    }
}
