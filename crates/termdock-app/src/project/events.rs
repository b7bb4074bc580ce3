//! Frame, timer and backend-event handling for a project's panes.

use std::time::Instant;

use termdock_common::events::{
    CommandProcessing, DevServerDetected, NavigateBrowser, PaneExited, PortConflict,
};
use termdock_common::SessionId;
use termdock_detect::{port_in_use, wait_until_reachable, CollectedUrl, PreviewDecision};
use termdock_session::{BackendEvent, ConnectorEvent, SessionBackend, TerminalSink};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use super::ProjectPanes;

impl<S: TerminalSink> ProjectPanes<S> {
    /// One animation frame: mount fits, then coalesced resize callbacks.
    pub fn on_animation_frame(&mut self, backend: &mut dyn SessionBackend) {
        for pane in self.panes.values_mut() {
            let fit = pane.resize.current_fit();
            pane.connector.on_animation_frame(fit, backend);
            let request = pane.resize.on_animation_frame();
            pane.apply_resize(request, backend);
        }
    }

    /// Route a backend event to its pane. Returns `false` when no mounted
    /// pane listens to that session.
    pub fn handle_backend_event(
        &mut self,
        event: BackendEvent,
        now: Instant,
        backend: &mut dyn SessionBackend,
    ) -> bool {
        let session = event.session_id().clone();
        let Some(pane) = self.panes.get_mut(&session) else {
            if let BackendEvent::Exit { code, .. } = event {
                return self.on_unmounted_exit(&session, code);
            }
            trace!(session_id = %session, "event for unmounted session");
            return false;
        };
        let events = pane.connector.handle_event(event, now, backend, &mut pane.sink);
        self.apply_connector_events(&session, events, now);
        true
    }

    /// Timers: queued commands, deferred fits and collection windows.
    pub fn tick(&mut self, now: Instant, backend: &mut dyn SessionBackend) {
        let sessions: Vec<SessionId> = self.panes.keys().cloned().collect();
        for session in sessions {
            let Some(pane) = self.panes.get_mut(&session) else {
                continue;
            };
            let events = pane.connector.poll(now, backend);
            let request = pane.resize.poll(now);
            pane.apply_resize(request, backend);
            let winner = pane.detector.as_mut().and_then(|d| d.poll(now));

            self.apply_connector_events(&session, events, now);
            if let Some(winner) = winner {
                self.on_dev_server(&session, winner);
            }
        }
    }

    /// An ancestor layout transition started (sidebar collapse, split animation).
    pub fn begin_transition(&mut self) {
        for pane in self.panes.values_mut() {
            pane.resize.transition_start();
        }
    }

    pub fn end_transition(&mut self, backend: &mut dyn SessionBackend) {
        for pane in self.panes.values_mut() {
            let request = pane.resize.transition_end();
            pane.apply_resize(request, backend);
        }
    }

    /// Refit every pane now.
    pub fn force_resize(&mut self, backend: &mut dyn SessionBackend) {
        for pane in self.panes.values_mut() {
            let request = pane.resize.force();
            pane.apply_resize(request, backend);
        }
    }

    fn apply_connector_events(&mut self, session: &SessionId, events: Vec<ConnectorEvent>, now: Instant) {
        for event in events {
            match event {
                ConnectorEvent::Attached(origin) => {
                    debug!(session_id = %session, ?origin, "session attached");
                    if let Some(pane) = self.panes.get_mut(session) {
                        pane.resize.arm_suppression(now);
                    }
                }
                ConnectorEvent::Output(text) => {
                    let winner = self
                        .panes
                        .get_mut(session)
                        .and_then(|p| p.detector.as_mut())
                        .and_then(|d| d.feed(&text, now));
                    if let Some(winner) = winner {
                        self.on_dev_server(session, winner);
                    }
                }
                ConnectorEvent::CommandSent { text, processing } => {
                    debug!(session_id = %session, command = %text, processing, "command sent");
                    if processing {
                        self.ctx.bus.publish(CommandProcessing {
                            session: session.clone(),
                            active: true,
                        });
                    }
                }
                ConnectorEvent::Exited(code) => self.on_exit(session, code, now),
            }
        }
    }

    /// The shell is gone: drop its leaf (a fresh one replaces the last).
    fn on_exit(&mut self, session: &SessionId, code: Option<u32>, now: Instant) {
        info!(project = %self.project(), session_id = %session, ?code, "pane exited");
        if let Some(mut pane) = self.panes.remove(session) {
            pane.dispose();
        }
        self.commands.forget(session);
        self.tree.remove_by_session(session);
        self.ctx.bus.publish(PaneExited {
            project: self.project().clone(),
            session: session.clone(),
            code,
        });
        self.reconcile(now);
    }

    /// A shell of this project died while none of its panes were mounted.
    /// Its leaf still goes, so the persisted layout drops it too.
    fn on_unmounted_exit(&mut self, session: &SessionId, code: Option<u32>) -> bool {
        if self.tree.tree().find_leaf_by_session(session).is_none() {
            trace!(session_id = %session, "exit for a session of another project");
            return false;
        }
        info!(project = %self.project(), session_id = %session, ?code, "unmounted pane exited");
        self.commands.forget(session);
        self.tree.remove_by_session(session);
        self.ctx.bus.publish(PaneExited {
            project: self.project().clone(),
            session: session.clone(),
            code,
        });
        true
    }

    fn on_dev_server(&mut self, session: &SessionId, found: CollectedUrl) {
        let project = self.project().clone();
        match self.ctx.ports.claim_preview(&project, found.port) {
            PreviewDecision::Open => {
                info!(project = %project, session_id = %session, url = %found.url, "dev server detected");
                self.ctx.bus.publish(DevServerDetected {
                    project: project.clone(),
                    session: session.clone(),
                    url: found.url.clone(),
                    port: found.port,
                });
                self.start_probe(session, found.url, found.port);
            }
            PreviewDecision::Conflict { owner } => {
                warn!(project = %project, port = found.port, owner = %owner, "dev server port owned by another project");
                self.ctx.bus.publish(PortConflict {
                    port: found.port,
                    requested_by: project,
                    owner,
                });
            }
        }
    }

    /// Wait for the server to answer, then point the preview at it.
    /// Nothing is probed while the port is free: the announced server is
    /// not listening (yet, or any more). A failed check counts as bound.
    fn start_probe(&mut self, session: &SessionId, url: String, port: u16) {
        let Some(runtime) = self.ctx.runtime.clone() else {
            return;
        };
        if !port_in_use(self.ctx.port_check.as_ref(), port) {
            debug!(session_id = %session, port, "port not bound, skipping probe");
            return;
        }
        let Some(pane) = self.panes.get_mut(session) else {
            return;
        };
        let cancel = CancellationToken::new();
        if let Some(previous) = pane.probe.replace(cancel.clone()) {
            previous.cancel();
        }

        let bus = self.ctx.bus.clone();
        let probe = self.ctx.probe.clone();
        let project = self.tree.project().clone();
        runtime.spawn(async move {
            if wait_until_reachable(&url, &probe, &cancel).await {
                bus.publish(NavigateBrowser { project, url });
            } else if !cancel.is_cancelled() {
                debug!(url = %url, "dev server never became reachable");
            }
        });
    }
}
