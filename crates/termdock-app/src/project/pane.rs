//! One mounted pane: connector, resize coordinator and detector for a leaf.

use std::path::PathBuf;

use termdock_common::{LeafId, SessionId};
use termdock_detect::DevServerDetector;
use termdock_session::{
    ResizeCoordinator, ResizeRequest, SessionBackend, SessionConnector, TerminalSink,
};
use tokio_util::sync::CancellationToken;

use super::PaneContext;

pub(super) struct Pane<S> {
    pub(super) leaf: LeafId,
    pub(super) connector: SessionConnector,
    pub(super) resize: ResizeCoordinator,
    pub(super) detector: Option<DevServerDetector>,
    pub(super) sink: S,
    pub(super) probe: Option<CancellationToken>,
}

impl<S: TerminalSink> Pane<S> {
    pub(super) fn new(
        leaf: LeafId,
        session_id: SessionId,
        cwd: Option<PathBuf>,
        ctx: &PaneContext,
        sink: S,
    ) -> Self {
        Self {
            leaf,
            connector: SessionConnector::new(session_id, cwd, ctx.connector.clone()),
            resize: ResizeCoordinator::new(ctx.resize),
            detector: ctx.detector.clone().map(DevServerDetector::new),
            sink,
            probe: None,
        }
    }

    pub(super) fn apply_resize(
        &mut self,
        request: Option<ResizeRequest>,
        backend: &mut dyn SessionBackend,
    ) {
        if let Some(request) = request {
            self.connector.resize(request.size, backend, &mut self.sink);
        }
    }

    /// Unmount without touching the backend session.
    pub(super) fn dispose(&mut self) {
        self.connector.dispose();
        self.resize.dispose();
        if let Some(detector) = self.detector.as_mut() {
            detector.dispose();
        }
        if let Some(probe) = self.probe.take() {
            probe.cancel();
        }
    }

    /// Dispose and end the backend session.
    pub(super) fn kill(&mut self, backend: &mut dyn SessionBackend) {
        self.connector.kill(backend);
        self.dispose();
    }
}
