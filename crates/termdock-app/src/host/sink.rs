use std::io::Write;

use termdock_common::{GridSize, SessionId};
use termdock_session::TerminalSink;
use tracing::{debug, warn};

/// Writes a pane's output straight to this process's stdout.
pub struct StdoutSink {
    session: SessionId,
}

impl StdoutSink {
    pub fn for_session(session: &SessionId) -> Self {
        Self {
            session: session.clone(),
        }
    }
}

impl TerminalSink for StdoutSink {
    fn write(&mut self, bytes: &[u8]) {
        let mut out = std::io::stdout().lock();
        if let Err(e) = out.write_all(bytes).and_then(|()| out.flush()) {
            warn!(session_id = %self.session, "stdout write failed: {e}");
        }
    }

    fn resize(&mut self, size: GridSize) {
        debug!(session_id = %self.session, cols = size.cols, rows = size.rows, "pane grid resized");
    }
}
