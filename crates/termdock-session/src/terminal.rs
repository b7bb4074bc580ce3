//! The screen side of a pane.

use termdock_common::GridSize;

/// Where a pane's output ends up. The real thing is a terminal emulator;
/// the headless host renders to stdout.
pub trait TerminalSink {
    fn write(&mut self, bytes: &[u8]);

    fn resize(&mut self, _size: GridSize) {}
}

/// Keeps everything written to it.
#[derive(Debug, Default)]
pub struct TranscriptSink {
    pub bytes: Vec<u8>,
    pub size: Option<GridSize>,
    pub writes: usize,
}

impl TranscriptSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

impl TerminalSink for TranscriptSink {
    fn write(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
        self.writes += 1;
    }

    fn resize(&mut self, size: GridSize) {
        self.size = Some(size);
    }
}
