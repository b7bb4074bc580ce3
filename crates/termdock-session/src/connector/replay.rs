//! Exactly-once handoff from scrollback replay to live output.
//!
//! Live chunks carry their stream offset. While a reconnect is waiting for
//! its snapshot, chunks are queued. At cut-over everything at or below the
//! snapshot's end offset is dropped (the snapshot already contains it) and
//! only the part beyond it is appended. A chunk that straddles the end is
//! trimmed. After cut-over a watermark keeps late duplicates out.

#[derive(Debug, Clone, PartialEq, Eq)]
struct Chunk {
    offset: u64,
    bytes: Vec<u8>,
}

impl Chunk {
    fn end(&self) -> u64 {
        self.offset + self.bytes.len() as u64
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Phase {
    Buffering { pending: Vec<Chunk> },
    Live { watermark: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ReplayBuffer {
    phase: Phase,
}

impl Default for ReplayBuffer {
    fn default() -> Self {
        Self {
            phase: Phase::Buffering {
                pending: Vec::new(),
            },
        }
    }
}

impl ReplayBuffer {
    pub(crate) fn is_live(&self) -> bool {
        matches!(self.phase, Phase::Live { .. })
    }

    pub(crate) fn queued_bytes(&self) -> usize {
        match &self.phase {
            Phase::Buffering { pending } => pending.iter().map(|c| c.bytes.len()).sum(),
            Phase::Live { .. } => 0,
        }
    }

    /// Accept a live chunk. Returns what should be written now: nothing
    /// while buffering or for a chunk already on screen.
    pub(crate) fn push(&mut self, offset: u64, bytes: &[u8]) -> Option<Vec<u8>> {
        match &mut self.phase {
            Phase::Buffering { pending } => {
                pending.push(Chunk {
                    offset,
                    bytes: bytes.to_vec(),
                });
                None
            }
            Phase::Live { watermark } => {
                let chunk = Chunk {
                    offset,
                    bytes: bytes.to_vec(),
                };
                let fresh = beyond(&chunk, *watermark)?;
                *watermark = chunk.end();
                Some(fresh.to_vec())
            }
        }
    }

    /// Go live without a snapshot: every queued chunk is new output.
    pub(crate) fn flush(&mut self) -> Vec<u8> {
        self.cut_over(Vec::new(), 0)
    }

    /// Go live on top of `snapshot`, which ends at stream offset `end`.
    /// Returns the snapshot followed by the queued bytes that lie past it.
    /// Calling this again once live returns nothing.
    pub(crate) fn cut_over(&mut self, snapshot: Vec<u8>, end: u64) -> Vec<u8> {
        let Phase::Buffering { pending } = &mut self.phase else {
            return Vec::new();
        };
        let pending = std::mem::take(pending);

        let mut out = snapshot;
        let mut watermark = end;
        for chunk in &pending {
            if let Some(fresh) = beyond(chunk, watermark) {
                out.extend_from_slice(fresh);
                watermark = chunk.end();
            }
        }
        self.phase = Phase::Live { watermark };
        out
    }
}

/// The part of `chunk` past `watermark`, or `None` if it is all behind it.
fn beyond(chunk: &Chunk, watermark: u64) -> Option<&[u8]> {
    if chunk.end() <= watermark {
        return None;
    }
    let skip = watermark.saturating_sub(chunk.offset) as usize;
    Some(&chunk.bytes[skip..])
}
