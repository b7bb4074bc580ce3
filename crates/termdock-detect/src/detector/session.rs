//! Per-session detector state: rolling buffer, seen set, collection window.

use std::collections::HashSet;
use std::time::Instant;

use tracing::{debug, trace};

use super::classify::{classify, context_window, find_urls};
use super::{Classification, CollectedUrl, DetectorSettings};
use crate::ansi::EscapeStripper;

#[derive(Debug)]
struct CollectionWindow {
    deadline: Instant,
    candidates: Vec<CollectedUrl>,
}

#[derive(Debug)]
pub struct DevServerDetector {
    settings: DetectorSettings,
    stripper: EscapeStripper,
    buffer: String,
    buffer_len: usize,
    seen: HashSet<String>,
    window: Option<CollectionWindow>,
    /// Set while a URL at the end of the buffer may still be growing.
    settle_at: Option<Instant>,
    finished: bool,
}

impl DevServerDetector {
    pub fn new(settings: DetectorSettings) -> Self {
        Self {
            settings,
            stripper: EscapeStripper::default(),
            buffer: String::new(),
            buffer_len: 0,
            seen: HashSet::new(),
            window: None,
            settle_at: None,
            finished: false,
        }
    }

    /// A winner was picked or the detector was disposed.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// The next time `poll` has work: the collection window closing, or
    /// a trailing URL settling.
    pub fn deadline(&self) -> Option<Instant> {
        let window = self.window.as_ref().map(|w| w.deadline);
        match (window, self.settle_at) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Feed decoded output. Returns the winner if this text decided one.
    pub fn feed(&mut self, text: &str, now: Instant) -> Option<CollectedUrl> {
        if self.finished {
            return None;
        }
        if let Some(winner) = self.poll(now) {
            return Some(winner);
        }
        let stripped = self.stripper.strip(text);
        self.append(&stripped);
        self.settle_at = None;
        self.scan(now, false)
    }

    /// Settle a trailing URL once output has gone quiet, then close the
    /// collection window if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<CollectedUrl> {
        if self.finished {
            return None;
        }
        if self.settle_at.is_some_and(|at| at <= now) {
            self.settle_at = None;
            if let Some(winner) = self.scan(now, true) {
                return Some(winner);
            }
        }
        if !self.window.as_ref().is_some_and(|w| w.deadline <= now) {
            return None;
        }
        let window = self.window.take()?;
        match pick(&window.candidates, &self.settings.well_known_ports) {
            Some(winner) => Some(self.finish(winner.clone())),
            None => {
                debug!(candidates = window.candidates.len(), "only api servers seen, still listening");
                None
            }
        }
    }

    /// Look at every unseen URL in the buffer. Unless `settled`, a URL that
    /// may continue in the next chunk is left for later.
    fn scan(&mut self, now: Instant, settled: bool) -> Option<CollectedUrl> {
        for m in find_urls(&self.buffer) {
            if self.seen.contains(&m.url) {
                continue;
            }
            let rest = &self.buffer[m.end..];
            if may_continue(rest, settled) {
                if !settled {
                    self.settle_at = Some(now + self.settings.settle);
                }
                continue;
            }
            self.seen.insert(m.url.clone());
            let Some(port) = m.port else {
                trace!(url = %m.url, "ignoring url with invalid port");
                continue;
            };
            let context = context_window(&self.buffer, m.start, m.end, self.settings.context_chars);
            let candidate = CollectedUrl {
                url: m.url,
                classification: classify(context),
                port,
            };
            debug!(url = %candidate.url, port, classification = ?candidate.classification, "local url seen");

            if candidate.classification == Classification::Dev {
                return Some(self.finish(candidate));
            }
            let window_len = self.settings.window;
            let window = self.window.get_or_insert_with(|| CollectionWindow {
                deadline: now + window_len,
                candidates: Vec::new(),
            });
            window.candidates.push(candidate);
        }
        None
    }

    pub fn dispose(&mut self) {
        self.finished = true;
        self.window = None;
        self.settle_at = None;
        self.stripper.reset();
        self.buffer.clear();
        self.buffer_len = 0;
    }

    fn finish(&mut self, winner: CollectedUrl) -> CollectedUrl {
        debug!(url = %winner.url, port = winner.port, "dev server detected");
        self.finished = true;
        self.window = None;
        self.settle_at = None;
        winner
    }

    fn append(&mut self, text: &str) {
        self.buffer.push_str(text);
        self.buffer_len += text.chars().count();
        let excess = self.buffer_len.saturating_sub(self.settings.buffer_chars);
        if excess == 0 {
            return;
        }
        let cut = self
            .buffer
            .char_indices()
            .nth(excess)
            .map_or(self.buffer.len(), |(i, _)| i);
        self.buffer.drain(..cut);
        self.buffer_len -= excess;
    }
}

/// Whether the text after a URL match could still extend it: nothing yet,
/// or a port separator whose digits have not arrived. Once output has
/// settled only the latter holds, since a bare `host:` is no URL.
fn may_continue(rest: &str, settled: bool) -> bool {
    if rest.is_empty() {
        return !settled;
    }
    rest.strip_prefix(':')
        .is_some_and(|digits| digits.bytes().all(|b| b.is_ascii_digit()))
}

/// Best `Dev`, else best `Ambiguous`. Within a class a well-known port wins,
/// else the first seen. All-`Api` windows pick nothing.
fn pick<'a>(candidates: &'a [CollectedUrl], well_known: &[u16]) -> Option<&'a CollectedUrl> {
    [Classification::Dev, Classification::Ambiguous]
        .into_iter()
        .find_map(|class| {
            let of_class: Vec<&CollectedUrl> = candidates
                .iter()
                .filter(|c| c.classification == class)
                .collect();
            of_class
                .iter()
                .find(|c| well_known.contains(&c.port))
                .or(of_class.first())
                .copied()
        })
}
