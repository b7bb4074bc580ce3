//! Dev-server detection over a pane's decoded output.
//!
//! A frontend URL wins immediately. Anything else opens a fixed collection
//! window (not extended by later URLs); when it closes the best candidate
//! wins, or nothing does if every candidate looked like an API server. At
//! most one winner per session.

mod classify;
mod session;

use std::time::Duration;

use termdock_config::schema::DetectorConfig;

pub use session::DevServerDetector;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Dev,
    Api,
    Ambiguous,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedUrl {
    pub url: String,
    pub classification: Classification,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DetectorSettings {
    pub buffer_chars: usize,
    pub context_chars: usize,
    pub window: Duration,
    /// Quiet period after which a URL at the end of the output is taken
    /// as complete.
    pub settle: Duration,
    pub well_known_ports: Vec<u16>,
}

impl Default for DetectorSettings {
    fn default() -> Self {
        Self::from_config(&DetectorConfig::default())
    }
}

impl DetectorSettings {
    pub fn from_config(config: &DetectorConfig) -> Self {
        Self {
            buffer_chars: config.buffer_chars,
            context_chars: config.context_chars,
            window: Duration::from_millis(config.collection_window_ms),
            settle: Duration::from_millis(config.settle_ms),
            well_known_ports: config.well_known_ports.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;

    fn detector() -> DevServerDetector {
        DevServerDetector::new(DetectorSettings::default())
    }

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn frontend_url_fires_immediately() {
        let mut d = detector();
        let now = Instant::now();
        let winner = d
            .feed("Local: http://localhost:5173 — ready in 120ms", now)
            .unwrap();
        assert_eq!(winner.port, 5173);
        assert_eq!(winner.classification, Classification::Dev);
        assert!(d.is_finished());
        assert_eq!(d.feed("Local: http://localhost:5174/ ready in 1ms\n", now), None);
    }

    #[test]
    fn vite_banner_with_colors_fires() {
        let mut d = detector();
        let out = "\r\n  \x1b[32m\x1b[1mVITE\x1b[22m v5.2.0\x1b[39m  \x1b[2mready in \x1b[0m\x1b[1m312\x1b[22m\x1b[2m ms\x1b[22m\r\n\r\n  \x1b[32m➜\x1b[39m  \x1b[1mLocal\x1b[22m:   \x1b[36mhttp://localhost:\x1b[1m5173\x1b[22m/\x1b[39m\r\n";
        let winner = d.feed(out, Instant::now()).unwrap();
        assert_eq!(winner.url, "http://localhost:5173/");
    }

    #[test]
    fn api_only_output_never_fires() {
        let mut d = detector();
        let t0 = Instant::now();
        assert_eq!(d.feed("express server listening on http://localhost:3005\n", t0), None);
        assert!(d.deadline().is_some());
        assert_eq!(d.poll(t0 + secs(4)), None);
        assert!(!d.is_finished());
        assert!(d.deadline().is_none());
    }

    #[test]
    fn url_at_end_of_output_fires_once_output_settles() {
        let mut d = detector();
        let t0 = Instant::now();
        let settle = DetectorSettings::default().settle;
        assert_eq!(d.feed("VITE ready in 120ms  Local: http://localhost:5173", t0), None);
        assert_eq!(d.deadline(), Some(t0 + settle));
        assert_eq!(d.poll(t0 + settle - Duration::from_millis(1)), None);

        let winner = d.poll(t0 + settle).unwrap();
        assert_eq!(winner.url, "http://localhost:5173");
        assert_eq!(winner.classification, Classification::Dev);
    }

    #[test]
    fn trailing_api_url_joins_window_after_settling() {
        let mut d = detector();
        let t0 = Instant::now();
        let settle = DetectorSettings::default().settle;
        assert_eq!(d.feed("express server listening on http://localhost:3005", t0), None);
        assert_eq!(d.poll(t0 + settle), None);
        assert_eq!(d.deadline(), Some(t0 + settle + secs(3)));
    }

    #[test]
    fn url_split_across_chunks_reports_full_port() {
        let mut d = detector();
        let t0 = Instant::now();
        assert_eq!(
            d.feed("  VITE v5 ready in 300 ms\r\n  Local:   http://localhost:\x1b[1", t0),
            None
        );
        let winner = d.feed("m5173\x1b[22m/\r\n", t0 + Duration::from_millis(5)).unwrap();
        assert_eq!(winner.url, "http://localhost:5173/");
        assert_eq!(winner.port, 5173);
    }

    #[test]
    fn url_split_inside_port_digits_waits() {
        let mut d = detector();
        let t0 = Instant::now();
        assert_eq!(d.feed("Local: http://localhost:51", t0), None);
        let winner = d.feed("73/\n", t0).unwrap();
        assert_eq!(winner.port, 5173);
    }

    #[test]
    fn bare_port_separator_never_settles_into_a_url() {
        let mut d = detector();
        let t0 = Instant::now();
        assert_eq!(d.feed("Local: http://localhost:", t0), None);
        assert_eq!(d.poll(t0 + secs(60)), None);
        assert!(!d.is_finished());
    }

    #[test]
    fn window_prefers_well_known_port() {
        let mut d = detector();
        let t0 = Instant::now();
        assert_eq!(d.feed("serving on http://localhost:4999\n", t0), None);
        assert_eq!(d.feed("also at http://localhost:5173\n", t0 + secs(1)), None);
        assert_eq!(d.poll(t0 + Duration::from_millis(2999)), None);
        let winner = d.poll(t0 + secs(3)).unwrap();
        assert_eq!(winner.port, 5173);
        assert_eq!(winner.classification, Classification::Ambiguous);
        assert!(d.is_finished());
    }

    #[test]
    fn window_falls_back_to_first_seen() {
        let mut d = detector();
        let t0 = Instant::now();
        d.feed("one http://localhost:4999\n", t0);
        d.feed("two http://localhost:4998\n", t0);
        assert_eq!(d.poll(t0 + secs(3)).unwrap().port, 4999);
    }

    #[test]
    fn ambiguous_beats_api() {
        let mut d = detector();
        let t0 = Instant::now();
        let api = "express listening at http://localhost:3000\n";
        let filler = ".".repeat(400);
        d.feed(&format!("{api}{filler}\nopen http://127.0.0.1:4999\n"), t0);
        let winner = d.poll(t0 + secs(3)).unwrap();
        assert_eq!(winner.port, 4999);
    }

    #[test]
    fn window_is_not_extended_by_new_urls() {
        let mut d = detector();
        let t0 = Instant::now();
        d.feed("at http://localhost:4999\n", t0);
        let deadline = d.deadline().unwrap();
        d.feed("at http://localhost:4998\n", t0 + secs(2));
        assert_eq!(d.deadline(), Some(deadline));
    }

    #[test]
    fn dev_during_window_fires_at_once() {
        let mut d = detector();
        let t0 = Instant::now();
        d.feed("at http://localhost:4999\n", t0);
        let filler = ".".repeat(400);
        let winner = d
            .feed(&format!("{filler}\nvite dev: http://localhost:5174/\n"), t0 + secs(1))
            .unwrap();
        assert_eq!(winner.port, 5174);
        assert!(d.deadline().is_none());
    }

    #[test]
    fn listening_continues_after_api_only_window() {
        let mut d = detector();
        let t0 = Instant::now();
        d.feed("express listening on http://localhost:3005\n", t0);
        assert_eq!(d.poll(t0 + secs(3)), None);
        let filler = ".".repeat(400);
        let winner = d
            .feed(&format!("{filler}\n  Local:   http://localhost:5173/\n"), t0 + secs(10))
            .unwrap();
        assert_eq!(winner.port, 5173);
    }

    #[test]
    fn expired_window_resolves_on_next_feed() {
        let mut d = detector();
        let t0 = Instant::now();
        d.feed("at http://localhost:4999\n", t0);
        let winner = d.feed("more output\n", t0 + secs(5)).unwrap();
        assert_eq!(winner.port, 4999);
    }

    #[test]
    fn duplicate_urls_are_seen_once() {
        let mut d = detector();
        let t0 = Instant::now();
        d.feed("at http://localhost:3005\n", t0);
        d.feed("at http://localhost:3005\n", t0);
        assert_eq!(d.poll(t0 + secs(3)).unwrap().url, "http://localhost:3005");
    }

    #[test]
    fn invalid_port_is_ignored() {
        let mut d = detector();
        let t0 = Instant::now();
        d.feed("at http://localhost:70000\n", t0);
        assert!(d.deadline().is_none());
    }

    #[test]
    fn dispose_stops_detection() {
        let mut d = detector();
        let t0 = Instant::now();
        d.feed("at http://localhost:4999\n", t0);
        d.dispose();
        assert_eq!(d.poll(t0 + secs(3)), None);
        assert_eq!(d.feed("Local: http://localhost:5173/ ready\n", t0), None);
    }
}
