//! Dev-server detection and reachability probe configuration.

use serde::{Deserialize, Serialize};

/// Ports that frontend dev servers bind by default.
pub const DEFAULT_WELL_KNOWN_PORTS: [u16; 10] =
    [5173, 5174, 3000, 3001, 4200, 8080, 4321, 8000, 6006, 19006];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub enabled: bool,
    /// Rolling text buffer size per session, in characters (valid range: 256-65536).
    pub buffer_chars: usize,
    /// Characters inspected on each side of a URL match (valid range: 20-2048).
    pub context_chars: usize,
    /// Collection window for non-frontend candidates (valid range: 100-60000).
    pub collection_window_ms: u64,
    /// Quiet period before a URL at the very end of the output counts as
    /// complete (valid range: 10-5000).
    pub settle_ms: u64,
    /// Preferred ports when arbitrating between candidates.
    pub well_known_ports: Vec<u16>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            buffer_chars: 2048,
            context_chars: 300,
            collection_window_ms: 3000,
            settle_ms: 150,
            well_known_ports: DEFAULT_WELL_KNOWN_PORTS.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Deadline for a single reachability attempt.
    pub attempt_timeout_ms: u64,
    /// Delay before each attempt; the probe gives up after the last one.
    pub retry_delays_ms: Vec<u64>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            attempt_timeout_ms: 1500,
            retry_delays_ms: vec![0, 250, 500, 1000, 2000, 4000],
        }
    }
}
