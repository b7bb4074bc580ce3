//! Passive detection of locally started dev servers in terminal output,
//! and the process-wide registry of which project owns which port.

pub mod ansi;
pub mod detector;
pub mod ports;
pub mod probe;

pub use detector::{Classification, CollectedUrl, DetectorSettings, DevServerDetector};
pub use ports::{
    port_in_use, LocalPortCheck, PortCheck, PortRegistry, PreviewDecision, RegisterOutcome,
};
pub use probe::wait_until_reachable;
