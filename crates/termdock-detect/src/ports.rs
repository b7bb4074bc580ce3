//! Process-wide port ownership, and whether a port is bound locally.
//!
//! The registry is advisory: it only records which project claimed a dev
//! server port first, so a second project's detector does not open a
//! preview of someone else's server.

use std::collections::HashMap;
use std::io;
use std::net::TcpListener;
use std::sync::Arc;

use parking_lot::Mutex;
use termdock_common::{DetectError, ProjectId};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterOutcome {
    Registered,
    /// Already held by the same project.
    AlreadyOwned,
    Conflict { owner: ProjectId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewDecision {
    Open,
    /// Another project holds the port; the preview is suppressed.
    Conflict { owner: ProjectId },
}

#[derive(Debug, Clone, Default)]
pub struct PortRegistry {
    owners: Arc<Mutex<HashMap<u16, ProjectId>>>,
}

impl PortRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, project: &ProjectId, port: u16) -> RegisterOutcome {
        let mut owners = self.owners.lock();
        match owners.get(&port) {
            Some(owner) if owner == project => RegisterOutcome::AlreadyOwned,
            Some(owner) => RegisterOutcome::Conflict {
                owner: owner.clone(),
            },
            None => {
                owners.insert(port, project.clone());
                debug!(port, project = %project, "port registered");
                RegisterOutcome::Registered
            }
        }
    }

    /// No-op unless `project` is the current owner.
    pub fn unregister(&self, project: &ProjectId, port: u16) -> bool {
        let mut owners = self.owners.lock();
        if owners.get(&port) != Some(project) {
            return false;
        }
        owners.remove(&port);
        debug!(port, project = %project, "port unregistered");
        true
    }

    pub fn owner(&self, port: u16) -> Option<ProjectId> {
        self.owners.lock().get(&port).cloned()
    }

    /// Drop every claim held by `project`. Returns the released ports.
    pub fn release_project(&self, project: &ProjectId) -> Vec<u16> {
        let mut owners = self.owners.lock();
        let mut released: Vec<u16> = owners
            .iter()
            .filter(|(_, owner)| *owner == project)
            .map(|(port, _)| *port)
            .collect();
        released.sort_unstable();
        for port in &released {
            owners.remove(port);
        }
        if !released.is_empty() {
            debug!(project = %project, ports = ?released, "released project ports");
        }
        released
    }

    /// Decide whether `project` may act on a detected server on `port`,
    /// claiming the port when it is free.
    pub fn claim_preview(&self, project: &ProjectId, port: u16) -> PreviewDecision {
        match self.register(project, port) {
            RegisterOutcome::Registered | RegisterOutcome::AlreadyOwned => PreviewDecision::Open,
            RegisterOutcome::Conflict { owner } => {
                info!(port, project = %project, owner = %owner, "port owned by another project");
                PreviewDecision::Conflict { owner }
            }
        }
    }
}

pub trait PortCheck {
    /// `Ok(true)` when something is already listening on `port`.
    fn check_port_bound(&self, port: u16) -> Result<bool, DetectError>;
}

/// Checks by trying to bind `127.0.0.1:port`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalPortCheck;

impl PortCheck for LocalPortCheck {
    fn check_port_bound(&self, port: u16) -> Result<bool, DetectError> {
        match TcpListener::bind(("127.0.0.1", port)) {
            Ok(_listener) => Ok(false),
            Err(e) if e.kind() == io::ErrorKind::AddrInUse => Ok(true),
            Err(e) => Err(DetectError::PortCheck(format!("port {port}: {e}"))),
        }
    }
}

/// A failed check counts as "in use".
pub fn port_in_use(check: &dyn PortCheck, port: u16) -> bool {
    check.check_port_bound(port).unwrap_or_else(|e| {
        warn!(port, "port check failed, assuming in use: {e}");
        true
    })
}
