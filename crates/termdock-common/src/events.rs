//! Typed in-process publish/subscribe.
//!
//! Each event type is its own channel. The payload type is part of the
//! topic, so a subscriber of `PortConflict` can only ever receive a
//! `PortConflict`. Channels are created lazily on first publish or
//! subscribe and live as long as the bus.

use std::any::{Any, TypeId};
use std::collections::HashMap;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::id::{ProjectId, SessionId};

/// A named event channel whose payload is the implementing type.
pub trait Topic: Clone + Send + 'static {
    const NAME: &'static str;
}

pub struct EventBus {
    capacity: usize,
    channels: Mutex<HashMap<TypeId, Box<dyn Any + Send + Sync>>>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            channels: Mutex::new(HashMap::new()),
        }
    }

    pub fn subscribe<T: Topic>(&self) -> broadcast::Receiver<T> {
        self.sender::<T>().subscribe()
    }

    /// Send to every current subscriber of `T`. Returns how many received it.
    pub fn publish<T: Topic>(&self, event: T) -> usize {
        let delivered = self.sender::<T>().send(event).unwrap_or(0);
        tracing::trace!(topic = T::NAME, delivered, "event published");
        delivered
    }

    fn sender<T: Topic>(&self) -> broadcast::Sender<T> {
        let mut channels = self.channels.lock();
        let slot = channels
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(broadcast::channel::<T>(self.capacity).0));
        match slot.downcast_ref::<broadcast::Sender<T>>() {
            Some(sender) => sender.clone(),
            None => {
                let sender = broadcast::channel::<T>(self.capacity).0;
                *slot = Box::new(sender.clone());
                sender
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}

// =============================================================================
// TOPICS
// =============================================================================

/// Ask every mounted pane (or one project's panes) to refit now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeNow {
    pub project: Option<ProjectId>,
}

impl Topic for ResizeNow {
    const NAME: &'static str = "resize-now";
}

/// Point a project's preview browser at a URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigateBrowser {
    pub project: ProjectId,
    pub url: String,
}

impl Topic for NavigateBrowser {
    const NAME: &'static str = "navigate-browser";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollapseSidebar {
    pub collapsed: bool,
}

impl Topic for CollapseSidebar {
    const NAME: &'static str = "collapse-sidebar";
}

/// A session's output announced a local server that won arbitration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevServerDetected {
    pub project: ProjectId,
    pub session: SessionId,
    pub url: String,
    pub port: u16,
}

impl Topic for DevServerDetected {
    const NAME: &'static str = "dev-server-detected";
}

/// A detected server's port is already claimed by another project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortConflict {
    pub port: u16,
    pub requested_by: ProjectId,
    pub owner: ProjectId,
}

impl Topic for PortConflict {
    const NAME: &'static str = "port-conflict";
}

/// A queued command that follows the "processing" naming convention was sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandProcessing {
    pub session: SessionId,
    pub active: bool,
}

impl Topic for CommandProcessing {
    const NAME: &'static str = "command-processing";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaneExited {
    pub project: ProjectId,
    pub session: SessionId,
    pub code: Option<u32>,
}

impl Topic for PaneExited {
    const NAME: &'static str = "pane-exited";
}
