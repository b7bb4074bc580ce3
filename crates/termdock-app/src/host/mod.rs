//! Headless host: drives one project's panes from a fixed-rate loop.
//!
//! Pane output goes to stdout. Control and shell input arrive as lines on
//! stdin (see [`input::parse_line`]). Bus events are logged.

mod input;
mod sidebar;
mod sink;

pub use input::{parse_line, HostInput};
pub use sink::StdoutSink;

use std::io::BufRead;
use std::sync::{mpsc, Arc};
use std::time::{Duration, Instant};

use termdock_common::events::{
    CollapseSidebar, CommandProcessing, DevServerDetected, NavigateBrowser, PaneExited, PortConflict, ResizeNow,
};
use termdock_common::{EventBus, LeafId, PaneBox, TermdockError};
use termdock_tiling::pane_boxes;
use tokio::sync::broadcast;
use tracing::{debug, info, trace, warn};

use crate::keymap::{KeyAction, Keymap};
use crate::project::ProjectPanes;
use crate::pty_backend::PtyBackend;

use sidebar::Sidebar;

/// One animation frame.
const FRAME: Duration = Duration::from_millis(16);

/// Pixels between sibling panes.
const PANE_GAP: f64 = 0.0;

/// Width the sidebar takes from the panes while expanded.
const SIDEBAR_WIDTH: f64 = 240.0;

struct Subscriptions {
    detected: broadcast::Receiver<DevServerDetected>,
    conflicts: broadcast::Receiver<PortConflict>,
    navigate: broadcast::Receiver<NavigateBrowser>,
    exited: broadcast::Receiver<PaneExited>,
    processing: broadcast::Receiver<CommandProcessing>,
    resize_now: broadcast::Receiver<ResizeNow>,
    sidebar: broadcast::Receiver<CollapseSidebar>,
}

impl Subscriptions {
    fn new(bus: &EventBus) -> Self {
        Self {
            detected: bus.subscribe(),
            conflicts: bus.subscribe(),
            navigate: bus.subscribe(),
            exited: bus.subscribe(),
            processing: bus.subscribe(),
            resize_now: bus.subscribe(),
            sidebar: bus.subscribe(),
        }
    }
}

pub struct Host {
    panes: ProjectPanes<StdoutSink>,
    backend: PtyBackend,
    keymap: Keymap,
    screen: PaneBox,
    sidebar: Sidebar,
    boxes: Vec<(LeafId, PaneBox)>,
    bus: Arc<EventBus>,
    subs: Subscriptions,
    input: mpsc::Receiver<HostInput>,
}

impl Host {
    pub fn new(
        panes: ProjectPanes<StdoutSink>,
        backend: PtyBackend,
        keymap: Keymap,
        bus: Arc<EventBus>,
        screen: PaneBox,
    ) -> Self {
        Self {
            panes,
            backend,
            keymap,
            screen,
            sidebar: Sidebar::new(SIDEBAR_WIDTH, true),
            boxes: Vec::new(),
            subs: Subscriptions::new(&bus),
            bus,
            input: spawn_stdin_reader(),
        }
    }

    /// Run until `:quit` or end of input. Sessions are killed on the way out.
    pub fn run(mut self, command: Option<&str>) -> Result<(), TermdockError> {
        let now = Instant::now();
        self.panes.mount(now);
        if let Some(command) = command {
            self.panes.run_command(command, now, &mut self.backend);
        }
        info!(project = %self.panes.project(), panes = self.panes.pane_count(), "host running");

        loop {
            let now = Instant::now();
            if !self.pump_input(now) {
                break;
            }
            for event in self.backend.drain_events() {
                if !self.panes.handle_backend_event(event, now, &mut self.backend) {
                    trace!("dropped event for a session with no pane");
                }
            }
            let slide_ended = self.sidebar.advance();
            self.layout(now);
            if slide_ended {
                self.panes.end_transition(&mut self.backend);
            }
            self.panes.on_animation_frame(&mut self.backend);
            self.panes.tick(now, &mut self.backend);
            self.drain_bus();
            std::thread::sleep(FRAME);
        }

        self.panes.unmount();
        self.backend.kill_all();
        info!("host stopped");
        Ok(())
    }

    /// Returns `false` once the host should stop.
    fn pump_input(&mut self, now: Instant) -> bool {
        loop {
            match self.input.try_recv() {
                Ok(HostInput::Quit) | Err(mpsc::TryRecvError::Disconnected) => return false,
                Ok(HostInput::Key(key)) => match self.keymap.handle(&key) {
                    KeyAction::Run(command) => {
                        self.panes.handle_command(command, now, &mut self.backend)
                    }
                    KeyAction::ConfirmClose => info!("press close again to close the pane"),
                    KeyAction::CloseCancelled => info!("close cancelled"),
                    KeyAction::Passthrough => debug!(?key, "key not bound"),
                },
                Ok(HostInput::Run(command)) => {
                    self.panes.run_command(&command, now, &mut self.backend);
                }
                Ok(HostInput::Refit) => self.panes.force_resize(&mut self.backend),
                Ok(HostInput::ToggleSidebar) => {
                    self.bus.publish(CollapseSidebar {
                        collapsed: !self.sidebar.is_collapsed(),
                    });
                }
                Ok(HostInput::Line(line)) => {
                    let mut bytes = line.into_bytes();
                    bytes.push(b'\r');
                    self.panes.input(&bytes, &mut self.backend);
                }
                Err(mpsc::TryRecvError::Empty) => return true,
            }
        }
    }

    fn pane_area(&self) -> PaneBox {
        PaneBox::new(
            (self.screen.width - self.sidebar.width()).max(0.0),
            self.screen.height,
        )
    }

    /// Report each leaf's box, but only when it changed.
    fn layout(&mut self, now: Instant) {
        let boxes = pane_boxes(self.panes.tree().tree(), self.pane_area(), PANE_GAP);
        if boxes == self.boxes {
            return;
        }
        for (leaf, pane_box) in &boxes {
            if !self.boxes.contains(&(leaf.clone(), *pane_box)) {
                self.panes.set_pane_box(leaf, *pane_box, now);
            }
        }
        self.boxes = boxes;
    }

    fn drain_bus(&mut self) {
        for event in drain(&mut self.subs.detected) {
            info!(project = %event.project, url = %event.url, port = event.port, "dev server detected");
        }
        for event in drain(&mut self.subs.navigate) {
            info!(project = %event.project, url = %event.url, "preview ready");
        }
        for event in drain(&mut self.subs.conflicts) {
            warn!(
                port = event.port,
                requested_by = %event.requested_by,
                owner = %event.owner,
                "port already claimed by another project"
            );
        }
        for event in drain(&mut self.subs.exited) {
            info!(session_id = %event.session, code = ?event.code, "shell exited");
        }
        for event in drain(&mut self.subs.processing) {
            debug!(session_id = %event.session, active = event.active, "command processing");
        }
        for event in drain(&mut self.subs.sidebar) {
            if self.sidebar.set_collapsed(event.collapsed) {
                self.panes.begin_transition();
            }
        }
        let project = self.panes.project().clone();
        let refit = drain(&mut self.subs.resize_now)
            .into_iter()
            .any(|e| e.project.as_ref().is_none_or(|p| *p == project));
        if refit {
            self.panes.force_resize(&mut self.backend);
        }
    }
}

/// Everything currently queued on `rx`.
fn drain<T: Clone>(rx: &mut broadcast::Receiver<T>) -> Vec<T> {
    let mut out = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(event) => out.push(event),
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                warn!(skipped, "bus subscriber lagged");
            }
            Err(_) => return out,
        }
    }
}

fn spawn_stdin_reader() -> mpsc::Receiver<HostInput> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!("stdin read failed: {e}");
                    break;
                }
            };
            match parse_line(&line) {
                Ok(input) => {
                    if tx.send(input).is_err() {
                        return;
                    }
                }
                Err(e) => warn!("{e}"),
            }
        }
        let _ = tx.send(HostInput::Quit);
    });
    rx
}
