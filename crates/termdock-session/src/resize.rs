//! Resize coordination for one pane.
//!
//! Layout transitions, session startup and a flood of box observations all
//! want to resize the PTY. Only a few of those resizes should reach the
//! backend: observations are coalesced into one per animation frame, held
//! back during ancestor transitions and for a short window after the
//! session attaches, and followed by a single authoritative fit when each
//! of those ends.

use std::time::{Duration, Instant};

use termdock_common::{GridSize, PaneBox};
use termdock_config::TermdockConfig;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeTiming {
    pub suppress: Duration,
    pub deferred_fit: Duration,
    pub cell_width: f64,
    pub cell_height: f64,
}

impl Default for ResizeTiming {
    fn default() -> Self {
        Self::from_config(&TermdockConfig::default())
    }
}

impl ResizeTiming {
    pub fn from_config(config: &TermdockConfig) -> Self {
        Self {
            suppress: Duration::from_millis(config.resize.suppress_ms),
            deferred_fit: Duration::from_millis(config.resize.deferred_fit_ms),
            cell_width: config.terminal.cell_width,
            cell_height: config.terminal.cell_height,
        }
    }

    /// Grid that fits `pane_box`, or `None` for a hidden (zero-area) pane.
    pub fn fit(&self, pane_box: PaneBox) -> Option<GridSize> {
        if pane_box.is_empty() || self.cell_width <= 0.0 || self.cell_height <= 0.0 {
            return None;
        }
        let cols = (pane_box.width / self.cell_width).floor().min(f64::from(u16::MAX)) as u16;
        let rows = (pane_box.height / self.cell_height).floor().min(f64::from(u16::MAX)) as u16;
        Some(GridSize::new(cols, rows).clamped())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeReason {
    /// Coalesced box observation.
    Frame,
    /// The last ancestor transition finished.
    TransitionEnd,
    /// Catch-up fit after the startup suppression window.
    Deferred,
    /// Explicit request from elsewhere in the app.
    Forced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeRequest {
    pub size: GridSize,
    pub reason: ResizeReason,
}

#[derive(Debug)]
pub struct ResizeCoordinator {
    timing: ResizeTiming,
    transitions: u32,
    latest: Option<PaneBox>,
    frame_pending: bool,
    suppress_until: Option<Instant>,
    deferred_at: Option<Instant>,
    last_sent: Option<GridSize>,
    disposed: bool,
}

impl ResizeCoordinator {
    pub fn new(timing: ResizeTiming) -> Self {
        Self {
            timing,
            transitions: 0,
            latest: None,
            frame_pending: false,
            suppress_until: None,
            deferred_at: None,
            last_sent: None,
            disposed: false,
        }
    }

    pub fn in_transition(&self) -> bool {
        self.transitions > 0
    }

    pub fn frame_pending(&self) -> bool {
        self.frame_pending
    }

    /// Grid for the most recent box, ignoring suppression.
    pub fn current_fit(&self) -> Option<GridSize> {
        self.latest.and_then(|b| self.timing.fit(b))
    }

    /// Box observer callback. The box is always recorded; a frame callback
    /// is scheduled only when nothing is holding resizes back.
    pub fn observe(&mut self, pane_box: PaneBox, now: Instant) {
        if self.disposed {
            return;
        }
        self.latest = Some(pane_box);
        if self.in_transition() {
            trace!("resize observation dropped during transition");
            return;
        }
        if self.suppress_until.is_some_and(|until| now < until) {
            trace!("resize observation dropped during startup window");
            return;
        }
        self.frame_pending = true;
    }

    /// Run the pending frame callback, if any.
    pub fn on_animation_frame(&mut self) -> Option<ResizeRequest> {
        if self.disposed || !std::mem::take(&mut self.frame_pending) {
            return None;
        }
        if self.in_transition() {
            return None;
        }
        let size = self.current_fit()?;
        if self.last_sent == Some(size) {
            return None;
        }
        Some(self.commit(size, ResizeReason::Frame))
    }

    pub fn transition_start(&mut self) {
        if self.disposed {
            return;
        }
        self.transitions += 1;
        self.frame_pending = false;
    }

    /// Transition end or cancel. The last one out fits once.
    pub fn transition_end(&mut self) -> Option<ResizeRequest> {
        if self.disposed || self.transitions == 0 {
            return None;
        }
        self.transitions -= 1;
        if self.in_transition() {
            return None;
        }
        self.authoritative(ResizeReason::TransitionEnd)
    }

    /// The session just attached: hold observations back for the
    /// suppression window and schedule the catch-up fit.
    pub fn arm_suppression(&mut self, now: Instant) {
        if self.disposed {
            return;
        }
        self.suppress_until = Some(now + self.timing.suppress);
        self.deferred_at = Some(now + self.timing.deferred_fit);
        self.frame_pending = false;
    }

    pub fn poll(&mut self, now: Instant) -> Option<ResizeRequest> {
        if self.disposed {
            return None;
        }
        let due = self.deferred_at.is_some_and(|at| at <= now);
        if !due {
            return None;
        }
        self.deferred_at = None;
        if self.in_transition() {
            return None;
        }
        self.authoritative(ResizeReason::Deferred)
    }

    /// Fit now regardless of the last size sent. Held back mid-transition.
    pub fn force(&mut self) -> Option<ResizeRequest> {
        if self.disposed || self.in_transition() {
            return None;
        }
        self.authoritative(ResizeReason::Forced)
    }

    pub fn dispose(&mut self) {
        self.disposed = true;
        self.frame_pending = false;
        self.suppress_until = None;
        self.deferred_at = None;
    }

    fn authoritative(&mut self, reason: ResizeReason) -> Option<ResizeRequest> {
        self.frame_pending = false;
        let size = self.current_fit()?;
        Some(self.commit(size, reason))
    }

    fn commit(&mut self, size: GridSize, reason: ResizeReason) -> ResizeRequest {
        trace!(cols = size.cols, rows = size.rows, ?reason, "resize");
        self.last_sent = Some(size);
        ResizeRequest { size, reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coordinator() -> ResizeCoordinator {
        ResizeCoordinator::new(ResizeTiming {
            suppress: Duration::from_millis(500),
            deferred_fit: Duration::from_millis(550),
            cell_width: 10.0,
            cell_height: 20.0,
        })
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn fit_floors_and_clamps() {
        let timing = coordinator().timing;
        assert_eq!(timing.fit(PaneBox::new(805.0, 419.0)), Some(GridSize::new(80, 20)));
        assert_eq!(timing.fit(PaneBox::new(20.0, 10.0)), Some(GridSize::new(10, 2)));
        assert_eq!(timing.fit(PaneBox::new(0.0, 400.0)), None);
    }

    #[test]
    fn observations_coalesce_into_one_frame() {
        let mut rc = coordinator();
        let now = Instant::now();
        rc.observe(PaneBox::new(400.0, 200.0), now);
        rc.observe(PaneBox::new(600.0, 200.0), now);
        let req = rc.on_animation_frame().unwrap();
        assert_eq!(req.size, GridSize::new(60, 10));
        assert_eq!(req.reason, ResizeReason::Frame);
        assert_eq!(rc.on_animation_frame(), None);
    }

    #[test]
    fn frame_path_is_deduplicated() {
        let mut rc = coordinator();
        let now = Instant::now();
        rc.observe(PaneBox::new(400.0, 200.0), now);
        assert!(rc.on_animation_frame().is_some());
        rc.observe(PaneBox::new(405.0, 205.0), now);
        assert_eq!(rc.on_animation_frame(), None);
    }

    #[test]
    fn transition_drops_observations_and_fits_once_at_end() {
        let mut rc = coordinator();
        let now = Instant::now();
        rc.transition_start();
        rc.transition_start();
        for w in [300.0, 350.0, 400.0, 450.0, 500.0] {
            rc.observe(PaneBox::new(w, 200.0), now);
            assert_eq!(rc.on_animation_frame(), None);
        }
        assert_eq!(rc.transition_end(), None);
        let req = rc.transition_end().unwrap();
        assert_eq!(req.size, GridSize::new(50, 10));
        assert_eq!(req.reason, ResizeReason::TransitionEnd);
        assert_eq!(rc.transition_end(), None);
    }

    #[test]
    fn transition_end_always_sends() {
        let mut rc = coordinator();
        let now = Instant::now();
        rc.observe(PaneBox::new(400.0, 200.0), now);
        rc.on_animation_frame();
        rc.transition_start();
        assert!(rc.transition_end().is_some());
    }

    #[test]
    fn transition_started_after_observation_cancels_frame() {
        let mut rc = coordinator();
        let now = Instant::now();
        rc.observe(PaneBox::new(400.0, 200.0), now);
        rc.transition_start();
        assert_eq!(rc.on_animation_frame(), None);
    }

    #[test]
    fn startup_window_suppresses_then_defers_one_fit() {
        let mut rc = coordinator();
        let t0 = Instant::now();
        rc.arm_suppression(t0);
        rc.observe(PaneBox::new(400.0, 200.0), t0 + ms(100));
        assert_eq!(rc.on_animation_frame(), None);
        assert_eq!(rc.poll(t0 + ms(540)), None);

        let req = rc.poll(t0 + ms(550)).unwrap();
        assert_eq!(req.reason, ResizeReason::Deferred);
        assert_eq!(req.size, GridSize::new(40, 10));
        assert_eq!(rc.poll(t0 + ms(900)), None);

        rc.observe(PaneBox::new(500.0, 200.0), t0 + ms(600));
        assert_eq!(rc.on_animation_frame().unwrap().size, GridSize::new(50, 10));
    }

    #[test]
    fn hidden_pane_never_resizes() {
        let mut rc = coordinator();
        let now = Instant::now();
        rc.observe(PaneBox::new(0.0, 0.0), now);
        assert_eq!(rc.on_animation_frame(), None);
        rc.transition_start();
        assert_eq!(rc.transition_end(), None);
        assert_eq!(rc.force(), None);
    }

    #[test]
    fn dispose_clears_timers() {
        let mut rc = coordinator();
        let t0 = Instant::now();
        rc.observe(PaneBox::new(400.0, 200.0), t0);
        rc.arm_suppression(t0);
        rc.dispose();
        assert_eq!(rc.poll(t0 + ms(1000)), None);
        rc.observe(PaneBox::new(600.0, 200.0), t0 + ms(1000));
        assert_eq!(rc.on_animation_frame(), None);
        assert_eq!(rc.force(), None);
    }
}
