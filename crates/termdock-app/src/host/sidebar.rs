//! Sidebar slide animation. Pane boxes change on every frame of it.

/// Frames a collapse or expand takes.
const SLIDE_FRAMES: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Slide {
    from: f64,
    to: f64,
    frame: u32,
}

#[derive(Debug)]
pub struct Sidebar {
    expanded_width: f64,
    width: f64,
    collapsed: bool,
    slide: Option<Slide>,
}

impl Sidebar {
    pub fn new(expanded_width: f64, collapsed: bool) -> Self {
        Self {
            expanded_width,
            width: if collapsed { 0.0 } else { expanded_width },
            collapsed,
            slide: None,
        }
    }

    /// Target state, which the width reaches when the slide ends.
    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    /// Width currently taken from the panes.
    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn is_animating(&self) -> bool {
        self.slide.is_some()
    }

    /// Slide towards `collapsed`. Returns `true` when a slide starts from
    /// rest; reversing a running slide keeps it going from where it is.
    pub fn set_collapsed(&mut self, collapsed: bool) -> bool {
        if collapsed == self.collapsed {
            return false;
        }
        self.collapsed = collapsed;
        let started = self.slide.is_none();
        self.slide = Some(Slide {
            from: self.width,
            to: if collapsed { 0.0 } else { self.expanded_width },
            frame: 0,
        });
        started
    }

    /// One animation frame. Returns `true` on the frame the slide ends.
    pub fn advance(&mut self) -> bool {
        let Some(slide) = self.slide.as_mut() else {
            return false;
        };
        slide.frame += 1;
        let t = f64::from(slide.frame) / f64::from(SLIDE_FRAMES);
        if slide.frame >= SLIDE_FRAMES {
            self.width = slide.to;
            self.slide = None;
            return true;
        }
        self.width = slide.from + (slide.to - slide.from) * t;
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_runs_across_frames() {
        let mut sidebar = Sidebar::new(240.0, true);
        assert!(sidebar.set_collapsed(false));
        assert!(sidebar.is_animating());

        let mut widths = Vec::new();
        let mut ended = false;
        for _ in 0..SLIDE_FRAMES {
            ended = sidebar.advance();
            widths.push(sidebar.width());
        }
        assert!(ended);
        assert!(!sidebar.is_animating());
        assert_eq!(sidebar.width(), 240.0);
        assert!(widths.windows(2).all(|w| w[0] < w[1]));
        assert!(widths[0] > 0.0 && widths[0] < 240.0);
    }

    #[test]
    fn same_state_is_a_noop() {
        let mut sidebar = Sidebar::new(240.0, true);
        assert!(!sidebar.set_collapsed(true));
        assert!(!sidebar.is_animating());
        assert!(!sidebar.advance());
    }

    #[test]
    fn reversing_mid_slide_continues_without_restart() {
        let mut sidebar = Sidebar::new(240.0, true);
        sidebar.set_collapsed(false);
        for _ in 0..6 {
            sidebar.advance();
        }
        let midway = sidebar.width();
        assert!(!sidebar.set_collapsed(true));
        assert!(sidebar.is_animating());
        sidebar.advance();
        assert!(sidebar.width() < midway);
        while !sidebar.advance() {}
        assert_eq!(sidebar.width(), 0.0);
        assert!(sidebar.is_collapsed());
    }
}
