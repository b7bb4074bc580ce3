//! Two-step confirmation for closing a pane.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmStep {
    /// First press: ask the user.
    Armed,
    /// Second press while armed.
    Confirmed,
    Cancelled,
    Ignored,
}

#[derive(Debug, Default)]
pub struct CloseConfirm {
    armed: bool,
}

impl CloseConfirm {
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn press_close(&mut self) -> ConfirmStep {
        if std::mem::take(&mut self.armed) {
            ConfirmStep::Confirmed
        } else {
            self.armed = true;
            ConfirmStep::Armed
        }
    }

    pub fn press_escape(&mut self) -> ConfirmStep {
        if std::mem::take(&mut self.armed) {
            ConfirmStep::Cancelled
        } else {
            ConfirmStep::Ignored
        }
    }

    /// Any other key drops a pending confirmation.
    pub fn reset(&mut self) {
        self.armed = false;
    }
}
