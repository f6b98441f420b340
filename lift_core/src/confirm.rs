//! Two-stage "tap again to mark failed" confirmation window.
//!
//! The first tap records a set as successful and arms the window for that
//! set. A second tap before the window expires turns the set into a
//! failure. After expiry the success stands. The window is a plain value
//! evaluated against a caller-supplied instant, so no timer is involved.

use chrono::{DateTime, Duration, Utc};

/// How long the second tap is accepted after the first (milliseconds)
pub const FAIL_WINDOW_MILLIS: i64 = 2_000;

/// Position of a set inside the active workout
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SetRef {
    pub exercise: usize,
    pub set: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailWindow {
    #[default]
    Disarmed,
    Armed {
        target: SetRef,
        expires_at: DateTime<Utc>,
    },
}

impl FailWindow {
    /// Open the window for `target`, starting at `now`
    pub fn arm(target: SetRef, now: DateTime<Utc>) -> Self {
        FailWindow::Armed {
            target,
            expires_at: now + Duration::milliseconds(FAIL_WINDOW_MILLIS),
        }
    }

    /// The set a second tap at `now` would fail, if the window is still open
    pub fn pending(&self, now: DateTime<Utc>) -> Option<SetRef> {
        match *self {
            FailWindow::Armed { target, expires_at } if now < expires_at => Some(target),
            _ => None,
        }
    }

    /// Consume the window: returns the target if still open, and disarms
    /// in every case
    pub fn take(&mut self, now: DateTime<Utc>) -> Option<SetRef> {
        let target = self.pending(now);
        *self = FailWindow::Disarmed;
        target
    }

    pub fn disarm(&mut self) {
        *self = FailWindow::Disarmed;
    }
}
