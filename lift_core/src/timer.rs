//! Rest timer between sets.
//!
//! The timer does not own a thread: callers drive it with one `tick()` per
//! elapsed second. Once stopped, ticks are ignored, so a cancelled timer
//! can never be mutated by a late tick.

use crate::config::RestTimerConfig;

/// Shortest allowed rest (seconds)
pub const MIN_REST_SECONDS: u32 = 30;
/// Longest allowed rest (seconds)
pub const MAX_REST_SECONDS: u32 = 600;
/// Default rest between sets (seconds)
pub const DEFAULT_REST_SECONDS: u32 = 180;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RestTimer {
    enabled: bool,
    duration: u32,
    remaining: u32,
    active: bool,
}

impl Default for RestTimer {
    fn default() -> Self {
        Self::new(true, DEFAULT_REST_SECONDS)
    }
}

impl RestTimer {
    pub fn new(enabled: bool, duration_seconds: u32) -> Self {
        Self {
            enabled,
            duration: clamp_duration(duration_seconds),
            remaining: 0,
            active: false,
        }
    }

    pub fn from_config(config: &RestTimerConfig) -> Self {
        Self::new(config.enabled, config.duration_seconds)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turning the timer off also cancels a running countdown
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.stop();
        }
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    /// Set the rest length, clamped to 30–600 seconds
    pub fn set_duration(&mut self, seconds: u32) {
        self.duration = clamp_duration(seconds);
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Begin counting down the configured duration. No-op while disabled.
    pub fn start(&mut self) {
        if !self.enabled {
            return;
        }
        self.remaining = self.duration;
        self.active = self.remaining > 0;
        tracing::debug!("Rest timer started: {}s", self.remaining);
    }

    /// One second elapsed. Returns true when this tick finished the countdown.
    pub fn tick(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.active = false;
            tracing::debug!("Rest timer finished");
            return true;
        }
        false
    }

    /// Cancel immediately; idempotent
    pub fn stop(&mut self) {
        self.active = false;
        self.remaining = 0;
    }

    pub fn skip(&mut self) {
        self.stop();
    }
}

fn clamp_duration(seconds: u32) -> u32 {
    seconds.clamp(MIN_REST_SECONDS, MAX_REST_SECONDS)
}

/// Render seconds as `m:ss`
pub fn format_remaining(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
