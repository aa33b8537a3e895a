//! Level-triggered cooldown gate
//!
//! Compares a stored trigger timestamp against the current wall-clock time,
//! so gates stay correct across dropped or delayed frames.

use serde::{Deserialize, Serialize};

/// Last-trigger time plus a duration. Never triggered = ready.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cooldown {
    duration_ms: f64,
    last_ms: Option<f64>,
}

impl Cooldown {
    pub fn new(duration_ms: f64) -> Self {
        Self {
            duration_ms,
            last_ms: None,
        }
    }

    /// Change the duration without touching the last trigger (fire rate upgrades)
    pub fn set_duration(&mut self, duration_ms: f64) {
        self.duration_ms = duration_ms;
    }

    /// True once at least `duration` has elapsed since the last trigger
    pub fn ready(&self, now_ms: f64) -> bool {
        match self.last_ms {
            None => true,
            Some(last) => now_ms - last >= self.duration_ms,
        }
    }

    /// Milliseconds until ready (0 when ready)
    pub fn remaining(&self, now_ms: f64) -> f64 {
        match self.last_ms {
            None => 0.0,
            Some(last) => (self.duration_ms - (now_ms - last)).max(0.0),
        }
    }

    pub fn trigger(&mut self, now_ms: f64) {
        self.last_ms = Some(now_ms);
    }

    /// Trigger if ready; returns whether it fired
    pub fn try_trigger(&mut self, now_ms: f64) -> bool {
        if self.ready(now_ms) {
            self.trigger(now_ms);
            true
        } else {
            false
        }
    }
}
