use std::collections::BTreeMap;

use crate::foundation::core::{ms_to_secs, secs_to_ms};
use crate::timeline::model::Keyframe;

/// Reading of the prime item's sink taken at the start of a tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PrimeSample {
    /// Timeline second at which the prime item entered.
    pub enter_time: f64,
    /// Native sink position in seconds.
    pub sink_time: f64,
    /// Whether the sink is paused or still buffering.
    pub sink_paused: bool,
}

/// Next virtual clock value in milliseconds.
///
/// A playing prime sink is trusted outright, which heals frame-timer drift. Without a prime, or
/// while the prime sink is stalled, the clock free-runs on wall time.
pub fn advance_prime_time(prime_time_ms: f64, dt_ms: f64, prime: Option<PrimeSample>) -> f64 {
    match prime {
        Some(p) if !p.sink_paused => secs_to_ms(p.enter_time + p.sink_time),
        _ => prime_time_ms + dt_ms,
    }
}

/// Runtime clock state for one open timeline.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClockState {
    /// Virtual milliseconds since timeline start. Single writer: the player.
    pub(crate) prime_time_ms: f64,
    pub(crate) current_prime: Option<String>,
    /// Visible items and the keyframe that made them visible.
    pub(crate) visible: BTreeMap<String, Keyframe>,
    pub(crate) next_keyframe_index: usize,
    pub(crate) is_playing: bool,
    pub(crate) is_ready: bool,
}

impl ClockState {
    /// Virtual clock in seconds.
    pub fn current_time(&self) -> f64 {
        ms_to_secs(self.prime_time_ms)
    }

    /// Drop visibility, prime and scan position; used before re-deriving state from zero.
    pub(crate) fn rewind(&mut self) {
        self.visible.clear();
        self.current_prime = None;
        self.next_keyframe_index = 0;
        self.prime_time_ms = 0.0;
    }
}

/// Reference-counted clock start requests from independent consumers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClockRequests {
    count: u32,
}

impl ClockRequests {
    /// Add a request. Returns `true` when this request starts the clock.
    pub fn acquire(&mut self) -> bool {
        self.count += 1;
        self.count == 1
    }

    /// Drop a request. Returns `true` when this was the last one.
    pub fn release(&mut self) -> bool {
        match self.count {
            0 => false,
            n => {
                self.count = n - 1;
                self.count == 0
            }
        }
    }

    /// Drop every request. Returns `true` if the clock was running.
    pub fn reset(&mut self) -> bool {
        let was = self.count > 0;
        self.count = 0;
        was
    }

    /// Outstanding requests.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Whether any request is outstanding.
    pub fn is_running(&self) -> bool {
        self.count > 0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/clock.rs"]
mod tests;
