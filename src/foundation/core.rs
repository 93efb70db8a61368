use crate::foundation::error::{TimelineError, TimelineResult};

/// Half-open window `[start, end)` in timeline seconds.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimeWindow {
    /// Inclusive start, seconds from timeline start.
    pub start: f64,
    /// Exclusive end, seconds from timeline start.
    pub end: f64,
}

impl TimeWindow {
    /// Create a validated window with finite bounds and `start < end`.
    pub fn new(start: f64, end: f64) -> TimelineResult<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(TimelineError::validation("TimeWindow bounds must be finite"));
        }
        if start < 0.0 {
            return Err(TimelineError::validation("TimeWindow start must be >= 0"));
        }
        if start >= end {
            return Err(TimelineError::validation("TimeWindow start must be < end"));
        }
        Ok(Self { start, end })
    }

    /// Window length in seconds.
    pub fn duration(self) -> f64 {
        self.end - self.start
    }

    /// Return `true` when `t` is inside `[start, end)`.
    pub fn contains(self, t: f64) -> bool {
        self.start <= t && t < self.end
    }
}

/// Spatial placement on the canvas, in canvas pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Region {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

/// Seconds to milliseconds.
pub fn secs_to_ms(secs: f64) -> f64 {
    secs * 1000.0
}

/// Milliseconds to seconds.
pub fn ms_to_secs(ms: f64) -> f64 {
    ms / 1000.0
}

/// Format a timeline position as `m:ss` (or `h:mm:ss` past the hour).
///
/// Negative and non-finite input formats as `0:00`.
pub fn format_clock(secs: f64) -> String {
    let total = if secs.is_finite() && secs > 0.0 {
        secs.floor() as u64
    } else {
        0
    };
    let h = total / 3600;
    let m = (total % 3600) / 60;
    let s = total % 60;
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
