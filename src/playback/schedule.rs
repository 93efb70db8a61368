use std::time::Duration;

/// One cooperatively-driven repeating callback.
///
/// The host feeds monotonic timestamps through [`Scheduled::poll`]; the callback is due when at
/// least `period` has elapsed since it last fired. A zero period fires on every poll
/// (animation-frame cadence). Cancelling drops the baseline so a restart never reports the time
/// spent stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scheduled {
    period: Duration,
    active: bool,
    last: Option<Duration>,
}

impl Scheduled {
    /// Inactive callback with the given period.
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            active: false,
            last: None,
        }
    }

    /// Arm the callback. The first poll afterwards sets the baseline.
    pub fn start(&mut self) {
        if !self.active {
            self.active = true;
            self.last = None;
        }
    }

    /// Disarm the callback.
    pub fn cancel(&mut self) {
        self.active = false;
        self.last = None;
    }

    /// Whether the callback is armed.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Configured period.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Return the time elapsed since the previous firing if the callback is due at `now`.
    pub fn poll(&mut self, now: Duration) -> Option<Duration> {
        if !self.active {
            return None;
        }
        let Some(last) = self.last else {
            self.last = Some(now);
            return self.period.is_zero().then_some(Duration::ZERO);
        };
        let elapsed = now.saturating_sub(last);
        if elapsed >= self.period {
            self.last = Some(now);
            Some(elapsed)
        } else {
            None
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/schedule.rs"]
mod tests;
