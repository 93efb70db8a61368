use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{TimelineError, TimelineResult};

/// Options controlling [`crate::TimelinePlayer`] behavior.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerConfig {
    /// Largest tolerated skew between a non-prime sink and the virtual clock.
    pub drift_threshold_ms: f64,
    /// Cadence of the drift corrector.
    pub drift_interval_ms: u64,
    /// Nominal animation-frame cadence, used by headless drivers.
    pub frame_interval_ms: u64,
    /// Restart from zero at the end instead of stopping.
    pub loop_playback: bool,
    /// Initial volume, `0..=100`, applied to every sink at bind time.
    pub volume: f64,
    /// Initial mute state, applied to every sink at bind time.
    pub muted: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            drift_threshold_ms: 300.0,
            drift_interval_ms: 1000,
            frame_interval_ms: 16,
            loop_playback: false,
            volume: 100.0,
            muted: false,
        }
    }
}

impl PlayerConfig {
    /// Parse a config from a JSON reader. Missing fields take their defaults.
    pub fn from_reader<R: std::io::Read>(r: R) -> TimelineResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| TimelineError::serde(format!("parse player config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> TimelineResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            TimelineError::validation(format!("open player config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check ranges.
    pub fn validate(&self) -> TimelineResult<()> {
        if !self.drift_threshold_ms.is_finite() || self.drift_threshold_ms < 0.0 {
            return Err(TimelineError::validation(
                "driftThresholdMs must be a finite value >= 0",
            ));
        }
        if self.drift_interval_ms == 0 {
            return Err(TimelineError::validation("driftIntervalMs must be > 0"));
        }
        if self.frame_interval_ms == 0 {
            return Err(TimelineError::validation("frameIntervalMs must be > 0"));
        }
        if !(0.0..=100.0).contains(&self.volume) {
            return Err(TimelineError::validation("volume must be within 0..=100"));
        }
        Ok(())
    }

    /// Drift corrector period.
    pub fn drift_interval(&self) -> Duration {
        Duration::from_millis(self.drift_interval_ms)
    }

    /// Headless frame period.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
