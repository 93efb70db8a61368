use std::collections::HashMap;

use serde::Serialize;

use crate::foundation::core::{ms_to_secs, secs_to_ms};
use crate::playback::clock::ClockState;
use crate::playback::registry::SinkRegistry;

/// One forced realignment performed by [`correct_drift`].
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriftCorrection {
    /// Annotation id of the corrected item.
    pub id: String,
    /// Position implied by the virtual clock, in milliseconds.
    pub expected_ms: f64,
    /// Position the sink reported, in milliseconds.
    pub actual_ms: f64,
}

/// Realign every visible, non-prime sink whose position strays more than `threshold_ms` from the
/// position implied by the virtual clock.
///
/// The prime sink is the clock's source and is never corrected.
pub fn correct_drift(
    state: &ClockState,
    enter_times: &HashMap<String, f64>,
    sinks: &mut SinkRegistry,
    threshold_ms: f64,
) -> Vec<DriftCorrection> {
    let mut out = Vec::new();
    for id in state.visible.keys() {
        if state.current_prime.as_deref() == Some(id.as_str()) {
            continue;
        }
        let Some(enter) = enter_times.get(id) else {
            continue;
        };
        let Some(sink) = sinks.get_mut(id) else {
            continue;
        };

        let expected_ms = (state.prime_time_ms - secs_to_ms(*enter)).max(0.0);
        let actual_ms = secs_to_ms(sink.current_time());
        if (expected_ms - actual_ms).abs() > threshold_ms {
            tracing::debug!(id = %id, expected_ms, actual_ms, "drift correction");
            sink.set_current_time(ms_to_secs(expected_ms));
            out.push(DriftCorrection {
                id: id.clone(),
                expected_ms,
                actual_ms,
            });
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/playback/drift.rs"]
mod tests;
