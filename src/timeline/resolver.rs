use std::collections::HashMap;

use crate::timeline::model::{Keyframe, KeyframeKind};

/// Minimal state delta needed to move the scan pointer forward to a target time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WindowChanges {
    /// New scan pointer: index of the first keyframe later than the target time.
    pub next_index: usize,
    /// Net visibility/prime transitions, in first-seen order.
    pub changes: Vec<Keyframe>,
}

#[derive(Clone, Copy)]
struct Pending<'a> {
    kf: &'a Keyframe,
    // The item was visible before the window started.
    visible_before: bool,
}

/// Collapse every keyframe in `[scan_pointer, first keyframe after target_time)` into the net
/// changes required to reach `target_time`.
///
/// An item that enters and exits inside the window produces nothing, so fast scrubbing never
/// flashes transient media. Forward motion only (`current_time <= target_time`); `keyframes` must
/// be sorted by time. When no keyframe lies beyond `target_time` the pointer is returned unchanged
/// with no changes.
pub fn resolve(
    scan_pointer: usize,
    keyframes: &[Keyframe],
    current_time: f64,
    target_time: f64,
) -> WindowChanges {
    debug_assert!(current_time <= target_time, "resolve is forward-only");

    let next_index = keyframes.partition_point(|k| k.time <= target_time);
    if next_index >= keyframes.len() {
        return WindowChanges {
            next_index: scan_pointer,
            changes: Vec::new(),
        };
    }
    let Some(window) = keyframes.get(scan_pointer..next_index) else {
        return WindowChanges {
            next_index: scan_pointer,
            changes: Vec::new(),
        };
    };

    WindowChanges {
        next_index,
        changes: collapse(window),
    }
}

/// Net changes of a contiguous keyframe run, in first-seen order. Enter/exit pairs of an item
/// that was not visible before the run cancel out.
pub(crate) fn collapse(window: &[Keyframe]) -> Vec<Keyframe> {
    let mut slots: Vec<Option<Pending<'_>>> = Vec::with_capacity(window.len());
    let mut slot_by_id: HashMap<&str, usize> = HashMap::with_capacity(window.len());

    for kf in window {
        let id = kf.id.as_str();
        match (kf.kind, slot_by_id.get(id).copied()) {
            (KeyframeKind::Exit, Some(slot)) => {
                let visible_before = slots[slot].is_some_and(|p| p.visible_before);
                if visible_before {
                    slots[slot] = Some(Pending {
                        kf,
                        visible_before,
                    });
                } else {
                    slots[slot] = None;
                    slot_by_id.remove(id);
                }
            }
            (_, Some(slot)) => {
                let visible_before = slots[slot].is_some_and(|p| p.visible_before);
                slots[slot] = Some(Pending {
                    kf,
                    visible_before,
                });
            }
            (kind, None) => {
                slot_by_id.insert(id, slots.len());
                slots.push(Some(Pending {
                    kf,
                    visible_before: kind != KeyframeKind::Enter,
                }));
            }
        }
    }

    slots.into_iter().flatten().map(|p| p.kf.clone()).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/resolver.rs"]
mod tests;
