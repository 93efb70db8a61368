use super::*;

#[test]
fn free_runs_without_prime() {
    assert_eq!(advance_prime_time(1000.0, 16.0, None), 1016.0);
}

#[test]
fn playing_prime_sink_overrides_accumulation() {
    let sample = PrimeSample {
        enter_time: 13.0,
        sink_time: 2.5,
        sink_paused: false,
    };
    assert_eq!(advance_prime_time(99_999.0, 16.0, Some(sample)), 15_500.0);
}

#[test]
fn stalled_prime_sink_falls_back_to_accumulation() {
    let sample = PrimeSample {
        enter_time: 13.0,
        sink_time: 0.0,
        sink_paused: true,
    };
    assert_eq!(advance_prime_time(13_000.0, 20.0, Some(sample)), 13_020.0);
}

#[test]
fn requests_are_reference_counted() {
    let mut r = ClockRequests::default();
    assert!(r.acquire());
    assert!(!r.acquire());
    assert!(!r.release());
    assert!(r.is_running());
    assert!(r.release());
    assert!(!r.is_running());
    assert!(!r.release());
    assert_eq!(r.count(), 0);
}

#[test]
fn reset_drops_all_requests() {
    let mut r = ClockRequests::default();
    r.acquire();
    r.acquire();
    assert!(r.reset());
    assert!(!r.reset());
}

#[test]
fn rewind_clears_runtime_state() {
    let mut s = ClockState {
        prime_time_ms: 4200.0,
        current_prime: Some("v".to_owned()),
        next_keyframe_index: 7,
        is_playing: true,
        is_ready: true,
        ..ClockState::default()
    };
    s.visible.insert(
        "v".to_owned(),
        Keyframe::enter("v", crate::timeline::model::ResourceType::Video, 1.0),
    );
    assert_eq!(s.current_time(), 4.2);

    s.rewind();
    assert!(s.visible.is_empty());
    assert_eq!(s.current_prime, None);
    assert_eq!(s.next_keyframe_index, 0);
    assert_eq!(s.current_time(), 0.0);
    assert!(s.is_playing && s.is_ready);
}
