use super::*;

#[test]
fn defaults_are_valid() {
    let cfg = PlayerConfig::default();
    cfg.validate().unwrap();
    assert_eq!(cfg.drift_interval(), Duration::from_secs(1));
    assert!(!cfg.loop_playback);
}

#[test]
fn partial_json_fills_defaults() {
    let cfg =
        PlayerConfig::from_reader(r#"{ "driftThresholdMs": 150, "loopPlayback": true }"#.as_bytes())
            .unwrap();
    assert_eq!(cfg.drift_threshold_ms, 150.0);
    assert!(cfg.loop_playback);
    assert_eq!(cfg.frame_interval_ms, 16);
}

#[test]
fn out_of_range_values_are_rejected() {
    for bad in [
        r#"{ "driftIntervalMs": 0 }"#,
        r#"{ "frameIntervalMs": 0 }"#,
        r#"{ "driftThresholdMs": -1 }"#,
        r#"{ "volume": 140 }"#,
    ] {
        let err = PlayerConfig::from_reader(bad.as_bytes()).unwrap_err();
        assert!(matches!(err, TimelineError::Validation(_)), "{bad}");
    }
}
