use super::*;

#[test]
fn simulated_sink_advances_only_while_playing() {
    let mut sink = SimulatedSink::new();
    sink.advance(500.0);
    assert_eq!(sink.current_time(), 0.0);
    assert!(sink.paused());

    assert_eq!(sink.play(), PlayRequest::Started);
    sink.advance(500.0);
    assert!((sink.current_time() - 0.5).abs() < 1e-9);

    sink.pause();
    sink.advance(500.0);
    assert!((sink.current_time() - 0.5).abs() < 1e-9);
    assert_eq!(sink.play_calls(), 1);
    assert_eq!(sink.pause_calls(), 1);
}

#[test]
fn start_latency_reports_paused_until_buffered() {
    let mut sink = SimulatedSink::new().with_start_latency_ms(200.0);
    assert_eq!(sink.play(), PlayRequest::Pending);
    sink.advance(150.0);
    assert!(sink.paused());
    assert_eq!(sink.current_time(), 0.0);
    sink.advance(150.0);
    assert!(!sink.paused());
    assert!((sink.current_time() - 0.1).abs() < 1e-9);

    // Seeking drops the buffer.
    sink.set_current_time(3.0);
    assert!(sink.paused());
    assert_eq!(sink.seeks(), vec![3.0]);
}

#[test]
fn rejecting_sink_never_starts() {
    let mut sink = SimulatedSink::new().rejecting("autoplay blocked");
    assert_eq!(
        sink.play(),
        PlayRequest::Rejected("autoplay blocked".to_owned())
    );
    assert!(sink.paused());
    sink.allow_play();
    assert_eq!(sink.play(), PlayRequest::Started);
}

#[test]
fn clones_share_state_and_duration_stops_playback() {
    let handle = SimulatedSink::new().with_duration(1.0).with_rate(2.0);
    let mut owned = handle.clone();
    owned.play();
    handle.advance(400.0);
    assert!((owned.current_time() - 0.8).abs() < 1e-9);
    handle.advance(400.0);
    assert_eq!(owned.current_time(), 1.0);
    assert!(!handle.is_playing());
}

#[test]
fn closures_are_ui_sinks() {
    let mut texts = Vec::new();
    {
        let mut sink = |t: &str| texts.push(t.to_owned());
        sink.set_text("0:01");
    }
    assert_eq!(texts, vec!["0:01".to_owned()]);

    let mut last = 0.0;
    {
        let mut bar = |r: f64| last = r;
        bar.set_ratio(0.25);
    }
    assert_eq!(last, 0.25);
}
