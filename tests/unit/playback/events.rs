use super::*;

#[test]
fn every_subscriber_receives_in_order() {
    let mut bus = EventBus::new();
    let a = bus.subscribe();
    let b = bus.subscribe();

    bus.publish(PlaybackEvent::Enter("v1".to_owned()));
    bus.publish(PlaybackEvent::Play);

    for rx in [a, b] {
        let got: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            got,
            vec![PlaybackEvent::Enter("v1".to_owned()), PlaybackEvent::Play]
        );
    }
}

#[test]
fn topic_subscriptions_filter() {
    let mut bus = EventBus::new();
    let enters = bus.subscribe_topics(&[EventTopic::Enter, EventTopic::Exit]);

    bus.publish(PlaybackEvent::Ready);
    bus.publish(PlaybackEvent::Enter("a".to_owned()));
    bus.publish(PlaybackEvent::Buffering("a".to_owned()));
    bus.publish(PlaybackEvent::Exit("a".to_owned()));

    let got: Vec<_> = enters.try_iter().collect();
    assert_eq!(
        got,
        vec![
            PlaybackEvent::Enter("a".to_owned()),
            PlaybackEvent::Exit("a".to_owned())
        ]
    );
}

#[test]
fn dropped_receivers_are_pruned() {
    let mut bus = EventBus::new();
    let keep = bus.subscribe();
    drop(bus.subscribe());
    assert_eq!(bus.subscriber_count(), 2);

    bus.publish(PlaybackEvent::Pause);
    assert_eq!(bus.subscriber_count(), 1);
    assert_eq!(keep.try_recv().unwrap(), PlaybackEvent::Pause);
}

#[test]
fn events_serialize_with_topic_tag() {
    let json = serde_json::to_string(&PlaybackEvent::Enter("anno5".to_owned())).unwrap();
    assert_eq!(json, r#"{"topic":"enter","id":"anno5"}"#);
    let json = serde_json::to_string(&PlaybackEvent::Ready).unwrap();
    assert_eq!(json, r#"{"topic":"ready"}"#);
}
