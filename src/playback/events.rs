use std::sync::mpsc;

use serde::Serialize;

/// Notifications published by the player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "topic", content = "id", rename_all = "lowercase")]
pub enum PlaybackEvent {
    /// Every media item now has a bound sink.
    Ready,
    /// An item became visible/audible.
    Enter(String),
    /// An item was hidden/silenced.
    Exit(String),
    /// Transport switched to playing.
    Play,
    /// Transport switched to paused.
    Pause,
    /// The prime sink stalled while playing; the clock is free-running.
    Buffering(String),
    /// The clock passed the end of the timeline.
    Ended,
}

/// Subscription filter matching one [`PlaybackEvent`] variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventTopic {
    /// [`PlaybackEvent::Ready`].
    Ready,
    /// [`PlaybackEvent::Enter`].
    Enter,
    /// [`PlaybackEvent::Exit`].
    Exit,
    /// [`PlaybackEvent::Play`].
    Play,
    /// [`PlaybackEvent::Pause`].
    Pause,
    /// [`PlaybackEvent::Buffering`].
    Buffering,
    /// [`PlaybackEvent::Ended`].
    Ended,
}

impl PlaybackEvent {
    /// Topic this event is published under.
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::Ready => EventTopic::Ready,
            Self::Enter(_) => EventTopic::Enter,
            Self::Exit(_) => EventTopic::Exit,
            Self::Play => EventTopic::Play,
            Self::Pause => EventTopic::Pause,
            Self::Buffering(_) => EventTopic::Buffering,
            Self::Ended => EventTopic::Ended,
        }
    }
}

struct Subscriber {
    topics: Option<Vec<EventTopic>>,
    tx: mpsc::Sender<PlaybackEvent>,
}

/// Publish/subscribe fan-out. Subscribers whose receiver was dropped are pruned on publish.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Subscriber>,
}

impl EventBus {
    /// Empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Receive every event.
    pub fn subscribe(&mut self) -> mpsc::Receiver<PlaybackEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(Subscriber { topics: None, tx });
        rx
    }

    /// Receive only events on the given topics.
    pub fn subscribe_topics(&mut self, topics: &[EventTopic]) -> mpsc::Receiver<PlaybackEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(Subscriber {
            topics: Some(topics.to_vec()),
            tx,
        });
        rx
    }

    /// Deliver `event` to every matching subscriber.
    pub fn publish(&mut self, event: PlaybackEvent) {
        let topic = event.topic();
        tracing::trace!(?event, "publish");
        self.subscribers.retain(|s| {
            let wanted = s.topics.as_ref().is_none_or(|t| t.contains(&topic));
            !wanted || s.tx.send(event.clone()).is_ok()
        });
    }

    /// Number of live subscribers (as of the last publish).
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/events.rs"]
mod tests;
