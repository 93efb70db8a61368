use std::collections::HashMap;
use std::sync::mpsc;
use std::time::Duration;

use serde::Serialize;

use crate::config::PlayerConfig;
use crate::foundation::core::{format_clock, ms_to_secs, secs_to_ms};
use crate::foundation::error::{TimelineError, TimelineResult};
use crate::playback::clock::{ClockRequests, ClockState, PrimeSample, advance_prime_time};
use crate::playback::drift::{self, DriftCorrection};
use crate::playback::events::{EventBus, EventTopic, PlaybackEvent};
use crate::playback::registry::{SinkRegistry, UiSinks};
use crate::playback::schedule::Scheduled;
use crate::playback::sink::{MediaSink, PlayRequest, ProgressSink, TimeTextSink};
use crate::timeline::model::{ComplexTimeline, Keyframe, KeyframeKind};
use crate::timeline::resolver::{WindowChanges, collapse, resolve};

/// Serializable view of the player state.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackSnapshot {
    /// Virtual clock in seconds.
    pub current_time: f64,
    /// Timeline duration in seconds.
    pub duration: f64,
    /// Transport state.
    pub is_playing: bool,
    /// Every media item has a bound sink.
    pub is_ready: bool,
    /// Any clock request is outstanding.
    pub clock_running: bool,
    /// Id of the authoritative media item.
    pub current_prime: Option<String>,
    /// Ids of visible items, sorted.
    pub visible: Vec<String>,
}

/// Plays one [`ComplexTimeline`]: owns the virtual clock, the visible set, the sink registry and
/// the event bus.
///
/// Single-threaded and cooperative. The host either calls [`Self::pump`] with a monotonic
/// timestamp (which drives the per-frame tick and the slower drift interval independently), or
/// calls [`Self::tick`] and [`Self::correct_drift`] itself.
pub struct TimelinePlayer {
    timeline: ComplexTimeline,
    config: PlayerConfig,
    enter_times: HashMap<String, f64>,
    state: ClockState,
    // Requests from consumers other than the transport.
    requests: ClockRequests,
    // The transport's own request, taken by `play` and dropped by `pause` or the end.
    holds_clock: bool,
    frame: Scheduled,
    drift: Scheduled,
    sinks: SinkRegistry,
    ui: UiSinks,
    events: EventBus,
    muted: bool,
    volume: f64,
    buffering: Option<String>,
}

impl TimelinePlayer {
    /// Open a timeline. Items entering at `0` are revealed immediately (without playback).
    pub fn new(timeline: ComplexTimeline, config: PlayerConfig) -> TimelineResult<Self> {
        config.validate()?;
        let enter_times = timeline
            .keyframes()
            .iter()
            .filter(|k| k.kind == KeyframeKind::Enter)
            .map(|k| (k.id.clone(), k.time))
            .collect();

        let mut player = Self {
            frame: Scheduled::new(Duration::ZERO),
            drift: Scheduled::new(config.drift_interval()),
            muted: config.muted,
            volume: config.volume / 100.0,
            timeline,
            config,
            enter_times,
            state: ClockState::default(),
            requests: ClockRequests::default(),
            holds_clock: false,
            sinks: SinkRegistry::new(),
            ui: UiSinks::default(),
            events: EventBus::new(),
            buffering: None,
        };
        player.state.is_ready = player.all_sinks_bound();
        player.set_time(0.0);
        Ok(player)
    }

    /// The timeline being played.
    pub fn timeline(&self) -> &ComplexTimeline {
        &self.timeline
    }

    /// Active configuration.
    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Virtual clock in seconds.
    pub fn current_time(&self) -> f64 {
        self.state.current_time()
    }

    /// Timeline duration in seconds.
    pub fn duration(&self) -> f64 {
        self.timeline.duration()
    }

    /// Transport state.
    pub fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    /// Whether every audio/video item has a bound sink.
    pub fn is_ready(&self) -> bool {
        self.state.is_ready
    }

    /// Whether any clock request is outstanding.
    pub fn is_clock_running(&self) -> bool {
        self.holds_clock || self.requests.is_running()
    }

    /// Id of the authoritative media item, if any.
    pub fn current_prime(&self) -> Option<&str> {
        self.state.current_prime.as_deref()
    }

    /// Ids of visible items, sorted.
    pub fn visible_ids(&self) -> Vec<&str> {
        self.state.visible.keys().map(String::as_str).collect()
    }

    /// The keyframe that made `id` visible, if it is visible.
    pub fn visible_keyframe(&self, id: &str) -> Option<&Keyframe> {
        self.state.visible.get(id)
    }

    /// Current mute state.
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Current volume, `0..=100`.
    pub fn volume(&self) -> f64 {
        self.volume * 100.0
    }

    /// Serializable state view.
    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            current_time: self.current_time(),
            duration: self.duration(),
            is_playing: self.state.is_playing,
            is_ready: self.state.is_ready,
            clock_running: self.is_clock_running(),
            current_prime: self.state.current_prime.clone(),
            visible: self.state.visible.keys().cloned().collect(),
        }
    }

    /// Receive every event.
    pub fn subscribe(&mut self) -> mpsc::Receiver<PlaybackEvent> {
        self.events.subscribe()
    }

    /// Receive events on the given topics only.
    pub fn subscribe_topics(&mut self, topics: &[EventTopic]) -> mpsc::Receiver<PlaybackEvent> {
        self.events.subscribe_topics(topics)
    }

    /// Install the "current time" text handle.
    pub fn set_time_text_sink(&mut self, sink: impl TimeTextSink + 'static) {
        self.ui.time_text = Some(Box::new(sink));
    }

    /// Install the progress handle.
    pub fn set_progress_sink(&mut self, sink: impl ProgressSink + 'static) {
        self.ui.progress = Some(Box::new(sink));
    }

    /// Drop both UI handles.
    pub fn clear_ui_sinks(&mut self) {
        self.ui.clear();
    }

    /// Bind the host's sink for item `id`, replacing any previous binding.
    ///
    /// The sink receives the current mute/volume state at once. If the item is already visible
    /// the sink is positioned from the virtual clock, and started when playing.
    pub fn bind_sink(&mut self, id: impl Into<String>, mut sink: Box<dyn MediaSink>) {
        let id = id.into();
        sink.set_muted(self.muted);
        sink.set_volume(self.volume);
        if self.state.visible.contains_key(&id) {
            if let Some(pos) = self.expected_position(&id) {
                sink.set_current_time(pos);
            }
            if self.state.is_playing {
                start_sink(&id, sink.as_mut());
            }
        }
        if self.sinks.bind(id.clone(), sink).is_some() {
            tracing::debug!(id = %id, "replaced bound sink");
        }
        self.refresh_ready();
    }

    /// Unbind and return the sink for `id`.
    pub fn unbind_sink(&mut self, id: &str) -> Option<Box<dyn MediaSink>> {
        let sink = self.sinks.unbind(id);
        if self.buffering.as_deref() == Some(id) {
            self.buffering = None;
        }
        self.refresh_ready();
        sink
    }

    /// Request the clock. Requests are reference counted; the clock runs while any is held.
    pub fn start_clock(&mut self) -> TimelineResult<()> {
        if !self.state.is_ready {
            return Err(TimelineError::playback(
                "clock cannot start before every media item has a bound sink",
            ));
        }
        let was_running = self.is_clock_running();
        self.requests.acquire();
        if !was_running {
            self.arm_callbacks();
        }
        Ok(())
    }

    /// Release one request taken with [`Self::start_clock`]. The clock stops when none remain.
    ///
    /// Unbalanced calls are ignored and never release the request held by [`Self::play`].
    pub fn stop_clock(&mut self) {
        if self.requests.count() == 0 {
            tracing::warn!("stop_clock without a matching start_clock");
            return;
        }
        self.requests.release();
        if !self.is_clock_running() {
            self.cancel_callbacks();
        }
    }

    /// Drive both scheduled callbacks with a monotonic host timestamp.
    pub fn pump(&mut self, now: Duration) {
        if let Some(dt) = self.frame.poll(now) {
            self.tick(dt.as_secs_f64() * 1000.0);
        }
        if self.drift.poll(now).is_some() {
            self.correct_drift();
        }
    }

    /// Advance the virtual clock by one frame of `dt_ms` wall time and apply crossed keyframes.
    pub fn tick(&mut self, dt_ms: f64) {
        if !self.is_clock_running() || !self.state.is_playing {
            return;
        }

        let sample = self.sample_prime();
        self.state.prime_time_ms =
            advance_prime_time(self.state.prime_time_ms, dt_ms.max(0.0), sample);

        let current = self.state.current_time();
        if current > self.timeline.duration() {
            self.reach_end();
            return;
        }

        self.push_ui(current);
        self.advance_keyframes(current, current);
    }

    /// Realign drifting non-prime sinks against the virtual clock.
    pub fn correct_drift(&mut self) -> Vec<DriftCorrection> {
        drift::correct_drift(
            &self.state,
            &self.enter_times,
            &mut self.sinks,
            self.config.drift_threshold_ms,
        )
    }

    /// Seek to `target` seconds, clamped to the timeline.
    ///
    /// Backward seeks hide everything and re-derive state from zero. Every visible sink is then
    /// positioned where the virtual clock implies.
    #[tracing::instrument(skip(self))]
    pub fn set_time(&mut self, target: f64) {
        let target = if target.is_finite() {
            target.clamp(0.0, self.timeline.duration())
        } else {
            0.0
        };

        let mut from = self.state.current_time();
        if target < from {
            let ids: Vec<String> = self.state.visible.keys().cloned().collect();
            for id in &ids {
                self.hide(id);
            }
            self.state.rewind();
            from = 0.0;
        }

        self.advance_keyframes(from, target);

        self.state.prime_time_ms = secs_to_ms(target);
        for id in self.state.visible.keys() {
            let (Some(enter), Some(sink)) = (self.enter_times.get(id), self.sinks.get_mut(id))
            else {
                continue;
            };
            let pos = ms_to_secs(self.state.prime_time_ms - secs_to_ms(*enter)).max(0.0);
            sink.set_current_time(pos);
        }
        self.push_ui(target);
    }

    /// Seek to a fraction of the duration.
    pub fn set_duration_percent(&mut self, fraction: f64) {
        self.set_time(fraction * self.timeline.duration());
    }

    /// Start playback of the visible sinks and take a clock request.
    ///
    /// Calling while already playing retries any visible sink that is not playing, e.g. after an
    /// autoplay rejection.
    pub fn play(&mut self) -> TimelineResult<()> {
        if !self.state.is_ready {
            return Err(TimelineError::playback(
                "cannot play before every media item has a bound sink",
            ));
        }
        if !self.holds_clock {
            let was_running = self.is_clock_running();
            self.holds_clock = true;
            if !was_running {
                self.arm_callbacks();
            }
        }
        let was_playing = std::mem::replace(&mut self.state.is_playing, true);
        for id in self.state.visible.keys() {
            if let Some(sink) = self.sinks.get_mut(id) {
                if sink.paused() {
                    start_sink(id, sink);
                }
            }
        }
        if !was_playing {
            tracing::info!(time = self.current_time(), "play");
            self.events.publish(PlaybackEvent::Play);
        }
        Ok(())
    }

    /// Pause the visible sinks and release the transport's clock request.
    pub fn pause(&mut self) {
        if !self.state.is_playing {
            return;
        }
        self.state.is_playing = false;
        self.pause_visible();
        self.release_transport_clock();
        tracing::info!(time = self.current_time(), "pause");
        self.events.publish(PlaybackEvent::Pause);
    }

    /// Play when paused, pause when playing.
    pub fn toggle_play(&mut self) -> TimelineResult<()> {
        if self.state.is_playing {
            self.pause();
            Ok(())
        } else {
            self.play()
        }
    }

    /// Mute every bound sink.
    pub fn mute(&mut self) {
        self.set_muted(true);
    }

    /// Unmute every bound sink.
    pub fn unmute(&mut self) {
        self.set_muted(false);
    }

    /// Flip the mute state of every bound sink.
    pub fn toggle_mute(&mut self) {
        self.set_muted(!self.muted);
    }

    /// Set the volume of every bound sink, `0..=100`.
    pub fn set_volume(&mut self, volume: f64) {
        let v = if volume.is_finite() {
            volume.clamp(0.0, 100.0) / 100.0
        } else {
            1.0
        };
        self.volume = v;
        self.sinks.for_each_mut(|_, s| s.set_volume(v));
    }

    /// Stop the clock and drop every sink and UI handle. No sink is commanded afterwards.
    pub fn teardown(&mut self) {
        self.halt_clock();
        self.state.is_playing = false;
        self.sinks.clear();
        self.ui.clear();
        self.state.rewind();
        self.buffering = None;
        self.state.is_ready = self.all_sinks_bound();
        tracing::debug!("timeline torn down");
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.sinks.for_each_mut(|_, s| s.set_muted(muted));
    }

    fn all_sinks_bound(&self) -> bool {
        self.timeline
            .items()
            .iter()
            .filter(|i| i.needs_sink())
            .all(|i| self.sinks.contains(i.annotation_id()))
    }

    fn refresh_ready(&mut self) {
        let ready = self.all_sinks_bound();
        if ready && !self.state.is_ready {
            tracing::info!(sinks = self.sinks.len(), "timeline ready");
            self.state.is_ready = true;
            self.events.publish(PlaybackEvent::Ready);
        } else {
            self.state.is_ready = ready;
        }
    }

    fn expected_position(&self, id: &str) -> Option<f64> {
        let enter = self.enter_times.get(id)?;
        Some(ms_to_secs(self.state.prime_time_ms - secs_to_ms(*enter)).max(0.0))
    }

    fn sample_prime(&mut self) -> Option<PrimeSample> {
        let id = self.state.current_prime.clone()?;
        let enter_time = *self.enter_times.get(&id)?;
        let sink = self.sinks.get(&id)?;
        let sample = PrimeSample {
            enter_time,
            sink_time: sink.current_time(),
            sink_paused: sink.paused(),
        };

        if sample.sink_paused {
            if self.buffering.as_deref() != Some(id.as_str()) {
                tracing::debug!(id = %id, "prime sink stalled; clock free-running");
                self.buffering = Some(id.clone());
                self.events.publish(PlaybackEvent::Buffering(id));
            }
        } else if self.buffering.as_deref() == Some(id.as_str()) {
            self.buffering = None;
        }
        Some(sample)
    }

    fn apply_changes(&mut self, changes: &[Keyframe]) {
        for kf in changes {
            if kf.reveals() {
                self.reveal(kf);
            } else {
                self.hide(&kf.id);
            }
        }
    }

    fn reveal(&mut self, kf: &Keyframe) {
        let newly = self
            .state
            .visible
            .insert(kf.id.clone(), kf.clone())
            .is_none();
        if kf.is_prime && self.state.current_prime.as_deref() != Some(kf.id.as_str()) {
            tracing::debug!(id = %kf.id, time = kf.time, "prime handover");
            self.state.current_prime = Some(kf.id.clone());
        }
        if newly {
            tracing::debug!(id = %kf.id, time = kf.time, "enter");
            self.events.publish(PlaybackEvent::Enter(kf.id.clone()));
        }
        if self.state.is_playing {
            if let Some(sink) = self.sinks.get_mut(&kf.id) {
                if sink.paused() {
                    start_sink(&kf.id, sink);
                }
            }
        }
    }

    fn hide(&mut self, id: &str) {
        if self.state.visible.remove(id).is_none() {
            return;
        }
        if self.state.current_prime.as_deref() == Some(id) {
            self.state.current_prime = None;
        }
        if self.buffering.as_deref() == Some(id) {
            self.buffering = None;
        }
        if let Some(sink) = self.sinks.get_mut(id) {
            sink.pause();
            sink.set_current_time(0.0);
        }
        tracing::debug!(id, "exit");
        self.events.publish(PlaybackEvent::Exit(id.to_owned()));
    }

    fn pause_visible(&mut self) {
        for id in self.state.visible.keys() {
            if let Some(sink) = self.sinks.get_mut(id) {
                sink.pause();
            }
        }
    }

    /// Publish `Ended`, then either loop or stop at zero. Stopping drops only the transport's
    /// clock request; other consumers keep the clock running.
    fn reach_end(&mut self) {
        tracing::info!(duration = self.timeline.duration(), "reached end of timeline");
        self.events.publish(PlaybackEvent::Ended);
        if self.config.loop_playback {
            self.set_time(0.0);
            return;
        }

        self.state.is_playing = false;
        self.pause_visible();
        self.set_time(0.0);
        self.release_transport_clock();
        self.push_ui(0.0);
        self.events.publish(PlaybackEvent::Pause);
    }

    fn advance_keyframes(&mut self, from: f64, target: f64) {
        let keyframes = self.timeline.keyframes();
        let pointer = self.state.next_keyframe_index;
        let mut window = resolve(pointer, keyframes, from, target);
        // Nothing lies beyond the target: apply the trailing run up to it.
        if window.changes.is_empty() && keyframes.last().is_some_and(|k| k.time <= target) {
            if let Some(tail) = keyframes.get(pointer..) {
                window = WindowChanges {
                    next_index: keyframes.len(),
                    changes: collapse(tail),
                };
            }
        }
        self.state.next_keyframe_index = window.next_index;
        self.apply_changes(&window.changes);
    }

    fn arm_callbacks(&mut self) {
        self.frame.start();
        self.drift.start();
        tracing::debug!("clock started");
    }

    fn release_transport_clock(&mut self) {
        if std::mem::take(&mut self.holds_clock) && !self.requests.is_running() {
            self.cancel_callbacks();
        }
    }

    /// Drop every clock request, the transport's included.
    fn halt_clock(&mut self) {
        self.requests.reset();
        self.holds_clock = false;
        self.cancel_callbacks();
    }

    fn cancel_callbacks(&mut self) {
        self.frame.cancel();
        self.drift.cancel();
        tracing::debug!("clock stopped");
    }

    fn push_ui(&mut self, secs: f64) {
        let duration = self.timeline.duration();
        let ratio = if duration > 0.0 {
            (secs / duration).clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.ui.update(&format_clock(secs), ratio);
    }
}

fn start_sink(id: &str, sink: &mut dyn MediaSink) {
    match sink.play() {
        PlayRequest::Started => {}
        PlayRequest::Pending => tracing::debug!(id, "sink play pending"),
        PlayRequest::Rejected(reason) => {
            tracing::warn!(id, %reason, "sink refused to play; item stays visible without playback");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/player.rs"]
mod tests;
