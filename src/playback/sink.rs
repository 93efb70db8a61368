use std::cell::RefCell;
use std::rc::Rc;

/// Completion signal of a fire-and-forget native play command.
///
/// The player never waits on this; it re-reads [`MediaSink::paused`] on later ticks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlayRequest {
    /// Playback started synchronously.
    Started,
    /// Playback was requested and will start once the sink has buffered.
    Pending,
    /// The sink refused to play (e.g. autoplay policy). The item stays visible without playback.
    Rejected(String),
}

/// An external playable handle bound to one timeline item.
///
/// The player commands sinks but never creates or destroys them. Times are in seconds, volume is
/// `0.0..=1.0`.
pub trait MediaSink {
    /// Start or resume native playback.
    fn play(&mut self) -> PlayRequest;
    /// Pause native playback.
    fn pause(&mut self);
    /// Current native position in seconds.
    fn current_time(&self) -> f64;
    /// Seek the native position.
    fn set_current_time(&mut self, secs: f64);
    /// Whether output is muted.
    fn muted(&self) -> bool;
    /// Mute or unmute output.
    fn set_muted(&mut self, muted: bool);
    /// Output volume in `0.0..=1.0`.
    fn volume(&self) -> f64;
    /// Set output volume in `0.0..=1.0`.
    fn set_volume(&mut self, volume: f64);
    /// Whether the sink is currently not advancing (paused or still buffering).
    fn paused(&self) -> bool;
}

/// Imperative "current time" text handle, updated on every clock tick.
pub trait TimeTextSink {
    /// Replace the displayed text.
    fn set_text(&mut self, text: &str);
}

/// Imperative progress bar handle, updated on every clock tick.
pub trait ProgressSink {
    /// Set progress as a ratio in `0.0..=1.0`.
    fn set_ratio(&mut self, ratio: f64);
}

impl<F: FnMut(&str)> TimeTextSink for F {
    fn set_text(&mut self, text: &str) {
        self(text)
    }
}

impl<F: FnMut(f64)> ProgressSink for F {
    fn set_ratio(&mut self, ratio: f64) {
        self(ratio)
    }
}

#[derive(Debug)]
struct SimState {
    position: f64,
    duration: Option<f64>,
    playing: bool,
    muted: bool,
    volume: f64,
    rate: f64,
    start_latency_ms: f64,
    buffered_ms: f64,
    reject_play: Option<String>,
    play_calls: u32,
    pause_calls: u32,
    seeks: Vec<f64>,
}

/// Headless media sink that advances its own position when the host calls [`Self::advance`].
///
/// Clones share state, so a host can keep one handle while the player owns another.
/// Start latency models buffering; a rate other than `1.0` models decode drift.
#[derive(Clone, Debug)]
pub struct SimulatedSink {
    inner: Rc<RefCell<SimState>>,
}

impl Default for SimulatedSink {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedSink {
    /// New paused sink at position 0.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(SimState {
                position: 0.0,
                duration: None,
                playing: false,
                muted: false,
                volume: 1.0,
                rate: 1.0,
                start_latency_ms: 0.0,
                buffered_ms: 0.0,
                reject_play: None,
                play_calls: 0,
                pause_calls: 0,
                seeks: Vec::new(),
            })),
        }
    }

    /// Stop advancing once `secs` of media have played.
    pub fn with_duration(self, secs: f64) -> Self {
        self.inner.borrow_mut().duration = Some(secs);
        self
    }

    /// Report `paused` for this long after every play/seek before advancing.
    pub fn with_start_latency_ms(self, ms: f64) -> Self {
        self.inner.borrow_mut().start_latency_ms = ms.max(0.0);
        self
    }

    /// Advance at `rate` media seconds per wall second.
    pub fn with_rate(self, rate: f64) -> Self {
        self.inner.borrow_mut().rate = rate;
        self
    }

    /// Refuse every play command with `reason`.
    pub fn rejecting(self, reason: impl Into<String>) -> Self {
        self.inner.borrow_mut().reject_play = Some(reason.into());
        self
    }

    /// Stop refusing play commands.
    pub fn allow_play(&self) {
        self.inner.borrow_mut().reject_play = None;
    }

    /// Advance wall time by `dt_ms`.
    pub fn advance(&self, dt_ms: f64) {
        let mut s = self.inner.borrow_mut();
        if !s.playing {
            return;
        }
        let mut dt = dt_ms.max(0.0);
        if s.buffered_ms < s.start_latency_ms {
            let need = s.start_latency_ms - s.buffered_ms;
            let used = need.min(dt);
            s.buffered_ms += used;
            dt -= used;
        }
        s.position += dt / 1000.0 * s.rate;
        if let Some(d) = s.duration {
            if s.position >= d {
                s.position = d;
                s.playing = false;
            }
        }
    }

    /// Whether the sink was told to play and has not been paused since.
    pub fn is_playing(&self) -> bool {
        self.inner.borrow().playing
    }

    /// Number of play commands received.
    pub fn play_calls(&self) -> u32 {
        self.inner.borrow().play_calls
    }

    /// Number of pause commands received.
    pub fn pause_calls(&self) -> u32 {
        self.inner.borrow().pause_calls
    }

    /// Every position written through [`MediaSink::set_current_time`].
    pub fn seeks(&self) -> Vec<f64> {
        self.inner.borrow().seeks.clone()
    }
}

impl MediaSink for SimulatedSink {
    fn play(&mut self) -> PlayRequest {
        let mut s = self.inner.borrow_mut();
        s.play_calls += 1;
        if let Some(reason) = s.reject_play.clone() {
            return PlayRequest::Rejected(reason);
        }
        s.playing = true;
        if s.buffered_ms < s.start_latency_ms {
            PlayRequest::Pending
        } else {
            PlayRequest::Started
        }
    }

    fn pause(&mut self) {
        let mut s = self.inner.borrow_mut();
        s.pause_calls += 1;
        s.playing = false;
    }

    fn current_time(&self) -> f64 {
        self.inner.borrow().position
    }

    fn set_current_time(&mut self, secs: f64) {
        let mut s = self.inner.borrow_mut();
        s.position = secs.max(0.0);
        s.buffered_ms = 0.0;
        s.seeks.push(secs);
    }

    fn muted(&self) -> bool {
        self.inner.borrow().muted
    }

    fn set_muted(&mut self, muted: bool) {
        self.inner.borrow_mut().muted = muted;
    }

    fn volume(&self) -> f64 {
        self.inner.borrow().volume
    }

    fn set_volume(&mut self, volume: f64) {
        self.inner.borrow_mut().volume = volume.clamp(0.0, 1.0);
    }

    fn paused(&self) -> bool {
        let s = self.inner.borrow();
        !s.playing || s.buffered_ms < s.start_latency_ms
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/sink.rs"]
mod tests;
