//! Complex timeline playback engine.
//!
//! A canvas places images, text, highlights, audio and video on one shared timeline. Several
//! continuous media items may overlap, so this crate compiles the canvas into a flat, sorted
//! keyframe stream and drives a single virtual clock over it.
//!
//! # Pipeline overview
//!
//! 1. **Build**: `Canvas -> ComplexTimeline` (enter/exit keyframes, prime promotion)
//! 2. **Resolve**: `(keyframes, window) -> WindowChanges` (net visibility changes)
//! 3. **Play**: [`TimelinePlayer`] advances the clock, follows the prime media item, starts and
//!    stops host sinks, and corrects drift of the other sinks
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: building and resolving are pure for a given input.
//! - **Host-owned media**: playback goes through the [`MediaSink`] trait; the engine never
//!   decodes anything itself.
//! - **Single writer**: the virtual clock is only written by the player's tick and seek paths.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;
mod playback;
mod timeline;

/// Player tunables loaded from JSON.
pub mod config;

pub use config::PlayerConfig;
pub use foundation::core::{Region, TimeWindow, format_clock, ms_to_secs, secs_to_ms};
pub use foundation::error::{TimelineError, TimelineResult};
pub use playback::clock::{ClockRequests, ClockState, PrimeSample, advance_prime_time};
pub use playback::drift::{DriftCorrection, correct_drift};
pub use playback::events::{EventBus, EventTopic, PlaybackEvent};
pub use playback::player::{PlaybackSnapshot, TimelinePlayer};
pub use playback::registry::SinkRegistry;
pub use playback::schedule::Scheduled;
pub use playback::sink::{MediaSink, PlayRequest, ProgressSink, SimulatedSink, TimeTextSink};
pub use timeline::builder::{
    BuildOutcome, Unsupported, UnsupportedReason, build_timeline, promote_primes,
};
pub use timeline::canvas::{Canvas, HighlightDef, ItemDef, ItemKindDef};
pub use timeline::model::{
    ComplexTimeline, ImageItem, Keyframe, KeyframeKind, MediaItem, ResourceType, TextItem,
    TimelineItem,
};
pub use timeline::resolver::{WindowChanges, resolve};
