use serde::{Deserialize, Serialize};

use crate::foundation::core::{Region, TimeWindow};

/// Resource kind carried by a keyframe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    /// Static raster image.
    Image,
    /// Video track.
    Video,
    /// Audio track.
    Audio,
    /// Text overlay.
    Text,
    /// Non-visual annotation highlight.
    Highlight,
}

impl ResourceType {
    /// Return `true` for audio and video, the only kinds that can be prime.
    pub fn is_continuous(self) -> bool {
        matches!(self, Self::Audio | Self::Video)
    }
}

/// Keyframe transition kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyframeKind {
    /// Item becomes visible/audible.
    Enter,
    /// Item is hidden/silenced.
    Exit,
    /// Synthetic prime hand-over to an already-entered item.
    Change,
}

/// A timestamped enter/exit/change event for one timeline item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keyframe {
    /// Annotation id of the item.
    pub id: String,
    /// Resource kind of the item.
    pub resource_type: ResourceType,
    /// Timeline position in seconds.
    pub time: f64,
    /// Transition kind.
    pub kind: KeyframeKind,
    /// Set when this keyframe makes its item the authoritative clock source.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_prime: bool,
}

impl Keyframe {
    /// Build an `enter` keyframe.
    pub fn enter(id: impl Into<String>, resource_type: ResourceType, time: f64) -> Self {
        Self {
            id: id.into(),
            resource_type,
            time,
            kind: KeyframeKind::Enter,
            is_prime: false,
        }
    }

    /// Build an `exit` keyframe.
    pub fn exit(id: impl Into<String>, resource_type: ResourceType, time: f64) -> Self {
        Self {
            id: id.into(),
            resource_type,
            time,
            kind: KeyframeKind::Exit,
            is_prime: false,
        }
    }

    /// Build a synthetic prime `change` keyframe.
    pub fn change(id: impl Into<String>, resource_type: ResourceType, time: f64) -> Self {
        Self {
            id: id.into(),
            resource_type,
            time,
            kind: KeyframeKind::Change,
            is_prime: true,
        }
    }

    /// Return a copy with `is_prime` set.
    pub fn prime(mut self) -> Self {
        self.is_prime = true;
        self
    }

    /// Return `true` for `enter` and `change`, which both leave the item visible.
    pub fn reveals(&self) -> bool {
        !matches!(self.kind, KeyframeKind::Exit)
    }
}

/// A placed raster image.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageItem {
    /// Identity of the painting annotation.
    pub annotation_id: String,
    /// Source locator.
    pub source: String,
    /// Temporal placement.
    pub window: TimeWindow,
    /// Spatial placement.
    pub region: Region,
}

/// A placed audio or video track.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    /// Identity of the painting annotation.
    pub annotation_id: String,
    /// Source locator.
    pub source: String,
    /// Temporal placement.
    pub window: TimeWindow,
    /// Spatial placement; absent for audio.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<Region>,
    /// Intrinsic media duration in seconds.
    pub duration: f64,
}

/// A placed text overlay.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextItem {
    /// Identity of the painting annotation.
    pub annotation_id: String,
    /// Text content.
    pub text: String,
    /// Temporal placement.
    pub window: TimeWindow,
    /// Spatial placement.
    pub region: Region,
}

/// A resolved, immutable resource placed on the timeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TimelineItem {
    /// Image item.
    Image(ImageItem),
    /// Audio item.
    Audio(MediaItem),
    /// Video item.
    Video(MediaItem),
    /// Text item.
    Text(TextItem),
}

impl TimelineItem {
    /// Item identity.
    pub fn annotation_id(&self) -> &str {
        match self {
            Self::Image(i) => &i.annotation_id,
            Self::Audio(m) | Self::Video(m) => &m.annotation_id,
            Self::Text(t) => &t.annotation_id,
        }
    }

    /// Keyframe resource kind for this item.
    pub fn resource_type(&self) -> ResourceType {
        match self {
            Self::Image(_) => ResourceType::Image,
            Self::Audio(_) => ResourceType::Audio,
            Self::Video(_) => ResourceType::Video,
            Self::Text(_) => ResourceType::Text,
        }
    }

    /// Temporal placement.
    pub fn window(&self) -> TimeWindow {
        match self {
            Self::Image(i) => i.window,
            Self::Audio(m) | Self::Video(m) => m.window,
            Self::Text(t) => t.window,
        }
    }

    /// Return `true` when the item needs a bound media sink before playback may start.
    pub fn needs_sink(&self) -> bool {
        self.resource_type().is_continuous()
    }
}

/// Compiled timeline for one canvas: items plus the sorted, prime-annotated keyframe stream.
///
/// Immutable after construction; a new canvas requires a new instance.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ComplexTimeline {
    duration: f64,
    items: Vec<TimelineItem>,
    keyframes: Vec<Keyframe>,
}

impl ComplexTimeline {
    pub(crate) fn new(duration: f64, items: Vec<TimelineItem>, keyframes: Vec<Keyframe>) -> Self {
        Self {
            duration,
            items,
            keyframes,
        }
    }

    /// Canvas duration in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Resolved items in input order.
    pub fn items(&self) -> &[TimelineItem] {
        &self.items
    }

    /// Keyframes sorted non-decreasingly by time.
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    /// Look up an item by annotation id.
    pub fn item(&self, id: &str) -> Option<&TimelineItem> {
        self.items.iter().find(|i| i.annotation_id() == id)
    }

    /// Start time of an item or highlight, taken from its `enter` keyframe.
    pub fn enter_time(&self, id: &str) -> Option<f64> {
        self.keyframes
            .iter()
            .find(|k| k.id == id && k.kind == KeyframeKind::Enter)
            .map(|k| k.time)
    }
}
