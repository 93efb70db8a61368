use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::foundation::core::Region;
use crate::foundation::error::{TimelineError, TimelineResult};

/// Builder input: one canvas with its painted resources and highlight annotations.
///
/// This is the JSON-facing, host-authored representation. It is compiled into a
/// [`crate::ComplexTimeline`] by [`crate::build_timeline`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Canvas {
    /// Optional canvas identifier, used only for logging.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Canvas duration in seconds.
    #[serde(default)]
    pub duration: Option<f64>,
    /// Whether the host supports more than one continuous-media source on this canvas.
    #[serde(default = "default_complex_timeline")]
    pub complex_timeline: bool,
    /// Painted resources in paint order.
    #[serde(default)]
    pub items: Vec<ItemDef>,
    /// Non-visual highlight annotations.
    #[serde(default)]
    pub highlights: Vec<HighlightDef>,
}

fn default_complex_timeline() -> bool {
    true
}

/// Resource kind of a painted item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKindDef {
    /// Raster image.
    Image,
    /// Audio track.
    Audio,
    /// Video track.
    Video,
    /// Text overlay.
    Text,
}

/// One painted resource as authored.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDef {
    /// Identity of the painting annotation.
    #[serde(default)]
    pub annotation_id: Option<String>,
    /// Resource kind.
    pub kind: ItemKindDef,
    /// Resource locator (URL or path).
    #[serde(default)]
    pub source: Option<String>,
    /// Media type, e.g. `video/mp4`.
    #[serde(default)]
    pub format: Option<String>,
    /// Text content, for text items.
    #[serde(default)]
    pub text: Option<String>,
    /// Start on the canvas timeline in seconds; defaults to 0.
    #[serde(default)]
    pub start: Option<f64>,
    /// End on the canvas timeline in seconds; defaults to the canvas duration.
    #[serde(default)]
    pub end: Option<f64>,
    /// Intrinsic media duration in seconds.
    #[serde(default)]
    pub duration: Option<f64>,
    /// Spatial target on the canvas.
    #[serde(default)]
    pub region: Option<Region>,
}

/// A non-visual annotation occupying a time window.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightDef {
    /// Annotation identity.
    pub annotation_id: String,
    /// Start in seconds; defaults to 0.
    #[serde(default)]
    pub start: Option<f64>,
    /// End in seconds; defaults to the canvas duration.
    #[serde(default)]
    pub end: Option<f64>,
}

impl Canvas {
    /// Parse a canvas from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> TimelineResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| TimelineError::serde(format!("parse canvas JSON: {e}")))
    }

    /// Parse a canvas from a JSON string.
    pub fn from_json_str(s: &str) -> TimelineResult<Self> {
        serde_json::from_str(s).map_err(|e| TimelineError::serde(format!("parse canvas JSON: {e}")))
    }

    /// Parse a canvas from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> TimelineResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            TimelineError::validation(format!("open canvas JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Number of audio/video items painted on this canvas.
    pub fn continuous_media_count(&self) -> usize {
        self.items
            .iter()
            .filter(|i| matches!(i.kind, ItemKindDef::Audio | ItemKindDef::Video))
            .count()
    }
}

impl ItemKindDef {
    /// Lowercase name, as it appears in JSON.
    pub fn label(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Audio => "audio",
            Self::Video => "video",
            Self::Text => "text",
        }
    }
}

impl ItemDef {
    /// Minimal item of the given kind; callers fill in the rest with struct update syntax.
    pub fn new(kind: ItemKindDef, annotation_id: impl Into<String>) -> Self {
        Self {
            annotation_id: Some(annotation_id.into()),
            kind,
            source: None,
            format: None,
            text: None,
            start: None,
            end: None,
            duration: None,
            region: None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/canvas.rs"]
mod tests;
