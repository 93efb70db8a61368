use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::foundation::core::TimeWindow;
use crate::timeline::canvas::{Canvas, HighlightDef, ItemDef, ItemKindDef};
use crate::timeline::model::{
    ComplexTimeline, ImageItem, Keyframe, KeyframeKind, MediaItem, ResourceType, TextItem,
    TimelineItem,
};

const IMAGE_FORMATS: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "image/avif",
    "image/svg+xml",
];
const VIDEO_FORMATS: &[&str] = &[
    "video/mp4",
    "video/webm",
    "video/ogg",
    "video/quicktime",
    "application/vnd.apple.mpegurl",
    "application/x-mpegurl",
    "application/dash+xml",
];
const AUDIO_FORMATS: &[&str] = &[
    "audio/mpeg",
    "audio/mp4",
    "audio/aac",
    "audio/ogg",
    "audio/wav",
    "audio/webm",
    "audio/flac",
];
const TEXT_FORMATS: &[&str] = &["text/plain", "text/html"];

/// Why a canvas cannot be played as a complex timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum UnsupportedReason {
    /// The canvas, or a continuous-media item, has no usable duration.
    MissingDuration,
    /// An item has no annotation id or no resource locator.
    MissingResource,
    /// An item declares a media type its resolver does not handle.
    UnrecognizedFormat,
    /// More than one audio/video source on a canvas without complex-timeline support.
    MultipleContinuousMedia,
    /// Two items or highlights share one annotation id.
    DuplicateAnnotation,
}

/// Typed "unsupported" build result carrying a human-readable reason.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Unsupported {
    /// Machine-readable reason.
    pub reason: UnsupportedReason,
    /// Human-readable explanation, suitable for a fallback UI.
    pub message: String,
}

impl Unsupported {
    fn new(reason: UnsupportedReason, message: impl Into<String>) -> Self {
        Self {
            reason,
            message: message.into(),
        }
    }
}

impl fmt::Display for Unsupported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported ({:?}): {}", self.reason, self.message)
    }
}

/// Result of compiling a canvas. Building never fails with an error value.
#[derive(Clone, Debug, PartialEq)]
pub enum BuildOutcome {
    /// The compiled timeline.
    Timeline(ComplexTimeline),
    /// The canvas cannot be played; render a fallback instead.
    Unsupported(Unsupported),
}

impl BuildOutcome {
    /// Return the timeline, discarding an unsupported reason.
    pub fn timeline(self) -> Option<ComplexTimeline> {
        match self {
            Self::Timeline(t) => Some(t),
            Self::Unsupported(_) => None,
        }
    }

    /// Convert into a standard `Result`.
    pub fn into_result(self) -> Result<ComplexTimeline, Unsupported> {
        match self {
            Self::Timeline(t) => Ok(t),
            Self::Unsupported(u) => Err(u),
        }
    }
}

/// Compile a canvas into a sorted, prime-annotated [`ComplexTimeline`].
///
/// Items without a usable time window are skipped with a warning; everything else that
/// cannot be played yields [`BuildOutcome::Unsupported`].
#[tracing::instrument(skip(canvas), fields(canvas = canvas.id.as_deref().unwrap_or("-")))]
pub fn build_timeline(canvas: &Canvas) -> BuildOutcome {
    let Some(duration) = canvas.duration.filter(|d| d.is_finite() && *d > 0.0) else {
        return BuildOutcome::Unsupported(Unsupported::new(
            UnsupportedReason::MissingDuration,
            "canvas has no duration",
        ));
    };

    let continuous = canvas.continuous_media_count();
    if !canvas.complex_timeline && continuous > 1 {
        return BuildOutcome::Unsupported(Unsupported::new(
            UnsupportedReason::MultipleContinuousMedia,
            format!(
                "{continuous} audio/video sources painted on a canvas without complex timeline support"
            ),
        ));
    }

    let mut items = Vec::with_capacity(canvas.items.len());
    for (index, def) in canvas.items.iter().enumerate() {
        match resolve_item(def, index, duration) {
            Ok(Some(item)) => items.push(item),
            Ok(None) => {}
            Err(u) => return BuildOutcome::Unsupported(u),
        }
    }

    let highlights: Vec<(&str, TimeWindow)> = canvas
        .highlights
        .iter()
        .filter_map(|h| resolve_highlight(h, duration))
        .collect();

    let mut seen = HashSet::with_capacity(items.len() + highlights.len());
    let ids = items
        .iter()
        .map(TimelineItem::annotation_id)
        .chain(highlights.iter().map(|(id, _)| *id));
    for id in ids {
        if !seen.insert(id) {
            return BuildOutcome::Unsupported(Unsupported::new(
                UnsupportedReason::DuplicateAnnotation,
                format!("annotation id '{id}' is used by more than one item"),
            ));
        }
    }

    let raw = boundary_keyframes(&items, &highlights);
    let keyframes = promote_primes(&raw);
    tracing::debug!(
        items = items.len(),
        keyframes = keyframes.len(),
        "compiled complex timeline"
    );

    BuildOutcome::Timeline(ComplexTimeline::new(duration, items, keyframes))
}

/// Emit one `enter` and one `exit` per item and highlight, stable-sorted by time.
pub(crate) fn boundary_keyframes(
    items: &[TimelineItem],
    highlights: &[(&str, TimeWindow)],
) -> Vec<Keyframe> {
    let mut out = Vec::with_capacity((items.len() + highlights.len()) * 2);
    for item in items {
        let w = item.window();
        let rt = item.resource_type();
        out.push(Keyframe::enter(item.annotation_id(), rt, w.start));
        out.push(Keyframe::exit(item.annotation_id(), rt, w.end));
    }
    for (id, w) in highlights {
        out.push(Keyframe::enter(*id, ResourceType::Highlight, w.start));
        out.push(Keyframe::exit(*id, ResourceType::Highlight, w.end));
    }
    // `sort_by` is stable: equal times keep input order.
    out.sort_by(|a, b| a.time.total_cmp(&b.time));
    out
}

/// Prime promotion pass over a time-sorted stream. Produces a new stream; the input is untouched.
///
/// The first audio/video `enter` while nothing is entered becomes prime. Every audio/video `exit`
/// that leaves other items entered is followed by a synthetic prime `change` for the
/// earliest-entered survivor, at the same timestamp.
pub fn promote_primes(sorted: &[Keyframe]) -> Vec<Keyframe> {
    let mut out = Vec::with_capacity(sorted.len() + sorted.len() / 2);
    let mut entered: Vec<(&str, ResourceType)> = Vec::new();

    for kf in sorted {
        if !kf.resource_type.is_continuous() {
            out.push(kf.clone());
            continue;
        }
        match kf.kind {
            KeyframeKind::Enter => {
                let mut promoted = kf.clone();
                promoted.is_prime = entered.is_empty();
                entered.push((kf.id.as_str(), kf.resource_type));
                out.push(promoted);
            }
            KeyframeKind::Exit => {
                entered.retain(|(id, _)| *id != kf.id);
                out.push(kf.clone());
                if let Some((next, rt)) = entered.first() {
                    out.push(Keyframe::change(*next, *rt, kf.time));
                }
            }
            KeyframeKind::Change => out.push(kf.clone()),
        }
    }
    out
}

fn resolve_window(start: Option<f64>, end: Option<f64>, duration: f64) -> Option<TimeWindow> {
    let start = start.unwrap_or(0.0);
    let end = end.unwrap_or(duration).min(duration);
    TimeWindow::new(start, end).ok()
}

fn resolve_highlight(h: &HighlightDef, duration: f64) -> Option<(&str, TimeWindow)> {
    match resolve_window(h.start, h.end, duration) {
        Some(w) => Some((h.annotation_id.as_str(), w)),
        None => {
            tracing::warn!(
                id = %h.annotation_id,
                start = ?h.start,
                end = ?h.end,
                "highlight excluded: no resolvable time window"
            );
            None
        }
    }
}

fn resolve_item(
    def: &ItemDef,
    index: usize,
    duration: f64,
) -> Result<Option<TimelineItem>, Unsupported> {
    let Some(id) = def.annotation_id.as_deref().filter(|s| !s.trim().is_empty()) else {
        return Err(Unsupported::new(
            UnsupportedReason::MissingResource,
            format!("item #{index} has no annotation id"),
        ));
    };

    let (formats, needs_source) = match def.kind {
        ItemKindDef::Image => (IMAGE_FORMATS, true),
        ItemKindDef::Video => (VIDEO_FORMATS, true),
        ItemKindDef::Audio => (AUDIO_FORMATS, true),
        ItemKindDef::Text => (TEXT_FORMATS, false),
    };

    let source = def.source.as_deref().filter(|s| !s.trim().is_empty());
    if needs_source && source.is_none() {
        return Err(Unsupported::new(
            UnsupportedReason::MissingResource,
            format!("item '{id}' has no resource identifier"),
        ));
    }

    if let Some(format) = def.format.as_deref() {
        let normalized = format
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        if !formats.contains(&normalized.as_str()) {
            return Err(Unsupported::new(
                UnsupportedReason::UnrecognizedFormat,
                format!("item '{id}' has unrecognized format '{format}'"),
            ));
        }
    }

    let continuous = matches!(def.kind, ItemKindDef::Audio | ItemKindDef::Video);
    let media_duration = def.duration.filter(|d| d.is_finite() && *d > 0.0);
    if continuous && media_duration.is_none() {
        return Err(Unsupported::new(
            UnsupportedReason::MissingDuration,
            format!("{} item '{id}' has no duration", def.kind.label()),
        ));
    }

    let Some(window) = resolve_window(def.start, def.end, duration) else {
        tracing::warn!(
            id,
            start = ?def.start,
            end = ?def.end,
            "item excluded: no resolvable time window"
        );
        return Ok(None);
    };

    let source = source.unwrap_or_default().to_owned();
    let region = def.region.unwrap_or_default();
    let item = match def.kind {
        ItemKindDef::Image => TimelineItem::Image(ImageItem {
            annotation_id: id.to_owned(),
            source,
            window,
            region,
        }),
        ItemKindDef::Text => TimelineItem::Text(TextItem {
            annotation_id: id.to_owned(),
            text: def.text.clone().unwrap_or_default(),
            window,
            region,
        }),
        ItemKindDef::Video | ItemKindDef::Audio => {
            let media = MediaItem {
                annotation_id: id.to_owned(),
                source,
                window,
                region: def.region,
                duration: media_duration.unwrap_or_default(),
            };
            if def.kind == ItemKindDef::Video {
                TimelineItem::Video(media)
            } else {
                TimelineItem::Audio(media)
            }
        }
    };
    Ok(Some(item))
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/builder.rs"]
mod tests;
