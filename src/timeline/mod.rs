//! Canvas input, keyframe compilation and window resolution.

/// Host-facing canvas description (serde boundary).
pub(crate) mod canvas;
/// Canvas -> [`ComplexTimeline`](crate::ComplexTimeline) compilation.
pub(crate) mod builder;
pub(crate) mod model;
/// Net visibility changes across a time window.
pub(crate) mod resolver;
