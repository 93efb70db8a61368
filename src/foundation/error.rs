/// Convenience result type used across the engine.
pub type TimelineResult<T> = Result<T, TimelineError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Timeline construction never returns this type for unsupported input; see
/// [`crate::BuildOutcome::Unsupported`].
#[derive(thiserror::Error, Debug)]
pub enum TimelineError {
    /// Invalid user-provided canvas or configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Transport or clock operation issued in a state that does not allow it.
    #[error("playback error: {0}")]
    Playback(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TimelineError {
    /// Build a [`TimelineError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`TimelineError::Playback`] value.
    pub fn playback(msg: impl Into<String>) -> Self {
        Self::Playback(msg.into())
    }

    /// Build a [`TimelineError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
