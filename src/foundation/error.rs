use crate::normalize::schema::SchemaError;

/// Convenience result type used across storyreel.
pub type StoryResult<T> = Result<T, StoryError>;

/// Top-level error taxonomy used by library APIs.
///
/// Only [`StoryError::Schema`] can abort script generation. Everything the generator can
/// recover from is reported as a [`crate::Diagnostic`] instead.
#[derive(thiserror::Error, Debug)]
pub enum StoryError {
    /// The storyboard document is not usable at all.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Invalid user-provided options, manifests or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Failures from external media tools (`ffmpeg`, `ffprobe`, `edge-tts`).
    #[error("media error: {0}")]
    Media(String),

    /// Failures from version-control or code-hosting commands.
    #[error("sync error: {0}")]
    Sync(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StoryError {
    /// Build a [`StoryError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`StoryError::Media`] value.
    pub fn media(msg: impl Into<String>) -> Self {
        Self::Media(msg.into())
    }

    /// Build a [`StoryError::Sync`] value.
    pub fn sync(msg: impl Into<String>) -> Self {
        Self::Sync(msg.into())
    }

    /// Build a [`StoryError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Return `true` for the one error class that aborts generation.
    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Schema(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
