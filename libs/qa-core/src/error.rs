//! Error types for qa-core.
//!
//! None of these are fatal: each one is contained to the operation that
//! raised it and leaves deck and session state exactly as it was.

use thiserror::Error;

/// Result type alias using ValidationError.
pub type Result<T> = std::result::Result<T, ValidationError>;

/// Recoverable input problems, surfaced to the user as a transient message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("please choose at least one filter")]
    EmptySelection,

    #[error("no cards found for that filter")]
    NoMatchingCards,

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("card {0} does not exist")]
    CardOutOfRange(usize),
}

/// Errors raised while importing a deck file.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to parse JSON: {0}")]
    Malformed(String),

    #[error("deck file must contain a JSON array of cards")]
    NotAnArray,

    #[error("could not read file: {0}")]
    Unreadable(String),
}

impl From<serde_json::Error> for ImportError {
    fn from(e: serde_json::Error) -> Self {
        Self::Malformed(e.to_string())
    }
}

/// Failures of the text-extraction and speech-synthesis collaborators.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("text extraction failed: {0}")]
    TextExtraction(String),

    #[error("speech synthesis failed: {0}")]
    SpeechSynthesis(String),
}

/// Camera could not be acquired or stopped delivering frames.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SensorError {
    #[error("camera not available: {0}")]
    Unavailable(String),
}

/// Audio clip could not be decoded or played.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    #[error("audio decode error: {0}")]
    Decode(String),

    #[error("audio playback error: {0}")]
    Play(String),
}
