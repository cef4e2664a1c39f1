//! Error types for Filmstrip.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Failure codes reported by a timeline source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimelineErrorCode {
    /// The trace contains no screenshots at all.
    NoScreenshots,
    /// Visual progress reached completion on the first frame.
    SpeedIndexOfZero,
    /// Every frame was discarded during visual analysis.
    NoAnalyzedFrames,
    /// The frame sequence is malformed (e.g. non-finite timestamps).
    InvalidSpeedline,
    /// The trace could not be read or parsed.
    TraceUnreadable,
}

impl TimelineErrorCode {
    /// Stable identifier used in logs and serialized errors.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoScreenshots => "NoScreenshots",
            Self::SpeedIndexOfZero => "SpeedIndexOfZero",
            Self::NoAnalyzedFrames => "NoAnalyzedFrames",
            Self::InvalidSpeedline => "InvalidSpeedline",
            Self::TraceUnreadable => "TraceUnreadable",
        }
    }
}

impl fmt::Display for TimelineErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failure raised by a timeline source while producing a timeline.
///
/// Cloneable so a memoized source can hand the same failure to every waiter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{code}: {message}")]
pub struct TimelineError {
    pub code: TimelineErrorCode,
    pub message: String,
}

impl TimelineError {
    pub fn new(code: TimelineErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Main error type for Filmstrip operations.
#[derive(Error, Debug)]
pub enum FilmstripError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Passthrough of an upstream timeline failure.
    #[error("Timeline source error: {0}")]
    Timeline(#[from] TimelineError),

    /// The timeline cannot be sampled (no analyzed frames, non-finite end).
    #[error("Invalid timeline: {0}")]
    InvalidTimeline(String),

    #[error("Invalid raster: {0}")]
    InvalidRaster(String),

    #[error("Encoder error: {0}")]
    Encoder(String),

    #[error("Decoder error: {0}")]
    Decoder(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Filmstrip operations.
pub type Result<T> = std::result::Result<T, FilmstripError>;
