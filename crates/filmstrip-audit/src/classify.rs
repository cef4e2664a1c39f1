//! Resolution of an audit computation into its final shape.
//!
//! Missing-frame failures resolve to "not applicable" in timespan mode and
//! propagate unchanged in navigation mode. Everything else propagates.

use crate::product::AuditProduct;
use filmstrip_core::{FilmstripError, GatherMode, Result, TimelineErrorCode};
use tracing::info;

/// Upstream codes that mean "no usable frames".
pub const MISSING_FRAME_CODES: [TimelineErrorCode; 3] = [
    TimelineErrorCode::NoScreenshots,
    TimelineErrorCode::SpeedIndexOfZero,
    TimelineErrorCode::NoAnalyzedFrames,
];

/// Whether `err` reports a lack of usable frames.
pub fn is_missing_frames(err: &FilmstripError) -> bool {
    match err {
        FilmstripError::InvalidTimeline(_) => true,
        FilmstripError::Timeline(timeline) => MISSING_FRAME_CODES.contains(&timeline.code),
        _ => false,
    }
}

/// Final state of an audit run.
#[derive(Debug)]
pub enum Resolution {
    Success(AuditProduct),
    NotApplicable,
    Fatal(FilmstripError),
}

impl Resolution {
    /// Classify a finished computation under the caller's mode.
    pub fn classify(outcome: Result<AuditProduct>, mode: GatherMode) -> Self {
        match outcome {
            Ok(product) => Self::Success(product),
            Err(err) if mode == GatherMode::Timespan && is_missing_frames(&err) => {
                info!(error = %err, "No usable frames in timespan, audit not applicable");
                Self::NotApplicable
            }
            Err(err) => Self::Fatal(err),
        }
    }

    /// Convert to the value handed back to the caller.
    pub fn into_result(self) -> Result<AuditProduct> {
        match self {
            Self::Success(product) => Ok(product),
            Self::NotApplicable => Ok(AuditProduct::not_applicable()),
            Self::Fatal(err) => Err(err),
        }
    }
}
