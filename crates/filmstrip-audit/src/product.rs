//! Report-facing output of an audit.
//!
//! Field names and the `type` tags are read by the report renderer and must
//! not change.

use crate::filmstrip::FilmstripResult;
use serde::{Deserialize, Serialize};

/// Score attached to informative audits.
pub const NEUTRAL_SCORE: f64 = 1.0;

/// Result of running one audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditProduct {
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_applicable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<AuditDetails>,
}

impl AuditProduct {
    /// Neutral product carrying details.
    pub fn informative(details: AuditDetails) -> Self {
        Self {
            score: NEUTRAL_SCORE,
            not_applicable: None,
            details: Some(details),
        }
    }

    /// Graceful "nothing to show" product.
    pub fn not_applicable() -> Self {
        Self {
            score: NEUTRAL_SCORE,
            not_applicable: Some(true),
            details: None,
        }
    }

    pub fn is_not_applicable(&self) -> bool {
        self.not_applicable == Some(true)
    }
}

/// Audit-specific details, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AuditDetails {
    Filmstrip {
        /// Window length in milliseconds.
        scale: f64,
        items: Vec<FilmstripItem>,
    },
    Screenshot {
        timing: i64,
        timestamp: f64,
        data: String,
    },
}

/// One thumbnail as rendered in the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilmstripItem {
    pub timing: i64,
    pub timestamp: f64,
    pub data: String,
}

impl From<&FilmstripResult> for AuditProduct {
    fn from(result: &FilmstripResult) -> Self {
        let items = result
            .thumbnails
            .iter()
            .map(|thumb| FilmstripItem {
                timing: thumb.timing_ms,
                timestamp: thumb.timestamp_micros,
                data: thumb.payload.to_string(),
            })
            .collect();

        AuditProduct::informative(AuditDetails::Filmstrip {
            scale: result.scale_ms,
            items,
        })
    }
}
