//! Build configuration and execution mode.

use crate::defaults;
use crate::error::{FilmstripError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Execution context of the caller.
///
/// Governs whether a missing-frames failure degrades to "not applicable"
/// (timespan) or propagates (navigation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatherMode {
    /// Full page load.
    #[default]
    Navigation,
    /// User-recorded interaction window.
    Timespan,
}

impl GatherMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Navigation => "navigation",
            Self::Timespan => "timespan",
        }
    }
}

impl fmt::Display for GatherMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GatherMode {
    type Err = FilmstripError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "navigation" => Ok(Self::Navigation),
            "timespan" => Ok(Self::Timespan),
            other => Err(FilmstripError::Config(format!(
                "Unknown gather mode '{}' (expected navigation or timespan)",
                other
            ))),
        }
    }
}

/// Configuration for a filmstrip build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilmstripConfig {
    /// Floor applied to the computed timeline end, in milliseconds (default: 3000).
    pub minimum_timeline_duration_ms: f64,
    /// Encode selected frames on the rayon pool (default: true).
    pub parallel_encode: bool,
}

impl Default for FilmstripConfig {
    fn default() -> Self {
        Self {
            minimum_timeline_duration_ms: defaults::MINIMUM_TIMELINE_DURATION_MS,
            parallel_encode: true,
        }
    }
}

impl FilmstripConfig {
    /// Check that every value is usable.
    pub fn validate(&self) -> Result<()> {
        let floor = self.minimum_timeline_duration_ms;
        if !floor.is_finite() || floor < 0.0 {
            return Err(FilmstripError::Config(format!(
                "minimum_timeline_duration_ms must be a finite, non-negative number, got {}",
                floor
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration. Missing fields take defaults.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let config: Self = serde_json::from_slice(data)
            .map_err(|e| FilmstripError::Config(format!("Invalid configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_json(&data)
    }
}
