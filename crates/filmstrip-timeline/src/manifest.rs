//! File-backed traces: a versioned JSON manifest listing screenshot files.
//!
//! ```text
//! trace/
//!   manifest.json   # { "version": 1, "beginning": .., "completion": .., "frames": [..] }
//!   frame-000.png
//!   frame-001.png
//! ```
//!
//! Image paths are resolved relative to the manifest's directory and decoded
//! only when a frame's raster is requested.

use crate::frame::{Frame, Timeline};
use crate::source::{BoxFuture, TimelineResult, TimelineSource, TraceId};
use filmstrip_core::{FilmstripError, Raster, Result, TimelineError, TimelineErrorCode};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Current schema version.
pub const CURRENT_VERSION: u32 = 1;

/// One screenshot entry in a manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestFrame {
    /// Capture time in milliseconds.
    pub timestamp: f64,
    /// Synthesized between two real captures.
    #[serde(default)]
    pub interpolated: bool,
    /// Image file, relative to the manifest directory.
    pub image: PathBuf,
}

/// Versioned trace manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceManifest {
    /// Schema version for migration.
    pub version: u32,
    /// Start of the capture window in milliseconds.
    pub beginning: f64,
    /// Visual completion relative to `beginning`, if known.
    #[serde(default)]
    pub completion: Option<f64>,
    /// Screenshots in any order.
    pub frames: Vec<ManifestFrame>,
}

impl TraceManifest {
    /// Create an empty manifest.
    pub fn new(beginning: f64, completion: Option<f64>) -> Self {
        Self {
            version: CURRENT_VERSION,
            beginning,
            completion,
            frames: Vec::new(),
        }
    }

    /// Append a screenshot entry.
    pub fn push_frame(&mut self, timestamp: f64, interpolated: bool, image: impl Into<PathBuf>) {
        self.frames.push(ManifestFrame {
            timestamp,
            interpolated,
            image: image.into(),
        });
    }

    /// Serialize to JSON bytes.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(|e| {
            FilmstripError::Serialization(format!("Failed to serialize manifest: {}", e))
        })
    }

    /// Deserialize from JSON bytes, applying migrations if needed.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let raw: serde_json::Value = serde_json::from_slice(data)
            .map_err(|e| FilmstripError::Serialization(format!("Invalid JSON: {}", e)))?;

        let version = raw.get("version").and_then(|v| v.as_u64()).unwrap_or(0) as u32;

        if version > CURRENT_VERSION {
            return Err(FilmstripError::Serialization(format!(
                "Manifest version {} is newer than supported version {}",
                version, CURRENT_VERSION
            )));
        }

        let migrated = migrate(raw, version)?;

        serde_json::from_value(migrated)
            .map_err(|e| FilmstripError::Serialization(format!("Failed to parse manifest: {}", e)))
    }

    /// Save manifest to a file path.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let data = self.to_json()?;
        std::fs::write(path, data)?;
        Ok(())
    }

    /// Load manifest from a file path.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_json(&data)
    }

    /// Build a timeline whose frames decode from `base_dir` on demand.
    ///
    /// Frames are sorted by timestamp. An empty frame list is reported as
    /// `NoScreenshots`, a non-finite time as `InvalidSpeedline`.
    pub fn into_timeline(self, base_dir: &Path) -> std::result::Result<Timeline, TimelineError> {
        if self.frames.is_empty() {
            return Err(TimelineError::new(
                TimelineErrorCode::NoScreenshots,
                "manifest lists no screenshots",
            ));
        }
        if !self.beginning.is_finite() || self.completion.is_some_and(|c| !c.is_finite()) {
            return Err(TimelineError::new(
                TimelineErrorCode::InvalidSpeedline,
                "manifest window is not finite",
            ));
        }
        if let Some(bad) = self.frames.iter().find(|f| !f.timestamp.is_finite()) {
            return Err(TimelineError::new(
                TimelineErrorCode::InvalidSpeedline,
                format!("frame {} has a non-finite timestamp", bad.image.display()),
            ));
        }

        let mut entries = self.frames;
        entries.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));

        let frames: Vec<Arc<dyn Frame>> = entries
            .into_iter()
            .map(|entry| {
                Arc::new(FileFrame {
                    timestamp: entry.timestamp,
                    interpolated: entry.interpolated,
                    path: base_dir.join(entry.image),
                }) as Arc<dyn Frame>
            })
            .collect();

        Ok(Timeline::new(frames, self.beginning, self.completion))
    }
}

/// Apply sequential migrations from `from_version` to CURRENT_VERSION.
fn migrate(mut data: serde_json::Value, from_version: u32) -> Result<serde_json::Value> {
    let mut version = from_version;

    while version < CURRENT_VERSION {
        match version {
            0 => {
                // v0 → v1: a bare array of frames, window starting at zero
                if data.is_array() {
                    data = serde_json::json!({
                        "version": 1,
                        "beginning": 0.0,
                        "completion": null,
                        "frames": data,
                    });
                } else if let Some(obj) = data.as_object_mut() {
                    obj.insert("version".into(), serde_json::json!(1));
                    obj.entry("beginning").or_insert(serde_json::json!(0.0));
                }
                version = 1;
            }
            _ => {
                return Err(FilmstripError::Serialization(format!(
                    "No migration path from version {}",
                    version
                )));
            }
        }
    }

    Ok(data)
}

/// A screenshot stored as an image file.
#[derive(Debug, Clone)]
pub struct FileFrame {
    timestamp: f64,
    interpolated: bool,
    path: PathBuf,
}

impl Frame for FileFrame {
    fn timestamp(&self) -> f64 {
        self.timestamp
    }

    fn is_interpolated(&self) -> bool {
        self.interpolated
    }

    fn raster(&self) -> Result<Raster> {
        filmstrip_media::decode_file(&self.path)
    }
}

/// Timeline source reading manifests from disk.
///
/// A trace id is the manifest path, relative to `root` unless absolute.
pub struct ManifestTimelineSource {
    root: PathBuf,
}

impl ManifestTimelineSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn load(&self, trace: &TraceId) -> TimelineResult {
        let path = self.root.join(trace.as_str());
        info!(path = %path.display(), "Loading trace manifest");

        let manifest = TraceManifest::load_from_file(&path).map_err(|e| {
            TimelineError::new(
                TimelineErrorCode::TraceUnreadable,
                format!("{}: {}", path.display(), e),
            )
        })?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let timeline = manifest.into_timeline(base_dir)?;

        debug!(
            trace = %trace,
            frames = timeline.len(),
            beginning = timeline.beginning(),
            "Manifest timeline ready"
        );
        Ok(Arc::new(timeline))
    }
}

impl TimelineSource for ManifestTimelineSource {
    fn request<'a>(&'a self, trace: &'a TraceId) -> BoxFuture<'a, TimelineResult> {
        Box::pin(async move { self.load(trace) })
    }
}
