//! Frame capability and the ordered timeline of frames.

use filmstrip_core::{Raster, Result};
use std::fmt;
use std::sync::Arc;

/// A captured screenshot on the timeline.
///
/// Owned by the timeline source; the pipeline only reads it. `raster()` may
/// decode on demand and should be called only for frames that are used.
pub trait Frame: Send + Sync {
    /// Capture time in milliseconds.
    fn timestamp(&self) -> f64;

    /// Whether the frame was synthesized between two real captures.
    fn is_interpolated(&self) -> bool;

    /// Decode the frame's pixels.
    fn raster(&self) -> Result<Raster>;
}

/// A frame whose pixels are already decoded.
#[derive(Debug, Clone)]
pub struct InMemoryFrame {
    timestamp: f64,
    interpolated: bool,
    raster: Arc<Raster>,
}

impl InMemoryFrame {
    pub fn new(timestamp: f64, raster: Raster) -> Self {
        Self {
            timestamp,
            interpolated: false,
            raster: Arc::new(raster),
        }
    }

    /// Create a synthetic frame.
    pub fn interpolated(timestamp: f64, raster: Raster) -> Self {
        Self {
            interpolated: true,
            ..Self::new(timestamp, raster)
        }
    }
}

impl Frame for InMemoryFrame {
    fn timestamp(&self) -> f64 {
        self.timestamp
    }

    fn is_interpolated(&self) -> bool {
        self.interpolated
    }

    fn raster(&self) -> Result<Raster> {
        Ok(self.raster.as_ref().clone())
    }
}

/// Ordered frames plus the window they were captured in.
///
/// Frames are ascending by timestamp. The list may be empty; consumers check.
#[derive(Clone)]
pub struct Timeline {
    frames: Vec<Arc<dyn Frame>>,
    beginning: f64,
    completion: Option<f64>,
}

impl Timeline {
    /// Create a timeline from frames already sorted by timestamp.
    pub fn new(frames: Vec<Arc<dyn Frame>>, beginning: f64, completion: Option<f64>) -> Self {
        Self {
            frames,
            beginning,
            completion,
        }
    }

    #[inline]
    pub fn frames(&self) -> &[Arc<dyn Frame>] {
        &self.frames
    }

    /// Start of the capture window in milliseconds.
    #[inline]
    pub fn beginning(&self) -> f64 {
        self.beginning
    }

    /// Time visual progress completed, relative to `beginning`, if known.
    #[inline]
    pub fn completion(&self) -> Option<f64> {
        self.completion
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Iterate over non-interpolated frames with their index in `frames()`.
    pub fn analyzed_frames(&self) -> impl Iterator<Item = (usize, &Arc<dyn Frame>)> + '_ {
        self.frames
            .iter()
            .enumerate()
            .filter(|(_, frame)| !frame.is_interpolated())
    }
}

impl fmt::Debug for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timeline")
            .field("frames", &self.frames.len())
            .field("beginning", &self.beginning)
            .field("completion", &self.completion)
            .finish()
    }
}
