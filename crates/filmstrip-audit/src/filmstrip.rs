//! Filmstrip build: sample, scale, encode once per frame, assemble.

use crate::cache::EncodingCache;
use crate::sampler::{sample, SamplePlan, Selection};
use filmstrip_core::defaults::{JPEG_QUALITY, NUMBER_OF_THUMBNAILS, THUMBNAIL_WIDTH};
use filmstrip_core::{FilmstripConfig, FilmstripError, Result};
use filmstrip_media::{encode_data_uri, scale_nearest, JpegEncoder, ThumbnailEncoder};
use filmstrip_timeline::{Frame, Timeline};
use rayon::prelude::*;
use std::sync::Arc;
use tracing::{debug, info};

/// One timed thumbnail.
#[derive(Debug, Clone, PartialEq)]
pub struct Thumbnail {
    /// Bucket offset from the start of the window, rounded to whole milliseconds.
    pub timing_ms: i64,
    /// Absolute bucket time in microseconds.
    pub timestamp_micros: f64,
    /// `data:image/jpeg;base64,...` payload.
    pub payload: Arc<str>,
}

/// The finished strip.
#[derive(Debug, Clone, PartialEq)]
pub struct FilmstripResult {
    /// Length of the sampled window in milliseconds.
    pub scale_ms: f64,
    /// One thumbnail per bucket, in time order.
    pub thumbnails: Vec<Thumbnail>,
}

/// Builds filmstrips from timelines.
///
/// The encoding cache lives for a single `build` call.
pub struct FilmstripBuilder {
    encoder: Arc<dyn ThumbnailEncoder>,
    config: FilmstripConfig,
}

impl FilmstripBuilder {
    pub fn new(encoder: Arc<dyn ThumbnailEncoder>, config: FilmstripConfig) -> Self {
        Self { encoder, config }
    }

    /// Builder using the JPEG encoder.
    pub fn with_config(config: FilmstripConfig) -> Self {
        Self::new(Arc::new(JpegEncoder), config)
    }

    /// Produce the strip for `timeline`. Any failure aborts the whole build.
    pub fn build(&self, timeline: &Timeline) -> Result<FilmstripResult> {
        self.config.validate()?;

        let plan = sample(
            timeline,
            NUMBER_OF_THUMBNAILS,
            self.config.minimum_timeline_duration_ms,
        )?;

        let cache = EncodingCache::new();
        let encode_selection = |selection: &Selection| -> Result<Arc<str>> {
            let frame = timeline.frames().get(selection.frame_index).ok_or_else(|| {
                FilmstripError::Internal(format!(
                    "selected frame {} is outside the timeline",
                    selection.frame_index
                ))
            })?;
            cache.get_or_encode(selection.frame_index, || {
                debug!(frame = selection.frame_index, "Encoding thumbnail");
                self.encode_frame(frame.as_ref())
            })
        };

        let payloads: Vec<Arc<str>> = if self.config.parallel_encode {
            plan.selections
                .par_iter()
                .map(encode_selection)
                .collect::<Result<_>>()?
        } else {
            plan.selections
                .iter()
                .map(encode_selection)
                .collect::<Result<_>>()?
        };

        info!(
            thumbnails = payloads.len(),
            encoded_frames = cache.len(),
            scale_ms = plan.timeline_end,
            "Filmstrip built"
        );

        Ok(assemble(&plan, payloads))
    }

    fn encode_frame(&self, frame: &dyn Frame) -> Result<String> {
        let raster = frame.raster()?;
        let thumbnail = scale_nearest(&raster, THUMBNAIL_WIDTH)?;
        encode_data_uri(self.encoder.as_ref(), &thumbnail, JPEG_QUALITY)
    }
}

/// Zip bucket timings with their payloads, in bucket order.
pub fn assemble(plan: &SamplePlan, payloads: Vec<Arc<str>>) -> FilmstripResult {
    let thumbnails = plan
        .selections
        .iter()
        .zip(payloads)
        .map(|(selection, payload)| {
            let target = selection.bucket.target_timestamp;
            Thumbnail {
                timing_ms: (target - plan.beginning).round() as i64,
                timestamp_micros: target * 1000.0,
                payload,
            }
        })
        .collect();

    FilmstripResult {
        scale_ms: plan.timeline_end,
        thumbnails,
    }
}
