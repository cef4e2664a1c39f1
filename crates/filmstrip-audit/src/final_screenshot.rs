//! The `final-screenshot` audit: the last real frame of the load, full size.

use crate::audit::{Artifacts, Audit, AuditContext, AuditMeta, ScoreDisplayMode};
use crate::classify::Resolution;
use crate::product::{AuditDetails, AuditProduct};
use filmstrip_core::defaults::JPEG_QUALITY;
use filmstrip_core::{FilmstripError, Result};
use filmstrip_media::{encode_data_uri, JpegEncoder, ThumbnailEncoder};
use filmstrip_timeline::{BoxFuture, Timeline};
use std::sync::Arc;
use tracing::debug;

const META: AuditMeta = AuditMeta {
    id: "final-screenshot",
    title: "Final Screenshot",
    description: "The last screenshot captured of the pageload.",
    score_display_mode: ScoreDisplayMode::Informative,
    required_artifacts: &["traces", "GatherContext"],
};

pub struct FinalScreenshot {
    encoder: Arc<dyn ThumbnailEncoder>,
}

impl FinalScreenshot {
    pub fn new() -> Self {
        Self::with_encoder(Arc::new(JpegEncoder))
    }

    pub fn with_encoder(encoder: Arc<dyn ThumbnailEncoder>) -> Self {
        Self { encoder }
    }

    /// Encode the last analyzed frame without scaling.
    pub fn capture(&self, timeline: &Timeline) -> Result<AuditDetails> {
        let (index, frame) = timeline.analyzed_frames().last().ok_or_else(|| {
            FilmstripError::InvalidTimeline("timeline has no analyzed frames".to_string())
        })?;
        debug!(frame = index, timestamp = frame.timestamp(), "Capturing final screenshot");

        let raster = frame.raster()?;
        let data = encode_data_uri(self.encoder.as_ref(), &raster, JPEG_QUALITY)?;
        let timestamp = frame.timestamp();

        Ok(AuditDetails::Screenshot {
            timing: (timestamp - timeline.beginning()).round() as i64,
            timestamp: timestamp * 1000.0,
            data,
        })
    }

    async fn compute(&self, artifacts: &Artifacts, context: &AuditContext<'_>) -> Result<AuditProduct> {
        let timeline = context.timelines.request(&artifacts.trace).await?;
        let details = self.capture(&timeline)?;
        Ok(AuditProduct::informative(details))
    }
}

impl Default for FinalScreenshot {
    fn default() -> Self {
        Self::new()
    }
}

impl Audit for FinalScreenshot {
    fn meta(&self) -> &AuditMeta {
        &META
    }

    fn run<'a>(
        &'a self,
        artifacts: &'a Artifacts,
        context: &'a AuditContext<'a>,
    ) -> BoxFuture<'a, Result<AuditProduct>> {
        Box::pin(async move {
            let outcome = self.compute(artifacts, context).await;
            Resolution::classify(outcome, context.gather_mode).into_result()
        })
    }
}
