//! The `screenshot-thumbnails` audit: a filmstrip of the captured load.

use crate::audit::{Artifacts, Audit, AuditContext, AuditMeta, ScoreDisplayMode};
use crate::classify::Resolution;
use crate::filmstrip::FilmstripBuilder;
use crate::product::AuditProduct;
use filmstrip_core::Result;
use filmstrip_media::{JpegEncoder, ThumbnailEncoder};
use filmstrip_timeline::BoxFuture;
use std::sync::Arc;
use tracing::debug;

const META: AuditMeta = AuditMeta {
    id: "screenshot-thumbnails",
    title: "Screenshot Thumbnails",
    description: "This is what the load of your site looked like.",
    score_display_mode: ScoreDisplayMode::Informative,
    required_artifacts: &["traces", "GatherContext"],
};

/// Ten evenly spaced thumbnails of the page over the capture window.
pub struct ScreenshotThumbnails {
    encoder: Arc<dyn ThumbnailEncoder>,
}

impl ScreenshotThumbnails {
    pub fn new() -> Self {
        Self::with_encoder(Arc::new(JpegEncoder))
    }

    /// Use a custom encoder (the payload is still wrapped as a data URI).
    pub fn with_encoder(encoder: Arc<dyn ThumbnailEncoder>) -> Self {
        Self { encoder }
    }

    async fn compute(&self, artifacts: &Artifacts, context: &AuditContext<'_>) -> Result<AuditProduct> {
        let timeline = context.timelines.request(&artifacts.trace).await?;
        debug!(trace = %artifacts.trace, frames = timeline.len(), "Timeline acquired");

        let builder = FilmstripBuilder::new(Arc::clone(&self.encoder), context.config.clone());
        let filmstrip = builder.build(&timeline)?;
        Ok(AuditProduct::from(&filmstrip))
    }
}

impl Default for ScreenshotThumbnails {
    fn default() -> Self {
        Self::new()
    }
}

impl Audit for ScreenshotThumbnails {
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
