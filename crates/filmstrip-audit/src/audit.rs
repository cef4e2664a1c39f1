//! Audit capability interface and the registry of available audits.

use crate::final_screenshot::FinalScreenshot;
use crate::product::AuditProduct;
use crate::thumbnails::ScreenshotThumbnails;
use filmstrip_core::{FilmstripConfig, FilmstripError, GatherMode, Result};
use filmstrip_timeline::{BoxFuture, TimelineSource, TraceId};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// How the report presents an audit's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ScoreDisplayMode {
    /// Shown for information only; never pass/fail.
    Informative,
}

/// Static description of an audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditMeta {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub score_display_mode: ScoreDisplayMode,
    pub required_artifacts: &'static [&'static str],
}

/// Inputs gathered for an audit run.
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub trace: TraceId,
}

impl Artifacts {
    pub fn new(trace: impl Into<TraceId>) -> Self {
        Self {
            trace: trace.into(),
        }
    }
}

/// Caller-provided environment for an audit run.
pub struct AuditContext<'a> {
    pub gather_mode: GatherMode,
    pub config: FilmstripConfig,
    pub timelines: &'a dyn TimelineSource,
}

impl<'a> AuditContext<'a> {
    pub fn new(gather_mode: GatherMode, timelines: &'a dyn TimelineSource) -> Self {
        Self {
            gather_mode,
            config: FilmstripConfig::default(),
            timelines,
        }
    }

    pub fn with_config(mut self, config: FilmstripConfig) -> Self {
        self.config = config;
        self
    }
}

/// A report audit.
pub trait Audit: Send + Sync {
    fn meta(&self) -> &AuditMeta;

    /// Compute the audit's product. Errors that reach the caller are fatal.
    fn run<'a>(
        &'a self,
        artifacts: &'a Artifacts,
        context: &'a AuditContext<'a>,
    ) -> BoxFuture<'a, Result<AuditProduct>>;
}

/// Lookup table of audits by id.
#[derive(Default)]
pub struct AuditRegistry {
    audits: BTreeMap<&'static str, Arc<dyn Audit>>,
}

impl AuditRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in audit.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(ScreenshotThumbnails::new()));
        registry.register(Arc::new(FinalScreenshot::new()));
        registry
    }

    /// Add an audit, replacing any audit with the same id.
    pub fn register(&mut self, audit: Arc<dyn Audit>) -> Option<Arc<dyn Audit>> {
        self.audits.insert(audit.meta().id, audit)
    }

    pub fn get(&self, id: &str) -> Option<&Arc<dyn Audit>> {
        self.audits.get(id)
    }

    /// Registered ids in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.audits.keys().copied()
    }

    /// Metadata of every registered audit.
    pub fn metas(&self) -> Vec<&AuditMeta> {
        self.audits.values().map(|audit| audit.meta()).collect()
    }

    /// Run the audit registered under `id`.
    pub async fn run(
        &self,
        id: &str,
        artifacts: &Artifacts,
        context: &AuditContext<'_>,
    ) -> Result<AuditProduct> {
        let audit = self
            .get(id)
            .ok_or_else(|| FilmstripError::NotFound(format!("audit '{}'", id)))?;
        info!(audit = id, trace = %artifacts.trace, mode = %context.gather_mode, "Running audit");
        audit.run(artifacts, context).await
    }
}
