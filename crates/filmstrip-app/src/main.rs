//! Filmstrip - screenshot thumbnail audits
//!
//! Runs a report audit against a trace manifest and prints the product as JSON.

use anyhow::{Context, Result};
use clap::Parser;
use filmstrip_audit::{Artifacts, AuditContext, AuditRegistry};
use filmstrip_core::{FilmstripConfig, GatherMode};
use filmstrip_timeline::{ManifestTimelineSource, MemoizedTimelineSource};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "filmstrip", version, about = "Build screenshot filmstrips from trace manifests")]
struct Cli {
    /// Trace manifest to audit.
    #[arg(long, required_unless_present = "list")]
    manifest: Option<PathBuf>,

    /// Gather mode of the run (navigation or timespan).
    #[arg(long, default_value = "navigation")]
    mode: GatherMode,

    /// Audit to run.
    #[arg(long, default_value = "screenshot-thumbnails")]
    audit: String,

    /// Override the minimum timeline duration, in milliseconds.
    #[arg(long, value_name = "MS")]
    minimum_duration: Option<f64>,

    /// JSON configuration file.
    #[arg(long, value_name = "JSON")]
    config: Option<PathBuf>,

    /// Write the product here instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,

    /// List registered audits and exit.
    #[arg(long)]
    list: bool,
}

impl Cli {
    fn load_config(&self) -> Result<FilmstripConfig> {
        let mut config = match &self.config {
            Some(path) => FilmstripConfig::load_from_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => FilmstripConfig::default(),
        };
        if let Some(ms) = self.minimum_duration {
            config.minimum_timeline_duration_ms = ms;
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let registry = AuditRegistry::with_defaults();

    if cli.list {
        println!("{}", serde_json::to_string_pretty(&registry.metas())?);
        return Ok(());
    }

    let manifest = cli
        .manifest
        .as_ref()
        .context("--manifest is required")?
        .to_string_lossy()
        .into_owned();
    let config = cli.load_config()?;

    info!(audit = %cli.audit, manifest = %manifest, mode = %cli.mode, "Filmstrip starting...");

    let source = MemoizedTimelineSource::new(ManifestTimelineSource::new("."));
    let context = AuditContext::new(cli.mode, &source).with_config(config);
    let product = registry
        .run(&cli.audit, &Artifacts::new(manifest), &context)
        .await
        .with_context(|| format!("audit '{}' failed", cli.audit))?;

    let json = serde_json::to_string_pretty(&product)?;
    match &cli.output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "Product written");
        }
        None => println!("{}", json),
    }

    Ok(())
}
