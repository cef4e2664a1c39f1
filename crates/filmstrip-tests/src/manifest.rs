//! End-to-end tests from trace manifests on disk.
//!
//! Writes PNG screenshots and a manifest into a temporary directory, then runs
//! the registered audits through a memoized manifest source.

use filmstrip_audit::{Artifacts, AuditContext, AuditDetails, AuditProduct, AuditRegistry};
use filmstrip_core::{FilmstripConfig, FilmstripError, GatherMode, Result, TimelineErrorCode};
use filmstrip_timeline::{
    BoxFuture, ManifestTimelineSource, MemoizedTimelineSource, TimelineResult, TimelineSource,
    TraceId, TraceManifest,
};
use image::{ImageFormat, Rgba, RgbaImage};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

// ── Helpers ────────────────────────────────────────────────────

fn write_png(dir: &Path, name: &str, width: u32, height: u32, shade: u8) {
    let img = RgbaImage::from_pixel(width, height, Rgba([shade, shade, shade, 255]));
    img.save_with_format(dir.join(name), ImageFormat::Png).unwrap();
}

/// A 600x400 trace with three real captures and one synthetic frame.
fn write_trace(dir: &Path) {
    write_png(dir, "f0.png", 600, 400, 0);
    write_png(dir, "f1.png", 600, 400, 100);
    write_png(dir, "f2.png", 600, 400, 200);
    write_png(dir, "f3.png", 600, 400, 50);

    let mut manifest = TraceManifest::new(2000.0, None);
    // Listed out of order on purpose
    manifest.push_frame(3500.0, false, "f2.png");
    manifest.push_frame(2000.0, false, "f0.png");
    manifest.push_frame(2700.0, false, "f1.png");
    manifest.push_frame(3600.0, true, "f3.png");
    manifest.save_to_file(&dir.join("manifest.json")).unwrap();
}

/// Manifest source that counts how often it actually loads.
struct CountingSource {
    inner: ManifestTimelineSource,
    loads: AtomicUsize,
}

impl CountingSource {
    fn new(root: &Path) -> Self {
        Self {
            inner: ManifestTimelineSource::new(root),
            loads: AtomicUsize::new(0),
        }
    }
}

impl TimelineSource for CountingSource {
    fn request<'a>(&'a self, trace: &'a TraceId) -> BoxFuture<'a, TimelineResult> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.inner.request(trace)
    }
}

async fn run_audit(
    source: &dyn TimelineSource,
    id: &str,
    trace: &str,
    mode: GatherMode,
) -> Result<AuditProduct> {
    let context = AuditContext::new(mode, source);
    AuditRegistry::with_defaults()
        .run(id, &Artifacts::new(trace), &context)
        .await
}

fn filmstrip_items(product: &AuditProduct) -> &[filmstrip_audit::FilmstripItem] {
    match &product.details {
        Some(AuditDetails::Filmstrip { items, .. }) => items,
        other => panic!("expected filmstrip details, got {other:?}"),
    }
}

// ── Manifest traces ────────────────────────────────────────────

#[tokio::test]
async fn filmstrip_from_manifest_on_disk() {
    let dir = TempDir::new().unwrap();
    write_trace(dir.path());
    let source = MemoizedTimelineSource::new(ManifestTimelineSource::new(dir.path()));

    let product = run_audit(&source, "screenshot-thumbnails", "manifest.json", GatherMode::Navigation)
        .await
        .unwrap();

    let items = filmstrip_items(&product);
    assert_eq!(items.len(), 10);
    assert_eq!(items[0].timing, 300);
    assert_eq!(items[9].timing, 3000);
    assert!(items
        .iter()
        .all(|item| item.data.starts_with("data:image/jpeg;base64,")));
    // Buckets holding the same capture share one payload
    assert_eq!(items[0].data, items[1].data);
    assert_ne!(items[2].data, items[9].data);
}

#[tokio::test]
async fn both_audits_share_one_manifest_load() {
    let dir = TempDir::new().unwrap();
    write_trace(dir.path());
    let source = MemoizedTimelineSource::new(CountingSource::new(dir.path()));

    let thumbs = run_audit(&source, "screenshot-thumbnails", "manifest.json", GatherMode::Navigation);
    let last = run_audit(&source, "final-screenshot", "manifest.json", GatherMode::Navigation);
    let (thumbs, last) = tokio::join!(thumbs, last);

    assert_eq!(filmstrip_items(&thumbs.unwrap()).len(), 10);
    match last.unwrap().details {
        Some(AuditDetails::Screenshot { timing, .. }) => assert_eq!(timing, 1500),
        other => panic!("expected screenshot details, got {other:?}"),
    }
    assert_eq!(source.inner().loads.load(Ordering::SeqCst), 1);

    // A third run still reuses the first load
    run_audit(&source, "final-screenshot", "manifest.json", GatherMode::Timespan)
        .await
        .unwrap();
    assert_eq!(source.inner().loads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn bare_array_manifest_is_migrated() {
    let dir = TempDir::new().unwrap();
    write_png(dir.path(), "only.png", 240, 160, 90);
    std::fs::write(
        dir.path().join("legacy.json"),
        br#"[{ "timestamp": 1200.0, "image": "only.png" }]"#,
    )
    .unwrap();
    let source = ManifestTimelineSource::new(dir.path());

    let timeline = source.request(&TraceId::from("legacy.json")).await.unwrap();
    assert_eq!(timeline.beginning(), 0.0);
    assert_eq!(timeline.completion(), None);

    let product = run_audit(&source, "screenshot-thumbnails", "legacy.json", GatherMode::Navigation)
        .await
        .unwrap();
    let items = filmstrip_items(&product);
    // Window floored at 3000ms; every bucket falls back to or holds the one capture
    assert_eq!(items[0].timing, 300);
    assert!(items.windows(2).all(|w| w[0].data == w[1].data));
}

#[tokio::test]
async fn empty_manifest_degrades_in_timespan() {
    let dir = TempDir::new().unwrap();
    TraceManifest::new(0.0, None)
        .save_to_file(&dir.path().join("empty.json"))
        .unwrap();
    let source = ManifestTimelineSource::new(dir.path());

    let product = run_audit(&source, "screenshot-thumbnails", "empty.json", GatherMode::Timespan)
        .await
        .unwrap();
    assert!(product.is_not_applicable());

    let err = run_audit(&source, "screenshot-thumbnails", "empty.json", GatherMode::Navigation)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        FilmstripError::Timeline(ref inner) if inner.code == TimelineErrorCode::NoScreenshots
    ));
}

#[tokio::test]
async fn missing_manifest_is_fatal_in_every_mode() {
    let dir = TempDir::new().unwrap();
    let source = ManifestTimelineSource::new(dir.path());

    for mode in [GatherMode::Navigation, GatherMode::Timespan] {
        let err = run_audit(&source, "screenshot-thumbnails", "absent.json", mode)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            FilmstripError::Timeline(ref inner) if inner.code == TimelineErrorCode::TraceUnreadable
        ));
    }
}

#[tokio::test]
async fn missing_image_aborts_the_build() {
    let dir = TempDir::new().unwrap();
    let mut manifest = TraceManifest::new(0.0, None);
    manifest.push_frame(0.0, false, "gone.png");
    manifest.save_to_file(&dir.path().join("manifest.json")).unwrap();
    let source = ManifestTimelineSource::new(dir.path());

    let err = run_audit(&source, "screenshot-thumbnails", "manifest.json", GatherMode::Timespan)
        .await
        .unwrap_err();
    assert!(matches!(err, FilmstripError::Decoder(_)));
}

#[tokio::test]
async fn configured_minimum_duration_widens_window() {
    let dir = TempDir::new().unwrap();
    write_trace(dir.path());
    let source = ManifestTimelineSource::new(dir.path());
    let config = FilmstripConfig {
        minimum_timeline_duration_ms: 5000.0,
        ..FilmstripConfig::default()
    };
    let context = AuditContext::new(GatherMode::Navigation, &source).with_config(config);

    let product = AuditRegistry::with_defaults()
        .run("screenshot-thumbnails", &Artifacts::new("manifest.json"), &context)
        .await
        .unwrap();
    match product.details {
        Some(AuditDetails::Filmstrip { scale, items }) => {
            assert_eq!(scale, 5000.0);
            assert_eq!(items[0].timing, 500);
        }
        other => panic!("expected filmstrip details, got {other:?}"),
    }
}
