//! Integration tests for the filmstrip build.
//!
//! Exercises real JPEG encoding from filmstrip-media through the audits in
//! filmstrip-audit, fed by in-memory timelines.

use base64::Engine;
use filmstrip_audit::{
    Artifacts, AuditContext, AuditDetails, AuditProduct, AuditRegistry, FilmstripBuilder,
};
use filmstrip_core::{
    FilmstripConfig, FilmstripError, GatherMode, Raster, Result, TimelineError,
    TimelineErrorCode,
};
use filmstrip_media::{JpegEncoder, ThumbnailEncoder};
use filmstrip_timeline::{Frame, InMemoryFrame, InMemoryTimelineSource, Timeline};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// ── Helpers ────────────────────────────────────────────────────

fn frame(ts: f64, shade: u8) -> Arc<dyn Frame> {
    Arc::new(InMemoryFrame::new(ts, Raster::solid(1200, 800, [shade, 64, 128, 255])))
}

fn synthetic(ts: f64) -> Arc<dyn Frame> {
    Arc::new(InMemoryFrame::interpolated(ts, Raster::solid(1200, 800, [0, 0, 0, 255])))
}

/// Raster access fails, so any attempt to scale is observable.
struct PoisonedFrame {
    timestamp: f64,
    reads: Arc<AtomicUsize>,
}

impl Frame for PoisonedFrame {
    fn timestamp(&self) -> f64 {
        self.timestamp
    }

    fn is_interpolated(&self) -> bool {
        true
    }

    fn raster(&self) -> Result<Raster> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Err(FilmstripError::Decoder("frame should not be decoded".into()))
    }
}

/// JPEG encoder that counts calls.
#[derive(Default)]
struct CountingJpeg {
    calls: AtomicUsize,
}

impl ThumbnailEncoder for CountingJpeg {
    fn media_type(&self) -> &'static str {
        JpegEncoder.media_type()
    }

    fn encode(&self, raster: &Raster, quality: u8) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        JpegEncoder.encode(raster, quality)
    }
}

fn decode_payload(uri: &str) -> image::DynamicImage {
    let payload = uri
        .strip_prefix("data:image/jpeg;base64,")
        .expect("jpeg data uri");
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .unwrap();
    image::load_from_memory(&bytes).unwrap()
}

fn page_load() -> Timeline {
    Timeline::new(
        vec![
            frame(1000.0, 0),
            frame(1400.0, 40),
            synthetic(1500.0),
            frame(2600.0, 80),
            frame(5200.0, 120),
        ],
        1000.0,
        None,
    )
}

// ── Build shape ────────────────────────────────────────────────

#[test]
fn ten_thumbnails_with_ascending_timing() {
    let result = FilmstripBuilder::with_config(FilmstripConfig::default())
        .build(&page_load())
        .unwrap();

    assert_eq!(result.thumbnails.len(), 10);
    assert!(result
        .thumbnails
        .windows(2)
        .all(|w| w[0].timing_ms < w[1].timing_ms));
    // Latest analyzed frame sits 4200ms after the beginning
    assert_eq!(result.scale_ms, 4200.0);
    assert_eq!(result.thumbnails[9].timing_ms, 4200);
    assert_eq!(result.thumbnails[9].timestamp_micros, 5_200_000.0);
}

#[test]
fn thumbnails_are_120_wide_jpegs() {
    let result = FilmstripBuilder::with_config(FilmstripConfig::default())
        .build(&page_load())
        .unwrap();

    for thumb in &result.thumbnails {
        let img = decode_payload(&thumb.payload);
        assert_eq!((img.width(), img.height()), (120, 80));
    }
}

#[test]
fn last_thumbnail_uses_last_analyzed_frame() {
    let timeline = Timeline::new(
        vec![frame(0.0, 10), frame(200.0, 20), frame(12_000.0, 250)],
        0.0,
        Some(3000.0),
    );
    let result = FilmstripBuilder::with_config(FilmstripConfig::default())
        .build(&timeline)
        .unwrap();

    let before_last = decode_payload(&result.thumbnails[8].payload).to_rgb8();
    let last = decode_payload(&result.thumbnails[9].payload).to_rgb8();
    // JPEG is lossy; compare the red channel coarsely
    assert!(before_last.get_pixel(60, 40)[0] < 40);
    assert!(last.get_pixel(60, 40)[0] > 220);
}

#[test]
fn shared_frames_encode_once_per_build() {
    let encoder = Arc::new(CountingJpeg::default());
    let builder = FilmstripBuilder::new(encoder.clone(), FilmstripConfig::default());

    // Buckets settle on the frames at 1400, 2600 and 5200
    builder.build(&page_load()).unwrap();
    assert_eq!(encoder.calls.load(Ordering::SeqCst), 3);

    // A second build starts with an empty cache
    builder.build(&page_load()).unwrap();
    assert_eq!(encoder.calls.load(Ordering::SeqCst), 6);
}

#[test]
fn sequential_and_parallel_builds_agree() {
    let parallel = FilmstripBuilder::with_config(FilmstripConfig::default())
        .build(&page_load())
        .unwrap();
    let sequential = FilmstripBuilder::with_config(FilmstripConfig {
        parallel_encode: false,
        ..FilmstripConfig::default()
    })
    .build(&page_load())
    .unwrap();
    assert_eq!(parallel, sequential);
}

#[test]
fn all_interpolated_fails_before_scaling() {
    let reads = Arc::new(AtomicUsize::new(0));
    let frames: Vec<Arc<dyn Frame>> = (0..5)
        .map(|i| {
            Arc::new(PoisonedFrame {
                timestamp: i as f64 * 100.0,
                reads: reads.clone(),
            }) as Arc<dyn Frame>
        })
        .collect();

    let err = FilmstripBuilder::with_config(FilmstripConfig::default())
        .build(&Timeline::new(frames, 0.0, None))
        .unwrap_err();
    assert!(matches!(err, FilmstripError::InvalidTimeline(_)));
    assert_eq!(reads.load(Ordering::SeqCst), 0);
}

// ── Audits through the registry ────────────────────────────────

fn source() -> InMemoryTimelineSource {
    let mut source = InMemoryTimelineSource::new();
    source.insert("load", page_load());
    source.insert_error(
        "no-screenshots",
        TimelineError::new(TimelineErrorCode::NoScreenshots, "trace has no screenshots"),
    );
    source.insert_error(
        "bad-speedline",
        TimelineError::new(TimelineErrorCode::InvalidSpeedline, "speedline failed"),
    );
    source
}

async fn run(id: &str, trace: &str, mode: GatherMode) -> Result<AuditProduct> {
    let source = source();
    let context = AuditContext::new(mode, &source);
    AuditRegistry::with_defaults()
        .run(id, &Artifacts::new(trace), &context)
        .await
}

#[tokio::test]
async fn thumbnails_product_matches_report_contract() {
    let product = run("screenshot-thumbnails", "load", GatherMode::Navigation)
        .await
        .unwrap();
    let value = serde_json::to_value(&product).unwrap();

    assert_eq!(value["score"], 1.0);
    assert!(value.get("notApplicable").is_none());
    assert_eq!(value["details"]["type"], "filmstrip");
    assert_eq!(value["details"]["scale"], 4200.0);

    let items = value["details"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 10);
    assert_eq!(items[0]["timing"], 420);
    assert_eq!(items[0]["timestamp"], 1_420_000.0);
    assert!(items[0]["data"]
        .as_str()
        .unwrap()
        .starts_with("data:image/jpeg;base64,"));
}

#[tokio::test]
async fn no_screenshots_degrades_only_in_timespan() {
    let product = run("screenshot-thumbnails", "no-screenshots", GatherMode::Timespan)
        .await
        .unwrap();
    assert_eq!(
        serde_json::to_value(&product).unwrap(),
        serde_json::json!({ "score": 1.0, "notApplicable": true })
    );

    let err = run("screenshot-thumbnails", "no-screenshots", GatherMode::Navigation)
        .await
        .unwrap_err();
    match err {
        FilmstripError::Timeline(inner) => {
            assert_eq!(inner.code, TimelineErrorCode::NoScreenshots);
            assert_eq!(inner.message, "trace has no screenshots");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn unrelated_upstream_errors_stay_fatal() {
    for mode in [GatherMode::Navigation, GatherMode::Timespan] {
        for id in ["screenshot-thumbnails", "final-screenshot"] {
            let err = run(id, "bad-speedline", mode).await.unwrap_err();
            assert!(matches!(
                err,
                FilmstripError::Timeline(TimelineError {
                    code: TimelineErrorCode::InvalidSpeedline,
                    ..
                })
            ));
        }
    }
}

#[tokio::test]
async fn final_screenshot_is_full_size() {
    let product = run("final-screenshot", "load", GatherMode::Navigation)
        .await
        .unwrap();
    match product.details {
        Some(AuditDetails::Screenshot {
            timing,
            timestamp,
            data,
        }) => {
            assert_eq!(timing, 4200);
            assert_eq!(timestamp, 5_200_000.0);
            let img = decode_payload(&data);
            assert_eq!((img.width(), img.height()), (1200, 800));
        }
        other => panic!("unexpected details: {other:?}"),
    }
}
