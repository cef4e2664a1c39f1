//! Filmstrip Audit - report audits built on captured timelines
//!
//! Provides:
//! - Bucket sampling with hold-last-known-frame semantics
//! - Per-build encoding cache
//! - Filmstrip assembly into the report details shape
//! - Mode-dependent classification of missing-frame failures
//! - The `screenshot-thumbnails` and `final-screenshot` audits

pub mod audit;
pub mod cache;
pub mod classify;
pub mod filmstrip;
pub mod final_screenshot;
pub mod product;
pub mod sampler;
pub mod thumbnails;

pub use audit::{Artifacts, Audit, AuditContext, AuditMeta, AuditRegistry, ScoreDisplayMode};
pub use cache::EncodingCache;
pub use classify::{is_missing_frames, Resolution, MISSING_FRAME_CODES};
pub use filmstrip::{assemble, FilmstripBuilder, FilmstripResult, Thumbnail};
pub use final_screenshot::FinalScreenshot;
pub use product::{AuditDetails, AuditProduct, FilmstripItem, NEUTRAL_SCORE};
pub use sampler::{sample, timeline_end, Bucket, SamplePlan, Selection};
pub use thumbnails::ScreenshotThumbnails;
