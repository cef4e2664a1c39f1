//! Filmstrip Core - Foundation types for the thumbnail pipeline
//!
//! This crate provides the fundamental types shared by every Filmstrip crate:
//! - RGBA8 rasters
//! - Error taxonomy (local and upstream timeline failures)
//! - Build configuration and execution mode

pub mod config;
pub mod error;
pub mod raster;

pub use config::{FilmstripConfig, GatherMode};
pub use error::{FilmstripError, Result, TimelineError, TimelineErrorCode};
pub use raster::{Raster, CHANNELS};

/// Fixed parameters of a filmstrip build.
pub mod defaults {
    /// Number of evenly spaced buckets in a filmstrip.
    pub const NUMBER_OF_THUMBNAILS: usize = 10;

    /// Width in pixels of every thumbnail.
    pub const THUMBNAIL_WIDTH: u32 = 120;

    /// JPEG quality used for every encoded payload (0-100).
    pub const JPEG_QUALITY: u8 = 90;

    /// Floor applied to the computed timeline end, in milliseconds.
    pub const MINIMUM_TIMELINE_DURATION_MS: f64 = 3000.0;
}
