//! Filmstrip Media - image I/O for the thumbnail pipeline
//!
//! This crate handles:
//! - Nearest-neighbor downscaling to thumbnail width
//! - JPEG encoding and data URI packaging
//! - Screenshot decoding from PNG/JPEG files

pub mod decoder;
pub mod encode;
pub mod scale;

pub use decoder::{decode_bytes, decode_file};
pub use encode::{encode_data_uri, to_data_uri, JpegEncoder, ThumbnailEncoder, JPEG_MEDIA_TYPE};
pub use scale::{scale_nearest, scaled_height};
