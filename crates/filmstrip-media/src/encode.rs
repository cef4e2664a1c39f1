//! Raster compression and data URI packaging.

use base64::Engine;
use filmstrip_core::{FilmstripError, Raster, Result};
use image::codecs::jpeg;
use image::RgbImage;
use std::io::Cursor;

/// Media type of every payload produced by [`JpegEncoder`].
pub const JPEG_MEDIA_TYPE: &str = "image/jpeg";

/// Compresses a raster into a compact byte payload.
pub trait ThumbnailEncoder: Send + Sync {
    /// Media type written into the data URI.
    fn media_type(&self) -> &'static str;

    /// Encode `raster` at the given quality (0-100).
    fn encode(&self, raster: &Raster, quality: u8) -> Result<Vec<u8>>;
}

/// Baseline JPEG encoder backed by the `image` crate. Alpha is discarded.
#[derive(Debug, Clone, Copy, Default)]
pub struct JpegEncoder;

impl ThumbnailEncoder for JpegEncoder {
    fn media_type(&self) -> &'static str {
        JPEG_MEDIA_TYPE
    }

    fn encode(&self, raster: &Raster, quality: u8) -> Result<Vec<u8>> {
        if raster.width() == 0 || raster.height() == 0 {
            return Err(FilmstripError::Encoder(format!(
                "cannot encode empty {}x{} raster as JPEG",
                raster.width(),
                raster.height()
            )));
        }

        let rgb: Vec<u8> = raster
            .pixels()
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect();
        let img = RgbImage::from_raw(raster.width(), raster.height(), rgb).ok_or_else(|| {
            FilmstripError::Encoder("RGB buffer does not match raster dimensions".to_string())
        })?;

        let mut buffer = Vec::new();
        let encoder = jpeg::JpegEncoder::new_with_quality(Cursor::new(&mut buffer), quality);
        img.write_with_encoder(encoder)
            .map_err(|e| FilmstripError::Encoder(format!("JPEG encoding failed: {}", e)))?;

        Ok(buffer)
    }
}

/// Wrap encoded bytes as `data:<media_type>;base64,<payload>`.
pub fn to_data_uri(media_type: &str, bytes: &[u8]) -> String {
    let payload = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{};base64,{}", media_type, payload)
}

/// Encode a raster and wrap the result as a data URI.
pub fn encode_data_uri(
    encoder: &dyn ThumbnailEncoder,
    raster: &Raster,
    quality: u8,
) -> Result<String> {
    let bytes = encoder.encode(raster, quality)?;
    Ok(to_data_uri(encoder.media_type(), &bytes))
}
