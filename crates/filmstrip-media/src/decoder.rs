//! Screenshot decoding into RGBA rasters.

use filmstrip_core::{FilmstripError, Raster, Result};
use std::path::Path;
use tracing::debug;

/// Decode an encoded image (PNG or JPEG) held in memory.
pub fn decode_bytes(data: &[u8]) -> Result<Raster> {
    let img = image::load_from_memory(data)
        .map_err(|e| FilmstripError::Decoder(format!("Failed to decode image: {}", e)))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Raster::new(width, height, rgba.into_raw())
}

/// Decode an image file from disk.
pub fn decode_file<P: AsRef<Path>>(path: P) -> Result<Raster> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|e| {
        FilmstripError::Decoder(format!("Failed to read {}: {}", path.display(), e))
    })?;
    let raster = decode_bytes(&data)?;
    debug!(
        path = %path.display(),
        width = raster.width(),
        height = raster.height(),
        "Decoded screenshot"
    );
    Ok(raster)
}
