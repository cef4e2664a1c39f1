//! Nearest-neighbor downscaling of RGBA rasters.
//!
//! Point sampling only: no blending, no filtering. The scale factor is not
//! rounded, so non-integer factors may drift the aspect ratio by a pixel.

use filmstrip_core::{FilmstripError, Raster, Result, CHANNELS};

/// Height of the output raster when scaling `width`x`height` to `target_width`.
pub fn scaled_height(width: u32, height: u32, target_width: u32) -> u32 {
    let scale_factor = width as f64 / target_width as f64;
    (height as f64 / scale_factor).floor() as u32
}

/// Scale `raster` to `target_width` pixels wide, preserving aspect ratio.
///
/// Output pixel `(i, j)` is a verbatim copy of source pixel
/// `(floor(i * factor), floor(j * factor))` where `factor = width / target_width`.
pub fn scale_nearest(raster: &Raster, target_width: u32) -> Result<Raster> {
    let (width, height) = (raster.width(), raster.height());
    if width == 0 || target_width == 0 {
        return Err(FilmstripError::InvalidRaster(format!(
            "cannot scale {}x{} raster to width {}",
            width, height, target_width
        )));
    }

    let scale_factor = width as f64 / target_width as f64;
    let out_height = scaled_height(width, height, target_width);

    let mut out = Vec::with_capacity(target_width as usize * out_height as usize * CHANNELS);
    for j in 0..out_height {
        let sy = ((j as f64 * scale_factor) as u32).min(height - 1);
        let row = raster.row(sy);
        for i in 0..target_width {
            let sx = ((i as f64 * scale_factor) as usize).min(width as usize - 1);
            let start = sx * CHANNELS;
            out.extend_from_slice(&row[start..start + CHANNELS]);
        }
    }

    Raster::new(target_width, out_height, out)
}
