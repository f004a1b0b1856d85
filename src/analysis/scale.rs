//! Pixel to millimetre conversion

use crate::errors::{FilmError, FilmResult};

/// Millimetres per inch
pub const MM_PER_INCH: f64 = 25.4;

/// Millimetres per pixel for a scan resolution in pixels per inch
///
/// Fails with [`FilmError::InvalidMetadata`] when the resolution is not a
/// positive finite number.
pub fn scale_factor(resolution_x: f64) -> FilmResult<f64> {
    if !resolution_x.is_finite() || resolution_x <= 0.0 {
        return Err(FilmError::InvalidMetadata(format!(
            "X resolution must be positive, got {}", resolution_x
        )));
    }

    Ok(MM_PER_INCH / resolution_x)
}

/// Converts pixel positions to physical lengths
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateConverter {
    mm_per_pixel: f64,
}

impl CoordinateConverter {
    /// Builds a converter from the scan's horizontal resolution
    pub fn from_resolution(resolution_x: Option<f64>) -> FilmResult<Self> {
        let resolution = resolution_x.ok_or_else(|| {
            FilmError::InvalidMetadata("Scan has no X resolution; pass --dpi".to_string())
        })?;

        Ok(CoordinateConverter {
            mm_per_pixel: scale_factor(resolution)?,
        })
    }

    pub fn mm_per_pixel(&self) -> f64 {
        self.mm_per_pixel
    }

    pub fn to_millimetres(&self, pixels: f64) -> f64 {
        pixels * self.mm_per_pixel
    }

    /// Physical coordinates of the pixel indices `0..len`
    pub fn axis(&self, len: usize) -> Vec<f64> {
        (0..len).map(|i| self.to_millimetres(i as f64)).collect()
    }
}
