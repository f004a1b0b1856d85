//! Profile extraction
//!
//! Averages a cropped region along each axis, once over the whole region
//! and once over a narrow strip through its middle.

use log::debug;
use std::ops::Range;

use crate::errors::{FilmError, FilmResult};
use crate::loader::Plane;

/// Half-width of the centre strip in pixels
pub const STRIP_HALF_WIDTH: usize = 2;

/// Mean profiles of a cropped region
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSet {
    /// Mean of each row (profile along y), one value per row
    pub x_sum: Vec<f64>,
    /// Mean of each column (profile along x), one value per column
    pub y_sum: Vec<f64>,
    /// Mean of each row over the centre column strip, one value per row
    pub x_slice: Vec<f64>,
    /// Mean of each column over the centre row strip, one value per column
    pub y_slice: Vec<f64>,
}

/// Strip of indices around `center`, clipped into `0..extent`
///
/// Never empty for a non-zero extent.
fn strip(center: usize, extent: usize) -> Range<usize> {
    let start = center.saturating_sub(STRIP_HALF_WIDTH).min(extent - 1);
    let end = (center + STRIP_HALF_WIDTH).min(extent).max(start + 1);
    start..end
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    sum / count as f64
}

/// Computes the summed and sliced profiles of a region
///
/// The strip for `x_slice` is taken around `rows / 2` and the strip for
/// `y_slice` around `cols / 2`, each applied to the other axis and clipped
/// into range.
pub fn extract(region: &Plane<f64>) -> FilmResult<ProfileSet> {
    let (cols, rows) = (region.width(), region.height());
    if cols == 0 || rows == 0 {
        return Err(FilmError::RegionTooSmall(format!(
            "Cropped region is {}x{}, nothing to profile", cols, rows
        )));
    }

    let cy = rows / 2;
    let cx = cols / 2;
    let column_strip = strip(cy, cols);
    let row_strip = strip(cx, rows);
    debug!("Profile strips: columns {:?}, rows {:?}", column_strip, row_strip);

    let x_sum = (0..rows)
        .map(|y| mean(region.row(y).iter().copied()))
        .collect();
    let y_sum = (0..cols)
        .map(|x| mean((0..rows).map(|y| region.get(x, y))))
        .collect();
    let x_slice = (0..rows)
        .map(|y| mean(region.row(y)[column_strip.clone()].iter().copied()))
        .collect();
    let y_slice = (0..cols)
        .map(|x| mean(row_strip.clone().map(|y| region.get(x, y))))
        .collect();

    Ok(ProfileSet { x_sum, y_sum, x_slice, y_slice })
}
