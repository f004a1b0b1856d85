//! Crop region resolution
//!
//! Places the requested crop rectangle inside the image. A rectangle that
//! sticks out over an edge is shifted back in rather than cut, so the
//! requested size survives whenever the image is large enough for it.

use log::{debug, info};
use std::fmt;
use std::ops::Range;

use crate::errors::{FilmError, FilmResult};
use crate::overrides::Overrides;

/// Requested crop: centre and size in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRequest {
    /// Beam centre `(x, y)`
    pub center: (f64, f64),
    pub width: f64,
    pub height: f64,
}

impl CropRequest {
    /// Full-image request around `center`
    pub fn full_image(center: (f64, f64), image_width: usize, image_height: usize) -> Self {
        CropRequest {
            center,
            width: image_width as f64,
            height: image_height as f64,
        }
    }

    /// Builds the request from the default centre plus user overrides
    ///
    /// The centre is only replaced when both coordinates were given. Width
    /// and height fall back to the image extents.
    pub fn from_overrides(default_center: (f64, f64), overrides: &Overrides,
                          image_width: usize, image_height: usize) -> Self {
        let center = match (overrides.center_x, overrides.center_y) {
            (Some(x), Some(y)) => (x as f64, y as f64),
            (Some(_), None) | (None, Some(_)) => {
                info!("Only one centre coordinate given, keeping ({}, {})",
                      default_center.0, default_center.1);
                default_center
            },
            (None, None) => default_center,
        };

        CropRequest {
            center,
            width: overrides.width.map(|w| w as f64).unwrap_or(image_width as f64),
            height: overrides.height.map(|h| h as f64).unwrap_or(image_height as f64),
        }
    }
}

/// Resolved crop rectangle, always inside the image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropBounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl CropBounds {
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Pixel columns covered, truncating both bounds
    pub fn pixel_columns(&self) -> Range<usize> {
        self.x_min as usize..self.x_max as usize
    }

    /// Pixel rows covered, truncating both bounds
    pub fn pixel_rows(&self) -> Range<usize> {
        self.y_min as usize..self.y_max as usize
    }
}

impl fmt::Display for CropBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x [{}, {}), y [{}, {})", self.x_min, self.x_max, self.y_min, self.y_max)
    }
}

/// Places one axis of the crop inside `[0, extent]`
fn clamp_axis(axis: &str, center: f64, size: f64, extent: usize) -> FilmResult<(f64, f64)> {
    if extent == 0 {
        return Err(FilmError::RegionTooSmall(format!("Image has no {} extent", axis)));
    }
    if !size.is_finite() || size <= 0.0 || !center.is_finite() {
        return Err(FilmError::RegionTooSmall(format!(
            "Requested {} size {} around {} is not usable", axis, size, center
        )));
    }

    let extent = extent as f64;
    let mut min = center - size / 2.0;
    let mut max = center + size / 2.0;

    if min < 0.0 {
        info!("{} min {} is below zero, shifting crop by {}", axis, min, -min);
        max -= min;
        min = 0.0;
    }

    if max > extent {
        let overflow = max - extent;
        info!("{} max {} exceeds image extent {}, shifting crop back by {}", axis, max, extent, overflow);
        max = extent;
        min -= overflow;
    }

    let (clamped_min, clamped_max) = (min.max(0.0), max.min(extent));
    if clamped_min != min || clamped_max != max {
        debug!("{} bounds clamped from [{}, {}] to [{}, {}]", axis, min, max, clamped_min, clamped_max);
    }

    if (clamped_max as usize) <= (clamped_min as usize) {
        return Err(FilmError::RegionTooSmall(format!(
            "{} bounds [{}, {}] cover no whole pixel", axis, clamped_min, clamped_max
        )));
    }

    Ok((clamped_min, clamped_max))
}

/// Resolves a crop request against the image extents
///
/// Per axis the rectangle is shifted right when it starts before zero, then
/// shifted left when it ends past the edge, then clamped to `[0, extent]`.
pub fn resolve(image_width: usize, image_height: usize, request: &CropRequest) -> FilmResult<CropBounds> {
    let (x_min, x_max) = clamp_axis("x", request.center.0, request.width, image_width)?;
    let (y_min, y_max) = clamp_axis("y", request.center.1, request.height, image_height)?;

    let bounds = CropBounds { x_min, x_max, y_min, y_max };
    info!("Crop bounds: {}", bounds);
    Ok(bounds)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(cx: f64, cy: f64, w: f64, h: f64) -> CropRequest {
        CropRequest { center: (cx, cy), width: w, height: h }
    }

    #[test]
    fn full_image_request_keeps_the_whole_scan() {
        let bounds = resolve(2000, 3000, &request(877.0, 1460.0, 2000.0, 3000.0)).unwrap();
        assert_eq!(bounds, CropBounds { x_min: 0.0, x_max: 2000.0, y_min: 0.0, y_max: 3000.0 });
    }

    #[test]
    fn crop_near_the_origin_shifts_right() {
        let bounds = resolve(100, 100, &request(10.0, 10.0, 40.0, 40.0)).unwrap();
        assert_eq!(bounds, CropBounds { x_min: 0.0, x_max: 40.0, y_min: 0.0, y_max: 40.0 });
    }

    #[test]
    fn oversized_crop_collapses_to_the_image() {
        let bounds = resolve(50, 50, &request(25.0, 25.0, 200.0, 200.0)).unwrap();
        assert_eq!(bounds, CropBounds { x_min: 0.0, x_max: 50.0, y_min: 0.0, y_max: 50.0 });
    }

    #[test]
    fn crop_past_the_far_edge_shifts_left_keeping_size() {
        let bounds = resolve(100, 80, &request(95.0, 70.0, 30.0, 20.0)).unwrap();
        assert_eq!((bounds.x_min, bounds.x_max), (70.0, 100.0));
        assert_eq!((bounds.y_min, bounds.y_max), (60.0, 80.0));
    }

    #[test]
    fn oversized_off_centre_crop_stays_inside() {
        // Without the closing clamp x_min would end up at -60
        let bounds = resolve(100, 100, &request(90.0, 10.0, 160.0, 160.0)).unwrap();
        assert_eq!((bounds.x_min, bounds.x_max), (0.0, 100.0));
        assert_eq!((bounds.y_min, bounds.y_max), (0.0, 100.0));
    }

    #[test]
    fn centre_outside_the_image_is_pulled_back_in() {
        let bounds = resolve(100, 100, &request(5000.0, -500.0, 40.0, 40.0)).unwrap();
        assert_eq!((bounds.x_min, bounds.x_max), (60.0, 100.0));
        assert_eq!((bounds.y_min, bounds.y_max), (0.0, 40.0));
    }

    #[test]
    fn bounds_stay_ordered_and_inside_for_a_grid_of_requests() {
        let (w, h) = (37usize, 23usize);
        for cx in [-50.0, 0.0, 3.5, 18.0, 36.9, 90.0] {
            for size in [1.0, 4.0, 22.5, 37.0, 100.0] {
                let bounds = resolve(w, h, &request(cx, cx, size, size)).unwrap();
                assert!(0.0 <= bounds.x_min && bounds.x_min < bounds.x_max && bounds.x_max <= w as f64);
                assert!(0.0 <= bounds.y_min && bounds.y_min < bounds.y_max && bounds.y_max <= h as f64);

                if size <= w as f64 {
                    assert!((bounds.width() - size).abs() < 1e-9, "size {} at {}", size, cx);
                } else {
                    assert_eq!((bounds.x_min, bounds.x_max), (0.0, w as f64));
                }
            }
        }
    }

    #[test]
    fn degenerate_requests_are_too_small() {
        assert!(matches!(resolve(0, 10, &request(0.0, 5.0, 4.0, 4.0)), Err(FilmError::RegionTooSmall(_))));
        assert!(matches!(resolve(10, 10, &request(5.0, 5.0, 0.0, 4.0)), Err(FilmError::RegionTooSmall(_))));
        assert!(matches!(resolve(10, 10, &request(5.0, 5.0, 4.0, -3.0)), Err(FilmError::RegionTooSmall(_))));
        // Half a pixel wide, inside a single pixel
        assert!(matches!(resolve(10, 10, &request(5.5, 5.0, 0.5, 4.0)), Err(FilmError::RegionTooSmall(_))));
    }

    #[test]
    fn pixel_ranges_truncate_fractional_bounds() {
        let bounds = resolve(100, 100, &request(50.5, 50.0, 11.0, 10.0)).unwrap();
        assert_eq!(bounds.pixel_columns(), 45..56);
        assert_eq!(bounds.pixel_rows(), 45..55);
    }

    #[test]
    fn centre_override_needs_both_coordinates() {
        let partial = Overrides { center_x: Some(10), center_y: None, width: Some(40), height: None };
        let req = CropRequest::from_overrides((877.0, 1460.0), &partial, 2000, 3000);
        assert_eq!(req.center, (877.0, 1460.0));
        assert_eq!((req.width, req.height), (40.0, 3000.0));

        let full = Overrides { center_x: Some(10), center_y: Some(20), width: None, height: None };
        let req = CropRequest::from_overrides((877.0, 1460.0), &full, 2000, 3000);
        assert_eq!(req, request(10.0, 20.0, 2000.0, 3000.0));
    }
}
