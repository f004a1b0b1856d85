//! Raster previews
//!
//! PNG output through the `image` crate: the colour-mapped crop with its
//! centre crosshair, and an 8-bit overview of the whole scan.

use image::{Rgb, RgbImage};
use std::path::Path;

use crate::analysis::{CropBounds, ProfileAnalysis};
use crate::config::RenderConfig;
use crate::errors::FilmResult;
use crate::loader::Plane;

use super::{gradient, Normalizer};

/// Half length of the centre marker on the overview, in pixels
const MARKER_HALF: i64 = 15;

/// Colour-maps the cropped region and draws the centre crosshair
pub fn region_image(analysis: &ProfileAnalysis, config: &RenderConfig) -> FilmResult<RgbImage> {
    let gradient = gradient(&config.colormap)?;
    let region = &analysis.region;
    let (lo, hi) = region.min_max().unwrap_or((0.0, 0.0));
    let normalizer = Normalizer::new(lo, hi);

    let mut img = RgbImage::from_fn(region.width() as u32, region.height() as u32, |x, y| {
        let colour = gradient.eval_continuous(normalizer.normalize(region.get(x as usize, y as usize)));
        Rgb([colour.r, colour.g, colour.b])
    });

    let (cx, cy) = (region.width() as u32 / 2, region.height() as u32 / 2);
    let crosshair = Rgb(config.crosshair);
    for x in 0..img.width() {
        img.put_pixel(x, cy, crosshair);
    }
    for y in 0..img.height() {
        img.put_pixel(cx, y, crosshair);
    }

    Ok(img)
}

/// Writes [`region_image`] as PNG
pub fn write_region_png(analysis: &ProfileAnalysis, config: &RenderConfig, path: &Path) -> FilmResult<()> {
    region_image(analysis, config)?.save(path)?;
    Ok(())
}

/// Reduces a sample to 8 bits, dividing 16-bit data by 256
fn to_eight_bit(value: u16, bits_per_sample: u16) -> u8 {
    if bits_per_sample > 8 {
        (value >> 8) as u8
    } else {
        value.min(255) as u8
    }
}

fn put_if_inside(img: &mut RgbImage, x: i64, y: i64, colour: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, colour);
    }
}

/// Greyscale overview of a channel with the beam centre marked
///
/// When `bounds` is given the crop rectangle is outlined as well.
pub fn overview_image(plane: &Plane<u16>, bits_per_sample: u16, center: (f64, f64),
                      bounds: Option<&CropBounds>, marker: [u8; 3]) -> RgbImage {
    let mut img = RgbImage::from_fn(plane.width() as u32, plane.height() as u32, |x, y| {
        let v = to_eight_bit(plane.get(x as usize, y as usize), bits_per_sample);
        Rgb([v, v, v])
    });
    let colour = Rgb(marker);

    let (cx, cy) = (center.0.round() as i64, center.1.round() as i64);
    for d in -MARKER_HALF..=MARKER_HALF {
        put_if_inside(&mut img, cx + d, cy, colour);
        put_if_inside(&mut img, cx, cy + d, colour);
    }

    if let Some(bounds) = bounds {
        let columns = bounds.pixel_columns();
        let rows = bounds.pixel_rows();
        let (x0, x1) = (columns.start as i64, columns.end as i64 - 1);
        let (y0, y1) = (rows.start as i64, rows.end as i64 - 1);
        for x in x0..=x1 {
            put_if_inside(&mut img, x, y0, colour);
            put_if_inside(&mut img, x, y1, colour);
        }
        for y in y0..=y1 {
            put_if_inside(&mut img, x0, y, colour);
            put_if_inside(&mut img, x1, y, colour);
        }
    }

    img
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{CoordinateConverter, ProfileSet};
    use crate::config::FilmConfig;
    use crate::loader::Channel;

    fn analysis(region: Plane<f64>) -> ProfileAnalysis {
        ProfileAnalysis {
            bounds: CropBounds { x_min: 0.0, x_max: region.width() as f64, y_min: 0.0, y_max: region.height() as f64 },
            profiles: ProfileSet { x_sum: vec![], y_sum: vec![], x_slice: vec![], y_slice: vec![] },
            region,
            scale: CoordinateConverter::from_resolution(Some(72.0)).unwrap(),
            channel: Channel::Red,
        }
    }

    #[test]
    fn region_preview_marks_the_centre() {
        let config = FilmConfig::default().render;
        let img = region_image(&analysis(Plane::from_fn(6, 4, |x, _| x as f64)), &config).unwrap();

        assert_eq!(img.dimensions(), (6, 4));
        assert_eq!(img.get_pixel(0, 2), &Rgb([255, 0, 0]));
        assert_eq!(img.get_pixel(3, 0), &Rgb([255, 0, 0]));
        // Low and high ends of the gradient differ
        assert_ne!(img.get_pixel(0, 0), img.get_pixel(5, 0));
    }

    #[test]
    fn sixteen_bit_overview_is_divided_by_256() {
        assert_eq!(to_eight_bit(65535, 16), 255);
        assert_eq!(to_eight_bit(512, 16), 2);
        assert_eq!(to_eight_bit(200, 8), 200);
    }

    #[test]
    fn overview_outlines_the_crop() {
        let plane = Plane::filled(40, 30, 0u16);
        let bounds = CropBounds { x_min: 5.0, x_max: 15.0, y_min: 10.0, y_max: 20.0 };
        let img = overview_image(&plane, 16, (100.0, 100.0), Some(&bounds), [0, 255, 0]);

        assert_eq!(img.get_pixel(5, 12), &Rgb([0, 255, 0]));
        assert_eq!(img.get_pixel(14, 19), &Rgb([0, 255, 0]));
        assert_eq!(img.get_pixel(10, 15), &Rgb([0, 0, 0]));
    }
}
