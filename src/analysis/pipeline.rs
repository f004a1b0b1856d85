//! Profile analysis pipeline
//!
//! scale -> crop bounds -> cropped region -> profiles, failing on the first
//! error so that no partial analysis reaches the renderers.

use log::info;

use crate::errors::FilmResult;
use crate::loader::{Channel, FilmImage, Plane};

use super::profile::{self, ProfileSet};
use super::region::{self, CropBounds, CropRequest};
use super::scale::CoordinateConverter;

/// Everything the renderers need from one analysis run
#[derive(Debug, Clone)]
pub struct ProfileAnalysis {
    pub bounds: CropBounds,
    /// Copy of the cropped samples of the analysed channel
    pub region: Plane<f64>,
    pub profiles: ProfileSet,
    pub scale: CoordinateConverter,
    pub channel: Channel,
}

impl ProfileAnalysis {
    /// Physical positions of the region's columns (axis of `y_sum`/`y_slice`)
    pub fn column_axis_mm(&self) -> Vec<f64> {
        self.scale.axis(self.region.width())
    }

    /// Physical positions of the region's rows (axis of `x_sum`/`x_slice`)
    pub fn row_axis_mm(&self) -> Vec<f64> {
        self.scale.axis(self.region.height())
    }

    /// Physical size of the region, from the first to the last pixel
    pub fn extent_mm(&self) -> (f64, f64) {
        let last = |n: usize| n.saturating_sub(1) as f64;
        (self.scale.to_millimetres(last(self.region.width())),
         self.scale.to_millimetres(last(self.region.height())))
    }

    /// Crosshair position in millimetres, at the region's middle pixel
    pub fn crosshair_mm(&self) -> (f64, f64) {
        (self.scale.to_millimetres((self.region.width() / 2) as f64),
         self.scale.to_millimetres((self.region.height() / 2) as f64))
    }
}

/// Runs the analysis on one channel of a film scan
pub fn run(image: &FilmImage, channel: Channel, request: &CropRequest) -> FilmResult<ProfileAnalysis> {
    let scale = CoordinateConverter::from_resolution(image.metadata.resolution_x)?;
    info!("Pixel pitch: {:.4} mm", scale.mm_per_pixel());

    let bounds = region::resolve(image.width(), image.height(), request)?;

    let plane = image.channel(channel)?;
    let region = plane
        .crop(bounds.pixel_columns(), bounds.pixel_rows())
        .map(f64::from);
    info!("Cropped {}x{} pixels from the {} channel", region.width(), region.height(), channel);

    let profiles = profile::extract(&region)?;

    Ok(ProfileAnalysis { bounds, region, profiles, scale, channel })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FilmError;
    use crate::tiff::metadata::FilmMetadata;

    fn film(width: u32, height: u32, dpi: Option<f64>) -> FilmImage {
        let metadata = FilmMetadata {
            width,
            height,
            bits_per_sample: 16,
            samples_per_pixel: 3,
            compression: 1,
            photometric: 2,
            planar_configuration: 1,
            predictor: 1,
            resolution_x: dpi,
            resolution_y: dpi,
            software: None,
            date_time: None,
        };
        let planes = (0..3u16)
            .map(|c| Plane::from_fn(width as usize, height as usize, |x, y| (x + y) as u16 + c * 1000))
            .collect();
        FilmImage::new(metadata, planes).unwrap()
    }

    #[test]
    fn full_scan_profiles_cover_every_row_and_column() {
        let image = film(200, 300, Some(72.0));
        let request = CropRequest::full_image((87.0, 146.0), 200, 300);
        let analysis = run(&image, Channel::Red, &request).unwrap();

        assert_eq!(analysis.bounds, CropBounds { x_min: 0.0, x_max: 200.0, y_min: 0.0, y_max: 300.0 });
        assert_eq!(analysis.profiles.y_sum.len(), 200);
        assert_eq!(analysis.profiles.y_slice.len(), 200);
        assert_eq!(analysis.profiles.x_sum.len(), 300);
        assert_eq!(analysis.profiles.x_slice.len(), 300);
    }

    #[test]
    fn selected_channel_feeds_the_region() {
        let image = film(20, 20, Some(127.0));
        let request = CropRequest { center: (10.0, 10.0), width: 4.0, height: 4.0 };
        let analysis = run(&image, Channel::Green, &request).unwrap();

        // Pixel (8, 8) of the green plane
        assert_eq!(analysis.region.get(0, 0), 1016.0);
        assert!((analysis.scale.mm_per_pixel() - 0.2).abs() < 1e-12);
        assert_eq!(analysis.crosshair_mm(), (analysis.scale.to_millimetres(2.0), analysis.scale.to_millimetres(2.0)));
        let (w, h) = analysis.extent_mm();
        assert!((w - 0.6).abs() < 1e-9 && (h - 0.6).abs() < 1e-9);
    }

    #[test]
    fn missing_resolution_stops_before_cropping() {
        let image = film(10, 10, None);
        let request = CropRequest::full_image((5.0, 5.0), 10, 10);
        assert!(matches!(run(&image, Channel::Red, &request), Err(FilmError::InvalidMetadata(_))));
    }

    #[test]
    fn unusable_request_is_reported() {
        let image = film(10, 10, Some(72.0));
        let request = CropRequest { center: (5.0, 5.0), width: 0.0, height: 4.0 };
        assert!(matches!(run(&image, Channel::Red, &request), Err(FilmError::RegionTooSmall(_))));
    }
}
