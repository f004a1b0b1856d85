//! Film scan metadata
//!
//! Collects what the analysis needs from the main IFD: pixel extents,
//! sample layout and the scan resolution used for the millimetre scale.

use log::{debug, warn};
use std::fmt;

use crate::errors::{FilmError, FilmResult};
use crate::io::seekable::SeekableReader;
use crate::tiff::constants::{compression, photometric, planar_config, predictor, resolution_unit, tags};
use crate::tiff::ifd::IFD;
use crate::tiff::reader::TiffReader;
use crate::utils::tag_utils;

/// Centimetres per inch, for ResolutionUnit = 3
const CM_PER_INCH: f64 = 2.54;

/// Metadata of a single film scan
#[derive(Debug, Clone, PartialEq)]
pub struct FilmMetadata {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Bits per sample (first sample; scans use the same depth for all)
    pub bits_per_sample: u16,
    /// Samples per pixel
    pub samples_per_pixel: u16,
    /// Compression code
    pub compression: u16,
    /// Photometric interpretation code
    pub photometric: u16,
    /// Planar configuration code
    pub planar_configuration: u16,
    /// Predictor code
    pub predictor: u16,
    /// Horizontal resolution in pixels per inch
    pub resolution_x: Option<f64>,
    /// Vertical resolution in pixels per inch
    pub resolution_y: Option<f64>,
    /// Scanner software, when recorded
    pub software: Option<String>,
    /// Scan date, when recorded
    pub date_time: Option<String>,
}

impl FilmMetadata {
    /// Reads the metadata of an IFD
    ///
    /// # Arguments
    /// * `tiff_reader` - Reader that parsed the IFD (knows the byte order)
    /// * `reader` - Seekable source of the same file
    /// * `ifd` - The image IFD
    pub fn from_ifd(tiff_reader: &TiffReader, reader: &mut dyn SeekableReader, ifd: &IFD) -> FilmResult<Self> {
        let (width, height) = ifd.get_dimensions().ok_or(FilmError::MissingDimensions)?;
        let (width, height) = match (u32::try_from(width), u32::try_from(height)) {
            (Ok(w), Ok(h)) => (w, h),
            _ => return Err(FilmError::UnsupportedLayout(format!(
                "{}x{} pixels exceeds the supported image size", width, height
            ))),
        };
        let samples_per_pixel = match u16::try_from(ifd.get_samples_per_pixel()) {
            Ok(0) | Err(_) => return Err(FilmError::UnsupportedLayout(format!(
                "SamplesPerPixel of {}", ifd.get_samples_per_pixel()
            ))),
            Ok(n) => n,
        };

        let bits_per_sample = if ifd.has_tag(tags::BITS_PER_SAMPLE) {
            tiff_reader.read_tag_values(reader, ifd, tags::BITS_PER_SAMPLE)?
                .first()
                .copied()
                .unwrap_or(1) as u16
        } else {
            1
        };

        let unit = ifd.get_tag_value(tags::RESOLUTION_UNIT)
            .map(|u| u as u16)
            .unwrap_or(resolution_unit::INCH);
        let resolution_x = tiff_reader.read_rational_tag(reader, ifd, tags::X_RESOLUTION)?
            .map(|r| to_pixels_per_inch(r, unit));
        let resolution_y = tiff_reader.read_rational_tag(reader, ifd, tags::Y_RESOLUTION)?
            .map(|r| to_pixels_per_inch(r, unit));

        // Text tags are informational only
        let software = tiff_reader.read_ascii_tag(reader, ifd, tags::SOFTWARE).unwrap_or(None);
        let date_time = tiff_reader.read_ascii_tag(reader, ifd, tags::DATE_TIME).unwrap_or(None);

        let metadata = FilmMetadata {
            width,
            height,
            bits_per_sample,
            samples_per_pixel,
            compression: ifd.get_tag_value(tags::COMPRESSION).unwrap_or(compression::NONE as u64) as u16,
            photometric: ifd.get_tag_value(tags::PHOTOMETRIC_INTERPRETATION)
                .unwrap_or(photometric::BLACK_IS_ZERO as u64) as u16,
            planar_configuration: ifd.get_tag_value(tags::PLANAR_CONFIGURATION)
                .unwrap_or(planar_config::CHUNKY as u64) as u16,
            predictor: ifd.get_tag_value(tags::PREDICTOR).unwrap_or(predictor::NONE as u64) as u16,
            resolution_x,
            resolution_y,
            software,
            date_time,
        };

        debug!("Film metadata: {:?}", metadata);
        Ok(metadata)
    }

    /// Human-readable compression name
    pub fn compression_name(&self) -> &'static str {
        tag_utils::get_compression_name(self.compression as u64)
    }

    /// Human-readable photometric interpretation name
    pub fn photometric_name(&self) -> &'static str {
        tag_utils::get_photometric_name(self.photometric as u64)
    }
}

/// Converts a resolution value to pixels per inch
fn to_pixels_per_inch(value: f64, unit: u16) -> f64 {
    match unit {
        resolution_unit::CENTIMETER => value * CM_PER_INCH,
        resolution_unit::NONE => {
            warn!("ResolutionUnit is 'none'; treating {} as pixels per inch", value);
            value
        },
        _ => value,
    }
}

impl fmt::Display for FilmMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Dimensions: {}x{}", self.width, self.height)?;
        writeln!(f, "  Bits per sample: {}", self.bits_per_sample)?;
        writeln!(f, "  Samples per pixel: {}", self.samples_per_pixel)?;
        writeln!(f, "  Photometric: {} ({})", self.photometric, self.photometric_name())?;
        writeln!(f, "  Compression: {} ({})", self.compression, self.compression_name())?;
        match self.resolution_x {
            Some(dpi) => writeln!(f, "  X resolution: {:.2} dpi", dpi)?,
            None => writeln!(f, "  X resolution: not recorded")?,
        }
        if let Some(dpi) = self.resolution_y {
            writeln!(f, "  Y resolution: {:.2} dpi", dpi)?;
        }
        if let Some(software) = &self.software {
            writeln!(f, "  Software: {}", software)?;
        }
        if let Some(date_time) = &self.date_time {
            writeln!(f, "  Date/time: {}", date_time)?;
        }
        Ok(())
    }
}
