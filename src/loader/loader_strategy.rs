//! Pixel decoding strategies
//!
//! The native strip decoder covers what flatbed scanners normally write.
//! Everything else (tiles, LZW, PackBits, JPEG) goes through the `image`
//! crate's TIFF decoder.

use log::info;

use crate::compression::CompressionFactory;
use crate::errors::FilmResult;
use crate::io::seekable::SeekableReader;
use crate::tiff::ifd::IFD;
use crate::tiff::metadata::FilmMetadata;
use crate::tiff::reader::TiffReader;

use super::decoder_strategy::DecoderStrategy;
use super::plane::Plane;
use super::strip_strategy::StripStrategy;

/// Strategy for decoding the pixel data of one IFD into planes
pub trait LoaderStrategy {
    /// Short name used in log output
    fn name(&self) -> &'static str;

    /// Whether this strategy can decode the given IFD
    fn supports(&self, ifd: &IFD, metadata: &FilmMetadata) -> bool;

    /// Decodes the IFD into one plane per colour sample
    ///
    /// # Arguments
    /// * `tiff_reader` - Reader that parsed the IFD
    /// * `reader` - Seekable source of the same file
    /// * `ifd` - Image IFD to decode
    /// * `metadata` - Metadata read from that IFD
    fn load_planes(&self, tiff_reader: &TiffReader, reader: &mut dyn SeekableReader,
                   ifd: &IFD, metadata: &FilmMetadata) -> FilmResult<Vec<Plane<u16>>>;
}

/// Picks the decoding strategy for an IFD
pub struct LoaderStrategyFactory;

impl LoaderStrategyFactory {
    /// Returns the native strip strategy when it supports the layout,
    /// otherwise the `image` crate decoder
    pub fn create_strategy(ifd: &IFD, metadata: &FilmMetadata) -> Box<dyn LoaderStrategy> {
        let strip = StripStrategy;
        if strip.supports(ifd, metadata) {
            return Box::new(strip);
        }

        info!("Layout not handled natively (compression {}, tiled: {}), using image decoder",
              metadata.compression_name(), ifd.is_tiled());
        Box::new(DecoderStrategy)
    }
}

/// Whether the strip decoder understands a compression code
pub(crate) fn native_compression(code: u16) -> bool {
    CompressionFactory::is_supported(code as u64)
}

/// Number of planes kept for a pixel layout
///
/// Colour scans keep R, G and B; alpha and extra samples are dropped.
pub(crate) fn colour_planes(samples_per_pixel: usize) -> usize {
    if samples_per_pixel >= 3 { 3 } else { 1 }
}
