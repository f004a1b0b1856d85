//! Fallback decoder backed by the `image` crate

use image::{DynamicImage, ImageFormat, ImageReader};
use log::{info, warn};
use std::io::{BufReader, SeekFrom};

use crate::errors::{FilmError, FilmResult};
use crate::io::seekable::SeekableReader;
use crate::tiff::ifd::IFD;
use crate::tiff::metadata::FilmMetadata;
use crate::tiff::reader::TiffReader;

use super::loader_strategy::{colour_planes, LoaderStrategy};
use super::plane::Plane;

/// Decodes the first image of the file with the `image` crate
///
/// Sample values are kept as stored: 8-bit data is widened, not rescaled.
pub struct DecoderStrategy;

/// Splits interleaved samples into `keep` planes
fn split_planes<T: Copy + Into<u16>>(samples: &[T], width: usize, height: usize,
                                     channels: usize, keep: usize) -> FilmResult<Vec<Plane<u16>>> {
    let mut planes: Vec<Vec<u16>> = (0..keep).map(|_| Vec::with_capacity(width * height)).collect();
    for pixel in samples.chunks_exact(channels) {
        for (plane, values) in planes.iter_mut().enumerate() {
            values.push(pixel[plane].into());
        }
    }

    planes.into_iter()
        .map(|data| Plane::new(width, height, data))
        .collect()
}

impl DecoderStrategy {
    fn planes_from(decoded: DynamicImage) -> FilmResult<Vec<Plane<u16>>> {
        let (width, height) = (decoded.width() as usize, decoded.height() as usize);

        match decoded {
            DynamicImage::ImageLuma8(buf) => split_planes(buf.as_raw(), width, height, 1, 1),
            DynamicImage::ImageLumaA8(buf) => split_planes(buf.as_raw(), width, height, 2, 1),
            DynamicImage::ImageLuma16(buf) => split_planes(buf.as_raw(), width, height, 1, 1),
            DynamicImage::ImageLumaA16(buf) => split_planes(buf.as_raw(), width, height, 2, 1),
            DynamicImage::ImageRgb8(buf) => split_planes(buf.as_raw(), width, height, 3, 3),
            DynamicImage::ImageRgba8(buf) => split_planes(buf.as_raw(), width, height, 4, 3),
            DynamicImage::ImageRgb16(buf) => split_planes(buf.as_raw(), width, height, 3, 3),
            DynamicImage::ImageRgba16(buf) => split_planes(buf.as_raw(), width, height, 4, 3),
            other => {
                warn!("Decoded {:?} samples, converting to 16-bit RGB", other.color());
                let rgb = other.to_rgb16();
                split_planes(rgb.as_raw(), width, height, 3, 3)
            }
        }
    }
}

impl LoaderStrategy for DecoderStrategy {
    fn name(&self) -> &'static str {
        "image crate decoder"
    }

    fn supports(&self, _ifd: &IFD, _metadata: &FilmMetadata) -> bool {
        true
    }

    fn load_planes(&self, _tiff_reader: &TiffReader, reader: &mut dyn SeekableReader,
                   _ifd: &IFD, metadata: &FilmMetadata) -> FilmResult<Vec<Plane<u16>>> {
        reader.seek(SeekFrom::Start(0))?;
        let decoded = ImageReader::with_format(BufReader::new(reader), ImageFormat::Tiff).decode()?;
        info!("Decoded {}x{} {:?} image", decoded.width(), decoded.height(), decoded.color());

        if decoded.width() != metadata.width || decoded.height() != metadata.height {
            return Err(FilmError::UnsupportedLayout(format!(
                "Decoder returned a {}x{} image for a {}x{} IFD",
                decoded.width(), decoded.height(), metadata.width, metadata.height
            )));
        }

        let planes = Self::planes_from(decoded)?;
        if planes.len() != colour_planes(metadata.samples_per_pixel as usize) {
            warn!("Decoder produced {} planes for {} samples per pixel",
                  planes.len(), metadata.samples_per_pixel);
        }

        Ok(planes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    #[test]
    fn rgb16_pixels_split_into_three_planes() {
        let buf: ImageBuffer<Rgb<u16>, Vec<u16>> =
            ImageBuffer::from_fn(2, 1, |x, _| Rgb([x as u16 * 1000, 7, 65535]));
        let planes = DecoderStrategy::planes_from(DynamicImage::ImageRgb16(buf)).unwrap();

        assert_eq!(planes.len(), 3);
        assert_eq!(planes[0].data(), &[0, 1000]);
        assert_eq!(planes[2].get(1, 0), 65535);
    }

    #[test]
    fn eight_bit_values_are_widened_not_scaled() {
        let buf = image::GrayImage::from_raw(2, 1, vec![3, 250]).unwrap();
        let planes = DecoderStrategy::planes_from(DynamicImage::ImageLuma8(buf)).unwrap();
        assert_eq!(planes[0].data(), &[3, 250]);
    }
}
