//! Native decoder for strip-organised scans
//!
//! Handles 8- and 16-bit unsigned samples, chunky and planar layouts,
//! compression none/deflate/zstd and the horizontal differencing predictor.

use log::{debug, info};
use std::io::SeekFrom;

use crate::compression::{CompressionFactory, CompressionHandler};
use crate::errors::{FilmError, FilmResult};
use crate::io::byte_order::ByteOrder;
use crate::io::seekable::SeekableReader;
use crate::tiff::constants::{planar_config, predictor, sample_format, tags};
use crate::tiff::header;
use crate::tiff::ifd::IFD;
use crate::tiff::metadata::FilmMetadata;
use crate::tiff::reader::TiffReader;
use crate::utils::progress::ProgressTracker;

use super::loader_strategy::{colour_planes, native_compression, LoaderStrategy};
use super::plane::Plane;

/// Decodes stripped TIFF data without going through the `image` crate
pub struct StripStrategy;

/// Strip geometry shared by all strips of one image
struct StripLayout {
    width: usize,
    height: usize,
    rows_per_strip: usize,
    /// Samples per pixel stored in one strip (1 for planar data)
    stride: usize,
    bits_per_sample: u16,
    predictor: u16,
}

impl StripLayout {
    fn strips_per_plane(&self) -> usize {
        self.height.div_ceil(self.rows_per_strip)
    }

    fn rows_in_strip(&self, strip: usize) -> usize {
        let first_row = strip * self.rows_per_strip;
        self.rows_per_strip.min(self.height.saturating_sub(first_row))
    }

    fn row_samples(&self) -> usize {
        self.width * self.stride
    }
}

impl StripStrategy {
    fn layout(ifd: &IFD, metadata: &FilmMetadata) -> StripLayout {
        let height = metadata.height as usize;
        let rows_per_strip = ifd.get_tag_value(tags::ROWS_PER_STRIP)
            .map(|r| r as usize)
            .filter(|r| *r > 0)
            .unwrap_or(height)
            .min(height.max(1));

        let stride = if metadata.planar_configuration == planar_config::PLANAR {
            1
        } else {
            metadata.samples_per_pixel as usize
        };

        StripLayout {
            width: metadata.width as usize,
            height,
            rows_per_strip,
            stride,
            bits_per_sample: metadata.bits_per_sample,
            predictor: metadata.predictor,
        }
    }

    /// Reads one strip and returns its samples widened to u16
    fn read_strip(reader: &mut dyn SeekableReader, offset: u64, byte_count: u64,
                  handler: &dyn CompressionHandler, byte_order: ByteOrder,
                  layout: &StripLayout, rows: usize, stream_len: u64) -> FilmResult<Vec<u16>> {
        // Byte counts come from the file; never allocate past its end
        if offset.checked_add(byte_count).map_or(true, |end| end > stream_len) {
            return Err(FilmError::UnsupportedLayout(format!(
                "Strip at offset {} with {} bytes runs past the end of the file ({} bytes)",
                offset, byte_count, stream_len
            )));
        }
        reader.seek(SeekFrom::Start(offset))?;
        let mut compressed = vec![0u8; byte_count as usize];
        reader.read_exact(&mut compressed)?;

        let bytes = handler.decompress(&compressed)?;
        let expected = rows * layout.row_samples();

        let mut samples = match layout.bits_per_sample {
            8 => bytes.iter().map(|b| *b as u16).collect::<Vec<_>>(),
            _ => byte_order.decode_u16_samples(&bytes),
        };

        if samples.len() < expected {
            return Err(FilmError::UnsupportedLayout(format!(
                "Strip at offset {} holds {} samples, expected {}", offset, samples.len(), expected
            )));
        }
        samples.truncate(expected);

        if layout.predictor == predictor::HORIZONTAL_DIFFERENCING {
            apply_horizontal_predictor(&mut samples, layout.row_samples(), layout.stride,
                                       layout.bits_per_sample);
        }

        Ok(samples)
    }
}

/// Undoes horizontal differencing in place
///
/// Each sample holds the difference to the same sample of the previous
/// pixel in the row; additions wrap at the sample bit depth.
pub fn apply_horizontal_predictor(samples: &mut [u16], row_samples: usize, stride: usize, bits_per_sample: u16) {
    if row_samples == 0 {
        return;
    }

    let mask: u32 = if bits_per_sample >= 16 { 0xFFFF } else { (1 << bits_per_sample) - 1 };
    for row in samples.chunks_mut(row_samples) {
        for i in stride..row.len() {
            row[i] = ((row[i] as u32 + row[i - stride] as u32) & mask) as u16;
        }
    }
}

impl LoaderStrategy for StripStrategy {
    fn name(&self) -> &'static str {
        "native strip decoder"
    }

    fn supports(&self, ifd: &IFD, metadata: &FilmMetadata) -> bool {
        let unsigned = ifd.get_tag_value(tags::SAMPLE_FORMAT)
            .map(|f| f == sample_format::UNSIGNED as u64)
            .unwrap_or(true);

        !ifd.is_tiled()
            && metadata.samples_per_pixel >= 1
            && ifd.has_tag(tags::STRIP_OFFSETS)
            && ifd.has_tag(tags::STRIP_BYTE_COUNTS)
            && matches!(metadata.bits_per_sample, 8 | 16)
            && matches!(metadata.predictor, predictor::NONE | predictor::HORIZONTAL_DIFFERENCING)
            && unsigned
            && native_compression(metadata.compression)
    }

    fn load_planes(&self, tiff_reader: &TiffReader, reader: &mut dyn SeekableReader,
                   ifd: &IFD, metadata: &FilmMetadata) -> FilmResult<Vec<Plane<u16>>> {
        let layout = Self::layout(ifd, metadata);
        if layout.stride == 0 {
            return Err(FilmError::UnsupportedLayout("no samples per pixel".to_string()));
        }
        let byte_order = tiff_reader.byte_order()
            .ok_or_else(|| FilmError::GenericError("Byte order not yet determined".to_string()))?;
        let handler = CompressionFactory::create_handler(metadata.compression as u64)?;
        info!("Using compression: {}", handler.name());

        let offsets = tiff_reader.read_tag_values(reader, ifd, tags::STRIP_OFFSETS)?;
        let byte_counts = tiff_reader.read_tag_values(reader, ifd, tags::STRIP_BYTE_COUNTS)?;
        let stream_len = header::stream_len(reader)?;

        let samples_per_pixel = metadata.samples_per_pixel as usize;
        let keep = colour_planes(samples_per_pixel);
        let strips_per_plane = layout.strips_per_plane();
        let stored_planes = if layout.stride == 1 { samples_per_pixel } else { 1 };
        let total_strips = strips_per_plane * stored_planes;

        info!("Rows per strip: {}", layout.rows_per_strip);
        info!("Total strips: {}", total_strips);

        if offsets.len() < total_strips || byte_counts.len() < total_strips {
            return Err(FilmError::UnsupportedLayout(format!(
                "Expected {} strips, found {} offsets and {} byte counts",
                total_strips, offsets.len(), byte_counts.len()
            )));
        }

        let pixel_count = layout.width * layout.height;
        let mut planes: Vec<Vec<u16>> = (0..keep).map(|_| Vec::with_capacity(pixel_count)).collect();
        let progress = ProgressTracker::new(total_strips as u64, "Decoding strips");

        for strip in 0..total_strips {
            let rows = layout.rows_in_strip(strip % strips_per_plane);
            debug!("Reading strip {} at offset {} with {} bytes", strip, offsets[strip], byte_counts[strip]);

            let samples = Self::read_strip(reader, offsets[strip], byte_counts[strip],
                                           &*handler, byte_order, &layout, rows, stream_len)?;

            if layout.stride == 1 && stored_planes > 1 {
                // Planar: every strip belongs to a single sample plane
                let plane = strip / strips_per_plane;
                if plane < keep {
                    planes[plane].extend_from_slice(&samples);
                }
            } else {
                for pixel in samples.chunks_exact(layout.stride) {
                    for (plane, values) in planes.iter_mut().enumerate() {
                        values.push(pixel[plane]);
                    }
                }
            }

            progress.increment(1);
        }
        progress.finish();

        planes.into_iter()
            .map(|data| Plane::new(layout.width, layout.height, data))
            .collect()
    }
}
