//! Tests for decoding film scans into planes

extern crate std;

use crate::errors::FilmError;
use crate::loader::{Channel, DecoderStrategy, FilmLoader, LoaderStrategy, LoaderStrategyFactory, StripStrategy};
use crate::tiff::constants::{compression, predictor};
use crate::tiff::metadata::FilmMetadata;
use crate::tiff::reader::TiffReader;

use super::test_utils::TiffFixture;

fn ramp(x: u32, y: u32, s: u16) -> u16 {
    (x * 300 + y * 7000 + s as u32 * 11) as u16
}

fn assert_matches_ramp(fixture: &TiffFixture) {
    let mut cursor = fixture.build();
    let image = FilmLoader::new().load_from(&mut cursor).unwrap();

    std::assert_eq!(image.width(), fixture.width as usize);
    std::assert_eq!(image.height(), fixture.height as usize);
    std::assert_eq!(image.plane_count(), 3);
    for (s, channel) in [Channel::Red, Channel::Green, Channel::Blue].into_iter().enumerate() {
        let plane = image.channel(channel).unwrap();
        for y in 0..fixture.height {
            for x in 0..fixture.width {
                std::assert_eq!(plane.get(x as usize, y as usize), ramp(x, y, s as u16),
                                "{} at ({}, {})", channel, x, y);
            }
        }
    }
}

#[test]
fn test_uncompressed_single_strip() {
    assert_matches_ramp(&TiffFixture::rgb16(7, 5, ramp));
}

#[test]
fn test_multiple_strips_with_short_last_strip() {
    let mut fixture = TiffFixture::rgb16(6, 7, ramp);
    fixture.rows_per_strip = 3;
    assert_matches_ramp(&fixture);
}

#[test]
fn test_big_endian_bigtiff() {
    let mut fixture = TiffFixture::rgb16(5, 4, ramp);
    fixture.big_endian = true;
    fixture.big_tiff = true;
    fixture.rows_per_strip = 2;
    assert_matches_ramp(&fixture);
}

#[test]
fn test_deflate_with_horizontal_predictor() {
    let mut fixture = TiffFixture::rgb16(9, 6, ramp);
    fixture.compression = compression::DEFLATE;
    fixture.predictor = predictor::HORIZONTAL_DIFFERENCING;
    fixture.rows_per_strip = 4;
    assert_matches_ramp(&fixture);
}

#[test]
fn test_zstd_compression() {
    let mut fixture = TiffFixture::rgb16(8, 3, ramp);
    fixture.compression = compression::ZSTD;
    assert_matches_ramp(&fixture);
}

#[test]
fn test_planar_configuration() {
    let mut fixture = TiffFixture::rgb16(4, 5, ramp);
    fixture.planar = true;
    fixture.rows_per_strip = 2;
    assert_matches_ramp(&fixture);
}

#[test]
fn test_planar_with_predictor_and_big_endian() {
    let mut fixture = TiffFixture::rgb16(6, 3, ramp);
    fixture.planar = true;
    fixture.big_endian = true;
    fixture.predictor = predictor::HORIZONTAL_DIFFERENCING;
    fixture.compression = compression::DEFLATE;
    assert_matches_ramp(&fixture);
}

#[test]
fn test_thumbnail_is_skipped() {
    let mut fixture = TiffFixture::rgb16(5, 5, ramp);
    fixture.thumbnail_first = true;
    assert_matches_ramp(&fixture);
}

#[test]
fn test_gray_scan_serves_every_channel() {
    let fixture = TiffFixture::gray8(4, 3, |x, y| (x * 10 + y) as u8);
    let mut cursor = fixture.build();
    let image = FilmLoader::new().load_from(&mut cursor).unwrap();

    std::assert_eq!(image.plane_count(), 1);
    std::assert_eq!(image.metadata.bits_per_sample, 8);
    std::assert_eq!(image.channel(Channel::Blue).unwrap().get(3, 2), 32);
    std::assert_eq!(image.channel(Channel::Red).unwrap().get(0, 1), 1);
}

#[test]
fn test_truncated_strip_is_rejected() {
    let fixture = TiffFixture::rgb16(4, 4, ramp);
    let mut bytes = fixture.build().into_inner();

    // StripByteCounts entry: tag 279, LONG, count 1, inline value
    let entry = [0x17, 0x01, 0x04, 0x00, 0x01, 0x00, 0x00, 0x00];
    let position = bytes.windows(entry.len()).position(|w| w == entry).unwrap() + entry.len();
    bytes[position..position + 4].copy_from_slice(&10u32.to_le_bytes());
    let mut cursor = std::io::Cursor::new(bytes);

    let result = FilmLoader::new().load_from(&mut cursor);
    std::assert!(std::matches!(result, Err(FilmError::UnsupportedLayout(_))));
}

#[test]
fn test_strategy_selection() {
    let mut fixture = TiffFixture::rgb16(3, 3, ramp);
    fixture.compression = compression::DEFLATE;
    let mut cursor = fixture.build();
    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut cursor).unwrap();
    let ifd = tiff.main_ifd().unwrap();
    let mut metadata = FilmMetadata::from_ifd(&reader, &mut cursor, ifd).unwrap();

    std::assert_eq!(LoaderStrategyFactory::create_strategy(ifd, &metadata).name(), "native strip decoder");

    metadata.compression = compression::LZW;
    std::assert!(!StripStrategy.supports(ifd, &metadata));
    std::assert_eq!(LoaderStrategyFactory::create_strategy(ifd, &metadata).name(), "image crate decoder");

    metadata.compression = compression::NONE;
    metadata.bits_per_sample = 12;
    std::assert!(!StripStrategy.supports(ifd, &metadata));
}

#[test]
fn test_image_decoder_agrees_with_strip_decoder() {
    let fixture = TiffFixture::rgb16(6, 4, ramp);
    let mut cursor = fixture.build();
    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut cursor).unwrap();
    let ifd = tiff.main_ifd().unwrap();
    let metadata = FilmMetadata::from_ifd(&reader, &mut cursor, ifd).unwrap();

    let native = StripStrategy.load_planes(&reader, &mut cursor, ifd, &metadata).unwrap();
    let decoded = DecoderStrategy.load_planes(&reader, &mut cursor, ifd, &metadata).unwrap();
    std::assert_eq!(native, decoded);
}

#[test]
fn test_unsupported_compression_fails_in_strip_decoder() {
    let fixture = TiffFixture::rgb16(2, 2, ramp);
    let mut cursor = fixture.build();
    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut cursor).unwrap();
    let ifd = tiff.main_ifd().unwrap();
    let mut metadata = FilmMetadata::from_ifd(&reader, &mut cursor, ifd).unwrap();
    metadata.compression = compression::PACKBITS;

    let result = StripStrategy.load_planes(&reader, &mut cursor, ifd, &metadata);
    std::assert!(std::matches!(result, Err(FilmError::UnsupportedCompression(32773))));
}

/// Offset of the value field of the first entry matching `entry`
fn entry_value_position(bytes: &[u8], entry: &[u8]) -> usize {
    bytes.windows(entry.len()).position(|w| w == entry).unwrap() + entry.len()
}

#[test]
fn test_zero_samples_per_pixel_is_an_error() {
    let fixture = TiffFixture::gray8(4, 4, |x, y| (x + y) as u8);
    let mut bytes = fixture.build().into_inner();

    // SamplesPerPixel entry: tag 277, SHORT, count 1
    let position = entry_value_position(&bytes, &[0x15, 0x01, 0x03, 0x00, 0x01, 0x00, 0x00, 0x00]);
    bytes[position..position + 2].copy_from_slice(&0u16.to_le_bytes());
    let mut cursor = std::io::Cursor::new(bytes);

    let result = FilmLoader::new().load_from(&mut cursor);
    std::assert!(std::matches!(result, Err(FilmError::UnsupportedLayout(_))));
}

#[test]
fn test_strip_past_end_of_file_is_rejected() {
    let fixture = TiffFixture::rgb16(4, 4, ramp);
    let mut bytes = fixture.build().into_inner();

    let position = entry_value_position(&bytes, &[0x17, 0x01, 0x04, 0x00, 0x01, 0x00, 0x00, 0x00]);
    bytes[position..position + 4].copy_from_slice(&u32::MAX.to_le_bytes());
    let mut cursor = std::io::Cursor::new(bytes);

    let result = FilmLoader::new().load_from(&mut cursor);
    std::assert!(std::matches!(result, Err(FilmError::UnsupportedLayout(_))));
}

#[test]
fn test_strip_decoder_refuses_sampleless_layout() {
    let mut cursor = TiffFixture::gray8(2, 2, |_, _| 1).build();
    let mut reader = TiffReader::new();
    let tiff = reader.read(&mut cursor).unwrap();
    let ifd = tiff.main_ifd().unwrap();
    let mut metadata = FilmMetadata::from_ifd(&reader, &mut cursor, ifd).unwrap();
    metadata.samples_per_pixel = 0;

    std::assert!(!StripStrategy.supports(ifd, &metadata));
    let result = StripStrategy.load_planes(&reader, &mut cursor, ifd, &metadata);
    std::assert!(std::matches!(result, Err(FilmError::UnsupportedLayout(_))));
}
