//! Tag value decoding and the name tables used for logging and `--inspect`

use byteorder::ReadBytesExt;
use std::io::Cursor;

use crate::errors::{FilmError, FilmResult};
use crate::io::byte_order::ByteOrderHandler;
use crate::io::seekable::SeekableReader;
use crate::tiff::constants::{compression, field_types, photometric, tags};
use crate::tiff::ifd::IFDEntry;

/// `(field type, bytes per value, name)`
const FIELD_TYPES: &[(u16, usize, &str)] = &[
    (field_types::BYTE, 1, "BYTE"),
    (field_types::ASCII, 1, "ASCII"),
    (field_types::SHORT, 2, "SHORT"),
    (field_types::LONG, 4, "LONG"),
    (field_types::RATIONAL, 8, "RATIONAL"),
    (field_types::SBYTE, 1, "SBYTE"),
    (field_types::UNDEFINED, 1, "UNDEFINED"),
    (field_types::SSHORT, 2, "SSHORT"),
    (field_types::SLONG, 4, "SLONG"),
    (field_types::SRATIONAL, 8, "SRATIONAL"),
    (field_types::FLOAT, 4, "FLOAT"),
    (field_types::DOUBLE, 8, "DOUBLE"),
    (field_types::LONG8, 8, "LONG8"),
    (field_types::SLONG8, 8, "SLONG8"),
    (field_types::IFD8, 8, "IFD8"),
];

const TAG_NAMES: &[(u16, &str)] = &[
    (tags::NEW_SUBFILE_TYPE, "NewSubfileType"),
    (tags::IMAGE_WIDTH, "ImageWidth"),
    (tags::IMAGE_LENGTH, "ImageLength"),
    (tags::BITS_PER_SAMPLE, "BitsPerSample"),
    (tags::COMPRESSION, "Compression"),
    (tags::PHOTOMETRIC_INTERPRETATION, "PhotometricInterpretation"),
    (tags::STRIP_OFFSETS, "StripOffsets"),
    (tags::SAMPLES_PER_PIXEL, "SamplesPerPixel"),
    (tags::ROWS_PER_STRIP, "RowsPerStrip"),
    (tags::STRIP_BYTE_COUNTS, "StripByteCounts"),
    (tags::X_RESOLUTION, "XResolution"),
    (tags::Y_RESOLUTION, "YResolution"),
    (tags::PLANAR_CONFIGURATION, "PlanarConfiguration"),
    (tags::RESOLUTION_UNIT, "ResolutionUnit"),
    (tags::SOFTWARE, "Software"),
    (tags::DATE_TIME, "DateTime"),
    (tags::PREDICTOR, "Predictor"),
    (tags::TILE_WIDTH, "TileWidth"),
    (tags::TILE_LENGTH, "TileLength"),
    (tags::TILE_OFFSETS, "TileOffsets"),
    (tags::TILE_BYTE_COUNTS, "TileByteCounts"),
    (tags::SAMPLE_FORMAT, "SampleFormat"),
];

const COMPRESSION_NAMES: &[(u16, &str)] = &[
    (compression::NONE, "None"),
    (compression::CCITT_RLE, "CCITT RLE"),
    (compression::LZW, "LZW"),
    (compression::JPEG_OLD, "Old JPEG"),
    (compression::JPEG, "JPEG"),
    (compression::DEFLATE, "Adobe Deflate"),
    (compression::DEFLATE_OLD, "Adobe Deflate"),
    (compression::ZSTD, "Zstandard"),
    (compression::PACKBITS, "PackBits"),
];

const PHOTOMETRIC_NAMES: &[(u16, &str)] = &[
    (photometric::WHITE_IS_ZERO, "WhiteIsZero"),
    (photometric::BLACK_IS_ZERO, "BlackIsZero"),
    (photometric::RGB, "RGB"),
    (photometric::PALETTE, "Palette"),
    (photometric::CMYK, "CMYK"),
    (photometric::YCBCR, "YCbCr"),
    (photometric::CIELAB, "CIELAB"),
];

fn lookup(table: &[(u16, &'static str)], code: u64) -> &'static str {
    u16::try_from(code).ok()
        .and_then(|code| table.iter().find(|(known, _)| *known == code))
        .map_or("Unknown", |(_, name)| *name)
}

/// Reads `entry.count` values of the entry's field type from `reader`
///
/// Every value is widened to u64. A rational becomes
/// `numerator << 32 | denominator`, see [`unpack_rational`].
pub fn read_tag_value_array(
    reader: &mut dyn SeekableReader,
    entry: &IFDEntry,
    handler: &dyn ByteOrderHandler,
    values: &mut Vec<u64>,
) -> FilmResult<()> {
    let width = match FIELD_TYPES.iter().find(|(code, _, _)| *code == entry.field_type) {
        Some((field_types::RATIONAL | field_types::SRATIONAL, _, _)) => 0,
        Some((field_types::DOUBLE, _, _)) | None =>
            return Err(FilmError::UnsupportedFieldType(entry.field_type)),
        Some((_, width, _)) => *width,
    };

    for _ in 0..entry.count {
        values.push(match width {
            1 => u64::from(reader.read_u8()?),
            2 => u64::from(handler.read_u16(reader)?),
            4 => u64::from(handler.read_u32(reader)?),
            8 => handler.read_u64(reader)?,
            _ => {
                let (numerator, denominator) = handler.read_rational(reader)?;
                pack_rational(numerator, denominator)
            }
        });
    }
    Ok(())
}

/// Decodes the values held in an entry's own value field
///
/// `field` is the raw 4 (TIFF) or 8 (BigTIFF) bytes in file order. Inline
/// values are left-justified, so they read like an array at offset 0.
pub fn decode_inline_values(
    field: &[u8],
    entry: &IFDEntry,
    handler: &dyn ByteOrderHandler,
) -> FilmResult<Vec<u64>> {
    let mut values = Vec::with_capacity(entry.count as usize);
    read_tag_value_array(&mut Cursor::new(field), entry, handler, &mut values)?;
    Ok(values)
}

pub fn pack_rational(numerator: u32, denominator: u32) -> u64 {
    u64::from(numerator) << 32 | u64::from(denominator)
}

pub fn unpack_rational(value: u64) -> (u32, u32) {
    ((value >> 32) as u32, value as u32)
}

/// Bytes per value; unknown types count as one byte
pub fn field_type_size(field_type: u16) -> usize {
    FIELD_TYPES.iter()
        .find(|(code, _, _)| *code == field_type)
        .map_or(1, |(_, size, _)| *size)
}

/// Whether the values fit in the entry's 4 (TIFF) or 8 (BigTIFF) byte field
pub fn is_value_inline(entry: &IFDEntry, is_big_tiff: bool) -> bool {
    let capacity = if is_big_tiff { 8 } else { 4 };
    (field_type_size(entry.field_type) as u64).saturating_mul(entry.count) <= capacity
}

pub fn get_tag_name(tag: u16) -> &'static str {
    lookup(TAG_NAMES, u64::from(tag))
}

pub fn get_field_type_name(field_type: u16) -> &'static str {
    FIELD_TYPES.iter()
        .find(|(code, _, _)| *code == field_type)
        .map_or("Unknown", |(_, _, name)| *name)
}

pub fn get_compression_name(compression_code: u64) -> &'static str {
    lookup(COMPRESSION_NAMES, compression_code)
}

pub fn get_photometric_name(photometric_code: u64) -> &'static str {
    lookup(PHOTOMETRIC_NAMES, photometric_code)
}
