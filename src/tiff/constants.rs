//! TIFF format constants
//!
//! Named values for the header, field types and the baseline tags a film
//! scan carries. Only what the reader and the film metadata need is listed.

pub mod header {
    /// Version word of a classic TIFF
    pub const TIFF_VERSION: u16 = 42;
    /// Version word of a BigTIFF
    pub const BIG_TIFF_VERSION: u16 = 43;
    /// Width of BigTIFF offsets, stored right after the version
    pub const BIGTIFF_OFFSET_SIZE: u16 = 8;
}

/// IFD entry field types (TIFF 6.0 plus the BigTIFF additions)
pub mod field_types {
    pub const BYTE: u16 = 1;
    pub const ASCII: u16 = 2;
    pub const SHORT: u16 = 3;
    pub const LONG: u16 = 4;
    /// Two LONGs, numerator then denominator
    pub const RATIONAL: u16 = 5;
    pub const SBYTE: u16 = 6;
    pub const UNDEFINED: u16 = 7;
    pub const SSHORT: u16 = 8;
    pub const SLONG: u16 = 9;
    pub const SRATIONAL: u16 = 10;
    pub const FLOAT: u16 = 11;
    pub const DOUBLE: u16 = 12;
    pub const LONG8: u16 = 16;
    pub const SLONG8: u16 = 17;
    pub const IFD8: u16 = 18;
}

/// Tags read from a film scan
pub mod tags {
    /// Bit 0 set marks a reduced-resolution copy
    pub const NEW_SUBFILE_TYPE: u16 = 254;
    pub const IMAGE_WIDTH: u16 = 256;
    /// Image height in rows
    pub const IMAGE_LENGTH: u16 = 257;
    pub const BITS_PER_SAMPLE: u16 = 258;
    pub const COMPRESSION: u16 = 259;
    pub const PHOTOMETRIC_INTERPRETATION: u16 = 262;
    pub const STRIP_OFFSETS: u16 = 273;
    pub const SAMPLES_PER_PIXEL: u16 = 277;
    pub const ROWS_PER_STRIP: u16 = 278;
    pub const STRIP_BYTE_COUNTS: u16 = 279;
    /// Pixels per ResolutionUnit along a row
    pub const X_RESOLUTION: u16 = 282;
    pub const Y_RESOLUTION: u16 = 283;
    pub const PLANAR_CONFIGURATION: u16 = 284;
    pub const RESOLUTION_UNIT: u16 = 296;
    pub const SOFTWARE: u16 = 305;
    pub const DATE_TIME: u16 = 306;
    pub const PREDICTOR: u16 = 317;
    pub const TILE_WIDTH: u16 = 322;
    pub const TILE_LENGTH: u16 = 323;
    pub const TILE_OFFSETS: u16 = 324;
    pub const TILE_BYTE_COUNTS: u16 = 325;
    pub const SAMPLE_FORMAT: u16 = 339;
}

pub mod compression {
    pub const NONE: u16 = 1;
    pub const CCITT_RLE: u16 = 2;
    pub const LZW: u16 = 5;
    pub const JPEG_OLD: u16 = 6;
    pub const JPEG: u16 = 7;
    /// Adobe Deflate (zlib stream)
    pub const DEFLATE: u16 = 8;
    pub const ZSTD: u16 = 14;
    pub const PACKBITS: u16 = 32773;
    /// Deflate code used by writers predating the Adobe registration
    pub const DEFLATE_OLD: u16 = 32946;
}

pub mod photometric {
    pub const WHITE_IS_ZERO: u16 = 0;
    pub const BLACK_IS_ZERO: u16 = 1;
    pub const RGB: u16 = 2;
    pub const PALETTE: u16 = 3;
    pub const CMYK: u16 = 5;
    pub const YCBCR: u16 = 6;
    pub const CIELAB: u16 = 8;
}

pub mod planar_config {
    /// RGBRGB...
    pub const CHUNKY: u16 = 1;
    /// RR..GG..BB..
    pub const PLANAR: u16 = 2;
}

pub mod sample_format {
    pub const UNSIGNED: u16 = 1;
}

pub mod resolution_unit {
    pub const NONE: u16 = 1;
    pub const INCH: u16 = 2;
    pub const CENTIMETER: u16 = 3;
}

pub mod predictor {
    pub const NONE: u16 = 1;
    pub const HORIZONTAL_DIFFERENCING: u16 = 2;
}
