//! Byte order handling for TIFF files
//!
//! Film scanners write both little-endian ("II") and big-endian ("MM")
//! files. The header marker selects one of two handler strategies that are
//! then used for every multi-byte read, including 16-bit pixel samples.

use byteorder::{BigEndian, ByteOrder as _, LittleEndian, ReadBytesExt};
use std::io::Result;

use crate::errors::{FilmError, FilmResult};
use crate::io::seekable::SeekableReader;

/// "II", Intel order
const INTEL_MARKER: u16 = 0x4949;
/// "MM", Motorola order
const MOTOROLA_MARKER: u16 = 0x4D4D;

/// Byte order declared in the first two bytes of a TIFF file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    LittleEndian,
    BigEndian,
}

impl ByteOrder {
    /// Reads the two-byte marker at the reader's position
    ///
    /// Both markers are palindromes, so reading them in either order works.
    pub fn detect(reader: &mut dyn SeekableReader) -> FilmResult<Self> {
        match reader.read_u16::<LittleEndian>()? {
            INTEL_MARKER => Ok(ByteOrder::LittleEndian),
            MOTOROLA_MARKER => Ok(ByteOrder::BigEndian),
            other => Err(FilmError::InvalidByteOrder(other)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ByteOrder::LittleEndian => "Little Endian (II)",
            ByteOrder::BigEndian => "Big Endian (MM)",
        }
    }

    /// Boxed reader strategy for this order
    pub fn create_handler(&self) -> Box<dyn ByteOrderHandler> {
        match self {
            ByteOrder::LittleEndian => Box::new(LittleEndianHandler),
            ByteOrder::BigEndian => Box::new(BigEndianHandler),
        }
    }

    /// Decodes a buffer of 16-bit samples stored in this byte order
    ///
    /// A trailing odd byte (truncated strip) is ignored.
    pub fn decode_u16_samples(&self, bytes: &[u8]) -> Vec<u16> {
        let mut samples = vec![0u16; bytes.len() / 2];
        let usable = &bytes[..samples.len() * 2];
        match self {
            ByteOrder::LittleEndian => LittleEndian::read_u16_into(usable, &mut samples),
            ByteOrder::BigEndian => BigEndian::read_u16_into(usable, &mut samples),
        }
        samples
    }
}

/// Reads multi-byte values in one fixed byte order
pub trait ByteOrderHandler: Send + Sync {
    fn read_u16(&self, reader: &mut dyn SeekableReader) -> Result<u16>;

    fn read_u32(&self, reader: &mut dyn SeekableReader) -> Result<u32>;

    fn read_u64(&self, reader: &mut dyn SeekableReader) -> Result<u64>;

    /// Reads a RATIONAL as `(numerator, denominator)`
    fn read_rational(&self, reader: &mut dyn SeekableReader) -> Result<(u32, u32)> {
        let numerator = self.read_u32(reader)?;
        let denominator = self.read_u32(reader)?;
        Ok((numerator, denominator))
    }
}

macro_rules! endian_handler {
    ($(#[$doc:meta])* $name:ident, $order:ty) => {
        $(#[$doc])*
        pub struct $name;

        impl ByteOrderHandler for $name {
            fn read_u16(&self, reader: &mut dyn SeekableReader) -> Result<u16> {
                reader.read_u16::<$order>()
            }

            fn read_u32(&self, reader: &mut dyn SeekableReader) -> Result<u32> {
                reader.read_u32::<$order>()
            }

            fn read_u64(&self, reader: &mut dyn SeekableReader) -> Result<u64> {
                reader.read_u64::<$order>()
            }
        }
    };
}

endian_handler!(
    /// Handler for "II" files
    LittleEndianHandler, LittleEndian
);
endian_handler!(
    /// Handler for "MM" files
    BigEndianHandler, BigEndian
);
