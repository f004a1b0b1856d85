//! TIFF file format parsing module
//!
//! Header and IFD parsing for TIFF and BigTIFF film scans, plus the
//! scan metadata derived from the main IFD.

pub mod ifd;
pub mod types;
pub mod reader;
pub mod metadata;
pub(crate) mod constants;
pub(crate) mod header;

#[cfg(test)]
mod tests;

pub use crate::io::byte_order::{BigEndianHandler, ByteOrder, ByteOrderHandler, LittleEndianHandler};
pub use ifd::{IFD, IFDEntry};
pub use metadata::FilmMetadata;
pub use reader::TiffReader;
pub use types::TIFF;
