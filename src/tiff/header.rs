//! File header and IFD chain geometry
//!
//! Classic TIFF:  `II|MM`, version 42, u32 offset to the first IFD.
//! BigTIFF:       `II|MM`, version 43, offset size 8, reserved 0, u64 offset.

use log::{debug, error, warn};
use std::io::SeekFrom;

use crate::errors::{FilmError, FilmResult};
use crate::io::byte_order::{ByteOrder, ByteOrderHandler};
use crate::io::seekable::SeekableReader;
use crate::tiff::constants::header;
use crate::tiff::ifd::IFD;

/// Smallest offset an IFD can start at, right after a classic header
const MIN_IFD_OFFSET: u64 = 8;

/// What the first bytes of a file say about the rest of it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Header {
    pub byte_order: ByteOrder,
    pub big_tiff: bool,
    pub first_ifd: u64,
}

/// Parses the header at the start of `reader`
///
/// The first IFD offset is returned unchecked; see [`check_ifd_offset`].
pub(crate) fn read_header(reader: &mut dyn SeekableReader) -> FilmResult<Header> {
    reader.seek(SeekFrom::Start(0))?;
    let byte_order = ByteOrder::detect(reader)?;
    debug!("Byte order: {}", byte_order.name());

    let handler = byte_order.create_handler();
    let big_tiff = match handler.read_u16(reader)? {
        header::TIFF_VERSION => false,
        header::BIG_TIFF_VERSION => {
            let offset_size = handler.read_u16(reader)?;
            let reserved = handler.read_u16(reader)?;
            if offset_size != header::BIGTIFF_OFFSET_SIZE || reserved != 0 {
                error!("Bad BigTIFF header: offset size {}, reserved {}", offset_size, reserved);
                return Err(FilmError::InvalidBigTIFFHeader);
            }
            true
        }
        version => return Err(FilmError::UnsupportedVersion(version)),
    };
    debug!("{} header", if big_tiff { "BigTIFF" } else { "Classic TIFF" });

    let first_ifd = read_offset(reader, big_tiff, &*handler)?;
    Ok(Header { byte_order, big_tiff, first_ifd })
}

/// Reads an offset in the file's width; 0 ends the IFD chain
pub(crate) fn read_offset(reader: &mut dyn SeekableReader, big_tiff: bool,
                          handler: &dyn ByteOrderHandler) -> FilmResult<u64> {
    Ok(if big_tiff {
        handler.read_u64(reader)?
    } else {
        u64::from(handler.read_u32(reader)?)
    })
}

/// Number of entries at the start of an IFD: u16 in TIFF, u64 in BigTIFF
pub(crate) fn read_entry_count(reader: &mut dyn SeekableReader, big_tiff: bool,
                               handler: &dyn ByteOrderHandler) -> FilmResult<u64> {
    Ok(if big_tiff {
        handler.read_u64(reader)?
    } else {
        u64::from(handler.read_u16(reader)?)
    })
}

/// Bytes between the start of an IFD and its next-IFD link
pub(crate) fn ifd_byte_len(ifd: &IFD, big_tiff: bool) -> u64 {
    let entries = ifd.entries.len() as u64;
    match big_tiff {
        true => 8 + 20 * entries,
        false => 2 + 12 * entries,
    }
}

pub(crate) fn check_ifd_offset(offset: u64, stream_len: u64) -> FilmResult<()> {
    if (MIN_IFD_OFFSET..stream_len).contains(&offset) {
        Ok(())
    } else {
        Err(FilmError::GenericError(format!(
            "Invalid IFD offset: {} (file size: {})", offset, stream_len
        )))
    }
}

/// Length of the stream; the read position is left where it was
///
/// A stream that cannot seek to its end reports `u64::MAX`.
pub(crate) fn stream_len(reader: &mut dyn SeekableReader) -> FilmResult<u64> {
    let position = reader.stream_position()?;
    let len = reader.seek(SeekFrom::End(0)).unwrap_or_else(|e| {
        warn!("Could not determine file size: {}", e);
        u64::MAX
    });
    reader.seek(SeekFrom::Start(position))?;
    Ok(len)
}
