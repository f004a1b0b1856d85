//! TIFF / BigTIFF structure reader
//!
//! Walks the header and the IFD chain and resolves tag values, inline or
//! out of line. Pixel data is left to the loader strategies, which call
//! back into [`TiffReader::read_tag_values`] for strip offsets.

use log::{debug, info, warn};
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::PathBuf;

use crate::errors::{FilmError, FilmResult};
use crate::io::byte_order::{ByteOrder, ByteOrderHandler};
use crate::io::seekable::SeekableReader;
use crate::tiff::header;
use crate::tiff::ifd::{IFDEntry, IFD};
use crate::tiff::types::TIFF;
use crate::utils::tag_utils;

/// Stop following next-IFD links after this many directories
const MAX_IFDS: usize = 100;

/// 48-bit scans run to hundreds of megabytes; read them in large chunks
const READ_BUFFER: usize = 1 << 20;

pub struct TiffReader {
    path: Option<PathBuf>,
    byte_order: Option<ByteOrder>,
    handler: Option<Box<dyn ByteOrderHandler>>,
    is_big_tiff: bool,
}

impl Default for TiffReader {
    fn default() -> Self {
        Self::new()
    }
}

impl TiffReader {
    pub fn new() -> Self {
        TiffReader { path: None, byte_order: None, handler: None, is_big_tiff: false }
    }

    fn handler(&self) -> FilmResult<&dyn ByteOrderHandler> {
        match &self.handler {
            Some(handler) => Ok(handler.as_ref()),
            None => Err(FilmError::GenericError("Byte order not yet determined".to_string())),
        }
    }

    /// Parses the file at `filepath` and remembers it for [`Self::create_reader`]
    pub fn load(&mut self, filepath: &str) -> FilmResult<TIFF> {
        info!("Reading TIFF structure of {}", filepath);
        let path = PathBuf::from(filepath);
        let mut reader = BufReader::with_capacity(READ_BUFFER, File::open(&path)?);
        self.path = Some(path);
        self.read(&mut reader)
    }

    /// Parses the header and the whole IFD chain of `reader`
    pub fn read(&mut self, reader: &mut dyn SeekableReader) -> FilmResult<TIFF> {
        let head = header::read_header(reader)?;
        self.byte_order = Some(head.byte_order);
        self.handler = Some(head.byte_order.create_handler());
        self.is_big_tiff = head.big_tiff;
        debug!("First IFD offset: {}", head.first_ifd);

        let stream_len = header::stream_len(reader)?;
        header::check_ifd_offset(head.first_ifd, stream_len)?;

        let mut tiff = TIFF::new(head.big_tiff, head.byte_order);
        tiff.ifds = self.read_ifd_chain(reader, head.first_ifd, stream_len)?;
        if tiff.ifds.is_empty() {
            return Err(FilmError::InvalidHeader);
        }

        info!("{} IFD(s) found", tiff.ifd_count());
        Ok(tiff)
    }

    /// Follows next-IFD links from `first`
    ///
    /// Once one IFD was read, a broken link ends the chain with a warning
    /// instead of failing the file.
    fn read_ifd_chain(&self, reader: &mut dyn SeekableReader, first: u64,
                      stream_len: u64) -> FilmResult<Vec<IFD>> {
        let mut ifds: Vec<IFD> = Vec::new();
        let mut next = first;

        while next != 0 && ifds.len() < MAX_IFDS {
            let ifd = match self.read_ifd(reader, next, ifds.len()) {
                Ok(ifd) => ifd,
                Err(e) if ifds.is_empty() => return Err(e),
                Err(e) => {
                    warn!("Ignoring unreadable IFD #{}: {}", ifds.len(), e);
                    break;
                }
            };

            reader.seek(SeekFrom::Start(next + header::ifd_byte_len(&ifd, self.is_big_tiff)))?;
            next = header::read_offset(reader, self.is_big_tiff, self.handler()?)
                .unwrap_or_else(|e| {
                    warn!("Unreadable link after IFD #{}: {}", ifd.number, e);
                    0
                });
            if next != 0 && header::check_ifd_offset(next, stream_len).is_err() {
                warn!("IFD #{} links to offset {} outside the file", ifd.number, next);
                next = 0;
            }
            ifds.push(ifd);
        }

        Ok(ifds)
    }

    /// Reads the directory at `offset`; `number` is its position in the chain
    pub fn read_ifd(&self, reader: &mut dyn SeekableReader, offset: u64, number: usize) -> FilmResult<IFD> {
        reader.seek(SeekFrom::Start(offset))?;
        let entries = header::read_entry_count(reader, self.is_big_tiff, self.handler()?)?;

        let mut ifd = IFD::new(number, offset);
        for _ in 0..entries {
            ifd.add_entry(self.read_ifd_entry(reader)?);
        }
        debug!("IFD #{} at {}: {} entries", number, offset, entries);
        Ok(ifd)
    }

    /// One 12-byte (TIFF) or 20-byte (BigTIFF) entry
    ///
    /// Values that fit into the entry are decoded on the spot.
    fn read_ifd_entry(&self, reader: &mut dyn SeekableReader) -> FilmResult<IFDEntry> {
        let handler = self.handler()?;
        let tag = handler.read_u16(reader)?;
        let field_type = handler.read_u16(reader)?;
        let count = header::read_offset(reader, self.is_big_tiff, handler)?;

        let mut raw = [0u8; 8];
        let field = &mut raw[..if self.is_big_tiff { 8 } else { 4 }];
        reader.read_exact(field)?;
        let value_offset = header::read_offset(&mut Cursor::new(&*field), self.is_big_tiff, handler)?;

        let entry = IFDEntry::new(tag, field_type, count, value_offset);
        if !tag_utils::is_value_inline(&entry, self.is_big_tiff) {
            return Ok(entry);
        }
        Ok(match tag_utils::decode_inline_values(field, &entry, handler) {
            Ok(values) => entry.with_inline_values(values),
            Err(e) => {
                debug!("Tag {} keeps its raw field: {}", tag_utils::get_tag_name(tag), e);
                entry
            }
        })
    }

    /// All values of `tag`, widened to u64
    ///
    /// Rationals come back packed, see [`tag_utils::unpack_rational`].
    pub fn read_tag_values(&self, reader: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> FilmResult<Vec<u64>> {
        let entry = ifd.get_entry(tag).ok_or(FilmError::TagNotFound(tag))?;
        if tag_utils::is_value_inline(entry, self.is_big_tiff) {
            return Ok(entry.inline_values());
        }

        reader.seek(SeekFrom::Start(entry.value_offset))?;
        let mut values = Vec::with_capacity(entry.count as usize);
        tag_utils::read_tag_value_array(reader, entry, self.handler()?, &mut values)?;
        Ok(values)
    }

    /// First value of a resolution-style tag as a float
    ///
    /// `None` when the tag is absent, empty, or has a zero denominator.
    /// Integer-typed values are taken as they are.
    pub fn read_rational_tag(&self, reader: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> FilmResult<Option<f64>> {
        let Some(entry) = ifd.get_entry(tag) else {
            return Ok(None);
        };
        let first = match self.read_tag_values(reader, ifd, tag)?.first() {
            Some(&value) => value,
            None => return Ok(None),
        };
        if !entry.is_rational() {
            return Ok(Some(first as f64));
        }

        match tag_utils::unpack_rational(first) {
            (_, 0) => {
                warn!("{} has a zero denominator", tag_utils::get_tag_name(tag));
                Ok(None)
            }
            (numerator, denominator) => Ok(Some(f64::from(numerator) / f64::from(denominator))),
        }
    }

    /// ASCII tag without its NUL terminator(s)
    pub fn read_ascii_tag(&self, reader: &mut dyn SeekableReader, ifd: &IFD, tag: u16) -> FilmResult<Option<String>> {
        if !ifd.has_tag(tag) {
            return Ok(None);
        }
        let bytes: Vec<u8> = self.read_tag_values(reader, ifd, tag)?
            .into_iter()
            .map(|value| value as u8)
            .collect();
        let text = match bytes.iter().rposition(|&b| b != 0) {
            Some(last) => &bytes[..=last],
            None => &[][..],
        };

        std::str::from_utf8(text)
            .map(|s| Some(s.to_string()))
            .map_err(|e| FilmError::GenericError(format!("Invalid UTF-8 string: {}", e)))
    }

    /// Fresh buffered reader on the file passed to [`Self::load`]
    pub fn create_reader(&self) -> FilmResult<BufReader<File>> {
        let path = self.path.as_ref()
            .ok_or_else(|| FilmError::GenericError("No file path specified".to_string()))?;
        Ok(BufReader::with_capacity(READ_BUFFER, File::open(path)?))
    }

    pub fn is_big_tiff(&self) -> bool {
        self.is_big_tiff
    }

    /// Byte order of the last parsed file
    pub fn byte_order(&self) -> Option<ByteOrder> {
        self.byte_order
    }
}
