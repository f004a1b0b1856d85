use std::io::{Read, Seek};

/// Anything the TIFF reader can walk: files, buffered files, in-memory cursors
///
/// Strip decoding jumps around the file, so plain `Read` is not enough.
pub trait SeekableReader: Read + Seek + Send + Sync {}

impl<T> SeekableReader for T where T: Read + Seek + Send + Sync {}
