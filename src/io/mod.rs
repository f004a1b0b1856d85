//! Low-level reading: the reader bound shared by all decoders and the
//! endianness strategies picked from the TIFF header.

pub mod byte_order;
pub mod seekable;
