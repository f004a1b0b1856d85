//! Compression tag to handler lookup

use crate::errors::{FilmError, FilmResult};
use crate::tiff::constants::compression;
use super::deflate::AdobeDeflateHandler;
use super::handler::{CompressionHandler, UncompressedHandler};
use super::zstd::ZstdHandler;

pub struct CompressionFactory;

impl CompressionFactory {
    /// Handler for a Compression tag value, or `UnsupportedCompression`
    pub fn create_handler(code: u64) -> FilmResult<Box<dyn CompressionHandler>> {
        match code as u16 {
            compression::NONE => Ok(Box::new(UncompressedHandler)),
            compression::DEFLATE | compression::DEFLATE_OLD => Ok(Box::new(AdobeDeflateHandler)),
            compression::ZSTD => Ok(Box::new(ZstdHandler::new())),
            _ => Err(FilmError::UnsupportedCompression(code))
        }
    }

    /// Whether the native strip decoder can handle this compression code
    pub fn is_supported(code: u64) -> bool {
        Self::create_handler(code).is_ok()
    }
}
