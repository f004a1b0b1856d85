use crate::errors::FilmResult;
use crate::tiff::constants::compression;

/// One TIFF compression scheme, applied strip by strip
pub trait CompressionHandler: Send + Sync {
    fn decompress(&self, data: &[u8]) -> FilmResult<Vec<u8>>;

    /// Inverse of `decompress`; the test fixtures use it to build scans
    fn compress(&self, data: &[u8]) -> FilmResult<Vec<u8>>;

    fn name(&self) -> &'static str;

    /// Value of the Compression tag this handler answers to
    fn code(&self) -> u64;
}

/// Compression 1. Most flatbed drivers write 48-bit RGB this way.
pub struct UncompressedHandler;

impl CompressionHandler for UncompressedHandler {
    fn decompress(&self, data: &[u8]) -> FilmResult<Vec<u8>> {
        Ok(Vec::from(data))
    }

    fn compress(&self, data: &[u8]) -> FilmResult<Vec<u8>> {
        self.decompress(data)
    }

    fn name(&self) -> &'static str {
        "Uncompressed"
    }

    fn code(&self) -> u64 {
        u64::from(compression::NONE)
    }
}
