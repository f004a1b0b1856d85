use log::{debug, warn};

use crate::errors::{FilmError, FilmResult};
use crate::tiff::constants::compression;
use super::handler::CompressionHandler;

const DEFAULT_LEVEL: i32 = 3;

/// Compression 14, as written by GDAL and recent libtiff
pub struct ZstdHandler {
    level: i32,
}

impl ZstdHandler {
    pub fn new() -> Self {
        Self::with_level(DEFAULT_LEVEL)
    }

    /// `level` is clamped to the range zstd accepts (1..=22)
    pub fn with_level(level: i32) -> Self {
        ZstdHandler { level: level.clamp(1, 22) }
    }
}

impl Default for ZstdHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl CompressionHandler for ZstdHandler {
    fn decompress(&self, data: &[u8]) -> FilmResult<Vec<u8>> {
        if data.is_empty() {
            return Ok(Vec::new());
        }
        match zstd::decode_all(data) {
            Ok(bytes) => {
                debug!("zstd strip: {} -> {} bytes", data.len(), bytes.len());
                Ok(bytes)
            }
            Err(e) => {
                warn!("Corrupt zstd strip: {}", e);
                Err(FilmError::GenericError(format!("ZSTD decompression error: {}", e)))
            }
        }
    }

    fn compress(&self, data: &[u8]) -> FilmResult<Vec<u8>> {
        if data.is_empty() {
            return Ok(Vec::new());
        }
        zstd::encode_all(data, self.level)
            .map_err(|e| FilmError::GenericError(format!("ZSTD compression error: {}", e)))
    }

    fn name(&self) -> &'static str {
        "ZSTD"
    }

    fn code(&self) -> u64 {
        u64::from(compression::ZSTD)
    }
}
