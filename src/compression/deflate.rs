use std::io::{Read, Write};
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::errors::FilmResult;
use crate::tiff::constants::compression;
use super::handler::CompressionHandler;

/// Compression 8, and 32946 from older writers; each strip is a zlib stream
pub struct AdobeDeflateHandler;

impl CompressionHandler for AdobeDeflateHandler {
    fn decompress(&self, data: &[u8]) -> FilmResult<Vec<u8>> {
        // Deflate rarely does better than 1:4 on film scans
        let mut inflated = Vec::with_capacity(data.len() * 4);
        ZlibDecoder::new(data).read_to_end(&mut inflated)?;
        Ok(inflated)
    }

    fn compress(&self, data: &[u8]) -> FilmResult<Vec<u8>> {
        let mut encoder = ZlibEncoder::new(Vec::with_capacity(data.len() / 2), Compression::default());
        encoder.write_all(data)?;
        encoder.finish().map_err(Into::into)
    }

    fn name(&self) -> &'static str {
        "Adobe Deflate"
    }

    fn code(&self) -> u64 {
        u64::from(compression::DEFLATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deflate_restores_sample_bytes() {
        let handler = AdobeDeflateHandler;
        let samples: Vec<u8> = (0..512u32).flat_map(|v| (v as u16 * 97).to_le_bytes()).collect();

        let compressed = handler.compress(&samples).unwrap();
        assert_ne!(compressed, samples);
        assert_eq!(handler.decompress(&compressed).unwrap(), samples);
    }

    #[test]
    fn corrupt_stream_is_an_io_error() {
        let err = AdobeDeflateHandler.decompress(&[0xde, 0xad, 0xbe, 0xef]).unwrap_err();
        assert!(matches!(err, crate::errors::FilmError::IoError(_)));
    }
}
