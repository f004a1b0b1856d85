//! Film scan loader
//!
//! Parses the TIFF structure, reads the metadata of the main image and
//! hands pixel decoding to the strategy chosen for its layout.

use log::info;

use crate::errors::{FilmError, FilmResult};
use crate::io::seekable::SeekableReader;
use crate::tiff::metadata::FilmMetadata;
use crate::tiff::reader::TiffReader;
use crate::tiff::types::TIFF;

use super::film_image::FilmImage;
use super::loader_strategy::LoaderStrategyFactory;

/// Loads film scans from TIFF files
pub struct FilmLoader {
    tiff_reader: TiffReader,
}

impl Default for FilmLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl FilmLoader {
    pub fn new() -> Self {
        FilmLoader {
            tiff_reader: TiffReader::new(),
        }
    }

    /// Loads and decodes a film scan from disk
    pub fn load(&mut self, path: &str) -> FilmResult<FilmImage> {
        let tiff = self.tiff_reader.load(path)?;
        let mut reader = self.tiff_reader.create_reader()?;
        self.decode(&tiff, &mut reader)
    }

    /// Loads and decodes a film scan from any seekable source
    pub fn load_from(&mut self, reader: &mut dyn SeekableReader) -> FilmResult<FilmImage> {
        let tiff = self.tiff_reader.read(reader)?;
        self.decode(&tiff, reader)
    }

    /// Parses structure and metadata without decoding pixels
    pub fn inspect(&mut self, path: &str) -> FilmResult<(TIFF, FilmMetadata)> {
        let tiff = self.tiff_reader.load(path)?;
        let mut reader = self.tiff_reader.create_reader()?;
        let ifd = tiff.main_ifd().ok_or(FilmError::InvalidHeader)?;
        let metadata = FilmMetadata::from_ifd(&self.tiff_reader, &mut reader, ifd)?;
        Ok((tiff, metadata))
    }

    fn decode(&self, tiff: &TIFF, reader: &mut dyn SeekableReader) -> FilmResult<FilmImage> {
        let ifd = tiff.main_ifd().ok_or(FilmError::InvalidHeader)?;
        let metadata = FilmMetadata::from_ifd(&self.tiff_reader, reader, ifd)?;

        let strategy = LoaderStrategyFactory::create_strategy(ifd, &metadata);
        info!("Decoding {}x{} image (IFD #{}) with the {}",
              metadata.width, metadata.height, ifd.number, strategy.name());

        let planes = strategy.load_planes(&self.tiff_reader, reader, ifd, &metadata)?;
        FilmImage::new(metadata, planes)
    }
}
