//! Custom error types for film analysis

use std::fmt;
use std::io;

/// Errors raised while loading, analysing or rendering a film scan
#[derive(Debug)]
pub enum FilmError {
    /// I/O error
    IoError(io::Error),
    /// Invalid TIFF header
    InvalidHeader,
    /// Invalid byte order marker
    InvalidByteOrder(u16),
    /// Invalid BigTIFF header
    InvalidBigTIFFHeader,
    /// Unsupported TIFF version
    UnsupportedVersion(u16),
    /// Tag not found
    TagNotFound(u16),
    /// Unsupported field type
    UnsupportedFieldType(u16),
    /// Unsupported compression method
    UnsupportedCompression(u64),
    /// Sample layout the native decoder cannot handle
    UnsupportedLayout(String),
    /// Image dimensions not found
    MissingDimensions,
    /// Resolution metadata missing or unusable
    InvalidMetadata(String),
    /// Crop region collapsed or too small to profile
    RegionTooSmall(String),
    /// Malformed override value (recovered by the caller)
    InvalidOverride(String),
    /// Error reported by the image crate
    ImageError(image::ImageError),
    /// Chart rendering failure
    RenderError(String),
    /// Configuration file problem
    ConfigError(String),
    /// Generic error with message
    GenericError(String),
}

impl fmt::Display for FilmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilmError::IoError(e) => write!(f, "I/O error: {}", e),
            FilmError::InvalidHeader => write!(f, "Invalid TIFF header"),
            FilmError::InvalidByteOrder(v) => write!(f, "Invalid byte order marker: {:#06x}", v),
            FilmError::InvalidBigTIFFHeader => write!(f, "Invalid BigTIFF header"),
            FilmError::UnsupportedVersion(v) => write!(f, "Unsupported TIFF version: {}", v),
            FilmError::TagNotFound(tag) => write!(f, "Tag not found: {}", tag),
            FilmError::UnsupportedFieldType(ft) => write!(f, "Unsupported field type: {}", ft),
            FilmError::UnsupportedCompression(c) => write!(f, "Unsupported compression method: {}", c),
            FilmError::UnsupportedLayout(msg) => write!(f, "Unsupported sample layout: {}", msg),
            FilmError::MissingDimensions => write!(f, "Image dimensions not found"),
            FilmError::InvalidMetadata(msg) => write!(f, "Invalid metadata: {}", msg),
            FilmError::RegionTooSmall(msg) => write!(f, "Region too small: {}", msg),
            FilmError::InvalidOverride(msg) => write!(f, "Invalid override: {}", msg),
            FilmError::ImageError(e) => write!(f, "Image error: {}", e),
            FilmError::RenderError(msg) => write!(f, "Render error: {}", msg),
            FilmError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            FilmError::GenericError(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for FilmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FilmError::IoError(e) => Some(e),
            FilmError::ImageError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for FilmError {
    fn from(error: io::Error) -> Self {
        FilmError::IoError(error)
    }
}

impl From<image::ImageError> for FilmError {
    fn from(error: image::ImageError) -> Self {
        FilmError::ImageError(error)
    }
}

impl From<String> for FilmError {
    fn from(msg: String) -> Self {
        FilmError::GenericError(msg)
    }
}

/// Result type for film operations
pub type FilmResult<T> = Result<T, FilmError>;
