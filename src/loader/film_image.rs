//! Decoded film scan

use std::fmt;
use std::str::FromStr;
use log::debug;

use crate::errors::{FilmError, FilmResult};
use crate::tiff::metadata::FilmMetadata;

use super::plane::Plane;

/// Colour channel of an RGB scan
///
/// Radiochromic film is usually read in the red channel, where the dye
/// response is strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Channel {
    #[default]
    Red,
    Green,
    Blue,
}

impl Channel {
    /// Sample index of this channel in an RGB pixel
    pub fn index(&self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Channel::Red => "red",
            Channel::Green => "green",
            Channel::Blue => "blue",
        }
    }
}

impl FromStr for Channel {
    type Err = FilmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "red" | "r" => Ok(Channel::Red),
            "green" | "g" => Ok(Channel::Green),
            "blue" | "b" => Ok(Channel::Blue),
            other => Err(FilmError::ConfigError(format!("Unknown channel: {}", other))),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A film scan decoded into per-channel planes
#[derive(Debug, Clone)]
pub struct FilmImage {
    /// Metadata of the IFD the planes were decoded from
    pub metadata: FilmMetadata,
    planes: Vec<Plane<u16>>,
}

impl FilmImage {
    /// Creates an image from decoded planes
    ///
    /// All planes must share the metadata's dimensions.
    pub fn new(metadata: FilmMetadata, planes: Vec<Plane<u16>>) -> FilmResult<Self> {
        if planes.is_empty() {
            return Err(FilmError::UnsupportedLayout("Image has no sample planes".to_string()));
        }

        let (width, height) = (metadata.width as usize, metadata.height as usize);
        if let Some(plane) = planes.iter().find(|p| p.width() != width || p.height() != height) {
            return Err(FilmError::UnsupportedLayout(format!(
                "Plane is {}x{} but the image is {}x{}",
                plane.width(), plane.height(), width, height
            )));
        }

        Ok(FilmImage { metadata, planes })
    }

    pub fn width(&self) -> usize {
        self.metadata.width as usize
    }

    pub fn height(&self) -> usize {
        self.metadata.height as usize
    }

    pub fn plane_count(&self) -> usize {
        self.planes.len()
    }

    /// Returns the plane for a colour channel
    ///
    /// Greyscale scans have a single plane, which serves every channel.
    pub fn channel(&self, channel: Channel) -> FilmResult<&Plane<u16>> {
        if self.planes.len() == 1 {
            debug!("Single-plane image, using it for the {} channel", channel);
            return Ok(&self.planes[0]);
        }

        self.planes.get(channel.index()).ok_or_else(|| {
            FilmError::UnsupportedLayout(format!(
                "No {} channel in an image with {} planes", channel, self.planes.len()
            ))
        })
    }
}
