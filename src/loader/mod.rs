//! Film scan loading
//!
//! Turns a TIFF file into a [`FilmImage`]: per-channel sample planes plus
//! the metadata of the scanned image.

pub mod plane;
pub mod film_image;
pub mod loader_strategy;
pub mod strip_strategy;
pub mod decoder_strategy;
pub mod film_loader;

pub use plane::Plane;
pub use film_image::{Channel, FilmImage};
pub use loader_strategy::{LoaderStrategy, LoaderStrategyFactory};
pub use strip_strategy::StripStrategy;
pub use decoder_strategy::DecoderStrategy;
pub use film_loader::FilmLoader;
