pub mod errors;
pub mod io;
pub mod tiff;
pub mod utils;
pub mod compression;
pub mod loader;
pub mod analysis;
pub mod overrides;
pub mod config;
pub mod render;
pub mod commands;
pub mod api;

pub use crate::api::FilmKit;
pub use errors::{FilmError, FilmResult};
pub use tiff::TiffReader;
pub use loader::{Channel, FilmImage, FilmLoader, Plane};
pub use analysis::{CropBounds, CropRequest, ProfileAnalysis, ProfileSet};
pub use overrides::Overrides;
pub use config::FilmConfig;
