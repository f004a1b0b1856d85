//! Beam spot analysis
//!
//! Crop resolution, profile extraction and the pixel to millimetre scale,
//! tied together by [`pipeline::run`].

pub mod scale;
pub mod region;
pub mod profile;
pub mod pipeline;

pub use scale::{scale_factor, CoordinateConverter};
pub use region::{resolve, CropBounds, CropRequest};
pub use profile::{extract, ProfileSet};
pub use pipeline::{run, ProfileAnalysis};
