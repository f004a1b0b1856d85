//! Utility modules for common functionality
//!
//! Logging, progress reporting and the TIFF helpers shared by the reader
//! and the loader strategies.

pub mod logger;
pub(crate) mod progress;
pub(crate) mod tag_utils;
