//! Figure rendering
//!
//! Presentation output of an analysis: a colour-mapped PNG of the cropped
//! region, SVG figures of the summed and sliced profiles, and an optional
//! 8-bit overview of the whole scan for picking the beam centre.

pub mod layout;
pub mod preview;
pub mod charts;

use log::info;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::analysis::ProfileAnalysis;
use crate::config::RenderConfig;
use crate::errors::{FilmError, FilmResult};
use crate::loader::{Channel, FilmImage};

pub use charts::ProfileKind;
pub use layout::FigureLayout;

/// Looks up a colour gradient by name
pub fn gradient(name: &str) -> FilmResult<colorous::Gradient> {
    match name.trim().to_lowercase().as_str() {
        "viridis" => Ok(colorous::VIRIDIS),
        "magma" => Ok(colorous::MAGMA),
        "inferno" => Ok(colorous::INFERNO),
        "plasma" => Ok(colorous::PLASMA),
        "cividis" => Ok(colorous::CIVIDIS),
        "turbo" => Ok(colorous::TURBO),
        "greys" | "gray" | "grey" => Ok(colorous::GREYS),
        other => Err(FilmError::ConfigError(format!("Unknown colormap: {}", other))),
    }
}

/// Maps sample values onto `[0, 1]` for a gradient
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalizer {
    pub min: f64,
    pub max: f64,
}

impl Normalizer {
    pub fn new(min: f64, max: f64) -> Self {
        Normalizer { min, max }
    }

    pub fn normalize(&self, value: f64) -> f64 {
        if self.max <= self.min {
            return 0.5;
        }
        ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }
}

/// Wraps a plotters error
pub(crate) fn render_error<E: fmt::Display>(e: E) -> FilmError {
    FilmError::RenderError(e.to_string())
}

/// Files written for one scan
#[derive(Debug, Clone, PartialEq)]
pub struct OutputPaths {
    pub region: PathBuf,
    pub summed: PathBuf,
    pub sliced: PathBuf,
    pub overview: PathBuf,
}

impl OutputPaths {
    /// Output names derived from the input file's stem
    pub fn for_input(input: &str, output_dir: &Path) -> Self {
        let stem = Path::new(input)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("film");

        OutputPaths {
            region: output_dir.join(format!("{}_region.png", stem)),
            summed: output_dir.join(format!("{}_summed.svg", stem)),
            sliced: output_dir.join(format!("{}_sliced.svg", stem)),
            overview: output_dir.join(format!("{}_overview.png", stem)),
        }
    }
}

/// Writes all figures of an analysis
pub struct Renderer<'a> {
    config: &'a RenderConfig,
    title: String,
}

impl<'a> Renderer<'a> {
    pub fn new(config: &'a RenderConfig, title: &str) -> Self {
        Renderer {
            config,
            title: title.to_string(),
        }
    }

    /// Region preview plus both profile figures
    pub fn render_analysis(&self, analysis: &ProfileAnalysis, paths: &OutputPaths) -> FilmResult<()> {
        preview::write_region_png(analysis, self.config, &paths.region)?;
        info!("Wrote {}", paths.region.display());

        for (kind, path) in [(ProfileKind::Summed, &paths.summed), (ProfileKind::Sliced, &paths.sliced)] {
            let title = format!("{} {} profile", self.title, kind.name());
            charts::draw_profile_figure(analysis, kind, self.config, &title, path)?;
            info!("Wrote {}", path.display());
        }

        Ok(())
    }

    /// 8-bit overview of the full scan with the crop outlined
    pub fn render_overview(&self, image: &FilmImage, analysis: &ProfileAnalysis,
                           center: (f64, f64), path: &Path) -> FilmResult<()> {
        let plane = image.channel(analysis.channel)?;
        let overview = preview::overview_image(plane, image.metadata.bits_per_sample,
                                               center, Some(&analysis.bounds),
                                               self.config.crosshair);
        overview.save(path)?;
        info!("Wrote {}", path.display());
        Ok(())
    }

    /// Overview with only the centre marked, for picking the beam centre
    /// before any crop exists
    pub fn render_scan_overview(&self, image: &FilmImage, channel: Channel,
                                center: (f64, f64), path: &Path) -> FilmResult<()> {
        let plane = image.channel(channel)?;
        preview::overview_image(plane, image.metadata.bits_per_sample, center, None, self.config.crosshair)
            .save(path)?;
        info!("Wrote {}", path.display());
        Ok(())
    }
}
