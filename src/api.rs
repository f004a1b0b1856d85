use std::fs;
use std::path::Path;
use log::info;

use crate::analysis::{self, CropRequest, ProfileAnalysis};
use crate::config::FilmConfig;
use crate::errors::FilmResult;
use crate::loader::{Channel, FilmImage, FilmLoader};
use crate::overrides::Overrides;
use crate::render::{OutputPaths, Renderer};
use crate::tiff::metadata::FilmMetadata;

/// Main interface to the filmkit library
pub struct FilmKit {
    config: FilmConfig,
}

impl FilmKit {
    /// Create a new FilmKit instance
    ///
    /// # Arguments
    /// * `config_path` - Optional TOML file layered over the built-in defaults
    pub fn new(config_path: Option<&str>) -> FilmResult<Self> {
        Ok(FilmKit {
            config: FilmConfig::load(config_path)?,
        })
    }

    /// Create an instance from an already loaded configuration
    pub fn with_config(config: FilmConfig) -> Self {
        FilmKit { config }
    }

    pub fn config(&self) -> &FilmConfig {
        &self.config
    }

    /// Load and decode a film scan
    pub fn load(&self, input_path: &str) -> FilmResult<FilmImage> {
        FilmLoader::new().load(input_path)
    }

    /// Read the metadata of a film scan without decoding its pixels
    pub fn inspect(&self, input_path: &str) -> FilmResult<FilmMetadata> {
        let (_, metadata) = FilmLoader::new().inspect(input_path)?;
        Ok(metadata)
    }

    /// Build the crop request for an image from the configured defaults
    pub fn crop_request(&self, image: &FilmImage, overrides: &Overrides) -> CropRequest {
        CropRequest::from_overrides(self.config.analysis.default_center, overrides,
                                    image.width(), image.height())
    }

    /// Crop the beam spot and extract its profiles
    ///
    /// # Arguments
    /// * `image` - Decoded film scan
    /// * `overrides` - Centre and size overrides; unset values use the defaults
    /// * `channel` - Channel to analyse, the configured one when `None`
    pub fn analyze(&self, image: &FilmImage, overrides: &Overrides,
                   channel: Option<Channel>) -> FilmResult<ProfileAnalysis> {
        let request = self.crop_request(image, overrides);
        let channel = channel.unwrap_or(self.config.analysis.channel);
        info!("Analysing the {} channel around ({}, {}), {}x{} pixels",
              channel, request.center.0, request.center.1, request.width, request.height);

        analysis::run(image, channel, &request)
    }

    /// Write the region preview and both profile figures
    ///
    /// # Returns
    /// The paths of the files for `input_path` in `output_dir`
    pub fn render(&self, analysis: &ProfileAnalysis, input_path: &str, output_dir: &Path,
                  title: &str) -> FilmResult<OutputPaths> {
        fs::create_dir_all(output_dir)?;
        let paths = OutputPaths::for_input(input_path, output_dir);
        Renderer::new(&self.config.render, title).render_analysis(analysis, &paths)?;
        Ok(paths)
    }

    /// Write the 8-bit overview of the scan with the crop outlined
    pub fn render_overview(&self, image: &FilmImage, analysis: &ProfileAnalysis,
                           center: (f64, f64), input_path: &str, output_dir: &Path) -> FilmResult<OutputPaths> {
        fs::create_dir_all(output_dir)?;
        let paths = OutputPaths::for_input(input_path, output_dir);
        Renderer::new(&self.config.render, "")
            .render_overview(image, analysis, center, &paths.overview)?;
        Ok(paths)
    }

    /// Write the overview before analysis, marking only `center`
    ///
    /// Lets the user pick the beam centre ahead of the interactive prompts.
    pub fn preview_overview(&self, image: &FilmImage, channel: Option<Channel>, center: (f64, f64),
                            input_path: &str, output_dir: &Path) -> FilmResult<OutputPaths> {
        fs::create_dir_all(output_dir)?;
        let paths = OutputPaths::for_input(input_path, output_dir);
        let channel = channel.unwrap_or(self.config.analysis.channel);
        Renderer::new(&self.config.render, "").render_scan_overview(image, channel, center, &paths.overview)?;
        Ok(paths)
    }

    /// Default figure title for an input file
    pub fn default_title(&self, input_path: &str) -> String {
        let stem = Path::new(input_path)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("scan");
        format!("{} {}", self.config.render.title_prefix, stem)
    }
}
