//! Configuration
//!
//! Defaults live in `filmkit.toml`, embedded at build time and parsed once.
//! A user file passed with `--config` is layered on top, key by key.

use lazy_static::lazy_static;
use log::{debug, info};
use std::fs;

use crate::errors::{FilmError, FilmResult};
use crate::loader::Channel;

lazy_static! {
    // Parse the embedded defaults at first use
    static ref DEFAULT_CONFIG: FilmConfig = {
        let content = include_str!("../filmkit.toml");
        let mut config = FilmConfig::default();
        match config.apply_str(content) {
            Ok(()) => config,
            Err(e) => {
                eprintln!("Warning: Failed to parse embedded filmkit.toml: {}", e);
                FilmConfig::default()
            }
        }
    };
}

/// Settings of the analysis itself
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Beam centre used when none is entered
    pub default_center: (f64, f64),
    pub channel: Channel,
}

/// Settings of the rendered figures
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub small_font: u32,
    pub medium_font: u32,
    pub large_font: u32,
    /// Maximum figure height in inches
    pub max_height: f64,
    /// Pixels per inch of the rendered figures
    pub dpi: u32,
    pub colormap: String,
    pub crosshair: [u8; 3],
    pub title_prefix: String,
}

/// Complete configuration
#[derive(Debug, Clone, PartialEq)]
pub struct FilmConfig {
    pub analysis: AnalysisConfig,
    pub render: RenderConfig,
}

impl Default for FilmConfig {
    fn default() -> Self {
        FilmConfig {
            analysis: AnalysisConfig {
                default_center: (877.0, 1460.0),
                channel: Channel::Red,
            },
            render: RenderConfig {
                small_font: 12,
                medium_font: 14,
                large_font: 18,
                max_height: 6.0,
                dpi: 100,
                colormap: "viridis".to_string(),
                crosshair: [255, 0, 0],
                title_prefix: "Film".to_string(),
            },
        }
    }
}

fn get_float(table: &toml::Value, key: &str) -> FilmResult<Option<f64>> {
    match table.get(key) {
        None => Ok(None),
        Some(v) => v.as_float()
            .or_else(|| v.as_integer().map(|i| i as f64))
            .map(Some)
            .ok_or_else(|| FilmError::ConfigError(format!("'{}' must be a number", key))),
    }
}

fn get_unsigned(table: &toml::Value, key: &str) -> FilmResult<Option<u32>> {
    match table.get(key) {
        None => Ok(None),
        Some(v) => v.as_integer()
            .and_then(|i| u32::try_from(i).ok())
            .filter(|i| *i > 0)
            .map(Some)
            .ok_or_else(|| FilmError::ConfigError(format!("'{}' must be a positive integer", key))),
    }
}

fn get_string(table: &toml::Value, key: &str) -> FilmResult<Option<String>> {
    match table.get(key) {
        None => Ok(None),
        Some(v) => v.as_str()
            .map(|s| Some(s.to_string()))
            .ok_or_else(|| FilmError::ConfigError(format!("'{}' must be a string", key))),
    }
}

impl FilmConfig {
    /// Embedded defaults
    pub fn defaults() -> FilmConfig {
        DEFAULT_CONFIG.clone()
    }

    /// Defaults with an optional user file applied on top
    pub fn load(path: Option<&str>) -> FilmResult<FilmConfig> {
        let mut config = Self::defaults();
        if let Some(path) = path {
            info!("Loading configuration from {}", path);
            let content = fs::read_to_string(path)?;
            config.apply_str(&content)?;
        }

        debug!("Configuration: {:?}", config);
        Ok(config)
    }

    /// Overwrites every setting present in a TOML document
    pub fn apply_str(&mut self, content: &str) -> FilmResult<()> {
        let value: toml::Value = content.parse()
            .map_err(|e| FilmError::ConfigError(format!("Failed to parse TOML: {}", e)))?;

        if let Some(analysis) = value.get("analysis") {
            self.apply_analysis(analysis)?;
        }
        if let Some(render) = value.get("render") {
            self.apply_render(render)?;
        }

        Ok(())
    }

    fn apply_analysis(&mut self, table: &toml::Value) -> FilmResult<()> {
        let analysis = &mut self.analysis;
        if let Some(x) = get_float(table, "default_center_x")? {
            analysis.default_center.0 = x;
        }
        if let Some(y) = get_float(table, "default_center_y")? {
            analysis.default_center.1 = y;
        }
        if let Some(channel) = get_string(table, "channel")? {
            analysis.channel = channel.parse()?;
        }
        Ok(())
    }

    fn apply_render(&mut self, table: &toml::Value) -> FilmResult<()> {
        let render = &mut self.render;
        if let Some(size) = get_unsigned(table, "small_font")? {
            render.small_font = size;
        }
        if let Some(size) = get_unsigned(table, "medium_font")? {
            render.medium_font = size;
        }
        if let Some(size) = get_unsigned(table, "large_font")? {
            render.large_font = size;
        }
        if let Some(height) = get_float(table, "max_height")? {
            if height <= 0.5 {
                return Err(FilmError::ConfigError(format!("max_height {} is too small", height)));
            }
            render.max_height = height;
        }
        if let Some(dpi) = get_unsigned(table, "dpi")? {
            render.dpi = dpi;
        }
        if let Some(colormap) = get_string(table, "colormap")? {
            render.colormap = colormap;
        }
        if let Some(title_prefix) = get_string(table, "title_prefix")? {
            render.title_prefix = title_prefix;
        }
        if let Some(crosshair) = table.get("crosshair") {
            render.crosshair = Self::parse_colour(crosshair)?;
        }
        Ok(())
    }

    fn parse_colour(value: &toml::Value) -> FilmResult<[u8; 3]> {
        let invalid = || FilmError::ConfigError("'crosshair' must be three integers 0-255".to_string());
        let parts = value.as_array().ok_or_else(invalid)?;
        if parts.len() != 3 {
            return Err(invalid());
        }

        let mut colour = [0u8; 3];
        for (slot, part) in colour.iter_mut().zip(parts) {
            *slot = part.as_integer()
                .and_then(|v| u8::try_from(v).ok())
                .ok_or_else(invalid)?;
        }
        Ok(colour)
    }
}
