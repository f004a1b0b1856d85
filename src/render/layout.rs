//! Figure sizing
//!
//! Figures keep the cropped region at its aspect ratio inside a 2x4 grid:
//! rows split 1:2, columns 1:1:8:4 (colour bar, gap, image, side profile).

use crate::config::RenderConfig;

/// Height reserved for the title band, in inches
const TITLE_BAND_IN: f64 = 0.25;
/// Width added for labels, in inches
const LABEL_MARGIN_IN: f64 = 0.75;
const MIN_SIDE_PX: u32 = 240;
const MAX_SIDE_PX: u32 = 8000;

/// Pixel size of a profile figure
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FigureLayout {
    /// Figure width in inches
    pub width_in: f64,
    /// Figure height in inches
    pub height_in: f64,
    pub width_px: u32,
    pub height_px: u32,
}

impl FigureLayout {
    /// Sizes a figure for a region of `cols` x `rows` pixels
    pub fn for_region(cols: usize, rows: usize, config: &RenderConfig) -> Self {
        let ratio = if cols == 0 { 1.0 } else { rows.max(1) as f64 / cols as f64 };
        let height_in = config.max_height;
        let image_h = 2.0 * (height_in - TITLE_BAND_IN) / 3.0;
        let image_w = image_h / ratio;
        let width_in = 14.0 * image_w / 8.0 + LABEL_MARGIN_IN;

        let to_px = |inches: f64| ((inches * config.dpi as f64).round() as u32).clamp(MIN_SIDE_PX, MAX_SIDE_PX);

        FigureLayout {
            width_in,
            height_in,
            width_px: to_px(width_in),
            height_px: to_px(height_in),
        }
    }

    /// Column boundaries of the 1:1:8:4 grid, in pixels from the left
    pub fn column_breaks(&self) -> [u32; 3] {
        let unit = self.width_px as f64 / 14.0;
        [unit.round() as u32, (2.0 * unit).round() as u32, (10.0 * unit).round() as u32]
    }

    /// Height of the top row, in pixels
    pub fn top_row(&self) -> u32 {
        self.height_px / 3
    }
}
