//! Profile figures
//!
//! Draws the summed or sliced profiles around the cropped region: the
//! x profile above the image, the y profile to its right and a colour bar
//! on the left. Vertical axes run top-down like the image rows.

use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;
use std::path::Path;

use crate::analysis::ProfileAnalysis;
use crate::config::RenderConfig;
use crate::errors::FilmResult;

use super::layout::FigureLayout;
use super::{gradient, render_error, Normalizer};

const FONT: &str = "sans-serif";
const VALUE_LABEL: &str = "Mean pixel value";
/// Upper bound on heatmap cells per axis
const MAX_CELLS: usize = 160;
const COLOUR_BAR_STEPS: usize = 64;

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;

/// Which pair of profiles a figure shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileKind {
    /// Means over the whole region
    Summed,
    /// Means over the centre strips
    Sliced,
}

impl ProfileKind {
    pub fn name(&self) -> &'static str {
        match self {
            ProfileKind::Summed => "summed",
            ProfileKind::Sliced => "sliced",
        }
    }

    /// `(profile along x, profile along y)`
    fn profiles<'a>(&self, analysis: &'a ProfileAnalysis) -> (&'a [f64], &'a [f64]) {
        let set = &analysis.profiles;
        match self {
            ProfileKind::Summed => (&set.y_sum, &set.x_sum),
            ProfileKind::Sliced => (&set.y_slice, &set.x_slice),
        }
    }
}

/// Padded value range of a profile
fn value_range(values: &[f64]) -> Range<f64> {
    let (lo, hi) = values.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
    if !lo.is_finite() || !hi.is_finite() {
        return 0.0..1.0;
    }

    let pad = if hi > lo { (hi - lo) * 0.05 } else { lo.abs().max(1.0) * 0.05 };
    (lo - pad)..(hi + pad)
}

/// Physical span of an axis, never zero
fn span(extent_mm: f64, mm_per_pixel: f64) -> f64 {
    if extent_mm > 0.0 { extent_mm } else { mm_per_pixel }
}

/// Block-averaged heatmap cells as `(column, row, mean)` over a `cols` x `rows` grid
fn heatmap_cells(analysis: &ProfileAnalysis) -> (usize, usize, Vec<(usize, usize, f64)>) {
    let region = &analysis.region;
    let block = region.width().max(region.height()).div_ceil(MAX_CELLS).max(1);
    let cols = region.width().div_ceil(block);
    let rows = region.height().div_ceil(block);

    let mut cells = Vec::with_capacity(cols * rows);
    for row in 0..rows {
        for col in 0..cols {
            let xs = col * block..((col + 1) * block).min(region.width());
            let ys = row * block..((row + 1) * block).min(region.height());
            let count = xs.len() * ys.len();
            let sum: f64 = ys.flat_map(|y| xs.clone().map(move |x| (x, y)))
                .map(|(x, y)| region.get(x, y))
                .sum();
            cells.push((col, row, sum / count as f64));
        }
    }

    (cols, rows, cells)
}

fn draw_image(area: &Area, analysis: &ProfileAnalysis, config: &RenderConfig,
              normalizer: Normalizer) -> FilmResult<()> {
    let gradient = gradient(&config.colormap)?;
    let (w_ext, h_ext) = analysis.extent_mm();
    let (w, h) = (span(w_ext, analysis.scale.mm_per_pixel()), span(h_ext, analysis.scale.mm_per_pixel()));

    let mut chart = ChartBuilder::on(area)
        .set_label_area_size(LabelAreaPosition::Left, 50)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .margin(5)
        .build_cartesian_2d(0.0..w, 0.0..h)
        .map_err(render_error)?;

    let flip = |y: &f64| format!("{:.1}", h - y);
    chart.configure_mesh()
        .disable_mesh()
        .x_desc("Pixel x position (mm)")
        .y_desc("Pixel y position (mm)")
        .y_label_formatter(&flip)
        .label_style((FONT, config.small_font as f64))
        .axis_desc_style((FONT, config.medium_font as f64))
        .draw()
        .map_err(render_error)?;

    let (cols, rows, cells) = heatmap_cells(analysis);
    let (cell_w, cell_h) = (w / cols as f64, h / rows as f64);
    chart.draw_series(cells.into_iter().map(|(col, row, value)| {
        let c = gradient.eval_continuous(normalizer.normalize(value));
        let top = h - row as f64 * cell_h;
        Rectangle::new(
            [(col as f64 * cell_w, top), ((col + 1) as f64 * cell_w, top - cell_h)],
            RGBColor(c.r, c.g, c.b).filled(),
        )
    })).map_err(render_error)?;

    let (cx, cy) = analysis.crosshair_mm();
    let [r, g, b] = config.crosshair;
    let colour = RGBColor(r, g, b);
    chart.draw_series(LineSeries::new(vec![(0.0, h - cy), (w, h - cy)], colour.stroke_width(2)))
        .map_err(render_error)?;
    chart.draw_series(LineSeries::new(vec![(cx, 0.0), (cx, h)], colour.stroke_width(2)))
        .map_err(render_error)?;

    Ok(())
}

fn draw_top_profile(area: &Area, analysis: &ProfileAnalysis, values: &[f64],
                    config: &RenderConfig) -> FilmResult<()> {
    let (w_ext, _) = analysis.extent_mm();
    let w = span(w_ext, analysis.scale.mm_per_pixel());

    let mut chart = ChartBuilder::on(area)
        .caption("x axis profile", (FONT, config.medium_font as f64))
        .set_label_area_size(LabelAreaPosition::Left, 50)
        .set_label_area_size(LabelAreaPosition::Bottom, 20)
        .margin(5)
        .build_cartesian_2d(0.0..w, value_range(values))
        .map_err(render_error)?;

    chart.configure_mesh()
        .y_desc(VALUE_LABEL)
        .label_style((FONT, config.small_font as f64))
        .axis_desc_style((FONT, config.medium_font as f64))
        .draw()
        .map_err(render_error)?;

    let colour = colorous::TABLEAU10[0];
    chart.draw_series(LineSeries::new(
        analysis.column_axis_mm().into_iter().zip(values.iter().copied()),
        &RGBColor(colour.r, colour.g, colour.b),
    )).map_err(render_error)?;

    Ok(())
}

fn draw_side_profile(area: &Area, analysis: &ProfileAnalysis, values: &[f64],
                     config: &RenderConfig) -> FilmResult<()> {
    let (_, h_ext) = analysis.extent_mm();
    let h = span(h_ext, analysis.scale.mm_per_pixel());

    let mut chart = ChartBuilder::on(area)
        .caption("y axis profile", (FONT, config.medium_font as f64))
        .set_label_area_size(LabelAreaPosition::Left, 20)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .margin(5)
        .build_cartesian_2d(value_range(values), 0.0..h)
        .map_err(render_error)?;

    let flip = |y: &f64| format!("{:.1}", h - y);
    chart.configure_mesh()
        .x_desc(VALUE_LABEL)
        .x_labels(4)
        .y_label_formatter(&flip)
        .label_style((FONT, config.small_font as f64))
        .axis_desc_style((FONT, config.medium_font as f64))
        .draw()
        .map_err(render_error)?;

    let colour = colorous::TABLEAU10[0];
    chart.draw_series(LineSeries::new(
        values.iter().copied().zip(analysis.row_axis_mm().into_iter().map(|y| h - y)),
        &RGBColor(colour.r, colour.g, colour.b),
    )).map_err(render_error)?;

    Ok(())
}

fn draw_colour_bar(area: &Area, normalizer: Normalizer, config: &RenderConfig) -> FilmResult<()> {
    let gradient = gradient(&config.colormap)?;
    let range = if normalizer.max > normalizer.min {
        normalizer.min..normalizer.max
    } else {
        (normalizer.min - 0.5)..(normalizer.min + 0.5)
    };

    let mut chart = ChartBuilder::on(area)
        .set_label_area_size(LabelAreaPosition::Left, 45)
        .margin(5)
        .build_cartesian_2d(0.0..1.0, range.clone())
        .map_err(render_error)?;

    chart.configure_mesh()
        .disable_mesh()
        .x_labels(0)
        .y_labels(6)
        .label_style((FONT, config.small_font as f64))
        .draw()
        .map_err(render_error)?;

    let step = (range.end - range.start) / COLOUR_BAR_STEPS as f64;
    chart.draw_series((0..COLOUR_BAR_STEPS).map(|i| {
        let c = gradient.eval_rational(i, COLOUR_BAR_STEPS);
        let y0 = range.start + i as f64 * step;
        Rectangle::new([(0.0, y0), (1.0, y0 + step)], RGBColor(c.r, c.g, c.b).filled())
    })).map_err(render_error)?;

    Ok(())
}

/// Draws one profile figure to an SVG file
pub fn draw_profile_figure(analysis: &ProfileAnalysis, kind: ProfileKind, config: &RenderConfig,
                           title: &str, path: &Path) -> FilmResult<()> {
    let layout = FigureLayout::for_region(analysis.region.width(), analysis.region.height(), config);
    let (along_x, along_y) = kind.profiles(analysis);
    let (lo, hi) = analysis.region.min_max().unwrap_or((0.0, 0.0));
    let normalizer = Normalizer::new(lo, hi);

    let root = SVGBackend::new(path, (layout.width_px, layout.height_px)).into_drawing_area();
    root.fill(&WHITE).map_err(render_error)?;
    let root = root.titled(title, (FONT, config.large_font as f64)).map_err(render_error)?;

    let [bar_end, gap_end, image_end] = layout.column_breaks().map(|x| x as i32);
    let (top, bottom) = root.split_vertically(layout.top_row() as i32);

    let (_, top_rest) = top.split_horizontally(gap_end);
    let (top_profile, _) = top_rest.split_horizontally(image_end - gap_end);

    let (bar, bottom_rest) = bottom.split_horizontally(bar_end);
    let (_, bottom_rest) = bottom_rest.split_horizontally(gap_end - bar_end);
    let (image, side_profile) = bottom_rest.split_horizontally(image_end - gap_end);

    draw_top_profile(&top_profile, analysis, along_x, config)?;
    draw_image(&image, analysis, config, normalizer)?;
    draw_side_profile(&side_profile, analysis, along_y, config)?;
    draw_colour_bar(&bar, normalizer, config)?;

    root.present().map_err(render_error)?;
    Ok(())
}
