//! User overrides for the crop request
//!
//! Overrides come from the command line or from interactive prompts. Each
//! one is optional; anything empty or unparsable falls back to its default
//! with a warning instead of aborting the run.

use lazy_static::lazy_static;
use log::warn;
use regex::Regex;
use std::io::{BufRead, Write};

use crate::errors::{FilmError, FilmResult};

lazy_static! {
    // "X,Y", "X Y" or "(X, Y)"
    static ref CENTER_PATTERN: Result<Regex, regex::Error> =
        Regex::new(r"^\(?\s*(-?\d+)\s*[, ]\s*(-?\d+)\s*\)?$");
}

/// Optional overrides for the beam centre and crop size, in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Overrides {
    pub center_x: Option<i64>,
    pub center_y: Option<i64>,
    pub width: Option<i64>,
    pub height: Option<i64>,
}

impl Overrides {
    /// Overrides with a centre and no size
    pub fn with_center(x: i64, y: i64) -> Self {
        Overrides {
            center_x: Some(x),
            center_y: Some(y),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Overrides::default()
    }
}

/// Parses one integer override
///
/// Empty input means "not given" and yields `Ok(None)`; anything that is
/// not an integer is an [`FilmError::InvalidOverride`].
pub fn parse_override(input: &str) -> FilmResult<Option<i64>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    trimmed.parse::<i64>()
        .map(Some)
        .map_err(|e| FilmError::InvalidOverride(format!("'{}': {}", trimmed, e)))
}

/// Parses a size override, which must be positive
pub fn parse_size(input: &str) -> FilmResult<Option<i64>> {
    match parse_override(input)? {
        Some(size) if size <= 0 => Err(FilmError::InvalidOverride(format!("size must be positive, got {}", size))),
        other => Ok(other),
    }
}

/// Parses a `X,Y` centre
pub fn parse_center(input: &str) -> FilmResult<(i64, i64)> {
    let pattern = CENTER_PATTERN.as_ref()
        .map_err(|e| FilmError::GenericError(format!("Centre pattern: {}", e)))?;
    let captures = pattern.captures(input.trim())
        .ok_or_else(|| FilmError::InvalidOverride(format!("'{}' is not a X,Y centre", input.trim())))?;

    let coordinate = |i: usize| -> FilmResult<i64> {
        captures[i].parse::<i64>()
            .map_err(|e| FilmError::InvalidOverride(format!("'{}': {}", &captures[i], e)))
    };

    Ok((coordinate(1)?, coordinate(2)?))
}

/// Turns a parse result into an optional value, logging rejected input
pub fn or_default(what: &str, parsed: FilmResult<Option<i64>>) -> Option<i64> {
    match parsed {
        Ok(value) => value,
        Err(e) => {
            warn!("Invalid {} ({}), using the default", what, e);
            None
        }
    }
}

fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W, message: &str) -> FilmResult<String> {
    write!(output, "{}", message)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line)
}

/// Asks for the centre and crop size on a terminal
///
/// When the x coordinate is missing or invalid the y prompt is skipped and
/// the default centre stays in place.
pub fn prompt_overrides<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> FilmResult<Overrides> {
    let mut overrides = Overrides::default();

    let x = or_default("x coordinate",
                       parse_override(&prompt(input, output, "Enter x coordinate of centre of beam spot: ")?));
    if let Some(x) = x {
        let y = or_default("y coordinate",
                           parse_override(&prompt(input, output, "Enter y coordinate of centre of beam spot: ")?));
        if y.is_some() {
            overrides.center_x = Some(x);
            overrides.center_y = y;
        }
    }

    overrides.width = or_default("width", parse_size(&prompt(
        input, output, "Enter width of beam spot in pixels, or leave blank for full image width: ")?));
    overrides.height = or_default("height", parse_size(&prompt(
        input, output, "Enter height of beam spot in pixels, or leave blank for full image height: ")?));

    Ok(overrides)
}
