//! Two-dimensional sample planes
//!
//! A plane stores one channel of an image in row-major order. Indexing is
//! `(x, y)` = (column, row), matching the TIFF pixel layout.

use std::ops::Range;

use crate::errors::{FilmError, FilmResult};

/// A single channel of samples in row-major order
#[derive(Debug, Clone, PartialEq)]
pub struct Plane<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

impl<T: Copy> Plane<T> {
    /// Creates a plane from row-major samples
    ///
    /// Fails when the sample count does not match `width * height`.
    pub fn new(width: usize, height: usize, data: Vec<T>) -> FilmResult<Self> {
        if data.len() != width * height {
            return Err(FilmError::GenericError(format!(
                "Plane of {}x{} needs {} samples, got {}",
                width, height, width * height, data.len()
            )));
        }

        Ok(Plane { width, height, data })
    }

    /// Creates a plane with every sample set to `value`
    pub fn filled(width: usize, height: usize, value: T) -> Self {
        Plane {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Creates a plane by evaluating `f(x, y)` for every pixel
    pub fn from_fn<F: Fn(usize, usize) -> T>(width: usize, height: usize, f: F) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }

        Plane { width, height, data }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Sample at column `x`, row `y`
    pub fn get(&self, x: usize, y: usize) -> T {
        self.data[y * self.width + x]
    }

    /// Row `y` as a slice
    pub fn row(&self, y: usize) -> &[T] {
        let start = y * self.width;
        &self.data[start..start + self.width]
    }

    /// All samples in row-major order
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Copies the given column and row ranges into a new plane
    ///
    /// Ranges are clipped to the plane, so an oversized request yields a
    /// smaller (possibly empty) plane rather than a panic.
    pub fn crop(&self, columns: Range<usize>, rows: Range<usize>) -> Plane<T> {
        let x0 = columns.start.min(self.width);
        let x1 = columns.end.clamp(x0, self.width);
        let y0 = rows.start.min(self.height);
        let y1 = rows.end.clamp(y0, self.height);

        let mut data = Vec::with_capacity((x1 - x0) * (y1 - y0));
        for y in y0..y1 {
            data.extend_from_slice(&self.row(y)[x0..x1]);
        }

        Plane {
            width: x1 - x0,
            height: y1 - y0,
            data,
        }
    }

    /// Applies `f` to every sample
    pub fn map<U, F: Fn(T) -> U>(&self, f: F) -> Plane<U> {
        Plane {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|v| f(*v)).collect(),
        }
    }
}

impl<T: Copy + PartialOrd> Plane<T> {
    /// Smallest and largest sample, `None` for an empty plane
    pub fn min_max(&self) -> Option<(T, T)> {
        let mut iter = self.data.iter().copied();
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), v| {
            (if v < lo { v } else { lo }, if v > hi { v } else { hi })
        }))
    }
}
