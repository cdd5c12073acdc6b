//! Uniform 2D histogram.

use super::UniformAxis;
use crate::types::GridError;
use serde::{Deserialize, Serialize};

/// Regular 2D grid of accumulated values.
///
/// # Grid Layout
///
/// Contents are stored row-major with the y index outermost:
/// `contents[iy * x_axis.n_bins() + ix]`.
///
/// # Example
///
/// ```
/// use xsec_core::grid::{DenseSurface, UniformAxis};
///
/// let x = UniformAxis::new(4, 0.0, 4.0).unwrap();
/// let y = UniformAxis::new(2, -1.0, 1.0).unwrap();
/// let mut surface = DenseSurface::new("v10_0", x, y);
///
/// surface.set(1, 0, 2.5);
/// assert_eq!(surface.get(1, 0), 2.5);
/// assert_eq!(surface.integral_width(), 2.5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseSurface {
    title: String,
    x_axis: UniformAxis,
    y_axis: UniformAxis,
    contents: Vec<f64>,
}

impl DenseSurface {
    /// Zero-filled surface over the given axes.
    pub fn new(title: impl Into<String>, x_axis: UniformAxis, y_axis: UniformAxis) -> Self {
        Self {
            title: title.into(),
            x_axis,
            y_axis,
            contents: vec![0.0; x_axis.n_bins() * y_axis.n_bins()],
        }
    }

    /// Surface with explicit contents.
    ///
    /// # Errors
    ///
    /// `GridError::ContentsLength` if `contents` does not hold one value per bin.
    pub fn from_contents(
        title: impl Into<String>,
        x_axis: UniformAxis,
        y_axis: UniformAxis,
        contents: Vec<f64>,
    ) -> Result<Self, GridError> {
        let expected = x_axis.n_bins() * y_axis.n_bins();
        if contents.len() != expected {
            return Err(GridError::ContentsLength {
                got: contents.len(),
                expected,
            });
        }
        Ok(Self {
            title: title.into(),
            x_axis,
            y_axis,
            contents,
        })
    }

    /// Descriptive title.
    #[inline]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Replace the title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// The x axis.
    #[inline]
    pub fn x_axis(&self) -> &UniformAxis {
        &self.x_axis
    }

    /// The y axis.
    #[inline]
    pub fn y_axis(&self) -> &UniformAxis {
        &self.y_axis
    }

    /// Bin contents, y-major.
    #[inline]
    pub fn contents(&self) -> &[f64] {
        &self.contents
    }

    #[inline]
    fn index(&self, ix: usize, iy: usize) -> usize {
        debug_assert!(ix < self.x_axis.n_bins() && iy < self.y_axis.n_bins());
        iy * self.x_axis.n_bins() + ix
    }

    /// Content of bin `(ix, iy)`.
    #[inline]
    pub fn get(&self, ix: usize, iy: usize) -> f64 {
        self.contents[self.index(ix, iy)]
    }

    /// Content of bin `(ix, iy)` with signed indices; 0 outside the grid.
    pub fn get_or_zero(&self, ix: i64, iy: i64) -> f64 {
        if ix < 0 || iy < 0 {
            return 0.0;
        }
        let (ix, iy) = (ix as usize, iy as usize);
        if ix >= self.x_axis.n_bins() || iy >= self.y_axis.n_bins() {
            return 0.0;
        }
        self.get(ix, iy)
    }

    /// Overwrite bin `(ix, iy)`.
    #[inline]
    pub fn set(&mut self, ix: usize, iy: usize, value: f64) {
        let i = self.index(ix, iy);
        self.contents[i] = value;
    }

    /// Add `weight` to the bin containing `(x, y)`; ignored outside the grid.
    pub fn fill(&mut self, x: f64, y: f64, weight: f64) -> Option<(usize, usize)> {
        let ix = self.x_axis.find_bin(x)?;
        let iy = self.y_axis.find_bin(y)?;
        let i = self.index(ix, iy);
        self.contents[i] += weight;
        Some((ix, iy))
    }

    /// Sum of all bin contents.
    pub fn sum(&self) -> f64 {
        self.contents.iter().sum()
    }

    /// Sum of bin content times bin area.
    pub fn integral_width(&self) -> f64 {
        self.sum() * self.x_axis.width() * self.y_axis.width()
    }

    /// Whether `other` has exactly the same axes.
    pub fn same_binning(&self, other: &DenseSurface) -> bool {
        self.x_axis == other.x_axis && self.y_axis == other.y_axis
    }

    /// Fail with `GridError::ShapeMismatch` unless `other` shares the binning.
    pub fn ensure_same_binning(&self, other: &DenseSurface) -> Result<(), GridError> {
        if self.same_binning(other) {
            Ok(())
        } else {
            Err(GridError::ShapeMismatch(format!(
                "'{}' is {}x{} over x [{}, {}), '{}' is {}x{} over x [{}, {})",
                self.title,
                self.x_axis.n_bins(),
                self.y_axis.n_bins(),
                self.x_axis.min(),
                self.x_axis.max(),
                other.title,
                other.x_axis.n_bins(),
                other.y_axis.n_bins(),
                other.x_axis.min(),
                other.x_axis.max(),
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn axes() -> (UniformAxis, UniformAxis) {
        (
            UniformAxis::new(4, 0.0, 2.0).unwrap(),
            UniformAxis::new(2, -1.0, 1.0).unwrap(),
        )
    }

    #[test]
    fn test_layout_is_y_major() {
        let (x, y) = axes();
        let mut s = DenseSurface::new("t", x, y);
        s.set(3, 1, 7.0);
        assert_eq!(s.contents()[7], 7.0);
    }

    #[test]
    fn test_from_contents_length_checked() {
        let (x, y) = axes();
        let err = DenseSurface::from_contents("t", x, y, vec![0.0; 7]).unwrap_err();
        assert_eq!(err, GridError::ContentsLength { got: 7, expected: 8 });
    }

    #[test]
    fn test_fill_accumulates() {
        let (x, y) = axes();
        let mut s = DenseSurface::new("t", x, y);
        assert_eq!(s.fill(0.1, 0.5, 1.0), Some((0, 1)));
        s.fill(0.2, 0.6, 2.0);
        assert_eq!(s.get(0, 1), 3.0);
        assert_eq!(s.fill(5.0, 0.0, 1.0), None);
    }

    #[test]
    fn test_get_or_zero_outside() {
        let (x, y) = axes();
        let s = DenseSurface::from_contents("t", x, y, vec![1.0; 8]).unwrap();
        assert_eq!(s.get_or_zero(-1, 0), 0.0);
        assert_eq!(s.get_or_zero(4, 0), 0.0);
        assert_eq!(s.get_or_zero(3, 1), 1.0);
    }

    #[test]
    fn test_integral_width() {
        let (x, y) = axes();
        let s = DenseSurface::from_contents("t", x, y, vec![2.0; 8]).unwrap();
        // 8 bins * 2.0 * (0.5 * 1.0)
        assert_relative_eq!(s.integral_width(), 8.0);
    }

    #[test]
    fn test_binning_mismatch() {
        let (x, y) = axes();
        let a = DenseSurface::new("a", x, y);
        let b = DenseSurface::new("b", UniformAxis::new(5, 0.0, 2.0).unwrap(), y);
        assert!(a.ensure_same_binning(&a.clone()).is_ok());
        assert!(matches!(
            a.ensure_same_binning(&b),
            Err(GridError::ShapeMismatch(_))
        ));
    }
}
