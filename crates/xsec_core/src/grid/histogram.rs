//! Uniform 1D histogram used as a weighting function.

use super::UniformAxis;
use crate::types::GridError;
use serde::{Deserialize, Serialize};

/// One-dimensional histogram with equal-width bins.
///
/// # Example
///
/// ```
/// use xsec_core::grid::{Histogram1D, UniformAxis};
///
/// let axis = UniformAxis::new(4, 0.0, 4.0).unwrap();
/// let mut flux = Histogram1D::new("flux", axis);
/// flux.fill(0.5, 1.0);
/// flux.fill(2.5, 3.0);
/// flux.normalize();
///
/// assert_eq!(flux.content_at(2.9), 0.75);
/// assert_eq!(flux.content_at(10.0), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram1D {
    title: String,
    axis: UniformAxis,
    contents: Vec<f64>,
}

impl Histogram1D {
    /// Zero-filled histogram.
    pub fn new(title: impl Into<String>, axis: UniformAxis) -> Self {
        Self {
            title: title.into(),
            axis,
            contents: vec![0.0; axis.n_bins()],
        }
    }

    /// Histogram with explicit contents.
    pub fn from_contents(
        title: impl Into<String>,
        axis: UniformAxis,
        contents: Vec<f64>,
    ) -> Result<Self, GridError> {
        if contents.len() != axis.n_bins() {
            return Err(GridError::ContentsLength {
                got: contents.len(),
                expected: axis.n_bins(),
            });
        }
        Ok(Self {
            title: title.into(),
            axis,
            contents,
        })
    }

    /// Descriptive title.
    #[inline]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The binning.
    #[inline]
    pub fn axis(&self) -> &UniformAxis {
        &self.axis
    }

    /// Bin contents.
    #[inline]
    pub fn contents(&self) -> &[f64] {
        &self.contents
    }

    /// Add `weight` to the bin containing `x`.
    pub fn fill(&mut self, x: f64, weight: f64) -> Option<usize> {
        let i = self.axis.find_bin(x)?;
        self.contents[i] += weight;
        Some(i)
    }

    /// Content of the bin containing `x`; 0 outside the axis.
    pub fn content_at(&self, x: f64) -> f64 {
        self.axis
            .find_bin(x)
            .map_or(0.0, |i| self.contents[i])
    }

    /// Sum of bin contents.
    pub fn sum(&self) -> f64 {
        self.contents.iter().sum()
    }

    /// Sum of bin content times bin width.
    pub fn integral_width(&self) -> f64 {
        self.sum() * self.axis.width()
    }

    /// Multiply every bin by `factor`.
    pub fn scale(&mut self, factor: f64) {
        self.contents.iter_mut().for_each(|c| *c *= factor);
    }

    /// Rescale to unit sum. A histogram summing to zero is left unchanged.
    pub fn normalize(&mut self) {
        let sum = self.sum();
        if sum != 0.0 && sum != 1.0 {
            self.scale(1.0 / sum);
        }
    }
}
