//! Uniformly binned axis.

use crate::types::GridError;
use serde::{Deserialize, Serialize};

/// Axis of `n_bins` equal-width bins covering `[min, max)`.
///
/// # Example
///
/// ```
/// use xsec_core::grid::UniformAxis;
///
/// let axis = UniformAxis::new(4, 0.0, 2.0).unwrap();
/// assert_eq!(axis.width(), 0.5);
/// assert_eq!(axis.center(1), 0.75);
/// assert_eq!(axis.find_bin(1.9), Some(3));
/// assert_eq!(axis.find_bin(2.0), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UniformAxis {
    n_bins: usize,
    min: f64,
    max: f64,
}

impl UniformAxis {
    /// Construct an axis.
    ///
    /// # Errors
    ///
    /// `GridError::InvalidAxis` if `n_bins == 0`, a bound is non-finite, or
    /// `max <= min`.
    pub fn new(n_bins: usize, min: f64, max: f64) -> Result<Self, GridError> {
        if n_bins == 0 || !min.is_finite() || !max.is_finite() || max <= min {
            return Err(GridError::InvalidAxis { n_bins, min, max });
        }
        Ok(Self { n_bins, min, max })
    }

    /// Number of bins.
    #[inline]
    pub fn n_bins(&self) -> usize {
        self.n_bins
    }

    /// Lower bound.
    #[inline]
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound.
    #[inline]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Bin width.
    #[inline]
    pub fn width(&self) -> f64 {
        (self.max - self.min) / self.n_bins as f64
    }

    /// Lower edge of bin `i`.
    #[inline]
    pub fn low_edge(&self, i: usize) -> f64 {
        self.min + i as f64 * self.width()
    }

    /// Centre of bin `i`.
    #[inline]
    pub fn center(&self, i: usize) -> f64 {
        self.min + (i as f64 + 0.5) * self.width()
    }

    /// Bin containing `v`, or `None` outside `[min, max)`.
    pub fn find_bin(&self, v: f64) -> Option<usize> {
        if !(v >= self.min && v < self.max) {
            return None;
        }
        let i = ((v - self.min) / self.width()) as usize;
        // Rounding can push values just below max into bin n_bins.
        Some(i.min(self.n_bins - 1))
    }

    /// Axis made of the first `n_bins` bins of `self`.
    ///
    /// # Errors
    ///
    /// `GridError::InvalidAxis` if `n_bins` is zero or exceeds the bin count.
    pub fn truncated(&self, n_bins: usize) -> Result<Self, GridError> {
        if n_bins == 0 || n_bins > self.n_bins {
            return Err(GridError::InvalidAxis {
                n_bins,
                min: self.min,
                max: self.max,
            });
        }
        if n_bins == self.n_bins {
            return Ok(*self);
        }
        Self::new(n_bins, self.min, self.low_edge(n_bins))
    }
}
