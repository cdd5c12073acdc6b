//! Tabulated samples grouped into slices.

use serde::{Deserialize, Serialize};

/// One tabulated point: primary coordinate `x`, slice coordinate `y` and
/// the cross-section `value` measured there.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Primary coordinate (outgoing kinetic energy)
    pub x: f64,
    /// Slice coordinate (cosine of the outgoing angle)
    pub y: f64,
    /// Tabulated value
    pub value: f64,
}

impl Sample {
    /// Create a sample.
    #[inline]
    pub fn new(x: f64, y: f64, value: f64) -> Self {
        Self { x, y, value }
    }
}

/// Samples sharing one slice coordinate, ordered by `x`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSlice {
    /// Integer code the slice coordinate was derived from (angle in degrees)
    pub code: i32,
    /// Slice coordinate shared by every sample
    pub y: f64,
    /// Samples in ascending `x`
    pub samples: Vec<Sample>,
}

impl SampleSlice {
    /// Create an empty slice.
    pub fn new(code: i32, y: f64) -> Self {
        Self {
            code,
            y,
            samples: Vec::new(),
        }
    }

    /// Append a sample at `(x, self.y)`.
    pub fn push(&mut self, x: f64, value: f64) {
        self.samples.push(Sample::new(x, self.y, value));
    }

    /// Number of samples in the slice.
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the slice holds no samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// All samples tabulated at one parameter value (incident energy).
///
/// Slices appear in the order they were read; their `y` values are expected
/// to be strictly monotonic and the samples inside each slice to have
/// strictly increasing `x`. Validation happens in the grid builder.
///
/// # Example
///
/// ```
/// use xsec_core::types::SampleSet;
///
/// let mut set = SampleSet::new(10.0);
/// set.begin_slice(0, 1.0).push(1.0, 5.0);
/// set.begin_slice(90, 0.0).push(2.0, 7.0);
///
/// assert_eq!(set.len(), 2);
/// assert_eq!(set.x_max(), Some(2.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSet {
    /// Parameter value shared by every sample
    pub parameter: f64,
    /// Slices in input order
    pub slices: Vec<SampleSlice>,
}

impl SampleSet {
    /// Create an empty set for the given parameter value.
    pub fn new(parameter: f64) -> Self {
        Self {
            parameter,
            slices: Vec::new(),
        }
    }

    /// Start a new slice and return it for filling.
    pub fn begin_slice(&mut self, code: i32, y: f64) -> &mut SampleSlice {
        self.slices.push(SampleSlice::new(code, y));
        let last = self.slices.len() - 1;
        &mut self.slices[last]
    }

    /// Total number of samples across all slices.
    pub fn len(&self) -> usize {
        self.slices.iter().map(SampleSlice::len).sum()
    }

    /// Whether the set holds no samples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Largest observed `x`, or `None` for an empty set.
    pub fn x_max(&self) -> Option<f64> {
        self.iter().map(|s| s.x).reduce(f64::max)
    }

    /// Iterate every sample in slice order.
    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.slices.iter().flat_map(|slice| slice.samples.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_push_uses_slice_coordinate() {
        let mut slice = SampleSlice::new(60, 0.5);
        slice.push(1.0, 2.0);
        assert_eq!(slice.samples[0], Sample::new(1.0, 0.5, 2.0));
    }

    #[test]
    fn test_len_counts_all_slices() {
        let mut set = SampleSet::new(5.0);
        let a = set.begin_slice(0, 1.0);
        a.push(1.0, 1.0);
        a.push(2.0, 1.0);
        set.begin_slice(5, 0.99).push(1.0, 1.0);
        assert_eq!(set.len(), 3);
        assert!(!set.is_empty());
    }

    #[test]
    fn test_empty_set() {
        let set = SampleSet::new(5.0);
        assert!(set.is_empty());
        assert_eq!(set.x_max(), None);
    }
}
