//! Error types for structured error handling.
//!
//! This module provides:
//! - `InputShapeError`: Malformed sample sets rejected before any surface is built
//! - `GridError`: Invalid binning, shape mismatches and invalid numeric parameters
//! - `ArchiveError`: Failures looking up or persisting named surfaces
//! - `XsecError`: Umbrella error for the pipeline stages
//!
//! Lookups outside a surface's domain are deliberately absent from this
//! taxonomy: the resampler treats them as zero-valued bins.

use thiserror::Error;

/// Malformed or empty sample set.
///
/// Always fatal: the run is aborted before any surface is built.
///
/// # Examples
///
/// ```
/// use xsec_core::types::InputShapeError;
///
/// let err = InputShapeError::EmptySlice { slice: 3 };
/// assert_eq!(format!("{}", err), "Slice 3 has no samples");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputShapeError {
    /// The sample set contains no slices at all.
    #[error("Sample set is empty")]
    EmptySampleSet,

    /// A slice contains no samples.
    #[error("Slice {slice} has no samples")]
    EmptySlice {
        /// Slice index
        slice: usize,
    },

    /// A coordinate or value is NaN or infinite.
    #[error("Non-finite {field} in slice {slice} at sample {index}")]
    NonFinite {
        /// Slice index
        slice: usize,
        /// Sample index within the slice
        index: usize,
        /// Which field was non-finite
        field: &'static str,
    },

    /// An x value lies below the domain origin.
    #[error("Sample x = {x} in slice {slice} lies below the domain origin {origin}")]
    BelowOrigin {
        /// Slice index
        slice: usize,
        /// Offending x value
        x: f64,
        /// Domain origin
        origin: f64,
    },

    /// x decreases within a slice.
    #[error("Non-monotonic x in slice {slice} at sample {index}: {x} follows {previous}")]
    NonMonotonicX {
        /// Slice index
        slice: usize,
        /// Sample index within the slice
        index: usize,
        /// Preceding x value
        previous: f64,
        /// Offending x value
        x: f64,
    },

    /// Two samples in one slice share the same x.
    #[error("Duplicate x = {x} in slice {slice} at sample {index}")]
    DuplicateX {
        /// Slice index
        slice: usize,
        /// Sample index within the slice
        index: usize,
        /// Duplicated x value
        x: f64,
    },

    /// Slice coordinates are not strictly monotonic.
    #[error("Slice coordinates not strictly monotonic at slice {slice}: {y} follows {previous}")]
    NonMonotonicSlices {
        /// Slice index
        slice: usize,
        /// Preceding slice coordinate
        previous: f64,
        /// Offending slice coordinate
        y: f64,
    },

    /// A slice coordinate lies outside the y limit.
    #[error("Slice {slice} coordinate {y} outside [-{limit}, {limit}]")]
    SliceOutOfRange {
        /// Slice index
        slice: usize,
        /// Slice coordinate
        y: f64,
        /// Symmetric y limit
        limit: f64,
    },

    /// A cell did not receive exactly one sample.
    #[error("Cell {cell} received {hits} samples, expected exactly one")]
    CellFill {
        /// Cell index
        cell: usize,
        /// Number of samples mapped to the cell
        hits: usize,
    },
}

/// Grid construction and surface arithmetic errors.
///
/// # Examples
///
/// ```
/// use xsec_core::types::GridError;
///
/// let err = GridError::InvalidParameter {
///     name: "spacing",
///     value: "must be positive".to_string(),
/// };
/// assert!(err.to_string().contains("spacing"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    /// Axis with zero bins or invalid bounds.
    #[error("Invalid axis: {n_bins} bins over [{min}, {max}]")]
    InvalidAxis {
        /// Requested bin count
        n_bins: usize,
        /// Lower bound
        min: f64,
        /// Upper bound
        max: f64,
    },

    /// Two surfaces that must share a binning do not.
    #[error("Binning mismatch: {0}")]
    ShapeMismatch(String),

    /// Contents length does not match the binning.
    #[error("Contents length {got} does not match {expected} bins")]
    ContentsLength {
        /// Provided length
        got: usize,
        /// Expected number of bins
        expected: usize,
    },

    /// Invalid numeric parameter.
    #[error("Invalid parameter '{name}': {value}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Description of the invalid value
        value: String,
    },

    /// The weighting function integrates to zero over the sampled range.
    #[error("Weighting function integrates to zero over [{from}, {to})")]
    ZeroWeight {
        /// First sampled parameter
        from: f64,
        /// Upper edge of the weighting function
        to: f64,
    },
}

/// Named-surface archive errors.
///
/// # Examples
///
/// ```
/// use xsec_core::types::ArchiveError;
///
/// let err = ArchiveError::NotFound { name: "v10_5".to_string() };
/// assert_eq!(format!("{}", err), "Surface not found in archive: v10_5");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArchiveError {
    /// No entry stored under the requested name.
    #[error("Surface not found in archive: {name}")]
    NotFound {
        /// Requested key
        name: String,
    },

    /// Underlying storage failure.
    #[error("Archive I/O error: {0}")]
    Io(String),

    /// Stored data could not be encoded or decoded.
    #[error("Archive serialisation error: {0}")]
    Serialization(String),
}

/// Umbrella error for the pipeline stages.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum XsecError {
    /// Malformed input samples.
    #[error("Input shape error: {0}")]
    InputShape(#[from] InputShapeError),

    /// Grid or parameter error.
    #[error("Grid error: {0}")]
    Grid(#[from] GridError),

    /// Archive lookup or persistence error.
    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_shape_display() {
        let err = InputShapeError::DuplicateX {
            slice: 2,
            index: 5,
            x: 1.5,
        };
        assert_eq!(format!("{}", err), "Duplicate x = 1.5 in slice 2 at sample 5");
    }

    #[test]
    fn test_invalid_axis_display() {
        let err = GridError::InvalidAxis {
            n_bins: 0,
            min: 0.0,
            max: 1.0,
        };
        assert_eq!(format!("{}", err), "Invalid axis: 0 bins over [0, 1]");
    }

    #[test]
    fn test_from_archive_error() {
        let err: XsecError = ArchiveError::NotFound {
            name: "v1_5".to_string(),
        }
        .into();
        match err {
            XsecError::Archive(ArchiveError::NotFound { name }) => assert_eq!(name, "v1_5"),
            _ => panic!("Expected Archive variant"),
        }
    }

    #[test]
    fn test_error_trait_implementation() {
        let err = XsecError::from(InputShapeError::EmptySampleSet);
        let _: &dyn std::error::Error = &err;
        assert!(err.to_string().contains("empty"));
    }
}
