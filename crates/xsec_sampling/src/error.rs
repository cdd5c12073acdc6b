//! Error types for event sampling.

use thiserror::Error;
use xsec_core::types::ArchiveError;

/// Sampling and event-stream errors.
///
/// # Examples
///
/// ```
/// use xsec_sampling::SamplingError;
///
/// let err = SamplingError::NegativeContent { bin: 4, value: -1.0 };
/// assert_eq!(err.to_string(), "Bin 4 has negative content -1");
/// ```
#[derive(Error, Debug)]
pub enum SamplingError {
    /// Every bin of the surface is zero.
    #[error("Surface '{0}' has no positive content to sample from")]
    EmptySurface(String),

    /// A bin holds a negative value.
    #[error("Bin {bin} has negative content {value}")]
    NegativeContent {
        /// Flat bin index
        bin: usize,
        /// Offending content
        value: f64,
    },

    /// A bin holds NaN or an infinity.
    #[error("Bin {bin} has non-finite content")]
    NonFinite {
        /// Flat bin index
        bin: usize,
    },

    /// The surface has more bins than the sampler can index.
    #[error("Surface has {0} bins, too many to sample from")]
    TooManyBins(usize),

    /// Source surface could not be read.
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    /// Event sink failure.
    #[error("Event output error: {0}")]
    Io(#[from] std::io::Error),

    /// Event record could not be written.
    #[error("Event encoding error: {0}")]
    Csv(#[from] csv::Error),
}
