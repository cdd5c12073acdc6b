//! Error types for the loaders.

use std::path::PathBuf;
use thiserror::Error;

/// Input-table loading errors.
///
/// Line numbers are 1-based.
#[derive(Error, Debug)]
pub enum LoaderError {
    /// The file could not be opened or read.
    #[error("Cannot read {path}: {source}")]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Reading from the underlying reader failed.
    #[error("Read error at line {line}: {source}")]
    Read {
        /// Line being read
        line: usize,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The first line does not hold the incident energy.
    #[error("Missing or invalid incident-energy header: '{0}'")]
    Header(String),

    /// An angle line is not an integer number of degrees.
    #[error("Invalid angle at line {line}: '{text}'")]
    Angle {
        /// Line number
        line: usize,
        /// Line content
        text: String,
    },

    /// A data line does not hold three `mantissa(exponent)` fields.
    #[error("Malformed data at line {line}: {reason}")]
    Data {
        /// Line number
        line: usize,
        /// What was wrong
        reason: String,
    },

    /// A data line appears before any angle line.
    #[error("Data at line {0} precedes the first angle")]
    DataBeforeAngle(usize),
}
