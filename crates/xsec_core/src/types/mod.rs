//! Core data types.
//!
//! - [`Sample`], [`SampleSlice`], [`SampleSet`]: tabulated input points
//! - Error types: [`InputShapeError`], [`GridError`], [`ArchiveError`], [`XsecError`]

pub mod error;
pub mod sample;

pub use error::{ArchiveError, GridError, InputShapeError, XsecError};
pub use sample::{Sample, SampleSet, SampleSlice};
