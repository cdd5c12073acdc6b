//! CLI command implementations
//!
//! One submodule per pipeline stage. Commands take the archive as
//! `&mut impl SurfaceArchive` so they run unchanged against the in-memory
//! archive in tests.

pub mod build;
pub mod flux;
pub mod interpolate;
pub mod list;
pub mod sample;
