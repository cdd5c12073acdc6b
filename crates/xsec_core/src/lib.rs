//! # xsec_core: Surface Engine for Double-Differential Cross Sections
//!
//! ## Kernel Layer Role
//!
//! xsec_core turns irregularly tabulated cross-section data into uniform
//! surfaces and combines those surfaces across incident energy:
//! - Variable-grid construction with cell edges at sample midpoints (`math::grid_builder`)
//! - Resampling onto a uniform grid with run interpolation (`math::resampler`)
//! - Linear interpolation of whole surfaces between energies (`math::surface_interpolator`)
//! - Flux-weighted marginalisation over energy (`math::flux_weighting`)
//! - Grid types: `UniformAxis`, `PolySurface`, `DenseSurface`, `Histogram1D`, `SurfaceFamily` (`grid`)
//! - Sample types and errors: `SampleSet`, `InputShapeError`, `GridError`, `ArchiveError` (`types`)
//! - Named store abstraction: `SurfaceArchive`, `MemoryArchive` (`archive`)
//! - Archive-driven stages (`stages`)
//!
//! ## No I/O
//!
//! The kernel never touches the filesystem. Stages receive the archive as an
//! explicit argument; parsers and file-backed archives live in the adapter
//! and infrastructure crates.
//!
//! ## Usage Examples
//!
//! ```rust
//! use xsec_core::archive::{MemoryArchive, SurfaceArchive};
//! use xsec_core::grid::UniformAxis;
//! use xsec_core::math::GridBuilderOptions;
//! use xsec_core::stages::{run_grid_construction, run_interpolation, InterpolationPlan};
//! use xsec_core::types::SampleSet;
//!
//! let x = UniformAxis::new(40, 0.0, 4.0).unwrap();
//! let y = UniformAxis::new(2, -1.01, 1.01).unwrap();
//! let mut archive = MemoryArchive::new();
//!
//! for (energy, scale) in [(10.0, 1.0), (11.0, 2.0)] {
//!     let mut set = SampleSet::new(energy);
//!     let slice = set.begin_slice(0, 1.0);
//!     slice.push(1.0, 10.0 * scale);
//!     slice.push(3.0, 20.0 * scale);
//!     run_grid_construction(&mut archive, &set, &GridBuilderOptions::default(), x, y).unwrap();
//! }
//!
//! let plan = InterpolationPlan { param_min: 10.0, param_max: 11.0, spacing: 1.0, n_interps: 4 };
//! let report = run_interpolation(&mut archive, &plan).unwrap();
//! assert_eq!(report.written.len(), 4);
//! assert!(archive.contains("v10_6"));
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod archive;
pub mod grid;
pub mod math;
pub mod stages;
pub mod types;
