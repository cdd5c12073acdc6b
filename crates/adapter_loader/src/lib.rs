//! # adapter_loader: Input Adapters
//!
//! Converts external data into kernel types:
//! - [`table::TableLoader`]: tabulated double-differential cross sections to a
//!   [`SampleSet`](xsec_core::types::SampleSet)
//! - [`flux::sns_flux`]: stopped-muon electron-neutrino spectrum as a
//!   [`Histogram1D`](xsec_core::grid::Histogram1D)
//!
//! ## Usage Example
//!
//! ```rust
//! use adapter_loader::flux::sns_flux;
//! use adapter_loader::table::TableLoader;
//!
//! let text = "12.0\n0\n1.0(0) 0.5(0) 4.0(-50)\n";
//! let table = TableLoader::load_from_reader(text.as_bytes()).unwrap();
//! assert_eq!(table.set.parameter, 12.0);
//!
//! let flux = sns_flux(0.1).unwrap();
//! assert_eq!(flux.axis().min(), 0.0);
//! ```

#![deny(missing_docs)]

pub mod error;
pub mod flux;
pub mod table;

pub use error::LoaderError;
pub use flux::sns_flux;
pub use table::{LoadedTable, TableLoader};
