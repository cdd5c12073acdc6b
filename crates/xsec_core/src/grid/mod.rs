//! Grid objects exchanged between the pipeline stages.
//!
//! - [`UniformAxis`]: equal-width binning of one coordinate
//! - [`PolySurface`]: irregular grid with one cell per tabulated sample
//! - [`DenseSurface`]: uniform 2D histogram used for interpolation and sampling
//! - [`Histogram1D`]: uniform 1D histogram (weighting functions)
//! - [`SurfaceFamily`]: dense surfaces indexed by a continuous parameter

mod axis;
mod dense;
mod family;
mod histogram;
mod poly;

pub use axis::UniformAxis;
pub use dense::DenseSurface;
pub use family::{FamilyMember, SurfaceFamily, PARAMETER_TOLERANCE};
pub use histogram::Histogram1D;
pub use poly::{PolyCell, PolySurface};
