//! Numerical pipeline stages.
//!
//! - [`grid_builder`]: sample set to variable-grid surface
//! - [`resampler`]: variable-grid surface to dense surface
//! - [`surface_interpolator`]: dense surfaces at intermediate parameters
//! - [`flux_weighting`]: weighted marginal over the parameter axis

pub mod flux_weighting;
pub mod grid_builder;
pub mod resampler;
pub mod surface_interpolator;

pub use flux_weighting::{
    weight_surfaces, FluxWeighted, FluxWeighter, Normalization, WeightingOptions,
};
pub use grid_builder::{build_poly_surface, GridBuilderOptions};
pub use resampler::{resample, ResampleStats};
pub use surface_interpolator::{
    fill_gaps, param_offset_to_x_bin, GapInterpolator, InterpolatedSurface, NumericAnomaly,
};
