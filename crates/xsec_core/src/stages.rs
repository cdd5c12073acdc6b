//! Archive-driven pipeline stages.
//!
//! Each stage takes the archive explicitly and documents the keys it reads
//! and writes:
//!
//! | Stage | Reads | Writes |
//! |-------|-------|--------|
//! | [`run_grid_construction`] | - | `surface_key(p)` |
//! | [`run_interpolation`] | `surface_key(lo)`, `surface_key(hi)` per gap | one key per intermediate |
//! | [`run_flux_weighting`] | spectrum, `surface_key(p)` per sample | output surface |

use crate::archive::{surface_key, SurfaceArchive};
use crate::grid::{SurfaceFamily, UniformAxis};
use crate::math::flux_weighting::{weight_surfaces, FluxWeighted, WeightingOptions};
use crate::math::grid_builder::{build_poly_surface, GridBuilderOptions};
use crate::math::resampler::{resample, ResampleStats};
use crate::math::surface_interpolator::{fill_gaps, NumericAnomaly};
use crate::types::{GridError, SampleSet, XsecError};
use tracing::{info, warn};

/// Resolution of [`surface_key`].
const KEY_RESOLUTION: f64 = 0.1;

/// Summary of [`run_grid_construction`].
#[derive(Debug, Clone, PartialEq)]
pub struct GridReport {
    /// Archive key written
    pub key: String,
    /// Number of variable-grid cells
    pub cells: usize,
    /// Resampling counters
    pub stats: ResampleStats,
}

/// Build, resample and store the surface for one sample set.
///
/// The dense surface is stored under `surface_key(set.parameter)`.
///
/// # Example
///
/// ```
/// use xsec_core::archive::{MemoryArchive, SurfaceArchive};
/// use xsec_core::grid::UniformAxis;
/// use xsec_core::math::GridBuilderOptions;
/// use xsec_core::stages::run_grid_construction;
/// use xsec_core::types::SampleSet;
///
/// let mut set = SampleSet::new(20.0);
/// set.begin_slice(0, 1.0).push(5.0, 2.0);
///
/// let mut archive = MemoryArchive::new();
/// let x = UniformAxis::new(10, 0.0, 10.0).unwrap();
/// let y = UniformAxis::new(4, -1.01, 1.01).unwrap();
/// let report = run_grid_construction(&mut archive, &set, &GridBuilderOptions::default(), x, y).unwrap();
///
/// assert_eq!(report.key, "v20_0");
/// assert!(archive.contains("v20_0"));
/// ```
pub fn run_grid_construction(
    archive: &mut impl SurfaceArchive,
    set: &SampleSet,
    options: &GridBuilderOptions,
    x_axis: UniformAxis,
    y_axis: UniformAxis,
) -> Result<GridReport, XsecError> {
    let poly = build_poly_surface(set, options)?;
    let key = surface_key(set.parameter);
    let title = format!("Differential Cross Section: E_v = {:.1} MeV", set.parameter);
    let (dense, stats) = resample(&poly, x_axis, y_axis, &title);
    archive.put_surface(&key, &dense)?;

    info!(key = %key, cells = poly.n_cells(), runs = stats.runs, "Stored surface");
    Ok(GridReport {
        key,
        cells: poly.n_cells(),
        stats,
    })
}

/// Parameter range and density of an interpolation run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterpolationPlan {
    /// Lowest stored parameter
    pub param_min: f64,
    /// Highest stored parameter
    pub param_max: f64,
    /// Spacing of stored parameters
    pub spacing: f64,
    /// Intermediate surfaces per gap
    pub n_interps: usize,
}

impl InterpolationPlan {
    /// Check the plan.
    ///
    /// # Errors
    ///
    /// `GridError::InvalidParameter` for non-finite bounds, `param_min >
    /// param_max` or a non-positive spacing.
    pub fn validate(&self) -> Result<(), GridError> {
        if !(self.param_min.is_finite() && self.param_max.is_finite()) {
            return Err(GridError::InvalidParameter {
                name: "param_min/param_max",
                value: format!("[{}, {}]", self.param_min, self.param_max),
            });
        }
        if self.param_min > self.param_max {
            return Err(GridError::InvalidParameter {
                name: "param_min",
                value: format!("{} exceeds param_max {}", self.param_min, self.param_max),
            });
        }
        if !(self.spacing.is_finite() && self.spacing > 0.0) {
            return Err(GridError::InvalidParameter {
                name: "spacing",
                value: format!("{} must be positive", self.spacing),
            });
        }
        Ok(())
    }

    /// Number of gaps, `round((max - min) / spacing)`.
    pub fn n_gaps(&self) -> usize {
        ((self.param_max - self.param_min) / self.spacing).round() as usize
    }

    /// Lower bound of gap `g`.
    #[inline]
    pub fn gap_start(&self, g: usize) -> f64 {
        self.param_min + g as f64 * self.spacing
    }
}

/// Summary of [`run_interpolation`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterpolationReport {
    /// Keys written, in ascending parameter order
    pub written: Vec<String>,
    /// Negative-value reports
    pub anomalies: Vec<NumericAnomaly>,
}

/// Synthesise and store the intermediate surfaces of every gap in `plan`.
///
/// # Errors
///
/// - `ArchiveError::NotFound` (wrapped) if a gap endpoint is missing
/// - `GridError` for an invalid plan or mismatched endpoint binning
pub fn run_interpolation(
    archive: &mut impl SurfaceArchive,
    plan: &InterpolationPlan,
) -> Result<InterpolationReport, XsecError> {
    plan.validate()?;
    if plan.n_interps > 0 && plan.spacing / ((plan.n_interps + 1) as f64) < KEY_RESOLUTION - 1e-9 {
        warn!(
            spacing = plan.spacing,
            n_interps = plan.n_interps,
            "Interpolation step is finer than the archive key resolution; keys will collide"
        );
    }

    let mut report = InterpolationReport::default();
    for g in 0..plan.n_gaps() {
        let lo = plan.gap_start(g);
        let hi = lo + plan.spacing;
        let mut gap = SurfaceFamily::new();
        gap.insert(lo, archive.surface(&surface_key(lo))?);
        gap.insert(hi, archive.surface(&surface_key(hi))?);

        report
            .anomalies
            .extend(fill_gaps(&mut gap, plan.spacing, plan.n_interps)?);

        // Endpoints are already stored
        let members = gap.members();
        let inner = members.len().saturating_sub(1);
        for member in members.iter().take(inner).skip(1) {
            let key = surface_key(member.parameter);
            archive.put_surface(&key, &member.surface)?;
            report.written.push(key);
        }
    }

    info!(
        gaps = plan.n_gaps(),
        written = report.written.len(),
        anomalies = report.anomalies.len(),
        "Interpolation complete"
    );
    Ok(report)
}

/// Flux-weight the stored family against the spectrum `spectrum_name` and
/// store the marginal under `output_name`.
///
/// # Errors
///
/// - `ArchiveError::NotFound` (wrapped) for a missing spectrum or surface
/// - `GridError` from the weighting itself
pub fn run_flux_weighting(
    archive: &mut impl SurfaceArchive,
    spectrum_name: &str,
    output_name: &str,
    options: WeightingOptions,
) -> Result<FluxWeighted, XsecError> {
    let spectrum = archive.spectrum(spectrum_name)?;
    let mut result = weight_surfaces(&spectrum, options, |p| {
        Ok(archive.surface(&surface_key(p))?)
    })?;
    result.surface.set_title(output_name);
    archive.put_surface(output_name, &result.surface)?;
    info!(output = output_name, total = result.total, "Stored flux-weighted surface");
    Ok(result)
}
