//! Linear interpolation of whole surfaces between two parameter values.
//!
//! The electron-energy axis moves with the incident energy: a feature at bin
//! `ix` of the surface at `p` sits near bin `ix - (p' - p) / width` of the
//! surface at a lower `p'`. Interpolating at offset `δ = i·spacing/(k+1)`
//! above the lower surface therefore reads
//!
//! ```text
//! v_lo = lower[ix - shift(δ)]
//! v_hi = upper[ix + shift(spacing - δ)]
//! v    = (1 - t)·v_lo + t·v_hi,   t = i / (k + 1)
//! ```
//!
//! with `shift` given by [`param_offset_to_x_bin`]. Source bins shifted off
//! the grid read as 0.

use crate::grid::{DenseSurface, SurfaceFamily, PARAMETER_TOLERANCE};
use crate::types::GridError;
use tracing::{debug, warn};

/// Number of x bins spanned by a parameter offset, rounded to the nearest bin.
///
/// # Example
///
/// ```
/// use xsec_core::math::surface_interpolator::param_offset_to_x_bin;
///
/// assert_eq!(param_offset_to_x_bin(1.0, 0.1), 10);
/// assert_eq!(param_offset_to_x_bin(0.0, 0.1), 0);
/// assert_eq!(param_offset_to_x_bin(0.26, 0.1), 3);
/// ```
#[inline]
pub fn param_offset_to_x_bin(param_offset: f64, bin_width: f64) -> i64 {
    (param_offset / bin_width).round() as i64
}

/// Negative values found in a synthesised surface.
///
/// Surfaces are densities, so negative bins are reported; the values are
/// stored unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericAnomaly {
    /// Parameter of the offending surface
    pub parameter: f64,
    /// Number of negative bins
    pub negative_bins: usize,
    /// Most negative value
    pub min_value: f64,
}

/// Surface synthesised at an intermediate parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct InterpolatedSurface {
    /// Parameter the surface was evaluated at
    pub parameter: f64,
    /// Interpolation index within the gap (`1..=k` for intermediates)
    pub index: usize,
    /// The surface
    pub surface: DenseSurface,
    /// Negative-value report, if any
    pub anomaly: Option<NumericAnomaly>,
}

/// Interpolates between the two surfaces bounding one parameter gap.
///
/// # Example
///
/// ```
/// use xsec_core::grid::{DenseSurface, UniformAxis};
/// use xsec_core::math::surface_interpolator::GapInterpolator;
///
/// let x = UniformAxis::new(10, 0.0, 10.0).unwrap();
/// let y = UniformAxis::new(1, -1.0, 1.0).unwrap();
/// let lower = DenseSurface::from_contents("v10_0", x, y, vec![1.0; 10]).unwrap();
/// let upper = DenseSurface::from_contents("v15_0", x, y, vec![3.0; 10]).unwrap();
///
/// let gap = GapInterpolator::new(&lower, &upper, 10.0, 5.0, 4).unwrap();
/// assert_eq!(gap.parameter(1), 11.0);
///
/// let mid = gap.surface(2).unwrap();
/// assert_eq!(mid.parameter, 12.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct GapInterpolator<'a> {
    lower: &'a DenseSurface,
    upper: &'a DenseSurface,
    lower_parameter: f64,
    spacing: f64,
    n_interps: usize,
}

impl<'a> GapInterpolator<'a> {
    /// Prepare interpolation of `n_interps` evenly spaced surfaces between
    /// `lower` (at `lower_parameter`) and `upper` (at `lower_parameter + spacing`).
    ///
    /// # Errors
    ///
    /// - `GridError::InvalidParameter` if `spacing` is not positive and finite
    /// - `GridError::ShapeMismatch` if the surfaces do not share a binning
    pub fn new(
        lower: &'a DenseSurface,
        upper: &'a DenseSurface,
        lower_parameter: f64,
        spacing: f64,
        n_interps: usize,
    ) -> Result<Self, GridError> {
        if !(spacing.is_finite() && spacing > 0.0) {
            return Err(GridError::InvalidParameter {
                name: "spacing",
                value: format!("{} must be positive", spacing),
            });
        }
        lower.ensure_same_binning(upper)?;
        Ok(Self {
            lower,
            upper,
            lower_parameter,
            spacing,
            n_interps,
        })
    }

    /// Parameter of interpolation index `i`.
    #[inline]
    pub fn parameter(&self, i: usize) -> f64 {
        self.lower_parameter + i as f64 * self.spacing / (self.n_interps + 1) as f64
    }

    /// Surface at interpolation index `i`.
    ///
    /// `i = 0` reproduces the lower surface and `i = k + 1` the upper one.
    ///
    /// # Errors
    ///
    /// `GridError::InvalidParameter` if `i > k + 1`.
    pub fn surface(&self, i: usize) -> Result<InterpolatedSurface, GridError> {
        let steps = self.n_interps + 1;
        if i > steps {
            return Err(GridError::InvalidParameter {
                name: "index",
                value: format!("{} exceeds {}", i, steps),
            });
        }

        let t = i as f64 / steps as f64;
        let offset = i as f64 * self.spacing / steps as f64;
        let bin_width = self.lower.x_axis().width();
        let lower_shift = param_offset_to_x_bin(offset, bin_width);
        let upper_shift = param_offset_to_x_bin(self.spacing - offset, bin_width);

        let parameter = self.parameter(i);
        let title = format!("Interpolated Cross Section: E_v = {:.1} MeV", parameter);
        let mut surface = DenseSurface::new(title, *self.lower.x_axis(), *self.lower.y_axis());

        for iy in 0..surface.y_axis().n_bins() {
            for ix in 0..surface.x_axis().n_bins() {
                let v_lo = self.lower.get_or_zero(ix as i64 - lower_shift, iy as i64);
                let v_hi = self.upper.get_or_zero(ix as i64 + upper_shift, iy as i64);
                surface.set(ix, iy, (1.0 - t) * v_lo + t * v_hi);
            }
        }

        let anomaly = negative_report(parameter, &surface);
        if let Some(a) = anomaly {
            warn!(
                parameter,
                negative_bins = a.negative_bins,
                min_value = a.min_value,
                "Negative bin values in interpolated surface"
            );
        }

        Ok(InterpolatedSurface {
            parameter,
            index: i,
            surface,
            anomaly,
        })
    }

    /// All `k` intermediate surfaces, `i = 1..=k`.
    pub fn intermediates(&self) -> Result<Vec<InterpolatedSurface>, GridError> {
        (1..=self.n_interps).map(|i| self.surface(i)).collect()
    }
}

fn negative_report(parameter: f64, surface: &DenseSurface) -> Option<NumericAnomaly> {
    let (negative_bins, min_value) = surface
        .contents()
        .iter()
        .filter(|&&v| v < 0.0)
        .fold((0usize, 0.0f64), |(n, m), &v| (n + 1, m.min(v)));
    (negative_bins > 0).then_some(NumericAnomaly {
        parameter,
        negative_bins,
        min_value,
    })
}

/// Insert `n_interps` interpolated surfaces into every gap of `family`.
///
/// Consecutive members must be `spacing` apart. Returns the anomalies
/// reported for the new surfaces.
///
/// # Errors
///
/// - `GridError::InvalidParameter` for a non-positive spacing or a gap of a
///   different width
/// - `GridError::ShapeMismatch` if neighbouring surfaces differ in binning
pub fn fill_gaps(
    family: &mut SurfaceFamily,
    spacing: f64,
    n_interps: usize,
) -> Result<Vec<NumericAnomaly>, GridError> {
    let mut created = Vec::new();
    for pair in family.members().windows(2) {
        let (lo, hi) = (&pair[0], &pair[1]);
        let width = hi.parameter - lo.parameter;
        if (width - spacing).abs() > PARAMETER_TOLERANCE {
            return Err(GridError::InvalidParameter {
                name: "spacing",
                value: format!(
                    "gap [{}, {}] does not match spacing {}",
                    lo.parameter, hi.parameter, spacing
                ),
            });
        }
        let gap = GapInterpolator::new(&lo.surface, &hi.surface, lo.parameter, spacing, n_interps)?;
        created.extend(gap.intermediates()?);
    }

    debug!(new_surfaces = created.len(), "Filled surface family gaps");
    let anomalies = created.iter().filter_map(|s| s.anomaly).collect();
    for s in created {
        family.insert(s.parameter, s.surface);
    }
    Ok(anomalies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::UniformAxis;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn axes() -> (UniformAxis, UniformAxis) {
        (
            UniformAxis::new(20, 0.0, 2.0).unwrap(),
            UniformAxis::new(2, -1.0, 1.0).unwrap(),
        )
    }

    fn ramp(title: &str, scale: f64) -> DenseSurface {
        let (x, y) = axes();
        let contents = (0..40).map(|i| scale * (1.0 + (i % 20) as f64)).collect();
        DenseSurface::from_contents(title, x, y, contents).unwrap()
    }

    #[test]
    fn test_offset_mapping() {
        assert_eq!(param_offset_to_x_bin(0.5, 0.1), 5);
        assert_eq!(param_offset_to_x_bin(0.3 / 3.0, 0.1), 1);
        assert_eq!(param_offset_to_x_bin(0.04, 0.1), 0);
        assert_eq!(param_offset_to_x_bin(5.0, 0.1), 50);
    }

    #[test]
    fn test_boundaries_reproduce_endpoints() {
        let lower = ramp("lo", 1.0);
        let upper = ramp("hi", 3.0);
        let gap = GapInterpolator::new(&lower, &upper, 10.0, 0.5, 4).unwrap();

        assert_eq!(gap.surface(0).unwrap().surface.contents(), lower.contents());
        assert_eq!(gap.surface(5).unwrap().surface.contents(), upper.contents());
        assert_relative_eq!(gap.surface(5).unwrap().parameter, 10.5);
    }

    #[test]
    fn test_shifted_lookup() {
        let lower = ramp("lo", 1.0);
        let upper = ramp("hi", 1.0);
        // spacing 0.2 over width 0.1: i = 1 of 1 shifts lower by 1 bin and upper by 1 bin
        let gap = GapInterpolator::new(&lower, &upper, 1.0, 0.2, 1).unwrap();
        let mid = gap.surface(1).unwrap().surface;

        // bin 0: lower[-1] = 0, upper[1] = 2 -> 1
        assert_relative_eq!(mid.get(0, 0), 1.0);
        // bin 5: lower[4] = 5, upper[6] = 7 -> 6
        assert_relative_eq!(mid.get(5, 0), 6.0);
        // bin 19: lower[18] = 19, upper[20] = 0 -> 9.5
        assert_relative_eq!(mid.get(19, 1), 9.5);
    }

    #[test]
    fn test_index_out_of_range() {
        let lower = ramp("lo", 1.0);
        let gap = GapInterpolator::new(&lower, &lower, 0.0, 1.0, 2).unwrap();
        assert!(gap.surface(4).is_err());
    }

    #[test]
    fn test_binning_mismatch() {
        let lower = ramp("lo", 1.0);
        let other = DenseSurface::new(
            "other",
            UniformAxis::new(10, 0.0, 2.0).unwrap(),
            UniformAxis::new(2, -1.0, 1.0).unwrap(),
        );
        assert!(matches!(
            GapInterpolator::new(&lower, &other, 0.0, 1.0, 1),
            Err(GridError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn test_negative_values_are_reported_not_corrected() {
        let (x, y) = axes();
        let lower = DenseSurface::from_contents("lo", x, y, vec![-2.0; 40]).unwrap();
        let upper = DenseSurface::from_contents("hi", x, y, vec![1.0; 40]).unwrap();
        let gap = GapInterpolator::new(&lower, &upper, 0.0, 1.0, 1).unwrap();
        let mid = gap.surface(1).unwrap();

        let anomaly = mid.anomaly.expect("negative bins reported");
        assert!(anomaly.negative_bins > 0);
        assert!(mid.surface.contents().iter().any(|&v| v < 0.0));
    }

    #[test]
    fn test_fill_gaps_merges_into_family() {
        let mut family = SurfaceFamily::new();
        family.insert(10.0, ramp("v10_0", 1.0));
        family.insert(15.0, ramp("v15_0", 2.0));
        family.insert(20.0, ramp("v20_0", 3.0));

        let anomalies = fill_gaps(&mut family, 5.0, 4).unwrap();
        assert!(anomalies.is_empty());
        assert_eq!(family.len(), 11);
        for (p, expected) in family.parameters().iter().zip(10..=20) {
            assert_relative_eq!(*p, expected as f64, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_fill_gaps_rejects_uneven_family() {
        let mut family = SurfaceFamily::new();
        family.insert(10.0, ramp("a", 1.0));
        family.insert(12.0, ramp("b", 1.0));
        assert!(fill_gaps(&mut family, 5.0, 1).is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn test_linear_in_index(a in 0.0f64..50.0, b in 0.0f64..50.0, k in 1usize..8) {
            let (x, y) = axes();
            let lower = DenseSurface::from_contents("lo", x, y, vec![a; 40]).unwrap();
            let upper = DenseSurface::from_contents("hi", x, y, vec![b; 40]).unwrap();
            // Spacing narrower than half a bin keeps the shifts at zero.
            let gap = GapInterpolator::new(&lower, &upper, 0.0, 0.04, k).unwrap();

            for i in 0..=k + 1 {
                let v = gap.surface(i).unwrap().surface.get(3, 1);
                let expected = a + i as f64 * (b - a) / (k + 1) as f64;
                prop_assert!((v - expected).abs() < 1e-9);
            }
        }
    }
}
