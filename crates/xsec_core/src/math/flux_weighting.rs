//! Flux-weighted marginalisation of a surface family over its parameter.
//!
//! For parameter samples `p_0 < p_1 < ...` the marginal surface is
//!
//! ```text
//! S(x, y) = Σ_k S_k(x, y) · w(p_k) · Δp_k / N,   Δp_0 = 0
//! ```
//!
//! where `N` is either `Σ_k w(p_k) Δp_k` ([`Normalization::WeightIntegral`])
//! or the upper edge of the weighting histogram ([`Normalization::DomainMax`]).

use crate::grid::{DenseSurface, Histogram1D, PARAMETER_TOLERANCE};
use crate::types::{GridError, XsecError};
use std::borrow::Borrow;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Denominator applied to the accumulated sum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Normalization {
    /// Divide by the discrete integral of the weight, `Σ w(p) Δp`.
    ///
    /// The result is a true weighted average and does not depend on the
    /// overall scale of the weight.
    #[default]
    WeightIntegral,
    /// Divide by the maximum parameter of the weight domain.
    ///
    /// Kept for comparison with historical outputs; the result scales with
    /// the weight.
    DomainMax,
}

/// Options for [`FluxWeighter`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightingOptions {
    /// First parameter sample
    pub param_start: f64,
    /// Step between parameter samples
    pub spacing: f64,
    /// Keep x bins up to `p_max - threshold` only (`None` keeps all)
    pub threshold: Option<f64>,
    /// Normalisation of the accumulated sum
    pub normalization: Normalization,
}

impl Default for WeightingOptions {
    fn default() -> Self {
        Self {
            param_start: 1.5,
            spacing: 0.1,
            threshold: Some(1.44),
            normalization: Normalization::default(),
        }
    }
}

impl WeightingOptions {
    /// Check the numeric options.
    pub fn validate(&self) -> Result<(), GridError> {
        if !(self.spacing.is_finite() && self.spacing > 0.0) {
            return Err(GridError::InvalidParameter {
                name: "spacing",
                value: format!("{} must be positive", self.spacing),
            });
        }
        if !self.param_start.is_finite() {
            return Err(GridError::InvalidParameter {
                name: "param_start",
                value: self.param_start.to_string(),
            });
        }
        if let Some(t) = self.threshold {
            if !(t.is_finite() && t >= 0.0) {
                return Err(GridError::InvalidParameter {
                    name: "threshold",
                    value: t.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Result of flux weighting.
#[derive(Debug, Clone, PartialEq)]
pub struct FluxWeighted {
    /// Marginal surface
    pub surface: DenseSurface,
    /// Bin content times bin area summed over the marginal surface
    pub total: f64,
    /// Number of parameter samples accumulated
    pub samples: usize,
    /// Denominator applied
    pub norm: f64,
}

/// Streaming accumulator for flux weighting.
///
/// Surfaces are fed in ascending parameter order with
/// [`accumulate`](Self::accumulate); [`parameters`](Self::parameters) lists
/// the samples expected.
///
/// # Example
///
/// ```
/// use xsec_core::grid::{DenseSurface, Histogram1D, UniformAxis};
/// use xsec_core::math::flux_weighting::{FluxWeighter, WeightingOptions};
///
/// let flux = Histogram1D::from_contents(
///     "flux",
///     UniformAxis::new(4, 0.0, 4.0).unwrap(),
///     vec![1.0; 4],
/// ).unwrap();
/// let options = WeightingOptions { param_start: 1.0, spacing: 1.0, threshold: None, ..Default::default() };
///
/// let x = UniformAxis::new(2, 0.0, 2.0).unwrap();
/// let y = UniformAxis::new(1, -1.0, 1.0).unwrap();
///
/// let mut weighter = FluxWeighter::new(&flux, options).unwrap();
/// assert_eq!(weighter.parameters(), vec![1.0, 2.0, 3.0]);
/// for p in weighter.parameters() {
///     let s = DenseSurface::from_contents("s", x, y, vec![p, p]).unwrap();
///     weighter.accumulate(p, &s).unwrap();
/// }
/// let result = weighter.finish().unwrap();
/// // Δp = 0 for the first sample: (2 + 3) / 2
/// assert_eq!(result.surface.get(0, 0), 2.5);
/// ```
#[derive(Debug, Clone)]
pub struct FluxWeighter<'a> {
    weight: &'a Histogram1D,
    options: WeightingOptions,
    acc: Option<DenseSurface>,
    last_parameter: Option<f64>,
    weight_sum: f64,
    samples: usize,
}

impl<'a> FluxWeighter<'a> {
    /// Accumulator over the domain of `weight`.
    pub fn new(weight: &'a Histogram1D, options: WeightingOptions) -> Result<Self, GridError> {
        options.validate()?;
        Ok(Self {
            weight,
            options,
            acc: None,
            last_parameter: None,
            weight_sum: 0.0,
            samples: 0,
        })
    }

    /// Upper parameter bound, the weight histogram's upper edge.
    #[inline]
    pub fn p_max(&self) -> f64 {
        self.weight.axis().max()
    }

    /// Parameter samples `start + k·spacing` below [`p_max`](Self::p_max).
    pub fn parameters(&self) -> Vec<f64> {
        let p_max = self.p_max() - PARAMETER_TOLERANCE;
        (0..)
            .map(|k| self.options.param_start + k as f64 * self.options.spacing)
            .take_while(|&p| p < p_max)
            .collect()
    }

    /// Add the surface at parameter `p`.
    ///
    /// # Errors
    ///
    /// - `GridError::ShapeMismatch` if `surface` differs in binning from the
    ///   first surface accumulated
    /// - `GridError::InvalidParameter` if `p` does not increase
    pub fn accumulate(&mut self, p: f64, surface: &DenseSurface) -> Result<(), GridError> {
        let dp = match self.last_parameter {
            None => 0.0,
            Some(last) if p > last => p - last,
            Some(last) => {
                return Err(GridError::InvalidParameter {
                    name: "parameter",
                    value: format!("{} does not follow {}", p, last),
                })
            }
        };

        if self.acc.is_none() {
            self.acc = Some(self.empty_marginal(surface)?);
        }

        let w = self.weight.content_at(p);
        let factor = w * dp;
        if let Some(acc) = self.acc.as_mut() {
            ensure_compatible(acc, surface, p)?;
            if factor != 0.0 {
                for iy in 0..acc.y_axis().n_bins() {
                    for ix in 0..acc.x_axis().n_bins() {
                        let v = acc.get(ix, iy) + surface.get(ix, iy) * factor;
                        acc.set(ix, iy, v);
                    }
                }
            }
        }

        self.weight_sum += factor;
        self.last_parameter = Some(p);
        self.samples += 1;
        debug!(parameter = p, weight = w, dp, "Accumulated surface");
        Ok(())
    }

    /// Marginal surface over the template's x range, truncated at the
    /// threshold.
    fn empty_marginal(&self, template: &DenseSurface) -> Result<DenseSurface, GridError> {
        let x_axis = match self.options.threshold {
            None => *template.x_axis(),
            Some(t) => {
                let cut = self.p_max() - t;
                let axis = template.x_axis();
                if cut >= axis.max() {
                    *axis
                } else {
                    let bin = axis.find_bin(cut).ok_or(GridError::InvalidParameter {
                        name: "threshold",
                        value: format!("cut {} below x range [{}, {})", cut, axis.min(), axis.max()),
                    })?;
                    axis.truncated(bin + 1)?
                }
            }
        };
        Ok(DenseSurface::new("Flux-weighted cross section", x_axis, *template.y_axis()))
    }

    /// Normalise and return the marginal surface.
    ///
    /// # Errors
    ///
    /// `GridError::ZeroWeight` if nothing was accumulated or the denominator
    /// is zero.
    pub fn finish(self) -> Result<FluxWeighted, GridError> {
        let (from, to) = (self.options.param_start, self.p_max());
        let norm = match self.options.normalization {
            Normalization::WeightIntegral => self.weight_sum,
            Normalization::DomainMax => to,
        };
        let mut surface = match self.acc {
            Some(s) if norm.is_finite() && norm != 0.0 => s,
            _ => return Err(GridError::ZeroWeight { from, to }),
        };

        for iy in 0..surface.y_axis().n_bins() {
            for ix in 0..surface.x_axis().n_bins() {
                let v = surface.get(ix, iy) / norm;
                surface.set(ix, iy, v);
            }
        }

        let total = surface.integral_width();
        info!(
            samples = self.samples,
            norm,
            total,
            normalization = ?self.options.normalization,
            "Flux weighting complete"
        );
        Ok(FluxWeighted {
            surface,
            total,
            samples: self.samples,
            norm,
        })
    }
}

/// The marginal keeps a prefix of the x bins, so `surface` must share the
/// y axis, the x origin and width, and cover at least as many x bins.
fn ensure_compatible(acc: &DenseSurface, surface: &DenseSurface, p: f64) -> Result<(), GridError> {
    let (a, s) = (acc.x_axis(), surface.x_axis());
    let same_width = (a.width() - s.width()).abs() <= 1e-9 * a.width().abs();
    if surface.y_axis() == acc.y_axis() && a.min() == s.min() && same_width && s.n_bins() >= a.n_bins() {
        Ok(())
    } else {
        Err(GridError::ShapeMismatch(format!(
            "surface '{}' at parameter {} does not match the marginal binning",
            surface.title(),
            p
        )))
    }
}

/// Flux-weight the surfaces `lookup` returns for every parameter sample.
///
/// `lookup` is called once per sample in ascending order; it may borrow from
/// a [`SurfaceFamily`](crate::grid::SurfaceFamily) or load from an archive.
///
/// # Errors
///
/// Any error of `lookup`, plus the errors of [`FluxWeighter`].
pub fn weight_surfaces<S, F>(
    weight: &Histogram1D,
    options: WeightingOptions,
    mut lookup: F,
) -> Result<FluxWeighted, XsecError>
where
    S: Borrow<DenseSurface>,
    F: FnMut(f64) -> Result<S, XsecError>,
{
    let mut weighter = FluxWeighter::new(weight, options)?;
    for p in weighter.parameters() {
        let surface = lookup(p)?;
        weighter.accumulate(p, surface.borrow())?;
    }
    Ok(weighter.finish()?)
}
