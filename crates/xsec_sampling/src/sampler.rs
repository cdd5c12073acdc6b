//! Random (x, y) draws distributed like a surface's bin contents.
//!
//! A bin is chosen with probability proportional to its content using
//! Walker's alias method, then the point is placed uniformly inside it.

use crate::error::SamplingError;
use crate::rng::XsecRng;
use rand_distr::{Distribution, WeightedAliasIndex};
use tracing::debug;
use xsec_core::grid::{DenseSurface, UniformAxis};

/// One sampled point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    /// Electron kinetic energy
    pub x: f64,
    /// Scattering-angle cosine
    pub y: f64,
}

/// Sampler over the bins of one [`DenseSurface`].
///
/// # Example
///
/// ```
/// use xsec_core::grid::{DenseSurface, UniformAxis};
/// use xsec_sampling::rng::XsecRng;
/// use xsec_sampling::sampler::SurfaceSampler;
///
/// let x = UniformAxis::new(2, 0.0, 2.0).unwrap();
/// let y = UniformAxis::new(1, -1.0, 1.0).unwrap();
/// let surface = DenseSurface::from_contents("s", x, y, vec![0.0, 5.0]).unwrap();
///
/// let sampler = SurfaceSampler::new(&surface).unwrap();
/// let mut rng = XsecRng::from_seed(42);
/// let event = sampler.sample(&mut rng);
/// assert!(event.x >= 1.0 && event.x < 2.0);
/// ```
#[derive(Debug, Clone)]
pub struct SurfaceSampler {
    x_axis: UniformAxis,
    y_axis: UniformAxis,
    bins: WeightedAliasIndex<f64>,
}

impl SurfaceSampler {
    /// Prepare the alias table for `surface`.
    ///
    /// # Errors
    ///
    /// - `SamplingError::NonFinite` / `NegativeContent` for invalid bins
    /// - `SamplingError::EmptySurface` if no bin is positive
    pub fn new(surface: &DenseSurface) -> Result<Self, SamplingError> {
        let contents = surface.contents();
        for (bin, &value) in contents.iter().enumerate() {
            if !value.is_finite() {
                return Err(SamplingError::NonFinite { bin });
            }
            if value < 0.0 {
                return Err(SamplingError::NegativeContent { bin, value });
            }
        }
        if !contents.iter().any(|&v| v > 0.0) {
            return Err(SamplingError::EmptySurface(surface.title().to_string()));
        }
        if contents.len() > u32::MAX as usize {
            return Err(SamplingError::TooManyBins(contents.len()));
        }

        let bins = WeightedAliasIndex::new(contents.to_vec())
            .map_err(|_| SamplingError::EmptySurface(surface.title().to_string()))?;
        debug!(title = surface.title(), bins = contents.len(), "Prepared sampler");
        Ok(Self {
            x_axis: *surface.x_axis(),
            y_axis: *surface.y_axis(),
            bins,
        })
    }

    /// Draw one event.
    pub fn sample(&self, rng: &mut XsecRng) -> Event {
        let bin = self.bins.sample(rng);
        let nx = self.x_axis.n_bins();
        let (ix, iy) = (bin % nx, bin / nx);
        Event {
            x: self.x_axis.low_edge(ix) + rng.gen_uniform() * self.x_axis.width(),
            y: self.y_axis.low_edge(iy) + rng.gen_uniform() * self.y_axis.width(),
        }
    }
}
