//! Electron-neutrino spectrum from muon decay at rest (SNS flux).
//!
//! ```text
//! f(E) dE = 12 (aE)^2 (1 - aE) a dE,   a = 2 / m_mu
//! ```
//!
//! The spectrum ends at `m_mu / 2`. Bins are evaluated at their centres and
//! the histogram is normalised to unit sum.

use tracing::debug;
use xsec_core::grid::{Histogram1D, UniformAxis};
use xsec_core::types::GridError;

/// Muon mass (MeV).
pub const MUON_MASS: f64 = 105.66837;

/// Archive name of the spectrum.
pub const SNS_FLUX_NAME: &str = "SNSflux";

/// Unnormalised spectrum density times `bin_width`, clamped at 0.
///
/// # Example
///
/// ```
/// use adapter_loader::flux::{sns_density, MUON_MASS};
///
/// assert_eq!(sns_density(0.0, 0.1), 0.0);
/// assert_eq!(sns_density(MUON_MASS / 2.0 + 1.0, 0.1), 0.0);
/// assert!(sns_density(30.0, 0.1) > 0.0);
/// ```
pub fn sns_density(energy: f64, bin_width: f64) -> f64 {
    let a = 2.0 / MUON_MASS;
    let ae = a * energy;
    (12.0 * ae * ae * (1.0 - ae) * a * bin_width).max(0.0)
}

/// Upper edge of the spectrum histogram: the first multiple of `bin_width`
/// at or beyond the endpoint `m_mu / 2`.
pub fn spectrum_end(bin_width: f64) -> f64 {
    (MUON_MASS / 2.0 / bin_width).ceil() * bin_width
}

/// Normalised SNS electron-neutrino spectrum binned at `bin_width`.
///
/// # Errors
///
/// `GridError::InvalidParameter` if `bin_width` is not positive and finite.
///
/// # Example
///
/// ```
/// use adapter_loader::flux::sns_flux;
///
/// let flux = sns_flux(0.1).unwrap();
/// assert_eq!(flux.axis().n_bins(), 529);
/// assert!((flux.sum() - 1.0).abs() < 1e-12);
/// ```
pub fn sns_flux(bin_width: f64) -> Result<Histogram1D, GridError> {
    if !(bin_width.is_finite() && bin_width > 0.0) {
        return Err(GridError::InvalidParameter {
            name: "bin_width",
            value: format!("{} must be positive", bin_width),
        });
    }

    let end = spectrum_end(bin_width);
    let n_bins = (end / bin_width).round() as usize;
    let axis = UniformAxis::new(n_bins, 0.0, end)?;
    let contents = (0..n_bins)
        .map(|i| sns_density(axis.center(i), bin_width))
        .collect();

    let mut flux = Histogram1D::from_contents("Normalized SNS Flux", axis, contents)?;
    flux.normalize();
    debug!(n_bins, end, "Generated SNS flux");
    Ok(flux)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_endpoint_binning() {
        assert_relative_eq!(spectrum_end(0.1), 52.9, epsilon = 1e-9);
        assert_relative_eq!(spectrum_end(0.5), 53.0, epsilon = 1e-9);
        assert_relative_eq!(spectrum_end(1.0), 53.0, epsilon = 1e-9);
    }

    #[test]
    fn test_normalised_and_non_negative() {
        let flux = sns_flux(0.1).unwrap();
        assert_relative_eq!(flux.sum(), 1.0, epsilon = 1e-12);
        assert!(flux.contents().iter().all(|&v| v >= 0.0));
        // Last bin straddles the endpoint at 52.834 with its centre at 52.85
        assert_eq!(*flux.contents().last().unwrap(), 0.0);
    }

    #[test]
    fn test_peak_position() {
        // 12 x^2 (1 - x) peaks at x = 2/3, i.e. E = m_mu / 3
        let flux = sns_flux(0.1).unwrap();
        let (peak, _) = flux
            .contents()
            .iter()
            .enumerate()
            .fold((0, 0.0), |(bi, bv), (i, &v)| if v > bv { (i, v) } else { (bi, bv) });
        let centre = flux.axis().center(peak);
        assert!((centre - MUON_MASS / 3.0).abs() < 0.1, "peak at {}", centre);
    }

    #[test]
    fn test_mean_energy() {
        // Mean of the Michel nu_e spectrum is 0.3 m_mu
        let flux = sns_flux(0.01).unwrap();
        let axis = flux.axis();
        let mean: f64 = flux
            .contents()
            .iter()
            .enumerate()
            .map(|(i, &w)| w * axis.center(i))
            .sum();
        assert_relative_eq!(mean, 0.3 * MUON_MASS, max_relative = 1e-3);
    }

    #[test]
    fn test_invalid_bin_width() {
        assert!(sns_flux(0.0).is_err());
        assert!(sns_flux(f64::NAN).is_err());
    }
}
