//! Flux command implementation
//!
//! Generates the SNS neutrino spectrum, stores it, and integrates the
//! surface family against it.

use adapter_loader::sns_flux;
use infra_config::PipelineConfig;
use tracing::info;
use xsec_core::archive::SurfaceArchive;
use xsec_core::math::{FluxWeighted, Normalization};
use xsec_core::stages::run_flux_weighting;

use crate::Result;

/// Run the flux command
pub fn run(
    config: &PipelineConfig,
    archive: &mut impl SurfaceArchive,
    normalization: Option<Normalization>,
) -> Result<FluxWeighted> {
    let flux_config = &config.flux;
    let spectrum = sns_flux(flux_config.bin_width)?;
    archive.put_spectrum(&flux_config.spectrum_name, &spectrum)?;
    info!(
        name = %flux_config.spectrum_name,
        bins = spectrum.axis().n_bins(),
        end = spectrum.axis().max(),
        "Stored flux spectrum"
    );

    let mut options = flux_config.weighting_options();
    if let Some(normalization) = normalization {
        options.normalization = normalization;
    }

    let result = run_flux_weighting(
        archive,
        &flux_config.spectrum_name,
        &flux_config.output_name,
        options,
    )?;
    println!(
        "{}: {} energies, total = {:e}",
        flux_config.output_name, result.samples, result.total
    );
    Ok(result)
}
