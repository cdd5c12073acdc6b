//! Sample command implementation

use infra_config::PipelineConfig;
use std::path::Path;
use tracing::info;
use xsec_core::archive::SurfaceArchive;
use xsec_sampling::events::EventWriter;
use xsec_sampling::rng::XsecRng;
use xsec_sampling::{load_sampler, write_events};

use crate::Result;

/// Run the sample command
///
/// `events`, `seed` and `output` override the configured values. Without a
/// seed from either source the generator is seeded from the OS.
pub fn run(
    config: &PipelineConfig,
    archive: &impl SurfaceArchive,
    events: Option<usize>,
    seed: Option<u64>,
    output: Option<&Path>,
) -> Result<usize> {
    let sampling = &config.sampling;
    let events = events.unwrap_or(sampling.events);
    let output = output.unwrap_or(sampling.output.as_path());

    let mut rng = match seed.or(sampling.seed) {
        Some(seed) => XsecRng::from_seed(seed),
        None => XsecRng::from_entropy(),
    };
    info!("Sampling {} events from '{}' (seed {})", events, sampling.source, rng.seed());

    // Resolve the source before touching the event file
    let sampler = load_sampler(archive, &sampling.source)?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = EventWriter::create(output)?;
    let written = write_events(&sampler, events, &mut rng, &mut writer)?;

    println!("Wrote {} events to {}", written, output.display());
    Ok(written)
}
