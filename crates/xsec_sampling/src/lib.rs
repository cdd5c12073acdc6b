//! # xsec_sampling: Event Sampling from Cross-Section Surfaces
//!
//! Draws (electron energy, angle cosine) events distributed like the bin
//! contents of a surface and writes them as a tab-separated stream.
//!
//! - Seeded generator: [`rng::XsecRng`]
//! - Bin-weighted sampler with uniform in-bin placement: [`sampler::SurfaceSampler`]
//! - Event stream writer: [`events::EventWriter`]
//! - Archive-driven stage: [`run_sampling`], or [`load_sampler`] then
//!   [`write_events`] when the sink should only be opened once the source is known
//!
//! Sampling is the only non-deterministic step of the pipeline; a fixed seed
//! makes it reproducible.
//!
//! ## Usage Example
//!
//! ```rust
//! use xsec_core::archive::{MemoryArchive, SurfaceArchive};
//! use xsec_core::grid::{DenseSurface, UniformAxis};
//! use xsec_sampling::events::EventWriter;
//! use xsec_sampling::rng::XsecRng;
//! use xsec_sampling::run_sampling;
//!
//! let x = UniformAxis::new(2, 0.0, 2.0).unwrap();
//! let y = UniformAxis::new(2, -1.0, 1.0).unwrap();
//! let mut archive = MemoryArchive::new();
//! archive
//!     .put_surface("fluxW", &DenseSurface::from_contents("fluxW", x, y, vec![1.0, 2.0, 3.0, 4.0]).unwrap())
//!     .unwrap();
//!
//! let mut rng = XsecRng::from_seed(1);
//! let mut writer = EventWriter::new(Vec::new()).unwrap();
//! let n = run_sampling(&archive, "fluxW", 10, &mut rng, &mut writer).unwrap();
//! assert_eq!(n, 10);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod error;
pub mod events;
pub mod rng;
pub mod sampler;

pub use error::SamplingError;

use events::EventWriter;
use rng::XsecRng;
use sampler::SurfaceSampler;
use std::io::Write;
use tracing::info;
use xsec_core::archive::SurfaceArchive;

/// Build a sampler over the surface stored under `source`.
///
/// # Errors
///
/// - `SamplingError::Archive` if `source` is not stored
/// - `SamplingError` for an unsampleable surface
pub fn load_sampler(
    archive: &impl SurfaceArchive,
    source: &str,
) -> Result<SurfaceSampler, SamplingError> {
    let surface = archive.surface(source)?;
    SurfaceSampler::new(&surface)
}

/// Draw `events` events from `sampler` and write them to `writer`.
///
/// Returns the number of events written.
pub fn write_events<W: Write>(
    sampler: &SurfaceSampler,
    events: usize,
    rng: &mut XsecRng,
    writer: &mut EventWriter<W>,
) -> Result<usize, SamplingError> {
    for _ in 0..events {
        writer.write(&sampler.sample(rng))?;
    }
    writer.flush()?;
    Ok(events)
}

/// Draw `events` events from the surface `source` and write them to `writer`.
///
/// Nothing is written unless the surface can be sampled.
///
/// # Errors
///
/// - `SamplingError::Archive` if `source` is not stored
/// - `SamplingError` for an unsampleable surface or a failing sink
pub fn run_sampling<W: Write>(
    archive: &impl SurfaceArchive,
    source: &str,
    events: usize,
    rng: &mut XsecRng,
    writer: &mut EventWriter<W>,
) -> Result<usize, SamplingError> {
    let sampler = load_sampler(archive, source)?;
    let written = write_events(&sampler, events, rng, writer)?;

    info!(source, events = written, seed = rng.seed(), "Sampled events");
    Ok(written)
}
