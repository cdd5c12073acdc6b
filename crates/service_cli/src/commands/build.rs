//! Build command implementation
//!
//! Parses one tabulated cross-section file, builds its variable-grid surface
//! and stores the resampled surface in the archive.

use adapter_loader::TableLoader;
use infra_config::PipelineConfig;
use std::path::Path;
use tracing::{info, warn};
use xsec_core::archive::SurfaceArchive;
use xsec_core::stages::{run_grid_construction, GridReport};

use crate::Result;

/// Run the build command
pub fn run(
    config: &PipelineConfig,
    archive: &mut impl SurfaceArchive,
    input: &Path,
) -> Result<GridReport> {
    info!("Loading table {}", input.display());
    let table = TableLoader::load(input)?;
    info!(
        energy = table.set.parameter,
        samples = table.set.len(),
        x_max = table.x_max,
        "Parsed table"
    );

    let (x_axis, y_axis) = config.grid.axes()?;
    if table.x_max > x_axis.max() {
        warn!(
            "Observed x maximum {} lies beyond the grid edge {}; the excess is dropped",
            table.x_max,
            x_axis.max()
        );
    }

    let report = run_grid_construction(
        archive,
        &table.set,
        &config.builder.options(),
        x_axis,
        y_axis,
    )?;
    println!("{}: {} cells, {} runs", report.key, report.cells, report.stats.runs);
    Ok(report)
}
