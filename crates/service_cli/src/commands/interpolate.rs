//! Interpolate command implementation

use tracing::{info, warn};
use xsec_core::archive::SurfaceArchive;
use xsec_core::stages::{run_interpolation, InterpolationPlan, InterpolationReport};

use crate::Result;

/// Run the interpolate command
pub fn run(archive: &mut impl SurfaceArchive, plan: &InterpolationPlan) -> Result<InterpolationReport> {
    info!(
        "Interpolating {} to {} MeV, spacing {}, {} per gap",
        plan.param_min, plan.param_max, plan.spacing, plan.n_interps
    );

    let report = run_interpolation(archive, plan)?;
    for anomaly in &report.anomalies {
        warn!(
            "E_v = {:.1} MeV: {} negative bins (min {:e})",
            anomaly.parameter, anomaly.negative_bins, anomaly.min_value
        );
    }
    println!(
        "Wrote {} interpolated surfaces ({} with negative bins)",
        report.written.len(),
        report.anomalies.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CliError;
    use xsec_core::grid::{DenseSurface, UniformAxis};
    use xsec_core::archive::MemoryArchive;
    use xsec_core::types::{GridError, XsecError};

    fn archive_with(params: &[f64]) -> MemoryArchive {
        let x = UniformAxis::new(10, 0.0, 1.0).unwrap();
        let y = UniformAxis::new(1, -1.0, 1.0).unwrap();
        let mut archive = MemoryArchive::new();
        for &p in params {
            let key = xsec_core::archive::surface_key(p);
            let surface = DenseSurface::from_contents(&key, x, y, vec![p; 10]).unwrap();
            archive.put_surface(&key, &surface).unwrap();
        }
        archive
    }

    #[test]
    fn test_interpolate_writes_intermediates() {
        let mut archive = archive_with(&[1.0, 2.0]);
        let plan = InterpolationPlan {
            param_min: 1.0,
            param_max: 2.0,
            spacing: 1.0,
            n_interps: 9,
        };
        let report = run(&mut archive, &plan).unwrap();
        assert_eq!(report.written.len(), 9);
        assert!(archive.contains("v1_1"));
        assert!(archive.contains("v1_9"));
    }

    #[test]
    fn test_interpolate_rejects_inverted_range() {
        let mut archive = archive_with(&[1.0, 2.0]);
        let plan = InterpolationPlan {
            param_min: 2.0,
            param_max: 1.0,
            spacing: 1.0,
            n_interps: 1,
        };
        let err = run(&mut archive, &plan).unwrap_err();
        assert!(matches!(
            err,
            CliError::Pipeline(XsecError::Grid(GridError::InvalidParameter { .. }))
        ));
    }
}
