//! End-to-end tests running every kernel stage through an in-memory archive.

use approx::assert_relative_eq;
use xsec_core::archive::{surface_key, MemoryArchive, SurfaceArchive};
use xsec_core::grid::{Histogram1D, UniformAxis};
use xsec_core::math::{GridBuilderOptions, Normalization, WeightingOptions};
use xsec_core::stages::{
    run_flux_weighting, run_grid_construction, run_interpolation, InterpolationPlan,
};
use xsec_core::types::{InputShapeError, SampleSet, XsecError};

fn axes() -> (UniformAxis, UniformAxis) {
    (
        UniformAxis::new(40, 0.0, 4.0).unwrap(),
        UniformAxis::new(4, -1.01, 1.01).unwrap(),
    )
}

/// Two angular slices with a peak whose height grows with energy.
fn sample_set(energy: f64) -> SampleSet {
    let mut set = SampleSet::new(energy);
    for (code, y) in [(30, 0.866), (120, -0.5)] {
        let slice = set.begin_slice(code, y);
        slice.push(0.5, 1.0 * energy);
        slice.push(1.5, 4.0 * energy);
        slice.push(2.5, 2.0 * energy);
    }
    set
}

// ==========================================
// Grid construction
// ==========================================

#[test]
fn test_two_slice_block_pattern() {
    let mut set = SampleSet::new(10.0);
    let a = set.begin_slice(60, 0.5);
    a.push(1.0, 10.0);
    a.push(3.0, 20.0);
    let b = set.begin_slice(120, -0.5);
    b.push(1.0, 30.0);
    b.push(3.0, 40.0);

    let mut archive = MemoryArchive::new();
    let x = UniformAxis::new(4, 0.0, 4.0).unwrap();
    let y = UniformAxis::new(2, -1.0, 1.0).unwrap();
    let report =
        run_grid_construction(&mut archive, &set, &GridBuilderOptions::default(), x, y).unwrap();

    assert_eq!(report.cells, 4);
    let surface = archive.surface("v10_0").unwrap();
    // Row 1 holds slice A, row 0 slice B; the first cell of each row spans
    // two fine bins and ramps up from zero.
    assert_eq!(surface.get(1, 1), 10.0);
    assert_eq!(surface.get(2, 1), 20.0);
    assert_eq!(surface.get(1, 0), 30.0);
    assert_eq!(surface.get(2, 0), 40.0);
    assert_relative_eq!(surface.get(0, 1), 5.0);
    assert_relative_eq!(surface.get(0, 0), 15.0);
}

#[test]
fn test_malformed_set_stores_nothing() {
    let mut set = SampleSet::new(10.0);
    let slice = set.begin_slice(0, 0.5);
    slice.push(2.0, 1.0);
    slice.push(2.0, 3.0);

    let mut archive = MemoryArchive::new();
    let (x, y) = axes();
    let err = run_grid_construction(&mut archive, &set, &GridBuilderOptions::default(), x, y)
        .unwrap_err();

    assert!(matches!(
        err,
        XsecError::InputShape(InputShapeError::DuplicateX { .. })
    ));
    assert!(archive.is_empty());
}

// ==========================================
// Full pipeline
// ==========================================

#[test]
fn test_construction_interpolation_weighting() {
    let mut archive = MemoryArchive::new();
    let (x, y) = axes();
    for energy in [1.0, 2.0, 3.0] {
        run_grid_construction(&mut archive, &sample_set(energy), &GridBuilderOptions::default(), x, y)
            .unwrap();
    }

    let plan = InterpolationPlan {
        param_min: 1.0,
        param_max: 3.0,
        spacing: 1.0,
        n_interps: 4,
    };
    let report = run_interpolation(&mut archive, &plan).unwrap();
    assert_eq!(report.written.len(), 8);
    assert!(report.anomalies.is_empty());
    for p in [1.2, 1.4, 1.6, 1.8, 2.2, 2.4, 2.6, 2.8] {
        assert!(archive.contains(&surface_key(p)), "missing {}", surface_key(p));
    }

    let flux = Histogram1D::from_contents(
        "SNSflux",
        UniformAxis::new(16, 0.0, 3.2).unwrap(),
        vec![1.0; 16],
    )
    .unwrap();
    archive.put_spectrum("SNSflux", &flux).unwrap();

    let options = WeightingOptions {
        param_start: 1.0,
        spacing: 0.2,
        threshold: None,
        normalization: Normalization::WeightIntegral,
    };
    let result = run_flux_weighting(&mut archive, "SNSflux", "fluxW", options).unwrap();

    assert_eq!(result.samples, 11);
    assert!(result.total > 0.0);
    assert!(result.surface.contents().iter().all(|&v| v >= 0.0));
    assert!(archive.contains("fluxW"));
}

#[test]
fn test_flux_weighting_needs_every_sample() {
    let mut archive = MemoryArchive::new();
    let (x, y) = axes();
    run_grid_construction(&mut archive, &sample_set(1.0), &GridBuilderOptions::default(), x, y)
        .unwrap();
    let flux = Histogram1D::from_contents("f", UniformAxis::new(4, 0.0, 2.0).unwrap(), vec![1.0; 4])
        .unwrap();
    archive.put_spectrum("f", &flux).unwrap();

    let options = WeightingOptions {
        param_start: 1.0,
        spacing: 0.5,
        threshold: None,
        ..Default::default()
    };
    let err = run_flux_weighting(&mut archive, "f", "out", options).unwrap_err();
    assert!(err.to_string().contains("v1_5"));
}
