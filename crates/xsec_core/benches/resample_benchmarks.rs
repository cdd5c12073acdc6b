//! Criterion benchmarks for grid construction, resampling and surface
//! interpolation at production grid sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use xsec_core::grid::UniformAxis;
use xsec_core::math::grid_builder::{build_poly_surface, GridBuilderOptions};
use xsec_core::math::resampler::resample;
use xsec_core::math::surface_interpolator::GapInterpolator;
use xsec_core::types::SampleSet;

/// 37 angular slices (0 to 180 degrees in 5 degree steps), `n` samples each,
/// with sampling density rising towards a peak.
fn generate_sample_set(n: usize) -> SampleSet {
    let mut set = SampleSet::new(50.0);
    for code in (0..=180).step_by(5) {
        let y = (code as f64).to_radians().cos();
        let slice = set.begin_slice(code, y);
        for i in 0..n {
            let t = (i as f64 + 1.0) / n as f64;
            slice.push(50.0 * t.sqrt(), 1.0 + (10.0 * t).sin().abs());
        }
    }
    set
}

fn production_axes() -> (UniformAxis, UniformAxis) {
    (
        UniformAxis::new(1695, 0.5, 170.0).unwrap(),
        UniformAxis::new(100, -1.01, 1.01).unwrap(),
    )
}

/// Benchmark variable-grid construction.
fn bench_grid_builder(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_builder");
    for n in [20, 100, 500] {
        let set = generate_sample_set(n);
        group.bench_with_input(BenchmarkId::new("build", n), &set, |b, set| {
            b.iter(|| build_poly_surface(black_box(set), &GridBuilderOptions::default()).unwrap());
        });
    }
    group.finish();
}

/// Benchmark resampling onto the production grid.
fn bench_resample(c: &mut Criterion) {
    let mut group = c.benchmark_group("resample");
    let (x, y) = production_axes();
    for n in [20, 100, 500] {
        let poly = build_poly_surface(&generate_sample_set(n), &GridBuilderOptions::default()).unwrap();
        group.bench_with_input(BenchmarkId::new("dense", n), &poly, |b, poly| {
            b.iter(|| resample(black_box(poly), x, y, "bench"));
        });
    }
    group.finish();
}

/// Benchmark synthesising one intermediate surface.
fn bench_interpolate(c: &mut Criterion) {
    let (x, y) = production_axes();
    let poly = build_poly_surface(&generate_sample_set(100), &GridBuilderOptions::default()).unwrap();
    let (lower, _) = resample(&poly, x, y, "lo");
    let (upper, _) = resample(&poly, x, y, "hi");
    let gap = GapInterpolator::new(&lower, &upper, 50.0, 5.0, 49).unwrap();

    c.bench_function("interpolate_surface", |b| {
        b.iter(|| gap.surface(black_box(25)).unwrap());
    });
}

criterion_group!(benches, bench_grid_builder, bench_resample, bench_interpolate);
criterion_main!(benches);
