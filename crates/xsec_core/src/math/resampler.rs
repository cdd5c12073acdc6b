//! Resampling of a [`PolySurface`] onto a uniform [`DenseSurface`].
//!
//! Each fine bin takes the value of the coarse cell under its centre, with
//! two exceptions:
//!
//! - centres outside the coarse domain, and coarse cells holding exactly 0,
//!   give 0 (a physical zero is never interpolated across);
//! - when several consecutive fine bins fall in the same coarse cell (a
//!   *run*), the run is rewritten as a linear ramp from the preceding cell's
//!   value up to the run cell's value, reaching it in the run's last bin.
//!
//! For a run of `k` repeated bins after the first bin of cell `c`:
//!
//! ```text
//! bin[first + m - 1] = prev + m * (curr - prev) / (k + 1)    m = 1..=k
//! bin[first + k]     = curr
//! ```
//!
//! where `curr` is the value of `c` and `prev` the value of the cell to its
//! left in the same row (0 for the first cell of a row).

use crate::grid::{DenseSurface, PolySurface, UniformAxis};
use tracing::debug;

/// Counters collected while resampling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResampleStats {
    /// Fine bins whose centre fell outside the coarse domain
    pub outside: usize,
    /// Fine bins mapped to a coarse cell holding 0
    pub zero: usize,
    /// Runs rewritten as ramps
    pub runs: usize,
    /// Fine bins written by ramps (excluding each run's final bin)
    pub interpolated: usize,
}

/// Scan state along one row of fine bins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// No non-zero coarse cell assigned yet in this row
    Idle,
    /// The last directly assigned fine bin came from `cell`
    Seen { cell: usize },
}

/// Resample `poly` onto the grid spanned by `x_axis` and `y_axis`.
///
/// # Example
///
/// ```
/// use xsec_core::grid::UniformAxis;
/// use xsec_core::math::grid_builder::{build_poly_surface, GridBuilderOptions};
/// use xsec_core::math::resampler::resample;
/// use xsec_core::types::SampleSet;
///
/// let mut set = SampleSet::new(10.0);
/// let slice = set.begin_slice(90, 0.0);
/// slice.push(1.0, 10.0);
/// slice.push(3.0, 20.0);
/// let poly = build_poly_surface(&set, &GridBuilderOptions::default()).unwrap();
///
/// // One fine bin per coarse cell: values copied exactly
/// let x = UniformAxis::new(2, 0.0, 4.0).unwrap();
/// let y = UniformAxis::new(1, -1.0, 1.0).unwrap();
/// let (dense, _) = resample(&poly, x, y, "v10_0");
/// assert_eq!(dense.contents(), &[10.0, 20.0]);
/// ```
pub fn resample(
    poly: &PolySurface,
    x_axis: UniformAxis,
    y_axis: UniformAxis,
    title: &str,
) -> (DenseSurface, ResampleStats) {
    let mut surface = DenseSurface::new(title, x_axis, y_axis);
    let mut stats = ResampleStats::default();
    let nx = x_axis.n_bins();

    for iy in 0..y_axis.n_bins() {
        let y = y_axis.center(iy);
        let mut state = ScanState::Idle;
        let mut ix = 0;

        while ix < nx {
            let Some(cell) = poly.find_cell(x_axis.center(ix), y) else {
                surface.set(ix, iy, 0.0);
                stats.outside += 1;
                ix += 1;
                continue;
            };

            let value = poly.value(cell);
            if value == 0.0 {
                surface.set(ix, iy, 0.0);
                stats.zero += 1;
                ix += 1;
                continue;
            }

            match state {
                ScanState::Seen { cell: last } if last == cell => {
                    let end = run_end(poly, &x_axis, y, cell, ix);
                    fill_run(&mut surface, iy, ix, end, poly.preceding_value(cell), value);
                    stats.runs += 1;
                    stats.interpolated += end - ix;
                    ix = end;
                }
                _ => {
                    surface.set(ix, iy, value);
                    state = ScanState::Seen { cell };
                    ix += 1;
                }
            }
        }
    }

    debug!(
        title,
        runs = stats.runs,
        interpolated = stats.interpolated,
        outside = stats.outside,
        "Resampled variable-grid surface"
    );
    (surface, stats)
}

/// First fine bin at or after `start` whose centre leaves `cell`, capped at
/// the row length.
fn run_end(poly: &PolySurface, x_axis: &UniformAxis, y: f64, cell: usize, start: usize) -> usize {
    (start..x_axis.n_bins())
        .find(|&ix| poly.find_cell(x_axis.center(ix), y) != Some(cell))
        .unwrap_or(x_axis.n_bins())
}

/// Rewrite bins `start - 1 .. end` of row `iy` as a ramp from `prev` to
/// `curr`. `start - 1` is the bin where the run's cell was first assigned.
fn fill_run(surface: &mut DenseSurface, iy: usize, start: usize, end: usize, prev: f64, curr: f64) {
    debug_assert!(start >= 1 && end > start);
    let k = end - start;
    let step = (curr - prev) / (k + 1) as f64;

    surface.set(end - 1, iy, curr);
    for m in 1..=k {
        surface.set(start + m - 2, iy, prev + m as f64 * step);
    }
}
