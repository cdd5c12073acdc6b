//! Variable-grid construction: one [`PolySurface`] cell per tabulated sample.
//!
//! Cell edges sit at the midpoints between neighbouring samples:
//!
//! ```text
//! y edges: +limit | mid(y0, y1) | mid(y1, y2) | ... | -limit
//! x edges: origin | mid(x0, x1) | mid(x1, x2) | ... | max(x) + margin
//! ```
//!
//! The final x edge is shared by every slice, so the surface has a
//! rectangular bounding box even though slices hold different numbers of
//! cells.

use crate::grid::PolySurface;
use crate::types::{GridError, InputShapeError, SampleSet, XsecError};
use tracing::debug;

/// Domain settings for [`build_poly_surface`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridBuilderOptions {
    /// Lower x edge of every slice
    pub x_origin: f64,
    /// Added to the largest observed x to form the upper x edge
    pub x_margin: f64,
    /// Outer y edges are placed at `±y_limit`
    pub y_limit: f64,
}

impl Default for GridBuilderOptions {
    fn default() -> Self {
        Self {
            x_origin: 0.0,
            x_margin: 0.001,
            y_limit: 1.01,
        }
    }
}

impl GridBuilderOptions {
    /// Validates the options.
    ///
    /// # Errors
    ///
    /// `GridError::InvalidParameter` if the margin or limit is not positive
    /// and finite, or the origin is not finite.
    pub fn validate(&self) -> Result<(), GridError> {
        if !self.x_origin.is_finite() {
            return Err(GridError::InvalidParameter {
                name: "x_origin",
                value: format!("{} is not finite", self.x_origin),
            });
        }
        if !(self.x_margin.is_finite() && self.x_margin > 0.0) {
            return Err(GridError::InvalidParameter {
                name: "x_margin",
                value: format!("{} must be positive", self.x_margin),
            });
        }
        if !(self.y_limit.is_finite() && self.y_limit > 0.0) {
            return Err(GridError::InvalidParameter {
                name: "y_limit",
                value: format!("{} must be positive", self.y_limit),
            });
        }
        Ok(())
    }
}

/// Build the irregular-grid surface for one sample set.
///
/// Produces exactly one cell per sample and fills each with that sample's
/// value.
///
/// # Errors
///
/// - `XsecError::Grid` for invalid options
/// - `XsecError::InputShape` for empty sets or slices, non-finite data,
///   x below the origin, non-increasing or duplicate x within a slice,
///   non-monotonic slice coordinates, or a cell not receiving exactly one
///   sample
///
/// # Example
///
/// ```
/// use xsec_core::math::grid_builder::{build_poly_surface, GridBuilderOptions};
/// use xsec_core::types::SampleSet;
///
/// let mut set = SampleSet::new(10.0);
/// let a = set.begin_slice(0, 0.5);
/// a.push(1.0, 10.0);
/// a.push(3.0, 20.0);
/// set.begin_slice(90, -0.5).push(2.0, 30.0);
///
/// let poly = build_poly_surface(&set, &GridBuilderOptions::default()).unwrap();
/// assert_eq!(poly.n_cells(), 3);
/// assert_eq!(poly.value(poly.find_cell(2.5, 0.5).unwrap()), 20.0);
/// ```
pub fn build_poly_surface(
    set: &SampleSet,
    options: &GridBuilderOptions,
) -> Result<PolySurface, XsecError> {
    options.validate()?;
    validate_samples(set, options)?;

    let observed_max = set.x_max().ok_or(InputShapeError::EmptySampleSet)?;
    let x_max = observed_max + options.x_margin;
    let y_edges = slice_edges(set, options.y_limit);

    let mut poly = PolySurface::new(options.x_origin, x_max);
    for (s, slice) in set.slices.iter().enumerate() {
        let mut x_edges = Vec::with_capacity(slice.len() + 1);
        x_edges.push(options.x_origin);
        x_edges.extend(slice.samples.windows(2).map(|w| midpoint(w[0].x, w[1].x)));
        x_edges.push(x_max);
        poly.push_row(y_edges[s], y_edges[s + 1], x_edges);
    }

    let mut hits = vec![0usize; poly.n_cells()];
    for (s, slice) in set.slices.iter().enumerate() {
        for sample in &slice.samples {
            let cell = poly
                .fill(sample.x, slice.y, sample.value)
                .ok_or(InputShapeError::SliceOutOfRange {
                    slice: s,
                    y: slice.y,
                    limit: options.y_limit,
                })?;
            hits[cell] += 1;
        }
    }
    if let Some((cell, &n)) = hits.iter().enumerate().find(|&(_, &n)| n != 1) {
        return Err(InputShapeError::CellFill { cell, hits: n }.into());
    }

    debug!(
        parameter = set.parameter,
        slices = poly.n_rows(),
        cells = poly.n_cells(),
        x_max,
        "Built variable-grid surface"
    );
    Ok(poly)
}

#[inline]
fn midpoint(a: f64, b: f64) -> f64 {
    a + 0.5 * (b - a)
}

/// Row edges along y, ordered like the slices: the first slice's outer edge
/// sits on the side it is closest to.
fn slice_edges(set: &SampleSet, limit: f64) -> Vec<f64> {
    let n = set.slices.len();
    let descending = n < 2 || set.slices[1].y < set.slices[0].y;
    let outer = if descending { limit } else { -limit };

    let mut edges = Vec::with_capacity(n + 1);
    edges.push(outer);
    edges.extend(set.slices.windows(2).map(|w| midpoint(w[0].y, w[1].y)));
    edges.push(-outer);
    edges
}

fn validate_samples(set: &SampleSet, options: &GridBuilderOptions) -> Result<(), InputShapeError> {
    if set.slices.is_empty() {
        return Err(InputShapeError::EmptySampleSet);
    }

    let mut direction = 0.0;
    for (s, slice) in set.slices.iter().enumerate() {
        if slice.is_empty() {
            return Err(InputShapeError::EmptySlice { slice: s });
        }
        if !slice.y.is_finite() || slice.y.abs() >= options.y_limit {
            return Err(InputShapeError::SliceOutOfRange {
                slice: s,
                y: slice.y,
                limit: options.y_limit,
            });
        }
        if s > 0 {
            let previous = set.slices[s - 1].y;
            let step = slice.y - previous;
            if step == 0.0 || (direction != 0.0 && step.signum() != direction) {
                return Err(InputShapeError::NonMonotonicSlices {
                    slice: s,
                    previous,
                    y: slice.y,
                });
            }
            direction = step.signum();
        }

        for (i, sample) in slice.samples.iter().enumerate() {
            if !sample.x.is_finite() {
                return Err(InputShapeError::NonFinite {
                    slice: s,
                    index: i,
                    field: "x",
                });
            }
            if !sample.value.is_finite() {
                return Err(InputShapeError::NonFinite {
                    slice: s,
                    index: i,
                    field: "value",
                });
            }
            if sample.x < options.x_origin {
                return Err(InputShapeError::BelowOrigin {
                    slice: s,
                    x: sample.x,
                    origin: options.x_origin,
                });
            }
            if i > 0 {
                let previous = slice.samples[i - 1].x;
                if sample.x == previous {
                    return Err(InputShapeError::DuplicateX {
                        slice: s,
                        index: i,
                        x: sample.x,
                    });
                }
                if sample.x < previous {
                    return Err(InputShapeError::NonMonotonicX {
                        slice: s,
                        index: i,
                        previous,
                        x: sample.x,
                    });
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn set_from(slices: Vec<(f64, Vec<(f64, f64)>)>) -> SampleSet {
        let mut set = SampleSet::new(10.0);
        for (k, (y, points)) in slices.into_iter().enumerate() {
            let slice = set.begin_slice(k as i32 * 5, y);
            for (x, v) in points {
                slice.push(x, v);
            }
        }
        set
    }

    #[test]
    fn test_midpoint_edges() {
        let set = set_from(vec![(0.5, vec![(1.0, 10.0), (3.0, 20.0)]), (-0.5, vec![(1.0, 30.0)])]);
        let poly = build_poly_surface(&set, &GridBuilderOptions::default()).unwrap();
        let cells = poly.cells();

        assert_eq!(cells.len(), 3);
        assert_relative_eq!(cells[0].x_lo, 0.0);
        assert_relative_eq!(cells[0].x_hi, 2.0);
        assert_relative_eq!(cells[1].x_hi, 3.001);
        assert_relative_eq!(cells[0].y_lo, 0.0);
        assert_relative_eq!(cells[0].y_hi, 1.01);
        assert_relative_eq!(cells[2].y_lo, -1.01);
    }

    #[test]
    fn test_single_sample_slice_spans_full_width() {
        let set = set_from(vec![(0.2, vec![(1.0, 10.0), (2.0, 5.0), (4.0, 1.0)]), (-0.2, vec![(2.5, 7.0)])]);
        let poly = build_poly_surface(&set, &GridBuilderOptions::default()).unwrap();
        let last = poly.cells()[3];
        assert_relative_eq!(last.x_lo, 0.0);
        assert_relative_eq!(last.x_hi, 4.001);
        assert_eq!(last.value, 7.0);
    }

    #[test]
    fn test_ascending_slices() {
        let set = set_from(vec![(-0.5, vec![(1.0, 1.0)]), (0.5, vec![(1.0, 2.0)])]);
        let poly = build_poly_surface(&set, &GridBuilderOptions::default()).unwrap();
        assert_eq!(poly.value(poly.find_cell(1.0, -0.9).unwrap()), 1.0);
        assert_eq!(poly.value(poly.find_cell(1.0, 0.9).unwrap()), 2.0);
    }

    #[test]
    fn test_rejects_empty_set() {
        let set = SampleSet::new(1.0);
        assert_eq!(
            build_poly_surface(&set, &GridBuilderOptions::default()).unwrap_err(),
            XsecError::InputShape(InputShapeError::EmptySampleSet)
        );
    }

    #[test]
    fn test_rejects_empty_slice() {
        let mut set = set_from(vec![(0.5, vec![(1.0, 1.0)])]);
        set.begin_slice(5, 0.4);
        assert_eq!(
            build_poly_surface(&set, &GridBuilderOptions::default()).unwrap_err(),
            XsecError::InputShape(InputShapeError::EmptySlice { slice: 1 })
        );
    }

    #[test]
    fn test_rejects_duplicate_x() {
        let set = set_from(vec![(0.5, vec![(1.0, 1.0), (1.0, 2.0)])]);
        assert!(matches!(
            build_poly_surface(&set, &GridBuilderOptions::default()),
            Err(XsecError::InputShape(InputShapeError::DuplicateX { slice: 0, index: 1, .. }))
        ));
    }

    #[test]
    fn test_rejects_decreasing_x() {
        let set = set_from(vec![(0.5, vec![(2.0, 1.0), (1.0, 2.0)])]);
        assert!(matches!(
            build_poly_surface(&set, &GridBuilderOptions::default()),
            Err(XsecError::InputShape(InputShapeError::NonMonotonicX { .. }))
        ));
    }

    #[test]
    fn test_rejects_non_monotonic_slices() {
        let set = set_from(vec![
            (0.5, vec![(1.0, 1.0)]),
            (0.0, vec![(1.0, 1.0)]),
            (0.2, vec![(1.0, 1.0)]),
        ]);
        assert!(matches!(
            build_poly_surface(&set, &GridBuilderOptions::default()),
            Err(XsecError::InputShape(InputShapeError::NonMonotonicSlices { slice: 2, .. }))
        ));
    }

    #[test]
    fn test_rejects_below_origin() {
        let set = set_from(vec![(0.5, vec![(-0.1, 1.0)])]);
        assert!(matches!(
            build_poly_surface(&set, &GridBuilderOptions::default()),
            Err(XsecError::InputShape(InputShapeError::BelowOrigin { .. }))
        ));
    }

    #[test]
    fn test_rejects_invalid_options() {
        let set = set_from(vec![(0.5, vec![(1.0, 1.0)])]);
        let options = GridBuilderOptions {
            x_margin: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            build_poly_surface(&set, &options),
            Err(XsecError::Grid(GridError::InvalidParameter { name: "x_margin", .. }))
        ));
    }

    fn slices_strategy() -> impl Strategy<Value = Vec<Vec<(f64, f64)>>> {
        let slice = prop::collection::vec((0.01f64..5.0, 0.0f64..100.0), 1..12).prop_map(|steps| {
            let mut x = 0.0;
            steps
                .into_iter()
                .map(|(dx, v)| {
                    x += dx;
                    (x, v)
                })
                .collect::<Vec<_>>()
        });
        prop::collection::vec(slice, 1..8)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn test_one_cell_per_sample_and_no_gaps(slices in slices_strategy()) {
            let n = slices.len();
            let mut set = SampleSet::new(10.0);
            for (k, points) in slices.iter().enumerate() {
                let y = 0.9 - 1.8 * k as f64 / n as f64;
                let slice = set.begin_slice(k as i32, y);
                for &(x, v) in points {
                    slice.push(x, v);
                }
            }

            let poly = build_poly_surface(&set, &GridBuilderOptions::default()).unwrap();
            prop_assert_eq!(poly.n_cells(), set.len());
            for (row, slice) in set.slices.iter().enumerate() {
                prop_assert_eq!(poly.row_len(row), slice.len());
            }

            let (x0, x1, y0, y1) = poly.bounding_box();
            let area: f64 = poly.cells().iter().map(|c| c.area()).sum();
            prop_assert!((area - (x1 - x0) * (y1 - y0)).abs() < 1e-9 * (x1 - x0) * (y1 - y0));

            for sample in set.iter() {
                let cell = poly.find_cell(sample.x, sample.y).unwrap();
                prop_assert_eq!(poly.value(cell), sample.value);
            }
        }
    }
}
