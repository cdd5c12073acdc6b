//! Irregular-grid surface with one cell per tabulated sample.

/// Axis-aligned rectangular cell of a [`PolySurface`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolyCell {
    /// Lower x edge (inclusive)
    pub x_lo: f64,
    /// Upper x edge (exclusive)
    pub x_hi: f64,
    /// Lower y edge (inclusive)
    pub y_lo: f64,
    /// Upper y edge (exclusive)
    pub y_hi: f64,
    /// Row (slice) the cell belongs to
    pub row: usize,
    /// Accumulated value
    pub value: f64,
}

impl PolyCell {
    /// Cell area.
    #[inline]
    pub fn area(&self) -> f64 {
        (self.x_hi - self.x_lo) * (self.y_hi - self.y_lo)
    }
}

/// One horizontal band of cells sharing a y range.
#[derive(Debug, Clone, PartialEq)]
struct PolyRow {
    y_lo: f64,
    y_hi: f64,
    /// Ascending x edges; `x_edges.len() - 1` cells
    x_edges: Vec<f64>,
    /// Index of the row's first cell in `PolySurface::cells`
    first_cell: usize,
}

/// Partition of a rectangular domain into rows of variable-width cells.
///
/// Every row spans the full x range of the surface; rows differ in how many
/// cells they hold and where the interior edges sit. Cells are numbered row
/// by row in the order rows were added, left to right inside a row.
///
/// Built by [`crate::math::grid_builder::build_poly_surface`].
#[derive(Debug, Clone, PartialEq)]
pub struct PolySurface {
    rows: Vec<PolyRow>,
    cells: Vec<PolyCell>,
    x_min: f64,
    x_max: f64,
}

impl PolySurface {
    /// Create an empty surface covering `[x_min, x_max)`.
    pub(crate) fn new(x_min: f64, x_max: f64) -> Self {
        Self {
            rows: Vec::new(),
            cells: Vec::new(),
            x_min,
            x_max,
        }
    }

    /// Append a row between `y_a` and `y_b` (either order) whose cells are
    /// delimited by `x_edges`. The first and last edge must equal the
    /// surface bounds.
    pub(crate) fn push_row(&mut self, y_a: f64, y_b: f64, x_edges: Vec<f64>) {
        debug_assert!(x_edges.len() >= 2);
        let row = self.rows.len();
        let (y_lo, y_hi) = if y_a <= y_b { (y_a, y_b) } else { (y_b, y_a) };
        let first_cell = self.cells.len();
        self.cells.extend(x_edges.windows(2).map(|w| PolyCell {
            x_lo: w[0],
            x_hi: w[1],
            y_lo,
            y_hi,
            row,
            value: 0.0,
        }));
        self.rows.push(PolyRow {
            y_lo,
            y_hi,
            x_edges,
            first_cell,
        });
    }

    /// Add `weight` to the cell containing `(x, y)`.
    ///
    /// Returns the cell index, or `None` when the point lies outside the
    /// surface.
    pub fn fill(&mut self, x: f64, y: f64, weight: f64) -> Option<usize> {
        let cell = self.find_cell(x, y)?;
        self.cells[cell].value += weight;
        Some(cell)
    }

    /// Index of the cell containing `(x, y)`, or `None` outside the domain.
    pub fn find_cell(&self, x: f64, y: f64) -> Option<usize> {
        let row = self.rows.iter().find(|r| y >= r.y_lo && y < r.y_hi)?;
        let pos = row.x_edges.partition_point(|&e| e <= x);
        if pos == 0 || pos >= row.x_edges.len() {
            return None;
        }
        Some(row.first_cell + pos - 1)
    }

    /// Value stored in `cell`.
    #[inline]
    pub fn value(&self, cell: usize) -> f64 {
        self.cells[cell].value
    }

    /// Value of the cell to the left of `cell` in the same row, or 0 for
    /// the first cell of a row.
    pub fn preceding_value(&self, cell: usize) -> f64 {
        let row = &self.rows[self.cells[cell].row];
        if cell == row.first_cell {
            0.0
        } else {
            self.cells[cell - 1].value
        }
    }

    /// All cells, row by row.
    #[inline]
    pub fn cells(&self) -> &[PolyCell] {
        &self.cells
    }

    /// Number of cells.
    #[inline]
    pub fn n_cells(&self) -> usize {
        self.cells.len()
    }

    /// Number of rows.
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of cells in `row`.
    pub fn row_len(&self, row: usize) -> usize {
        self.rows[row].x_edges.len() - 1
    }

    /// Bounding box as `(x_min, x_max, y_min, y_max)`.
    pub fn bounding_box(&self) -> (f64, f64, f64, f64) {
        let y_min = self.rows.iter().map(|r| r.y_lo).fold(f64::INFINITY, f64::min);
        let y_max = self
            .rows
            .iter()
            .map(|r| r.y_hi)
            .fold(f64::NEG_INFINITY, f64::max);
        (self.x_min, self.x_max, y_min, y_max)
    }
}
