//! Uniform square grid over the simulated area.
//!
//! Cells are `cell_size` meters wide, indexed row-major from the origin.
//! The column count is `ceil(area_width / cell_size)`, so a partial column at
//! the right edge still gets its own index.

use serde::{Deserialize, Serialize};

use patrol_core::types::Coords;

use crate::geometry::segments_intersect;

/// Integer cell coordinates: column `cx`, row `cy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCell {
    pub cx: i64,
    pub cy: i64,
}

impl GridCell {
    pub const fn new(cx: i64, cy: i64) -> Self {
        Self { cx, cy }
    }

    /// Lower-left corner of the cell.
    pub fn origin(&self, cell_size: f64) -> Coords {
        Coords::new(self.cx as f64 * cell_size, self.cy as f64 * cell_size)
    }

    /// Center of the cell.
    pub fn center(&self, cell_size: f64) -> Coords {
        let o = self.origin(cell_size);
        Coords::new(o.x + cell_size / 2.0, o.y + cell_size / 2.0)
    }

    /// The four edges as (start, end) pairs: bottom, left, right, top.
    fn edges(&self, cell_size: f64) -> [(Coords, Coords); 4] {
        let ll = self.origin(cell_size);
        let lr = Coords::new(ll.x + cell_size, ll.y);
        let ul = Coords::new(ll.x, ll.y + cell_size);
        let ur = Coords::new(ll.x + cell_size, ll.y + cell_size);
        [(ll, lr), (ll, ul), (lr, ur), (ul, ur)]
    }
}

/// Number of columns covering `area_width`.
///
/// # Panics
///
/// Panics if `cell_size` is not positive.
pub fn columns(cell_size: f64, area_width: f64) -> i64 {
    assert!(cell_size > 0.0, "grid queried with cell size {cell_size}");
    (area_width / cell_size).ceil() as i64
}

/// Row-major index of `cell`.
///
/// # Panics
///
/// Panics if `cell_size` is not positive.
pub fn cell_index(cell_size: f64, area_width: f64, cell: GridCell) -> i64 {
    cell.cx + columns(cell_size, area_width) * cell.cy
}

/// Map a position to its cell index and cell coordinates.
///
/// A point on the right wall (`x == area_width` with a width that is a whole
/// number of cells) lands in column `columns`, one past the last column, so
/// its index equals that of cell `(0, cy + 1)`. Compare cell coordinates
/// rather than indices when positions can sit on that wall.
///
/// # Panics
///
/// Panics if `cell_size` is not positive: the grid is disabled in that case
/// and callers must not query it.
pub fn coord_to_cell(cell_size: f64, area_width: f64, x: f64, y: f64) -> (i64, GridCell) {
    assert!(cell_size > 0.0, "grid queried with cell size {cell_size}");

    let cell = GridCell::new((x / cell_size).floor() as i64, (y / cell_size).floor() as i64);
    (cell_index(cell_size, area_width, cell), cell)
}

/// Cells crossed by the straight move from `start` to `end`.
///
/// Moves that stay within one row or one column enumerate that strip
/// directly. Any other move scans the bounding rectangle of the two endpoint
/// cells and keeps the cells whose edges the move's line crosses. The result
/// has no duplicates.
pub fn cells_in_travel(cell_size: f64, area_width: f64, start: Coords, end: Coords) -> Vec<GridCell> {
    let (_, from) = coord_to_cell(cell_size, area_width, start.x, start.y);
    let (_, to) = coord_to_cell(cell_size, area_width, end.x, end.y);

    let (min_x, max_x) = (from.cx.min(to.cx), from.cx.max(to.cx));
    let (min_y, max_y) = (from.cy.min(to.cy), from.cy.max(to.cy));

    if from.cy == to.cy {
        return (min_x..=max_x).map(|cx| GridCell::new(cx, from.cy)).collect();
    }
    if from.cx == to.cx {
        return (min_y..=max_y).map(|cy| GridCell::new(from.cx, cy)).collect();
    }

    let mut cells = Vec::new();
    for cx in min_x..=max_x {
        for cy in min_y..=max_y {
            let cell = GridCell::new(cx, cy);
            let crossed = cell
                .edges(cell_size)
                .iter()
                .any(|&(e1, e2)| segments_intersect(start, end, e1, e2));
            if crossed {
                cells.push(cell);
            }
        }
    }
    cells
}

/// Every cell covering a `width` x `height` area with its center, ordered
/// column by column.
///
/// # Panics
///
/// Panics if `cell_size` is not positive.
pub fn all_centers(width: f64, height: f64, cell_size: f64) -> Vec<((i64, GridCell), Coords)> {
    assert!(cell_size > 0.0, "grid queried with cell size {cell_size}");

    let mut centers = Vec::new();
    let mut x = 0.0;
    while x < width {
        let mut y = 0.0;
        while y < height {
            let (index, cell) = coord_to_cell(cell_size, width, x, y);
            centers.push(((index, cell), cell.center(cell_size)));
            y += cell_size;
        }
        x += cell_size;
    }
    centers
}
