use std::collections::BTreeSet;

use thiserror::Error;

use crate::{PixelBuffer, Rgb};

/// Name of the single worksheet in exported workbooks.
pub const SHEET_NAME: &str = "Result";

/// Uniform width applied to every used column, in character units. Narrow
/// enough that cells render roughly square, i.e. pixel-like.
pub const COLUMN_WIDTH: f64 = 2.0;

/// Hard XLSX sheet bounds.
pub const XLSX_MAX_ROWS: u32 = 1_048_576;
pub const XLSX_MAX_COLS: u32 = 16_384;

/// Default row cap. One row per source pixel row adds up quickly; anything
/// taller than this is almost certainly a mistake rather than pixel art.
pub const DEFAULT_MAX_ROWS: u32 = 2_000;

/// Default cap on total cells, row cap notwithstanding. Keeps wide custom
/// canvases from multiplying into multi-hundred-megabyte workbooks.
pub const DEFAULT_MAX_CELLS: u64 = 1_048_576;

/// Caps on grid size. Checked against the prospective dimensions before any
/// canvas or grid is allocated, so oversized inputs get a clear rejection
/// instead of a silent multi-minute export (or a failed allocation).
#[derive(Clone, Copy, Debug)]
pub struct GridLimits {
    pub max_rows: u32,
    pub max_cells: u64,
}

impl Default for GridLimits {
    fn default() -> Self {
        Self {
            max_rows: DEFAULT_MAX_ROWS,
            max_cells: DEFAULT_MAX_CELLS,
        }
    }
}

impl GridLimits {
    /// Validate prospective grid dimensions without building the grid.
    pub fn check(&self, rows: u32, cols: u32) -> Result<(), GridError> {
        if cols > XLSX_MAX_COLS {
            return Err(GridError::TooManyColumns {
                cols,
                max_cols: XLSX_MAX_COLS,
            });
        }
        let max_rows = self.max_rows.min(XLSX_MAX_ROWS);
        if rows > max_rows {
            return Err(GridError::Oversized { rows, max_rows });
        }
        let cells = rows as u64 * cols as u64;
        if cells > self.max_cells {
            return Err(GridError::TooManyCells {
                cells,
                max_cells: self.max_cells,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum GridError {
    #[error("grid has {rows} rows, more than the {max_rows}-row cap")]
    Oversized { rows: u32, max_rows: u32 },
    #[error("grid has {cells} cells, more than the {max_cells}-cell cap")]
    TooManyCells { cells: u64, max_cells: u64 },
    #[error("grid has {cols} columns, more than the sheet limit of {max_cols}")]
    TooManyColumns { cols: u32, max_cols: u32 },
}

/// A rows × cols grid of optional solid cell fills.
///
/// Invariant: cell (r, c) corresponds exactly to pixel (r, c) of the buffer
/// it was built from. No interpolation, no merging; positions whose byte
/// offset fell outside the buffer are simply left unfilled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellGrid {
    rows: u32,
    cols: u32,
    fills: Vec<Option<Rgb>>,
}

impl CellGrid {
    pub fn new(rows: u32, cols: u32) -> Self {
        Self {
            rows,
            cols,
            fills: vec![None; rows as usize * cols as usize],
        }
    }

    /// Build the grid for a scaled canvas: one cell per pixel, same layout.
    pub fn from_pixels(pixels: &PixelBuffer) -> Self {
        let mut grid = Self::new(pixels.height(), pixels.width());
        for row in 0..grid.rows {
            for col in 0..grid.cols {
                if let Some(color) = pixels.rgb_at(row, col) {
                    grid.set(row, col, color);
                }
            }
        }
        grid
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn set(&mut self, row: u32, col: u32, color: Rgb) {
        if row < self.rows && col < self.cols {
            self.fills[(row as usize * self.cols as usize) + col as usize] = Some(color);
        }
    }

    /// Fill at 0-indexed (row, col); `None` when unfilled or out of range.
    pub fn fill(&self, row: u32, col: u32) -> Option<Rgb> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.fills[(row as usize * self.cols as usize) + col as usize]
    }

    /// Filled cells in row-major order as 0-indexed (row, col, color).
    pub fn iter_filled(&self) -> impl Iterator<Item = (u32, u32, Rgb)> + '_ {
        self.fills.iter().enumerate().filter_map(|(i, fill)| {
            fill.map(|color| {
                (
                    (i / self.cols as usize) as u32,
                    (i % self.cols as usize) as u32,
                    color,
                )
            })
        })
    }

    pub fn filled_count(&self) -> u64 {
        self.fills.iter().filter(|f| f.is_some()).count() as u64
    }

    pub fn distinct_colors(&self) -> usize {
        self.fills
            .iter()
            .flatten()
            .collect::<BTreeSet<_>>()
            .len()
    }

    pub fn check_limits(&self, limits: &GridLimits) -> Result<(), GridError> {
        limits.check(self.rows, self.cols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn red_green_buffer() -> PixelBuffer {
        let data = vec![
            255, 0, 0, 255, 0, 255, 0, 255, //
            255, 0, 0, 255, 0, 255, 0, 255,
        ];
        PixelBuffer::new(2, 2, data).unwrap()
    }

    #[test]
    fn grid_mirrors_the_pixel_buffer_exactly() {
        let grid = CellGrid::from_pixels(&red_green_buffer());
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.cols(), 2);
        assert_eq!(grid.fill(0, 0), Some(Rgb::new(255, 0, 0)));
        assert_eq!(grid.fill(0, 1), Some(Rgb::new(0, 255, 0)));
        assert_eq!(grid.fill(1, 0), Some(Rgb::new(255, 0, 0)));
        assert_eq!(grid.fill(1, 1), Some(Rgb::new(0, 255, 0)));
        assert_eq!(grid.filled_count(), 4);
        assert_eq!(grid.distinct_colors(), 2);
    }

    #[test]
    fn iter_filled_is_row_major() {
        let grid = CellGrid::from_pixels(&red_green_buffer());
        let positions: Vec<(u32, u32)> = grid.iter_filled().map(|(r, c, _)| (r, c)).collect();
        assert_eq!(positions, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn set_ignores_out_of_range_positions() {
        let mut grid = CellGrid::new(1, 1);
        grid.set(1, 0, Rgb::black());
        grid.set(0, 1, Rgb::black());
        assert_eq!(grid.filled_count(), 0);
        grid.set(0, 0, Rgb::black());
        assert_eq!(grid.fill(0, 0), Some(Rgb::black()));
    }

    #[test]
    fn limits_reject_tall_wide_and_dense_grids() {
        let limits = GridLimits {
            max_rows: 10,
            max_cells: 50,
        };
        assert!(matches!(
            CellGrid::new(11, 1).check_limits(&limits),
            Err(GridError::Oversized { rows: 11, .. })
        ));
        assert!(matches!(
            CellGrid::new(10, 6).check_limits(&limits),
            Err(GridError::TooManyCells { cells: 60, .. })
        ));
        assert!(matches!(
            CellGrid::new(1, XLSX_MAX_COLS + 1).check_limits(&limits),
            Err(GridError::TooManyColumns { .. })
        ));
        assert!(CellGrid::new(10, 5).check_limits(&limits).is_ok());
    }

    #[test]
    fn limits_validate_dimensions_without_a_grid() {
        // Dimensions whose grid could never be allocated are still rejected.
        let limits = GridLimits::default();
        assert!(matches!(
            limits.check(15_000_000, 300),
            Err(GridError::Oversized { rows: 15_000_000, .. })
        ));
        assert!(limits.check(DEFAULT_MAX_ROWS, 300).is_ok());
    }

    #[test]
    fn default_limits_cap_total_cells() {
        let limits = GridLimits::default();
        assert_eq!(limits.max_cells, DEFAULT_MAX_CELLS);
        // Within the row and column caps but past the cell cap.
        assert!(matches!(
            limits.check(DEFAULT_MAX_ROWS, XLSX_MAX_COLS),
            Err(GridError::TooManyCells { .. })
        ));
    }
}
