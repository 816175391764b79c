//! Shared model types for the pixelsheet converter.
//!
//! The pipeline is: decode an image, scale it to a fixed-width canvas, read
//! the canvas back as a flat RGBA [`PixelBuffer`], and map every pixel onto a
//! [`CellGrid`] cell that carries a single solid fill color. This crate holds
//! those types plus the A1 addressing helpers the workbook layer needs; it
//! has no imaging or spreadsheet dependencies so the mapping logic stays
//! testable on its own.

mod address;
mod color;
mod grid;
mod pixels;

pub use address::{cell_ref, column_letters, parse_cell_ref};
pub use color::Rgb;
pub use grid::{
    CellGrid, GridError, GridLimits, COLUMN_WIDTH, DEFAULT_MAX_CELLS, DEFAULT_MAX_ROWS,
    SHEET_NAME, XLSX_MAX_COLS, XLSX_MAX_ROWS,
};
pub use pixels::{PixelBuffer, PixelBufferError};
