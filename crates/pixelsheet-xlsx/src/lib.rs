//! XLSX serialization of pixel cell grids.
//!
//! The writer emits a minimal Open Packaging Convention package by hand:
//! fixed part order, Deflate compression, no timestamps or nondeterministic
//! metadata, so serializing the same grid twice yields byte-identical output.
//! The reader parses an exported package back into a grid; it exists so tests
//! and callers can verify the pixel-to-cell contract without opening Excel.

mod read;
mod writer;

pub use read::{read_grid, ColSpan, SheetGrid, XlsxReadError};
pub use writer::{write_grid, write_grid_to_vec, write_grid_to_writer, XlsxWriteError};
