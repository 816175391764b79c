//! The `pixelsheet` command line tool.
//!
//! One conversion per invocation: read an image file, scale it to a
//! fixed-width canvas, and write an XLSX workbook with one solid-fill cell
//! per canvas pixel. The pipeline itself lives in [`convert_bytes`] so it can
//! be driven without a filesystem.

pub mod cli;
mod convert;
mod report;

use std::path::{Path, PathBuf};

pub use convert::{convert_bytes, Conversion, Converter, ConvertError, ConvertOptions};
pub use report::ConversionReport;

/// Default output path: the input with its extension replaced by `.xlsx`
/// (`photo.png` → `photo.xlsx`). Inputs without an extension get one added.
pub fn output_path_for(input: &Path) -> PathBuf {
    input.with_extension("xlsx")
}
