use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use pixelsheet_model::{GridLimits, DEFAULT_MAX_ROWS};

use crate::{output_path_for, ConversionReport, Converter, ConvertOptions};

#[derive(Clone, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(
    about = "Convert a raster image into an XLSX workbook whose cells reproduce its pixels."
)]
pub struct Args {
    /// Input image. The format is sniffed from the file content, not the
    /// extension.
    input: PathBuf,

    /// Output workbook path. Defaults to the input with its extension
    /// replaced by `.xlsx`.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Canvas width in pixels (one column per pixel). Height follows the
    /// source aspect ratio.
    #[arg(long, default_value_t = pixelsheet_raster::CANVAS_WIDTH)]
    width: u32,

    /// Reject conversions whose grid would exceed this many rows.
    #[arg(long, default_value_t = DEFAULT_MAX_ROWS)]
    max_rows: u32,

    /// Also write the scaled canvas as a PNG.
    #[arg(long, value_name = "PATH")]
    preview: Option<PathBuf>,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

pub fn run() -> Result<()> {
    run_with_args(Args::parse())
}

pub fn run_with_args(args: Args) -> Result<()> {
    let start = Instant::now();

    let bytes = std::fs::read(&args.input)
        .with_context(|| format!("read {}", args.input.display()))?;

    let options = ConvertOptions {
        canvas_width: args.width,
        limits: GridLimits {
            max_rows: args.max_rows,
            ..GridLimits::default()
        },
    };

    // One upload per invocation; the converter stamps it with a generation
    // token and commits the result, the same path an embedder with
    // overlapping uploads would drive.
    let mut converter = Converter::new(options);
    let generation = converter.begin_upload();
    log::info!(
        "converting {} (upload generation {})",
        args.input.display(),
        generation.get()
    );

    let conversion = converter
        .complete(generation, &bytes)
        .with_context(|| format!("convert {}", args.input.display()))?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| output_path_for(&args.input));
    // The workbook is complete before the destination is touched, so a failed
    // conversion never leaves a partial file behind.
    std::fs::write(&output, &conversion.workbook)
        .with_context(|| format!("write {}", output.display()))?;

    if let Some(preview) = &args.preview {
        pixelsheet_raster::write_png(&conversion.canvas, preview)
            .with_context(|| format!("write preview {}", preview.display()))?;
    }

    let report = ConversionReport {
        input: args.input.display().to_string(),
        output: output.display().to_string(),
        source_width: conversion.source_width,
        source_height: conversion.source_height,
        canvas_width: conversion.canvas.width(),
        canvas_height: conversion.canvas.height(),
        filled_cells: conversion.grid.filled_count(),
        distinct_colors: conversion.grid.distinct_colors(),
        output_bytes: conversion.workbook.len() as u64,
        duration_ms: start.elapsed().as_millis(),
    };

    match args.format {
        OutputFormat::Text => report.print_text(),
        OutputFormat::Json => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            serde_json::to_writer(&mut handle, &report)?;
            handle.write_all(b"\n")?;
        }
    }

    Ok(())
}
