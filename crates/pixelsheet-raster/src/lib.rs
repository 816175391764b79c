//! Image decoding and scaling.
//!
//! Source images are decoded from raw bytes (format sniffed from content, no
//! extension whitelist) and resampled onto a fixed-width canvas with
//! nearest-neighbor filtering. No smoothing: each canvas pixel copies exactly
//! one source pixel, so the grid encoder downstream samples discrete source
//! colors rather than anti-aliased blends.

mod session;

use std::path::Path;

use image::imageops::FilterType;
use image::RgbaImage;
use pixelsheet_model::{PixelBuffer, PixelBufferError};
use thiserror::Error;

pub use session::{Generation, Session};

/// Default canvas width in pixels. Height follows the source aspect ratio.
pub const CANVAS_WIDTH: u32 = 300;

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("image decode failed: {0}")]
    Decode(#[from] image::ImageError),
    #[error("image has degenerate dimensions {width}x{height}")]
    EmptyImage { width: u32, height: u32 },
    #[error("canvas width must be nonzero")]
    ZeroTargetWidth,
    #[error("png encode failed: {0}")]
    Encode(#[source] image::ImageError),
    #[error(transparent)]
    Buffer(#[from] PixelBufferError),
}

/// A decoded source image at its natural resolution.
#[derive(Clone, Debug)]
pub struct DecodedImage {
    pixels: RgbaImage,
}

impl DecodedImage {
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

/// Decode an in-memory image file.
///
/// Zero-width or zero-height surfaces are rejected here, before any scaling
/// math can divide by the source width.
pub fn decode(bytes: &[u8]) -> Result<DecodedImage, RasterError> {
    let pixels = image::load_from_memory(bytes)?.to_rgba8();
    if pixels.width() == 0 || pixels.height() == 0 {
        return Err(RasterError::EmptyImage {
            width: pixels.width(),
            height: pixels.height(),
        });
    }
    Ok(DecodedImage { pixels })
}

/// Canvas height for a `width`x`height` source scaled to `target_width`:
/// `round(target_width * height / width)`, but never below one row so
/// extremely wide sources still produce a visible strip.
pub fn scaled_height(target_width: u32, width: u32, height: u32) -> u32 {
    let exact = target_width as f64 * height as f64 / width as f64;
    (exact.round() as u32).max(1)
}

/// Resample onto a canvas of exactly `target_width` pixels, nearest-neighbor.
pub fn scale_to_width(
    image: &DecodedImage,
    target_width: u32,
) -> Result<PixelBuffer, RasterError> {
    if target_width == 0 {
        return Err(RasterError::ZeroTargetWidth);
    }
    let target_height = scaled_height(target_width, image.width(), image.height());
    let resized = image::imageops::resize(
        &image.pixels,
        target_width,
        target_height,
        FilterType::Nearest,
    );
    Ok(PixelBuffer::new(
        target_width,
        target_height,
        resized.into_raw(),
    )?)
}

/// Write a scaled canvas back out as a PNG (the CLI's preview output).
pub fn write_png(pixels: &PixelBuffer, path: impl AsRef<Path>) -> Result<(), RasterError> {
    image::save_buffer(
        path,
        pixels.data(),
        pixels.width(),
        pixels.height(),
        image::ExtendedColorType::Rgba8,
    )
    .map_err(RasterError::Encode)
}
