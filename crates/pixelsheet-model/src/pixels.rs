use thiserror::Error;

use crate::Rgb;

#[derive(Debug, Error)]
pub enum PixelBufferError {
    #[error("pixel data is {actual} bytes but {width}x{height} RGBA needs {expected}")]
    BadLength {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// A flat, row-major RGBA byte buffer: 4 bytes per pixel, rows top to bottom.
///
/// This is the read-only view of the scaled canvas that the grid encoder
/// samples from. Alpha is carried in the data but never used for cell fills;
/// the exported workbook is fully opaque regardless of source transparency.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, PixelBufferError> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(PixelBufferError::BadLength {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Color of the pixel at 0-indexed (row, col).
    ///
    /// Reads the byte offset `(row * width + col) * 4` with a bounds guard so
    /// a row/column miscount can never read past the buffer; out-of-range
    /// positions return `None`. The alpha byte at `offset + 3` is ignored.
    pub fn rgb_at(&self, row: u32, col: u32) -> Option<Rgb> {
        if col >= self.width {
            return None;
        }
        let offset = (row as usize * self.width as usize + col as usize) * 4;
        if offset + 4 > self.data.len() {
            return None;
        }
        Some(Rgb::new(
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
        ))
    }
}
