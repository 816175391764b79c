use pixelsheet_model::{CellGrid, GridError, GridLimits, PixelBuffer};
use pixelsheet_raster::{self as raster, Generation, RasterError, Session};
use pixelsheet_xlsx::XlsxWriteError;
use thiserror::Error;

#[derive(Clone, Copy, Debug)]
pub struct ConvertOptions {
    pub canvas_width: u32,
    pub limits: GridLimits,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            canvas_width: raster::CANVAS_WIDTH,
            limits: GridLimits::default(),
        }
    }
}

/// Everything that can go wrong in one conversion. All variants are
/// recoverable: report, exit nonzero, let the user retry with another file.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The requested canvas width is zero.
    #[error("canvas width must be nonzero")]
    BadWidth,
    /// Input bytes were not a decodable image.
    #[error(transparent)]
    Decode(RasterError),
    /// The image decoded but has zero width or height.
    #[error(transparent)]
    EmptyImage(RasterError),
    /// The scaled canvas could not be assembled.
    #[error("canvas construction failed: {0}")]
    Canvas(#[source] RasterError),
    /// The scaled grid exceeds the configured or format limits.
    #[error(transparent)]
    Oversized(#[from] GridError),
    /// Workbook serialization failed.
    #[error("workbook serialization failed: {0}")]
    Serialize(#[from] XlsxWriteError),
    /// A newer upload superseded this one before it finished.
    #[error("conversion was superseded by a newer upload")]
    Stale,
}

/// The result of one successful conversion. The workbook is fully serialized
/// in memory; nothing has touched the filesystem yet.
#[derive(Debug)]
pub struct Conversion {
    pub source_width: u32,
    pub source_height: u32,
    pub canvas: PixelBuffer,
    pub grid: CellGrid,
    pub workbook: Vec<u8>,
}

pub fn convert_bytes(bytes: &[u8], options: &ConvertOptions) -> Result<Conversion, ConvertError> {
    if options.canvas_width == 0 {
        return Err(ConvertError::BadWidth);
    }

    let image = raster::decode(bytes).map_err(|err| match err {
        RasterError::EmptyImage { .. } => ConvertError::EmptyImage(err),
        other => ConvertError::Decode(other),
    })?;
    log::debug!("decoded {}x{} source image", image.width(), image.height());

    // Limits are checked against the prospective dimensions before the canvas
    // exists. A 1-pixel-wide, very tall source scales to millions of rows;
    // resizing it first would try to allocate the whole canvas just to throw
    // it away.
    let rows = raster::scaled_height(options.canvas_width, image.width(), image.height());
    options.limits.check(rows, options.canvas_width)?;

    let canvas = raster::scale_to_width(&image, options.canvas_width).map_err(|err| match err {
        RasterError::ZeroTargetWidth => ConvertError::BadWidth,
        other => ConvertError::Canvas(other),
    })?;
    log::debug!("scaled to {}x{} canvas", canvas.width(), canvas.height());

    let grid = CellGrid::from_pixels(&canvas);

    let workbook = pixelsheet_xlsx::write_grid_to_vec(&grid)?;
    log::debug!(
        "serialized {} filled cells ({} colors) into {} bytes",
        grid.filled_count(),
        grid.distinct_colors(),
        workbook.len()
    );

    Ok(Conversion {
        source_width: image.width(),
        source_height: image.height(),
        canvas,
        grid,
        workbook,
    })
}

/// Latest-wins driver for overlapping uploads.
///
/// Each upload takes a [`Generation`] token from [`Converter::begin_upload`];
/// [`Converter::complete`] runs the pipeline only while that token is still
/// the newest and commits it on success, so a slow older upload can never
/// overwrite the result of a newer one. The CLI runs exactly one upload per
/// invocation; embedders feeding uploads concurrently get the discard
/// behavior for free.
#[derive(Debug, Default)]
pub struct Converter {
    session: Session,
    options: ConvertOptions,
}

impl Converter {
    pub fn new(options: ConvertOptions) -> Self {
        Self {
            session: Session::new(),
            options,
        }
    }

    /// Register a new upload, making every earlier one stale.
    pub fn begin_upload(&mut self) -> Generation {
        self.session.begin()
    }

    /// Convert the bytes of the upload identified by `generation`. Fails with
    /// [`ConvertError::Stale`] when a newer upload has begun since.
    pub fn complete(
        &mut self,
        generation: Generation,
        bytes: &[u8],
    ) -> Result<Conversion, ConvertError> {
        if !self.session.is_current(generation) {
            log::info!("discarding stale upload generation {}", generation.get());
            return Err(ConvertError::Stale);
        }
        let conversion = convert_bytes(bytes, &self.options)?;
        if !self.session.commit(generation) {
            return Err(ConvertError::Stale);
        }
        Ok(conversion)
    }
}
