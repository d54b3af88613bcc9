//! Background flattening and print frames

use crate::engine::parameters::FrameMargins;
use crate::io::error::Result;
use crate::raster::canvas::unit_rgba;
use crate::raster::{Canvas, RasterBitmap};
use image::Rgba;

/// Surround `image` with `margins` of `background` and flatten it onto it
///
/// The output is `width + left + right` by `height + top + bottom`; the
/// source sits at `(left, top)` composited over the background.
///
/// # Errors
///
/// Returns `RasterError::AllocationFailure` when the framed canvas is too large.
pub fn apply_frame(
    image: &RasterBitmap,
    margins: FrameMargins,
    background: Rgba<u8>,
) -> Result<RasterBitmap> {
    let (width, height) = margins.framed_size(image.width(), image.height());
    let mut canvas = Canvas::filled(width, height, unit_rgba(background))?;
    match image {
        RasterBitmap::Rgba(rgba) => canvas.draw_image(rgba, margins.left, margins.top),
        RasterBitmap::Gray(_) => canvas.draw_image(&image.to_rgba(), margins.left, margins.top),
    }
    Ok(RasterBitmap::Rgba(canvas.to_rgba_image()))
}

/// Composite `image` onto a solid `background` without margins
///
/// # Errors
///
/// Returns `RasterError::AllocationFailure` when the canvas cannot be allocated.
pub fn flatten(image: &RasterBitmap, background: Rgba<u8>) -> Result<RasterBitmap> {
    apply_frame(image, FrameMargins::NONE, background)
}
