//! Floating-point drawing surface with circle fill and layer blending
//!
//! Pixels are held as straight-alpha RGBA in [0, 1]. All drawing clips to
//! the canvas bounds; nothing outside is ever touched.

use crate::io::configuration::MAX_CANVAS_PIXELS;
use crate::io::error::{RasterError, Result};
use crate::math::tone::{clamp_unit, u8_from_unit, unit_from_u8};
use image::{Rgba, RgbaImage};
use ndarray::Array2;

/// Straight-alpha RGBA color with unit-range channels
pub type UnitRgba = [f32; 4];

/// Convert an 8-bit color to unit range
pub fn unit_rgba(color: Rgba<u8>) -> UnitRgba {
    let [r, g, b, a] = color.0;
    [
        unit_from_u8(r),
        unit_from_u8(g),
        unit_from_u8(b),
        unit_from_u8(a),
    ]
}

/// Convert a unit-range color to 8 bits per channel
pub fn rgba_from_unit(color: UnitRgba) -> Rgba<u8> {
    let [r, g, b, a] = color;
    Rgba([
        u8_from_unit(r),
        u8_from_unit(g),
        u8_from_unit(b),
        u8_from_unit(a),
    ])
}

/// Composite `src` over `dst` with porter-duff source-over
fn source_over(dst: UnitRgba, src: [f32; 3], src_alpha: f32) -> UnitRgba {
    let dst_alpha = dst[3];
    let out_alpha = dst_alpha.mul_add(1.0 - src_alpha, src_alpha);
    if out_alpha <= f32::EPSILON {
        return [0.0; 4];
    }

    let mix = |s: f32, d: f32| (s * src_alpha + d * dst_alpha * (1.0 - src_alpha)) / out_alpha;
    [
        mix(src[0], dst[0]),
        mix(src[1], dst[1]),
        mix(src[2], dst[2]),
        out_alpha,
    ]
}

/// Owned drawing surface
#[derive(Debug, Clone)]
pub struct Canvas {
    pixels: Array2<UnitRgba>,
}

impl Canvas {
    /// Create a fully transparent canvas
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::AllocationFailure`] if the pixel buffer exceeds
    /// the canvas size limit or cannot be reserved.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::filled(width, height, [0.0; 4])
    }

    /// Create a canvas with every pixel set to `color`
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::AllocationFailure`] if the pixel buffer exceeds
    /// the canvas size limit or cannot be reserved.
    pub fn filled(width: u32, height: u32, color: UnitRgba) -> Result<Self> {
        let allocation_failure = || RasterError::AllocationFailure { width, height };

        let pixel_count = u64::from(width) * u64::from(height);
        if pixel_count > MAX_CANVAS_PIXELS {
            return Err(allocation_failure());
        }
        let pixel_count = usize::try_from(pixel_count).map_err(|_reason| allocation_failure())?;

        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(pixel_count)
            .map_err(|_reason| allocation_failure())?;
        buffer.resize(pixel_count, color);

        let pixels = Array2::from_shape_vec((height as usize, width as usize), buffer)
            .map_err(|_reason| allocation_failure())?;
        Ok(Self { pixels })
    }

    /// Canvas width in pixels
    pub fn width(&self) -> u32 {
        self.pixels.ncols() as u32
    }

    /// Canvas height in pixels
    pub fn height(&self) -> u32 {
        self.pixels.nrows() as u32
    }

    /// Color at a pixel, or `None` outside the canvas
    pub fn pixel(&self, x: u32, y: u32) -> Option<UnitRgba> {
        self.pixels.get([y as usize, x as usize]).copied()
    }

    /// Composite a color over one pixel with the given coverage
    pub fn blend_over(&mut self, x: u32, y: u32, color: UnitRgba, coverage: f32) {
        let src_alpha = clamp_unit(color[3] * coverage);
        if src_alpha <= 0.0 {
            return;
        }
        if let Some(dst) = self.pixels.get_mut([y as usize, x as usize]) {
            *dst = source_over(*dst, [color[0], color[1], color[2]], src_alpha);
        }
    }

    /// Paint a filled, anti-aliased circle
    ///
    /// Pixels whose centers fall within `radius` are fully covered; a
    /// one-pixel band around the edge is partially covered. The circle is
    /// clipped to the canvas.
    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: UnitRgba) {
        if radius <= 0.0 || !cx.is_finite() || !cy.is_finite() {
            return;
        }

        let reach = radius + 0.5;
        let max_x = self.width() as f32 - 1.0;
        let max_y = self.height() as f32 - 1.0;
        if max_x < 0.0 || max_y < 0.0 {
            return;
        }

        let x0 = (cx - reach).floor().max(0.0);
        let x1 = (cx + reach).ceil().min(max_x);
        let y0 = (cy - reach).floor().max(0.0);
        let y1 = (cy + reach).ceil().min(max_y);
        if x0 > x1 || y0 > y1 {
            return;
        }

        for y in (y0 as u32)..=(y1 as u32) {
            let dy = y as f32 + 0.5 - cy;
            for x in (x0 as u32)..=(x1 as u32) {
                let dx = x as f32 + 0.5 - cx;
                let distance = dx.hypot(dy);
                let coverage = clamp_unit(reach - distance);
                if coverage > 0.0 {
                    self.blend_over(x, y, color, coverage);
                }
            }
        }
    }

    /// Blend a same-sized layer onto the canvas with a multiply blend
    ///
    /// `opacity` scales the layer's own alpha. Where the canvas is still
    /// transparent the layer shows through unchanged, so the first layer on
    /// an empty canvas reproduces its colors.
    pub fn multiply_layer(&mut self, layer: &RgbaImage, opacity: f32) {
        for (x, y, pixel) in layer.enumerate_pixels() {
            let src = unit_rgba(*pixel);
            let src_alpha = clamp_unit(src[3] * opacity);
            if src_alpha <= 0.0 {
                continue;
            }
            if let Some(dst) = self.pixels.get_mut([y as usize, x as usize]) {
                let backdrop_alpha = dst[3];
                let blended = |s: f32, d: f32| (1.0 - backdrop_alpha).mul_add(s, backdrop_alpha * s * d);
                let mixed = [
                    blended(src[0], dst[0]),
                    blended(src[1], dst[1]),
                    blended(src[2], dst[2]),
                ];
                *dst = source_over(*dst, mixed, src_alpha);
            }
        }
    }

    /// Draw an image with its top-left corner at `(left, top)`
    ///
    /// Opaque pixels replace the canvas exactly; translucent pixels are
    /// composited source-over.
    pub fn draw_image(&mut self, img: &RgbaImage, left: u32, top: u32) {
        for (x, y, pixel) in img.enumerate_pixels() {
            let (Some(tx), Some(ty)) = (x.checked_add(left), y.checked_add(top)) else {
                continue;
            };
            let src = unit_rgba(*pixel);
            if pixel.0[3] == u8::MAX {
                if let Some(dst) = self.pixels.get_mut([ty as usize, tx as usize]) {
                    *dst = src;
                }
            } else {
                self.blend_over(tx, ty, src, 1.0);
            }
        }
    }

    /// Quantize the canvas into an 8-bit RGBA image
    pub fn to_rgba_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width(), self.height(), |x, y| {
            self.pixel(x, y).map_or(Rgba([0, 0, 0, 0]), rgba_from_unit)
        })
    }
}
