//! Tonal reduction: color pass-through, desaturation and posterization

use crate::io::configuration::{
    FLAT_POSTERIZE_VALUE, NORMALIZATION_EPSILON, POSTERIZE_CONTRAST_FACTOR,
    POSTERIZE_SHADOW_BOOST, TONE_GAMMA,
};
use crate::math::tone::{clamp_unit, gamma_correct, normalize, u8_from_unit, unit_from_u8};
use crate::raster::RasterBitmap;
use image::{GrayImage, Luma};

/// How the source is reduced before dot placement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantizeMode {
    /// Keep the original colors untouched
    Multicolor,
    /// Desaturate to gamma-corrected luma
    Grayscale,
    /// Reduce to the given number of evenly spaced gray levels
    Posterize(usize),
}

/// Gamma-corrected single-channel copy of the source
///
/// Returns `None` when the source has no pixels to desaturate.
pub fn desaturate(source: &RasterBitmap) -> Option<GrayImage> {
    if source.is_empty() {
        return None;
    }
    let mut gray = source.to_gray();
    for pixel in gray.pixels_mut() {
        let corrected = gamma_correct(unit_from_u8(pixel.0[0]), TONE_GAMMA);
        *pixel = Luma([u8_from_unit(corrected)]);
    }
    Some(gray)
}

/// Midtone contrast remap used ahead of quantization
///
/// Shadows receive slightly more contrast than highlights.
pub fn posterize_contrast(normalized: f32) -> f32 {
    let factor = POSTERIZE_SHADOW_BOOST.mul_add(1.0 - normalized, POSTERIZE_CONTRAST_FACTOR);
    clamp_unit((normalized - 0.5).mul_add(factor, 0.5))
}

/// Snap a unit-range value onto `levels` evenly spaced steps from 0 to 1
///
/// Fewer than two levels collapse everything onto a single flat value.
pub fn quantize_level(value: f32, levels: usize) -> u8 {
    if levels < 2 {
        return FLAT_POSTERIZE_VALUE;
    }
    let intervals = (levels - 1) as f32;
    u8_from_unit((clamp_unit(value) * intervals).round() / intervals)
}

/// Posterize a gray buffer to `levels` tones
///
/// Samples are gamma-corrected, stretched between the global minimum and
/// maximum, passed through [`posterize_contrast`] and snapped with
/// [`quantize_level`].
pub fn posterize(gray: &GrayImage, levels: usize) -> GrayImage {
    let mut corrected = gray.clone();
    for pixel in corrected.pixels_mut() {
        let value = gamma_correct(unit_from_u8(pixel.0[0]), TONE_GAMMA);
        *pixel = Luma([u8_from_unit(value)]);
    }

    let (min, max) = corrected.pixels().fold((1.0f32, 0.0f32), |(lo, hi), p| {
        let v = unit_from_u8(p.0[0]);
        (lo.min(v), hi.max(v))
    });

    for pixel in corrected.pixels_mut() {
        let normalized = normalize(unit_from_u8(pixel.0[0]), min, max, NORMALIZATION_EPSILON);
        *pixel = Luma([quantize_level(posterize_contrast(normalized), levels)]);
    }

    log::debug!("Posterized {}x{} to {levels} levels", gray.width(), gray.height());
    corrected
}

/// Applies a [`QuantizeMode`] to a source bitmap
#[derive(Debug, Clone, Copy)]
pub struct Quantizer {
    fallback_levels: usize,
}

impl Quantizer {
    /// Create a quantizer whose grayscale path falls back to `fallback_levels`
    pub const fn new(fallback_levels: usize) -> Self {
        Self { fallback_levels }
    }

    /// Reduce the source according to `mode`
    ///
    /// Multicolor returns the source unchanged. Grayscale falls back to
    /// posterization when desaturation is unavailable.
    pub fn quantize(&self, source: RasterBitmap, mode: QuantizeMode) -> RasterBitmap {
        match mode {
            QuantizeMode::Multicolor => source,
            QuantizeMode::Grayscale => desaturate(&source).map_or_else(
                || {
                    log::warn!("Desaturation unavailable, falling back to posterization");
                    RasterBitmap::Gray(posterize(&source.to_gray(), self.fallback_levels))
                },
                RasterBitmap::Gray,
            ),
            QuantizeMode::Posterize(levels) => {
                RasterBitmap::Gray(posterize(&source.to_gray(), levels))
            }
        }
    }
}
