//! Dot color selection

use crate::engine::parameters::{LayerSlot, RasterParameters};
use crate::math::tone::clamp_unit;
use crate::raster::RasterBitmap;
use image::Rgba;

/// Darkens a fixed dot color progressively across layers
///
/// Layer `i` of `L` scales brightness by `(1 - i * acceleration / L)^2`,
/// so the first layer keeps the base color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorAcceleration {
    base: Rgba<u8>,
    acceleration: f32,
}

impl ColorAcceleration {
    /// Accelerate `base` by `acceleration` per layer
    pub const fn new(base: Rgba<u8>, acceleration: f32) -> Self {
        Self { base, acceleration }
    }

    /// Brightness multiplier for a layer
    pub fn brightness_factor(&self, slot: LayerSlot) -> f32 {
        if slot.total == 0 {
            return 1.0;
        }
        let falloff = slot.index as f32 * self.acceleration / slot.total as f32;
        (1.0 - falloff).powi(2)
    }

    /// Color of the dots painted in `slot`
    pub fn color_for_layer(&self, slot: LayerSlot) -> Rgba<u8> {
        let factor = self.brightness_factor(slot);
        let [r, g, b, a] = self.base.0;
        let scale = |channel: u8| (clamp_unit(f32::from(channel) / 255.0 * factor) * 255.0).round() as u8;
        Rgba([scale(r), scale(g), scale(b), a])
    }
}

/// Where a layer takes its dot colors from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DotColor {
    /// Sample the prepared source at each dot's sample position
    Sampled,
    /// Paint every dot in one color
    Fixed(Rgba<u8>),
}

impl DotColor {
    /// Color source for `slot` under `params`
    pub fn for_layer(params: &RasterParameters, slot: LayerSlot) -> Self {
        if params.multicolor {
            Self::Sampled
        } else {
            let base = params.effective_dot_color();
            Self::Fixed(ColorAcceleration::new(base, params.color_acceleration).color_for_layer(slot))
        }
    }

    /// Resolve the RGB of a dot sampled at `(x, y)`; black outside the source
    pub fn resolve(&self, source: &RasterBitmap, x: i64, y: i64) -> Rgba<u8> {
        match self {
            Self::Fixed(color) => *color,
            Self::Sampled => source.rgba(x, y).unwrap_or(Rgba([0, 0, 0, 255])),
        }
    }
}
