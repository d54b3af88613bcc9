//! Multiply-blend recombination of painted layers

use crate::io::configuration::{COMPOSITE_BASE_ALPHA, LAYER_OPACITY_FALLOFF, LAYER_OPACITY_FLOOR};
use crate::io::error::{RasterError, Result, invalid_input};
use crate::raster::{Canvas, RasterBitmap};
use std::borrow::Cow;

/// Opacity weighting of layers during recombination
///
/// Layer `i` of `L` is drawn with alpha
/// `base_alpha * ((L - i) / L * falloff + floor)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendWeights {
    /// Global alpha applied to every layer
    pub base_alpha: f32,
    /// Share of opacity that decays with the layer index
    pub falloff: f32,
    /// Opacity every layer keeps
    pub floor: f32,
}

impl Default for BlendWeights {
    fn default() -> Self {
        Self {
            base_alpha: COMPOSITE_BASE_ALPHA,
            falloff: LAYER_OPACITY_FALLOFF,
            floor: LAYER_OPACITY_FLOOR,
        }
    }
}

impl BlendWeights {
    /// Relative weight of layer `index` among `total`, before the base alpha
    pub fn layer_weight(&self, index: usize, total: usize) -> f32 {
        if total == 0 {
            return self.floor;
        }
        ((total - index.min(total)) as f32 / total as f32).mul_add(self.falloff, self.floor)
    }

    /// Alpha layer `index` is actually drawn with
    pub fn effective_alpha(&self, index: usize, total: usize) -> f32 {
        self.base_alpha * self.layer_weight(index, total)
    }
}

/// Stack layers onto a transparent canvas, first layer most opaque
///
/// Each layer is multiply-blended at its [`BlendWeights::effective_alpha`].
/// The result is always RGBA.
///
/// # Errors
///
/// - `RasterError::EmptyInput` when `layers` is empty
/// - `RasterError::InvalidInput` when the layers differ in size
/// - `RasterError::AllocationFailure` when the canvas cannot be allocated
pub fn recombine(layers: &[RasterBitmap], weights: &BlendWeights) -> Result<RasterBitmap> {
    let Some(first) = layers.first() else {
        return Err(RasterError::EmptyInput);
    };
    let (width, height) = first.dimensions();
    if let Some(odd) = layers.iter().find(|layer| layer.dimensions() != (width, height)) {
        return Err(invalid_input(&format!(
            "layer {}x{} does not match {width}x{height}",
            odd.width(),
            odd.height()
        )));
    }

    let mut canvas = Canvas::new(width, height)?;
    let total = layers.len();
    for (index, layer) in layers.iter().enumerate() {
        let rgba = layer
            .as_rgba()
            .map_or_else(|| Cow::Owned(layer.to_rgba()), Cow::Borrowed);
        let alpha = weights.effective_alpha(index, total);
        log::trace!("Recombining layer {}/{total} at alpha {alpha:.3}", index + 1);
        canvas.multiply_layer(&rgba, alpha);
    }

    Ok(RasterBitmap::Rgba(canvas.to_rgba_image()))
}
