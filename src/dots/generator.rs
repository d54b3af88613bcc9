//! Stippled dot field generation
//!
//! The image is walked in square cells of `cluster_size` pixels, row by row.
//! Each cell receives between one and three dots depending on how dark it is.
//! Every dot samples the intensity at a random offset inside its cell; that
//! sample drives its radius and opacity. Dots land at the cell center plus
//! the same offset and a radius-proportional jitter.

use super::color::DotColor;
use crate::engine::cancel::CancellationToken;
use crate::engine::parameters::{LayerSlot, RasterParameters};
use crate::intensity::IntensityField;
use crate::io::configuration::{
    JITTER_RATIO, MAX_DOTS_PER_CELL, MIN_DOT_ALPHA, MIN_DOT_RADIUS, PROGRESS_CELL_INTERVAL,
    PROGRESS_GENERATION_SPAN, PROGRESS_PREPARED,
};
use crate::io::error::{RasterError, Result, invalid_input};
use crate::math::tone::unit_from_u8;
use crate::progress::ProgressTracker;
use crate::raster::{Canvas, RasterBitmap, VisibilityMask};
use rand::Rng;

/// One planned dot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dot {
    /// Center column
    pub x: f32,
    /// Center row
    pub y: f32,
    /// Radius in pixels, never below 1
    pub radius: f32,
    /// Opacity in [0.1, 1]
    pub alpha: f32,
    /// RGB of the dot; alpha channel ignored
    pub color: image::Rgba<u8>,
}

/// Counters collected while painting a layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DotStats {
    /// Grid cells visited
    pub cells_processed: usize,
    /// Dots drawn onto the canvas
    pub dots_painted: usize,
    /// Dots skipped by the visibility mask
    pub dots_masked: usize,
    /// Smallest painted radius, infinite when nothing was painted
    pub min_radius: f32,
    /// Largest painted radius
    pub max_radius: f32,
}

impl Default for DotStats {
    fn default() -> Self {
        Self {
            cells_processed: 0,
            dots_painted: 0,
            dots_masked: 0,
            min_radius: f32::INFINITY,
            max_radius: 0.0,
        }
    }
}

impl DotStats {
    const fn record(&mut self, dot: &Dot) {
        self.dots_painted += 1;
        self.min_radius = self.min_radius.min(dot.radius);
        self.max_radius = self.max_radius.max(dot.radius);
    }

    /// Combine counters of several layers
    pub const fn merge(&self, other: &Self) -> Self {
        Self {
            cells_processed: self.cells_processed + other.cells_processed,
            dots_painted: self.dots_painted + other.dots_painted,
            dots_masked: self.dots_masked + other.dots_masked,
            min_radius: self.min_radius.min(other.min_radius),
            max_radius: self.max_radius.max(other.max_radius),
        }
    }
}

/// Per-layer values of the radius formula
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DotStyle {
    /// Grid cell edge in pixels
    pub cluster_size: u32,
    /// Base radius of the layer
    pub base_size: f32,
    /// Intensity pivot of the radius formula
    pub dot_size_factor: f32,
    /// Strength of intensity influence on radius
    pub intensity_acceleration: f32,
    /// Exponent applied to sampled intensity
    pub gamma: f32,
    /// Where dot colors come from
    pub color: DotColor,
}

impl DotStyle {
    /// Style of `slot` under `params`
    pub fn for_layer(params: &RasterParameters, slot: LayerSlot) -> Self {
        Self {
            cluster_size: params.cluster_size,
            base_size: params.layer_base_size(slot),
            dot_size_factor: params.dot_size_factor,
            intensity_acceleration: params.intensity_acceleration,
            gamma: params.gamma,
            color: DotColor::for_layer(params, slot),
        }
    }

    /// Dots a cell of intensity `intensity` receives: `max(1, floor((1 - I) * 3))`
    pub fn dots_per_cell(intensity: f32) -> usize {
        ((1.0 - intensity) * MAX_DOTS_PER_CELL).floor().max(1.0) as usize
    }

    /// Radius for a sampled intensity
    ///
    /// `max(1, base * (1 + acceleration * (factor - intensity^gamma)))`
    pub fn radius(&self, intensity: f32) -> f32 {
        let corrected = intensity.max(0.0).powf(self.gamma);
        let scale = self
            .intensity_acceleration
            .mul_add(self.dot_size_factor - corrected, 1.0);
        (self.base_size * scale).max(MIN_DOT_RADIUS)
    }

    /// Opacity for a sampled intensity: `max(0.1, 1 - intensity)`
    pub const fn alpha(intensity: f32) -> f32 {
        (1.0 - intensity).clamp(MIN_DOT_ALPHA, 1.0)
    }
}

/// Maps cells processed onto the generation band of overall progress
///
/// Multi-layer runs share one span: `offset` counts cells of earlier layers
/// and `total` counts cells of all layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSpan {
    /// Cells processed by earlier layers
    pub offset: usize,
    /// Cells across every layer of the run
    pub total: usize,
}

impl ProgressSpan {
    /// Span covering a single layer of `total` cells
    pub const fn single(total: usize) -> Self {
        Self { offset: 0, total }
    }

    /// Overall progress after `processed` cells of the current layer
    pub fn fraction(&self, processed: usize) -> f64 {
        if self.total == 0 {
            return PROGRESS_PREPARED + PROGRESS_GENERATION_SPAN;
        }
        let done = ((self.offset + processed) as f64 / self.total as f64).min(1.0);
        done.mul_add(PROGRESS_GENERATION_SPAN, PROGRESS_PREPARED)
    }
}

/// Observers of a generation pass
#[derive(Debug, Clone, Copy)]
pub struct GenerationContext<'a> {
    /// Receives progress in the generation band
    pub progress: &'a ProgressTracker,
    /// Checked before every cell
    pub cancel: &'a CancellationToken,
    /// Position of this layer within the run
    pub span: ProgressSpan,
}

/// Transparent canvas painted with one layer of dots
#[derive(Debug, Clone, PartialEq)]
pub struct DotLayer {
    /// Slot the layer was painted for
    pub slot: LayerSlot,
    /// Painted layer, same size as the source
    pub image: RasterBitmap,
    /// Counters gathered while painting
    pub stats: DotStats,
}

/// Number of grid cells covering a `width` x `height` image
pub const fn cell_count(width: u32, height: u32, cluster_size: u32) -> usize {
    if cluster_size == 0 {
        return 0;
    }
    width.div_ceil(cluster_size) as usize * height.div_ceil(cluster_size) as usize
}

/// Paints dot fields with an injected random source
#[derive(Debug)]
pub struct DotFieldGenerator<R: Rng> {
    rng: R,
}

impl<R: Rng> DotFieldGenerator<R> {
    /// Generator drawing offsets and jitter from `rng`
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Plan the dots of the cell whose top-left corner is `(cell_x, cell_y)`
    ///
    /// Draws an offset pair and a jitter pair per dot.
    pub fn plan_cell(
        &mut self,
        source: &RasterBitmap,
        intensity: &IntensityField,
        style: &DotStyle,
        cell_x: u32,
        cell_y: u32,
    ) -> Vec<Dot> {
        let cluster = style.cluster_size as f32;
        let half = cluster / 2.0;
        let cell_intensity = intensity.intensity(i64::from(cell_x), i64::from(cell_y));
        let count = DotStyle::dots_per_cell(cell_intensity);

        (0..count)
            .map(|_| {
                let offset_x: f32 = self.rng.random_range(-half..=half);
                let offset_y: f32 = self.rng.random_range(-half..=half);
                // Truncates toward zero.
                let sample_x = i64::from(cell_x) + offset_x as i64;
                let sample_y = i64::from(cell_y) + offset_y as i64;
                let sampled = intensity.intensity(sample_x, sample_y);

                let radius = style.radius(sampled);
                let spread = radius * JITTER_RATIO;
                let jitter_x: f32 = self.rng.random_range(-spread..=spread);
                let jitter_y: f32 = self.rng.random_range(-spread..=spread);

                Dot {
                    x: cell_x as f32 + half + offset_x + jitter_x,
                    y: cell_y as f32 + half + offset_y + jitter_y,
                    radius,
                    alpha: DotStyle::alpha(sampled),
                    color: style.color.resolve(source, sample_x, sample_y),
                }
            })
            .collect()
    }

    /// Paint one layer of dots onto a fresh transparent canvas
    ///
    /// Cells with no visible pixel in `mask` are skipped; their dots count
    /// as masked. Progress is published every 500 cells and once at the end.
    ///
    /// # Errors
    ///
    /// - `RasterError::InvalidInput` when the source and intensity field
    ///   sizes disagree
    /// - `RasterError::AllocationFailure` when the canvas cannot be allocated
    /// - `RasterError::Cancelled` when the token is set between cells
    pub fn generate(
        &mut self,
        source: &RasterBitmap,
        intensity: &IntensityField,
        params: &RasterParameters,
        slot: LayerSlot,
        mask: Option<&VisibilityMask>,
        context: &GenerationContext<'_>,
    ) -> Result<DotLayer> {
        let (width, height) = source.dimensions();
        if (intensity.width(), intensity.height()) != (width, height) {
            return Err(invalid_input(&format!(
                "intensity field {}x{} does not match source {width}x{height}",
                intensity.width(),
                intensity.height()
            )));
        }
        if let Some(mask) = mask
            && (mask.width(), mask.height()) != (width, height)
        {
            return Err(invalid_input(&format!(
                "mask {}x{} does not match source {width}x{height}",
                mask.width(),
                mask.height()
            )));
        }

        let style = DotStyle::for_layer(params, slot);
        let cluster = style.cluster_size.max(1);
        let mut canvas = Canvas::new(width, height)?;
        let mut stats = DotStats::default();

        log::debug!(
            "Layer {}/{}: {} cells, base radius {:.2}",
            slot.index + 1,
            slot.total,
            cell_count(width, height, cluster),
            style.base_size
        );

        for cell_y in (0..height).step_by(cluster as usize) {
            for cell_x in (0..width).step_by(cluster as usize) {
                if context.cancel.is_cancelled() {
                    log::debug!("Cancelled after {} cells", stats.cells_processed);
                    return Err(RasterError::Cancelled {
                        cells_processed: context.span.offset + stats.cells_processed,
                    });
                }

                let visible =
                    mask.is_none_or(|m| m.any_visible_in(cell_x, cell_y, cluster, cluster));
                if visible {
                    for dot in self.plan_cell(source, intensity, &style, cell_x, cell_y) {
                        let [r, g, b, _] = dot.color.0;
                        canvas.fill_circle(
                            dot.x,
                            dot.y,
                            dot.radius,
                            [unit_from_u8(r), unit_from_u8(g), unit_from_u8(b), dot.alpha],
                        );
                        stats.record(&dot);
                    }
                } else {
                    let cell_intensity = intensity.intensity(i64::from(cell_x), i64::from(cell_y));
                    stats.dots_masked += DotStyle::dots_per_cell(cell_intensity);
                }

                stats.cells_processed += 1;
                if stats.cells_processed % PROGRESS_CELL_INTERVAL == 0 {
                    context
                        .progress
                        .update(context.span.fraction(stats.cells_processed));
                }
            }
        }

        context
            .progress
            .update(context.span.fraction(stats.cells_processed));

        Ok(DotLayer {
            slot,
            image: RasterBitmap::Rgba(canvas.to_rgba_image()),
            stats,
        })
    }
}
