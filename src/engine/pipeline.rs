//! End-to-end rasterization: resize, quantize, analyze, paint, composite
//!
//! Progress is published as 0 on entry, 0.1 once the source is prepared,
//! the generation band (0.1, 0.9] while painting, 0.9 after painting and
//! 1.0 on success.

use super::cancel::CancellationToken;
use super::parameters::{Finish, LayerSlot, LayerStrategy, RasterParameters};
use super::session::RasterSession;
use crate::composite::{BlendWeights, apply_frame, flatten, recombine};
use crate::dots::generator::cell_count;
use crate::dots::{DotFieldGenerator, DotLayer, DotStats, GenerationContext, ProgressSpan};
use crate::intensity::IntensityField;
use crate::io::configuration::{PROGRESS_GENERATED, PROGRESS_PREPARED};
use crate::io::error::{RasterError, Result, invalid_input};
use crate::progress::{ProgressSink, ProgressTracker, StallGuard};
use crate::quantize::posterize::posterize;
use crate::quantize::{Quantizer, RegionSubdivision};
use crate::raster::{RasterBitmap, VisibilityMask};
use std::borrow::Cow;
use std::sync::Arc;
use std::time::Instant;

/// Result of a completed run
#[derive(Debug, Clone, PartialEq)]
pub struct RasterOutput {
    /// Finished RGBA bitmap
    pub image: RasterBitmap,
    /// Counters of every painted layer, in painting order
    pub layers: Vec<DotStats>,
}

impl RasterOutput {
    /// Counters summed across layers
    pub fn total_stats(&self) -> DotStats {
        self.layers
            .iter()
            .fold(DotStats::default(), |acc, stats| acc.merge(stats))
    }
}

/// Rasterize on a background worker and wait for the bitmap
///
/// # Errors
///
/// Fails with `InvalidInput` for an empty source or invalid parameters,
/// `AllocationFailure` when a canvas cannot be allocated and `Worker` when
/// the worker thread cannot run.
pub fn rasterize(
    image: RasterBitmap,
    params: &RasterParameters,
    progress: Arc<dyn ProgressSink>,
) -> Result<RasterBitmap> {
    rasterize_with_cancel(image, params, progress, &CancellationToken::new())
        .map(|output| output.image)
}

/// Rasterize on a background worker, honoring `cancel`
///
/// # Errors
///
/// Same as [`rasterize`], plus `Cancelled` once the token is observed.
pub fn rasterize_with_cancel(
    image: RasterBitmap,
    params: &RasterParameters,
    progress: Arc<dyn ProgressSink>,
    cancel: &CancellationToken,
) -> Result<RasterOutput> {
    RasterSession::spawn_run(image, params.clone(), progress, cancel.clone())?.wait()
}

/// Run every stage on the calling thread
///
/// # Errors
///
/// Same as [`rasterize_with_cancel`] except `Worker`.
pub fn run_pipeline(
    source: RasterBitmap,
    params: &RasterParameters,
    tracker: &ProgressTracker,
    cancel: &CancellationToken,
) -> Result<RasterOutput> {
    params.validate()?;
    if source.is_empty() {
        return Err(invalid_input(&"source bitmap has zero width or height"));
    }

    let started = Instant::now();
    tracker.reset();

    let resized = source.fit_within(params.max_size);
    let prepared = Quantizer::new(params.layers).quantize(resized, params.quantize_mode());
    let intensity = IntensityField::build(&prepared.to_gray(), params.contrast_threshold);
    let plan = layer_plan(&prepared, params);
    ensure_not_cancelled(cancel, 0)?;

    tracker.update(PROGRESS_PREPARED);
    let guard = params
        .stall_guard
        .map(|policy| StallGuard::start(tracker.clone(), policy));

    let (width, height) = prepared.dimensions();
    let layer_cells = cell_count(width, height, params.cluster_size);
    let total_cells = layer_cells * plan.len();
    let mut generator = DotFieldGenerator::new(params.rng());

    let mut painted: Vec<DotLayer> = Vec::with_capacity(plan.len());
    for (index, (slot, mask)) in plan.iter().enumerate() {
        let context = GenerationContext {
            progress: tracker,
            cancel,
            span: ProgressSpan {
                offset: index * layer_cells,
                total: total_cells,
            },
        };
        painted.push(generator.generate(
            &prepared,
            &intensity,
            params,
            *slot,
            mask.as_ref(),
            &context,
        )?);
    }
    drop(guard);

    tracker.update(PROGRESS_GENERATED);
    ensure_not_cancelled(cancel, total_cells)?;

    let (images, layers): (Vec<RasterBitmap>, Vec<DotStats>) =
        painted.into_iter().map(|l| (l.image, l.stats)).unzip();
    let composed = recombine(&images, &BlendWeights::default())?;
    let image = finish(composed, params)?;

    tracker.update(1.0);
    log::info!(
        "Rasterized {width}x{height} into {} layer(s) in {:.2?}",
        layers.len(),
        started.elapsed()
    );

    Ok(RasterOutput { image, layers })
}

/// Slots and masks of every pass, darkest region first
fn layer_plan(
    prepared: &RasterBitmap,
    params: &RasterParameters,
) -> Vec<(LayerSlot, Option<VisibilityMask>)> {
    match params.layer_strategy {
        LayerStrategy::Single => vec![(LayerSlot::SINGLE, None)],
        LayerStrategy::Regions => {
            let posterized = match prepared {
                RasterBitmap::Gray(gray) if !params.grayscale => Cow::Borrowed(gray),
                _ => Cow::Owned(posterize(&prepared.to_gray(), params.layers)),
            };
            let masks = RegionSubdivision::new(params.layers).extract(&posterized);
            let total = masks.len();
            masks
                .into_iter()
                .enumerate()
                .map(|(index, mask)| (LayerSlot::new(index, total), Some(mask)))
                .collect()
        }
    }
}

fn finish(composed: RasterBitmap, params: &RasterParameters) -> Result<RasterBitmap> {
    match params.finish {
        Finish::Transparent => Ok(composed),
        Finish::Background => flatten(&composed, params.background_color()),
        Finish::PrintFrame => apply_frame(
            &composed,
            params.frame_margins(composed.width(), composed.height()),
            params.background_color(),
        ),
    }
}

fn ensure_not_cancelled(cancel: &CancellationToken, cells_processed: usize) -> Result<()> {
    if cancel.is_cancelled() {
        return Err(RasterError::Cancelled { cells_processed });
    }
    Ok(())
}
