//! Stippled halftone rasterization: images rendered as fields of jittered dots
//!
//! A source image is downscaled, tonally quantized and analyzed into a
//! normalized intensity field. Dots are scattered over a square grid with
//! radius and opacity driven by local darkness, optionally in several
//! region-masked layers that are then recombined with a multiply blend.

#![forbid(unsafe_code)]

/// Layer recombination, backgrounds and print frames
pub mod composite;
/// Dot planning, coloring and painting
pub mod dots;
/// Parameters, pipeline, cancellation and background sessions
pub mod engine;
/// Normalized intensity analysis
pub mod intensity;
/// Input/output operations, configuration and error handling
pub mod io;
/// Scalar tone curves
pub mod math;
/// Monotonic progress publication
pub mod progress;
/// Tonal quantization and region extraction
pub mod quantize;
/// Bitmaps, canvases and visibility masks
pub mod raster;

pub use engine::{
    CancellationToken, RasterOutput, RasterParameters, RasterSession, rasterize,
    rasterize_with_cancel,
};
pub use io::error::{RasterError, Result};
pub use raster::RasterBitmap;
