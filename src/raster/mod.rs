//! Pixel buffers, drawing surfaces and visibility masks
//!
//! This module contains the raster primitives the pipeline stages share:
//! - Owned bitmaps handed from stage to stage
//! - A floating-point canvas with circle fill and layer blending
//! - Bit masks restricting where dots may be painted

/// Owned RGBA or gray pixel buffers
pub mod bitmap;
/// Drawing surface with compositing primitives
pub mod canvas;
/// Per-pixel visibility masks
pub mod mask;

pub use bitmap::{PixelFormat, RasterBitmap};
pub use canvas::Canvas;
pub use mask::VisibilityMask;
