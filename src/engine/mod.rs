//! Rasterization engine
//!
//! Ties the stages together and runs them off the caller's thread:
//! - Parameters and their validation
//! - Cooperative cancellation
//! - The staged pipeline with progress publication
//! - Sessions that supersede earlier runs

/// Cooperative cancellation token
pub mod cancel;
/// Run parameters and derived per-layer values
pub mod parameters;
/// Staged pipeline from source to finished bitmap
pub mod pipeline;
/// Background runs and supersession
pub mod session;

pub use cancel::CancellationToken;
pub use parameters::{Finish, FrameMargins, LayerSlot, LayerStrategy, RasterParameters};
pub use pipeline::{RasterOutput, rasterize, rasterize_with_cancel, run_pipeline};
pub use session::{RasterSession, RunHandle};
