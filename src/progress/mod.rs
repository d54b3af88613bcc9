//! Progress publication for long-running rasterizations

/// Synthetic nudges for stalled runs
pub mod stall;
/// Monotonic shared progress value
pub mod tracker;

pub use stall::{StallGuard, StallPolicy};
pub use tracker::{NoProgress, ProgressSink, ProgressTracker};
