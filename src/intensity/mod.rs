//! Intensity analysis of the prepared source

/// Contrast-stretched, gamma-corrected intensity grid
pub mod field;

pub use field::{ContrastStretch, IntensityField};
