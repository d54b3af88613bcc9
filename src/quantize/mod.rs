//! Tonal quantization ahead of dot placement

/// Pass-through, desaturation and posterization
pub mod posterize;
/// Per-level visibility masks for multi-layer runs
pub mod regions;

pub use posterize::{QuantizeMode, Quantizer};
pub use regions::RegionSubdivision;
