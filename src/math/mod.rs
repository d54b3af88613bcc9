//! Numeric helpers shared by the pipeline stages

/// Gamma, normalization and unit-range conversions
pub mod tone;
