//! Layer recombination and output finishing

/// Backgrounds and margins
pub mod frame;
/// Weighted multiply blend of layers
pub mod recombine;

pub use frame::{apply_frame, flatten};
pub use recombine::{BlendWeights, recombine};
