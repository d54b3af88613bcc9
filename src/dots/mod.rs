//! Dot planning and painting

/// Fixed and sampled dot colors
pub mod color;
/// Cell walk, radius formula and layer painting
pub mod generator;

pub use color::{ColorAcceleration, DotColor};
pub use generator::{
    Dot, DotFieldGenerator, DotLayer, DotStats, DotStyle, GenerationContext, ProgressSpan,
};
