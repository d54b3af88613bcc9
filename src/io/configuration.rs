//! Engine constants and runtime configuration defaults

use std::time::Duration;

// Defaults for user-tunable parameters
/// Longest side of the working image in pixels
pub const DEFAULT_MAX_SIZE: u32 = 1800;
/// Number of posterization levels (and region layers)
pub const DEFAULT_LAYERS: usize = 4;
/// Edge length of one sampling cell in pixels
pub const DEFAULT_CLUSTER_SIZE: u32 = 14;
/// Intensity pivot for dot growth
pub const DEFAULT_DOT_SIZE_FACTOR: f32 = 0.5;
/// Nominal spacing between dots
pub const DEFAULT_SPACING: f32 = 5.0;
/// Strength of intensity-driven dot size variation
pub const DEFAULT_INTENSITY_ACCELERATION: f32 = 1.0;
/// Brightness falloff of dot color across layers
pub const DEFAULT_COLOR_ACCELERATION: f32 = 0.1;
/// User-facing gamma applied to sub-cell intensity
pub const DEFAULT_GAMMA: f32 = 1.5;
/// Contrast stretch amount for the intensity field
pub const DEFAULT_CONTRAST_THRESHOLD: f32 = 0.015;
/// Base dot radius for a single-layer run
pub const DEFAULT_BASE_DOT_SIZE: f32 = 5.0;

// Tone curve constants
/// Fixed gamma used by the intensity field and quantizer
pub const TONE_GAMMA: f32 = 1.2;
/// Added to normalization denominators
pub const NORMALIZATION_EPSILON: f32 = 1e-4;
/// Lowest value the stretched intensity minimum may take
pub const MIN_STRETCH_FLOOR: f32 = 0.05;
/// Midtone contrast factor applied before posterization
pub const POSTERIZE_CONTRAST_FACTOR: f32 = 1.5;
/// Extra contrast for darker tones, fading towards highlights
pub const POSTERIZE_SHADOW_BOOST: f32 = 0.3;
/// Gray value produced by posterization with fewer than two levels
pub const FLAT_POSTERIZE_VALUE: u8 = 128;

// Dot placement constants
/// Maximum number of dots placed in a fully dark cell
pub const MAX_DOTS_PER_CELL: f32 = 3.0;
/// Dots never shrink below this radius
pub const MIN_DOT_RADIUS: f32 = 1.0;
/// Jitter amplitude relative to dot radius
pub const JITTER_RATIO: f32 = 0.3;
/// Lowest alpha a painted dot may have
pub const MIN_DOT_ALPHA: f32 = 0.1;

// Progress reporting
/// Cells processed between progress updates
pub const PROGRESS_CELL_INTERVAL: usize = 500;
/// Progress value signalled once the source is prepared
pub const PROGRESS_PREPARED: f64 = 0.1;
/// Share of the progress range owned by dot generation
pub const PROGRESS_GENERATION_SPAN: f64 = 0.8;
/// Progress value once dot generation has finished
pub const PROGRESS_GENERATED: f64 = PROGRESS_PREPARED + PROGRESS_GENERATION_SPAN;
/// Wall-clock delay between synthetic progress increments
pub const STALL_GUARD_INTERVAL: Duration = Duration::from_secs(2);
/// Size of one synthetic progress increment
pub const STALL_GUARD_STEP: f64 = 0.01;
/// Synthetic progress never exceeds this value
pub const STALL_GUARD_CEILING: f64 = 0.2;

// Compositing
/// Global alpha of every recombined layer
pub const COMPOSITE_BASE_ALPHA: f32 = 0.75;
/// Share of layer opacity that decreases with layer index
pub const LAYER_OPACITY_FALLOFF: f32 = 0.8;
/// Opacity every layer keeps regardless of index
pub const LAYER_OPACITY_FLOOR: f32 = 0.2;
/// Divides the longest image side to obtain frame margins
pub const GOLDEN_FRAME_DIVISOR: f32 = 4.236;

// Region subdivision
/// Smallest gray distance accepted as belonging to a level
pub const REGION_MIN_TOLERANCE: u8 = 5;

/// Largest accepted layer count
pub const MAX_LAYERS: usize = 64;

// Safety limit to prevent excessive memory allocation
/// Maximum number of pixels in any canvas
pub const MAX_CANVAS_PIXELS: u64 = 120_000_000;

// Command-line front end
/// Suffix added to output filenames
pub const OUTPUT_SUFFIX: &str = "_dots";
/// Threshold for switching to batch progress mode
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 5;
/// Number of discrete steps in a progress bar
pub const PROGRESS_BAR_RESOLUTION: u64 = 1000;
