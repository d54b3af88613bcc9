//! Rasterization parameters, validation and derived per-layer values

use crate::io::configuration::{
    DEFAULT_BASE_DOT_SIZE, DEFAULT_CLUSTER_SIZE, DEFAULT_COLOR_ACCELERATION,
    DEFAULT_CONTRAST_THRESHOLD, DEFAULT_DOT_SIZE_FACTOR, DEFAULT_GAMMA,
    DEFAULT_INTENSITY_ACCELERATION, DEFAULT_LAYERS, DEFAULT_MAX_SIZE, DEFAULT_SPACING,
    GOLDEN_FRAME_DIVISOR, MAX_LAYERS,
};
use crate::io::error::{Result, invalid_parameter};
use crate::progress::StallPolicy;
use crate::quantize::QuantizeMode;
use image::Rgba;
use rand::SeedableRng;
use rand::rngs::StdRng;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// How many dot passes a run paints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayerStrategy {
    /// One pass over the whole image
    #[default]
    Single,
    /// One pass per posterized region, each restricted by its mask
    Regions,
}

/// Treatment of the composited output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Finish {
    /// Leave uncovered pixels transparent
    #[default]
    Transparent,
    /// Flatten onto the background color
    Background,
    /// Flatten and surround with golden-ratio print margins
    PrintFrame,
}

/// Border widths around a framed image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameMargins {
    /// Rows added above
    pub top: u32,
    /// Columns added to the left
    pub left: u32,
    /// Columns added to the right
    pub right: u32,
    /// Rows added below
    pub bottom: u32,
}

impl FrameMargins {
    /// No border at all
    pub const NONE: Self = Self::uniform(0);

    /// Same width on every side
    pub const fn uniform(margin: u32) -> Self {
        Self {
            top: margin,
            left: margin,
            right: margin,
            bottom: margin,
        }
    }

    /// Golden-ratio margins: one side of the image divided by 4.236
    ///
    /// `use_short_side` picks the shorter side as reference, otherwise the
    /// longer one.
    pub fn golden(width: u32, height: u32, use_short_side: bool) -> Self {
        let reference = if use_short_side {
            width.min(height)
        } else {
            width.max(height)
        };
        Self::uniform((reference as f32 / GOLDEN_FRAME_DIVISOR).round() as u32)
    }

    /// Size of an image of `width` x `height` once framed
    pub const fn framed_size(&self, width: u32, height: u32) -> (u32, u32) {
        (
            width.saturating_add(self.left).saturating_add(self.right),
            height.saturating_add(self.top).saturating_add(self.bottom),
        )
    }
}

/// Position of one dot pass among all passes of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerSlot {
    /// Zero-based pass index, darkest region first
    pub index: usize,
    /// Total number of passes
    pub total: usize,
}

impl LayerSlot {
    /// The only pass of a single-layer run
    pub const SINGLE: Self = Self { index: 0, total: 1 };

    /// Slot `index` of `total`
    pub const fn new(index: usize, total: usize) -> Self {
        Self { index, total }
    }
}

/// Inputs of one rasterization run
///
/// Parameters are plain values; [`RasterParameters::validate`] runs on
/// entry to every rasterization.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterParameters {
    /// Longest edge the source is downscaled to
    pub max_size: u32,
    /// Grid cell edge in pixels
    pub cluster_size: u32,
    /// Intensity pivot of the radius formula
    pub dot_size_factor: f32,
    /// Minimum gap between dots; accepted but unused by placement
    pub spacing: f32,
    /// Strength of intensity influence on radius
    pub intensity_acceleration: f32,
    /// Darkening per layer of the fixed dot color
    pub color_acceleration: f32,
    /// Exponent applied to sampled intensity before sizing
    pub gamma: f32,
    /// Contrast stretch threshold of the intensity field
    pub contrast_threshold: f32,
    /// Number of posterize levels and region layers
    pub layers: usize,
    /// Desaturate instead of posterizing
    pub grayscale: bool,
    /// Sample dot colors from the source
    pub multicolor: bool,
    /// Swap dot and background colors in grayscale mode
    pub invert: bool,
    /// Fixed dot color when not multicolor
    pub dot_color: Rgba<u8>,
    /// Radius base before per-layer scaling
    pub base_dot_size: f32,
    /// Single pass or one pass per region
    pub layer_strategy: LayerStrategy,
    /// Output finishing
    pub finish: Finish,
    /// Seed for reproducible dot placement
    pub seed: Option<u64>,
    /// Synthetic progress nudges; `None` disables them
    pub stall_guard: Option<StallPolicy>,
}

impl Default for RasterParameters {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            cluster_size: DEFAULT_CLUSTER_SIZE,
            dot_size_factor: DEFAULT_DOT_SIZE_FACTOR,
            spacing: DEFAULT_SPACING,
            intensity_acceleration: DEFAULT_INTENSITY_ACCELERATION,
            color_acceleration: DEFAULT_COLOR_ACCELERATION,
            gamma: DEFAULT_GAMMA,
            contrast_threshold: DEFAULT_CONTRAST_THRESHOLD,
            layers: DEFAULT_LAYERS,
            grayscale: false,
            multicolor: false,
            invert: false,
            dot_color: BLACK,
            base_dot_size: DEFAULT_BASE_DOT_SIZE,
            layer_strategy: LayerStrategy::Single,
            finish: Finish::Transparent,
            seed: None,
            stall_guard: Some(StallPolicy::default()),
        }
    }
}

impl RasterParameters {
    /// Check every field against its accepted range
    ///
    /// # Errors
    ///
    /// Returns `RasterError::InvalidParameter` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.max_size == 0 {
            return Err(invalid_parameter(
                "max_size",
                &self.max_size,
                &"must be positive",
            ));
        }
        if self.cluster_size == 0 {
            return Err(invalid_parameter(
                "cluster_size",
                &self.cluster_size,
                &"must be positive",
            ));
        }
        if self.layers == 0 || self.layers > MAX_LAYERS {
            return Err(invalid_parameter(
                "layers",
                &self.layers,
                &format!("must be between 1 and {MAX_LAYERS}"),
            ));
        }

        let positive = [
            ("gamma", self.gamma),
            ("base_dot_size", self.base_dot_size),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid_parameter(name, &value, &"must be positive"));
            }
        }

        let non_negative = [
            ("dot_size_factor", self.dot_size_factor),
            ("spacing", self.spacing),
            ("intensity_acceleration", self.intensity_acceleration),
            ("contrast_threshold", self.contrast_threshold),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid_parameter(name, &value, &"must be non-negative"));
            }
        }

        if !(0.0..=1.0).contains(&self.color_acceleration) {
            return Err(invalid_parameter(
                "color_acceleration",
                &self.color_acceleration,
                &"must be within [0, 1]",
            ));
        }

        if let Some(policy) = self.stall_guard
            && (policy.interval.is_zero() || policy.step.is_nan() || policy.step <= 0.0)
        {
            return Err(invalid_parameter(
                "stall_guard",
                &format!("{policy:?}"),
                &"interval and step must be positive",
            ));
        }

        Ok(())
    }

    /// Quantization applied before dot placement
    pub const fn quantize_mode(&self) -> QuantizeMode {
        if self.multicolor {
            QuantizeMode::Multicolor
        } else if self.grayscale {
            QuantizeMode::Grayscale
        } else {
            QuantizeMode::Posterize(self.layers)
        }
    }

    /// Whether inversion applies to this configuration
    pub const fn inverted(&self) -> bool {
        self.invert && self.grayscale && !self.multicolor
    }

    /// Fixed dot color after inversion
    pub const fn effective_dot_color(&self) -> Rgba<u8> {
        if self.inverted() {
            WHITE
        } else {
            self.dot_color
        }
    }

    /// Color behind the dots when flattening
    pub const fn background_color(&self) -> Rgba<u8> {
        if self.inverted() { self.dot_color } else { WHITE }
    }

    /// Number of dot passes the run paints
    pub const fn layer_count(&self) -> usize {
        match self.layer_strategy {
            LayerStrategy::Single => 1,
            LayerStrategy::Regions => self.layers,
        }
    }

    /// Base radius of one pass: `base_dot_size * (index + 1) / total`
    pub const fn layer_base_size(&self, slot: LayerSlot) -> f32 {
        if slot.total == 0 {
            return self.base_dot_size;
        }
        self.base_dot_size * (slot.index + 1) as f32 / slot.total as f32
    }

    /// Margins applied by the configured finish
    pub fn frame_margins(&self, width: u32, height: u32) -> FrameMargins {
        match self.finish {
            Finish::PrintFrame => FrameMargins::golden(width, height, false),
            Finish::Transparent | Finish::Background => FrameMargins::NONE,
        }
    }

    /// Random source for dot placement, seeded when a seed is set
    pub fn rng(&self) -> StdRng {
        self.seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64)
    }
}
