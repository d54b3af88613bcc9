//! Normalized intensity field with adaptive contrast stretch
//!
//! The field holds one value per source pixel in [0, 1], where 0 is the
//! darkest tone. It is rebuilt from scratch on every run; callers that want
//! to cache it do so themselves.

use crate::io::configuration::{MIN_STRETCH_FLOOR, NORMALIZATION_EPSILON, TONE_GAMMA};
use crate::math::tone::{clamp_unit, gamma_correct, normalize, unit_from_u8};
use image::GrayImage;
use ndarray::Array2;

/// Stretched intensity range applied during normalization
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContrastStretch {
    /// Lower bound mapped to 0
    pub min: f32,
    /// Upper bound mapped to 1
    pub max: f32,
}

impl ContrastStretch {
    /// Widen the observed `[min, max]` range by `threshold`
    ///
    /// The lower bound shrinks by the threshold but never drops below 0.05;
    /// the upper bound grows by twice the threshold, capped at 1.
    pub fn from_range(min: f32, max: f32, threshold: f32) -> Self {
        Self {
            min: (min * (1.0 - threshold)).max(MIN_STRETCH_FLOOR),
            max: (max * 2.0f32.mul_add(threshold, 1.0)).min(1.0),
        }
    }

    /// Map a raw unit-range intensity through the stretch and fixed gamma
    pub fn apply(&self, value: f32) -> f32 {
        let stretched = clamp_unit(normalize(value, self.min, self.max, NORMALIZATION_EPSILON));
        gamma_correct(stretched, TONE_GAMMA)
    }
}

/// Row-major grid of normalized intensities indexed `[y, x]`
#[derive(Debug, Clone, PartialEq)]
pub struct IntensityField {
    values: Array2<f32>,
}

impl IntensityField {
    /// Create an all-zero field
    ///
    /// An all-zero field means "no contrast"; the generator treats every cell
    /// as fully dark.
    pub fn zeros(width: u32, height: u32) -> Self {
        Self {
            values: Array2::zeros((height as usize, width as usize)),
        }
    }

    /// Create a field from precomputed intensities, clamped into [0, 1]
    pub fn from_fn(width: u32, height: u32, intensity: impl Fn(u32, u32) -> f32) -> Self {
        Self {
            values: Array2::from_shape_fn((height as usize, width as usize), |(y, x)| {
                clamp_unit(intensity(x as u32, y as u32))
            }),
        }
    }

    /// Build the field from a gray buffer
    ///
    /// Tracks the global minimum and maximum, widens them with
    /// [`ContrastStretch::from_range`], normalizes every sample into [0, 1]
    /// and applies a fixed gamma of 1.2. A zero-sized source yields an empty
    /// all-zero field rather than an error.
    pub fn build(source: &GrayImage, contrast_threshold: f32) -> Self {
        let (width, height) = source.dimensions();
        if width == 0 || height == 0 {
            return Self::zeros(width, height);
        }

        let (min, max) = source.pixels().fold((1.0f32, 0.0f32), |(lo, hi), p| {
            let v = unit_from_u8(p.0[0]);
            (lo.min(v), hi.max(v))
        });
        let stretch = ContrastStretch::from_range(min, max, contrast_threshold);

        log::debug!(
            "Intensity range {min:.3}..{max:.3} stretched to {:.3}..{:.3}",
            stretch.min,
            stretch.max
        );

        let values = Array2::from_shape_fn((height as usize, width as usize), |(y, x)| {
            let raw = source
                .get_pixel_checked(x as u32, y as u32)
                .map_or(0.0, |p| unit_from_u8(p.0[0]));
            stretch.apply(raw)
        });

        Self { values }
    }

    /// Field width in samples
    pub fn width(&self) -> u32 {
        self.values.ncols() as u32
    }

    /// Field height in samples
    pub fn height(&self) -> u32 {
        self.values.nrows() as u32
    }

    /// Intensity at a position; 0.0 outside the field
    pub fn intensity(&self, x: i64, y: i64) -> f32 {
        match (usize::try_from(x), usize::try_from(y)) {
            (Ok(x), Ok(y)) => self.values.get([y, x]).copied().unwrap_or(0.0),
            _ => 0.0,
        }
    }

    /// Smallest and largest value in the field, or `None` when empty
    pub fn range(&self) -> Option<(f32, f32)> {
        if self.values.is_empty() {
            return None;
        }
        Some(
            self.values
                .iter()
                .fold((f32::MAX, f32::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v))),
        )
    }

    /// Borrow the underlying grid
    pub const fn values(&self) -> &Array2<f32> {
        &self.values
    }
}
