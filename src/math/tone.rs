//! Tone curves shared by the intensity field and the quantizer
//!
//! All curves operate on unit-range values where 0 is black and 1 is white.

use num_traits::Float;

/// Clamp a value into [0, 1], mapping NaN to 0
pub fn clamp_unit<T: Float>(value: T) -> T {
    if value.is_nan() {
        return T::zero();
    }
    num_traits::clamp(value, T::zero(), T::one())
}

/// Raise a unit-range value to `gamma`
///
/// The input is clamped first so the result always stays in [0, 1].
pub fn gamma_correct<T: Float>(value: T, gamma: T) -> T {
    clamp_unit(value).powf(gamma)
}

/// Map `value` from `[min, max]` towards [0, 1]
///
/// `epsilon` pads the denominator so a flat range never divides by zero.
/// The result is not clamped.
pub fn normalize<T: Float>(value: T, min: T, max: T, epsilon: T) -> T {
    (value - min) / (max - min + epsilon)
}

/// Convert an 8-bit channel value to [0, 1]
pub fn unit_from_u8(value: u8) -> f32 {
    f32::from(value) / 255.0
}

/// Convert a unit-range value to the nearest 8-bit channel value
pub fn u8_from_unit(value: f32) -> u8 {
    (clamp_unit(value) * 255.0).round() as u8
}
