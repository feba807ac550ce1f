//! Level conversions between linear amplitude, energy, and decibels.
//!
//! All conversions clamp their input to [`SILENCE_EPSILON`] before taking a
//! logarithm, so silent or degenerate signals produce a large negative dB
//! value instead of `-inf`/`NaN`.

use libm::{expf, logf, sqrtf};

/// Linear floor applied before any logarithm.
///
/// Corresponds to -200 dB on the amplitude scale; anything below it is
/// treated as silence.
pub const SILENCE_EPSILON: f32 = 1e-10;

/// Convert decibels to linear amplitude.
///
/// # Example
/// ```rust
/// use roomtone_core::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 0.001);
/// assert!((db_to_linear(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    // 10^(dB/20) = e^(dB * ln(10)/20)
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * FACTOR)
}

/// Convert linear amplitude to decibels.
///
/// Equivalent to `20 * log10(max(linear, SILENCE_EPSILON))`.
///
/// # Example
/// ```rust
/// use roomtone_core::linear_to_db;
///
/// assert!((linear_to_db(1.0) - 0.0).abs() < 0.001);
/// assert!((linear_to_db(0.5) - (-6.02)).abs() < 0.01);
/// ```
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    // 20 * log10(x) = 20/ln(10) * ln(x)
    const FACTOR: f32 = 20.0 / core::f32::consts::LN_10;
    logf(linear.max(SILENCE_EPSILON)) * FACTOR
}

/// Convert an energy (power) ratio to decibels.
///
/// Equivalent to `10 * log10(max(ratio, SILENCE_EPSILON))`.
#[inline]
pub fn power_ratio_to_db(ratio: f32) -> f32 {
    const FACTOR: f32 = 10.0 / core::f32::consts::LN_10;
    logf(ratio.max(SILENCE_EPSILON)) * FACTOR
}

/// Root-mean-square level of a sample block, in linear scale.
///
/// Returns 0.0 for an empty block.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = samples.iter().map(|&x| x * x).sum();
    sqrtf(sum_sq / samples.len() as f32)
}
