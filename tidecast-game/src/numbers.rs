//! Numeric helpers centralizing clamping and safe float-to-integer casts.
//!
//! Every tuning input is sanitized here rather than rejected, so the
//! simulation never panics on out-of-range data.

use num_traits::cast::cast;

/// Clamp `value` into `[min, max]`, argument order matching the tuning formulas.
///
/// NaN collapses to `min`.
#[must_use]
pub fn clamp(min: f64, max: f64, value: f64) -> f64 {
    if value.is_nan() {
        return min;
    }
    value.max(min).min(max)
}

/// Lower-bound `value` by `min`; NaN collapses to `min`.
#[must_use]
pub fn clamp_min(min: f64, value: f64) -> f64 {
    if value.is_nan() { min } else { value.max(min) }
}

/// Linear interpolation from `a` toward `b` by `t`.
#[must_use]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Round a f64 and clamp it to the i64 range, returning 0 for NaN values.
#[must_use]
pub fn round_f64_to_i64(value: f64) -> i64 {
    if value.is_nan() {
        return 0;
    }
    let min = cast::<i64, f64>(i64::MIN).unwrap_or(f64::MIN);
    let max = cast::<i64, f64>(i64::MAX).unwrap_or(f64::MAX);
    let clamped = value.clamp(min, max).round();
    // i64::MAX is not representable as f64; saturate instead of failing.
    cast::<f64, i64>(clamped).unwrap_or(if clamped > 0.0 { i64::MAX } else { 0 })
}

/// Convert i64 to f64 while allowing precision loss in a single location.
#[must_use]
pub fn i64_to_f64(value: i64) -> f64 {
    cast::<i64, f64>(value).unwrap_or(0.0)
}

/// Convert a duration to fractional seconds for the step interface.
#[must_use]
pub fn duration_secs(duration: std::time::Duration) -> f64 {
    duration.as_secs_f64()
}
