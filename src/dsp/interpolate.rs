//! Interpolation between neighbouring samples.
//!
//! Used for fractional delay-line taps (flange) and for resampling decoded
//! PCM data.

/// Linear interpolation from `a` (t = 0) to `b` (t = 1).
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    (b - a) * t + a
}

/// Cubic Hermite (Catmull-Rom) interpolation between `b` and `c`.
///
/// `a` and `d` are the samples on either side and only shape the tangents,
/// which keeps the curve C1-continuous across neighbouring segments. `t` runs
/// from 0 (returns `b`) to 1 (returns `c`).
#[inline]
pub fn cubic_hermite(a: f32, b: f32, c: f32, d: f32, t: f32) -> f32 {
    let c3 = -a / 2.0 + (3.0 * b) / 2.0 - (3.0 * c) / 2.0 + d / 2.0;
    let c2 = a - (5.0 * b) / 2.0 + 2.0 * c - d / 2.0;
    let c1 = -a / 2.0 + c / 2.0;
    let c0 = b;

    ((c3 * t + c2) * t + c1) * t + c0
}
