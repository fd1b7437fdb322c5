//! Mathematical utility functions for DSP.
//!
//! Allocation-free helpers shared by the smoothing primitives and the effect
//! engines. All functions are `no_std` compatible.
//!
//! - [`db_to_linear`] / [`linear_to_db`] - Convert between dB and linear gain
//! - [`wrap_unit`] - Floating modulo into `[0, 1)`
//! - [`wet_dry_mix`] - Linear blend between a dry and a processed signal
//! - [`ms_to_samples`] - Time conversions for fade windows

use libm::{expf, floorf, logf};

/// Convert decibels to linear gain.
///
/// # Example
/// ```rust
/// use ondina_core::db_to_linear;
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

/// Convert linear gain to decibels.
///
/// Inputs at or below zero are floored at -200 dB.
///
/// # Example
/// ```rust
/// use ondina_core::linear_to_db;
///
/// assert!((linear_to_db(1.0) - 0.0).abs() < 0.001);
/// assert!((linear_to_db(0.5) - (-6.02)).abs() < 0.01);
/// ```
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    const FACTOR: f32 = 20.0 / core::f32::consts::LN_10;
    logf(linear.max(1e-10)) * FACTOR
}

/// Wrap a value into the unit interval `[0, 1)`.
///
/// Works for negative inputs and for values several cycles away from the
/// interval, so phase offsets in turns can be added without pre-checking.
///
/// ```rust
/// use ondina_core::wrap_unit;
///
/// assert_eq!(wrap_unit(1.25), 0.25);
/// assert_eq!(wrap_unit(-0.25), 0.75);
/// ```
#[inline]
pub fn wrap_unit(x: f32) -> f32 {
    let wrapped = x - floorf(x);
    // x slightly below an integer can round up to exactly 1.0
    if wrapped >= 1.0 { 0.0 } else { wrapped }
}

/// Convert milliseconds to samples.
#[inline]
pub fn ms_to_samples(ms: f32, sample_rate: f32) -> f32 {
    ms * sample_rate / 1000.0
}

/// Fade window length in whole samples, never shorter than one sample.
#[inline]
pub fn fade_samples(ms: f32, sample_rate: f32) -> u32 {
    let samples = ms_to_samples(ms, sample_rate);
    if samples < 1.0 { 1 } else { samples as u32 }
}

/// Flush denormal numbers to zero.
///
/// Feedback paths decaying toward silence can otherwise spend a long time in
/// the denormal range, which is very slow on most CPUs.
#[inline]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

/// Blend `dry` toward `wet` by `mix` (0 = dry, 1 = wet).
///
/// Written as `dry + mix * (wet - dry)` so that identical inputs come back
/// bit-exact for any mix value.
#[inline]
pub fn wet_dry_mix(dry: f32, wet: f32, mix: f32) -> f32 {
    dry + (wet - dry) * mix
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_linear_roundtrip() {
        for db in [-40.0, -12.0, -6.0, 0.0, 6.0] {
            let back = linear_to_db(db_to_linear(db));
            assert!((back - db).abs() < 1e-3, "{db} dB came back as {back}");
        }
    }

    #[test]
    fn test_wrap_unit() {
        assert_eq!(wrap_unit(0.0), 0.0);
        assert_eq!(wrap_unit(1.0), 0.0);
        assert!((wrap_unit(2.75) - 0.75).abs() < 1e-6);
        assert!((wrap_unit(-1.5) - 0.5).abs() < 1e-6);
        let tiny = wrap_unit(-1e-9);
        assert!((0.0..1.0).contains(&tiny), "got {tiny}");
    }

    #[test]
    fn test_fade_samples() {
        assert_eq!(fade_samples(10.0, 48000.0), 480);
        assert_eq!(fade_samples(25.0, 44100.0), 1102);
        assert_eq!(fade_samples(0.0, 48000.0), 1);
    }

    #[test]
    fn test_wet_dry_mix_identity() {
        let x = 0.123_456_7;
        for mix in [0.0, 0.1, 0.33, 0.9, 1.0] {
            assert_eq!(wet_dry_mix(x, x, mix), x);
        }
        assert_eq!(wet_dry_mix(0.0, 1.0, 0.25), 0.25);
    }

    #[test]
    fn test_flush_denormal() {
        assert_eq!(flush_denormal(1e-25), 0.0);
        assert_eq!(flush_denormal(-1e-25), 0.0);
        assert_eq!(flush_denormal(0.5), 0.5);
    }
}
