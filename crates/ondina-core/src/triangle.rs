//! Variable-duty triangle shaper.
//!
//! Stateless: maps a ramp position and a duty (shape) parameter to a
//! unipolar triangle. The wave is 0 at phase 0, rises linearly to 1 at
//! `phase == duty`, then falls back to 0 at phase 1, so it is continuous
//! across the wrap for every duty value.
//!
//! ```text
//!  1 |      /\
//!    |     /  \
//!    |    /    \
//!  0 |___/      \___
//!    0   duty       1
//! ```

use crate::math::wrap_unit;

/// Lower bound applied to the duty parameter before shaping.
pub const MIN_DUTY: f32 = 0.01;

/// Upper bound applied to the duty parameter before shaping.
pub const MAX_DUTY: f32 = 0.99;

/// Evaluate the triangle at `phase` (turns) with rising-edge fraction `duty`.
///
/// `phase` is wrapped into `[0, 1)`, so sums of a ramp and an offset can be
/// passed unwrapped. `duty` is clamped to [`MIN_DUTY`]..=[`MAX_DUTY`] to keep
/// both edge slopes finite. `0.5` gives a symmetric triangle.
///
/// # Example
///
/// ```rust
/// use ondina_core::triangle;
///
/// assert_eq!(triangle(0.0, 0.5), 0.0);
/// assert_eq!(triangle(0.5, 0.5), 1.0);
/// assert_eq!(triangle(0.25, 0.5), 0.5);
/// assert_eq!(triangle(1.25, 0.5), 0.5);
/// ```
#[inline]
pub fn triangle(phase: f32, duty: f32) -> f32 {
    let phase = wrap_unit(phase);
    let duty = duty.clamp(MIN_DUTY, MAX_DUTY);
    let value = if phase < duty {
        phase / duty
    } else {
        1.0 - (phase - duty) / (1.0 - duty)
    };
    value.clamp(0.0, 1.0)
}
