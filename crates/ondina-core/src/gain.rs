//! Feedback loudness compensation.
//!
//! Feedback around an all-pass cascade builds resonant peaks that make the
//! effect louder as the feedback amount rises. The compensation curve keeps
//! unity gain for moderate feedback and attenuates linearly in dB above a
//! knee, reaching [`COMPENSATION_FLOOR_DB`] at [`MAX_FEEDBACK`].
//!
//! ```text
//!  0 dB ────────────┐
//!                    ╲
//!                     ╲
//! -6 dB                ╲
//!       0          0.45  0.81   feedback
//! ```
//!
//! # Usage
//!
//! ```rust
//! use ondina_core::gain;
//!
//! assert_eq!(gain::feedback_compensation(0.2), 1.0);
//! assert!(gain::feedback_compensation(gain::MAX_FEEDBACK) < 0.51);
//! ```

use crate::math::db_to_linear;

/// Multiplier from the 0–10 feedback control to the loop coefficient.
pub const FEEDBACK_SCALE: f32 = 0.09;

/// Largest loop feedback coefficient.
pub const MAX_FEEDBACK: f32 = 0.81;

/// Feedback coefficient above which compensation starts.
pub const COMPENSATION_KNEE: f32 = 0.45;

/// Attenuation at [`MAX_FEEDBACK`], in dB.
pub const COMPENSATION_FLOOR_DB: f32 = -6.0;

/// Map the raw 0–10 feedback control to a loop coefficient in `[0, 0.81]`.
///
/// ```rust
/// use ondina_core::gain::feedback_from_control;
///
/// assert!((feedback_from_control(5.0) - 0.45).abs() < 1e-6);
/// assert_eq!(feedback_from_control(10.0), 0.81);
/// assert_eq!(feedback_from_control(-1.0), 0.0);
/// ```
#[inline]
pub fn feedback_from_control(raw: f32) -> f32 {
    if raw.is_nan() {
        return 0.0;
    }
    (raw * FEEDBACK_SCALE).clamp(0.0, MAX_FEEDBACK)
}

/// Compensation attenuation in dB for a loop feedback coefficient.
#[inline]
pub fn feedback_compensation_db(feedback: f32) -> f32 {
    let fb = feedback.clamp(0.0, MAX_FEEDBACK);
    if fb <= COMPENSATION_KNEE {
        0.0
    } else {
        COMPENSATION_FLOOR_DB * (fb - COMPENSATION_KNEE) / (MAX_FEEDBACK - COMPENSATION_KNEE)
    }
}

/// Linear compensation gain for a loop feedback coefficient.
///
/// Unity up to [`COMPENSATION_KNEE`], then decreasing monotonically to
/// `db_to_linear(COMPENSATION_FLOOR_DB)` (about 0.5) at [`MAX_FEEDBACK`].
#[inline]
pub fn feedback_compensation(feedback: f32) -> f32 {
    let db = feedback_compensation_db(feedback);
    if db == 0.0 { 1.0 } else { db_to_linear(db) }
}
