//! One-pole exponential smoother.
//!
//! The same primitive serves two roles:
//!
//! - **Control smoothing**: removes block-rate steps from parameters such as
//!   shape, depth, wet level. Configured with a fixed per-sample retention
//!   ([`CONTROL_RETENTION`] = 0.999).
//! - **Signal smoothing**: a slow envelope follower whose step fraction is
//!   derived from a tone frequency, see [`OnePoleSmoother::tone_coefficient`].
//!
//! Difference equation (the step fraction `c` is the stored coefficient):
//!
//! ```text
//! y[n] = y[n-1] + c * (x[n] - y[n-1])
//!      = x[n] + (1 - c) * (y[n-1] - x[n])
//! ```
//!
//! # Usage
//!
//! ```rust
//! use ondina_core::{OnePoleSmoother, CONTROL_RETENTION};
//!
//! let mut shape = OnePoleSmoother::with_retention(0.5, CONTROL_RETENTION);
//! shape.set_target(0.8);
//!
//! for _ in 0..48 {
//!     let smoothed = shape.advance();
//!     assert!(smoothed > 0.5 && smoothed < 0.8);
//! }
//! ```

use core::f32::consts::TAU;
use libm::{expf, sinf};

/// Per-sample retention used for control-rate parameter smoothing.
///
/// Each sample keeps 99.9% of the previous distance to the target, a time
/// constant of 1000 samples (~21 ms at 48 kHz).
pub const CONTROL_RETENTION: f32 = 0.999;

/// Smallest signal-smoothing step fraction.
pub const MIN_TONE_COEFF: f32 = 1e-5;

/// Largest signal-smoothing step fraction.
pub const MAX_TONE_COEFF: f32 = 0.99999;

/// One-pole smoother with a fixed step fraction.
///
/// # Invariants
///
/// - `coeff` lies in `(0, 1]`; 1 means no smoothing
/// - for a fixed target the distance to it shrinks geometrically and never
///   changes sign, so monotonic targets are approached without overshoot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OnePoleSmoother {
    current: f32,
    target: f32,
    coeff: f32,
}

impl OnePoleSmoother {
    /// Create a smoother resting at `initial` with step fraction `coeff`.
    ///
    /// `coeff` is clamped into `(0, 1]`.
    pub fn new(initial: f32, coeff: f32) -> Self {
        Self {
            current: initial,
            target: initial,
            coeff: Self::sanitize(coeff),
        }
    }

    /// Create a smoother from a per-sample retention factor.
    ///
    /// A retention of 0.999 keeps 99.9% of the remaining distance each sample.
    pub fn with_retention(initial: f32, retention: f32) -> Self {
        Self::new(initial, 1.0 - retention)
    }

    /// Create a smoother from a time constant in milliseconds.
    ///
    /// `coeff = 1 - exp(-1 / (tau * sample_rate))`. A time of zero disables
    /// smoothing.
    pub fn with_time_ms(initial: f32, sample_rate: f32, time_ms: f32) -> Self {
        let coeff = if time_ms <= 0.0 || sample_rate <= 0.0 {
            1.0
        } else {
            1.0 - expf(-1.0 / (time_ms / 1000.0 * sample_rate))
        };
        Self::new(initial, coeff)
    }

    /// Step fraction for signal smoothing at a given tone frequency.
    ///
    /// `clamp(sin(2π * tone / sample_rate), 1e-5, 0.99999)`. Higher tones
    /// give a faster follower, so less of the signal ends up in the residual.
    #[inline]
    pub fn tone_coefficient(tone_hz: f32, sample_rate: f32) -> f32 {
        sinf(TAU * tone_hz / sample_rate).clamp(MIN_TONE_COEFF, MAX_TONE_COEFF)
    }

    /// Set the value to smooth toward.
    #[inline]
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Set both target and current value (no smoothing).
    #[inline]
    pub fn set_immediate(&mut self, value: f32) {
        self.target = value;
        self.current = value;
    }

    /// Change the step fraction. The current value is kept.
    #[inline]
    pub fn set_coefficient(&mut self, coeff: f32) {
        self.coeff = Self::sanitize(coeff);
    }

    /// Advance one sample toward the stored target.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        self.current += self.coeff * (self.target - self.current);
        self.current
    }

    /// Retarget and advance one sample in a single call.
    ///
    /// This is the signal-smoothing form: the raw input sample is the target.
    #[inline]
    pub fn step(&mut self, raw: f32) -> f32 {
        self.target = raw;
        self.advance()
    }

    /// Current smoothed value without advancing.
    #[inline]
    pub fn get(&self) -> f32 {
        self.current
    }

    /// Value being smoothed toward.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Step fraction in use.
    #[inline]
    pub fn coefficient(&self) -> f32 {
        self.coeff
    }

    /// Jump to the target.
    #[inline]
    pub fn snap_to_target(&mut self) {
        self.current = self.target;
    }

    /// Force the current value while keeping the target.
    ///
    /// Used for fade-ins: resting at 0 and converging to the stored target.
    #[inline]
    pub fn set_current(&mut self, value: f32) {
        self.current = value;
    }

    fn sanitize(coeff: f32) -> f32 {
        if coeff.is_nan() {
            1.0
        } else {
            coeff.clamp(f32::MIN_POSITIVE, 1.0)
        }
    }
}

impl Default for OnePoleSmoother {
    fn default() -> Self {
        Self::with_retention(0.0, CONTROL_RETENTION)
    }
}
