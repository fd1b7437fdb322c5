//! Linear parameter ramp ("inertia").
//!
//! Control-rate targets become sample-rate straight lines: after
//! [`set_target`](LinearRamp::set_target) the value travels from wherever it
//! currently is to the new target over a fixed number of samples, then
//! holds. Retargeting mid-ramp starts a fresh ramp from the current value,
//! so the output is continuous and piecewise linear.
//!
//! ```rust
//! use ondina_core::LinearRamp;
//!
//! let mut fb = LinearRamp::new(0.0, 48000.0, 10.0); // 480 samples
//! fb.set_target(0.5);
//!
//! let mut last = 0.0;
//! for _ in 0..480 {
//!     last = fb.advance();
//! }
//! assert_eq!(last, 0.5);
//! assert_eq!(fb.advance(), 0.5);
//! ```

use crate::math::fade_samples;

/// Default ramp length for feedback-like parameters.
pub const DEFAULT_RAMP_MS: f32 = 10.0;

/// Linear interpolator from the current value to a target.
///
/// # Invariants
///
/// - `current` equals `target` exactly once the countdown reaches zero
/// - between retargets, successive outputs move monotonically toward the target
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRamp {
    current: f32,
    target: f32,
    /// Value at the moment the running ramp started.
    start: f32,
    /// Samples left in the running ramp (0 = settled).
    remaining: u32,
    /// Ramp length in samples.
    length: u32,
    ramp_ms: f32,
    sample_rate: f32,
}

impl LinearRamp {
    /// Create a settled ramp at `initial` with a `ramp_ms` transition time.
    pub fn new(initial: f32, sample_rate: f32, ramp_ms: f32) -> Self {
        Self {
            current: initial,
            target: initial,
            start: initial,
            remaining: 0,
            length: fade_samples(ramp_ms, sample_rate),
            ramp_ms,
            sample_rate,
        }
    }

    /// Start a linear transition toward `target` from the current value.
    ///
    /// A target equal to the pending one is ignored so that calling this
    /// every block with an unchanged value does not stretch the ramp.
    pub fn set_target(&mut self, target: f32) {
        if target == self.target {
            return;
        }
        self.target = target;
        self.start = self.current;
        self.remaining = self.length;
    }

    /// Snap to `value` immediately. Reserved for hard resets.
    pub fn set_immediate(&mut self, value: f32) {
        self.current = value;
        self.target = value;
        self.start = value;
        self.remaining = 0;
    }

    /// Advance one sample and return the interpolated value.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        if self.remaining > 0 {
            self.remaining -= 1;
            if self.remaining == 0 {
                self.current = self.target;
            } else {
                let done = (self.length - self.remaining) as f32 / self.length as f32;
                self.current = self.start + (self.target - self.start) * done;
            }
        }
        self.current
    }

    /// Current value without advancing.
    #[inline]
    pub fn get(&self) -> f32 {
        self.current
    }

    /// Value being ramped toward.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// True once the target has been reached.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.remaining == 0
    }

    /// Ramp length in samples.
    #[inline]
    pub fn length_samples(&self) -> u32 {
        self.length
    }

    /// Update the sample rate. Takes effect on the next retarget.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.length = fade_samples(self.ramp_ms, sample_rate);
        self.remaining = self.remaining.min(self.length);
    }

    /// Change the transition time. Takes effect on the next retarget.
    pub fn set_ramp_ms(&mut self, ramp_ms: f32) {
        self.ramp_ms = ramp_ms;
        self.set_sample_rate(self.sample_rate);
    }
}

impl Default for LinearRamp {
    fn default() -> Self {
        Self::new(0.0, 48000.0, DEFAULT_RAMP_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reaches_target_exactly_after_length() {
        let mut ramp = LinearRamp::new(0.0, 48000.0, 10.0);
        ramp.set_target(0.81);
        for i in 0..480 {
            let v = ramp.advance();
            if i < 479 {
                assert!(v < 0.81, "reached early at sample {i}");
            }
        }
        assert_eq!(ramp.get(), 0.81);
        assert!(ramp.is_settled());
    }

    #[test]
    fn halfway_at_half_length() {
        let mut ramp = LinearRamp::new(0.0, 48000.0, 10.0);
        ramp.set_target(1.0);
        for _ in 0..240 {
            ramp.advance();
        }
        assert!((ramp.get() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn retarget_mid_ramp_is_continuous() {
        let mut ramp = LinearRamp::new(0.0, 1000.0, 100.0); // 100 samples
        ramp.set_target(1.0);
        for _ in 0..50 {
            ramp.advance();
        }
        let before = ramp.get();
        ramp.set_target(0.0);
        let after = ramp.advance();
        assert!(
            (after - before).abs() <= 0.5 / 100.0 + 1e-6,
            "jump {before} -> {after}"
        );
        for _ in 0..99 {
            ramp.advance();
        }
        assert_eq!(ramp.get(), 0.0);
    }

    #[test]
    fn same_target_does_not_restart() {
        let mut ramp = LinearRamp::new(0.0, 1000.0, 10.0);
        ramp.set_target(1.0);
        for _ in 0..5 {
            ramp.advance();
            ramp.set_target(1.0);
        }
        for _ in 0..5 {
            ramp.advance();
        }
        assert_eq!(ramp.get(), 1.0);
    }

    #[test]
    fn set_immediate_snaps() {
        let mut ramp = LinearRamp::new(0.0, 48000.0, 10.0);
        ramp.set_target(1.0);
        ramp.advance();
        ramp.set_immediate(0.3);
        assert_eq!(ramp.advance(), 0.3);
        assert!(ramp.is_settled());
    }
}
