//! Free-running phase accumulator.
//!
//! The normalized ramp that drives every oscillator in the crate. Position is
//! kept in turns (`[0, 1)`), so callers can add phase offsets in turns and
//! feed the result straight into a waveform function such as
//! [`triangle`](crate::triangle).

use crate::math::wrap_unit;

/// Normalized ramp generator with position in `[0, 1)`.
///
/// # Example
///
/// ```rust
/// use ondina_core::PhaseAccumulator;
///
/// let mut phasor = PhaseAccumulator::new();
/// let period = 1.0 / 48000.0;
///
/// // 4 Hz: one full cycle every 12000 samples
/// let pos = phasor.advance(4.0, period);
/// assert!(pos > 0.0 && pos < 0.001);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PhaseAccumulator {
    position: f32,
}

impl PhaseAccumulator {
    /// Create an accumulator at phase 0.
    pub fn new() -> Self {
        Self { position: 0.0 }
    }

    /// Create an accumulator starting at `initial_phase` turns.
    pub fn with_phase(initial_phase: f32) -> Self {
        Self {
            position: wrap_unit(initial_phase),
        }
    }

    /// Advance by one sample and return the new position.
    ///
    /// `rate` is in cycles per second and `sample_period` is `1 / sample_rate`.
    /// The caller clamps `rate` to a sub-audio range; negative rates run the
    /// ramp backwards and still wrap correctly.
    #[inline]
    pub fn advance(&mut self, rate: f32, sample_period: f32) -> f32 {
        self.position = wrap_unit(self.position + rate * sample_period);
        self.position
    }

    /// Jump directly to `initial_phase` turns.
    ///
    /// Used to impose a fixed inter-channel offset without waiting for drift.
    #[inline]
    pub fn reset(&mut self, initial_phase: f32) {
        self.position = wrap_unit(initial_phase);
    }

    /// Current position without advancing.
    #[inline]
    pub fn position(&self) -> f32 {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_second_at_one_hz_wraps_to_start() {
        let mut phasor = PhaseAccumulator::new();
        let period = 1.0 / 48000.0;
        for _ in 0..48000 {
            phasor.advance(1.0, period);
        }
        let pos = phasor.position();
        let err = pos.min(1.0 - pos);
        assert!(err < 1e-3, "expected ~0 after one cycle, got {pos}");
    }

    #[test]
    fn position_stays_in_unit_interval() {
        let mut phasor = PhaseAccumulator::new();
        for _ in 0..100_000 {
            let pos = phasor.advance(20.0, 1.0 / 44100.0);
            assert!((0.0..1.0).contains(&pos), "position escaped: {pos}");
        }
    }

    #[test]
    fn monotonic_within_cycle() {
        let mut phasor = PhaseAccumulator::new();
        let mut prev = phasor.position();
        let mut wraps = 0;
        for _ in 0..10_000 {
            let pos = phasor.advance(7.0, 1.0 / 48000.0);
            if pos < prev {
                wraps += 1;
            }
            prev = pos;
        }
        // 10000 samples at 7 Hz / 48 kHz = 1.46 cycles
        assert_eq!(wraps, 1);
    }

    #[test]
    fn reset_sets_position_directly() {
        let mut phasor = PhaseAccumulator::new();
        phasor.advance(3.0, 0.01);
        phasor.reset(0.25);
        assert_eq!(phasor.position(), 0.25);
        phasor.reset(-0.25);
        assert!((phasor.position() - 0.75).abs() < 1e-6);
    }
}
