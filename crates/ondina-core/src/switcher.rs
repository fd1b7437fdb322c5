//! Crossfaded switching of discrete state.
//!
//! Some parameters cannot be interpolated: changing an all-pass cascade's
//! stage count swaps its transfer function in one sample. [`CrossfadeSwitcher`]
//! hides the swap behind a gain dip. The signal fades out over the first half
//! of the window, the state changes at the sample where the gain is zero, and
//! the signal fades back in over the second half.
//!
//! ```text
//! gain
//!  1 ──────╲          ╱──────
//!           ╲        ╱
//!  0         ╲──────╱  <- state swaps here
//!          FadingOut  FadingIn
//! ```
//!
//! # Usage
//!
//! ```rust
//! use ondina_core::CrossfadeSwitcher;
//!
//! let mut stages = CrossfadeSwitcher::new(4usize, 48000.0, 50.0);
//! stages.set(8);
//!
//! // Old value during the fade-out
//! let gain = stages.advance();
//! assert!(gain < 1.0);
//! assert_eq!(stages.state(), 4);
//! ```

use crate::math::fade_samples;

/// Default full fade window (out + in) in milliseconds.
pub const DEFAULT_SWITCH_MS: f32 = 50.0;

/// Transition phase of a [`CrossfadeSwitcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchPhase {
    /// Steady state, gain 1.
    Idle,
    /// Gain ramping 1 -> 0 toward the swap.
    FadingOut,
    /// Gain ramping 0 -> 1 after the swap.
    FadingIn,
}

/// Gain envelope plus state latch for discrete parameters.
///
/// # Invariants
///
/// - [`state`](Self::state) only changes on the sample whose gain is 0
/// - at most one pending value; a newer [`set`](Self::set) overwrites it
#[derive(Debug, Clone)]
pub struct CrossfadeSwitcher<T> {
    active: T,
    pending: Option<T>,
    phase: SwitchPhase,
    /// Samples elapsed in the current phase.
    position: u32,
    /// Samples per half (fade-out or fade-in).
    half_length: u32,
    fade_ms: f32,
}

impl<T: Copy + PartialEq> CrossfadeSwitcher<T> {
    /// Create an idle switcher holding `initial`.
    ///
    /// `fade_ms` is the whole window; each half takes `fade_ms / 2`.
    pub fn new(initial: T, sample_rate: f32, fade_ms: f32) -> Self {
        Self {
            active: initial,
            pending: None,
            phase: SwitchPhase::Idle,
            position: 0,
            half_length: fade_samples(fade_ms * 0.5, sample_rate),
            fade_ms,
        }
    }

    /// Request a new state.
    ///
    /// - Idle and unchanged: no-op.
    /// - Idle and different: starts fading out.
    /// - Fading out: replaces the pending value; the fade keeps its progress.
    /// - Fading in: a different value turns the fade around from the current
    ///   gain level, so the envelope stays continuous.
    pub fn set(&mut self, value: T) {
        match self.phase {
            SwitchPhase::Idle => {
                if value != self.active {
                    self.pending = Some(value);
                    self.phase = SwitchPhase::FadingOut;
                    self.position = 0;
                }
            }
            SwitchPhase::FadingOut => {
                self.pending = Some(value);
            }
            SwitchPhase::FadingIn => {
                if value == self.active {
                    self.pending = None;
                } else {
                    self.pending = Some(value);
                    // Mirror the position so gain continues from its current level
                    self.position = self.half_length - self.position;
                    self.phase = SwitchPhase::FadingOut;
                }
            }
        }
    }

    /// Advance one sample and return the gain multiplier.
    ///
    /// The swap happens inside this call, on the sample that returns 0.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        match self.phase {
            SwitchPhase::Idle => 1.0,
            SwitchPhase::FadingOut => {
                self.position += 1;
                if self.position >= self.half_length {
                    if let Some(next) = self.pending.take() {
                        self.active = next;
                    }
                    self.phase = SwitchPhase::FadingIn;
                    self.position = 0;
                    0.0
                } else {
                    1.0 - self.position as f32 / self.half_length as f32
                }
            }
            SwitchPhase::FadingIn => {
                self.position += 1;
                if self.position >= self.half_length {
                    self.phase = SwitchPhase::Idle;
                    self.position = 0;
                    1.0
                } else {
                    self.position as f32 / self.half_length as f32
                }
            }
        }
    }

    /// Currently active state.
    #[inline]
    pub fn state(&self) -> T {
        self.active
    }

    /// Value waiting for the next swap, if any.
    #[inline]
    pub fn pending(&self) -> Option<T> {
        self.pending
    }

    /// Current transition phase.
    #[inline]
    pub fn phase(&self) -> SwitchPhase {
        self.phase
    }

    /// True when no transition is running.
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.phase == SwitchPhase::Idle
    }

    /// Force idle, adopting any pending value immediately.
    ///
    /// Only for hard resets, where the discontinuity is expected.
    pub fn reset(&mut self) {
        if let Some(next) = self.pending.take() {
            self.active = next;
        }
        self.phase = SwitchPhase::Idle;
        self.position = 0;
    }

    /// Set the state immediately and drop any transition.
    pub fn set_immediate(&mut self, value: T) {
        self.pending = Some(value);
        self.reset();
    }

    /// Samples in each half of the window.
    #[inline]
    pub fn half_length_samples(&self) -> u32 {
        self.half_length
    }

    /// Update the sample rate. A running transition is clipped to the new length.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.half_length = fade_samples(self.fade_ms * 0.5, sample_rate);
        self.position = self.position.min(self.half_length - 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn switcher() -> CrossfadeSwitcher<u32> {
        // 10 samples per half
        CrossfadeSwitcher::new(4, 1000.0, 20.0)
    }

    #[test]
    fn idle_gain_is_unity() {
        let mut s = switcher();
        for _ in 0..100 {
            assert_eq!(s.advance(), 1.0);
        }
        s.set(4);
        assert!(s.is_idle());
    }

    #[test]
    fn swap_happens_at_zero_gain() {
        let mut s = switcher();
        s.set(8);
        let mut swap_gain = None;
        let mut prev_state = s.state();
        for _ in 0..20 {
            let gain = s.advance();
            if s.state() != prev_state {
                assert!(swap_gain.is_none(), "state changed twice");
                swap_gain = Some(gain);
                prev_state = s.state();
            }
        }
        assert_eq!(swap_gain, Some(0.0));
        assert_eq!(s.state(), 8);
        assert!(s.is_idle());
    }

    #[test]
    fn envelope_shape() {
        let mut s = switcher();
        s.set(2);
        let gains: Vec<f32> = (0..20).map(|_| s.advance()).collect();
        for w in gains[..10].windows(2) {
            assert!(w[1] < w[0]);
        }
        assert_eq!(gains[9], 0.0);
        for w in gains[10..].windows(2) {
            assert!(w[1] > w[0]);
        }
        assert_eq!(gains[19], 1.0);
    }

    #[test]
    fn set_during_fade_out_overwrites_pending() {
        let mut s = switcher();
        s.set(8);
        for _ in 0..5 {
            s.advance();
        }
        s.set(12);
        assert_eq!(s.phase(), SwitchPhase::FadingOut);
        let mut zero_at = None;
        for i in 0..5 {
            if s.advance() == 0.0 {
                zero_at = Some(i);
            }
        }
        // Fade-out was not restarted
        assert_eq!(zero_at, Some(4));
        assert_eq!(s.state(), 12);
    }

    #[test]
    fn set_during_fade_in_turns_around() {
        let mut s = switcher();
        s.set(8);
        for _ in 0..13 {
            s.advance();
        }
        assert_eq!(s.phase(), SwitchPhase::FadingIn);
        let level = 3.0 / 10.0;
        s.set(6);
        let next = s.advance();
        assert!((next - (level - 0.1)).abs() < 1e-6, "got {next}");
        assert_eq!(s.state(), 8);
        for _ in 0..2 {
            s.advance();
        }
        assert_eq!(s.state(), 6);
    }

    #[test]
    fn reset_adopts_pending() {
        let mut s = switcher();
        s.set(10);
        s.advance();
        s.reset();
        assert!(s.is_idle());
        assert_eq!(s.state(), 10);
        assert_eq!(s.advance(), 1.0);
    }
}
