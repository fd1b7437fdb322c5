//! Click-free bypass crossfade.
//!
//! Toggling an effect off should not cut from the processed signal to the dry
//! one in a single sample. [`BypassCrossfade`] runs after the effect has
//! written its processed output and blends it with the dry input:
//!
//! ```text
//! out = wet * processed + (1 - wet) * dry
//! ```
//!
//! `wet` follows a linear ramp between 0 and 1 over the configured window and
//! is computed once per sample, shared by every channel. The effect keeps
//! processing while bypassed so its internal history stays live and there is
//! no re-convergence transient when the bypass is released.
//!
//! # Usage
//!
//! ```rust
//! use ondina_core::BypassCrossfade;
//!
//! let mut bypass = BypassCrossfade::new(48000.0, 10.0);
//! let dry = [0.5f32; 64];
//! let mut processed = [0.0f32; 64];
//!
//! // ... effect writes `processed` from `dry` ...
//! bypass.update(true, 64);
//! bypass.crossfade(&[&dry], &mut [&mut processed], 0, 64);
//! assert!(processed[63] > 0.0); // moving toward dry
//! ```

use crate::math::fade_samples;

/// Default bypass fade window in milliseconds.
pub const DEFAULT_BYPASS_MS: f32 = 10.0;

/// Dry/processed blend engine for toggling an effect.
///
/// # Invariants
///
/// - wet gain and dry gain sum to 1 at every sample
/// - during a transition the wet gain moves monotonically by `1 / fade_length`
///   per sample
#[derive(Debug, Clone)]
pub struct BypassCrossfade {
    /// Requested state latched by the last `update`.
    bypassed: bool,
    /// Current wet gain in [0, 1].
    wet: f32,
    /// Wet gain change per sample while moving.
    step: f32,
    fade_ms: f32,
}

impl BypassCrossfade {
    /// Create an engaged (fully wet) crossfade with a `fade_ms` window.
    pub fn new(sample_rate: f32, fade_ms: f32) -> Self {
        Self {
            bypassed: false,
            wet: 1.0,
            step: 1.0 / fade_samples(fade_ms, sample_rate) as f32,
            fade_ms,
        }
    }

    /// Latch the requested bypass state for the coming block.
    ///
    /// `block_size` is only reported in the toggle trace.
    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    pub fn update(&mut self, bypass_requested: bool, block_size: usize) {
        #[cfg(feature = "tracing")]
        {
            if bypass_requested != self.bypassed {
                tracing::debug!(bypass = bypass_requested, block_size, "bypass toggled");
            }
        }
        self.bypassed = bypass_requested;
    }

    /// True once bypass is latched and the fade has reached pure dry.
    #[inline]
    pub fn is_fully_bypassed(&self) -> bool {
        self.bypassed && self.wet <= 0.0
    }

    /// Blend processed `outputs` with dry `inputs` in place.
    ///
    /// Operates on frames `offset..offset + frames` of every channel present
    /// in both slices. Frames outside a buffer's length are skipped.
    pub fn crossfade(
        &mut self,
        inputs: &[&[f32]],
        outputs: &mut [&mut [f32]],
        offset: usize,
        frames: usize,
    ) {
        if frames == 0 {
            return;
        }
        let channels = inputs.len().min(outputs.len());
        let end = inputs[..channels]
            .iter()
            .map(|b| b.len())
            .chain(outputs[..channels].iter().map(|b| b.len()))
            .fold(offset + frames, usize::min);

        if self.is_settled() {
            if self.wet <= 0.0 {
                for (input, output) in inputs.iter().zip(outputs.iter_mut()) {
                    if end > offset {
                        output[offset..end].copy_from_slice(&input[offset..end]);
                    }
                }
            }
            return;
        }

        for i in offset..end {
            let wet = self.advance();
            for ch in 0..channels {
                let dry = inputs[ch][i];
                outputs[ch][i] = dry + wet * (outputs[ch][i] - dry);
            }
        }
    }

    /// Advance the envelope one sample and return the wet gain.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        if self.bypassed {
            self.wet = (self.wet - self.step).max(0.0);
        } else {
            self.wet = (self.wet + self.step).min(1.0);
        }
        self.wet
    }

    /// Current wet gain.
    #[inline]
    pub fn wet_gain(&self) -> f32 {
        self.wet
    }

    /// Current dry gain (`1 - wet`).
    #[inline]
    pub fn dry_gain(&self) -> f32 {
        1.0 - self.wet
    }

    /// True when the envelope has reached the latched state.
    #[inline]
    pub fn is_settled(&self) -> bool {
        if self.bypassed {
            self.wet <= 0.0
        } else {
            self.wet >= 1.0
        }
    }

    /// Latched bypass request.
    #[inline]
    pub fn is_bypassed(&self) -> bool {
        self.bypassed
    }

    /// Jump to the latched state without fading.
    pub fn snap(&mut self) {
        self.wet = if self.bypassed { 0.0 } else { 1.0 };
    }

    /// Per-sample wet gain step.
    #[inline]
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Update the sample rate.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.step = 1.0 / fade_samples(self.fade_ms, sample_rate) as f32;
    }
}

impl Default for BypassCrossfade {
    fn default() -> Self {
        Self::new(48000.0, DEFAULT_BYPASS_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engaged_leaves_processed_untouched() {
        let mut bypass = BypassCrossfade::new(1000.0, 10.0);
        let dry = [1.0f32; 8];
        let mut out = [0.25f32; 8];
        bypass.update(false, 8);
        assert!(!bypass.is_fully_bypassed());
        bypass.crossfade(&[&dry], &mut [&mut out], 0, 8);
        assert_eq!(out, [0.25; 8]);
    }

    #[test]
    fn fades_to_dry_over_window() {
        let mut bypass = BypassCrossfade::new(1000.0, 10.0); // 10 samples
        let dry = [1.0f32; 16];
        let mut out = [0.0f32; 16];
        bypass.update(true, 16);
        bypass.crossfade(&[&dry], &mut [&mut out], 0, 16);
        for w in out[..10].windows(2) {
            assert!(w[1] > w[0]);
        }
        assert!((out[9] - 1.0).abs() < 1e-6);
        assert_eq!(out[15], 1.0);
        assert!(bypass.is_fully_bypassed());
    }

    #[test]
    fn fully_bypassed_copies_input() {
        let mut bypass = BypassCrossfade::new(1000.0, 10.0);
        bypass.update(true, 4);
        bypass.snap();
        let dry = [0.1, 0.2, 0.3, 0.4];
        let mut out = [9.0f32; 4];
        bypass.crossfade(&[&dry], &mut [&mut out], 0, 4);
        assert_eq!(out, dry);
    }

    #[test]
    fn envelope_shared_across_channels() {
        let mut bypass = BypassCrossfade::new(1000.0, 10.0);
        let dry_l = [1.0f32; 10];
        let dry_r = [-1.0f32; 10];
        let mut out_l = [0.0f32; 10];
        let mut out_r = [0.0f32; 10];
        bypass.update(true, 10);
        bypass.crossfade(&[&dry_l, &dry_r], &mut [&mut out_l, &mut out_r], 0, 10);
        for i in 0..10 {
            assert!((out_l[i] + out_r[i]).abs() < 1e-6);
        }
        assert!((out_l[9] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn offset_limits_processed_range() {
        let mut bypass = BypassCrossfade::new(1000.0, 10.0);
        bypass.update(true, 4);
        let dry = [1.0f32; 8];
        let mut out = [0.0f32; 8];
        bypass.crossfade(&[&dry], &mut [&mut out], 4, 4);
        assert_eq!(&out[..4], &[0.0; 4]);
        assert!(out[4] > 0.0);
    }

    #[test]
    fn update_only_latches_state() {
        let mut bypass = BypassCrossfade::new(1000.0, 10.0);
        bypass.update(true, 64);
        assert!(bypass.is_bypassed());
        assert!(!bypass.is_fully_bypassed());
        assert_eq!(bypass.wet_gain(), 1.0);

        bypass.snap();
        assert!(bypass.is_fully_bypassed());
        bypass.update(false, 64);
        assert!(!bypass.is_fully_bypassed());
        assert_eq!(bypass.wet_gain(), 0.0);
    }

    #[test]
    fn zero_frames_is_noop() {
        let mut bypass = BypassCrossfade::new(1000.0, 10.0);
        bypass.update(true, 0);
        let dry: [f32; 0] = [];
        let mut out: [f32; 0] = [];
        bypass.crossfade(&[&dry], &mut [&mut out], 0, 0);
        assert_eq!(bypass.wet_gain(), 1.0);
    }
}
