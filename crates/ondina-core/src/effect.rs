//! Effect lifecycle trait.
//!
//! The [`Effect`] trait is the contract between an engine and whatever hosts
//! it (plugin adapter, offline renderer, tests). It mirrors a plugin host's
//! lifecycle: configure the sample rate, activate, process blocks, deactivate.
//!
//! ## Design Decisions
//!
//! - **Planar multichannel blocks**: one slice per channel. The channel count
//!   is fixed when the engine is constructed, so mono and stereo variants
//!   share one implementation.
//!
//! - **Object-safe**: hosts store engines as `Box<dyn Effect>` or
//!   [`EffectWithParams`](crate::EffectWithParams) trait objects.
//!
//! - **Never fails**: `process` has no error path. Zero frames is a no-op and
//!   mismatched buffers are processed up to their shortest common length.

/// Core trait for block-based multichannel effects.
///
/// # Example
///
/// ```rust
/// use ondina_core::{Effect, common_frames};
///
/// struct Gain {
///     gain: f32,
/// }
///
/// impl Effect for Gain {
///     fn channels(&self) -> usize {
///         1
///     }
///
///     fn process(&mut self, inputs: &[&[f32]], outputs: &mut [&mut [f32]], frames: usize) {
///         let n = common_frames(inputs, outputs, frames);
///         for (input, output) in inputs.iter().zip(outputs.iter_mut()) {
///             for i in 0..n {
///                 output[i] = input[i] * self.gain;
///             }
///         }
///     }
///
///     fn set_sample_rate(&mut self, _sample_rate: f32) {}
///
///     fn reset(&mut self) {}
/// }
///
/// let mut g = Gain { gain: 0.5 };
/// let input = [1.0f32; 4];
/// let mut output = [0.0f32; 4];
/// g.process(&[&input], &mut [&mut output], 4);
/// assert_eq!(output, [0.5; 4]);
/// ```
pub trait Effect {
    /// Number of audio channels processed per block.
    fn channels(&self) -> usize;

    /// Process `frames` samples from `inputs` into `outputs`.
    ///
    /// Channels beyond [`channels`](Self::channels) are ignored. Real-time
    /// safe: no allocation, no locking.
    fn process(&mut self, inputs: &[&[f32]], outputs: &mut [&mut [f32]], frames: usize);

    /// Update the sample rate.
    ///
    /// Called before activation. Effects recompute any sample-rate-dependent
    /// coefficients (fade lengths in samples, filter coefficients, phase
    /// increments).
    fn set_sample_rate(&mut self, sample_rate: f32);

    /// Prepare for processing.
    ///
    /// Default performs a [`reset`](Self::reset).
    fn activate(&mut self) {
        self.reset();
    }

    /// Processing has stopped. Default does nothing.
    fn deactivate(&mut self) {}

    /// Clear internal state without changing parameters.
    fn reset(&mut self);

    /// Report processing latency in samples. Default is 0.
    fn latency_samples(&self) -> usize {
        0
    }
}

/// Number of frames that can be processed safely.
///
/// The smallest of `frames` and every buffer length in `inputs` and
/// `outputs`. Returns 0 when either side has no channels.
#[inline]
pub fn common_frames(inputs: &[&[f32]], outputs: &[&mut [f32]], frames: usize) -> usize {
    if inputs.is_empty() || outputs.is_empty() {
        return 0;
    }
    let shortest_in = inputs.iter().map(|b| b.len()).min().unwrap_or(0);
    let shortest_out = outputs.iter().map(|b| b.len()).min().unwrap_or(0);
    frames.min(shortest_in).min(shortest_out)
}
