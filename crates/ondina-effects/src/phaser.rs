//! Click-free phaser control layer.
//!
//! Wraps one [`AllpassCascade`] per channel and makes every control change
//! continuous:
//!
//! - feedback and its loudness compensation follow 10 ms [`LinearRamp`]s
//! - the stage count goes through a [`CrossfadeSwitcher`], so the topology
//!   change happens while the output is muted
//! - on/off runs through a [`BypassCrossfade`] after the block is processed,
//!   keeping the cascade history live while bypassed
//!
//! Controls are read once per block. An explicit reset (parameter or first
//! activation) snaps every ramp and puts the stereo LFOs back at their
//! offsets.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use core::slice;
use ondina_core::gain::{feedback_compensation, feedback_from_control};
use ondina_core::{
    BypassCrossfade, CrossfadeSwitcher, DEFAULT_BYPASS_MS, DEFAULT_RAMP_MS, DEFAULT_SWITCH_MS,
    Effect, LinearRamp, ParamDescriptor, ParamFlags, ParamUnit, common_frames, impl_params,
};

use crate::cascade::{AllpassCascade, MAX_STAGES, SimplePhaser};

/// Sweep depth per unit of the 0–10 depth control.
pub const CENTS_PER_DEPTH_UNIT: f32 = 600.0;

/// Smallest stereo phase change (in turns) that re-syncs the right LFO.
pub const STEREO_RESYNC_EPSILON: f32 = 0.0001;

/// Base sweep frequency range in Hz.
pub const FREQUENCY_RANGE_HZ: (f32, f32) = (20.0, 20000.0);
/// Sweep depth control range.
pub const DEPTH_RANGE: (f32, f32) = (0.0, 10.0);
/// Sweep rate range in Hz.
pub const RATE_RANGE_HZ: (f32, f32) = (0.01, 20.0);
/// Feedback control range (scaled by 0.09 into the loop).
pub const FEEDBACK_RANGE: (f32, f32) = (0.0, 10.0);
/// Stereo phase offset range in degrees.
pub const STEREO_RANGE_DEG: (f32, f32) = (-180.0, 180.0);

/// Phaser with click-free feedback, stage-count and bypass transitions.
///
/// Generic over the cascade so other filter networks can be dropped in.
///
/// ## Parameter Indices (`ParameterInfo`)
///
/// | Index | Name | Range | Default |
/// |-------|------|-------|---------|
/// | 0 | On | off/on | on |
/// | 1 | Reset | trigger | off |
/// | 2 | Frequency | 20–20000 Hz | 1000 |
/// | 3 | Depth | 0–10 | 4 |
/// | 4 | Rate | 0.01–20 Hz | 0.5 |
/// | 5 | Feedback | 0–10 | 2 |
/// | 6 | Stages | 1–12 | 6 |
/// | 7 | Stereo | -180–180° | 180 |
///
/// # Example
///
/// ```rust
/// use ondina_core::{Effect, ParameterInfo};
/// use ondina_effects::Phaser;
///
/// let mut phaser = Phaser::new(2, 48000.0);
/// phaser.set_stages(8);
/// phaser.set_feedback(6.0);
/// phaser.activate();
///
/// let input = [0.25f32; 128];
/// let mut left = [0.0f32; 128];
/// let mut right = [0.0f32; 128];
/// phaser.process(&[&input, &input], &mut [&mut left, &mut right], 128);
/// assert_eq!(phaser.param_count(), 8);
/// ```
#[derive(Debug, Clone)]
pub struct Phaser<C: AllpassCascade = SimplePhaser> {
    cascades: Vec<C>,
    feedback: LinearRamp,
    compensation: LinearRamp,
    stage_switch: CrossfadeSwitcher<usize>,
    bypass: BypassCrossfade,
    /// Stereo offset (turns) applied at the last reset or re-sync.
    last_stereo_phase: f32,
    reset_pending: bool,
    // Raw control values
    on: bool,
    frequency: f32,
    depth: f32,
    rate: f32,
    feedback_raw: f32,
    stages: usize,
    stereo_degrees: f32,
}

impl Phaser<SimplePhaser> {
    /// Create a phaser over the reference cascade.
    pub fn new(channels: usize, sample_rate: f32) -> Self {
        let channels = channels.max(1);
        let cascades = (0..channels).map(|_| SimplePhaser::new(sample_rate)).collect();
        Self::with_cascades(cascades, sample_rate)
    }
}

impl<C: AllpassCascade> Phaser<C> {
    /// Default base frequency in Hz.
    pub const DEFAULT_FREQUENCY: f32 = 1000.0;
    /// Default sweep depth (0–10).
    pub const DEFAULT_DEPTH: f32 = 4.0;
    /// Default sweep rate in Hz.
    pub const DEFAULT_RATE: f32 = 0.5;
    /// Default feedback control (0–10).
    pub const DEFAULT_FEEDBACK: f32 = 2.0;
    /// Default stage count.
    pub const DEFAULT_STAGES: usize = 6;
    /// Default stereo offset in degrees.
    pub const DEFAULT_STEREO: f32 = 180.0;

    /// Create a phaser over caller-supplied cascades, one per channel.
    ///
    /// Each cascade is configured for `sample_rate`.
    pub fn with_cascades(mut cascades: Vec<C>, sample_rate: f32) -> Self {
        for cascade in &mut cascades {
            cascade.setup(sample_rate);
        }
        let feedback = feedback_from_control(Self::DEFAULT_FEEDBACK);
        Self {
            cascades,
            feedback: LinearRamp::new(feedback, sample_rate, DEFAULT_RAMP_MS),
            compensation: LinearRamp::new(
                feedback_compensation(feedback),
                sample_rate,
                DEFAULT_RAMP_MS,
            ),
            stage_switch: CrossfadeSwitcher::new(
                Self::DEFAULT_STAGES,
                sample_rate,
                DEFAULT_SWITCH_MS,
            ),
            bypass: BypassCrossfade::new(sample_rate, DEFAULT_BYPASS_MS),
            last_stereo_phase: Self::DEFAULT_STEREO / 360.0,
            reset_pending: true,
            on: true,
            frequency: Self::DEFAULT_FREQUENCY,
            depth: Self::DEFAULT_DEPTH,
            rate: Self::DEFAULT_RATE,
            feedback_raw: Self::DEFAULT_FEEDBACK,
            stages: Self::DEFAULT_STAGES,
            stereo_degrees: Self::DEFAULT_STEREO,
        }
    }

    /// Enable or disable the effect (drives the bypass crossfade).
    pub fn set_on(&mut self, on: bool) {
        self.on = on;
    }

    /// Whether the effect is enabled.
    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Request a hard reset at the start of the next block.
    pub fn request_reset(&mut self) {
        self.reset_pending = true;
    }

    /// Whether a hard reset is waiting for the next block.
    pub fn reset_pending(&self) -> bool {
        self.reset_pending
    }

    /// Set the base sweep frequency in Hz (20–20000).
    pub fn set_frequency(&mut self, hz: f32) {
        self.frequency = clamp_or(hz, FREQUENCY_RANGE_HZ, Self::DEFAULT_FREQUENCY);
    }

    /// Set sweep depth (0–10, 600 cents per unit).
    pub fn set_depth(&mut self, depth: f32) {
        self.depth = clamp_or(depth, DEPTH_RANGE, Self::DEFAULT_DEPTH);
    }

    /// Set sweep rate in Hz (0.01–20).
    pub fn set_rate(&mut self, rate_hz: f32) {
        self.rate = clamp_or(rate_hz, RATE_RANGE_HZ, Self::DEFAULT_RATE);
    }

    /// Set the feedback control (0–10).
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback_raw = clamp_or(feedback, FEEDBACK_RANGE, Self::DEFAULT_FEEDBACK);
    }

    /// Set the stage count (1–12).
    pub fn set_stages(&mut self, stages: usize) {
        self.stages = stages.clamp(1, MAX_STAGES);
    }

    /// Requested stage count.
    pub fn stages(&self) -> usize {
        self.stages
    }

    /// Stage count currently in the signal path.
    ///
    /// Lags [`stages`](Self::stages) until the switcher reaches its swap point.
    pub fn active_stages(&self) -> usize {
        self.stage_switch.state()
    }

    /// Set the stereo LFO offset in degrees (-180–180).
    pub fn set_stereo_degrees(&mut self, degrees: f32) {
        self.stereo_degrees = clamp_or(degrees, STEREO_RANGE_DEG, Self::DEFAULT_STEREO);
    }

    /// Current feedback loop coefficient (ramped).
    pub fn current_feedback(&self) -> f32 {
        self.feedback.get()
    }

    /// Current compensation gain (ramped).
    pub fn current_compensation(&self) -> f32 {
        self.compensation.get()
    }

    /// Bypass crossfade state.
    pub fn bypass(&self) -> &BypassCrossfade {
        &self.bypass
    }

    /// Cascade for `channel`, if present.
    pub fn cascade(&self, channel: usize) -> Option<&C> {
        self.cascades.get(channel)
    }

    /// Read raw controls and retarget ramps, switcher and cascades.
    fn apply_controls(&mut self) {
        let feedback = feedback_from_control(self.feedback_raw);
        let compensation = feedback_compensation(feedback);
        let stereo_phase = self.stereo_degrees / 360.0;

        for cascade in &mut self.cascades {
            cascade.set_rate(self.rate);
            cascade.set_base_frequency(self.frequency);
            cascade.set_mod_depth(self.depth * CENTS_PER_DEPTH_UNIT);
        }

        if self.reset_pending {
            self.reset_pending = false;
            self.feedback.set_immediate(feedback);
            self.compensation.set_immediate(compensation);
            self.stage_switch.set_immediate(self.stages);
            for (ch, cascade) in self.cascades.iter_mut().enumerate() {
                cascade.set_feedback(feedback);
                cascade.set_stage_count(self.stages);
                cascade.reset_phase(if ch == 0 { 0.0 } else { stereo_phase });
            }
            self.last_stereo_phase = stereo_phase;
            #[cfg(feature = "tracing")]
            tracing::debug!(stages = self.stages, feedback, "phaser hard reset");
            return;
        }

        self.feedback.set_target(feedback);
        self.compensation.set_target(compensation);
        #[cfg(feature = "tracing")]
        {
            if self.stages != self.stage_switch.state() && self.stage_switch.is_idle() {
                tracing::debug!(
                    from = self.stage_switch.state(),
                    to = self.stages,
                    "stage count crossfade"
                );
            }
        }
        self.stage_switch.set(self.stages);

        if (stereo_phase - self.last_stereo_phase).abs() > STEREO_RESYNC_EPSILON {
            if let Some((lead, rest)) = self.cascades.split_first_mut() {
                let lead_phase = lead.phase();
                for cascade in rest {
                    cascade.reset_phase(lead_phase + stereo_phase);
                }
            }
            self.last_stereo_phase = stereo_phase;
        }
    }
}

/// Clamp into `range`, mapping NaN to `fallback`.
#[inline]
fn clamp_or(value: f32, range: (f32, f32), fallback: f32) -> f32 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(range.0, range.1)
    }
}

impl Default for Phaser<SimplePhaser> {
    fn default() -> Self {
        Self::new(2, 48000.0)
    }
}

impl<C: AllpassCascade> Effect for Phaser<C> {
    fn channels(&self) -> usize {
        self.cascades.len()
    }

    fn process(&mut self, inputs: &[&[f32]], outputs: &mut [&mut [f32]], frames: usize) {
        let frames = common_frames(inputs, outputs, frames);
        if frames == 0 {
            return;
        }
        let channels = self.cascades.len().min(inputs.len()).min(outputs.len());

        self.apply_controls();
        self.bypass.update(!self.on, frames);

        for i in 0..frames {
            let feedback = self.feedback.advance();
            let compensation = self.compensation.advance();
            let envelope = self.stage_switch.advance();
            let stages = self.stage_switch.state();
            let gain = envelope * compensation;

            for (ch, cascade) in self.cascades[..channels].iter_mut().enumerate() {
                cascade.set_feedback(feedback);
                cascade.set_stage_count(stages);
                let mut y = 0.0;
                cascade.process(slice::from_mut(&mut y), slice::from_ref(&inputs[ch][i]), true);
                outputs[ch][i] = y * gain;
            }
        }

        self.bypass.crossfade(inputs, outputs, 0, frames);
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        for cascade in &mut self.cascades {
            cascade.setup(sample_rate);
        }
        self.feedback.set_sample_rate(sample_rate);
        self.compensation.set_sample_rate(sample_rate);
        self.stage_switch.set_sample_rate(sample_rate);
        self.bypass.set_sample_rate(sample_rate);
    }

    /// Hard reset, with the bypass settled to the current on/off state.
    fn activate(&mut self) {
        self.reset();
        self.bypass.update(!self.on, 0);
        self.bypass.snap();
        #[cfg(feature = "tracing")]
        tracing::debug!(channels = self.cascades.len(), on = self.on, "phaser activated");
    }

    fn reset(&mut self) {
        for cascade in &mut self.cascades {
            cascade.reset();
        }
        self.reset_pending = true;
    }
}

impl_params! {
    impl<C: AllpassCascade> Phaser<C>, this {
        [0] ParamDescriptor::toggle("On", "On", true).with_id("on"),
            get: f32::from(u8::from(this.on)),
            set: |v| this.set_on(v >= 0.5);

        [1] ParamDescriptor::toggle("Reset", "Reset", false)
                .with_id("reset")
                .with_flags(ParamFlags::STEPPED.union(ParamFlags::TRIGGER)),
            get: f32::from(u8::from(this.reset_pending)),
            set: |v| if v >= 0.5 { this.request_reset() };

        [2] ParamDescriptor::hertz("Frequency", "Freq", 20.0, 20000.0, 1000.0)
                .with_id("frequency")
                .with_step(1.0),
            get: this.frequency,
            set: |v| this.set_frequency(v);

        [3] ParamDescriptor::new("Depth", "Depth", ParamUnit::None, 0.0, 10.0, 4.0)
                .with_id("depth")
                .with_step(0.1),
            get: this.depth,
            set: |v| this.set_depth(v);

        [4] ParamDescriptor::hertz("Rate", "Rate", 0.01, 20.0, 0.5)
                .with_id("rate"),
            get: this.rate,
            set: |v| this.set_rate(v);

        [5] ParamDescriptor::new("Feedback", "Fdbk", ParamUnit::None, 0.0, 10.0, 2.0)
                .with_id("feedback")
                .with_step(0.1),
            get: this.feedback_raw,
            set: |v| this.set_feedback(v);

        [6] ParamDescriptor::stepped("Stages", "Stages", 1.0, 12.0, 6.0)
                .with_id("stages"),
            get: this.stages as f32,
            set: |v| this.set_stages(if v.is_nan() { 6 } else { libm::roundf(v.max(0.0)) as usize });

        [7] ParamDescriptor::degrees("Stereo", "Stereo", -180.0, 180.0, 180.0)
                .with_id("stereo"),
            get: this.stereo_degrees,
            set: |v| this.set_stereo_degrees(v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f32::consts::PI;
    use ondina_core::ParameterInfo;

    fn sine(freq: f32, n: usize) -> Vec<f32> {
        (0..n)
            .map(|i| 0.5 * libm::sinf(2.0 * PI * freq * i as f32 / 48000.0))
            .collect()
    }

    fn run_mono(phaser: &mut Phaser, input: &[f32], block: usize) -> Vec<f32> {
        let mut output = vec![0.0; input.len()];
        for (inp, out) in input.chunks(block).zip(output.chunks_mut(block)) {
            phaser.process(&[inp], &mut [out], inp.len());
        }
        output
    }

    #[test]
    fn test_feedback_ramps_linearly() {
        let mut phaser = Phaser::new(1, 48000.0);
        phaser.set_feedback(0.0);
        phaser.activate();
        run_mono(&mut phaser, &[0.0; 64], 64);
        assert_eq!(phaser.current_feedback(), 0.0);

        phaser.set_feedback(9.0);
        run_mono(&mut phaser, &[0.0; 240], 240);
        let halfway = phaser.current_feedback();
        assert!((halfway - 0.405).abs() < 0.005, "got {halfway}");

        run_mono(&mut phaser, &[0.0; 240], 240);
        assert!((phaser.current_feedback() - 0.81).abs() < 1e-5);
    }

    #[test]
    fn test_compensation_follows_feedback() {
        let mut phaser = Phaser::new(1, 48000.0);
        phaser.set_feedback(10.0);
        phaser.activate();
        run_mono(&mut phaser, &[0.0; 16], 16);
        assert!((phaser.current_compensation() - 0.501).abs() < 0.002);

        phaser.set_feedback(3.0);
        run_mono(&mut phaser, &[0.0; 1000], 250);
        assert_eq!(phaser.current_compensation(), 1.0);
    }

    #[test]
    fn test_reset_snaps_ramps() {
        let mut phaser = Phaser::new(1, 48000.0);
        phaser.activate();
        run_mono(&mut phaser, &[0.0; 64], 64);

        phaser.set_feedback(10.0);
        phaser.set_param(1, 1.0);
        assert!(phaser.reset_pending());
        run_mono(&mut phaser, &[0.0; 1], 1);
        assert!(!phaser.reset_pending());
        assert_eq!(phaser.current_feedback(), ondina_core::gain::MAX_FEEDBACK);
    }

    #[test]
    fn test_stage_change_lags_until_swap() {
        let mut phaser = Phaser::new(1, 48000.0);
        phaser.set_stages(4);
        phaser.activate();
        run_mono(&mut phaser, &[0.0; 64], 64);
        assert_eq!(phaser.active_stages(), 4);

        phaser.set_stages(8);
        run_mono(&mut phaser, &[0.0; 1000], 100);
        assert_eq!(phaser.active_stages(), 4);
        run_mono(&mut phaser, &[0.0; 300], 100);
        assert_eq!(phaser.active_stages(), 8);
    }

    #[test]
    fn test_stereo_reset_offsets_right_lfo() {
        let mut phaser = Phaser::new(2, 48000.0);
        phaser.set_stereo_degrees(90.0);
        phaser.activate();
        let input = [0.0f32; 1];
        let mut l = [0.0f32; 1];
        let mut r = [0.0f32; 1];
        phaser.process(&[&input, &input], &mut [&mut l, &mut r], 1);
        let left = phaser.cascade(0).unwrap().phase();
        let right = phaser.cascade(1).unwrap().phase();
        assert!(left < 0.01);
        assert!((right - 0.25).abs() < 0.01, "right {right}");
    }

    #[test]
    fn test_stereo_change_resyncs_from_left() {
        let mut phaser = Phaser::new(2, 48000.0);
        phaser.set_rate(2.0);
        phaser.activate();
        let input = vec![0.0f32; 4800];
        let mut l = vec![0.0f32; 4800];
        let mut r = vec![0.0f32; 4800];
        phaser.process(&[&input, &input], &mut [&mut l, &mut r], 4800);

        phaser.set_stereo_degrees(-90.0);
        let left_before = phaser.cascade(0).unwrap().phase();
        phaser.process(&[&input[..1]], &mut [&mut l[..1]], 1);
        let right = phaser.cascade(1).unwrap().phase();
        let expected = ondina_core::wrap_unit(left_before - 0.25);
        assert!((right - expected).abs() < 1e-3, "right {right} expected {expected}");
    }

    #[test]
    fn test_fully_bypassed_is_exact_dry() {
        let mut phaser = Phaser::new(1, 48000.0);
        phaser.set_on(false);
        phaser.activate();
        let input = sine(440.0, 1024);
        let output = run_mono(&mut phaser, &input, 128);
        assert_eq!(output, input);
    }

    #[test]
    fn test_parameter_surface() {
        let mut phaser = Phaser::new(2, 48000.0);
        assert_eq!(phaser.param_count(), 8);
        let ids: Vec<&str> = (0..8).map(|i| phaser.param_info(i).unwrap().string_id).collect();
        assert_eq!(
            ids,
            ["on", "reset", "frequency", "depth", "rate", "feedback", "stages", "stereo"]
        );

        phaser.set_param(6, 40.0);
        assert_eq!(phaser.get_param(6), 12.0);
        phaser.set_param(6, -3.0);
        assert_eq!(phaser.get_param(6), 1.0);
        phaser.set_param(5, 25.0);
        assert_eq!(phaser.get_param(5), 10.0);
        phaser.set_param(2, 5.0);
        assert_eq!(phaser.get_param(2), 20.0);
        phaser.set_param(0, 0.0);
        assert!(!phaser.is_on());
    }

    #[test]
    fn test_zero_frames_is_noop() {
        let mut phaser = Phaser::new(1, 48000.0);
        phaser.activate();
        let input: [f32; 0] = [];
        let mut output: [f32; 0] = [];
        phaser.process(&[&input], &mut [&mut output], 0);
        assert!(phaser.reset_pending());
    }
}
