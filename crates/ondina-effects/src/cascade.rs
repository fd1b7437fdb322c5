//! All-pass cascade collaborator.
//!
//! The phaser control layer drives its filter network through the
//! [`AllpassCascade`] trait, so the click-free orchestration does not depend
//! on one particular cascade design. [`SimplePhaser`] is the reference
//! implementation: a chain of first-order all-pass stages swept by a triangle
//! LFO, with a feedback path from the last stage back to the input.

use core::f32::consts::PI;
use libm::{exp2f, tanf};
use ondina_core::{OnePoleSmoother, PhaseAccumulator, flush_denormal, triangle};

/// Maximum number of all-pass stages.
pub const MAX_STAGES: usize = 12;

/// Samples between LFO / coefficient updates.
pub const CONTROL_INTERVAL: u32 = 32;

/// Lowest swept all-pass frequency.
pub const MIN_SWEEP_HZ: f32 = 10.0;

/// Highest swept all-pass frequency as a fraction of the sample rate.
pub const MAX_SWEEP_RATIO: f32 = 0.49;

/// Dry/wet gain smoothing time.
const GAIN_SMOOTHING_MS: f32 = 5.0;

/// Contract between the phaser control layer and a filter network.
///
/// Control setters may be called every sample; implementations keep them
/// cheap and defer coefficient work to their own control rate.
pub trait AllpassCascade {
    /// Configure for a sample rate. Called before any processing.
    fn setup(&mut self, sample_rate: f32);

    /// Clear filter history and the feedback state.
    fn reset(&mut self);

    /// Move the sweep LFO to `phase` turns. The filter follows the new
    /// position immediately.
    fn reset_phase(&mut self, phase: f32);

    /// Current sweep LFO position in turns.
    fn phase(&self) -> f32;

    /// Sweep LFO rate in Hz.
    fn set_rate(&mut self, rate_hz: f32);

    /// Centre of the sweep in Hz.
    fn set_base_frequency(&mut self, hz: f32);

    /// Sweep depth in cents either side of the base frequency.
    fn set_mod_depth(&mut self, cents: f32);

    /// Loop feedback coefficient.
    fn set_feedback(&mut self, feedback: f32);

    /// Number of active stages. Implementations clamp to their own range.
    fn set_stage_count(&mut self, stages: usize);

    /// Dry path gain.
    fn set_dry(&mut self, gain: f32);

    /// Wet path gain.
    fn set_wet(&mut self, gain: f32);

    /// Process `input` into `output` (shortest common length).
    ///
    /// With `enabled == false` the wet path is still computed but only the
    /// dry signal reaches the output.
    fn process(&mut self, output: &mut [f32], input: &[f32], enabled: bool);
}

/// One first-order all-pass section.
///
/// Uses the structure:
/// y[n] = a * x[n] + x[n-1] - a * y[n-1]
///
/// The coefficient is shared by all stages of a cascade, so only the history
/// lives here.
#[derive(Debug, Clone, Copy, Default)]
struct AllpassStage {
    /// Previous input sample
    x1: f32,
    /// Previous output sample
    y1: f32,
}

impl AllpassStage {
    #[inline]
    fn process(&mut self, input: f32, a: f32) -> f32 {
        let output = a * input + self.x1 - a * self.y1;
        self.x1 = input;
        self.y1 = output;
        output
    }

    fn clear(&mut self) {
        self.x1 = 0.0;
        self.y1 = 0.0;
    }

    fn sanitize(&mut self) {
        self.x1 = flush_denormal(self.x1);
        self.y1 = flush_denormal(self.y1);
    }
}

/// All-pass coefficient for a -90° point at `freq`.
///
/// `a = (tan(pi*fc/fs) - 1) / (tan(pi*fc/fs) + 1)`
#[inline]
fn allpass_coefficient(freq: f32, sample_rate: f32) -> f32 {
    let t = tanf(PI * freq / sample_rate);
    (t - 1.0) / (t + 1.0)
}

/// Reference all-pass cascade with a triangle sweep.
///
/// Every [`CONTROL_INTERVAL`] samples the LFO is read and the shared stage
/// coefficient is recomputed from
///
/// ```text
/// freq = base * 2^(lfo * depth_cents / 1200),  lfo in [-1, 1]
/// ```
///
/// clamped to [`MIN_SWEEP_HZ`]..`MAX_SWEEP_RATIO * fs`.
///
/// # Example
///
/// ```rust
/// use ondina_effects::{AllpassCascade, SimplePhaser};
///
/// let mut cascade = SimplePhaser::new(48000.0);
/// cascade.set_stage_count(6);
/// cascade.set_feedback(0.3);
///
/// let input = [0.5f32; 64];
/// let mut output = [0.0f32; 64];
/// cascade.process(&mut output, &input, true);
/// assert!(output.iter().all(|s| s.is_finite()));
/// ```
#[derive(Debug, Clone)]
pub struct SimplePhaser {
    stages: [AllpassStage; MAX_STAGES],
    active_stages: usize,
    coefficient: f32,
    lfo: PhaseAccumulator,
    rate: f32,
    base_frequency: f32,
    mod_depth_cents: f32,
    feedback: f32,
    /// Last cascade output, fed back into the input.
    state: f32,
    dry: OnePoleSmoother,
    wet: OnePoleSmoother,
    /// Samples since the last control step.
    counter: u32,
    sample_rate: f32,
}

impl SimplePhaser {
    /// Create a cascade with all stages active, 1 kHz base and no sweep.
    pub fn new(sample_rate: f32) -> Self {
        let mut cascade = Self {
            stages: [AllpassStage::default(); MAX_STAGES],
            active_stages: MAX_STAGES,
            coefficient: 0.0,
            lfo: PhaseAccumulator::new(),
            rate: 0.5,
            base_frequency: 1000.0,
            mod_depth_cents: 0.0,
            feedback: 0.0,
            state: 0.0,
            dry: OnePoleSmoother::with_time_ms(1.0, sample_rate, GAIN_SMOOTHING_MS),
            wet: OnePoleSmoother::with_time_ms(1.0, sample_rate, GAIN_SMOOTHING_MS),
            counter: 0,
            sample_rate,
        };
        cascade.control_step();
        cascade
    }

    /// Number of stages currently in the signal path.
    pub fn stage_count(&self) -> usize {
        self.active_stages
    }

    /// Current shared all-pass coefficient.
    pub fn coefficient(&self) -> f32 {
        self.coefficient
    }

    /// Recompute the all-pass coefficient from the current LFO position.
    fn update_coefficient(&mut self) {
        // Bipolar triangle, 0 at phase 0 and peaking at a quarter turn
        let lfo = 2.0 * triangle(self.lfo.position() + 0.25, 0.5) - 1.0;
        let freq = self.base_frequency * exp2f(lfo * self.mod_depth_cents / 1200.0);
        let freq = freq.clamp(MIN_SWEEP_HZ, MAX_SWEEP_RATIO * self.sample_rate);
        self.coefficient = allpass_coefficient(freq, self.sample_rate);
    }

    /// Update the coefficient and step the LFO forward by one control
    /// interval.
    fn control_step(&mut self) {
        self.counter = 0;
        self.update_coefficient();
        self.lfo
            .advance(self.rate, CONTROL_INTERVAL as f32 / self.sample_rate);

        for stage in &mut self.stages[..self.active_stages] {
            stage.sanitize();
        }
        self.state = flush_denormal(self.state);
    }
}

impl Default for SimplePhaser {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl AllpassCascade for SimplePhaser {
    fn setup(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        let (dry, wet) = (self.dry.target(), self.wet.target());
        self.dry = OnePoleSmoother::with_time_ms(dry, sample_rate, GAIN_SMOOTHING_MS);
        self.wet = OnePoleSmoother::with_time_ms(wet, sample_rate, GAIN_SMOOTHING_MS);
        self.control_step();
    }

    fn reset(&mut self) {
        for stage in &mut self.stages {
            stage.clear();
        }
        self.state = 0.0;
        self.lfo.reset(0.0);
        self.dry.snap_to_target();
        self.wet.snap_to_target();
        self.control_step();
    }

    fn reset_phase(&mut self, phase: f32) {
        self.lfo.reset(phase);
        self.update_coefficient();
    }

    fn phase(&self) -> f32 {
        self.lfo.position()
    }

    fn set_rate(&mut self, rate_hz: f32) {
        self.rate = rate_hz;
    }

    fn set_base_frequency(&mut self, hz: f32) {
        self.base_frequency = hz;
    }

    fn set_mod_depth(&mut self, cents: f32) {
        self.mod_depth_cents = cents;
    }

    fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback;
    }

    fn set_stage_count(&mut self, stages: usize) {
        let stages = stages.clamp(1, MAX_STAGES);
        if stages > self.active_stages {
            // New stages start from the last active stage's history
            let seed = self.stages[self.active_stages - 1];
            for stage in &mut self.stages[self.active_stages..stages] {
                *stage = seed;
            }
        }
        self.active_stages = stages;
    }

    fn set_dry(&mut self, gain: f32) {
        self.dry.set_target(gain);
    }

    fn set_wet(&mut self, gain: f32) {
        self.wet.set_target(gain);
    }

    fn process(&mut self, output: &mut [f32], input: &[f32], enabled: bool) {
        for (out, &x) in output.iter_mut().zip(input.iter()) {
            self.counter += 1;
            if self.counter >= CONTROL_INTERVAL {
                self.control_step();
            }

            let mut fd = x + self.state * self.feedback;
            for stage in &mut self.stages[..self.active_stages] {
                fd = stage.process(fd, self.coefficient);
            }
            self.state = fd;

            let dry = x * self.dry.advance();
            let wet = fd * self.wet.advance();
            *out = if enabled { dry + wet } else { dry };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, sr: f32, n: usize) -> Vec<f32> {
        (0..n)
            .map(|i| 0.5 * libm::sinf(2.0 * PI * freq * i as f32 / sr))
            .collect()
    }

    fn peak(buf: &[f32]) -> f32 {
        buf.iter().fold(0.0f32, |m, s| m.max(s.abs()))
    }

    #[test]
    fn coefficient_at_quarter_rate() {
        // tan(pi/4) = 1
        assert!(allpass_coefficient(12000.0, 48000.0).abs() < 1e-6);
        assert!(allpass_coefficient(1000.0, 48000.0) < 0.0);
    }

    #[test]
    fn in_phase_at_base_frequency_with_four_stages() {
        // Four stages at -90 degrees each: wet is back in phase with dry
        let sr = 48000.0;
        let mut cascade = SimplePhaser::new(sr);
        cascade.set_stage_count(4);
        let input = sine(1000.0, sr, 9600);
        let mut output = vec![0.0; input.len()];
        cascade.process(&mut output, &input, true);
        let p = peak(&output[4800..]);
        assert!((p - 1.0).abs() < 0.02, "peak {p}");
    }

    #[test]
    fn disabled_passes_dry_only() {
        let mut cascade = SimplePhaser::new(48000.0);
        let input = sine(440.0, 48000.0, 256);
        let mut output = vec![0.0; 256];
        cascade.process(&mut output, &input, false);
        for (o, i) in output.iter().zip(&input) {
            assert!((o - i).abs() < 1e-6);
        }
    }

    #[test]
    fn stays_bounded_with_max_feedback() {
        let mut cascade = SimplePhaser::new(48000.0);
        cascade.set_feedback(0.81);
        cascade.set_mod_depth(6000.0);
        cascade.set_rate(3.0);
        let input = sine(300.0, 48000.0, 48000);
        let mut output = vec![0.0; input.len()];
        cascade.process(&mut output, &input, true);
        assert!(output.iter().all(|s| s.is_finite()));
        assert!(peak(&output) < 10.0);
    }

    #[test]
    fn growing_stage_count_seeds_history() {
        let mut cascade = SimplePhaser::new(48000.0);
        cascade.set_stage_count(2);
        let input = sine(500.0, 48000.0, 100);
        let mut output = vec![0.0; 100];
        cascade.process(&mut output, &input, true);
        cascade.set_stage_count(5);
        assert_eq!(cascade.stage_count(), 5);
        for i in 2..5 {
            assert_eq!(cascade.stages[i].y1, cascade.stages[1].y1);
        }
        cascade.set_stage_count(40);
        assert_eq!(cascade.stage_count(), MAX_STAGES);
        cascade.set_stage_count(0);
        assert_eq!(cascade.stage_count(), 1);
    }

    #[test]
    fn sweep_moves_coefficient() {
        let mut cascade = SimplePhaser::new(48000.0);
        cascade.set_mod_depth(2400.0);
        cascade.set_rate(5.0);
        let start = cascade.coefficient();
        let input = [0.0f32; 2400];
        let mut output = [0.0f32; 2400];
        cascade.process(&mut output, &input, true);
        assert!((cascade.coefficient() - start).abs() > 0.01);
    }

    #[test]
    fn reset_phase_sets_lfo_position() {
        let mut cascade = SimplePhaser::new(48000.0);
        cascade.reset_phase(0.5);
        assert!((cascade.phase() - 0.5).abs() < 1e-6);
        cascade.reset_phase(1.25);
        assert!((cascade.phase() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn reset_phase_refreshes_coefficient() {
        let mut cascade = SimplePhaser::new(48000.0);
        cascade.set_base_frequency(4000.0);
        cascade.reset_phase(0.0);
        assert_eq!(cascade.coefficient(), allpass_coefficient(4000.0, 48000.0));
    }
}
