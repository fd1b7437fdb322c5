//! Harmonic tremolo.
//!
//! Instead of modulating the whole signal's amplitude, the harmonic tremolo
//! splits the input into a slow envelope (one-pole smoothed signal) and the
//! residual high-frequency content, then crossfades between the two with a
//! triangle LFO. Low and high bands pulse in opposition, which gives a
//! phaser-like motion without a modulated delay line.
//!
//! Per channel, per sample:
//!
//! ```text
//! y    = smooth(x)                       tone sets the smoothing cutoff
//! diff = x - y
//! t    = triangle(phase [+ offset], shape)
//! sum  = y * t + diff * (1 - t)
//! out  = (x + depth% * (sum - x)) * (1 + 0.005 * depth)
//! out  = x + wet * (out - x)
//! ```

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use ondina_core::{
    CONTROL_RETENTION, Effect, OnePoleSmoother, ParamDescriptor, ParamFlags, ParamUnit,
    ParameterInfo, PhaseAccumulator, common_frames, triangle, wet_dry_mix, wrap_unit,
};

/// LFO rate range in Hz.
pub const RATE_RANGE_HZ: (f32, f32) = (0.1, 20.0);
/// Triangle duty range.
pub const SHAPE_RANGE: (f32, f32) = (0.01, 0.99);
/// Envelope smoothing cutoff range in Hz.
pub const TONE_RANGE_HZ: (f32, f32) = (500.0, 6000.0);
/// Inter-channel phase offset range in degrees.
pub const PHASE_RANGE_DEG: (f32, f32) = (-180.0, 180.0);
/// Depth range in percent.
pub const DEPTH_RANGE: (f32, f32) = (0.0, 100.0);

/// Loudness make-up per percent of depth.
pub const DEPTH_GAIN_PER_PERCENT: f32 = 0.005;

/// Stereo (or mono) harmonic tremolo engine.
///
/// The channel count is fixed at construction. All channels share one LFO
/// and one set of smoothed controls; channels after the first read the LFO
/// shifted by the smoothed phase offset.
///
/// ## Parameter Indices (`ParameterInfo`)
///
/// | Index | Name | Range | Default |
/// |-------|------|-------|---------|
/// | 0 | On | off/on | on |
/// | 1 | Reset | trigger | off |
/// | 2 | Rate | 0.1–20 Hz | 4.0 |
/// | 3 | Shape | 0.01–0.99 | 0.5 |
/// | 4 | Tone | 500–6000 Hz | 6000 |
/// | 5 | Phase | -180–180° | 0 |
/// | 6 | Depth | 0–100% | 100 |
///
/// # Example
///
/// ```rust
/// use ondina_core::Effect;
/// use ondina_effects::HarmonicTremolo;
///
/// let mut trem = HarmonicTremolo::new(2, 48000.0);
/// trem.set_rate(6.0);
/// trem.set_phase_degrees(90.0);
/// trem.activate();
///
/// let left = [0.5f32; 256];
/// let right = [0.5f32; 256];
/// let mut out_l = [0.0f32; 256];
/// let mut out_r = [0.0f32; 256];
/// trem.process(&[&left, &right], &mut [&mut out_l, &mut out_r], 256);
/// ```
#[derive(Debug, Clone)]
pub struct HarmonicTremolo {
    channels: usize,
    /// Per-channel signal envelope (`y`).
    envelopes: Vec<OnePoleSmoother>,
    lfo: PhaseAccumulator,
    shape: OnePoleSmoother,
    depth: OnePoleSmoother,
    /// Phase offset in turns, wrapped into [0, 1).
    phase_offset: OnePoleSmoother,
    wet: OnePoleSmoother,
    // Raw control values, read once per block
    on: bool,
    reset_requested: bool,
    rate: f32,
    shape_raw: f32,
    tone: f32,
    phase_degrees: f32,
    depth_raw: f32,
    sample_rate: f32,
    sample_period: f32,
}

impl HarmonicTremolo {
    /// Default LFO rate in Hz.
    pub const DEFAULT_RATE: f32 = 4.0;
    /// Default triangle duty.
    pub const DEFAULT_SHAPE: f32 = 0.5;
    /// Default tone in Hz.
    pub const DEFAULT_TONE: f32 = 6000.0;
    /// Default depth in percent.
    pub const DEFAULT_DEPTH: f32 = 100.0;

    /// Create a tremolo for `channels` channels (at least one).
    pub fn new(channels: usize, sample_rate: f32) -> Self {
        let channels = channels.max(1);
        let tone_coeff = OnePoleSmoother::tone_coefficient(Self::DEFAULT_TONE, sample_rate);
        Self {
            channels,
            envelopes: (0..channels)
                .map(|_| OnePoleSmoother::new(0.0, tone_coeff))
                .collect(),
            lfo: PhaseAccumulator::new(),
            shape: OnePoleSmoother::with_retention(Self::DEFAULT_SHAPE, CONTROL_RETENTION),
            depth: OnePoleSmoother::with_retention(Self::DEFAULT_DEPTH, CONTROL_RETENTION),
            phase_offset: OnePoleSmoother::with_retention(0.0, CONTROL_RETENTION),
            wet: OnePoleSmoother::with_retention(1.0, CONTROL_RETENTION),
            on: true,
            reset_requested: false,
            rate: Self::DEFAULT_RATE,
            shape_raw: Self::DEFAULT_SHAPE,
            tone: Self::DEFAULT_TONE,
            phase_degrees: 0.0,
            depth_raw: Self::DEFAULT_DEPTH,
            sample_rate,
            sample_period: 1.0 / sample_rate,
        }
    }

    /// Enable or disable the effect. Drives the smoothed wet level.
    pub fn set_on(&mut self, on: bool) {
        self.on = on;
    }

    /// Whether the effect is enabled.
    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Request a restart at the start of the next block.
    ///
    /// Clears the filter state and the LFO, then fades the effect back in
    /// from dry exactly as activation does.
    pub fn request_reset(&mut self) {
        self.reset_requested = true;
    }

    /// Set LFO rate in Hz (0.1–20).
    pub fn set_rate(&mut self, rate_hz: f32) {
        self.rate = clamp_or(rate_hz, RATE_RANGE_HZ, Self::DEFAULT_RATE);
    }

    /// Current LFO rate in Hz.
    pub fn rate(&self) -> f32 {
        self.rate
    }

    /// Set triangle duty (0.01–0.99, 0.5 is symmetric).
    pub fn set_shape(&mut self, shape: f32) {
        self.shape_raw = clamp_or(shape, SHAPE_RANGE, Self::DEFAULT_SHAPE);
    }

    /// Current triangle duty.
    pub fn shape(&self) -> f32 {
        self.shape_raw
    }

    /// Set envelope smoothing cutoff in Hz (500–6000).
    pub fn set_tone(&mut self, tone_hz: f32) {
        self.tone = clamp_or(tone_hz, TONE_RANGE_HZ, Self::DEFAULT_TONE);
    }

    /// Current tone in Hz.
    pub fn tone(&self) -> f32 {
        self.tone
    }

    /// Set inter-channel phase offset in degrees (-180–180).
    pub fn set_phase_degrees(&mut self, degrees: f32) {
        self.phase_degrees = clamp_or(degrees, PHASE_RANGE_DEG, 0.0);
    }

    /// Current phase offset in degrees.
    pub fn phase_degrees(&self) -> f32 {
        self.phase_degrees
    }

    /// Set modulation depth in percent (0–100).
    pub fn set_depth(&mut self, depth: f32) {
        self.depth_raw = clamp_or(depth, DEPTH_RANGE, Self::DEFAULT_DEPTH);
    }

    /// Current depth in percent.
    pub fn depth(&self) -> f32 {
        self.depth_raw
    }

    /// Smoothed wet level currently applied.
    pub fn wet_level(&self) -> f32 {
        self.wet.get()
    }

    /// Current LFO position in turns.
    pub fn lfo_phase(&self) -> f32 {
        self.lfo.position()
    }

    /// Push raw controls into the smoother targets.
    fn apply_controls(&mut self) {
        self.shape.set_target(self.shape_raw);
        self.depth.set_target(self.depth_raw);
        self.phase_offset.set_target(self.offset_turns());
        self.wet.set_target(if self.on { 1.0 } else { 0.0 });

        let coeff = OnePoleSmoother::tone_coefficient(self.tone, self.sample_rate);
        for env in &mut self.envelopes {
            env.set_coefficient(coeff);
        }

        if self.reset_requested {
            self.reset_requested = false;
            self.clear_state();
            self.start_fade_in();
            #[cfg(feature = "tracing")]
            tracing::debug!("tremolo restarted");
        }
    }

    /// Offset target in turns. -180° and 180° both land on 0.5.
    fn offset_turns(&self) -> f32 {
        wrap_unit(self.phase_degrees / 360.0)
    }

    /// Start wet, shape and phase offset from 0 and let them converge.
    fn start_fade_in(&mut self) {
        self.wet.set_current(0.0);
        self.shape.set_current(0.0);
        self.phase_offset.set_current(0.0);
    }

    fn clear_state(&mut self) {
        for env in &mut self.envelopes {
            env.set_immediate(0.0);
        }
        self.lfo.reset(0.0);
        self.shape.snap_to_target();
        self.depth.snap_to_target();
        self.phase_offset.snap_to_target();
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

impl Default for HarmonicTremolo {
    fn default() -> Self {
        Self::new(2, 48000.0)
    }
}

impl Effect for HarmonicTremolo {
    fn channels(&self) -> usize {
        self.channels
    }

    fn process(&mut self, inputs: &[&[f32]], outputs: &mut [&mut [f32]], frames: usize) {
        let frames = common_frames(inputs, outputs, frames);
        if frames == 0 {
            return;
        }
        let channels = self.channels.min(inputs.len()).min(outputs.len());

        self.apply_controls();

        for i in 0..frames {
            let shape = self.shape.advance();
            let depth = self.depth.advance();
            let offset = self.phase_offset.advance();
            let wet = self.wet.advance();
            let phase = self.lfo.advance(self.rate, self.sample_period);

            let depth_factor = depth * 0.01;
            let makeup = 1.0 + DEPTH_GAIN_PER_PERCENT * depth;

            for ch in 0..channels {
                let x = inputs[ch][i];
                let y = self.envelopes[ch].step(x);
                let diff = x - y;

                let t = if ch == 0 {
                    triangle(phase, shape)
                } else {
                    triangle(phase + offset, shape)
                };
                let sum = y * t + diff * (1.0 - t);
                let out = (x + depth_factor * (sum - x)) * makeup;

                outputs[ch][i] = wet_dry_mix(x, out, wet);
            }
        }
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.sample_period = 1.0 / sample_rate;
        let coeff = OnePoleSmoother::tone_coefficient(self.tone, sample_rate);
        for env in &mut self.envelopes {
            env.set_coefficient(coeff);
        }
    }

    /// Reset state and fade in from dry.
    fn activate(&mut self) {
        self.reset();
        self.start_fade_in();
        #[cfg(feature = "tracing")]
        tracing::debug!(
            channels = self.channels,
            sample_rate = self.sample_rate,
            "tremolo activated"
        );
    }

    fn reset(&mut self) {
        self.reset_requested = false;
        self.shape.set_target(self.shape_raw);
        self.depth.set_target(self.depth_raw);
        self.phase_offset.set_target(self.offset_turns());
        self.clear_state();
        self.wet.set_immediate(if self.on { 1.0 } else { 0.0 });
    }
}

impl ParameterInfo for HarmonicTremolo {
    fn param_count(&self) -> usize {
        7
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        match index {
            0 => Some(ParamDescriptor::toggle("On", "On", true).with_id("on")),
            1 => Some(
                ParamDescriptor::toggle("Reset", "Reset", false)
                    .with_id("reset")
                    .with_flags(ParamFlags::STEPPED.union(ParamFlags::TRIGGER)),
            ),
            2 => Some(
                ParamDescriptor::hertz("Rate", "Rate", 0.1, 20.0, Self::DEFAULT_RATE)
                    .with_id("rate")
                    .with_step(0.05),
            ),
            3 => Some(
                ParamDescriptor::new(
                    "Shape",
                    "Shape",
                    ParamUnit::None,
                    SHAPE_RANGE.0,
                    SHAPE_RANGE.1,
                    Self::DEFAULT_SHAPE,
                )
                .with_id("shape"),
            ),
            4 => Some(
                ParamDescriptor::hertz("Tone", "Tone", 500.0, 6000.0, Self::DEFAULT_TONE)
                    .with_id("tone")
                    .with_step(10.0),
            ),
            5 => Some(
                ParamDescriptor::degrees("Phase", "Phase", -180.0, 180.0, 0.0).with_id("phase"),
            ),
            6 => Some(
                ParamDescriptor::percent("Depth", "Depth", Self::DEFAULT_DEPTH).with_id("depth"),
            ),
            _ => None,
        }
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => f32::from(u8::from(self.on)),
            1 => f32::from(u8::from(self.reset_requested)),
            2 => self.rate,
            3 => self.shape_raw,
            4 => self.tone,
            5 => self.phase_degrees,
            6 => self.depth_raw,
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        match index {
            0 => self.set_on(value >= 0.5),
            1 => {
                if value >= 0.5 {
                    self.request_reset();
                }
            }
            2 => self.set_rate(value),
            3 => self.set_shape(value),
            4 => self.set_tone(value),
            5 => self.set_phase_degrees(value),
            6 => self.set_depth(value),
            _ => {}
        }
    }
}
