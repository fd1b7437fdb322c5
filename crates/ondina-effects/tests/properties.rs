//! Property-based tests for both engines.
//!
//! Uses proptest to check that any valid parameter set keeps the output
//! finite and bounded, that reset returns an engine to its fresh state, and
//! that the tremolo is transparent at zero depth.

use ondina_core::{Effect, EffectWithParams};
use ondina_effects::{HarmonicTremolo, Phaser};
use proptest::prelude::*;

/// Set every non-trigger parameter from normalized [0, 1] values.
fn set_random_params(effect: &mut dyn EffectWithParams, values: &[f32; 8]) {
    for i in 0..effect.effect_param_count() {
        if let Some(desc) = effect.effect_param_info(i) {
            if desc.is_trigger() {
                continue;
            }
            effect.effect_set_param(i, desc.denormalize(values[i % 8]));
        }
    }
}

fn create(kind: usize, channels: usize, sample_rate: f32) -> Box<dyn EffectWithParams> {
    if kind == 0 {
        Box::new(HarmonicTremolo::new(channels, sample_rate))
    } else {
        Box::new(Phaser::new(channels, sample_rate))
    }
}

/// Run `input` through every channel of `effect` in 64-frame blocks.
fn run(effect: &mut dyn EffectWithParams, input: &[f32]) -> Vec<Vec<f32>> {
    let channels = effect.channels();
    let mut outputs = vec![vec![0.0f32; input.len()]; channels];
    for start in (0..input.len()).step_by(64) {
        let end = (start + 64).min(input.len());
        let ins: Vec<&[f32]> = (0..channels).map(|_| &input[start..end]).collect();
        let mut outs: Vec<&mut [f32]> = outputs.iter_mut().map(|o| &mut o[start..end]).collect();
        effect.process(&ins, &mut outs, end - start);
    }
    outputs
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Any parameter set at any supported rate gives finite output within
    /// a generous bound.
    #[test]
    fn output_finite_and_bounded(
        kind in 0usize..2,
        channels in 1usize..=2,
        sample_rate in prop::sample::select(vec![8000.0f32, 44100.0, 48000.0, 96000.0, 192000.0]),
        params in prop::array::uniform8(0.0f32..=1.0),
        input in prop::collection::vec(-1.0f32..=1.0, 512),
    ) {
        let mut effect = create(kind, channels, sample_rate);
        set_random_params(effect.as_mut(), &params);
        effect.activate();

        for output in run(effect.as_mut(), &input) {
            for (i, &s) in output.iter().enumerate() {
                prop_assert!(s.is_finite(), "kind {} sample {}: {}", kind, i, s);
                prop_assert!(s.abs() <= 10.0, "kind {} sample {}: {}", kind, i, s);
            }
        }
    }

    /// After `reset`, an engine behaves exactly like a fresh one with the
    /// same parameters.
    #[test]
    fn reset_matches_fresh_instance(
        kind in 0usize..2,
        params in prop::array::uniform8(0.0f32..=1.0),
        history in prop::collection::vec(-1.0f32..=1.0, 300),
    ) {
        let probe: Vec<f32> = (0..512)
            .map(|i| 0.5 * (2.0 * std::f32::consts::PI * 330.0 * i as f32 / 48000.0).sin())
            .collect();

        let mut used = create(kind, 2, 48000.0);
        set_random_params(used.as_mut(), &params);
        used.activate();
        run(used.as_mut(), &history);
        used.reset();

        let mut fresh = create(kind, 2, 48000.0);
        set_random_params(fresh.as_mut(), &params);
        if kind == 0 {
            // Skip the tremolo's activation fade-in
            fresh.reset();
        } else {
            fresh.activate();
        }

        let a = run(used.as_mut(), &probe);
        let b = run(fresh.as_mut(), &probe);
        for ch in 0..2 {
            for i in 0..probe.len() {
                prop_assert!(
                    (a[ch][i] - b[ch][i]).abs() < 1e-5,
                    "kind {} ch {} sample {}: {} vs {}", kind, ch, i, a[ch][i], b[ch][i]
                );
            }
        }
    }

    /// Zero depth passes the input through unchanged for any rate, shape,
    /// tone or stereo phase.
    #[test]
    fn tremolo_zero_depth_is_exact(
        rate in 0.1f32..20.0,
        shape in 0.01f32..0.99,
        tone in 500.0f32..6000.0,
        phase in -180.0f32..180.0,
        input in prop::collection::vec(-1.0f32..=1.0, 256),
    ) {
        let mut tremolo = HarmonicTremolo::new(2, 48000.0);
        tremolo.set_rate(rate);
        tremolo.set_shape(shape);
        tremolo.set_tone(tone);
        tremolo.set_phase_degrees(phase);
        tremolo.set_depth(0.0);
        tremolo.activate();

        let mut left = vec![0.0f32; 256];
        let mut right = vec![0.0f32; 256];
        tremolo.process(&[&input, &input], &mut [&mut left, &mut right], 256);
        prop_assert_eq!(&left, &input);
        prop_assert_eq!(&right, &input);
    }
}
