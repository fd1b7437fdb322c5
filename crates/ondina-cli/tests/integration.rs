//! Integration tests for the `ondina` binary.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

fn ondina_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_ondina"))
}

fn write_sine(path: &Path, channels: u16, frames: usize) {
    let spec = hound::WavSpec {
        channels,
        sample_rate: 48000,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for i in 0..frames {
        let s = 0.5 * (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 48000.0).sin();
        for _ in 0..channels {
            writer.write_sample(s).unwrap();
        }
    }
    writer.finalize().unwrap();
}

fn read_spec_and_len(path: &Path) -> (hound::WavSpec, u32) {
    let reader = hound::WavReader::open(path).unwrap();
    (reader.spec(), reader.duration())
}

#[test]
fn cli_help_works() {
    let output = ondina_bin().arg("--help").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("process"));
    assert!(stdout.contains("effects"));
}

#[test]
fn cli_effects_lists_both_effects() {
    let output = ondina_bin().arg("effects").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Available Effects"));
    assert!(stdout.contains("tremolo"));
    assert!(stdout.contains("phaser"));
}

#[test]
fn cli_effects_detail_shows_parameters() {
    let output = ondina_bin().args(["effects", "phaser"]).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for id in ["frequency", "feedback", "stages", "stereo"] {
        assert!(stdout.contains(id), "missing parameter {id}");
    }
    assert!(stdout.contains("Jet"));
}

#[test]
fn cli_effects_unknown_effect_fails() {
    let output = ondina_bin().args(["effects", "flanger"]).output().unwrap();
    assert!(!output.status.success());
}

#[test]
fn cli_process_tremolo_keeps_stereo() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.wav");
    let output_path = dir.path().join("out.wav");
    write_sine(&input, 2, 9600);

    let output = ondina_bin()
        .args([
            "process",
            input.to_str().unwrap(),
            output_path.to_str().unwrap(),
            "--effect",
            "tremolo",
            "--param",
            "rate=6",
            "--param",
            "phase=90",
            "--quiet",
        ])
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "process failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let (spec, frames) = read_spec_and_len(&output_path);
    assert_eq!(spec.channels, 2);
    assert_eq!(spec.sample_rate, 48000);
    assert_eq!(frames, 9600);
}

#[test]
fn cli_process_mono_input_through_stereo_preset() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("mono.wav");
    let output_path = dir.path().join("out.wav");
    write_sine(&input, 1, 4800);

    let output = ondina_bin()
        .args([
            "process",
            input.to_str().unwrap(),
            output_path.to_str().unwrap(),
            "--preset",
            "jet",
            "--bit-depth",
            "24",
            "--quiet",
        ])
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "process failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let (spec, frames) = read_spec_and_len(&output_path);
    assert_eq!(spec.channels, 2);
    assert_eq!(spec.bits_per_sample, 24);
    assert_eq!(frames, 4800);
}

#[test]
fn cli_process_out_of_range_param_fails() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.wav");
    write_sine(&input, 1, 100);

    let output = ondina_bin()
        .args([
            "process",
            input.to_str().unwrap(),
            dir.path().join("out.wav").to_str().unwrap(),
            "--effect",
            "phaser",
            "--param",
            "stages=40",
        ])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("stages"));
}

#[test]
fn cli_process_no_effect_fails() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.wav");
    write_sine(&input, 1, 100);

    let output = ondina_bin()
        .args([
            "process",
            input.to_str().unwrap(),
            dir.path().join("out.wav").to_str().unwrap(),
        ])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn cli_process_nonexistent_input_fails() {
    let dir = TempDir::new().unwrap();
    let output = ondina_bin()
        .args([
            "process",
            dir.path().join("missing.wav").to_str().unwrap(),
            dir.path().join("out.wav").to_str().unwrap(),
            "--effect",
            "tremolo",
        ])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn cli_presets_export_then_process() {
    let dir = TempDir::new().unwrap();
    let preset_path = dir.path().join("swirl.toml");

    let output = ondina_bin()
        .args(["presets", "export", "slow_swirl", preset_path.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(preset_path.exists());

    // A second export without --force refuses to overwrite.
    let again = ondina_bin()
        .args(["presets", "export", "slow_swirl", preset_path.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(!again.status.success());

    let input = dir.path().join("in.wav");
    let output_path = dir.path().join("out.wav");
    write_sine(&input, 1, 2400);
    let output = ondina_bin()
        .args([
            "process",
            input.to_str().unwrap(),
            output_path.to_str().unwrap(),
            "--preset",
            preset_path.to_str().unwrap(),
            "--channels",
            "1",
            "--quiet",
        ])
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "process failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(read_spec_and_len(&output_path).0.channels, 1);
}

#[test]
fn cli_presets_show_prints_toml() {
    let output = ondina_bin().args(["presets", "show", "shimmer"]).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("effect = \"tremolo\""));
    assert!(stdout.contains("[params]"));
}
