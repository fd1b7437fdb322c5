//! File-based effect processing command.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use ondina_config::{EffectKind, Preset};
use ondina_core::{Effect, linear_to_db};
use tracing::{debug, info};

use super::common::{load_preset, parse_key_val};
use crate::wav::{WavSpec, read_wav, write_wav};

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Effect to apply (tremolo or phaser)
    #[arg(short, long, conflicts_with = "preset")]
    effect: Option<String>,

    /// Preset name or TOML file
    #[arg(short, long)]
    preset: Option<String>,

    /// Effect parameters, overriding the preset (e.g., "rate=2.5")
    #[arg(long, value_parser = parse_key_val, number_of_values = 1)]
    param: Vec<(String, String)>,

    /// Engine channel count (1 or 2). Defaults to the preset's, or the
    /// input's capped at 2.
    #[arg(long)]
    channels: Option<usize>,

    /// Processing block size
    #[arg(long, default_value = "512")]
    block_size: usize,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,

    /// Hide the progress bar
    #[arg(short, long)]
    quiet: bool,
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    anyhow::ensure!(args.block_size > 0, "block size must be at least 1");

    println!("Reading {}...", args.input.display());
    let (input, spec) = read_wav(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    anyhow::ensure!(!input.is_empty(), "input has no channels");
    let frames = input[0].len();
    let sample_rate = spec.sample_rate as f32;

    println!(
        "  {} frames, {} channel(s), {} Hz, {:.2}s",
        frames,
        spec.channels,
        spec.sample_rate,
        frames as f32 / sample_rate
    );

    let preset = resolve_preset(&args, input.len())?;
    let mut effect = preset
        .create_effect(Some(sample_rate))
        .context("configuring effect")?;
    effect.activate();
    let channels = effect.channels();

    info!(
        effect = %preset.effect,
        preset = %preset.name,
        channels,
        sample_rate,
        block_size = args.block_size,
        "processing"
    );
    println!("Processing with {} ({} channel(s))...", preset.effect.name(), channels);

    // Extra engine channels reuse the last input channel.
    let sources: Vec<&[f32]> = (0..channels)
        .map(|c| input[c.min(input.len() - 1)].as_slice())
        .collect();
    let mut output = vec![vec![0.0f32; frames]; channels];

    let pb = if args.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(frames as u64)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );

    for start in (0..frames).step_by(args.block_size) {
        let end = (start + args.block_size).min(frames);
        let ins: Vec<&[f32]> = sources.iter().map(|s| &s[start..end]).collect();
        let mut outs: Vec<&mut [f32]> = output.iter_mut().map(|o| &mut o[start..end]).collect();
        effect.process(&ins, &mut outs, end - start);
        pb.set_position(end as u64);
    }
    pb.finish_with_message("done");

    println!("\nStats:");
    println!(
        "  Input:  RMS {:.1} dB, Peak {:.1} dB",
        linear_to_db(rms(&input)),
        linear_to_db(peak(&input))
    );
    println!(
        "  Output: RMS {:.1} dB, Peak {:.1} dB",
        linear_to_db(rms(&output)),
        linear_to_db(peak(&output))
    );

    let out_spec = WavSpec {
        channels: channels as u16,
        sample_rate: spec.sample_rate,
        bits_per_sample: args.bit_depth,
    };
    println!("\nWriting {}...", args.output.display());
    write_wav(&args.output, &output, out_spec)
        .with_context(|| format!("writing {}", args.output.display()))?;
    println!("Done!");

    Ok(())
}

/// Build the preset to run from `--preset` or `--effect`, then apply
/// `--channels` and `--param` overrides.
fn resolve_preset(args: &ProcessArgs, input_channels: usize) -> anyhow::Result<Preset> {
    let mut preset = match (&args.preset, &args.effect) {
        (Some(name), _) => load_preset(name)?,
        (None, Some(id)) => {
            let kind: EffectKind = id.parse()?;
            Preset::new("command line", kind).with_channels(input_channels.min(2))
        }
        (None, None) => anyhow::bail!("No effect specified. Use --effect or --preset"),
    };

    if let Some(channels) = args.channels {
        preset.channels = channels;
    }

    for (key, value) in &args.param {
        let value: f32 = value
            .parse()
            .with_context(|| format!("parameter '{}': '{}' is not a number", key, value))?;
        debug!(param = %key, value, "override");
        preset.params.insert(key.clone(), value);
    }

    Ok(preset)
}

fn rms(channels: &[Vec<f32>]) -> f32 {
    let count: usize = channels.iter().map(Vec::len).sum();
    if count == 0 {
        return 0.0;
    }
    let sum: f32 = channels.iter().flatten().map(|s| s * s).sum();
    (sum / count as f32).sqrt()
}

fn peak(channels: &[Vec<f32>]) -> f32 {
    channels.iter().flatten().map(|s| s.abs()).fold(0.0, f32::max)
}
