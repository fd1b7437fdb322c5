//! Effect listing and information command.

#![allow(clippy::print_literal)] // Table headers use literal strings

use clap::Args;
use ondina_config::{EffectKind, factory_presets};

use super::common::format_value;

#[derive(Args)]
pub struct EffectsArgs {
    /// Show details for a specific effect
    #[arg(value_name = "EFFECT")]
    effect: Option<String>,
}

pub fn run(args: EffectsArgs) -> anyhow::Result<()> {
    match &args.effect {
        Some(id) => show_effect(id.parse()?),
        None => list_effects(),
    }
    Ok(())
}

fn list_effects() {
    println!("Available Effects");
    println!("=================");
    println!();
    for kind in EffectKind::ALL {
        println!("  {:10} - {}", kind.id(), kind.description());
    }
    println!();
    println!("Use 'ondina effects <name>' for detailed parameter info.");
}

fn show_effect(kind: EffectKind) {
    println!("{}", kind.name());
    println!("{}", "=".repeat(kind.name().len()));
    println!();
    println!("{}", kind.description());
    println!();

    println!("Parameters:");
    println!();
    println!("  {:10}  {:16}  {:10}  {}", "Id", "Name", "Default", "Range");
    println!("  {:10}  {:16}  {:10}  {}", "--", "----", "-------", "-----");
    for desc in kind.param_descriptors() {
        let range = format!(
            "{} .. {}",
            format_value(&desc, desc.min),
            format_value(&desc, desc.max)
        );
        println!(
            "  {:10}  {:16}  {:10}  {}",
            desc.string_id,
            desc.name,
            format_value(&desc, desc.default),
            range
        );
    }

    let presets: Vec<_> = factory_presets()
        .into_iter()
        .filter(|p| p.effect == kind)
        .collect();
    if !presets.is_empty() {
        println!();
        println!("Factory presets:");
        for preset in presets {
            println!(
                "  {:16} - {}",
                preset.name,
                preset.description.as_deref().unwrap_or("")
            );
        }
    }

    println!();
    println!("Example usage:");
    println!();
    println!(
        "  ondina process input.wav output.wav --effect {} --param rate=2",
        kind.id()
    );
}
