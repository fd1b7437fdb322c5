//! Preset commands: list the factory set, show one as TOML, export one to a
//! file for editing.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Subcommand};
use ondina_config::{FACTORY_PRESET_NAMES, factory_presets, get_factory_preset};

use super::common::load_preset;

#[derive(Args)]
pub struct PresetsArgs {
    #[command(subcommand)]
    command: PresetsCommand,
}

#[derive(Subcommand)]
enum PresetsCommand {
    /// List factory presets
    List,

    /// Print a preset (factory name or file) as TOML
    Show {
        /// Preset name or path
        name: String,
    },

    /// Write a factory preset to a TOML file
    Export {
        /// Factory preset name
        name: String,

        /// Destination file
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn run(args: PresetsArgs) -> anyhow::Result<()> {
    match args.command {
        PresetsCommand::List => {
            list_presets();
            Ok(())
        }
        PresetsCommand::Show { name } => show_preset(&name),
        PresetsCommand::Export {
            name,
            output,
            force,
        } => export_preset(&name, &output, force),
    }
}

fn list_presets() {
    println!("Factory Presets:");
    println!("================");
    for (id, preset) in FACTORY_PRESET_NAMES.iter().zip(factory_presets()) {
        let desc = preset.description.as_deref().unwrap_or("");
        println!("  {:14} {:8} - {}", id, preset.effect.id(), desc);
    }
}

fn show_preset(name: &str) -> anyhow::Result<()> {
    let preset = load_preset(name)?;
    preset.validate()?;
    print!("{}", preset.to_toml()?);
    Ok(())
}

fn export_preset(name: &str, output: &Path, force: bool) -> anyhow::Result<()> {
    let preset = get_factory_preset(name)
        .with_context(|| format!("'{}' is not a factory preset", name))?;
    anyhow::ensure!(
        force || !output.exists(),
        "{} already exists (use --force to overwrite)",
        output.display()
    );
    preset.save(output)?;
    println!("Wrote {} to {}", preset.name, output.display());
    Ok(())
}
