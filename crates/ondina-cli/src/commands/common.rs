//! Shared CLI helpers used across multiple commands.

use std::path::Path;

use anyhow::Context;
use ondina_config::{Preset, get_factory_preset};
use ondina_core::ParamDescriptor;

/// Parse a `key=value` string for clap's `value_parser`.
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!(
            "Invalid parameter format: '{}' (expected key=value)",
            s
        )),
    }
}

/// Load a preset by factory name or file path.
pub fn load_preset(name: &str) -> anyhow::Result<Preset> {
    if let Some(preset) = get_factory_preset(name) {
        return Ok(preset);
    }

    let path = Path::new(name);
    if path.exists() {
        return Preset::load(path).with_context(|| format!("loading preset {}", path.display()));
    }

    anyhow::bail!(
        "Preset '{}' not found. Use 'ondina presets list' to see available presets.",
        name
    )
}

/// Format a parameter value with its unit.
pub fn format_value(desc: &ParamDescriptor, value: f32) -> String {
    if desc.is_stepped() {
        format!("{}{}", value.round(), desc.unit.suffix())
    } else {
        format!("{}{}", value, desc.unit.suffix())
    }
}
