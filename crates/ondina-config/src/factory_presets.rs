//! Factory presets bundled with the library.
//!
//! Embedded TOML, always available without files on disk. They double as
//! examples of the preset format.

use crate::Preset;

/// Array of factory preset names for external access.
pub static FACTORY_PRESET_NAMES: &[&str] = &[
    "init_tremolo",
    "init_phaser",
    "shimmer",
    "wide_throb",
    "slow_swirl",
    "jet",
    "mono_vibe",
];

static FACTORY_PRESETS_TOML: &[(&str, &str)] = &[
    ("init_tremolo", INIT_TREMOLO),
    ("init_phaser", INIT_PHASER),
    ("shimmer", SHIMMER),
    ("wide_throb", WIDE_THROB),
    ("slow_swirl", SLOW_SWIRL),
    ("jet", JET),
    ("mono_vibe", MONO_VIBE),
];

const INIT_TREMOLO: &str = r#"
name = "Init Tremolo"
description = "Harmonic tremolo at its defaults"
effect = "tremolo"
"#;

const INIT_PHASER: &str = r#"
name = "Init Phaser"
description = "Stereo phaser at its defaults"
effect = "phaser"
"#;

const SHIMMER: &str = r#"
name = "Shimmer"
description = "Fast, shallow band swap with a dark low band"
effect = "tremolo"

[params]
rate = 7.5
shape = 0.35
tone = 1800.0
depth = 60.0
"#;

const WIDE_THROB: &str = r#"
name = "Wide Throb"
description = "Slow full-depth tremolo with channels a quarter cycle apart"
effect = "tremolo"

[params]
rate = 2.0
shape = 0.5
tone = 900.0
phase = 90.0
depth = 100.0
"#;

const SLOW_SWIRL: &str = r#"
name = "Slow Swirl"
description = "Eight stages, slow sweep, moderate feedback"
effect = "phaser"

[params]
frequency = 800.0
rate = 0.2
depth = 6.0
feedback = 6.0
stages = 8
"#;

const JET: &str = r#"
name = "Jet"
description = "Twelve stages at maximum feedback with a very slow sweep"
effect = "phaser"

[params]
frequency = 1500.0
rate = 0.08
depth = 8.0
feedback = 10.0
stages = 12
stereo = 90.0
"#;

const MONO_VIBE: &str = r#"
name = "Mono Vibe"
description = "Four-stage mono phaser with a quick, shallow sweep"
effect = "phaser"
channels = 1

[params]
frequency = 600.0
rate = 4.5
depth = 2.5
feedback = 1.0
stages = 4
"#;

/// All factory presets, parsed.
///
/// Entries that fail to parse are skipped; the unit tests keep that list
/// empty.
pub fn factory_presets() -> Vec<Preset> {
    FACTORY_PRESETS_TOML
        .iter()
        .filter_map(|(_, toml)| Preset::from_toml(toml).ok())
        .collect()
}

/// Factory preset by name.
pub fn get_factory_preset(name: &str) -> Option<Preset> {
    FACTORY_PRESETS_TOML
        .iter()
        .find(|(n, _)| *n == name)
        .and_then(|(_, toml)| Preset::from_toml(toml).ok())
}

/// Whether `name` is a factory preset.
pub fn is_factory_preset(name: &str) -> bool {
    FACTORY_PRESET_NAMES.contains(&name)
}
