//! Effect lookup and factory.
//!
//! Presets, the CLI and the plugin table all name effects by a short id.
//! [`EffectKind`] maps that id to a constructor and exposes the parameter
//! descriptors without keeping an instance around.

use std::fmt;
use std::str::FromStr;

use ondina_core::{EffectWithParams, ParamDescriptor};
use ondina_effects::{HarmonicTremolo, Phaser};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Effects that presets can describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    /// [`HarmonicTremolo`].
    Tremolo,
    /// [`Phaser`] over the reference all-pass cascade.
    Phaser,
}

impl EffectKind {
    /// Every kind, in listing order.
    pub const ALL: [EffectKind; 2] = [EffectKind::Tremolo, EffectKind::Phaser];

    /// Stable id used in presets and on the command line.
    pub const fn id(self) -> &'static str {
        match self {
            EffectKind::Tremolo => "tremolo",
            EffectKind::Phaser => "phaser",
        }
    }

    /// Display name.
    pub const fn name(self) -> &'static str {
        match self {
            EffectKind::Tremolo => "Harmonic Tremolo",
            EffectKind::Phaser => "Phaser",
        }
    }

    /// One-line description.
    pub const fn description(self) -> &'static str {
        match self {
            EffectKind::Tremolo => {
                "Crossfades low and high bands with a triangle LFO for a phaser-like swirl"
            }
            EffectKind::Phaser => {
                "Swept all-pass cascade with click-free feedback, stage and bypass changes"
            }
        }
    }

    /// Look a kind up by id (case-insensitive).
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.id().eq_ignore_ascii_case(id.trim()))
    }

    /// Construct an engine for `channels` channels.
    pub fn create(self, channels: usize, sample_rate: f32) -> Box<dyn EffectWithParams + Send> {
        match self {
            EffectKind::Tremolo => Box::new(HarmonicTremolo::new(channels, sample_rate)),
            EffectKind::Phaser => Box::new(Phaser::new(channels, sample_rate)),
        }
    }

    /// Parameter descriptors in index order.
    pub fn param_descriptors(self) -> Vec<ParamDescriptor> {
        let effect = self.create(1, 48000.0);
        (0..effect.effect_param_count())
            .filter_map(|i| effect.effect_param_info(i))
            .collect()
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for EffectKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s).ok_or_else(|| ConfigError::UnknownEffect(s.to_string()))
    }
}
