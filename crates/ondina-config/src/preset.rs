//! Preset file format and operations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use ondina_core::{Effect, EffectWithParams};

use crate::effect_kind::EffectKind;
use crate::error::ConfigError;
use crate::validation::{validate_param, validate_preset};

/// A saved effect setup: which engine, its channel layout and parameter values.
///
/// Parameters are keyed by their stable string id. Missing parameters keep
/// the engine's defaults.
///
/// # TOML Format
///
/// ```toml
/// name = "Slow Swirl"
/// description = "Eight stages, slow sweep"
/// effect = "phaser"
/// channels = 2
/// sample_rate = 48000
///
/// [params]
/// rate = 0.2
/// depth = 6.0
/// feedback = 6.0
/// stages = 8
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Preset {
    /// Name of the preset.
    pub name: String,

    /// Optional description of the preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Engine the preset is for.
    pub effect: EffectKind,

    /// Channel count (defaults to 2).
    #[serde(default = "default_channels")]
    pub channels: usize,

    /// Sample rate hint (defaults to 48000).
    /// Used when creating effects but may be overridden at runtime.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Parameter values by string id.
    #[serde(default)]
    pub params: BTreeMap<String, f32>,
}

fn default_channels() -> usize {
    2
}

fn default_sample_rate() -> u32 {
    48000
}

impl Preset {
    /// Create a stereo 48 kHz preset with no parameter overrides.
    pub fn new(name: impl Into<String>, effect: EffectKind) -> Self {
        Self {
            name: name.into(),
            description: None,
            effect,
            channels: default_channels(),
            sample_rate: default_sample_rate(),
            params: BTreeMap::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the channel count.
    pub fn with_channels(mut self, channels: usize) -> Self {
        self.channels = channels;
        self
    }

    /// Set the sample rate hint.
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Set a parameter by string id.
    pub fn with_param(mut self, id: impl Into<String>, value: f32) -> Self {
        self.params.insert(id.into(), value);
        self
    }

    /// Parameter value by string id, if the preset sets it.
    pub fn param(&self, id: &str) -> Option<f32> {
        self.params.get(id).copied()
    }

    /// Load a preset from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load a preset from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the preset to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the preset to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check channel count, sample rate and every parameter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_preset(self)?;
        Ok(())
    }

    /// Write the preset's parameters into `effect`.
    ///
    /// Every parameter is validated first; on error nothing is applied.
    pub fn apply(&self, effect: &mut dyn EffectWithParams) -> Result<(), ConfigError> {
        let resolved = self
            .params
            .iter()
            .map(|(id, &value)| validate_param(self.effect, id, value).map(|index| (index, value)))
            .collect::<Result<Vec<_>, _>>()?;

        for (index, value) in resolved {
            effect.effect_set_param(index, value);
        }
        Ok(())
    }

    /// Build and configure an engine from this preset.
    ///
    /// `sample_rate` overrides the preset's hint when given.
    pub fn create_effect(
        &self,
        sample_rate: Option<f32>,
    ) -> Result<Box<dyn EffectWithParams + Send>, ConfigError> {
        self.validate()?;
        let sample_rate = sample_rate.unwrap_or(self.sample_rate as f32);
        let mut effect = self.effect.create(self.channels, sample_rate);
        self.apply(effect.as_mut())?;
        Ok(effect)
    }

    /// Snapshot an engine's current parameter values.
    ///
    /// Trigger parameters such as `reset` are not stored.
    pub fn capture(
        name: impl Into<String>,
        kind: EffectKind,
        effect: &dyn EffectWithParams,
        sample_rate: u32,
    ) -> Self {
        let params = (0..effect.effect_param_count())
            .filter_map(|i| {
                let desc = effect.effect_param_info(i)?;
                (!desc.is_trigger())
                    .then(|| (desc.string_id.to_string(), effect.effect_get_param(i)))
            })
            .collect();

        Self {
            name: name.into(),
            description: None,
            effect: kind,
            channels: effect.channels(),
            sample_rate,
            params,
        }
    }
}
