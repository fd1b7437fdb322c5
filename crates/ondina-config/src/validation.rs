//! Preset and parameter validation.
//!
//! Engines clamp whatever they are given, so nothing here is needed for
//! safety. Validation exists to tell a user that a preset file asks for
//! something the engine will not do, before the value is silently clamped.
//!
//! # Example
//!
//! ```rust
//! use ondina_config::{EffectKind, ValidationError, validate_param};
//!
//! assert_eq!(validate_param(EffectKind::Phaser, "stages", 8.0), Ok(6));
//! assert!(matches!(
//!     validate_param(EffectKind::Phaser, "stages", 24.0),
//!     Err(ValidationError::OutOfRange { .. })
//! ));
//! ```

use thiserror::Error;

use crate::effect_kind::EffectKind;
use crate::preset::Preset;

/// Supported channel counts for presets.
pub const CHANNEL_RANGE: (usize, usize) = (1, 2);

/// Supported preset sample rates in Hz.
pub const SAMPLE_RATE_RANGE: (u32, u32) = (8000, 192_000);

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Unknown parameter id.
    #[error("unknown parameter '{param}' for effect '{effect}'")]
    UnknownParameter {
        /// Effect id.
        effect: String,
        /// The unrecognized parameter id.
        param: String,
    },

    /// Parameter value out of range.
    #[error("parameter '{param}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Parameter id.
        param: String,
        /// The value that was out of range.
        value: f32,
        /// Minimum allowed value.
        min: f32,
        /// Maximum allowed value.
        max: f32,
    },

    /// NaN or infinite parameter value.
    #[error("parameter '{param}' is not a finite number")]
    NotFinite {
        /// Parameter id.
        param: String,
    },

    /// Unsupported channel count.
    #[error("unsupported channel count {channels} (expected 1 or 2)")]
    InvalidChannels {
        /// Requested channel count.
        channels: usize,
    },

    /// Unsupported sample rate.
    #[error("unsupported sample rate {sample_rate} Hz")]
    InvalidSampleRate {
        /// Requested sample rate.
        sample_rate: u32,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validation view of one parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamValidationInfo {
    /// Stable string id.
    pub id: &'static str,
    /// Parameter index in the effect.
    pub index: usize,
    /// Minimum value.
    pub min: f32,
    /// Maximum value.
    pub max: f32,
    /// Default value.
    pub default: f32,
    /// Integer-valued parameter.
    pub stepped: bool,
}

/// Parameter table for an effect, in index order.
pub fn param_table(kind: EffectKind) -> Vec<ParamValidationInfo> {
    kind.param_descriptors()
        .into_iter()
        .enumerate()
        .map(|(index, desc)| ParamValidationInfo {
            id: desc.string_id,
            index,
            min: desc.min,
            max: desc.max,
            default: desc.default,
            stepped: desc.is_stepped(),
        })
        .collect()
}

/// Check one parameter value and return its index.
pub fn validate_param(kind: EffectKind, id: &str, value: f32) -> ValidationResult<usize> {
    let table = param_table(kind);
    let param = table
        .iter()
        .find(|p| p.id == id)
        .ok_or_else(|| ValidationError::UnknownParameter {
            effect: kind.id().to_string(),
            param: id.to_string(),
        })?;

    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            param: id.to_string(),
        });
    }
    if value < param.min || value > param.max {
        return Err(ValidationError::OutOfRange {
            param: id.to_string(),
            value,
            min: param.min,
            max: param.max,
        });
    }
    Ok(param.index)
}

/// Check a whole preset, collecting every problem.
///
/// A single problem is returned as itself; several come back wrapped in
/// [`ValidationError::Multiple`].
pub fn validate_preset(preset: &Preset) -> ValidationResult<()> {
    let mut errors = Vec::new();

    if preset.channels < CHANNEL_RANGE.0 || preset.channels > CHANNEL_RANGE.1 {
        errors.push(ValidationError::InvalidChannels {
            channels: preset.channels,
        });
    }
    if preset.sample_rate < SAMPLE_RATE_RANGE.0 || preset.sample_rate > SAMPLE_RATE_RANGE.1 {
        errors.push(ValidationError::InvalidSampleRate {
            sample_rate: preset.sample_rate,
        });
    }
    for (id, &value) in &preset.params {
        if let Err(e) = validate_param(preset.effect, id, value) {
            errors.push(e);
        }
    }

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tremolo_table_matches_engine() {
        let table = param_table(EffectKind::Tremolo);
        let ids: Vec<_> = table.iter().map(|p| p.id).collect();
        assert_eq!(ids, ["on", "reset", "rate", "shape", "tone", "phase", "depth"]);
        let tone = &table[4];
        assert_eq!((tone.min, tone.max, tone.default), (500.0, 6000.0, 6000.0));
    }

    #[test]
    fn phaser_stages_are_stepped() {
        let table = param_table(EffectKind::Phaser);
        let stages = table.iter().find(|p| p.id == "stages").unwrap();
        assert!(stages.stepped);
        assert_eq!((stages.min, stages.max), (1.0, 12.0));
    }

    #[test]
    fn validate_param_cases() {
        assert_eq!(validate_param(EffectKind::Tremolo, "depth", 50.0), Ok(6));
        assert_eq!(
            validate_param(EffectKind::Tremolo, "feedback", 1.0),
            Err(ValidationError::UnknownParameter {
                effect: "tremolo".into(),
                param: "feedback".into(),
            })
        );
        assert_eq!(
            validate_param(EffectKind::Phaser, "rate", f32::NAN),
            Err(ValidationError::NotFinite { param: "rate".into() })
        );
        assert!(matches!(
            validate_param(EffectKind::Phaser, "feedback", 11.0),
            Err(ValidationError::OutOfRange { max, .. }) if max == 10.0
        ));
    }

    #[test]
    fn preset_errors_are_collected() {
        let preset = Preset::new("Broken", EffectKind::Phaser)
            .with_channels(6)
            .with_param("stages", 0.0)
            .with_param("mix", 0.5);
        match validate_preset(&preset) {
            Err(ValidationError::Multiple(errors)) => {
                assert_eq!(errors.len(), 3);
                assert!(errors.contains(&ValidationError::InvalidChannels { channels: 6 }));
            }
            other => panic!("expected multiple errors, got {other:?}"),
        }
    }

    #[test]
    fn single_error_is_not_wrapped() {
        let preset = Preset::new("Fast", EffectKind::Tremolo).with_param("rate", 40.0);
        assert!(matches!(
            validate_preset(&preset),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn valid_preset_passes() {
        let preset = Preset::new("Ok", EffectKind::Tremolo)
            .with_sample_rate(44100)
            .with_param("rate", 6.0)
            .with_param("phase", -90.0);
        assert_eq!(validate_preset(&preset), Ok(()));
    }
}
