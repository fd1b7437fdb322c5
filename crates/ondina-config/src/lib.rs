//! Preset and validation layer for ondina effects.
//!
//! # Features
//!
//! - **Effect lookup**: [`EffectKind`] maps ids like `"phaser"` to engines
//! - **Presets**: load and save [`Preset`] TOML files, apply them to engines
//! - **Validation**: report unknown parameters and out-of-range values
//!   before the engine clamps them
//! - **Factory presets**: a small built-in set for both effects
//!
//! # Example
//!
//! ```rust,no_run
//! use ondina_config::{EffectKind, Preset};
//! use ondina_core::Effect;
//!
//! let preset = Preset::new("Swirl", EffectKind::Phaser)
//!     .with_description("Slow eight-stage sweep")
//!     .with_param("stages", 8.0)
//!     .with_param("rate", 0.2);
//! preset.save("swirl.toml").unwrap();
//!
//! let loaded = Preset::load("swirl.toml").unwrap();
//! let mut phaser = loaded.create_effect(Some(44100.0)).unwrap();
//! phaser.activate();
//! ```

mod effect_kind;
mod error;
mod preset;

/// Preset and parameter validation.
pub mod validation;

/// Factory presets bundled with the library.
pub mod factory_presets;

pub use effect_kind::EffectKind;
pub use error::ConfigError;
pub use factory_presets::{
    FACTORY_PRESET_NAMES, factory_presets, get_factory_preset, is_factory_preset,
};
pub use preset::Preset;
pub use validation::{
    ParamValidationInfo, ValidationError, ValidationResult, param_table, validate_param,
    validate_preset,
};
