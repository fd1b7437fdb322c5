//! Ondina Core - click-free modulation primitives
//!
//! This crate provides the building blocks that let continuous and discrete
//! control changes reach an audio-rate signal path without clicks. Everything
//! here is allocation-free and safe to call from a real-time audio callback.
//!
//! # Core Abstractions
//!
//! ## Oscillation
//!
//! - [`PhaseAccumulator`] - Free-running normalized ramp
//! - [`triangle`] - Variable-duty triangle shaper (stateless)
//!
//! ## Smoothing
//!
//! - [`OnePoleSmoother`] - Exponential smoothing, used both for control values
//!   and as a signal-domain envelope follower
//! - [`LinearRamp`] - Fixed-duration linear interpolation ("inertia")
//!
//! ## Transitions
//!
//! - [`CrossfadeSwitcher`] - Fade-out / swap / fade-in for discrete state
//! - [`BypassCrossfade`] - Dry/processed blend for on/off toggling
//!
//! ## Effect System
//!
//! - [`Effect`] - Object-safe lifecycle trait for multichannel block processing
//! - [`ParameterInfo`] - Runtime parameter discovery
//! - [`EffectWithParams`] - Both of the above through one trait object
//! - [`impl_params!`] - Table-driven `ParameterInfo` implementations
//!
//! # no_std Support
//!
//! Disable the default `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! ondina-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Control Flow
//!
//! Once per block, parameters are read and smoother/ramp/switcher targets are
//! updated. Once per sample, each primitive advances and returns the value to
//! use for that sample:
//!
//! ```rust
//! use ondina_core::{CrossfadeSwitcher, LinearRamp};
//!
//! let mut feedback = LinearRamp::new(0.0, 48000.0, 10.0);
//! let mut stages = CrossfadeSwitcher::new(4usize, 48000.0, 50.0);
//!
//! // control rate
//! feedback.set_target(0.5);
//! stages.set(8);
//!
//! // audio rate
//! for _ in 0..256 {
//!     let fb = feedback.advance();
//!     let gain = stages.advance();
//!     let _active_stages = stages.state();
//!     assert!((0.0..=0.5).contains(&fb));
//!     assert!((0.0..=1.0).contains(&gain));
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

mod macros;

pub mod bypass;
pub mod effect;
pub mod effect_with_params;
pub mod gain;
pub mod math;
pub mod param_info;
pub mod phase;
pub mod ramp;
pub mod smoother;
pub mod switcher;
pub mod triangle;

// Re-export main types at crate root
pub use bypass::{BypassCrossfade, DEFAULT_BYPASS_MS};
pub use effect::{Effect, common_frames};
pub use effect_with_params::EffectWithParams;
pub use math::{
    db_to_linear, fade_samples, flush_denormal, linear_to_db, ms_to_samples, wet_dry_mix,
    wrap_unit,
};
pub use param_info::{ParamDescriptor, ParamFlags, ParamUnit, ParameterInfo};
pub use phase::PhaseAccumulator;
pub use ramp::{DEFAULT_RAMP_MS, LinearRamp};
pub use smoother::{CONTROL_RETENTION, MAX_TONE_COEFF, MIN_TONE_COEFF, OnePoleSmoother};
pub use switcher::{CrossfadeSwitcher, DEFAULT_SWITCH_MS, SwitchPhase};
pub use triangle::{MAX_DUTY, MIN_DUTY, triangle};
