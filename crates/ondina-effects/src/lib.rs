//! Ondina Effects - modulation engines built on ondina-core
//!
//! - [`HarmonicTremolo`] - Amplitude crossfade between low and high bands,
//!   mono or stereo with an inter-channel LFO offset
//! - [`Phaser`] - Click-free control layer around an [`AllpassCascade`]
//! - [`SimplePhaser`] - Reference all-pass cascade used by [`Phaser::new`]
//!
//! Both engines implement [`Effect`](ondina_core::Effect) and
//! [`ParameterInfo`](ondina_core::ParameterInfo), so they can be driven by
//! index or by stable string id.
//!
//! ## Example
//!
//! ```rust
//! use ondina_core::{Effect, ParameterInfo};
//! use ondina_effects::{HarmonicTremolo, Phaser};
//!
//! let mut tremolo = HarmonicTremolo::new(2, 48000.0);
//! let depth = tremolo.param_index_by_string_id("depth").unwrap();
//! tremolo.set_param(depth, 60.0);
//! tremolo.activate();
//!
//! let mut phaser = Phaser::new(2, 48000.0);
//! phaser.activate();
//!
//! let input = [0.1f32; 256];
//! let (mut l, mut r) = ([0.0f32; 256], [0.0f32; 256]);
//! tremolo.process(&[&input, &input], &mut [&mut l, &mut r], 256);
//! let (mut l2, mut r2) = ([0.0f32; 256], [0.0f32; 256]);
//! phaser.process(&[&l, &r], &mut [&mut l2, &mut r2], 256);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod cascade;
pub mod phaser;
pub mod tremolo;

// Re-export main types at crate root
pub use cascade::{AllpassCascade, MAX_STAGES, SimplePhaser};
pub use phaser::Phaser;
pub use tremolo::HarmonicTremolo;
