//! Control port storage shared between the host and the audio thread.
//!
//! Values are stored as `f32` bit patterns in `AtomicU32` so a host thread
//! can write while the audio thread reads once per slice. Reads are relaxed:
//! every control passes through a smoother or ramp inside the engine, so a
//! stale read costs at most one slice of extra latency.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use ondina_core::ParamDescriptor;

/// Cloneable handle to an instance's control values.
#[derive(Debug, Clone)]
pub struct ControlValues {
    values: Arc<[AtomicU32]>,
}

impl ControlValues {
    /// One slot per descriptor, initialized to its default.
    pub fn from_descriptors(descriptors: &[ParamDescriptor]) -> Self {
        Self {
            values: descriptors
                .iter()
                .map(|d| AtomicU32::new(d.default.to_bits()))
                .collect(),
        }
    }

    /// Number of controls.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when there are no controls.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Current value of control `param`, if it exists.
    pub fn get(&self, param: usize) -> Option<f32> {
        self.values
            .get(param)
            .map(|v| f32::from_bits(v.load(Ordering::Relaxed)))
    }

    /// Store a value. Out-of-range indices are ignored.
    ///
    /// The value is stored as given; the engine clamps it when applied.
    pub fn set(&self, param: usize, value: f32) {
        if let Some(slot) = self.values.get(param) {
            slot.store(value.to_bits(), Ordering::Relaxed);
        }
    }

    /// Iterate `(param, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(i, v)| (i, f32::from_bits(v.load(Ordering::Relaxed))))
    }
}
