//! Plugin instance lifecycle.
//!
//! `new` → `set_sample_rate` (optional) → `activate` → `run`* → `deactivate`,
//! with drop standing in for destroy. Control ports may be written at any
//! time; they are applied to the engine at the start of every slice.

use ondina_core::{Effect, EffectWithParams};
use tracing::{debug, info, warn};

use crate::controls::ControlValues;
use crate::descriptor::{PluginDescriptor, find_descriptor};
use crate::error::{PluginError, PortError};
use crate::ports::PortLayout;

/// Longest slice handed to the engine in one call.
///
/// Longer runs are subdivided so controls are re-read at least this often.
pub const MAX_SAMPLE_RUN: usize = 256;

/// Most audio channels any descriptor declares.
pub const MAX_CHANNELS: usize = 2;

/// A running plugin: one engine plus its control ports.
pub struct PluginInstance {
    descriptor: &'static PluginDescriptor,
    layout: PortLayout,
    effect: Box<dyn EffectWithParams + Send>,
    controls: ControlValues,
    sample_rate: f32,
    active: bool,
}

impl PluginInstance {
    /// Instantiate the plugin published under `uri`.
    pub fn new(uri: &str, sample_rate: f64) -> Result<Self, PluginError> {
        let Some(descriptor) = find_descriptor(uri) else {
            warn!(uri, "unknown plugin URI");
            return Err(PluginError::UnknownUri(uri.to_string()));
        };
        Self::with_descriptor(descriptor, sample_rate)
    }

    /// Instantiate from a descriptor table entry.
    pub fn with_descriptor(
        descriptor: &'static PluginDescriptor,
        sample_rate: f64,
    ) -> Result<Self, PluginError> {
        let sample_rate = checked_sample_rate(sample_rate)?;
        let controls = descriptor.controls();
        let values = ControlValues::from_descriptors(&controls);
        let layout = PortLayout::new(descriptor.channels, controls);

        info!(
            uri = descriptor.uri,
            channels = descriptor.channels,
            ports = layout.port_count(),
            sample_rate,
            "plugin instantiated"
        );

        Ok(Self {
            descriptor,
            layout,
            effect: descriptor.create_effect(sample_rate),
            controls: values,
            sample_rate,
            active: false,
        })
    }

    /// Descriptor this instance was created from.
    pub fn descriptor(&self) -> &'static PluginDescriptor {
        self.descriptor
    }

    /// Port map.
    pub fn layout(&self) -> &PortLayout {
        &self.layout
    }

    /// Current sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Whether `activate` has been called without a matching `deactivate`.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Change the sample rate. Time constants are recomputed; state is kept.
    pub fn set_sample_rate(&mut self, sample_rate: f64) -> Result<(), PluginError> {
        let sample_rate = checked_sample_rate(sample_rate)?;
        self.sample_rate = sample_rate;
        self.effect.set_sample_rate(sample_rate);
        debug!(uri = self.descriptor.uri, sample_rate, "sample rate changed");
        Ok(())
    }

    /// Write a control port.
    ///
    /// The port index is checked against the layout; audio ports and
    /// out-of-range indices are rejected.
    pub fn connect_control(&mut self, port: usize, value: f32) -> Result<(), PortError> {
        let param = self.layout.resolve_control(port).inspect_err(|e| {
            warn!(uri = self.descriptor.uri, port, error = %e, "control connection rejected");
        })?;
        self.controls.set(param, value);
        Ok(())
    }

    /// Write a control port by parameter string id.
    pub fn set_control(&mut self, string_id: &str, value: f32) -> Result<(), PortError> {
        let port = self
            .layout
            .control_port(string_id)
            .unwrap_or(self.layout.port_count());
        self.connect_control(port, value)
    }

    /// Last value written to a control port.
    pub fn control(&self, port: usize) -> Result<f32, PortError> {
        let param = self.layout.resolve_control(port)?;
        Ok(self.controls.get(param).unwrap_or_default())
    }

    /// Handle for writing controls from another thread.
    pub fn control_values(&self) -> ControlValues {
        self.controls.clone()
    }

    /// Engine behind the instance.
    pub fn effect(&self) -> &dyn EffectWithParams {
        &*self.effect
    }

    /// Apply the current controls, then clear the engine's state.
    pub fn activate(&mut self) {
        self.apply_controls();
        self.effect.activate();
        self.active = true;
        info!(uri = self.descriptor.uri, "plugin activated");
    }

    /// Process `frames` frames.
    ///
    /// `inputs` and `outputs` hold one buffer per channel, each at least
    /// `frames` long. The run is cut into slices of at most
    /// [`MAX_SAMPLE_RUN`] frames and controls are applied before each slice.
    pub fn run(
        &mut self,
        inputs: &[&[f32]],
        outputs: &mut [&mut [f32]],
        frames: usize,
    ) -> Result<(), PluginError> {
        if !self.active {
            warn!(uri = self.descriptor.uri, "run before activate");
            return Err(PluginError::NotActive);
        }
        self.check_buffers(inputs, outputs, frames).inspect_err(|e| {
            warn!(uri = self.descriptor.uri, error = %e, "run rejected");
        })?;

        let channels = self.layout.channels();
        let mut start = 0;
        while start < frames {
            let end = (start + MAX_SAMPLE_RUN).min(frames);
            self.apply_controls();

            let empty: &[f32] = &[];
            let mut ins = [empty; MAX_CHANNELS];
            for (slot, input) in ins.iter_mut().zip(inputs) {
                *slot = &input[start..end];
            }
            let mut outs: [&mut [f32]; MAX_CHANNELS] = Default::default();
            for (slot, output) in outs.iter_mut().zip(outputs.iter_mut()) {
                *slot = &mut output[start..end];
            }

            self.effect
                .process(&ins[..channels], &mut outs[..channels], end - start);
            start = end;
        }
        Ok(())
    }

    /// Stop processing. `activate` must be called before the next `run`.
    pub fn deactivate(&mut self) {
        self.effect.deactivate();
        self.active = false;
        info!(uri = self.descriptor.uri, "plugin deactivated");
    }

    fn apply_controls(&mut self) {
        for (param, value) in self.controls.iter() {
            self.effect.effect_set_param(param, value);
        }
    }

    fn check_buffers(
        &self,
        inputs: &[&[f32]],
        outputs: &[&mut [f32]],
        frames: usize,
    ) -> Result<(), PortError> {
        let channels = self.layout.channels();
        if inputs.len() != channels || outputs.len() != channels {
            return Err(PortError::ChannelMismatch {
                expected: channels,
                inputs: inputs.len(),
                outputs: outputs.len(),
            });
        }

        let lens = inputs
            .iter()
            .map(|b| b.len())
            .chain(outputs.iter().map(|b| b.len()));
        for (index, len) in lens.enumerate() {
            if len < frames {
                return Err(PortError::BufferTooShort { index, len, frames });
            }
        }
        Ok(())
    }
}

impl Drop for PluginInstance {
    fn drop(&mut self) {
        if self.active {
            self.deactivate();
        }
        debug!(uri = self.descriptor.uri, "plugin destroyed");
    }
}

impl core::fmt::Debug for PluginInstance {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PluginInstance")
            .field("uri", &self.descriptor.uri)
            .field("sample_rate", &self.sample_rate)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

fn checked_sample_rate(sample_rate: f64) -> Result<f32, PluginError> {
    if sample_rate.is_finite() && sample_rate > 0.0 {
        Ok(sample_rate as f32)
    } else {
        Err(PluginError::InvalidSampleRate(sample_rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_uri() {
        assert_eq!(
            PluginInstance::new("urn:ondina:nope", 48000.0).unwrap_err(),
            PluginError::UnknownUri("urn:ondina:nope".into())
        );
    }

    #[test]
    fn invalid_sample_rate() {
        assert!(matches!(
            PluginInstance::new("urn:ondina:phaser", 0.0),
            Err(PluginError::InvalidSampleRate(_))
        ));
        let mut p = PluginInstance::new("urn:ondina:phaser", 48000.0).unwrap();
        assert!(p.set_sample_rate(f64::NAN).is_err());
        assert!(p.set_sample_rate(96000.0).is_ok());
        assert_eq!(p.sample_rate(), 96000.0);
    }

    #[test]
    fn controls_start_at_defaults() {
        let p = PluginInstance::new("urn:ondina:harmonic-tremolo", 48000.0).unwrap();
        let rate_port = p.layout().control_port("rate").unwrap();
        assert_eq!(rate_port, 6);
        assert_eq!(p.control(rate_port), Ok(4.0));
    }

    #[test]
    fn control_connection_is_validated() {
        let mut p = PluginInstance::new("urn:ondina:harmonic-tremolo", 48000.0).unwrap();
        assert!(matches!(
            p.connect_control(1, 0.5),
            Err(PortError::WrongKind { index: 1, .. })
        ));
        assert!(matches!(
            p.connect_control(11, 0.5),
            Err(PortError::UnknownPort { index: 11, count: 11 })
        ));
        assert!(p.set_control("missing", 1.0).is_err());
        p.set_control("depth", 40.0).unwrap();
        assert_eq!(p.control(10), Ok(40.0));
    }

    #[test]
    fn run_requires_activation() {
        let mut p = PluginInstance::new("urn:ondina:phaser", 48000.0).unwrap();
        let input = [0.0f32; 16];
        let mut output = [0.0f32; 16];
        assert_eq!(
            p.run(&[&input], &mut [&mut output], 16),
            Err(PluginError::NotActive)
        );
    }

    #[test]
    fn run_checks_buffers() {
        let mut p = PluginInstance::new("urn:ondina:phaser#stereo", 48000.0).unwrap();
        p.activate();
        let input = [0.0f32; 64];
        let mut left = [0.0f32; 64];
        let mut right = [0.0f32; 32];

        assert!(matches!(
            p.run(&[&input], &mut [&mut left, &mut right], 64),
            Err(PluginError::Port(PortError::ChannelMismatch { expected: 2, inputs: 1, outputs: 2 }))
        ));
        assert_eq!(
            p.run(&[&input, &input], &mut [&mut left, &mut right], 64),
            Err(PluginError::Port(PortError::BufferTooShort {
                index: 3,
                len: 32,
                frames: 64
            }))
        );
        assert!(p.run(&[&input, &input], &mut [&mut left, &mut right], 32).is_ok());
    }

    #[test]
    fn deactivate_and_reactivate() {
        let mut p = PluginInstance::new("urn:ondina:phaser", 44100.0).unwrap();
        p.activate();
        assert!(p.is_active());
        p.deactivate();
        assert!(!p.is_active());
        p.activate();
        let input = [0.25f32; 8];
        let mut output = [0.0f32; 8];
        assert!(p.run(&[&input], &mut [&mut output], 8).is_ok());
    }
}
