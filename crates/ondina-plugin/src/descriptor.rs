//! Static plugin descriptor table.
//!
//! Three plugins are published: the stereo harmonic tremolo and the phaser
//! in mono and stereo. Hosts enumerate them by index or look them up by URI.

use ondina_config::EffectKind;
use ondina_core::{EffectWithParams, ParamDescriptor};

use crate::ports::PortLayout;

/// One published plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PluginDescriptor {
    /// Stable identifier.
    pub uri: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Engine behind the plugin.
    pub effect: EffectKind,
    /// Audio channels (inputs and outputs each).
    pub channels: usize,
}

/// Every plugin, in enumeration order.
pub static DESCRIPTORS: [PluginDescriptor; 3] = [
    PluginDescriptor {
        uri: "urn:ondina:harmonic-tremolo",
        name: "Ondina Harmonic Tremolo",
        effect: EffectKind::Tremolo,
        channels: 2,
    },
    PluginDescriptor {
        uri: "urn:ondina:phaser",
        name: "Ondina Phaser",
        effect: EffectKind::Phaser,
        channels: 1,
    },
    PluginDescriptor {
        uri: "urn:ondina:phaser#stereo",
        name: "Ondina Phaser (Stereo)",
        effect: EffectKind::Phaser,
        channels: 2,
    },
];

/// Descriptor at `index`, or `None` past the end of the table.
pub fn descriptor(index: usize) -> Option<&'static PluginDescriptor> {
    DESCRIPTORS.get(index)
}

/// Descriptor with this URI.
pub fn find_descriptor(uri: &str) -> Option<&'static PluginDescriptor> {
    DESCRIPTORS.iter().find(|d| d.uri == uri)
}

impl PluginDescriptor {
    /// Build the engine for this plugin.
    pub fn create_effect(&self, sample_rate: f32) -> Box<dyn EffectWithParams + Send> {
        self.effect.create(self.channels, sample_rate)
    }

    /// Control descriptors in port order.
    pub fn controls(&self) -> Vec<ParamDescriptor> {
        self.effect.param_descriptors()
    }

    /// Port map for this plugin.
    pub fn port_layout(&self) -> PortLayout {
        PortLayout::new(self.channels, self.controls())
    }
}
