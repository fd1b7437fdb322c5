//! Port layout and index resolution.
//!
//! Ports are numbered the same way for every descriptor: audio inputs first,
//! then audio outputs, then one control per effect parameter in parameter
//! order. A stereo tremolo therefore has ports `0..2` in, `2..4` out and
//! `4..11` controls.

use core::fmt;

use ondina_core::ParamDescriptor;

use crate::error::PortError;

/// What a port carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortKind {
    /// Audio read by the plugin.
    AudioInput,
    /// Audio written by the plugin.
    AudioOutput,
    /// A single parameter value.
    Control,
}

impl fmt::Display for PortKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PortKind::AudioInput => "audio input",
            PortKind::AudioOutput => "audio output",
            PortKind::Control => "control",
        })
    }
}

/// A resolved port: its kind plus the channel or parameter it addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortRef {
    /// Input buffer for a channel.
    AudioInput(usize),
    /// Output buffer for a channel.
    AudioOutput(usize),
    /// Parameter index on the effect.
    Control(usize),
}

impl PortRef {
    /// Kind of port this reference points at.
    pub const fn kind(self) -> PortKind {
        match self {
            PortRef::AudioInput(_) => PortKind::AudioInput,
            PortRef::AudioOutput(_) => PortKind::AudioOutput,
            PortRef::Control(_) => PortKind::Control,
        }
    }
}

/// Metadata for one port, as a host would list it.
#[derive(Debug, Clone, PartialEq)]
pub struct PortInfo {
    /// Port index.
    pub index: usize,
    /// Resolved target.
    pub port: PortRef,
    /// Stable symbol (`"in_l"`, `"rate"`, ...).
    pub symbol: String,
    /// Display name.
    pub name: String,
    /// Parameter descriptor for control ports.
    pub descriptor: Option<ParamDescriptor>,
}

/// The full port map of one plugin.
#[derive(Debug, Clone)]
pub struct PortLayout {
    channels: usize,
    controls: Vec<ParamDescriptor>,
}

impl PortLayout {
    /// Layout for `channels` audio channels and the given controls.
    pub fn new(channels: usize, controls: Vec<ParamDescriptor>) -> Self {
        Self { channels, controls }
    }

    /// Audio channels (inputs and outputs each).
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Number of control ports.
    pub fn control_count(&self) -> usize {
        self.controls.len()
    }

    /// Total number of ports.
    pub fn port_count(&self) -> usize {
        2 * self.channels + self.controls.len()
    }

    /// Index of the first control port.
    pub fn first_control(&self) -> usize {
        2 * self.channels
    }

    /// Map a port index to what it addresses.
    pub fn resolve(&self, index: usize) -> Result<PortRef, PortError> {
        let ch = self.channels;
        match index {
            i if i < ch => Ok(PortRef::AudioInput(i)),
            i if i < 2 * ch => Ok(PortRef::AudioOutput(i - ch)),
            i if i < self.port_count() => Ok(PortRef::Control(i - 2 * ch)),
            _ => Err(PortError::UnknownPort {
                index,
                count: self.port_count(),
            }),
        }
    }

    /// Resolve `index` and require it to be a control, returning the
    /// parameter index.
    pub fn resolve_control(&self, index: usize) -> Result<usize, PortError> {
        match self.resolve(index)? {
            PortRef::Control(param) => Ok(param),
            other => Err(PortError::WrongKind {
                index,
                expected: PortKind::Control,
                actual: other.kind(),
            }),
        }
    }

    /// Port index of the control with this string id.
    pub fn control_port(&self, string_id: &str) -> Option<usize> {
        self.controls
            .iter()
            .position(|d| d.string_id == string_id)
            .map(|param| self.first_control() + param)
    }

    /// Descriptor behind a control's parameter index.
    pub fn control_descriptor(&self, param: usize) -> Option<&ParamDescriptor> {
        self.controls.get(param)
    }

    /// Every port in index order.
    pub fn ports(&self) -> Vec<PortInfo> {
        (0..self.port_count())
            .filter_map(|index| self.resolve(index).ok().map(|port| self.info(index, port)))
            .collect()
    }

    fn info(&self, index: usize, port: PortRef) -> PortInfo {
        match port {
            PortRef::AudioInput(ch) => PortInfo {
                index,
                port,
                symbol: audio_symbol("in", ch, self.channels),
                name: audio_name("In", ch, self.channels),
                descriptor: None,
            },
            PortRef::AudioOutput(ch) => PortInfo {
                index,
                port,
                symbol: audio_symbol("out", ch, self.channels),
                name: audio_name("Out", ch, self.channels),
                descriptor: None,
            },
            PortRef::Control(param) => {
                let desc = self.controls[param];
                PortInfo {
                    index,
                    port,
                    symbol: desc.string_id.to_string(),
                    name: desc.name.to_string(),
                    descriptor: Some(desc),
                }
            }
        }
    }
}

fn audio_symbol(prefix: &str, ch: usize, channels: usize) -> String {
    match (channels, ch) {
        (1, _) => prefix.to_string(),
        (2, 0) => format!("{prefix}_l"),
        (2, 1) => format!("{prefix}_r"),
        _ => format!("{prefix}_{}", ch + 1),
    }
}

fn audio_name(prefix: &str, ch: usize, channels: usize) -> String {
    match (channels, ch) {
        (1, _) => prefix.to_string(),
        (2, 0) => format!("{prefix} L"),
        (2, 1) => format!("{prefix} R"),
        _ => format!("{prefix} {}", ch + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ondina_core::ParamDescriptor;

    fn layout(channels: usize) -> PortLayout {
        PortLayout::new(
            channels,
            vec![
                ParamDescriptor::hertz("Rate", "Rate", 0.1, 10.0, 4.0).with_id("rate"),
                ParamDescriptor::percent("Depth", "Depth", 100.0).with_id("depth"),
            ],
        )
    }

    #[test]
    fn stereo_numbering() {
        let l = layout(2);
        assert_eq!(l.port_count(), 6);
        assert_eq!(l.resolve(0), Ok(PortRef::AudioInput(0)));
        assert_eq!(l.resolve(1), Ok(PortRef::AudioInput(1)));
        assert_eq!(l.resolve(2), Ok(PortRef::AudioOutput(0)));
        assert_eq!(l.resolve(3), Ok(PortRef::AudioOutput(1)));
        assert_eq!(l.resolve(4), Ok(PortRef::Control(0)));
        assert_eq!(l.resolve(5), Ok(PortRef::Control(1)));
        assert_eq!(
            l.resolve(6),
            Err(PortError::UnknownPort { index: 6, count: 6 })
        );
    }

    #[test]
    fn mono_numbering() {
        let l = layout(1);
        assert_eq!(l.first_control(), 2);
        assert_eq!(l.resolve(1), Ok(PortRef::AudioOutput(0)));
        assert_eq!(l.control_port("depth"), Some(3));
        assert_eq!(l.control_port("missing"), None);
    }

    #[test]
    fn control_resolution_checks_kind() {
        let l = layout(2);
        assert_eq!(l.resolve_control(5), Ok(1));
        assert_eq!(
            l.resolve_control(2),
            Err(PortError::WrongKind {
                index: 2,
                expected: PortKind::Control,
                actual: PortKind::AudioOutput,
            })
        );
    }

    #[test]
    fn port_listing() {
        let ports = layout(2).ports();
        let symbols: Vec<_> = ports.iter().map(|p| p.symbol.as_str()).collect();
        assert_eq!(symbols, ["in_l", "in_r", "out_l", "out_r", "rate", "depth"]);
        assert!(ports[4].descriptor.is_some());
        assert!(ports[0].descriptor.is_none());

        let mono: Vec<_> = layout(1).ports().into_iter().map(|p| p.name).collect();
        assert_eq!(mono[..2], ["In".to_string(), "Out".to_string()]);
    }
}
