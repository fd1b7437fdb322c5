//! Host-independent plugin layer for ondina effects.
//!
//! Wraps the engines in the lifecycle a plugin host drives: a static
//! descriptor table, a port map checked once per connection, and an instance
//! with `activate` / `run` / `deactivate` calls. No host ABI is bound here;
//! a format adapter only has to forward its callbacks.
//!
//! # Ports
//!
//! | Index | Port |
//! |-------|------|
//! | `0..channels` | audio inputs |
//! | `channels..2*channels` | audio outputs |
//! | `2*channels..` | one control per effect parameter, in parameter order |
//!
//! # Example
//!
//! ```rust
//! use ondina_plugin::PluginInstance;
//!
//! let mut plugin = PluginInstance::new("urn:ondina:phaser", 48000.0).unwrap();
//! plugin.set_control("stages", 8.0).unwrap();
//! plugin.activate();
//!
//! let input = vec![0.1f32; 1024];
//! let mut output = vec![0.0f32; 1024];
//! plugin.run(&[&input], &mut [&mut output], 1024).unwrap();
//! plugin.deactivate();
//! ```

mod controls;
mod descriptor;
mod error;
mod instance;
mod ports;

pub use controls::ControlValues;
pub use descriptor::{DESCRIPTORS, PluginDescriptor, descriptor, find_descriptor};
pub use error::{PluginError, PortError};
pub use instance::{MAX_CHANNELS, MAX_SAMPLE_RUN, PluginInstance};
pub use ports::{PortInfo, PortKind, PortLayout, PortRef};
