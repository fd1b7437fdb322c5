//! Port and instance errors.

use thiserror::Error;

use crate::ports::PortKind;

/// Rejected port connection or run request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortError {
    /// Port index beyond the descriptor's layout.
    #[error("port {index} does not exist (plugin has {count} ports)")]
    UnknownPort {
        /// Requested index.
        index: usize,
        /// Ports in the layout.
        count: usize,
    },

    /// Port exists but is not of the requested kind.
    #[error("port {index} is {actual}, expected {expected}")]
    WrongKind {
        /// Requested index.
        index: usize,
        /// Kind the caller asked for.
        expected: PortKind,
        /// Kind of the port at that index.
        actual: PortKind,
    },

    /// Audio buffers handed to `run` do not match the layout.
    #[error(
        "plugin expects {expected} channels, got {inputs} inputs and {outputs} outputs"
    )]
    ChannelMismatch {
        /// Channels in the layout.
        expected: usize,
        /// Input buffers supplied.
        inputs: usize,
        /// Output buffers supplied.
        outputs: usize,
    },

    /// An audio buffer is shorter than the requested frame count.
    #[error("audio buffer for port {index} holds {len} frames, run asked for {frames}")]
    BufferTooShort {
        /// Port index of the short buffer.
        index: usize,
        /// Buffer length.
        len: usize,
        /// Requested frames.
        frames: usize,
    },
}

/// Instance creation and lifecycle errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PluginError {
    /// No descriptor carries this URI.
    #[error("unknown plugin URI: {0}")]
    UnknownUri(String),

    /// Sample rate is not a positive finite number.
    #[error("invalid sample rate: {0}")]
    InvalidSampleRate(f64),

    /// `run` called before `activate`.
    #[error("instance is not active")]
    NotActive,

    /// Port connection or buffer problem.
    #[error(transparent)]
    Port(#[from] PortError),
}
