//! Parameter introspection for discoverable effect parameters.
//!
//! This module provides the [`ParameterInfo`] trait and supporting types that
//! let hosts discover and drive an engine's control surface at runtime:
//!
//! - **Plugin adapters**: map control ports to parameter indices
//! - **Preset systems**: save and restore parameter state by stable string id
//! - **Command-line tools**: list parameters and parse `key=value` overrides
//!
//! # Design
//!
//! Parameters are accessed by zero-based index. Each one is described by a
//! [`ParamDescriptor`] carrying display metadata, the valid range, and a
//! stable `string_id` used for serialization. `set_param` clamps; it never
//! rejects, because values may arrive from an audio thread.
//!
//! # Example
//!
//! ```rust
//! use ondina_core::{ParameterInfo, ParamDescriptor};
//!
//! struct Level {
//!     depth: f32,
//! }
//!
//! impl ParameterInfo for Level {
//!     fn param_count(&self) -> usize { 1 }
//!
//!     fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
//!         match index {
//!             0 => Some(ParamDescriptor::percent("Depth", "Depth", 100.0).with_id("depth")),
//!             _ => None,
//!         }
//!     }
//!
//!     fn get_param(&self, index: usize) -> f32 {
//!         match index {
//!             0 => self.depth,
//!             _ => 0.0,
//!         }
//!     }
//!
//!     fn set_param(&mut self, index: usize, value: f32) {
//!         if index == 0 {
//!             self.depth = value.clamp(0.0, 100.0);
//!         }
//!     }
//! }
//!
//! let mut level = Level { depth: 0.0 };
//! let idx = level.param_index_by_string_id("depth").unwrap();
//! level.set_param(idx, 250.0);
//! assert_eq!(level.get_param(idx), 100.0);
//! ```

/// Parameter capability flags.
///
/// Use [`union`](Self::union) to combine.
///
/// ```rust
/// use ondina_core::ParamFlags;
///
/// let flags = ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED);
/// assert!(flags.contains(ParamFlags::STEPPED));
/// assert!(!flags.contains(ParamFlags::TRIGGER));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamFlags(u8);

impl ParamFlags {
    /// No flags set.
    pub const NONE: Self = Self(0);
    /// Host can automate this parameter (default for all params).
    pub const AUTOMATABLE: Self = Self(1 << 0);
    /// Parameter has discrete integer steps (toggles, stage counts).
    pub const STEPPED: Self = Self(1 << 1);
    /// Parameter is a momentary request rather than a persistent setting.
    ///
    /// Presets skip trigger parameters.
    pub const TRIGGER: Self = Self(1 << 2);

    /// Returns `true` if all bits in `other` are set in `self`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the union of two flag sets.
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl Default for ParamFlags {
    fn default() -> Self {
        Self::AUTOMATABLE
    }
}

/// Trait for effects that expose introspectable parameters.
///
/// # Parameter Indexing
///
/// Indices are stable for the lifetime of the effect instance and match the
/// order of control ports in the plugin layer. Use
/// [`param_count`](Self::param_count) to determine valid indices.
pub trait ParameterInfo {
    /// Returns the number of parameters this effect exposes.
    fn param_count(&self) -> usize;

    /// Returns the descriptor for the parameter at the given index.
    ///
    /// Returns `None` if `index >= param_count()`.
    fn param_info(&self, index: usize) -> Option<ParamDescriptor>;

    /// Gets the current (raw, unsmoothed) value of the parameter.
    ///
    /// Returns `0.0` for out-of-range indices.
    fn get_param(&self, index: usize) -> f32;

    /// Sets the value of the parameter at the given index.
    ///
    /// Implementations clamp to the descriptor's range. Out-of-range indices
    /// are ignored.
    fn set_param(&mut self, index: usize, value: f32);

    /// Find a parameter index by name (case-insensitive).
    ///
    /// Matches against both [`ParamDescriptor::name`] and
    /// [`ParamDescriptor::short_name`].
    fn find_param_by_name(&self, name: &str) -> Option<usize> {
        (0..self.param_count()).find(|&i| {
            self.param_info(i).is_some_and(|desc| {
                desc.name.eq_ignore_ascii_case(name) || desc.short_name.eq_ignore_ascii_case(name)
            })
        })
    }

    /// Find a parameter index by its stable string id.
    ///
    /// Scans all parameters (O(n)). Suitable for setup paths, not audio.
    fn param_index_by_string_id(&self, string_id: &str) -> Option<usize> {
        (0..self.param_count()).find(|&i| self.param_info(i).is_some_and(|d| d.string_id == string_id))
    }
}

/// Describes a single parameter's metadata for display and validation.
///
/// # Short Name
///
/// `short_name` should be 8 characters or less so it fits narrow host
/// displays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Full parameter name for display (e.g., "Stereo Phase").
    pub name: &'static str,

    /// Short name for narrow displays, max 8 characters.
    pub short_name: &'static str,

    /// Unit type for formatting the parameter value.
    pub unit: ParamUnit,

    /// Minimum allowed value.
    pub min: f32,

    /// Maximum allowed value.
    pub max: f32,

    /// Value at construction.
    pub default: f32,

    /// Recommended step increment for encoder-based control.
    pub step: f32,

    /// Human-readable stable ID for presets and command-line overrides.
    ///
    /// Convention: lowercase snake case (`"rate"`, `"stereo_phase"`).
    pub string_id: &'static str,

    /// Capability flags.
    pub flags: ParamFlags,
}

impl ParamDescriptor {
    /// Continuous parameter with a custom unit and range.
    pub const fn new(
        name: &'static str,
        short_name: &'static str,
        unit: ParamUnit,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            unit,
            min,
            max,
            default,
            step: 0.01,
            string_id: "",
            flags: ParamFlags::AUTOMATABLE,
        }
    }

    /// On/off switch (0 or 1).
    pub const fn toggle(name: &'static str, short_name: &'static str, default: bool) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::None,
            min: 0.0,
            max: 1.0,
            default: if default { 1.0 } else { 0.0 },
            step: 1.0,
            string_id: "",
            flags: ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED),
        }
    }

    /// Integer-valued parameter.
    pub const fn stepped(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::None,
            min,
            max,
            default,
            step: 1.0,
            string_id: "",
            flags: ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED),
        }
    }

    /// Percentage parameter, 0–100.
    pub const fn percent(name: &'static str, short_name: &'static str, default: f32) -> Self {
        Self {
            step: 1.0,
            ..Self::new(name, short_name, ParamUnit::Percent, 0.0, 100.0, default)
        }
    }

    /// Frequency parameter in Hz.
    pub const fn hertz(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self::new(name, short_name, ParamUnit::Hertz, min, max, default)
    }

    /// Phase offset in degrees.
    pub const fn degrees(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            step: 1.0,
            ..Self::new(name, short_name, ParamUnit::Degrees, min, max, default)
        }
    }

    /// Sets the stable string ID.
    ///
    /// ```rust
    /// use ondina_core::ParamDescriptor;
    ///
    /// let desc = ParamDescriptor::percent("Depth", "Depth", 100.0).with_id("depth");
    /// assert_eq!(desc.string_id, "depth");
    /// ```
    pub const fn with_id(mut self, string_id: &'static str) -> Self {
        self.string_id = string_id;
        self
    }

    /// Sets the parameter flags.
    pub const fn with_flags(mut self, flags: ParamFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Sets the encoder step.
    pub const fn with_step(mut self, step: f32) -> Self {
        self.step = step;
        self
    }

    /// True for discrete parameters.
    #[inline]
    pub const fn is_stepped(&self) -> bool {
        self.flags.contains(ParamFlags::STEPPED)
    }

    /// True for momentary request parameters.
    #[inline]
    pub const fn is_trigger(&self) -> bool {
        self.flags.contains(ParamFlags::TRIGGER)
    }

    /// True when `value` lies inside `min..=max`.
    #[inline]
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    /// Clamps a value to this parameter's valid range.
    ///
    /// NaN maps to the default, and stepped parameters are rounded to the
    /// nearest integer.
    ///
    /// ```rust
    /// use ondina_core::ParamDescriptor;
    ///
    /// let stages = ParamDescriptor::stepped("Stages", "Stages", 1.0, 12.0, 6.0);
    /// assert_eq!(stages.clamp(7.4), 7.0);
    /// assert_eq!(stages.clamp(40.0), 12.0);
    /// assert_eq!(stages.clamp(f32::NAN), 6.0);
    /// ```
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            return self.default;
        }
        let value = if self.is_stepped() {
            libm::roundf(value)
        } else {
            value
        };
        value.clamp(self.min, self.max)
    }

    /// Converts a plain value to normalized range (0.0 to 1.0).
    ///
    /// ```rust
    /// use ondina_core::ParamDescriptor;
    ///
    /// let desc = ParamDescriptor::percent("Depth", "Depth", 50.0);
    /// assert_eq!(desc.normalize(50.0), 0.5);
    /// ```
    #[inline]
    pub fn normalize(&self, value: f32) -> f32 {
        let range = self.max - self.min;
        if range == 0.0 {
            return 0.0;
        }
        ((value - self.min) / range).clamp(0.0, 1.0)
    }

    /// Converts a normalized value (0.0 to 1.0) to the parameter range.
    #[inline]
    pub fn denormalize(&self, normalized: f32) -> f32 {
        self.clamp(self.min + normalized.clamp(0.0, 1.0) * (self.max - self.min))
    }
}

/// Unit type for parameter display and formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamUnit {
    /// Decibels (dB).
    Decibels,

    /// Hertz (Hz) - sweep frequencies, LFO rates, tone cutoffs.
    Hertz,

    /// Percentage (%) - depth and mix amounts.
    Percent,

    /// Degrees (°) - stereo phase offsets.
    Degrees,

    /// No unit - toggles, stage counts, dimensionless amounts.
    None,
}

impl ParamUnit {
    /// Returns the unit suffix string for display.
    ///
    /// ```rust
    /// use ondina_core::ParamUnit;
    ///
    /// assert_eq!(ParamUnit::Hertz.suffix(), " Hz");
    /// assert_eq!(ParamUnit::None.suffix(), "");
    /// ```
    pub const fn suffix(&self) -> &'static str {
        match self {
            ParamUnit::Decibels => " dB",
            ParamUnit::Hertz => " Hz",
            ParamUnit::Percent => "%",
            ParamUnit::Degrees => "°",
            ParamUnit::None => "",
        }
    }
}
