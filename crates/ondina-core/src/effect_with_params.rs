//! Combined `Effect` + `ParameterInfo` trait for boxed effects.
//!
//! [`EffectWithParams`] lets a host hold an engine as one trait object and
//! still reach its parameter surface. A blanket impl covers every concrete
//! type that implements both traits.

use crate::effect::Effect;
use crate::param_info::{ParamDescriptor, ParameterInfo};

/// Object-safe access to an effect and its parameters through one vtable.
pub trait EffectWithParams: Effect {
    /// Get the parameter count.
    fn effect_param_count(&self) -> usize;

    /// Get parameter info by index.
    fn effect_param_info(&self, index: usize) -> Option<ParamDescriptor>;

    /// Get parameter value by index.
    fn effect_get_param(&self, index: usize) -> f32;

    /// Set parameter value by index.
    fn effect_set_param(&mut self, index: usize, value: f32);

    /// Find a parameter index by its stable string id.
    fn effect_param_index(&self, string_id: &str) -> Option<usize>;
}

impl<T: Effect + ParameterInfo> EffectWithParams for T {
    fn effect_param_count(&self) -> usize {
        self.param_count()
    }

    fn effect_param_info(&self, index: usize) -> Option<ParamDescriptor> {
        self.param_info(index)
    }

    fn effect_get_param(&self, index: usize) -> f32 {
        self.get_param(index)
    }

    fn effect_set_param(&mut self, index: usize, value: f32) {
        self.set_param(index, value);
    }

    fn effect_param_index(&self, string_id: &str) -> Option<usize> {
        self.param_index_by_string_id(string_id)
    }
}
