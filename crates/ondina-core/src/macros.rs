//! Declarative [`ParameterInfo`](crate::ParameterInfo) implementations.

/// Implement [`ParameterInfo`](crate::ParameterInfo) from an indexed table.
///
/// Each entry gives the descriptor, a getter expression and a setter. The
/// binding after the type name (`this` below) names `self` inside the getter
/// and setter expressions.
///
/// ```rust
/// use ondina_core::{ParamDescriptor, ParameterInfo, impl_params};
///
/// struct Gate {
///     on: bool,
///     depth: f32,
/// }
///
/// impl_params! {
///     Gate, this {
///         [0] ParamDescriptor::toggle("On", "On", true).with_id("on"),
///             get: if this.on { 1.0 } else { 0.0 },
///             set: |v| this.on = v >= 0.5;
///
///         [1] ParamDescriptor::percent("Depth", "Depth", 50.0).with_id("depth"),
///             get: this.depth,
///             set: |v| this.depth = v.clamp(0.0, 100.0);
///     }
/// }
///
/// let mut gate = Gate { on: true, depth: 50.0 };
/// assert_eq!(gate.param_count(), 2);
/// gate.set_param(1, 300.0);
/// assert_eq!(gate.get_param(1), 100.0);
/// assert_eq!(gate.get_param(7), 0.0);
/// ```
///
/// Generic types list their parameters first:
/// `impl_params! { impl<C: Cascade> Phaser<C>, this { ... } }`.
#[macro_export]
macro_rules! impl_params {
    (
        @body $this:ident {
            $(
                [$idx:literal] $desc:expr,
                    get: $get:expr,
                    set: |$v:ident| $set:expr;
            )+
        }
    ) => {
        fn param_count(&self) -> usize {
            [$($idx),+].len()
        }

        fn param_info(&self, index: usize) -> Option<$crate::ParamDescriptor> {
            match index {
                $($idx => Some($desc),)+
                _ => None,
            }
        }

        fn get_param(&self, index: usize) -> f32 {
            let $this = self;
            match index {
                $($idx => $get,)+
                _ => 0.0,
            }
        }

        fn set_param(&mut self, index: usize, value: f32) {
            let $this = self;
            match index {
                $($idx => {
                    let $v = value;
                    $set;
                })+
                _ => {}
            }
        }
    };
    (
        impl<$($gen:ident: $bound:path),+> $ty:ty, $this:ident {
            $(
                [$idx:literal] $desc:expr,
                    get: $get:expr,
                    set: |$v:ident| $set:expr;
            )+
        }
    ) => {
        impl<$($gen: $bound),+> $crate::ParameterInfo for $ty {
            $crate::impl_params!(@body $this { $([$idx] $desc, get: $get, set: |$v| $set;)+ });
        }
    };
    (
        $ty:ty, $this:ident {
            $(
                [$idx:literal] $desc:expr,
                    get: $get:expr,
                    set: |$v:ident| $set:expr;
            )+
        }
    ) => {
        impl $crate::ParameterInfo for $ty {
            $crate::impl_params!(@body $this { $([$idx] $desc, get: $get, set: |$v| $set;)+ });
        }
    };
}
