use core::fmt::Debug;
use num_traits::Float;

/// Trait for the real floating-point types the crate evaluates in.
///
/// Blanket-implemented for all types satisfying the bounds, which in
/// practice means `f32` and `f64`.
pub trait FloatScalar: Float + Debug + Send + Sync + 'static {}

impl<T: Float + Debug + Send + Sync + 'static> FloatScalar for T {}
