//! The incomplete gamma capability consumed by the Poisson tail functions.

use crate::FloatScalar;
use super::incgamma::{gamma_inc, gamma_inc_upper};
use super::incgamma_inv::gamma_inc_upper_inv;

/// Regularized incomplete gamma primitives.
///
/// Implementors own their numerical failure modes: each method returns a
/// plain value, NaN when nothing better can be produced.
pub trait IncompleteGamma<T> {
    /// Regularized lower incomplete gamma P(a, x), for a > 0 and x ≥ 0.
    fn lower(&self, a: T, x: T) -> T;
    /// Regularized upper incomplete gamma Q(a, x) = 1 − P(a, x).
    fn upper(&self, a: T, x: T) -> T;
    /// x ≥ 0 such that Q(a, x) = y, for a > 0 and y ∈ [0, 1).
    fn upper_inv(&self, a: T, y: T) -> T;
}

/// The crate's own series / continued-fraction implementation.
///
/// # Example
///
/// ```
/// use poisson_tail::special::{Builtin, IncompleteGamma};
///
/// let q = Builtin.upper(1.0_f64, 2.0);
/// assert!((q - (-2.0_f64).exp()).abs() < 1e-14);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Builtin;

impl<T: FloatScalar> IncompleteGamma<T> for Builtin {
    fn lower(&self, a: T, x: T) -> T {
        gamma_inc(a, x).unwrap_or(T::nan())
    }

    fn upper(&self, a: T, x: T) -> T {
        gamma_inc_upper(a, x).unwrap_or(T::nan())
    }

    fn upper_inv(&self, a: T, y: T) -> T {
        gamma_inc_upper_inv(a, y).unwrap_or(T::nan())
    }
}

impl<T, G: IncompleteGamma<T> + ?Sized> IncompleteGamma<T> for &G {
    #[inline]
    fn lower(&self, a: T, x: T) -> T {
        (**self).lower(a, x)
    }

    #[inline]
    fn upper(&self, a: T, x: T) -> T {
        (**self).upper(a, x)
    }

    #[inline]
    fn upper_inv(&self, a: T, y: T) -> T {
        (**self).upper_inv(a, y)
    }
}
