//! Special mathematical functions backing the Poisson tail evaluations.
//!
//! Provides log-gamma, the regularized incomplete gamma functions, the
//! inverse of the upper one in its second argument, and the complementary
//! error function they lean on for large shapes. All functions are generic
//! over [`FloatScalar`](crate::FloatScalar) (f32/f64), no-std compatible, and stack-only.
//!
//! # Functions
//!
//! | Function | Description |
//! |----------|-------------|
//! | [`lgamma`] | Log-gamma ln Γ(x) |
//! | [`gamma_inc`] | Regularized lower incomplete gamma P(a,x) |
//! | [`gamma_inc_upper`] | Regularized upper incomplete gamma Q(a,x) = 1−P(a,x) |
//! | [`gamma_inc_upper_inv`] | x such that Q(a,x) = y |
//! | [`erfc`] | Complementary error function 1 − erf(x) |
//!
//! [`Builtin`] bundles the incomplete gamma functions behind the [`IncompleteGamma`] trait,
//! which is how [`PoissonTail`](crate::poisson::PoissonTail) consumes them.
//!
//! # Example
//!
//! ```
//! use poisson_tail::special::{gamma_inc, gamma_inc_upper, gamma_inc_upper_inv, lgamma};
//!
//! // ln Γ(1) = 0
//! assert!(lgamma(1.0_f64).abs() < 1e-14);
//!
//! // P(a,x) + Q(a,x) = 1
//! let p = gamma_inc(3.0_f64, 2.5).unwrap();
//! let q = gamma_inc_upper(3.0_f64, 2.5).unwrap();
//! assert!((p + q - 1.0).abs() < 1e-14);
//!
//! // Q⁻¹ undoes Q
//! let x = gamma_inc_upper_inv(3.0_f64, q).unwrap();
//! assert!((x - 2.5).abs() < 1e-10);
//! ```

use core::fmt;

mod erf_fn;
mod gamma_fn;
mod incgamma;
mod incgamma_inv;
mod primitives;
mod temme;


pub use erf_fn::erfc;
pub use gamma_fn::lgamma;
pub use incgamma::{gamma_inc, gamma_inc_upper};
pub use incgamma_inv::gamma_inc_upper_inv;
pub use primitives::{Builtin, IncompleteGamma};

/// Errors from special function evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialError {
    /// Series, continued fraction or root iteration did not converge within the iteration limit.
    ConvergenceFailure,
    /// Input outside the function's domain (e.g. a ≤ 0 or x < 0 for incomplete gamma).
    DomainError,
}

impl fmt::Display for SpecialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConvergenceFailure => write!(f, "series/continued fraction did not converge"),
            Self::DomainError => write!(f, "input outside function domain"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SpecialError {}
