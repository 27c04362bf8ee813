//! Poisson cumulative distribution, its complement, and its inverse in the rate.
//!
//! None of these sum Poisson terms. Each reduces to a single regularized
//! incomplete gamma evaluation through
//!
//! ```text
//!   k          j
//!   Σ  e^{−m} m  / j!  =  Q(k + 1, m)        (pdtr)
//!  j=0
//!
//!   ∞          j
//!   Σ  e^{−m} m  / j!  =  P(k + 1, m)        (pdtrc)
//! j=k+1
//! ```
//!
//! The shape is k + 1, not k: Γ(k + 1) = k! is what ties the j = 0..=k sum to
//! the gamma integral. The inverse in the rate follows as m = Q⁻¹(k + 1, y).
//!
//! # Domain errors
//!
//! Out-of-domain arguments never panic and never short-circuit through
//! `Result`. The returned value is NaN, and a [`Diagnostic`] is both attached
//! to the [`Evaluation`] and handed to the configured [`DiagnosticSink`].
//!
//! | Operation | Domain |
//! |---|---|
//! | [`pdtr`], [`pdtrc`] | k ≥ 0, m ≥ 0 |
//! | [`pdtri`] | k ≥ 0, 0 ≤ y < 1 |
//!
//! NaN arguments are not domain errors; they propagate to a NaN result.
//!
//! # Example
//!
//! ```
//! use poisson_tail::{pdtr, pdtrc, pdtri};
//!
//! // P(X ≤ 0) for X ~ Poisson(1) is e^{−1}
//! let p = pdtr(0.0_f64, 1.0);
//! assert!((p - (-1.0_f64).exp()).abs() < 1e-14);
//! assert!((pdtrc(0.0_f64, 1.0) - (1.0 - p)).abs() < 1e-14);
//!
//! // Rate giving P(X ≤ 3) = 0.5
//! let m = pdtri(3, 0.5_f64);
//! assert!((pdtr(3.0, m) - 0.5).abs() < 1e-12);
//!
//! assert!(pdtr(-1.0_f64, 5.0).is_nan());
//! ```

use crate::FloatScalar;
use crate::special::{Builtin, IncompleteGamma};

mod diagnostics;

#[cfg(all(test, feature = "std"))]
mod tests;

#[cfg(feature = "tracing")]
pub use diagnostics::TracingSink;
pub use diagnostics::{
    Argument, DefaultSink, Diagnostic, DiagnosticSink, ErrorKind, Operation, Silent,
};

/// Result of one evaluation: always a value, plus a diagnostic when the
/// arguments were rejected (in which case the value is NaN).
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation<T> {
    value: T,
    diagnostic: Option<Diagnostic>,
}

impl<T: Copy> Evaluation<T> {
    fn ok(value: T) -> Self {
        Self {
            value,
            diagnostic: None,
        }
    }

    /// The computed value, NaN on a domain error.
    #[inline]
    pub fn value(&self) -> T {
        self.value
    }

    /// The diagnostic raised by this call, if any.
    #[inline]
    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        self.diagnostic.as_ref()
    }

    pub fn is_domain_error(&self) -> bool {
        matches!(
            self.diagnostic,
            Some(Diagnostic {
                kind: ErrorKind::Domain,
                ..
            })
        )
    }

    /// Drop the sentinel and surface the diagnostic as an error.
    pub fn into_result(self) -> Result<T, Diagnostic> {
        match self.diagnostic {
            Some(d) => Err(d),
            None => Ok(self.value),
        }
    }
}

/// Poisson tail evaluator over injected incomplete gamma primitives.
///
/// `PoissonTail::new()` uses the crate's [`Builtin`] primitives and the
/// [`DefaultSink`]. Either can be swapped by value.
///
/// # Example
///
/// ```
/// use core::cell::Cell;
/// use poisson_tail::{Argument, Diagnostic, PoissonTail};
///
/// let rejected = Cell::new(None);
/// let tail = PoissonTail::new().with_sink(|d: &Diagnostic| rejected.set(Some(d.argument)));
///
/// let eval = tail.cdf(3.0_f64, -2.0);
/// assert!(eval.value().is_nan());
/// assert!(eval.is_domain_error());
/// assert_eq!(rejected.get(), Some(Argument::Rate));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PoissonTail<G = Builtin, S = DefaultSink> {
    gamma: G,
    sink: S,
}

impl PoissonTail {
    /// Evaluator with the built-in primitives and the default sink.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<G, S: DiagnosticSink> PoissonTail<G, S> {
    /// Replace the incomplete gamma primitives.
    pub fn with_primitives<H>(self, gamma: H) -> PoissonTail<H, S> {
        PoissonTail {
            gamma,
            sink: self.sink,
        }
    }

    /// Replace the diagnostic sink.
    pub fn with_sink<R: DiagnosticSink>(self, sink: R) -> PoissonTail<G, R> {
        PoissonTail {
            gamma: self.gamma,
            sink,
        }
    }

    pub fn primitives(&self) -> &G {
        &self.gamma
    }

    /// Cumulative distribution P(X ≤ k) for X ~ Poisson(m).
    ///
    /// A fractional `k` is floored. `m == 0` gives exactly 1.
    pub fn cdf<T: FloatScalar>(&self, k: T, m: T) -> Evaluation<T>
    where
        G: IncompleteGamma<T>,
    {
        if let Some(rejected) = self.check_count_rate(Operation::Pdtr, k, m) {
            return rejected;
        }
        if m == T::zero() {
            return Evaluation::ok(T::one());
        }
        // Floor first, then shift: P(X ≤ k) = Q(⌊k⌋ + 1, m)
        let v = k.floor() + T::one();
        Evaluation::ok(self.gamma.upper(v, m))
    }

    /// Complementary distribution P(X > k) for X ~ Poisson(m).
    ///
    /// Evaluated directly as P(⌊k⌋ + 1, m) rather than `1 − cdf`, so small
    /// upper tails keep their relative accuracy. `m == 0` gives exactly 0.
    pub fn ccdf<T: FloatScalar>(&self, k: T, m: T) -> Evaluation<T>
    where
        G: IncompleteGamma<T>,
    {
        if let Some(rejected) = self.check_count_rate(Operation::Pdtrc, k, m) {
            return rejected;
        }
        if m == T::zero() {
            return Evaluation::ok(T::zero());
        }
        let v = k.floor() + T::one();
        Evaluation::ok(self.gamma.lower(v, m))
    }

    /// Rate m such that P(X ≤ k) = y for X ~ Poisson(m).
    ///
    /// Requires `k ≥ 0` and `0 ≤ y < 1`. `y == 0` is passed through to the
    /// primitive, which places it at m = +∞.
    pub fn inverse_cdf<T: FloatScalar>(&self, k: i64, y: T) -> Evaluation<T>
    where
        G: IncompleteGamma<T>,
    {
        if k < 0 {
            return self.reject(Operation::Pdtri, Argument::Count);
        }
        if y < T::zero() || y >= T::one() {
            return self.reject(Operation::Pdtri, Argument::Probability);
        }
        let v = T::from(k).unwrap() + T::one();
        Evaluation::ok(self.gamma.upper_inv(v, y))
    }

    fn check_count_rate<T: FloatScalar>(&self, op: Operation, k: T, m: T) -> Option<Evaluation<T>> {
        if k < T::zero() {
            Some(self.reject(op, Argument::Count))
        } else if m < T::zero() {
            Some(self.reject(op, Argument::Rate))
        } else {
            None
        }
    }

    fn reject<T: FloatScalar>(&self, op: Operation, arg: Argument) -> Evaluation<T> {
        let diagnostic = Diagnostic::domain(op, arg);
        self.sink.report(&diagnostic);
        Evaluation {
            value: T::nan(),
            diagnostic: Some(diagnostic),
        }
    }
}

/// Poisson cumulative distribution P(X ≤ k), X ~ Poisson(m).
///
/// NaN if `k < 0` or `m < 0`. See [`PoissonTail::cdf`].
pub fn pdtr<T: FloatScalar>(k: T, m: T) -> T {
    PoissonTail::new().cdf(k, m).value()
}

/// Complemented Poisson distribution P(X > k), X ~ Poisson(m).
///
/// NaN if `k < 0` or `m < 0`. See [`PoissonTail::ccdf`].
pub fn pdtrc<T: FloatScalar>(k: T, m: T) -> T {
    PoissonTail::new().ccdf(k, m).value()
}

/// Inverse Poisson distribution: the rate m with P(X ≤ k) = y.
///
/// NaN if `k < 0`, `y < 0` or `y ≥ 1`. See [`PoissonTail::inverse_cdf`].
pub fn pdtri<T: FloatScalar>(k: i64, y: T) -> T {
    PoissonTail::new().inverse_cdf(k, y).value()
}
