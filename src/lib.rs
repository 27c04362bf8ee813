//! # poisson-tail
//!
//! Poisson cumulative distribution, complementary distribution, and the
//! inverse of the cumulative distribution in the rate, evaluated through the
//! regularized incomplete gamma function instead of summing Poisson terms.
//! no-std compatible, no heap allocation.
//!
//! ## Quick start
//!
//! ```
//! use poisson_tail::{pdtr, pdtrc, pdtri};
//!
//! // P(X ≤ 2) and P(X > 2) for X ~ Poisson(3.5)
//! let lower = pdtr(2.0_f64, 3.5);
//! let upper = pdtrc(2.0_f64, 3.5);
//! assert!((lower + upper - 1.0).abs() < 1e-14);
//!
//! // Recover the rate from the probability
//! let m = pdtri(2, lower);
//! assert!((m - 3.5).abs() < 1e-10);
//! ```
//!
//! ## Modules
//!
//! - [`poisson`] — [`pdtr`], [`pdtrc`], [`pdtri`] and the configurable
//!   [`PoissonTail`] evaluator. Out-of-domain arguments return NaN together
//!   with a [`Diagnostic`] delivered through the returned [`Evaluation`] and
//!   a [`DiagnosticSink`].
//!
//! - [`special`] — log-gamma, regularized incomplete gamma P(a,x) / Q(a,x),
//!   the inverse of Q in x, and erfc. [`special::Builtin`] exposes them through the
//!   [`special::IncompleteGamma`] trait that [`PoissonTail`] is generic over,
//!   so other implementations (or test stubs) can be injected.
//!
//! - [`traits`] — [`FloatScalar`], the element bound (`f32`, `f64`).
//!
//! ## Cargo features
//!
//! | Feature   | Default  | Description |
//! |-----------|----------|-------------|
//! | `std`     | yes      | Hardware FPU via system libm, `std::error::Error` impls |
//! | `tracing` | yes      | [`TracingSink`] becomes the default diagnostic sink |
//! | `libm`    | no       | Pure-Rust float math for `no_std` targets |
//! | `all`     | no       | All features: `std` + `tracing` |
//!
//! Without `std`, enable `libm`:
//! `default-features = false, features = ["libm"]`.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("poisson-tail needs float math: enable the `std` or the `libm` feature");

pub mod poisson;
pub mod special;
pub mod traits;

pub use poisson::{
    pdtr, pdtrc, pdtri, Argument, DefaultSink, Diagnostic, DiagnosticSink, ErrorKind,
    Evaluation, Operation, PoissonTail, Silent,
};
#[cfg(feature = "tracing")]
pub use poisson::TracingSink;
pub use traits::FloatScalar;
