//! Domain-error diagnostics and the sinks that receive them.

use core::fmt;

/// The public operation that produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Cumulative distribution P(X ≤ k).
    Pdtr,
    /// Complementary cumulative distribution P(X > k).
    Pdtrc,
    /// Inverse of the cumulative distribution in the rate.
    Pdtri,
}

impl Operation {
    /// Short conventional name (`"pdtr"`, `"pdtrc"`, `"pdtri"`).
    pub const fn name(self) -> &'static str {
        match self {
            Self::Pdtr => "pdtr",
            Self::Pdtrc => "pdtrc",
            Self::Pdtri => "pdtri",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classification of a diagnostic.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An argument lies outside the operation's documented domain.
    Domain,
}

/// The argument that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Argument {
    /// Event count k.
    Count,
    /// Rate m.
    Rate,
    /// Target probability y.
    Probability,
}

impl Argument {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::Rate => "rate",
            Self::Probability => "probability",
        }
    }

    const fn requirement(self) -> &'static str {
        match self {
            Self::Count | Self::Rate => "must be non-negative",
            Self::Probability => "must lie in [0, 1)",
        }
    }
}

/// A structured report of a rejected call.
///
/// The call that produced it still returned NaN; this is the side channel
/// describing why.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Diagnostic {
    pub operation: Operation,
    pub kind: ErrorKind,
    pub argument: Argument,
}

impl Diagnostic {
    pub(crate) const fn domain(operation: Operation, argument: Argument) -> Self {
        Self {
            operation,
            kind: ErrorKind::Domain,
            argument,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ErrorKind::Domain => write!(
                f,
                "{}: domain error: {} {}",
                self.operation,
                self.argument.name(),
                self.argument.requirement()
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Diagnostic {}

/// Receiver for diagnostics raised during evaluation.
///
/// Reporting never alters the returned value. Takes `&self` so a single sink
/// can serve concurrent callers; implementations needing state bring their
/// own synchronization.
pub trait DiagnosticSink {
    fn report(&self, diagnostic: &Diagnostic);
}

/// Discards every diagnostic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Silent;

impl DiagnosticSink for Silent {
    #[inline]
    fn report(&self, _diagnostic: &Diagnostic) {}
}

/// Forwards diagnostics to `tracing` as `WARN` events on target `poisson_tail`.
#[cfg(feature = "tracing")]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TracingSink;

#[cfg(feature = "tracing")]
impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: &Diagnostic) {
        tracing::warn!(
            target: "poisson_tail",
            operation = diagnostic.operation.name(),
            argument = diagnostic.argument.name(),
            kind = ?diagnostic.kind,
            "{}",
            diagnostic
        );
    }
}

impl<F: Fn(&Diagnostic)> DiagnosticSink for F {
    #[inline]
    fn report(&self, diagnostic: &Diagnostic) {
        self(diagnostic)
    }
}

/// Sink used by [`PoissonTail::new`](super::PoissonTail::new) and the free functions.
#[cfg(feature = "tracing")]
pub type DefaultSink = TracingSink;

/// Sink used by [`PoissonTail::new`](super::PoissonTail::new) and the free functions.
#[cfg(not(feature = "tracing"))]
pub type DefaultSink = Silent;
