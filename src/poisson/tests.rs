use super::*;
use crate::special::{Builtin, IncompleteGamma};

use std::cell::RefCell;

const TOL: f64 = 1e-12;

fn approx_eq(a: f64, b: f64, tol: f64) {
    assert!(
        (a - b).abs() < tol,
        "approx_eq failed: {a} vs {b}, diff = {}, tol = {tol}",
        (a - b).abs()
    );
}

/// Integer-shape primitives in closed form: Q(n, x) = e^{−x} Σ_{j<n} x^j / j!.
struct ClosedForm;

impl ClosedForm {
    fn q(n: f64, x: f64) -> f64 {
        assert_eq!(n, n.floor(), "stub only handles integer shapes");
        let mut term = 1.0;
        let mut sum = 1.0;
        let mut j = 1.0;
        while j < n {
            term *= x / j;
            sum += term;
            j += 1.0;
        }
        (-x).exp() * sum
    }
}

impl IncompleteGamma<f64> for ClosedForm {
    fn lower(&self, a: f64, x: f64) -> f64 {
        1.0 - Self::q(a, x)
    }

    fn upper(&self, a: f64, x: f64) -> f64 {
        Self::q(a, x)
    }

    fn upper_inv(&self, a: f64, y: f64) -> f64 {
        // Plain bisection on the decreasing closed form
        let (mut lo, mut hi) = (0.0, 1.0);
        while Self::q(a, hi) > y {
            hi *= 2.0;
        }
        for _ in 0..200 {
            let mid = 0.5 * (lo + hi);
            if Self::q(a, mid) > y {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        0.5 * (lo + hi)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Call {
    Lower(f64, f64),
    Upper(f64, f64),
    UpperInv(f64, f64),
}

/// Records every call and answers with a fixed sentinel.
#[derive(Default)]
struct Recording {
    calls: RefCell<Vec<Call>>,
}

const SENTINEL: f64 = 0.125;

impl IncompleteGamma<f64> for Recording {
    fn lower(&self, a: f64, x: f64) -> f64 {
        self.calls.borrow_mut().push(Call::Lower(a, x));
        SENTINEL
    }

    fn upper(&self, a: f64, x: f64) -> f64 {
        self.calls.borrow_mut().push(Call::Upper(a, x));
        SENTINEL
    }

    fn upper_inv(&self, a: f64, y: f64) -> f64 {
        self.calls.borrow_mut().push(Call::UpperInv(a, y));
        SENTINEL
    }
}

fn collecting<'a>(into: &'a RefCell<Vec<Diagnostic>>) -> impl Fn(&Diagnostic) + 'a {
    move |d: &Diagnostic| into.borrow_mut().push(*d)
}

// ======================== Known values ========================

#[test]
fn cdf_zero_events_unit_rate() {
    approx_eq(pdtr(0.0_f64, 1.0), (-1.0_f64).exp(), 1e-14);
    approx_eq(pdtr(0.0_f64, 1.0), 0.36787944117144233, 1e-14);
}

#[test]
fn ccdf_zero_events_unit_rate() {
    approx_eq(pdtrc(0.0_f64, 1.0), 1.0 - (-1.0_f64).exp(), 1e-14);
    approx_eq(pdtrc(0.0_f64, 1.0), 0.6321205588285577, 1e-14);
}

#[test]
fn cdf_matches_closed_form() {
    let tail = PoissonTail::new();
    for k in 0..20 {
        for &m in &[0.01_f64, 0.5, 1.0, 3.7, 10.0, 25.0] {
            let expected = ClosedForm::q(k as f64 + 1.0, m);
            approx_eq(tail.cdf(k as f64, m).value(), expected, TOL);
        }
    }
}

#[test]
fn ccdf_keeps_small_tail_accuracy() {
    // P(X > 0) = 1 − e^{−m}; tiny m would cancel to zero through 1 − cdf
    let m = 1e-10_f64;
    let expected = -(-m).exp_m1();
    let got = pdtrc(0.0, m);
    assert!(((got - expected) / expected).abs() < 1e-12, "{got} vs {expected}");
}

#[test]
fn large_count_and_rate() {
    let p = pdtr(1000.0_f64, 1000.0);
    assert!(p > 0.5 && p < 0.52, "P(X ≤ 1000 | m = 1000) = {p}");
    approx_eq(p + pdtrc(1000.0, 1000.0), 1.0, 1e-12);
}

#[test]
fn huge_count_and_rate() {
    // k = m = 1e9 sits in the uniform-expansion region
    approx_eq(pdtr(1.0e9_f64, 1.0e9), 0.500_008_410_441_739, TOL);
    approx_eq(pdtrc(1.0e9_f64, 1.0e9), 0.499_991_589_558_261, TOL);
    approx_eq(pdtr(2.0e8_f64, 2.0e8), 0.500_018_806_319_440, TOL);

    let m = pdtri(1_000_000_000, 0.5_f64);
    approx_eq(m, 1_000_000_000.666_666_7, 1e-4);
    approx_eq(pdtr(1.0e9, m), 0.5, 1e-10);
}

#[test]
fn huge_count_round_trip() {
    for &y in &[1e-8_f64, 0.01, 0.25, 0.75, 0.99] {
        let m = pdtri(1_000_000_000, y);
        assert!(m.is_finite(), "pdtri(1e9, {y}) = {m}");
        let back = pdtr(1.0e9, m);
        assert!(((back - y) / y).abs() < 1e-9, "pdtr(1e9, pdtri(1e9, {y})) = {back}");
    }
}

// ======================== Properties ========================

#[test]
fn cdf_plus_ccdf_is_one() {
    for k in 0..30 {
        for &m in &[0.0_f64, 0.2, 1.0, 4.5, 12.0, 40.0] {
            let sum = pdtr(k as f64, m) + pdtrc(k as f64, m);
            approx_eq(sum, 1.0, TOL);
        }
    }
}

#[test]
fn zero_rate_is_exact() {
    for &k in &[0.0_f64, 1.0, 2.5, 17.0, 1e6] {
        assert_eq!(pdtr(k, 0.0), 1.0);
        assert_eq!(pdtrc(k, 0.0), 0.0);
    }
    // -0.0 is not negative
    assert_eq!(pdtr(3.0_f64, -0.0), 1.0);
}

#[test]
fn cdf_non_decreasing_in_count() {
    for &m in &[0.3_f64, 2.0, 9.0, 50.0] {
        let mut prev = 0.0;
        for k in 0..120 {
            let p = pdtr(k as f64, m);
            assert!(p >= prev, "m={m}, k={k}: {p} < {prev}");
            prev = p;
        }
    }
}

#[test]
fn fractional_count_is_floored() {
    for &m in &[0.5_f64, 3.0, 8.25] {
        assert_eq!(pdtr(2.9, m), pdtr(2.0, m));
        assert_eq!(pdtrc(2.9, m), pdtrc(2.0, m));
        assert_eq!(pdtr(0.999, m), pdtr(0.0, m));
    }
}

#[test]
fn inverse_round_trip() {
    let tail = PoissonTail::new();
    for k in 0..=10_i64 {
        for &m in &[0.1_f64, 1.0, 2.5, 7.0, 20.0] {
            let p = tail.cdf(k as f64, m).value();
            if p >= 0.99 || p < 1e-300 {
                continue;
            }
            let back = tail.inverse_cdf(k, p).value();
            assert!(
                ((back - m) / m).abs() < 1e-9,
                "k={k}, m={m}: pdtri(k, {p}) = {back}"
            );
        }
    }
}

#[test]
fn inverse_with_closed_form_primitives() {
    let tail = PoissonTail::new().with_primitives(ClosedForm);
    let m = tail.inverse_cdf(4, 0.3).value();
    approx_eq(ClosedForm::q(5.0, m), 0.3, 1e-12);
    approx_eq(m, pdtri(4, 0.3), 1e-9);
}

#[test]
fn inverse_zero_probability_is_left_to_primitive() {
    let eval = PoissonTail::new().with_sink(Silent).inverse_cdf(3, 0.0_f64);
    assert!(eval.diagnostic().is_none());
    assert_eq!(eval.value(), f64::INFINITY);
}

// ======================== Index shift ========================

#[test]
fn shift_floors_then_adds_one() {
    let tail = PoissonTail::new().with_primitives(Recording::default());

    assert_eq!(tail.cdf(2.9_f64, 1.5).value(), SENTINEL);
    assert_eq!(tail.ccdf(2.9_f64, 1.5).value(), SENTINEL);
    assert_eq!(tail.inverse_cdf(4, 0.3_f64).value(), SENTINEL);
    assert_eq!(tail.cdf(0.0_f64, 7.0).value(), SENTINEL);

    assert_eq!(
        *tail.primitives().calls.borrow(),
        vec![
            Call::Upper(3.0, 1.5),
            Call::Lower(3.0, 1.5),
            Call::UpperInv(5.0, 0.3),
            Call::Upper(1.0, 7.0),
        ]
    );
}

#[test]
fn zero_rate_bypasses_primitives() {
    let tail = PoissonTail::new().with_primitives(Recording::default());
    assert_eq!(tail.cdf(4.0_f64, 0.0).value(), 1.0);
    assert_eq!(tail.ccdf(4.0_f64, 0.0).value(), 0.0);
    assert!(tail.primitives().calls.borrow().is_empty());
}

// ======================== Domain errors ========================

#[test]
fn domain_errors_return_nan() {
    assert!(pdtr(-1.0_f64, 5.0).is_nan());
    assert!(pdtr(3.0_f64, -2.0).is_nan());
    assert!(pdtrc(-0.5_f64, 1.0).is_nan());
    assert!(pdtrc(2.0_f64, -1e-300).is_nan());
    assert!(pdtri(3, 1.0_f64).is_nan());
    assert!(pdtri(-1, 0.5_f64).is_nan());
    assert!(pdtri(3, -0.1_f64).is_nan());
    assert!(pdtri(3, 7.0_f64).is_nan());
}

#[test]
fn domain_errors_reach_sink_and_skip_primitives() {
    let seen = RefCell::new(Vec::new());
    let tail = PoissonTail::new()
        .with_primitives(Recording::default())
        .with_sink(collecting(&seen));

    assert!(tail.cdf(-1.0_f64, 5.0).value().is_nan());
    assert!(tail.cdf(3.0_f64, -2.0).value().is_nan());
    assert!(tail.ccdf(-1.0_f64, -1.0).value().is_nan());
    assert!(tail.inverse_cdf(3, 1.0_f64).value().is_nan());
    assert!(tail.inverse_cdf(-1, 0.5_f64).value().is_nan());
    assert!(tail.inverse_cdf(3, -0.1_f64).value().is_nan());

    assert!(tail.primitives().calls.borrow().is_empty());
    assert_eq!(
        *seen.borrow(),
        vec![
            Diagnostic::domain(Operation::Pdtr, Argument::Count),
            Diagnostic::domain(Operation::Pdtr, Argument::Rate),
            // count is checked first
            Diagnostic::domain(Operation::Pdtrc, Argument::Count),
            Diagnostic::domain(Operation::Pdtri, Argument::Probability),
            Diagnostic::domain(Operation::Pdtri, Argument::Count),
            Diagnostic::domain(Operation::Pdtri, Argument::Probability),
        ]
    );
}

#[test]
fn valid_calls_raise_nothing() {
    let seen = RefCell::new(Vec::new());
    let tail = PoissonTail::new().with_sink(collecting(&seen));
    let _ = tail.cdf(3.0_f64, 2.0);
    let _ = tail.ccdf(0.0_f64, 0.0);
    let _ = tail.inverse_cdf(2, 0.0_f64);
    assert!(seen.borrow().is_empty());
}

#[test]
fn nan_arguments_propagate_without_diagnostic() {
    let seen = RefCell::new(Vec::new());
    let tail = PoissonTail::new().with_sink(collecting(&seen));
    assert!(tail.cdf(f64::NAN, 2.0).value().is_nan());
    assert!(tail.ccdf(2.0, f64::NAN).value().is_nan());
    assert!(tail.inverse_cdf(2, f64::NAN).value().is_nan());
    assert!(seen.borrow().is_empty());
}

#[test]
fn evaluation_accessors() {
    let tail = PoissonTail::new().with_sink(Silent);

    let ok = tail.cdf(1.0_f64, 1.0);
    assert!(!ok.is_domain_error());
    assert!(ok.diagnostic().is_none());
    approx_eq(ok.into_result().unwrap(), 2.0 * (-1.0_f64).exp(), 1e-14);

    let bad = tail.inverse_cdf(-2, 0.5_f64);
    assert!(bad.is_domain_error());
    assert_eq!(bad.diagnostic().map(|d| d.argument), Some(Argument::Count));
    assert_eq!(
        bad.into_result(),
        Err(Diagnostic::domain(Operation::Pdtri, Argument::Count))
    );
}

#[test]
fn diagnostic_display() {
    let d = Diagnostic::domain(Operation::Pdtri, Argument::Probability);
    assert_eq!(d.to_string(), "pdtri: domain error: probability must lie in [0, 1)");
    let d = Diagnostic::domain(Operation::Pdtrc, Argument::Rate);
    assert_eq!(d.to_string(), "pdtrc: domain error: rate must be non-negative");
    assert_eq!(Operation::Pdtr.name(), "pdtr");
}

#[cfg(feature = "tracing")]
mod tracing_events {
    use super::*;

    use std::sync::{Arc, Mutex};

    use tracing::field::{Field, Visit};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    struct Captured {
        level: Level,
        target: String,
        fields: Vec<(String, String)>,
    }

    impl Captured {
        fn field(&self, name: &str) -> Option<&str> {
            self.fields
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.as_str())
        }
    }

    struct Fields<'a>(&'a mut Vec<(String, String)>);

    impl Visit for Fields<'_> {
        fn record_str(&mut self, field: &Field, value: &str) {
            self.0.push((field.name().to_string(), value.to_string()));
        }

        fn record_debug(&mut self, field: &Field, value: &dyn core::fmt::Debug) {
            self.0.push((field.name().to_string(), format!("{value:?}")));
        }
    }

    /// Layer that keeps every event it sees.
    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<Captured>>>);

    impl<S: Subscriber> Layer<S> for Capture {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut fields = Vec::new();
            event.record(&mut Fields(&mut fields));
            let meta = event.metadata();
            self.0.lock().unwrap().push(Captured {
                level: *meta.level(),
                target: meta.target().to_string(),
                fields,
            });
        }
    }

    #[test]
    fn tracing_sink_emits_structured_warning() {
        let capture = Capture::default();
        let subscriber = tracing_subscriber::registry().with(capture.clone());

        let value = tracing::subscriber::with_default(subscriber, || {
            PoissonTail::new()
                .with_sink(TracingSink)
                .inverse_cdf(3, 1.5_f64)
                .value()
        });
        assert!(value.is_nan());

        let events = capture.0.lock().unwrap();
        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.level, Level::WARN);
        assert_eq!(event.target, "poisson_tail");
        assert_eq!(event.field("operation"), Some("pdtri"));
        assert_eq!(event.field("argument"), Some("probability"));
        assert_eq!(event.field("kind"), Some("Domain"));
        assert_eq!(
            event.field("message"),
            Some("pdtri: domain error: probability must lie in [0, 1)")
        );
    }

    #[test]
    fn valid_calls_emit_no_events() {
        let capture = Capture::default();
        let subscriber = tracing_subscriber::registry().with(capture.clone());

        tracing::subscriber::with_default(subscriber, || {
            let tail = PoissonTail::new().with_sink(TracingSink);
            assert!(tail.cdf(4.0_f64, 2.0).value().is_finite());
            assert!(tail.inverse_cdf(4, 0.3_f64).value().is_finite());
        });

        assert!(capture.0.lock().unwrap().is_empty());
    }
}

// ======================== Generic precision ========================

#[test]
fn single_precision() {
    let p = pdtr(0.0_f32, 1.0);
    assert!((p - (-1.0_f32).exp()).abs() < 1e-5);
    assert!((p + pdtrc(0.0_f32, 1.0) - 1.0).abs() < 1e-5);
    let m = pdtri(0, p);
    assert!((m - 1.0).abs() < 1e-3);
    assert!(pdtr(-1.0_f32, 1.0).is_nan());
}

#[test]
fn single_precision_large_counts() {
    // Q(k+1, k) at moderate to huge k
    let cases: [(f32, f32); 3] = [(3.0e4, 0.501_535_5), (3.0e5, 0.500_485_6), (1.0e6, 0.500_266)];
    for &(k, expected) in &cases {
        let p = pdtr(k, k);
        let q = pdtrc(k, k);
        assert!((p - expected).abs() < 2e-5, "pdtr({k}, {k}) = {p}");
        assert!((0.0..=1.0).contains(&q), "pdtrc({k}, {k}) = {q}");
        assert!((p + q - 1.0).abs() < 1e-6);
    }

    let p = pdtr(1.0e9_f32, 1.0e9);
    assert!((0.0..=1.0).contains(&p) && (p - 0.5).abs() < 1e-3, "pdtr(1e9, 1e9) = {p}");
    let m = pdtri(1_000_000, 0.3_f32);
    assert!((pdtr(1.0e6_f32, m) - 0.3).abs() < 1e-3, "pdtri(1e6, 0.3) = {m}");
}

#[test]
fn free_functions_match_default_evaluator() {
    let tail = PoissonTail::new();
    assert_eq!(pdtr(5.0_f64, 3.0), tail.cdf(5.0, 3.0).value());
    assert_eq!(pdtrc(5.0_f64, 3.0), tail.ccdf(5.0, 3.0).value());
    assert_eq!(pdtri(5, 0.4_f64), tail.inverse_cdf(5, 0.4).value());
    assert_eq!(*tail.primitives(), Builtin);
}
