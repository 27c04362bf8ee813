//! Uniform asymptotic expansion of the incomplete gamma ratios for large a.
//!
//! With σ = (x − a)/a and η = sign(σ)·√(−2(ln(1+σ) − σ)):
//!
//! ```text
//! Q(a, x) = ½·erfc(η·√(a/2)) + R
//! P(a, x) = ½·erfc(−η·√(a/2)) − R
//! R       = e^{−aη²/2} / √(2πa) · Σₖ cₖ(η)·a^{−k}
//! ```
//!
//! (Temme 1979; DLMF §8.12). Each cₖ is held as its Taylor series in η,
//! which converges on the whole |σ| < 0.3 window used here.

use crate::FloatScalar;
use super::erf_fn::erfc;
use super::incgamma::log1pmx;

/// Smallest shape handed to the expansion.
const MIN_SHAPE: f64 = 100.0;

/// Largest relative distance |x − a| / a handed to the expansion.
const MAX_SPREAD: f64 = 0.3;

/// Taylor coefficients of c₀ … c₆ in powers of η.
const COEFFS: [[f64; 16]; 7] = [
    [
        -3.33333333333333315e-01, 8.33333333333333287e-02, -1.48148148148148154e-02, 1.15740740740740734e-03,
        3.52733686067019424e-04, -1.78755144032921798e-04, 3.91926317852243767e-05, -2.18544851067999198e-06,
        -1.85406221071515997e-06, 8.29671134095308652e-07, -1.76659527368260782e-07, 6.70785354340149841e-09,
        1.02618097842403086e-08, -4.38203601845335294e-09, 9.14769958223679021e-10, -2.55141939949462482e-11,
    ],
    [
        -1.85185185185185192e-03, -3.47222222222222203e-03, 2.64550264550264536e-03, -9.90226337448559630e-04,
        2.05761316872427979e-04, -4.01877572016460897e-07, -1.80985503344899767e-05, 7.64916091608110982e-06,
        -1.61209008945634465e-06, 4.64712780280743402e-09, 1.37863344691572092e-07, -5.75254560351770471e-08,
        1.19516285997781477e-08, -1.75432417197476467e-11, -1.00915437106004126e-09, 4.16279299184258280e-10,
    ],
    [
        4.13359788359788337e-03, -2.68132716049382727e-03, 7.71604938271604895e-04, 2.00938786008230470e-06,
        -1.07366532263651599e-04, 5.29234488291201250e-05, -1.27606351886187284e-05, 3.42357873409613781e-08,
        1.37219573090629342e-06, -6.29899213838005482e-07, 1.42806142060642425e-07, -2.04770984219908661e-10,
        -1.40925299108675203e-08, 6.22897408492202184e-09, -1.36704883966171141e-09, 9.42835615901467795e-13,
    ],
    [
        6.49434156378600773e-04, 2.29472093621399168e-04, -4.69189494395255702e-04, 2.67720632062838854e-04,
        -7.56180167188397662e-05, -2.39650511386729680e-07, 1.10826541153473025e-05, -5.67495282699159655e-06,
        1.42309007324358833e-06, -2.78610802915281434e-11, -1.69584040919302782e-07, 8.09946490538808268e-08,
        -1.91111684859736545e-08, 2.39286204398081180e-12, 2.06201318154887967e-09, -9.46049666185513302e-10,
    ],
    [
        -8.61888290916711726e-04, 7.84039221720066615e-04, -2.99072480303190177e-04, -1.46384525788434181e-06,
        6.64149821546512189e-05, -3.96836504717943471e-05, 1.13757269706784187e-05, 2.50749722623753294e-10,
        -1.69541495365583054e-06, 8.90750753220530941e-07, -2.29293483400080494e-07, 2.95679413754404924e-11,
        2.88658297427087831e-08, -1.41897394378032191e-08, 3.44635804994648956e-09, -2.30245171745280665e-13,
    ],
    [
        -3.36798553366358131e-04, -6.97281375836585711e-05, 2.77275324495939183e-04, -1.99325705161888469e-04,
        6.79778047793720800e-05, 1.41906292064396713e-07, -1.35940481897686926e-05, 8.01847025633420200e-06,
        -2.29148117650809516e-06, -3.25247355129845377e-10, 3.46528464910852651e-07, -1.84471871911713436e-07,
        4.82409670378941838e-08, -1.79894667217435142e-14, -6.30619450001352306e-09, 3.16241762877456782e-09,
    ],
    [
        5.31307936463992249e-04, -5.92166437353693932e-04, 2.70878209671804500e-04, 7.90235323266032815e-07,
        -8.15396936756196915e-05, 5.61168275310624970e-05, -1.83291165828433752e-05, -3.07961345060330474e-09,
        3.46515536880360913e-06, -2.02913273960586027e-06, 5.78879286314900390e-07, 2.33863067382665681e-13,
        -8.82860074633048400e-08, 4.74359588804081251e-08, -1.25454150207103832e-08, 8.64964885801029260e-14,
    ],
];

/// Whether (a, x) lies in the transition region served by [`pair`].
///
/// Outside it the power series and the continued fraction both converge
/// in a few hundred terms at most.
pub(super) fn applies<T: FloatScalar>(a: T, x: T) -> bool {
    a >= T::from(MIN_SHAPE).unwrap() && ((x - a) / a).abs() < T::from(MAX_SPREAD).unwrap()
}

/// (P(a, x), Q(a, x)) for (a, x) accepted by [`applies`].
pub(super) fn pair<T: FloatScalar>(a: T, x: T) -> (T, T) {
    let zero = T::zero();
    let half = T::from(0.5).unwrap();
    let two = T::from(2.0).unwrap();

    let sigma = (x - a) / a;
    let eta_sq = -two * log1pmx(sigma);
    let eta = if sigma < zero { -eta_sq.sqrt() } else { eta_sq.sqrt() };

    let inv_a = a.recip();
    let mut a_pow = T::one();
    let mut sum = zero;
    for row in COEFFS.iter() {
        let mut c = zero;
        for &d in row.iter().rev() {
            c = c * eta + T::from(d).unwrap();
        }
        sum = sum + c * a_pow;
        a_pow = a_pow * inv_a;
    }

    let two_pi = T::from(core::f64::consts::TAU).unwrap();
    let remainder = (-half * a * eta_sq).exp() / (two_pi * a).sqrt() * sum;
    let z = eta * (half * a).sqrt();

    let p = half * erfc(-z) - remainder;
    let q = half * erfc(z) + remainder;
    (p, q)
}
