//! Complementary error function.

use crate::FloatScalar;
use super::incgamma::gamma_inc_pair;

/// Complementary error function erfc(x) = 1 − erf(x).
///
/// Uses erfc(x) = Q(½, x²) for x ≥ 0 and erfc(x) = 1 + P(½, x²) for x < 0,
/// so the right tail is computed directly rather than as a difference.
///
/// # Example
///
/// ```
/// use poisson_tail::special::erfc;
///
/// assert!((erfc(0.0_f64) - 1.0).abs() < 1e-15);
/// assert!((erfc(1.0_f64) - 0.15729920705028513).abs() < 1e-14);
/// assert!((erfc(-1.0_f64) - 1.8427007929497148).abs() < 1e-14);
/// ```
pub fn erfc<T: FloatScalar>(x: T) -> T {
    if x.is_nan() {
        return x;
    }

    let zero = T::zero();
    let one = T::one();
    let two = one + one;

    // erfc(27)² underflows every supported float
    if x.abs() > T::from(27.0).unwrap() {
        return if x > zero { zero } else { two };
    }

    match gamma_inc_pair(T::from(0.5).unwrap(), x * x) {
        Ok((p, q)) => {
            if x >= zero {
                q
            } else {
                one + p
            }
        }
        Err(_) => T::nan(),
    }
}
