//! Scalar primitives behind the exact/fast precision switch
//!
//! Every length, normalization and 2D rotation in the engine funnels through
//! [`Precision`]. `Exact` calls the platform `sqrt`/`sin`/`cos`; `Fast` avoids
//! transcendental calls in hot loops:
//!
//! - inverse square root: bit-level estimate refined by exactly two
//!   Newton-Raphson steps, max relative error below `1e-5`
//! - sine: 5th-order Taylor polynomial on a range-reduced argument, max
//!   absolute error about `4.5e-3` at `±π/2`
//! - cosine: `sin(x + π/2)`

use serde::{Deserialize, Serialize};

use super::constants::{HALF_PI, PI, TAU};

/// Magic constant for the 64-bit inverse square root estimate.
const INV_SQRT_MAGIC: u64 = 0x5FE6_EB50_C7B5_37A9;

/// Performance-vs-accuracy mode for scalar primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Precision {
    /// Platform square root and trigonometry
    #[default]
    Exact,
    /// Newton-refined inverse square root and Taylor-series sine
    Fast,
}

impl Precision {
    /// Square root of `x`; zero or negative input yields `0.0`
    #[inline]
    pub fn sqrt(self, x: f64) -> f64 {
        match self {
            Self::Exact => {
                if x > 0.0 {
                    x.sqrt()
                } else {
                    0.0
                }
            }
            Self::Fast => x * fast_inv_sqrt(x),
        }
    }

    /// `1 / sqrt(x)`; zero or negative input yields `0.0`
    #[inline]
    pub fn inv_sqrt(self, x: f64) -> f64 {
        match self {
            Self::Exact => {
                if x > 0.0 {
                    1.0 / x.sqrt()
                } else {
                    0.0
                }
            }
            Self::Fast => fast_inv_sqrt(x),
        }
    }

    /// Sine of `x` (radians)
    #[inline]
    pub fn sin(self, x: f64) -> f64 {
        match self {
            Self::Exact => x.sin(),
            Self::Fast => fast_sin(x),
        }
    }

    /// Cosine of `x` (radians)
    #[inline]
    pub fn cos(self, x: f64) -> f64 {
        match self {
            Self::Exact => x.cos(),
            Self::Fast => fast_cos(x),
        }
    }

    /// `(sin x, cos x)` in one call
    #[inline]
    pub fn sin_cos(self, x: f64) -> (f64, f64) {
        match self {
            Self::Exact => x.sin_cos(),
            Self::Fast => (fast_sin(x), fast_cos(x)),
        }
    }
}

/// Approximate `1 / sqrt(x)`.
///
/// Reinterprets the float bits for the initial estimate, then runs exactly
/// two Newton-Raphson iterations `y = y * (1.5 - 0.5 * x * y * y)`.
/// Returns `0.0` for zero, negative or non-finite input.
#[inline]
pub fn fast_inv_sqrt(x: f64) -> f64 {
    if x <= 0.0 || !x.is_finite() {
        return 0.0;
    }
    let half_x = 0.5 * x;
    let mut y = f64::from_bits(INV_SQRT_MAGIC - (x.to_bits() >> 1));
    y *= 1.5 - half_x * y * y;
    y *= 1.5 - half_x * y * y;
    y
}

/// Reduce an angle into `[-π, π]`
#[inline]
pub fn reduce_angle(x: f64) -> f64 {
    if (-PI..=PI).contains(&x) {
        return x;
    }
    let reduced = x - TAU * (x / TAU).round();
    // round() can leave the result a hair outside the interval
    if reduced > PI {
        reduced - TAU
    } else if reduced < -PI {
        reduced + TAU
    } else {
        reduced
    }
}

/// Approximate sine with a truncated Taylor polynomial `x - x³/6 + x⁵/120`
#[inline]
pub fn fast_sin(x: f64) -> f64 {
    if !x.is_finite() {
        return f64::NAN;
    }
    let mut r = reduce_angle(x);
    // Fold into [-π/2, π/2] where the polynomial is accurate
    if r > HALF_PI {
        r = PI - r;
    } else if r < -HALF_PI {
        r = -PI - r;
    }
    let r2 = r * r;
    r * (1.0 - r2 / 6.0 * (1.0 - r2 / 20.0))
}

/// Approximate cosine as `sin(x + π/2)`
#[inline]
pub fn fast_cos(x: f64) -> f64 {
    fast_sin(x + HALF_PI)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const FAST_SIN_TOLERANCE: f64 = 5e-3;

    #[test]
    fn test_fast_inv_sqrt_accuracy() {
        for &x in &[1e-8, 0.01, 0.5, 1.0, 2.0, 3.0, 10.0, 1234.5, 1e9] {
            let exact = 1.0 / f64::sqrt(x);
            let approx = fast_inv_sqrt(x);
            let relative = ((approx - exact) / exact).abs();
            assert!(relative < 1e-5, "x = {x}: relative error {relative}");
        }
    }

    #[test]
    fn test_fast_inv_sqrt_degenerate_input() {
        assert_eq!(fast_inv_sqrt(0.0), 0.0);
        assert_eq!(fast_inv_sqrt(-4.0), 0.0);
        assert_eq!(fast_inv_sqrt(f64::INFINITY), 0.0);
        assert_eq!(fast_inv_sqrt(f64::NAN), 0.0);
    }

    #[test]
    fn test_precision_sqrt_modes_agree() {
        for &x in &[0.25, 1.0, 2.0, 100.0] {
            assert_abs_diff_eq!(Precision::Exact.sqrt(x), x.sqrt(), epsilon = 1e-12);
            assert_abs_diff_eq!(Precision::Fast.sqrt(x), x.sqrt(), epsilon = x.sqrt() * 1e-5);
        }
        assert_eq!(Precision::Exact.sqrt(-1.0), 0.0);
        assert_eq!(Precision::Fast.sqrt(0.0), 0.0);
    }

    #[test]
    fn test_reduce_angle_range() {
        for &x in &[0.0, 1.0, -1.0, 4.0, -4.0, 10.0, -10.0, 100.0, 3.0 * PI] {
            let r = reduce_angle(x);
            assert!((-PI..=PI).contains(&r), "{x} reduced to {r}");
            assert_abs_diff_eq!(r.sin(), x.sin(), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_fast_sin_cos_accuracy() {
        let mut angle = -10.0;
        while angle <= 10.0 {
            assert_abs_diff_eq!(fast_sin(angle), angle.sin(), epsilon = FAST_SIN_TOLERANCE);
            assert_abs_diff_eq!(fast_cos(angle), angle.cos(), epsilon = FAST_SIN_TOLERANCE);
            angle += 0.05;
        }
    }

    #[test]
    fn test_fast_sin_exact_at_zero() {
        assert_eq!(fast_sin(0.0), 0.0);
        assert_abs_diff_eq!(fast_sin(PI), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_default_precision_is_exact() {
        assert_eq!(Precision::default(), Precision::Exact);
    }
}
