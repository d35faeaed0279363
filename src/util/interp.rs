//! Interpolation functions and types.
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Fractional read interpolation types, all of which use four samples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpolationType {
    /// Linear interpolation from b -> c, given samples a, b, c and d.
    Linear,
    /// Standard cubic interpolation from b -> c, given samples a, b, c and d.
    DefaultCubic,
    /// Catmull-Rom cubic interpolation from b -> c, given samples a, b, c and d.
    CatmullCubic,
    /// Third-order Lagrange interpolation from b -> c, given samples a, b, c
    /// and d.
    #[default]
    Lagrange3rd,
}

impl InterpolationType {
    /// Interpolates between `p1` and `p2` with this interpolation type.
    #[inline]
    pub fn interpolate(self, p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
        match self {
            Self::Linear => linear(p1, p2, t),
            Self::DefaultCubic => cubic(p0, p1, p2, p3, t),
            Self::CatmullCubic => cubic_catmull(p0, p1, p2, p3, t),
            Self::Lagrange3rd => lagrange_3rd(p0, p1, p2, p3, t),
        }
    }
}

/// Shorthand for the `Interp::linear` function.
///
/// `t` is clamped between `0` and `1`.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    linear(a, b, t)
}

/// Linearly interpolates between `a` and `b` based on the value of `t`.
///
/// `t` is clamped between `0` and `1`.
pub fn linear(a: f64, b: f64, t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t == 0.0 {
        return a;
    } else if t == 1.0 {
        return b;
    }

    t.mul_add(b - a, a)
}

/// Interpolates between `a` and `b` based on the value of `t`, using
/// a cosine wave as the transfer function.
///
/// `t` is clamped between `0` and `1`.
pub fn cosine(a: f64, b: f64, t: f64) -> f64 {
    let t = (1.0 - (PI * t.clamp(0.0, 1.0)).cos()) * 0.5;

    linear(a, b, t)
}

/// Interpolates between `a` and `b` along a geometric curve, so equal steps in
/// `t` are equal ratios. Falls back to `linear()` unless both `a` and `b` are
/// strictly positive.
///
/// `t` is clamped between `0` and `1`.
pub fn exponential(a: f64, b: f64, t: f64) -> f64 {
    if a <= 0.0 || b <= 0.0 {
        return linear(a, b, t);
    }

    let t = t.clamp(0.0, 1.0);
    if t == 0.0 {
        return a;
    } else if t == 1.0 {
        return b;
    }

    a * (b / a).powf(t)
}

/// Interpolates between `p1` and `p2` based on the value of `t` using
/// cubic interpolation, which requires four samples.
///
/// `t` is clamped between `0` and `1`.
pub fn cubic(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    let t2 = t * t;
    let t3 = t2 * t;

    let a = p3 - p2 - p0 + p1;
    let b = p0 - p1 - a;
    let c = p2 - p0;
    let d = p1;

    c.mul_add(t, a.mul_add(t3, b * t2)) + d
}

/// Interpolates between `p1` and `p2` based on the value of t using Catmull-Rom
/// cubic interpolation, which requires four samples.
/// This is more expensive than the `Interp::cubic` function, but has a smoother
/// linear response, i.e. where the difference between points is similar.
///
/// `t` is clamped between `0` and `1`.
pub fn cubic_catmull(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    let t2 = t * t;
    let t3 = t2 * t;

    let a = -0.5 * p0 + 1.5 * p1 - 1.5 * p2 + 0.5 * p3;
    let b = p0 - 2.5 * p1 + 2.0 * p2 - 0.5 * p3;
    let c = -0.5 * p0 + 0.5 * p2;
    let d = p1;

    c.mul_add(t, a.mul_add(t3, b * t2)) + d
}

/// Interpolates between `p1` and `p2` based on the value of `t` using the
/// third-order Lagrange polynomial through all four samples, placed at
/// `-1, 0, 1, 2`. Passes exactly through `p1` at `t == 0` and `p2` at
/// `t == 1`, and its coefficients are continuous in `t`, so a slowly moving
/// read position produces no steps.
///
/// `t` is clamped between `0` and `1`.
pub fn lagrange_3rd(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);

    let tp1 = t + 1.0;
    let tm1 = t - 1.0;
    let tm2 = t - 2.0;

    let c0 = -t * tm1 * tm2 / 6.0;
    let c1 = tp1 * tm1 * tm2 * 0.5;
    let c2 = -tp1 * t * tm2 * 0.5;
    let c3 = tp1 * t * tm1 / 6.0;

    c0.mul_add(p0, c1.mul_add(p1, c2.mul_add(p2, c3 * p3)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::within_tolerance;

    #[test]
    fn test_linear_interp() {
        assert!(within_tolerance(linear(2.0, 4.0, 0.5), 3.0, f64::EPSILON));
        assert!(within_tolerance(linear(2.0, 4.0, 3.0), 4.0, f64::EPSILON));
    }

    #[test]
    fn test_exponential_interp() {
        assert!(within_tolerance(exponential(100.0, 10000.0, 0.5), 1000.0, 1e-9));
        // non-positive endpoints fall back to a straight line
        assert!(within_tolerance(exponential(0.0, 1.0, 0.25), 0.25, f64::EPSILON));
    }

    #[test]
    fn test_lagrange_passes_through_samples() {
        let (p0, p1, p2, p3) = (0.3, -0.7, 0.9, 0.1);
        assert!(within_tolerance(lagrange_3rd(p0, p1, p2, p3, 0.0), p1, 1e-15));
        assert!(within_tolerance(lagrange_3rd(p0, p1, p2, p3, 1.0), p2, 1e-15));
    }

    #[test]
    fn test_lagrange_reproduces_cubics() {
        // a cubic polynomial sampled at -1, 0, 1, 2 is reproduced exactly
        let f = |x: f64| 0.5 * x * x * x - x * x + 0.25 * x + 2.0;
        for t in [0.1, 0.25, 0.5, 0.77] {
            let y = lagrange_3rd(f(-1.0), f(0.0), f(1.0), f(2.0), t);
            assert!(within_tolerance(y, f(t), 1e-12));
        }
    }

    #[test]
    fn test_all_kernels_are_exact_at_integers() {
        let kinds = [
            InterpolationType::Linear,
            InterpolationType::DefaultCubic,
            InterpolationType::CatmullCubic,
            InterpolationType::Lagrange3rd,
        ];
        for kind in kinds {
            assert!(within_tolerance(
                kind.interpolate(1.0, 2.0, 3.0, 5.0, 0.0),
                2.0,
                1e-15
            ));
        }
    }
}
