//! Transfer functions and types.
use super::interp;
use serde::{Deserialize, Serialize};

/// The curve a smoother follows from its start value to its target.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmoothingType {
    /// Linear mapping from `a -> b`
    #[default]
    Linear,
    /// Cosine function mapping from `a -> b`
    Cosine,
    /// Geometric mapping from `a -> b`; linear if either end is not positive
    Exponential,
}

impl SmoothingType {
    /// Maps the normalised ramp position `t` onto the range `a -> b`.
    #[inline]
    pub fn map(self, a: f64, b: f64, t: f64) -> f64 {
        match self {
            Self::Linear => interp::lerp(a, b, t),
            Self::Cosine => interp::cosine(a, b, t),
            Self::Exponential => interp::exponential(a, b, t),
        }
    }
}
