//! Bounded root finding for the absorption cutoff.
//!
//! The attenuation curve is not guaranteed to be monotonic or single-rooted,
//! so the band is first scanned on a logarithmic grid from low to high
//! frequency. The first grid interval where the curve rises to meet the
//! target is then narrowed by bisection in log-frequency. Both stages have a
//! fixed step budget, so every solve terminates.
//!
//! Boundary policy when no crossing lies inside the band:
//! - the curve is already at or above the target at the bottom of the band:
//!   [`CutoffSolution::Saturated`] with the lower band edge (the signal is
//!   attenuated at every frequency, so the filter should be fully closed);
//! - the curve stays below the target up to the top of the band:
//!   [`CutoffSolution::Unreachable`] with the upper band edge (no
//!   attenuation is needed).

use crate::prelude::*;

/// The outcome of a cutoff solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CutoffSolution {
    /// The attenuation curve first meets the target at `frequency_hz`.
    Root { frequency_hz: f64, iterations: u32 },
    /// The target is never reached inside the band.
    Unreachable { frequency_hz: f64 },
    /// The target is already exceeded at the bottom of the band.
    Saturated { frequency_hz: f64 },
}

impl CutoffSolution {
    /// The cutoff frequency in Hz, whichever way it was found.
    pub fn frequency(&self) -> f64 {
        match *self {
            Self::Root { frequency_hz, .. }
            | Self::Unreachable { frequency_hz }
            | Self::Saturated { frequency_hz } => frequency_hz,
        }
    }

    /// Whether the solve found an actual crossing.
    pub fn is_root(&self) -> bool {
        matches!(self, Self::Root { .. })
    }
}

/// Finds the lowest frequency in `[min_hz, max_hz]` at which `curve` reaches
/// `target`. Non-finite curve values are treated as "below target".
///
/// # Panics
///
/// Panics if `min_hz` is not positive or `max_hz <= min_hz`.
pub fn solve_first_crossing<F>(
    curve: F,
    target: f64,
    min_hz: f64,
    max_hz: f64,
) -> CutoffSolution
where
    F: Fn(f64) -> f64,
{
    assert!(min_hz > 0.0 && max_hz > min_hz);

    let reached = |f: f64| curve(f) - target >= 0.0;

    if reached(min_hz) {
        return CutoffSolution::Saturated { frequency_hz: min_hz };
    }

    let step = (max_hz / min_hz).powf((SOLVER_SCAN_POINTS as f64).recip());
    let mut below = min_hz;

    for i in 1..=SOLVER_SCAN_POINTS {
        let freq = if i == SOLVER_SCAN_POINTS {
            max_hz
        }
        else {
            min_hz * step.powi(i as i32)
        };

        if reached(freq) {
            return bisect(&curve, target, below, freq);
        }

        below = freq;
    }

    CutoffSolution::Unreachable { frequency_hz: max_hz }
}

/// Narrows `[below, above]`, where the curve is under the target at `below`
/// and at or over it at `above`.
fn bisect<F>(curve: &F, target: f64, mut below: f64, mut above: f64) -> CutoffSolution
where
    F: Fn(f64) -> f64,
{
    let mut iterations = 0;

    while iterations < SOLVER_MAX_ITERATIONS {
        iterations += 1;

        let mid = (below * above).sqrt();
        let error = curve(mid) - target;

        if error.abs() <= SOLVER_ATTENUATION_TOLERANCE_DB {
            return CutoffSolution::Root { frequency_hz: mid, iterations };
        }

        if error >= 0.0 {
            above = mid;
        }
        else {
            below = mid;
        }

        if above / below - 1.0 <= SOLVER_FREQ_TOLERANCE {
            break;
        }
    }

    CutoffSolution::Root { frequency_hz: (below * above).sqrt(), iterations }
}
