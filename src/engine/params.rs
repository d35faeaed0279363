//! Host-facing parameters and their shared, lock-free storage.

use crate::prelude::*;
use atomic::Atomic;
use bytemuck::NoUninit;
use std::sync::atomic::{AtomicBool, AtomicU32};

/// How the renderer should treat the source.
#[repr(u8)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SourceType {
    #[default]
    Point = 0,
    PlaneWave = 1,
}

// SAFETY: a fieldless `repr(u8)` enum has no padding or uninit bytes
unsafe impl NoUninit for SourceType {}

impl SourceType {
    /// The zero-based index sent to the renderer.
    pub fn index(self) -> u32 {
        self as u32
    }

    /// Maps the one-based host value to a source type.
    pub fn from_host_value(value: u32) -> Option<Self> {
        match value {
            1 => Some(Self::Point),
            2 => Some(Self::PlaneWave),
            _ => None,
        }
    }
}

/// A copy of the parameters which drive the distance effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceParams {
    pub distance: f64,
    pub near_field_radius: f64,
    pub rolloff: f64,
    pub air_absorption: bool,
    pub doppler: bool,
}

impl DistanceParams {
    /// The distance actually handed to the mapper.
    pub fn mapped_distance(&self) -> f64 {
        self.distance.max(MIN_MAPPED_DISTANCE_M)
    }
}

impl Default for DistanceParams {
    fn default() -> Self {
        Self {
            distance: DEFAULT_DISTANCE_M,
            near_field_radius: DEFAULT_NEAR_FIELD_RADIUS,
            rolloff: DEFAULT_ROLLOFF,
            air_absorption: false,
            doppler: false,
        }
    }
}

/// Every parameter, readable from any thread. Values are validated before
/// they are stored, so readers can use them as-is.
#[derive(Debug)]
pub struct ParameterStore {
    pub distance: AtomicF64,
    pub near_field_radius: AtomicF64,
    pub rolloff: AtomicF64,
    pub air_absorption: AtomicBool,
    pub doppler: AtomicBool,

    pub azimuth: AtomicF64,
    pub elevation: AtomicF64,
    pub source_index: AtomicU32,
    pub source_type: Atomic<SourceType>,

    /// The sample rate the processor was last prepared with.
    pub sample_rate: AtomicF64,
}

impl ParameterStore {
    pub fn snapshot(&self) -> DistanceParams {
        DistanceParams {
            distance: self.distance.lr(),
            near_field_radius: self.near_field_radius.lr(),
            rolloff: self.rolloff.lr(),
            air_absorption: self.air_absorption.lr(),
            doppler: self.doppler.lr(),
        }
    }
}

impl Default for ParameterStore {
    fn default() -> Self {
        let params = DistanceParams::default();

        Self {
            distance: AtomicF64::new(params.distance),
            near_field_radius: AtomicF64::new(params.near_field_radius),
            rolloff: AtomicF64::new(params.rolloff),
            air_absorption: AtomicBool::new(params.air_absorption),
            doppler: AtomicBool::new(params.doppler),

            azimuth: AtomicF64::new(AZIMUTH_RANGE.0),
            elevation: AtomicF64::new(0.0),
            source_index: AtomicU32::new(SOURCE_INDEX_RANGE.0),
            source_type: Atomic::new(SourceType::default()),

            sample_rate: AtomicF64::new(DEFAULT_SAMPLE_RATE),
        }
    }
}

/// Checks that `value` is finite and inside `range`, inclusive.
///
/// # Errors
///
/// Returns `Error::InvalidParameter` naming `name` otherwise.
pub fn check_range(name: &'static str, value: f64, range: (f64, f64)) -> Result<f64> {
    if value.is_finite() && (range.0..=range.1).contains(&value) {
        Ok(value)
    }
    else {
        Err(Error::InvalidParameter { name, value })
    }
}

/// Checks a source distance against `max_distance`.
///
/// # Errors
///
/// `Error::InvalidDistance` for negative or non-finite distances, and
/// `Error::DistanceOutOfRange` for distances beyond `max_distance`.
pub fn check_distance(distance: f64, max_distance: f64) -> Result<f64> {
    if !(distance.is_finite() && distance >= 0.0) {
        return Err(Error::InvalidDistance(distance));
    }
    if distance > max_distance {
        return Err(Error::DistanceOutOfRange { distance, max: max_distance });
    }

    Ok(distance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_defaults_match_parameter_defaults() {
        let store = ParameterStore::default();

        assert_eq!(store.snapshot(), DistanceParams::default());
        assert_eq!(store.source_type.lr(), SourceType::Point);
        assert_eq!(store.source_index.lr(), 1);
    }

    #[test]
    fn mapped_distance_is_floored() {
        let params = DistanceParams { distance: 0.0, ..Default::default() };

        assert_eq!(params.mapped_distance(), MIN_MAPPED_DISTANCE_M);
    }

    #[test]
    fn source_type_host_values() {
        assert_eq!(SourceType::from_host_value(1), Some(SourceType::Point));
        assert_eq!(SourceType::from_host_value(2), Some(SourceType::PlaneWave));
        assert_eq!(SourceType::from_host_value(3), None);
        assert_eq!(SourceType::PlaneWave.index(), 1);
    }

    #[test]
    fn distance_checks() {
        assert_eq!(check_distance(300.0, 300.0), Ok(300.0));
        assert_eq!(
            check_distance(300.5, 300.0),
            Err(Error::DistanceOutOfRange { distance: 300.5, max: 300.0 })
        );
        assert_eq!(check_distance(-1.0, 300.0), Err(Error::InvalidDistance(-1.0)));
        assert!(check_distance(f64::NAN, 300.0).is_err());
    }

    #[test]
    fn range_checks() {
        assert_eq!(check_range("rolloff", 0.0, ROLLOFF_RANGE), Ok(0.0));
        assert!(check_range("rolloff", 10.5, ROLLOFF_RANGE).is_err());
        assert!(check_range("rolloff", f64::INFINITY, ROLLOFF_RANGE).is_err());
    }
}
