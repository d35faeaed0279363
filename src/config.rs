//! Loadable configuration for the distance effect.
//!
//! Every field has a default, so a configuration file only needs to name what
//! it changes:
//!
//! ```json
//! {
//!     "atmosphere": { "humidity_percent": 30.0 },
//!     "smoothing": { "delay_ms": 250.0, "law": "cosine" }
//! }
//! ```

use crate::dsp::AtmosphericCondition;
use crate::prelude::*;
use serde::{Deserialize, Serialize};

/// Ramp lengths and interpolation law of the signal chain's smoothers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    pub amplitude_ms: f64,
    pub cutoff_ms: f64,
    pub delay_ms: f64,
    /// Crossfade time of the air absorption and Doppler switches.
    pub toggle_ms: f64,
    /// The law used by the amplitude, cutoff and delay smoothers. The toggle
    /// crossfades are always linear.
    pub law: SmoothingType,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            amplitude_ms: AMPLITUDE_SMOOTHING_MS,
            cutoff_ms: CUTOFF_SMOOTHING_MS,
            delay_ms: DELAY_SMOOTHING_MS,
            toggle_ms: TOGGLE_SMOOTHING_MS,
            law: SmoothingType::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistanceConfig {
    /// The air the absorption filter is modelled on.
    pub atmosphere: AtmosphericCondition,
    /// The attenuation, in dB, at which the absorption cutoff is placed.
    pub reference_attenuation_db: f64,
    pub speed_of_sound_mps: f64,
    /// The furthest accepted source distance. Also sizes the delay lines.
    pub max_distance_m: f64,
    /// How the Doppler delay lines read between samples.
    pub delay_interpolation: InterpType,
    pub smoothing: SmoothingConfig,
}

impl DistanceConfig {
    /// Parses a configuration from JSON, filling in defaults for missing
    /// fields, and validates it.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the JSON is malformed, or the matching
    /// validation error otherwise.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;

        Ok(config)
    }

    /// Checks every field.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<()> {
        self.atmosphere.validate()?;

        let Self {
            reference_attenuation_db,
            speed_of_sound_mps,
            max_distance_m,
            smoothing,
            ..
        } = *self;

        if !(reference_attenuation_db.is_finite() && reference_attenuation_db > 0.0) {
            return Err(Error::InvalidAttenuation(reference_attenuation_db));
        }
        if !(speed_of_sound_mps.is_finite() && speed_of_sound_mps > 0.0) {
            return Err(Error::InvalidParameter {
                name: "speed_of_sound_mps",
                value: speed_of_sound_mps,
            });
        }
        if !(max_distance_m.is_finite() && max_distance_m > MIN_MAPPED_DISTANCE_M) {
            return Err(Error::InvalidParameter {
                name: "max_distance_m",
                value: max_distance_m,
            });
        }

        let ramps = [
            ("smoothing.amplitude_ms", smoothing.amplitude_ms),
            ("smoothing.cutoff_ms", smoothing.cutoff_ms),
            ("smoothing.delay_ms", smoothing.delay_ms),
            ("smoothing.toggle_ms", smoothing.toggle_ms),
        ];

        for (name, value) in ramps {
            if !(value.is_finite() && value >= 0.0) {
                return Err(Error::InvalidParameter { name, value });
            }
        }

        Ok(())
    }
}

impl Default for DistanceConfig {
    fn default() -> Self {
        Self {
            atmosphere: AtmosphericCondition::default(),
            reference_attenuation_db: REFERENCE_ATTENUATION_DB,
            speed_of_sound_mps: SPEED_OF_SOUND_MPS,
            max_distance_m: MAX_DISTANCE_M,
            delay_interpolation: InterpType::default(),
            smoothing: SmoothingConfig::default(),
        }
    }
}
