//! Maps the source distance to the targets of the signal chain.

use super::params::DistanceParams;
use crate::config::DistanceConfig;
use crate::dsp::{AbsorptionModel, AtmosphericCondition};
use crate::prelude::*;

/// What the signal chain should settle on for one set of parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceEffectTargets {
    /// Linear gain, `0` to `1`.
    pub volume: f64,
    /// Absorption filter cutoff in Hz.
    pub cutoff_hz: f64,
    /// Propagation delay in samples.
    pub delay_samples: f64,
}

impl DistanceEffectTargets {
    /// Targets for a source sitting on the listener: full volume, an open
    /// filter and the shortest delay.
    pub fn at_listener(sample_rate: f64) -> Self {
        Self {
            volume: 1.0,
            cutoff_hz: DEFAULT_CUTOFF_HZ.min(MAX_CUTOFF_RATIO * sample_rate),
            delay_samples: MIN_DELAY_SAMPLES,
        }
    }
}

/// Computes [`DistanceEffectTargets`]. All mappings are pure functions of
/// their arguments and the configured air.
#[derive(Debug, Clone)]
pub struct DistanceParameterMapper {
    model: AbsorptionModel,
    reference_attenuation_db: f64,
    speed_of_sound_mps: f64,
    max_distance_m: f64,
}

impl DistanceParameterMapper {
    /// # Errors
    ///
    /// Fails if `config` does not validate.
    pub fn new(config: &DistanceConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            model: AbsorptionModel::new(config.atmosphere)?,
            reference_attenuation_db: config.reference_attenuation_db,
            speed_of_sound_mps: config.speed_of_sound_mps,
            max_distance_m: config.max_distance_m,
        })
    }

    /// Inverse-distance gain with a flat near field:
    /// `(radius / distance) ^ rolloff`, where `distance` is first clamped to
    /// `[radius, max_distance]`. A rolloff of `0` disables attenuation.
    pub fn target_volume(&self, distance: f64, radius: f64, rolloff: f64) -> f64 {
        if !(radius > 0.0) {
            return if rolloff == 0.0 { 1.0 } else { 0.0 };
        }

        let clamped = distance.clamp(radius, self.max_distance_m.max(radius));
        let volume = (radius / clamped).powf(rolloff);

        finite_or_zero(volume).clamp(0.0, 1.0)
    }

    /// The absorption filter cutoff for `distance`, clamped to
    /// `[MIN_CUTOFF_HZ, MAX_CUTOFF_RATIO * sample_rate]`.
    ///
    /// # Errors
    ///
    /// Fails if `distance` is negative or not finite.
    pub fn target_cutoff(&self, distance: f64, sample_rate: f64) -> Result<f64> {
        let max_cutoff = (MAX_CUTOFF_RATIO * sample_rate).max(MIN_CUTOFF_HZ);
        let solution = self.model.solve_cutoff(distance, self.reference_attenuation_db)?;

        Ok(solution.frequency().clamp(MIN_CUTOFF_HZ, max_cutoff))
    }

    /// The propagation delay for `distance`, clamped to
    /// `[MIN_DELAY_SAMPLES, max_delay_samples()]`.
    pub fn target_delay_samples(&self, distance: f64, sample_rate: f64) -> f64 {
        let delay = finite_or_zero(distance / self.speed_of_sound_mps * sample_rate);
        let max_delay = self.max_delay_samples(sample_rate).max(MIN_DELAY_SAMPLES);

        delay.clamp(MIN_DELAY_SAMPLES, max_delay)
    }

    /// The delay needed by a source at the maximum distance, which the delay
    /// lines are sized for.
    pub fn max_delay_samples(&self, sample_rate: f64) -> f64 {
        self.max_distance_m / self.speed_of_sound_mps * sample_rate
    }

    /// All three targets for `params`. The distance is floored at
    /// `MIN_MAPPED_DISTANCE_M` and capped at the maximum distance first.
    pub fn targets(&self, params: &DistanceParams, sample_rate: f64) -> DistanceEffectTargets {
        let distance = params.mapped_distance().min(self.max_distance_m);

        // a floored and capped distance is always solvable
        let cutoff_hz = match self.target_cutoff(distance, sample_rate) {
            Ok(cutoff) => cutoff,
            Err(err) => {
                debug_assert!(false, "no cutoff for {distance} m: {err}");
                MIN_CUTOFF_HZ
            }
        };

        DistanceEffectTargets {
            volume: self.target_volume(
                distance,
                params.near_field_radius,
                params.rolloff,
            ),
            cutoff_hz,
            delay_samples: self.target_delay_samples(distance, sample_rate),
        }
    }

    /// Reconfigures the absorption model. On error, the previous air is kept.
    ///
    /// # Errors
    ///
    /// Fails if `condition` does not validate.
    pub fn set_atmosphere(&mut self, condition: AtmosphericCondition) -> Result<()> {
        self.model.set_condition(condition)
    }

    pub fn atmosphere(&self) -> AtmosphericCondition {
        self.model.condition()
    }

    pub fn max_distance(&self) -> f64 {
        self.max_distance_m
    }

    pub fn model(&self) -> &AbsorptionModel {
        &self.model
    }
}

impl Default for DistanceParameterMapper {
    fn default() -> Self {
        let config = DistanceConfig::default();

        Self {
            model: AbsorptionModel::default(),
            reference_attenuation_db: config.reference_attenuation_db,
            speed_of_sound_mps: config.speed_of_sound_mps,
            max_distance_m: config.max_distance_m,
        }
    }
}
