//! Atmospheric sound absorption.
//!
//! Models the attenuation of sound in air from molecular relaxation of oxygen
//! and nitrogen plus classical (viscous) absorption, after ISO 9613-1, and
//! solves for the frequency at which a given distance of air has attenuated
//! the signal by a target amount. That frequency is used as the cutoff of a
//! one-pole lowpass, following
//! <https://computingandrecording.wordpress.com/2017/07/05/approximating-atmospheric-absorption-with-a-simple-filter/>.

use crate::prelude::*;
use serde::{Deserialize, Serialize};

pub mod solver;

pub use solver::CutoffSolution;

/// Converts nepers to decibels (`20 / ln 10`).
const NEPER_TO_DB: f64 = 8.686;

/// The air the sound travels through.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtmosphericCondition {
    /// Relative humidity, `0` to `100`.
    pub humidity_percent: f64,
    /// Air temperature in degrees Celsius.
    pub temperature_celsius: f64,
    /// Static air pressure in pascals.
    pub pressure_pa: f64,
}

impl AtmosphericCondition {
    /// Returns a validated `AtmosphericCondition`.
    ///
    /// # Errors
    ///
    /// Fails if any field is out of range; see
    /// [`validate()`](Self::validate).
    pub fn new(
        humidity_percent: f64,
        temperature_celsius: f64,
        pressure_pa: f64,
    ) -> Result<Self> {
        let condition =
            Self { humidity_percent, temperature_celsius, pressure_pa };
        condition.validate()?;

        Ok(condition)
    }

    /// Checks that humidity lies in `[0, 100]`, that the temperature is above
    /// absolute zero, and that the pressure is positive.
    ///
    /// # Errors
    ///
    /// Returns the matching `Error::Invalid*` variant for the first field
    /// which is out of range.
    pub fn validate(&self) -> Result<()> {
        let Self { humidity_percent, temperature_celsius, pressure_pa } = *self;

        if !(0.0..=100.0).contains(&humidity_percent) {
            return Err(Error::InvalidHumidity(humidity_percent));
        }
        if !temperature_celsius.is_finite()
            || celsius_to_kelvin(temperature_celsius) <= 0.0
        {
            return Err(Error::InvalidTemperature(temperature_celsius));
        }
        if !(pressure_pa.is_finite() && pressure_pa > 0.0) {
            return Err(Error::InvalidPressure(pressure_pa));
        }

        Ok(())
    }
}

impl Default for AtmosphericCondition {
    fn default() -> Self {
        Self {
            humidity_percent: REFERENCE_HUMIDITY_PERCENT,
            temperature_celsius: REFERENCE_TEMPERATURE_C,
            pressure_pa: SEA_LEVEL_PRESSURE_PA,
        }
    }
}

/// Everything the absorption coefficient needs, derived from an
/// [`AtmosphericCondition`]. Always computed as a whole.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbsorptionState {
    /// Nitrogen relaxation frequency in Hz.
    pub nitrogen_relax_freq: f64,
    /// Oxygen relaxation frequency in Hz.
    pub oxygen_relax_freq: f64,
    /// Classical absorption factor.
    pub classical: f64,
    /// Oxygen relaxation factor.
    pub oxygen: f64,
    /// Nitrogen relaxation factor.
    pub nitrogen: f64,
}

impl AbsorptionState {
    /// Derives the model state for `condition`. The condition is assumed to
    /// have been validated.
    pub fn from_condition(condition: &AtmosphericCondition) -> Self {
        let temperature_k = celsius_to_kelvin(condition.temperature_celsius);
        let temp_normalized = temperature_k / REFERENCE_AIR_TEMPERATURE_K;
        let pressure_normalized =
            condition.pressure_pa / SEA_LEVEL_PRESSURE_PA;

        let concentration = humidity_concentration(
            condition.humidity_percent,
            temperature_k,
            pressure_normalized,
        );

        let relax_scale = temp_normalized.powf(-2.5);

        Self {
            nitrogen_relax_freq: nitrogen_relaxation_frequency(
                concentration,
                temp_normalized,
                pressure_normalized,
            ),
            oxygen_relax_freq: oxygen_relaxation_frequency(
                concentration,
                pressure_normalized,
            ),
            classical: 1.84e-11 / pressure_normalized * temp_normalized.sqrt(),
            oxygen: relax_scale * 0.01275 * (-2239.1 / temperature_k).exp(),
            nitrogen: relax_scale * 0.1068 * (-3352.0 / temperature_k).exp(),
        }
    }
}

/// The molar concentration of water vapour in percent, from relative
/// humidity and the saturation vapour pressure at `temperature_k`.
pub fn humidity_concentration(
    humidity_percent: f64,
    temperature_k: f64,
    pressure_normalized: f64,
) -> f64 {
    let exponent = -6.8346
        * (TRIPLE_POINT_TEMPERATURE_K / temperature_k).powf(1.261)
        + 4.6151;
    let saturation_pressure = 10.0f64.powf(exponent);

    humidity_percent * saturation_pressure / pressure_normalized
}

/// The nitrogen relaxation frequency in Hz.
pub fn nitrogen_relaxation_frequency(
    humidity_concentration: f64,
    temp_normalized: f64,
    pressure_normalized: f64,
) -> f64 {
    let vapour = 280.0
        * humidity_concentration
        * (-4.170 * (temp_normalized.powf(-1.0 / 3.0) - 1.0)).exp();

    pressure_normalized / temp_normalized.sqrt() * (9.0 + vapour)
}

/// The oxygen relaxation frequency in Hz.
pub fn oxygen_relaxation_frequency(
    humidity_concentration: f64,
    pressure_normalized: f64,
) -> f64 {
    let h = humidity_concentration;

    pressure_normalized * (24.0 + 4.04e4 * h * (0.02 + h) / (0.391 + h))
}

/// The absorption model for one atmospheric condition.
#[derive(Debug, Clone, PartialEq)]
pub struct AbsorptionModel {
    condition: AtmosphericCondition,
    state: AbsorptionState,
}

impl AbsorptionModel {
    /// Returns a model configured for `condition`.
    ///
    /// # Errors
    ///
    /// Fails if `condition` does not validate.
    pub fn new(condition: AtmosphericCondition) -> Result<Self> {
        condition.validate()?;

        Ok(Self { state: AbsorptionState::from_condition(&condition), condition })
    }

    /// Reconfigures the model. On error, the previous configuration is kept.
    ///
    /// # Errors
    ///
    /// Fails if humidity is outside `[0, 100]`, the temperature is at or
    /// below absolute zero, or the pressure is not positive.
    pub fn configure(
        &mut self,
        humidity_percent: f64,
        temperature_celsius: f64,
        pressure_pa: f64,
    ) -> Result<()> {
        self.set_condition(AtmosphericCondition {
            humidity_percent,
            temperature_celsius,
            pressure_pa,
        })
    }

    /// Reconfigures the model from `condition`. On error, the previous
    /// configuration is kept.
    ///
    /// # Errors
    ///
    /// Fails if `condition` does not validate.
    pub fn set_condition(&mut self, condition: AtmosphericCondition) -> Result<()> {
        condition.validate()?;

        self.state = AbsorptionState::from_condition(&condition);
        self.condition = condition;

        Ok(())
    }

    /// Returns the current atmospheric condition.
    pub fn condition(&self) -> AtmosphericCondition {
        self.condition
    }

    /// Returns the state derived from the current condition.
    pub fn state(&self) -> AbsorptionState {
        self.state
    }

    /// The absorption coefficient at `frequency_hz`, in dB per metre.
    pub fn absorption_coefficient(&self, frequency_hz: f64) -> f64 {
        let AbsorptionState {
            nitrogen_relax_freq: fr_n,
            oxygen_relax_freq: fr_o,
            classical,
            oxygen,
            nitrogen,
        } = self.state;
        let f2 = frequency_hz * frequency_hz;

        NEPER_TO_DB
            * f2
            * (classical
                + oxygen / (fr_o + f2 / fr_o)
                + nitrogen / (fr_n + f2 / fr_n))
    }

    /// The total attenuation at `frequency_hz` after `distance_m` metres of
    /// air, in dB.
    pub fn attenuation_db(&self, frequency_hz: f64, distance_m: f64) -> f64 {
        self.absorption_coefficient(frequency_hz) * distance_m
    }

    /// Finds the lowest audible frequency at which `distance_m` metres of air
    /// attenuate by `target_db`. See [`solver`] for the boundary policy.
    ///
    /// # Errors
    ///
    /// Fails if `distance_m` is negative or not finite, or if `target_db` is
    /// not a positive finite number.
    pub fn solve_cutoff(
        &self,
        distance_m: f64,
        target_db: f64,
    ) -> Result<CutoffSolution> {
        self.solve_cutoff_in_band(
            distance_m,
            target_db,
            AUDIBLE_MIN_HZ,
            AUDIBLE_MAX_HZ,
        )
    }

    /// Like [`solve_cutoff()`](Self::solve_cutoff), but searches
    /// `[min_hz, max_hz]` instead of the audible band.
    ///
    /// # Errors
    ///
    /// As for [`solve_cutoff()`](Self::solve_cutoff).
    ///
    /// # Panics
    ///
    /// Panics if the band is empty or not strictly positive.
    pub fn solve_cutoff_in_band(
        &self,
        distance_m: f64,
        target_db: f64,
        min_hz: f64,
        max_hz: f64,
    ) -> Result<CutoffSolution> {
        if !(distance_m.is_finite() && distance_m >= 0.0) {
            return Err(Error::InvalidDistance(distance_m));
        }
        if !(target_db.is_finite() && target_db > 0.0) {
            return Err(Error::InvalidAttenuation(target_db));
        }

        Ok(solver::solve_first_crossing(
            |f| self.attenuation_db(f, distance_m),
            target_db,
            min_hz,
            max_hz,
        ))
    }
}

impl Default for AbsorptionModel {
    fn default() -> Self {
        let condition = AtmosphericCondition::default();

        Self { state: AbsorptionState::from_condition(&condition), condition }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn reference_model() -> AbsorptionModel {
        AbsorptionModel::default()
    }

    #[test]
    fn relaxation_frequencies_at_reference_condition() {
        let state = reference_model().state();

        assert_relative_eq!(state.nitrogen_relax_freq, 331.85, max_relative = 1e-3);
        assert_relative_eq!(state.oxygen_relax_freq, 35413.86, max_relative = 1e-3);
    }

    #[test]
    fn coefficient_matches_reference_table() {
        // 20 °C, 50 % RH, sea level: roughly 4.7 dB/km at 1 kHz, 105 dB/km
        // at 8 kHz
        let model = reference_model();

        assert_relative_eq!(
            model.absorption_coefficient(1000.0) * 1000.0,
            4.66,
            max_relative = 1e-2
        );
        assert_relative_eq!(
            model.absorption_coefficient(8000.0) * 1000.0,
            105.3,
            max_relative = 1e-2
        );
        assert_eq!(model.absorption_coefficient(0.0), 0.0);
    }

    #[test]
    fn invalid_humidity_keeps_previous_configuration() {
        let mut model = reference_model();
        model.configure(80.0, 10.0, 90_000.0).unwrap();
        let before = model.clone();

        assert_eq!(
            model.configure(100.5, 20.0, SEA_LEVEL_PRESSURE_PA),
            Err(Error::InvalidHumidity(100.5))
        );
        assert!(model.configure(-1.0, 20.0, SEA_LEVEL_PRESSURE_PA).is_err());
        assert_eq!(model, before);
    }

    #[test]
    fn rejects_unphysical_temperature_and_pressure() {
        assert!(matches!(
            AtmosphericCondition::new(50.0, -300.0, SEA_LEVEL_PRESSURE_PA),
            Err(Error::InvalidTemperature(_))
        ));
        assert!(matches!(
            AtmosphericCondition::new(50.0, 20.0, 0.0),
            Err(Error::InvalidPressure(_))
        ));
        assert!(AtmosphericCondition::new(f64::NAN, 20.0, 1.0).is_err());
    }

    #[test]
    fn reconfiguring_changes_every_state_field() {
        let mut model = reference_model();
        let before = model.state();
        model.configure(10.0, 35.0, 80_000.0).unwrap();
        let after = model.state();

        assert_ne!(before.nitrogen_relax_freq, after.nitrogen_relax_freq);
        assert_ne!(before.oxygen_relax_freq, after.oxygen_relax_freq);
        assert_ne!(before.classical, after.classical);
        assert_ne!(before.oxygen, after.oxygen);
        assert_ne!(before.nitrogen, after.nitrogen);
    }

    #[test]
    fn solve_300m_3db_lands_below_the_ceiling() {
        let model = reference_model();
        let solution = model.solve_cutoff(300.0, 3.0).unwrap();
        let sample_rate = 48000.0;
        let clamped = solution
            .frequency()
            .clamp(MIN_CUTOFF_HZ, MAX_CUTOFF_RATIO * sample_rate);

        assert!(matches!(solution, CutoffSolution::Root { .. }));
        assert_relative_eq!(solution.frequency(), 2016.76, max_relative = 1e-3);
        assert!(clamped < AUDIBLE_MAX_HZ);
        assert!(clamped >= MIN_CUTOFF_HZ);
    }

    #[test]
    fn zero_distance_needs_no_filtering() {
        let solution = reference_model().solve_cutoff(0.0, 3.0).unwrap();

        assert_eq!(solution, CutoffSolution::Unreachable { frequency_hz: AUDIBLE_MAX_HZ });
    }

    #[test]
    fn short_distance_is_unreachable() {
        // 1 m of air only absorbs ~0.5 dB at 20 kHz
        let solution = reference_model().solve_cutoff(1.0, 3.0).unwrap();

        assert_eq!(solution.frequency(), AUDIBLE_MAX_HZ);
    }

    #[test]
    fn huge_distance_saturates_at_the_bottom_of_the_band() {
        let solution = reference_model().solve_cutoff(1.0e9, 3.0).unwrap();

        assert_eq!(solution, CutoffSolution::Saturated { frequency_hz: AUDIBLE_MIN_HZ });
    }

    #[test]
    fn invalid_solver_inputs_are_rejected() {
        let model = reference_model();

        assert!(matches!(model.solve_cutoff(-1.0, 3.0), Err(Error::InvalidDistance(_))));
        assert!(matches!(model.solve_cutoff(10.0, 0.0), Err(Error::InvalidAttenuation(_))));
        assert!(model.solve_cutoff(f64::INFINITY, 3.0).is_err());
    }

    proptest! {
        #[test]
        fn coefficient_is_finite_and_non_negative(
            humidity in 0.0f64..=100.0,
            temperature in -40.0f64..50.0,
            pressure in 50_000.0f64..110_000.0,
            f1 in AUDIBLE_MIN_HZ..AUDIBLE_MAX_HZ,
            f2 in AUDIBLE_MIN_HZ..AUDIBLE_MAX_HZ,
        ) {
            let model = AbsorptionModel::new(
                AtmosphericCondition::new(humidity, temperature, pressure).unwrap()
            ).unwrap();

            for f in [f1.min(f2), f1.max(f2)] {
                let alpha = model.absorption_coefficient(f);
                prop_assert!(alpha.is_finite());
                prop_assert!(alpha >= 0.0);
            }
        }

        #[test]
        fn solved_cutoff_reproduces_target(
            humidity in 0.0f64..=100.0,
            temperature in -20.0f64..40.0,
            distance in 0.0f64..2000.0,
            target in 0.1f64..30.0,
        ) {
            let model = AbsorptionModel::new(
                AtmosphericCondition::new(humidity, temperature, SEA_LEVEL_PRESSURE_PA).unwrap()
            ).unwrap();
            let solution = model.solve_cutoff(distance, target).unwrap();
            let f = solution.frequency();

            prop_assert!(f.is_finite());
            prop_assert!((AUDIBLE_MIN_HZ..=AUDIBLE_MAX_HZ).contains(&f));

            if let CutoffSolution::Root { .. } = solution {
                let attenuation = model.attenuation_db(f, distance);
                prop_assert!((attenuation - target).abs() < 1e-6);
            }
        }
    }
}
