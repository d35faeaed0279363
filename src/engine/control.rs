//! The control-thread half of the distance effect.

use super::chain::ChainTargets;
use super::mapper::{DistanceEffectTargets, DistanceParameterMapper};
use super::metadata::SourceMetadata;
use super::params::{check_distance, check_range, ParameterStore, SourceType};
use super::processor::{ChainEvent, ChainTelemetry};
use crate::dsp::AtmosphericCondition;
use crate::prelude::*;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Validates parameter changes, maps them to targets and publishes those to
/// the matching [`DistanceProcessor`](super::DistanceProcessor).
///
/// Every setter either applies its value and republishes, or returns an
/// error and changes nothing.
pub struct DistanceControl {
    store: Arc<ParameterStore>,
    mapper: Arc<Mutex<DistanceParameterMapper>>,

    targets: triple_buffer::Input<ChainTargets>,
    telemetry: triple_buffer::Output<ChainTelemetry>,
    events: CCReceiver<ChainEvent>,

    /// The last targets handed to the processor.
    published: ChainTargets,
}

impl DistanceControl {
    pub(super) fn new(
        store: Arc<ParameterStore>,
        mapper: Arc<Mutex<DistanceParameterMapper>>,
        targets: triple_buffer::Input<ChainTargets>,
        telemetry: triple_buffer::Output<ChainTelemetry>,
        events: CCReceiver<ChainEvent>,
        published: ChainTargets,
    ) -> Self {
        Self { store, mapper, targets, telemetry, events, published }
    }

    /// Sets the source distance in metres. Updates volume, cutoff and delay.
    ///
    /// # Errors
    ///
    /// `Error::InvalidDistance` if `distance` is negative or not finite, and
    /// `Error::DistanceOutOfRange` if it is beyond the maximum distance.
    pub fn set_distance(&mut self, distance: f64) -> Result<()> {
        let max = self.mapper().max_distance();
        let distance = check_distance(distance, max).map_err(rejected)?;

        self.store.distance.sr(distance);
        self.recompute_all();

        Ok(())
    }

    /// Sets the near-field radius in metres. Updates volume only.
    ///
    /// # Errors
    ///
    /// `Error::InvalidParameter` if `radius` is outside
    /// [`NEAR_FIELD_RADIUS_RANGE`].
    pub fn set_near_field_radius(&mut self, radius: f64) -> Result<()> {
        let radius = check_range("near_field_radius", radius, NEAR_FIELD_RADIUS_RANGE)
            .map_err(rejected)?;

        self.store.near_field_radius.sr(radius);
        self.recompute_volume();

        Ok(())
    }

    /// Sets the rolloff exponent. Updates volume only.
    ///
    /// # Errors
    ///
    /// `Error::InvalidParameter` if `rolloff` is outside [`ROLLOFF_RANGE`].
    pub fn set_rolloff(&mut self, rolloff: f64) -> Result<()> {
        let rolloff =
            check_range("rolloff", rolloff, ROLLOFF_RANGE).map_err(rejected)?;

        self.store.rolloff.sr(rolloff);
        self.recompute_volume();

        Ok(())
    }

    pub fn set_air_absorption(&mut self, enabled: bool) {
        self.store.air_absorption.sr(enabled);

        if self.sample_rate_changed() {
            self.recompute_all();
            return;
        }

        self.published.air_absorption = if enabled { 1.0 } else { 0.0 };
        self.publish();
    }

    pub fn set_doppler(&mut self, enabled: bool) {
        self.store.doppler.sr(enabled);

        if self.sample_rate_changed() {
            self.recompute_all();
            return;
        }

        self.published.doppler = if enabled { 1.0 } else { 0.0 };
        self.publish();
    }

    /// Reconfigures the air the absorption filter is modelled on, and updates
    /// the cutoff.
    ///
    /// # Errors
    ///
    /// Fails if `condition` does not validate. The previous air is kept.
    pub fn set_atmosphere(&mut self, condition: AtmosphericCondition) -> Result<()> {
        self.mapper().set_atmosphere(condition).map_err(rejected)?;
        self.recompute_all();

        Ok(())
    }

    /// Sets the source azimuth in degrees, `0` in front and clockwise.
    ///
    /// # Errors
    ///
    /// `Error::InvalidParameter` outside [`AZIMUTH_RANGE`].
    pub fn set_azimuth(&mut self, azimuth: f64) -> Result<()> {
        let azimuth = check_range("azimuth", azimuth, AZIMUTH_RANGE).map_err(rejected)?;
        self.store.azimuth.sr(azimuth);

        Ok(())
    }

    /// # Errors
    ///
    /// `Error::InvalidParameter` outside [`ELEVATION_RANGE`].
    pub fn set_elevation(&mut self, elevation: f64) -> Result<()> {
        let elevation =
            check_range("elevation", elevation, ELEVATION_RANGE).map_err(rejected)?;
        self.store.elevation.sr(elevation);

        Ok(())
    }

    /// # Errors
    ///
    /// `Error::InvalidParameter` outside [`SOURCE_INDEX_RANGE`].
    pub fn set_source_index(&mut self, index: u32) -> Result<()> {
        let (min, max) = SOURCE_INDEX_RANGE;

        if !(min..=max).contains(&index) {
            return Err(rejected(Error::InvalidParameter {
                name: "source_index",
                value: f64::from(index),
            }));
        }

        self.store.source_index.sr(index);

        Ok(())
    }

    pub fn set_source_type(&mut self, source_type: SourceType) {
        self.store.source_type.sr(source_type);
    }

    /// Routine upkeep, to be called regularly from the control thread.
    /// Republishes the targets if the processor has been prepared at a new
    /// sample rate, and drains and logs audio-thread events, returning them.
    pub fn poll(&mut self) -> Vec<ChainEvent> {
        if self.sample_rate_changed() {
            self.recompute_all();
        }

        let events: Vec<ChainEvent> = self.events.try_iter().collect();

        for event in &events {
            match event {
                ChainEvent::DelayClamped { requested, max } => {
                    log::warn!(
                        "delay read of {requested:.2} samples was clamped to the delay line (max {max:.2})"
                    );
                }
            }
        }

        events
    }

    /// The latest state reported by the processor.
    pub fn telemetry(&mut self) -> ChainTelemetry {
        *self.telemetry.read()
    }

    /// The targets last handed to the processor.
    pub fn targets(&self) -> ChainTargets {
        self.published
    }

    pub fn atmosphere(&self) -> AtmosphericCondition {
        self.mapper().atmosphere()
    }

    pub fn parameters(&self) -> &ParameterStore {
        &self.store
    }

    /// What the downstream renderer needs to know about the source.
    pub fn metadata(&self) -> SourceMetadata {
        SourceMetadata::from_store(&self.store, self.published.effects.volume)
    }

    fn recompute_all(&mut self) {
        let params = self.store.snapshot();
        let sample_rate = self.store.sample_rate.lr();
        let effects = self.mapper().targets(&params, sample_rate);

        self.published =
            ChainTargets::new(effects, params.air_absorption, params.doppler, sample_rate);

        log_targets(&effects);
        self.publish();
    }

    fn recompute_volume(&mut self) {
        if self.sample_rate_changed() {
            self.recompute_all();
            return;
        }

        let params = self.store.snapshot();
        let volume = self.mapper().target_volume(
            params.mapped_distance(),
            params.near_field_radius,
            params.rolloff,
        );

        self.published.effects.volume = volume;

        log_targets(&self.published.effects);
        self.publish();
    }

    /// Whether the processor has been prepared at a rate the published
    /// targets were not computed for.
    fn sample_rate_changed(&self) -> bool {
        !eps_eq(self.store.sample_rate.lr(), self.published.sample_rate)
    }

    fn publish(&mut self) {
        self.targets.write(self.published);
    }

    fn mapper(&self) -> MutexGuard<'_, DistanceParameterMapper> {
        self.mapper.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn log_targets(targets: &DistanceEffectTargets) {
    log::debug!(
        "volume {:.4}, cutoff {:.1} Hz, delay {:.2} samples",
        targets.volume,
        targets.cutoff_hz,
        targets.delay_samples
    );
}

fn rejected(err: Error) -> Error {
    log::warn!("rejected parameter change: {err}");
    err
}
