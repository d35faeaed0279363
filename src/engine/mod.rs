//! The distance effect: a control-thread half which maps parameters to
//! targets, and an audio-thread half which runs the signal chain.
//!
//! ```text
//!  DistanceControl ── targets (triple buffer) ──▶ DistanceProcessor
//!         ▲ ◀──────── telemetry (triple buffer) ──────┘ │
//!         └────────── events (bounded channel) ─────────┘
//! ```

use crate::config::DistanceConfig;
use crate::prelude::*;
use std::sync::{Arc, Mutex};
use triple_buffer::triple_buffer;

pub mod chain;
pub mod control;
pub mod mapper;
pub mod metadata;
pub mod params;
pub mod processor;

pub use chain::{ChainState, ChainTargets, SignalChain};
pub use control::DistanceControl;
pub use mapper::{DistanceEffectTargets, DistanceParameterMapper};
pub use metadata::SourceMetadata;
pub use params::{DistanceParams, ParameterStore, SourceType};
pub use processor::{ChainEvent, ChainTelemetry, DistanceProcessor};

/// Builds a connected control/processor pair for `config`. The processor is
/// usable straight away at [`DEFAULT_SAMPLE_RATE`], but should be
/// [prepared](DistanceProcessor::prepare) for the host's sample rate first.
///
/// # Errors
///
/// Fails if `config` does not validate.
pub fn distance_processor(
    config: &DistanceConfig,
) -> Result<(DistanceControl, DistanceProcessor)> {
    let mapper = DistanceParameterMapper::new(config).map_err(|err| {
        log::warn!("rejected distance configuration: {err}");
        err
    })?;
    let store = Arc::new(ParameterStore::default());

    let params = store.snapshot();
    let sample_rate = store.sample_rate.lr();
    let targets = ChainTargets::new(
        mapper.targets(&params, sample_rate),
        params.air_absorption,
        params.doppler,
        sample_rate,
    );

    let chain = SignalChain::new(
        &config.smoothing,
        config.delay_interpolation,
        &targets,
        mapper.max_delay_samples(sample_rate),
    );

    Ok(connect(chain, mapper, store, targets))
}

/// Wires both halves together around `chain`, which should be resting at
/// `targets`.
fn connect(
    chain: SignalChain,
    mapper: DistanceParameterMapper,
    store: Arc<ParameterStore>,
    targets: ChainTargets,
) -> (DistanceControl, DistanceProcessor) {
    let telemetry = ChainTelemetry { state: chain.state(), targets };

    let (targets_in, targets_out) = triple_buffer(&targets);
    let (telemetry_in, telemetry_out) = triple_buffer(&telemetry);
    let (event_tx, event_rx) = bounded_channel(CHAIN_EVENT_QUEUE_SIZE);

    let mapper = Arc::new(Mutex::new(mapper));

    let control = DistanceControl::new(
        Arc::clone(&store),
        Arc::clone(&mapper),
        targets_in,
        telemetry_out,
        event_rx,
        targets,
    );
    let processor = DistanceProcessor::new(
        chain,
        store,
        mapper,
        targets_out,
        telemetry_in,
        event_tx,
    );

    (control, processor)
}
