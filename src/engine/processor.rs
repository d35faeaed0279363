//! The audio-thread half of the distance effect.

use super::chain::{ChainState, ChainTargets, SignalChain};
use super::mapper::DistanceParameterMapper;
use super::params::ParameterStore;
use crate::prelude::*;
use std::sync::{Arc, Mutex, PoisonError};

/// Something that happened on the audio thread which the control thread
/// should know about.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChainEvent {
    /// A delay read fell outside the delay line and was clamped.
    DelayClamped { requested: f64, max: f64 },
}

/// What the audio thread last processed with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainTelemetry {
    pub state: ChainState,
    pub targets: ChainTargets,
}

/// Processes audio with the latest targets published by the matching
/// [`DistanceControl`](super::DistanceControl).
///
/// Nothing in here allocates, blocks or logs, except
/// [`prepare()`](Self::prepare).
pub struct DistanceProcessor {
    chain: SignalChain,

    store: Arc<ParameterStore>,
    mapper: Arc<Mutex<DistanceParameterMapper>>,

    targets: triple_buffer::Output<ChainTargets>,
    telemetry: triple_buffer::Input<ChainTelemetry>,
    events: CCSender<ChainEvent>,

    max_block_size: usize,
}

impl DistanceProcessor {
    pub(super) fn new(
        chain: SignalChain,
        store: Arc<ParameterStore>,
        mapper: Arc<Mutex<DistanceParameterMapper>>,
        targets: triple_buffer::Output<ChainTargets>,
        telemetry: triple_buffer::Input<ChainTelemetry>,
        events: CCSender<ChainEvent>,
    ) -> Self {
        Self {
            chain,
            store,
            mapper,
            targets,
            telemetry,
            events,
            max_block_size: DEFAULT_BLOCK_SIZE,
        }
    }

    /// Prepares for processing at `sample_rate`, in blocks of up to
    /// `max_block_size` frames. Every smoother starts at its target, so the
    /// first block does not glide.
    ///
    /// # Errors
    ///
    /// Fails if `sample_rate` is not a positive finite number or
    /// `max_block_size` is zero. The processor is left untouched.
    ///
    /// # Safety
    ///
    /// This reallocates the delay lines, so you should not call this on the
    /// audio thread or in real-time usage.
    pub fn prepare(&mut self, sample_rate: f64, max_block_size: usize) -> Result<()> {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(Error::InvalidSampleRate(sample_rate));
        }
        if max_block_size == 0 {
            return Err(Error::InvalidParameter {
                name: "max_block_size",
                value: 0.0,
            });
        }

        let params = self.store.snapshot();
        let (effects, max_delay) = {
            let mapper = self.mapper.lock().unwrap_or_else(PoisonError::into_inner);

            (
                mapper.targets(&params, sample_rate),
                mapper.max_delay_samples(sample_rate),
            )
        };

        let targets = ChainTargets::new(
            effects,
            params.air_absorption,
            params.doppler,
            sample_rate,
        );

        self.chain.prepare(&targets, max_delay);
        self.max_block_size = max_block_size;
        self.store.sample_rate.sr(sample_rate);
        self.publish_telemetry();

        log::info!(
            "prepared at {sample_rate} Hz, blocks of {max_block_size}, up to {max_delay:.1} samples of delay"
        );

        Ok(())
    }

    /// Clears the delay lines and filters, and snaps every smoother to its
    /// target. Does not allocate.
    pub fn reset(&mut self) {
        self.chain.reset();
        self.publish_telemetry();
    }

    /// Processes planar stereo in place. If the channels differ in length,
    /// only the shorter length is processed.
    pub fn process_block(&mut self, left: &mut [f64], right: &mut [f64]) {
        let len = left.len().min(right.len());
        let mut block_start = 0;

        while block_start < len {
            let block_end = (block_start + self.max_block_size).min(len);

            self.pull_targets();
            self.chain.process_block(
                &mut left[block_start..block_end],
                &mut right[block_start..block_end],
            );

            block_start = block_end;
        }

        self.finish_block();
    }

    /// Processes interleaved stereo in place. A trailing partial frame is
    /// left untouched.
    pub fn process_interleaved(&mut self, buffer: &mut [f64]) {
        for block in buffer.chunks_mut(self.max_block_size * NUM_CHANNELS) {
            self.pull_targets();

            for frame in block.chunks_exact_mut(NUM_CHANNELS) {
                (frame[0], frame[1]) = self.chain.process_frame(frame[0], frame[1]);
            }
        }

        self.finish_block();
    }

    pub fn sample_rate(&self) -> f64 {
        self.chain.sample_rate()
    }

    pub fn max_block_size(&self) -> usize {
        self.max_block_size
    }

    /// Retargets the chain if new targets for the current sample rate have
    /// been published.
    fn pull_targets(&mut self) {
        if !self.targets.updated() {
            return;
        }

        let targets = *self.targets.read();

        // targets computed for another sample rate are stale
        if eps_eq(targets.sample_rate, self.chain.sample_rate()) {
            self.chain.set_targets(&targets);
        }
    }

    fn finish_block(&mut self) {
        if let Some((requested, max)) = self.chain.take_delay_overrun() {
            // a full queue already tells the control thread what it needs
            _ = self.events.try_send(ChainEvent::DelayClamped { requested, max });
        }

        self.publish_telemetry();
    }

    fn publish_telemetry(&mut self) {
        self.telemetry.write(ChainTelemetry {
            state: self.chain.state(),
            targets: self.chain.targets(),
        });
    }
}
