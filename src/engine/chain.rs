//! The per-sample distance signal chain: propagation delay, air absorption
//! and gain, each with its own smoother.

use super::mapper::DistanceEffectTargets;
use crate::config::SmoothingConfig;
use crate::dsp::{Effect, FractionalDelayLine, OnePoleLowpass, StereoWrapper};
use crate::prelude::*;

/// Everything the audio thread needs from the control thread.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainTargets {
    pub effects: DistanceEffectTargets,
    /// Air absorption switch, as a `0` to `1` crossfade weight.
    pub air_absorption: f64,
    /// Doppler switch, as a `0` to `1` crossfade weight.
    pub doppler: f64,
    /// The sample rate the targets were computed for.
    pub sample_rate: f64,
}

impl ChainTargets {
    pub fn new(
        effects: DistanceEffectTargets,
        air_absorption: bool,
        doppler: bool,
        sample_rate: f64,
    ) -> Self {
        Self {
            effects,
            air_absorption: if air_absorption { 1.0 } else { 0.0 },
            doppler: if doppler { 1.0 } else { 0.0 },
            sample_rate,
        }
    }
}

impl Default for ChainTargets {
    fn default() -> Self {
        Self::new(
            DistanceEffectTargets::at_listener(DEFAULT_SAMPLE_RATE),
            false,
            false,
            DEFAULT_SAMPLE_RATE,
        )
    }
}

/// The smoothed values the chain is currently running at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainState {
    pub volume: f64,
    pub cutoff_hz: f64,
    pub delay_samples: f64,
    pub air_absorption: f64,
    pub doppler: f64,
}

#[derive(Debug, Clone)]
pub struct SignalChain {
    volume: Smoother<f64>,
    cutoff: Smoother<f64>,
    delay: Smoother<f64>,
    air_absorption: Smoother<f64>,
    doppler: Smoother<f64>,

    delay_lines: [FractionalDelayLine; NUM_CHANNELS],
    filters: StereoWrapper<OnePoleLowpass>,

    /// The furthest out-of-range delay read since the last call to
    /// `take_delay_overrun()`.
    delay_overrun: Option<(f64, f64)>,

    sample_rate: f64,
}

impl SignalChain {
    /// Builds a chain resting at `targets`, with delay lines long enough for
    /// `max_delay_samples`.
    pub fn new(
        smoothing: &SmoothingConfig,
        interpolation: InterpType,
        targets: &ChainTargets,
        max_delay_samples: f64,
    ) -> Self {
        let sr = targets.sample_rate;
        let effects = targets.effects;

        let mut filters = StereoWrapper::from_single(OnePoleLowpass::new(sr));
        filters.for_each(|f| f.set_cutoff_freq(effects.cutoff_hz));

        Self {
            volume: Smoother::new(smoothing.amplitude_ms, effects.volume, sr)
                .with_smoothing_type(smoothing.law),
            cutoff: Smoother::new(smoothing.cutoff_ms, effects.cutoff_hz, sr)
                .with_smoothing_type(smoothing.law),
            delay: Smoother::new(smoothing.delay_ms, effects.delay_samples, sr)
                .with_smoothing_type(smoothing.law),
            air_absorption: Smoother::new(
                smoothing.toggle_ms,
                targets.air_absorption,
                sr,
            ),
            doppler: Smoother::new(smoothing.toggle_ms, targets.doppler, sr),

            delay_lines: std::array::from_fn(|_| {
                FractionalDelayLine::with_max_delay(max_delay_samples)
                    .with_interpolation(interpolation)
            }),
            filters,

            delay_overrun: None,

            sample_rate: sr,
        }
    }

    /// Moves the chain to a new sample rate, resizing the delay lines for
    /// `max_delay_samples` and resting every smoother at `targets`.
    ///
    /// # Safety
    ///
    /// This may reallocate memory, so you should not call this on the audio
    /// thread or in real-time usage.
    pub fn prepare(&mut self, targets: &ChainTargets, max_delay_samples: f64) {
        let sr = targets.sample_rate;
        self.sample_rate = sr;

        for smoother in self.smoothers_mut() {
            smoother.reset_sample_rate(sr);
        }

        let size = FractionalDelayLine::size_for_delay(max_delay_samples);
        for line in &mut self.delay_lines {
            line.resize(size);
        }

        self.filters.for_each(|f| f.set_sample_rate(sr));

        self.reset_to(targets);
    }

    /// Clears all audio history and rests every smoother at `targets`.
    /// Does not allocate.
    pub fn reset_to(&mut self, targets: &ChainTargets) {
        let effects = targets.effects;

        self.volume.reset_to(effects.volume);
        self.cutoff.reset_to(effects.cutoff_hz);
        self.delay.reset_to(effects.delay_samples);
        self.air_absorption.reset_to(targets.air_absorption);
        self.doppler.reset_to(targets.doppler);

        for line in &mut self.delay_lines {
            line.reset();
        }

        self.filters.reset();
        self.filters.for_each(|f| f.set_cutoff_freq(effects.cutoff_hz));

        self.delay_overrun = None;
    }

    /// Clears all audio history and snaps every smoother to its current
    /// target.
    pub fn reset(&mut self) {
        let targets = self.targets();
        self.reset_to(&targets);
    }

    /// Starts ramping towards `targets` from wherever the smoothers are now.
    pub fn set_targets(&mut self, targets: &ChainTargets) {
        let effects = targets.effects;

        self.volume.set_target_value(effects.volume);
        self.cutoff.set_target_value(effects.cutoff_hz);
        self.delay.set_target_value(effects.delay_samples);
        self.air_absorption.set_target_value(targets.air_absorption);
        self.doppler.set_target_value(targets.doppler);
    }

    /// The targets the smoothers are heading for.
    pub fn targets(&self) -> ChainTargets {
        ChainTargets {
            effects: DistanceEffectTargets {
                volume: self.volume.target_value(),
                cutoff_hz: self.cutoff.target_value(),
                delay_samples: self.delay.target_value(),
            },
            air_absorption: self.air_absorption.target_value(),
            doppler: self.doppler.target_value(),
            sample_rate: self.sample_rate,
        }
    }

    pub fn state(&self) -> ChainState {
        ChainState {
            volume: self.volume.current_value(),
            cutoff_hz: self.cutoff.current_value(),
            delay_samples: self.delay.current_value(),
            air_absorption: self.air_absorption.current_value(),
            doppler: self.doppler.current_value(),
        }
    }

    /// Processes one stereo frame. Every smoother advances exactly once, and
    /// the output is always finite.
    #[inline]
    pub fn process_frame(&mut self, in_l: f64, in_r: f64) -> (f64, f64) {
        let delay = self.delay.next();
        let volume = self.volume.next();
        let cutoff = self.cutoff.next();
        let air = self.air_absorption.next();
        let doppler = self.doppler.next();

        self.filters.for_each(|f| f.set_cutoff_freq(cutoff));

        let inputs = [finite_or_zero(in_l), finite_or_zero(in_r)];
        let mut blended = [0.0; NUM_CHANNELS];

        for (ch, line) in self.delay_lines.iter_mut().enumerate() {
            let raw = inputs[ch];
            line.push(raw);

            let delayed = match line.read(delay) {
                Ok(sample) => sample,
                Err(Error::DelayOutOfRange { requested, max }) => {
                    self.delay_overrun = Some((requested, max));
                    line.read_clamped(delay)
                }
                Err(_) => line.read_clamped(delay),
            };

            blended[ch] = doppler * delayed + (1.0 - doppler) * raw;
        }

        let (filtered_l, filtered_r) =
            self.filters.process_stereo(blended[0], blended[1]);

        let out_l = volume * (air * filtered_l + (1.0 - air) * blended[0]);
        let out_r = volume * (air * filtered_r + (1.0 - air) * blended[1]);

        (finite_or_zero(out_l), finite_or_zero(out_r))
    }

    /// Processes two planar channels in place. Only the shorter length of
    /// the two is processed.
    pub fn process_block(&mut self, left: &mut [f64], right: &mut [f64]) {
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            (*l, *r) = self.process_frame(*l, *r);
        }
    }

    /// Returns and clears the last out-of-range delay read, as
    /// `(requested, max)`.
    pub fn take_delay_overrun(&mut self) -> Option<(f64, f64)> {
        self.delay_overrun.take()
    }

    pub fn max_delay_samples(&self) -> f64 {
        self.delay_lines[0].max_delay_samples()
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    fn smoothers_mut(&mut self) -> [&mut Smoother<f64>; 5] {
        [
            &mut self.volume,
            &mut self.cutoff,
            &mut self.delay,
            &mut self.air_absorption,
            &mut self.doppler,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::Filter;
    use rand::Rng;

    const SR: f64 = 48000.0;

    fn chain_at(volume: f64, air: bool, doppler: bool) -> SignalChain {
        let targets = ChainTargets::new(
            DistanceEffectTargets { volume, cutoff_hz: 1000.0, delay_samples: 100.0 },
            air,
            doppler,
            SR,
        );

        SignalChain::new(
            &SmoothingConfig::default(),
            InterpType::default(),
            &targets,
            1000.0,
        )
    }

    fn noise(len: usize) -> Vec<f64> {
        let mut rng = rand::rng();
        (0..len).map(|_| rng.random_range(-1.0..1.0)).collect()
    }

    #[test]
    fn doppler_off_ignores_the_delay_line() {
        let mut chain = chain_at(0.5, true, false);
        let mut reference = OnePoleLowpass::new(SR);
        reference.set_cutoff_freq(1000.0);

        for x in noise(2048) {
            let (l, r) = chain.process_frame(x, x);
            let expected = 0.5 * reference.process(x);

            assert!(within_tolerance(l, expected, 1e-12));
            assert!(within_tolerance(r, expected, 1e-12));
        }
    }

    #[test]
    fn air_off_passes_the_delayed_signal_unfiltered() {
        let mut chain = chain_at(0.5, false, true);
        let input = noise(1024);

        for (n, &x) in input.iter().enumerate() {
            let (l, _) = chain.process_frame(x, -x);
            let expected = if n >= 100 { 0.5 * input[n - 100] } else { 0.0 };

            assert!(within_tolerance(l, expected, 1e-12));
        }
    }

    #[test]
    fn both_off_is_a_gain_stage() {
        let mut chain = chain_at(0.25, false, false);

        for x in noise(256) {
            let (l, r) = chain.process_frame(x, x * 0.5);

            assert!(within_tolerance(l, 0.25 * x, 1e-15));
            assert!(within_tolerance(r, 0.125 * x, 1e-15));
        }
    }

    #[test]
    fn volume_change_is_ramped() {
        let mut chain = chain_at(1.0, false, false);
        let mut targets = chain.targets();
        targets.effects.volume = 0.0;
        chain.set_targets(&targets);

        let (first, _) = chain.process_frame(1.0, 1.0);
        assert!(first > 0.99 && first < 1.0);

        // 20 ms at 48 kHz
        for _ in 0..959 {
            chain.process_frame(1.0, 1.0);
        }

        assert_eq!(chain.process_frame(1.0, 1.0), (0.0, 0.0));
    }

    #[test]
    fn delay_ramp_stays_continuous() {
        let mut chain = chain_at(1.0, false, true);

        // a constant input must pass a moving delay without jumps
        for _ in 0..200 {
            chain.process_frame(1.0, 1.0);
        }

        let mut targets = chain.targets();
        targets.effects.delay_samples = 900.0;
        chain.set_targets(&targets);

        for _ in 0..2000 {
            let (l, _) = chain.process_frame(1.0, 1.0);
            assert!(within_tolerance(l, 1.0, 1e-9));
        }
        assert!(chain.take_delay_overrun().is_none());
    }

    #[test]
    fn non_finite_input_never_escapes() {
        let mut chain = chain_at(1.0, true, true);

        for x in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 1.0] {
            let (l, r) = chain.process_frame(x, x);
            assert!(l.is_finite() && r.is_finite());
        }
    }

    #[test]
    fn reset_clears_history() {
        let mut chain = chain_at(1.0, true, true);

        for x in noise(512) {
            chain.process_frame(x, x);
        }
        chain.reset();

        for _ in 0..512 {
            assert_eq!(chain.process_frame(0.0, 0.0), (0.0, 0.0));
        }
    }

    #[test]
    fn delay_beyond_capacity_is_clamped_and_reported() {
        let smoothing = SmoothingConfig { delay_ms: 0.0, ..Default::default() };
        let mut targets = ChainTargets::new(
            DistanceEffectTargets { volume: 1.0, cutoff_hz: 1000.0, delay_samples: 10.0 },
            false,
            true,
            SR,
        );
        let mut chain = SignalChain::new(&smoothing, InterpType::default(), &targets, 100.0);
        let max = chain.max_delay_samples();

        targets.effects.delay_samples = 5000.0;
        chain.set_targets(&targets);

        // the line is still empty, so the clamped read is silent
        assert_eq!(chain.process_frame(0.5, 0.5), (0.0, 0.0));
        assert_eq!(chain.take_delay_overrun(), Some((5000.0, max)));
        assert_eq!(chain.take_delay_overrun(), None);
    }

    #[test]
    fn toggles_crossfade_linearly_over_their_ramp() {
        const TOGGLE_SR: f64 = 1000.0;
        const DELAY: f64 = 100.0;

        let smoothing = SmoothingConfig { toggle_ms: 5.0, ..Default::default() };
        let mut targets = ChainTargets::new(
            DistanceEffectTargets { volume: 1.0, cutoff_hz: 100.0, delay_samples: DELAY },
            false,
            false,
            TOGGLE_SR,
        );
        let mut chain =
            SignalChain::new(&smoothing, InterpType::default(), &targets, 2.0 * DELAY);

        // a rising ramp makes the raw and delayed signals easy to tell apart
        let mut n = 0.0;
        for _ in 0..200 {
            chain.process_frame(n, n);
            n += 1.0;
        }

        targets.doppler = 1.0;
        chain.set_targets(&targets);

        for step in 1..=6 {
            let (l, r) = chain.process_frame(n, n);
            let weight = (f64::from(step) / 5.0).min(1.0);

            assert!(within_tolerance(chain.state().doppler, weight, 1e-12));
            assert_eq!(chain.state().air_absorption, 0.0);
            // weight * (n - DELAY) + (1 - weight) * n
            assert!(within_tolerance(l, n - weight * DELAY, 1e-9));
            assert!(within_tolerance(r, n - weight * DELAY, 1e-9));

            n += 1.0;
        }
    }

    #[test]
    fn prepare_resizes_for_new_sample_rate() {
        let mut chain = chain_at(1.0, false, true);
        let mut targets = chain.targets();
        targets.sample_rate = 96000.0;
        targets.effects.delay_samples = 1800.0;

        chain.prepare(&targets, 2000.0);

        assert_eq!(chain.sample_rate(), 96000.0);
        assert!(chain.max_delay_samples() >= 2000.0);
        assert_eq!(chain.state().delay_samples, 1800.0);
    }
}
