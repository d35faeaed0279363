//! One-pole lowpass filter.

use super::Filter;
use crate::dsp::Effect;
use crate::prelude::*;

/// Feedback values smaller than this are flushed to zero.
const DENORMAL_THRESHOLD: f64 = 1e-30;

/// A single-pole lowpass whose cutoff may be changed every sample.
///
/// The coefficient places the -3 dB point exactly at the cutoff, and the pole
/// stays inside `[0, 1]` for any cutoff in `[0, sample_rate / 2]`.
///
/// Source: https://www.musicdsp.org/en/latest/Effects/169-compressor.html
#[derive(Clone, Debug)]
pub struct OnePoleLowpass {
    a0: f64,
    b1: f64,

    old: f64,

    cutoff_hz: f64,
    sample_rate: f64,
}

impl OnePoleLowpass {
    /// Returns a new `OnePoleLowpass` filter with identity coefficients (i.e., the input
    /// is unaltered).
    pub fn new(sample_rate: f64) -> Self {
        OnePoleLowpass {
            a0: 1.0,
            b1: 0.0,
            old: 0.0,
            cutoff_hz: f64::INFINITY,
            sample_rate,
        }
    }

    /// Sets the cutoff frequency of the filter in Hz. The frequency is clamped
    /// to `[0, sample_rate / 2]`; NaN is treated as `0.0`.
    pub fn set_cutoff_freq(&mut self, freq_hz: f64) {
        let sr = self.sample_rate;
        let freq_hz = finite_or_zero(freq_hz).clamp(0.0, sr / 2.0);

        if eps_eq(freq_hz, self.cutoff_hz) {
            return;
        }

        let c = 2.0 - (TAU * freq_hz / sr).cos();

        self.b1 = (c * c - 1.0).sqrt() - c;
        self.a0 = 1.0 + self.b1;
        self.cutoff_hz = freq_hz;
    }

    /// Returns the current cutoff frequency in Hz, or `f64::INFINITY` while
    /// the filter still has identity coefficients.
    pub fn cutoff_freq(&self) -> f64 {
        self.cutoff_hz
    }

    /// Sets a new sample rate, keeping the cutoff frequency in Hz.
    ///
    /// # Panics
    ///
    /// Panics if `sample_rate` is not positive.
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        assert!(sample_rate > 0.0);
        let cutoff = self.cutoff_hz;
        self.sample_rate = sample_rate;

        if cutoff.is_finite() {
            // forces the coefficients to be recomputed
            self.cutoff_hz = -1.0;
            self.set_cutoff_freq(cutoff);
        }
    }

    /// Returns the filter's magnitude response at `freq_hz`.
    pub fn magnitude_at(&self, freq_hz: f64) -> f64 {
        let w = TAU * freq_hz / self.sample_rate;
        // |1 + b1 e^{-jw}|
        let re = 1.0 + self.b1 * w.cos();
        let im = self.b1 * w.sin();

        self.a0.abs() / re.hypot(im)
    }

    pub fn reset(&mut self) {
        self.old = 0.0;
    }
}

impl Default for OnePoleLowpass {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE)
    }
}

impl Filter for OnePoleLowpass {
    fn process(&mut self, sample: f64) -> f64 {
        self.old = self.a0 * sample - self.b1 * self.old;

        if self.old.abs() < DENORMAL_THRESHOLD {
            self.old = 0.0;
        }

        self.old
    }
}

impl Effect for OnePoleLowpass {
    fn process_mono(&mut self, input: f64, _: usize) -> f64 {
        self.process(input)
    }

    fn reset(&mut self) {
        OnePoleLowpass::reset(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f64 = 48000.0;

    #[test]
    fn new_filter_is_identity() {
        let mut filter = OnePoleLowpass::new(SR);
        let input: Vec<f64> = (0..64).map(|_| rand::random_range(-1.0..1.0)).collect();

        let output: Vec<f64> = input.iter().map(|&x| filter.process(x)).collect();

        assert_eq!(input, output);
    }

    #[test]
    fn cutoff_is_the_minus_3db_point() {
        let mut filter = OnePoleLowpass::new(SR);
        filter.set_cutoff_freq(1000.0);

        let db = 20.0 * filter.magnitude_at(1000.0).log10();
        assert!(within_tolerance(db, -3.0103, 0.01), "got {db} dB");
        assert!(within_tolerance(filter.magnitude_at(0.0), 1.0, 1e-12));
    }

    #[test]
    fn dc_passes_at_unity_gain() {
        let mut filter = OnePoleLowpass::new(SR);
        filter.set_cutoff_freq(200.0);

        let mut out = 0.0;
        for _ in 0..20000 {
            out = filter.process(1.0);
        }

        assert!(within_tolerance(out, 1.0, 1e-9));
    }

    #[test]
    fn stays_bounded_with_per_sample_cutoff_changes() {
        let mut filter = OnePoleLowpass::new(SR);

        for i in 0..48000 {
            let cutoff = rand::random_range(0.0..SR / 2.0);
            filter.set_cutoff_freq(cutoff);
            let input = if i % 2 == 0 { 1.0 } else { -1.0 };
            let out = filter.process(input);

            assert!(out.is_finite() && out.abs() <= 1.0 + 1e-12);
        }
    }

    #[test]
    fn out_of_range_cutoff_is_clamped() {
        let mut filter = OnePoleLowpass::new(SR);

        filter.set_cutoff_freq(SR);
        assert_eq!(filter.cutoff_freq(), SR / 2.0);

        filter.set_cutoff_freq(f64::NAN);
        assert_eq!(filter.cutoff_freq(), 0.0);
    }
}
