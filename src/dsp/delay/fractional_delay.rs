//! Ring buffer with interpolated reads at fractional delay lengths.

use crate::prelude::*;

/// A fixed-capacity ring buffer which supports reading at any fractional
/// delay, for delay times which change every sample (i.e. Doppler).
///
/// A delay of `0.0` is the most recently pushed sample. Reads use four
/// neighbouring samples, so the readable range is
/// `[MIN_DELAY_SAMPLES, max_delay_samples()]`.
#[derive(Debug, Clone, Default)]
pub struct FractionalDelayLine {
    /// The internal data buffer.
    data: Vec<f64>,
    /// The position the next sample will be written to.
    write_pos: usize,

    /// The kind of interpolation to use.
    interpolation_type: InterpType,
}

impl FractionalDelayLine {
    /// Returns a new, zeroed `FractionalDelayLine` which holds `size` samples.
    ///
    /// Defaults to third-order Lagrange interpolation.
    ///
    /// # Panics
    ///
    /// Panics if `size` is too small to hold the four interpolation taps.
    #[must_use]
    pub fn new(size: usize) -> Self {
        assert!(size >= DELAY_INTERP_HEADROOM);

        Self {
            data: vec![0.0; size],
            write_pos: 0,
            interpolation_type: InterpType::default(),
        }
    }

    /// Returns a `FractionalDelayLine` large enough to delay by
    /// `max_delay_samples`.
    #[must_use]
    pub fn with_max_delay(max_delay_samples: f64) -> Self {
        Self::new(Self::size_for_delay(max_delay_samples))
    }

    /// Sets the interpolation method for the delay line.
    ///
    /// Constructing method.
    pub fn with_interpolation(mut self, interpolation_type: InterpType) -> Self {
        self.set_interpolation(interpolation_type);
        self
    }

    /// The buffer size required to read at `max_delay_samples`.
    pub fn size_for_delay(max_delay_samples: f64) -> usize {
        max_delay_samples.max(0.0).ceil() as usize + DELAY_INTERP_HEADROOM
    }

    /// Pushes `sample` to the buffer and advances the write position.
    #[inline]
    pub fn push(&mut self, sample: f64) {
        self.data[self.write_pos] = sample;
        self.write_pos += 1;

        if self.write_pos == self.data.len() {
            self.write_pos = 0;
        }
    }

    /// Reads the interpolated sample `delay_samples` behind the most recently
    /// pushed sample.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DelayOutOfRange`] if `delay_samples` is not finite or
    /// lies outside `[MIN_DELAY_SAMPLES, max_delay_samples()]`.
    #[inline]
    pub fn read(&self, delay_samples: f64) -> Result<f64> {
        let max = self.max_delay_samples();

        if !(MIN_DELAY_SAMPLES..=max).contains(&delay_samples) {
            return Err(Error::DelayOutOfRange { requested: delay_samples, max });
        }

        Ok(self.read_unchecked(delay_samples))
    }

    /// Reads like [`read()`](Self::read), but clamps `delay_samples` into the
    /// readable range instead of failing. NaN reads at the minimum delay.
    #[inline]
    pub fn read_clamped(&self, delay_samples: f64) -> f64 {
        let delay = if delay_samples.is_nan() {
            MIN_DELAY_SAMPLES
        }
        else {
            delay_samples.clamp(MIN_DELAY_SAMPLES, self.max_delay_samples())
        };

        self.read_unchecked(delay)
    }

    /// Returns the raw sample `delay` whole samples behind the most recently
    /// pushed sample.
    ///
    /// # Panics
    ///
    /// Panics if `delay` is not less than the buffer size.
    pub fn tap(&self, delay: usize) -> f64 {
        assert!(delay < self.size());
        self.data[self.index_for_delay(delay)]
    }

    /// Sets the interpolation method.
    pub fn set_interpolation(&mut self, interpolation_type: InterpType) {
        self.interpolation_type = interpolation_type;
    }

    /// Clears the buffer and rewinds the write position. Does not allocate.
    pub fn reset(&mut self) {
        self.clear();
        self.write_pos = 0;
    }

    /// Clears the contents of the buffer, i.e. sets its contents to `0.0`.
    pub fn clear(&mut self) {
        self.data.iter_mut().for_each(|x| *x = 0.0);
    }

    /// Resizes the buffer to hold `new_size` samples and clears it.
    ///
    /// # Safety
    ///
    /// This may reallocate memory, so you should not call this on the audio
    /// thread or in real-time usage.
    ///
    /// # Panics
    ///
    /// Panics if `new_size` is too small to hold the four interpolation taps.
    pub fn resize(&mut self, new_size: usize) {
        assert!(new_size >= DELAY_INTERP_HEADROOM);
        self.data.resize(new_size, 0.0);
        self.reset();
    }

    /// Returns the number of elements held by the buffer.
    #[must_use]
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Returns the longest delay which can be read, in samples.
    pub fn max_delay_samples(&self) -> f64 {
        // the furthest tap sits two samples past the integer delay
        self.size().saturating_sub(3) as f64
    }

    fn read_unchecked(&self, delay_samples: f64) -> f64 {
        let whole = delay_samples.floor();
        let frac = delay_samples - whole;
        let whole = whole as usize;

        // taps either side of the read point, newest first
        let p0 = self.data[self.index_for_delay(whole - 1)];
        let p1 = self.data[self.index_for_delay(whole)];
        let p2 = self.data[self.index_for_delay(whole + 1)];
        let p3 = self.data[self.index_for_delay(whole + 2)];

        self.interpolation_type.interpolate(p0, p1, p2, p3, frac)
    }

    #[inline]
    fn index_for_delay(&self, delay: usize) -> usize {
        let size = self.size();
        (self.write_pos + size - 1 - delay) % size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_line(size: usize, count: usize) -> FractionalDelayLine {
        let mut line = FractionalDelayLine::new(size);
        for i in 0..count {
            line.push(i as f64);
        }
        line
    }

    #[test]
    fn integer_delay_reads_raw_sample() {
        let mut line = FractionalDelayLine::new(64);
        let input: Vec<f64> = (0..200).map(|_| rand::random_range(-1.0..1.0)).collect();
        input.iter().for_each(|&x| line.push(x));

        for delay in 1..=61 {
            let expected = input[input.len() - 1 - delay];
            let read = line.read(delay as f64).unwrap();

            assert!(within_tolerance(read, expected, 1e-12));
            assert_eq!(line.tap(delay), expected);
        }
    }

    #[test]
    fn fractional_delay_interpolates_ramp() {
        // a linear ramp is reproduced exactly by a cubic kernel
        let line = filled_line(32, 100);

        let read = line.read(3.25).unwrap();
        assert!(within_tolerance(read, 99.0 - 3.25, 1e-12));
    }

    #[test]
    fn read_beyond_capacity_is_an_error() {
        let line = filled_line(16, 16);
        let max = line.max_delay_samples();

        assert!(line.read(max).is_ok());
        assert!(matches!(
            line.read(max + 0.5),
            Err(Error::DelayOutOfRange { .. })
        ));
        assert!(line.read(0.5).is_err());
        assert!(line.read(f64::NAN).is_err());
    }

    #[test]
    fn clamped_read_stays_in_bounds() {
        let line = filled_line(16, 40);
        let max = line.max_delay_samples();

        assert_eq!(line.read_clamped(1e9), line.read(max).unwrap());
        assert_eq!(line.read_clamped(-3.0), line.read(1.0).unwrap());
        assert!(line.read_clamped(f64::NAN).is_finite());
    }

    #[test]
    fn small_delay_changes_are_continuous() {
        let mut line = FractionalDelayLine::new(64);
        for _ in 0..64 {
            line.push(rand::random_range(-1.0..1.0));
        }
        let mut last = line.read(10.0).unwrap();
        let mut delay = 10.0;

        while delay < 11.0 {
            delay += 0.001;
            let next = line.read(delay).unwrap();
            assert!((next - last).abs() < 0.01);
            last = next;
        }
    }

    #[test]
    fn max_delay_covers_requested_length() {
        let line = FractionalDelayLine::with_max_delay(1000.3);
        assert!(line.max_delay_samples() >= 1000.3);
    }

    #[test]
    fn reset_clears_history() {
        let mut line = filled_line(16, 10);
        line.reset();

        assert_eq!(line.read(4.0).unwrap(), 0.0);
    }
}
