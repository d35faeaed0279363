//! Linear segment generator.

/// The constant target for `Ramp`.
const RAMP_TARGET: f64 = 1.0;

/// A linear segment generator ("ramp") which smooths between `0.0` and `1.0`.
/// Used as the internal system for `Smoother`.
#[derive(Debug, Clone, Default)]
pub struct Ramp {
    /// The number of smoothing steps remaining until the target is reached.
    steps_remaining: u32,

    /// The step increment for each step, which should be called each sample.
    step_size: f64,

    /// The smoothed value for the current sample.
    current_value: f64,

    /// The duration of smoothing in milliseconds.
    duration_ms: f64,

    sample_rate: f64,
}

impl Ramp {
    /// Returns a new, finished `Ramp` with the provided duration time in
    /// milliseconds.
    pub fn new(duration_ms: f64, sample_rate: f64) -> Self {
        Self {
            steps_remaining: 0,
            step_size: 0.0,
            current_value: RAMP_TARGET,
            duration_ms: duration_ms.max(0.0),
            sample_rate,
        }
    }

    /// Yields the next sample's smoothed value.
    pub fn next(&mut self) -> f64 {
        self.skip(1)
    }

    /// Skips `num_steps` samples, returning the new value.
    pub fn skip(&mut self, num_steps: u32) -> f64 {
        if num_steps == 0 || self.steps_remaining == 0 {
            return self.current_value;
        }

        if self.steps_remaining <= num_steps {
            self.steps_remaining = 0;
            self.current_value = RAMP_TARGET;
        }
        else {
            self.current_value += self.step_size * f64::from(num_steps);
            self.steps_remaining -= num_steps;
        }

        self.current_value
    }

    /// Returns the current value in the `Ramp`, i.e. the last value returned
    /// by the [`next()`][Self::next()] method.
    pub fn current_value(&self) -> f64 {
        self.current_value
    }

    /// Restarts the `Ramp` from `0.0`, recomputing its step size and
    /// remaining count. A zero-length ramp finishes immediately.
    pub fn reset(&mut self) {
        self.steps_remaining = self.duration_samples();

        if self.steps_remaining == 0 {
            self.finish();
            return;
        }

        self.current_value = 0.0;
        self.step_size = RAMP_TARGET / f64::from(self.steps_remaining);
    }

    /// Jumps straight to the end of the `Ramp`.
    pub fn finish(&mut self) {
        self.steps_remaining = 0;
        self.step_size = 0.0;
        self.current_value = RAMP_TARGET;
    }

    /// Resets the ramp's internal sample rate. Takes effect on the next
    /// [`reset()`][Self::reset()].
    pub fn reset_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
    }

    /// Returns how many steps the `Ramp` has remaining.
    pub fn steps_remaining(&self) -> u32 {
        self.steps_remaining
    }

    /// Returns whether the `Ramp` is actively smoothing or not.
    pub fn is_active(&self) -> bool {
        self.steps_remaining > 0
    }

    /// Computes the total number of steps required to reach the target value
    /// (i.e. the duration as samples).
    fn duration_samples(&self) -> u32 {
        (self.sample_rate * self.duration_ms / 1000.0).round() as u32
    }
}
