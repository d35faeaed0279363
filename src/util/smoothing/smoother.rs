//! Per-sample value smoother.

#![allow(clippy::should_implement_trait)]
use super::ramp::Ramp;
use super::*;
use crate::util::{eps_eq, SmoothingType};

/// Ramps a current value towards a target over a fixed period.
///
/// Retargeting never moves the current value; only [`next()`](Self::next)
/// does, so the smoother must be advanced exactly once per sample, in order.
#[derive(Debug, Default, Clone)]
pub struct Smoother<T: Smoothable> {
    ramp: Ramp,
    start_value: T,
    target_value: T,
    current_value: T,

    smoothing_type: SmoothingType,
}

impl<T: Smoothable> Smoother<T> {
    /// Creates a new `Smoother` with linear smoothing (see the
    /// [`set_smoothing_type()`][Self::set_smoothing_type()] method), resting
    /// at `initial_value`.
    pub fn new(duration_ms: f64, initial_value: T, sample_rate: f64) -> Self {
        Self {
            ramp: Ramp::new(duration_ms, sample_rate),
            start_value: initial_value,
            current_value: initial_value,
            target_value: initial_value,

            smoothing_type: SmoothingType::default(),
        }
    }

    /// Creates a smoother with `smoothing_type` smoothing.
    pub fn with_smoothing_type(
        mut self,
        smoothing_type: SmoothingType,
    ) -> Self {
        self.set_smoothing_type(smoothing_type);
        self
    }

    /// Yields the `Smoother`'s next smoothed value, intended to be called
    /// per sample. If you need to skip a certain number of samples, see the
    /// [`skip()`][Self::skip()] method.
    pub fn next(&mut self) -> T {
        self.skip(1)
    }

    /// Skips `num_steps` steps, returning the new value. In effect, equivalent
    /// to calling the [`next()`][Self::next()] method `num_steps` times.
    pub fn skip(&mut self, num_steps: u32) -> T {
        if !self.is_active() {
            return self.current_value;
        }

        self.ramp.skip(num_steps);
        self.interpolated_value()
    }

    /// Forces the `Smoother` to finish smoothing and reach its target value
    /// immediately.
    pub fn finish(&mut self) {
        self.ramp.finish();
        self.current_value = self.target_value;
    }

    /// Returns the `Smoother`'s current value, i.e. the last value returned
    /// by its [`next()`][Self::next()] method.
    pub fn current_value(&self) -> T {
        self.current_value
    }

    /// Returns the current target value of the smoother.
    pub fn target_value(&self) -> T {
        self.target_value
    }

    /// Sets the smoothing (interpolation) type of the `Smoother`. See the
    /// variants of `SmoothingType` for all the options.
    pub fn set_smoothing_type(&mut self, smoothing_type: SmoothingType) {
        self.smoothing_type = smoothing_type;
    }

    /// Sets the new target value of the `Smoother`, which is approached from
    /// the current value starting with the next call to
    /// [`next()`][Self::next()]. Setting the same target again has no effect.
    pub fn set_target_value(&mut self, target_value: T) {
        if eps_eq(target_value.to_f64(), self.target_value.to_f64()) {
            return;
        }

        self.target_value = target_value;
        self.start_value = self.current_value;
        self.ramp.reset();

        // zero-length ramps jump straight to the target
        if !self.ramp.is_active() {
            self.current_value = target_value;
        }
    }

    /// Sets the current, start and target values to `value` at once, and
    /// stops any active ramp.
    pub fn reset_to(&mut self, value: T) {
        self.ramp.finish();
        self.start_value = value;
        self.target_value = value;
        self.current_value = value;
    }

    /// Sets the sample rate the ramp length is measured at. Takes effect on
    /// the next retarget.
    pub fn reset_sample_rate(&mut self, sample_rate: f64) {
        self.ramp.reset_sample_rate(sample_rate);
    }

    /// Returns whether the `Smoother` is actively smoothing or not.
    pub fn is_active(&self) -> bool {
        self.ramp.is_active()
    }

    /// Computes the interpolated value based on the current `SmoothingType`.
    fn interpolated_value(&mut self) -> T {
        let (a, b, t) = (
            self.start_value.to_f64(),
            self.target_value.to_f64(),
            self.ramp.current_value(),
        );

        self.current_value = T::from_f64(self.smoothing_type.map(a, b, t));
        self.current_value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::within_tolerance;

    const SR: f64 = 1000.0;

    #[test]
    fn retarget_does_not_move_current_value() {
        let mut smoother = Smoother::new(10.0, 0.0, SR);
        smoother.set_target_value(1.0);

        assert_eq!(smoother.current_value(), 0.0);
        assert_eq!(smoother.target_value(), 1.0);
    }

    #[test]
    fn linear_ramp_is_evenly_spaced() {
        let mut smoother = Smoother::new(10.0, 0.0, SR);
        smoother.set_target_value(1.0);

        for i in 1..=10 {
            let value = smoother.next();
            assert!(within_tolerance(value, i as f64 * 0.1, 1e-12));
        }

        assert_eq!(smoother.next(), 1.0);
        assert!(!smoother.is_active());
    }

    #[test]
    fn advance_at_rest_is_idempotent() {
        let mut smoother = Smoother::new(20.0, 0.42, SR);

        for _ in 0..100 {
            assert_eq!(smoother.next(), 0.42);
        }
    }

    #[test]
    fn retarget_mid_ramp_continues_from_current_value() {
        let mut smoother = Smoother::new(10.0, 0.0, SR);
        smoother.set_target_value(1.0);
        smoother.skip(5);
        let halfway = smoother.current_value();

        smoother.set_target_value(0.0);
        let next = smoother.next();

        assert!(within_tolerance(halfway, 0.5, 1e-12));
        assert!(next < halfway && next > 0.4);
    }

    #[test]
    fn reset_to_sets_current_and_target() {
        let mut smoother = Smoother::new(10.0, 0.0, SR);
        smoother.set_target_value(1.0);
        smoother.next();

        smoother.reset_to(0.25);

        assert!(!smoother.is_active());
        assert_eq!(smoother.current_value(), 0.25);
        assert_eq!(smoother.target_value(), 0.25);
        assert_eq!(smoother.next(), 0.25);
    }

    #[test]
    fn zero_length_smoother_jumps() {
        let mut smoother = Smoother::new(0.0, 0.0, SR);
        smoother.set_target_value(1.0);

        assert_eq!(smoother.current_value(), 1.0);
        assert_eq!(smoother.next(), 1.0);
    }

    #[test]
    fn exponential_ramp_moves_geometrically() {
        let mut smoother = Smoother::new(2.0, 100.0, SR)
            .with_smoothing_type(SmoothingType::Exponential);
        smoother.set_target_value(10000.0);

        assert!(within_tolerance(smoother.next(), 1000.0, 1e-9));
        assert!(within_tolerance(smoother.next(), 10000.0, 1e-9));
    }

    #[test]
    fn cosine_ramp_eases_in_and_out() {
        let mut smoother =
            Smoother::new(10.0, 0.0, SR).with_smoothing_type(SmoothingType::Cosine);
        smoother.set_target_value(1.0);

        let values: Vec<f64> = (0..10).map(|_| smoother.next()).collect();

        // slow at both ends, symmetric about the midpoint
        assert!(values[0] < 0.1 && values[0] > 0.0);
        assert!(within_tolerance(values[4], 0.5, 1e-12));
        assert!(values.windows(2).all(|w| w[1] > w[0]));
        for k in 0..4 {
            assert!(within_tolerance(values[k] + values[8 - k], 1.0, 1e-12));
        }
        assert_eq!(values[9], 1.0);
        assert!(!smoother.is_active());
    }
}
