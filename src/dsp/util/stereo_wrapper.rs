//! A wrapper around two mono `impl `[`Effect`] types with stereo utilities.

use super::Effect;

/// A simple wrapper around two mono `Effect` objects, one per channel.
#[derive(Clone, Debug)]
pub struct StereoWrapper<E> {
    pub l: E,
    pub r: E,
}

impl<E: Effect + Clone> StereoWrapper<E> {
    pub fn from_single(effect: E) -> Self {
        Self { l: effect.clone(), r: effect }
    }

    /// Applies `f` to both channels' effects.
    pub fn for_each(&mut self, mut f: impl FnMut(&mut E)) {
        f(&mut self.l);
        f(&mut self.r);
    }
}

impl<E: Effect + Clone> Effect for StereoWrapper<E> {
    fn process_stereo(&mut self, in_l: f64, in_r: f64) -> (f64, f64) {
        let out_l = self.l.process_mono(in_l, 0);
        let out_r = self.r.process_mono(in_r, 1);

        (out_l, out_r)
    }

    fn process_mono(&mut self, input: f64, ch_idx: usize) -> f64 {
        match ch_idx {
            0 => self.l.process_mono(input, ch_idx),
            1 => self.r.process_mono(input, ch_idx),
            _ => input,
        }
    }

    fn reset(&mut self) {
        self.l.reset();
        self.r.reset();
    }
}

impl<E: Effect + Clone + Default> Default for StereoWrapper<E> {
    fn default() -> Self {
        Self { l: E::default(), r: E::default() }
    }
}
