//! Module for time domain filters.

pub mod one_pole_lowpass;

/// A per-sample filter.
pub trait Filter: Send {
    /// Generic processing method for a filter.
    fn process(&mut self, sample: f64) -> f64;
}
