//! Delay types and implementations.

pub mod fractional_delay;

pub use fractional_delay::FractionalDelayLine;
