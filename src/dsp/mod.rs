//! Digital signal processors and utilities.

pub mod absorption;
pub mod delay;
pub mod filtering;
pub mod util;

pub use absorption::{
    AbsorptionModel, AbsorptionState, AtmosphericCondition, CutoffSolution,
};
pub use delay::FractionalDelayLine;
pub use filtering::{one_pole_lowpass::OnePoleLowpass, Filter};
pub use util::*;
