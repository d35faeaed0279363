//! DSP utility types.

pub mod effect_trait;
pub mod stereo_wrapper;

pub use effect_trait::Effect;
pub use stereo_wrapper::StereoWrapper;
