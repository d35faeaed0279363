//! Value smoothers.

/// Linear segment generation. Internal system for `Smoother`.
mod ramp;

/// Smoothable traits and type implementations.
pub mod smoothable_types;
/// Per-sample value smoothing.
pub mod smoother;
pub use smoothable_types::Smoothable;
pub use smoother::Smoother;
