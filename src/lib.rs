#![allow(
    clippy::module_name_repetitions,
    clippy::wildcard_imports,
    clippy::return_self_not_must_use,
    clippy::redundant_closure_for_method_calls
)]

// Distance-effect processing and its control path
pub mod engine;

// Signal processing
pub mod dsp;

// General utilities
pub mod util;

// Some widely-used re-exports
pub mod prelude;

// Program-wide settings
pub mod settings;

// Loadable configuration
pub mod config;

// Crate-wide error type
pub mod error;

pub use config::DistanceConfig;
pub use engine::{
    distance_processor, DistanceControl, DistanceProcessor, SourceMetadata,
};
pub use error::{Error, Result};
