//! Source description for a downstream spatial renderer.

use super::params::{ParameterStore, SourceType};
use crate::prelude::*;

/// A snapshot of what a renderer needs to place the source. Building it has
/// no side effects; sending it anywhere is up to the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceMetadata {
    pub source_index: u32,
    pub source_type: SourceType,
    /// Degrees, `0` to the right and anticlockwise.
    pub azimuth: f64,
    pub elevation: f64,
    pub distance: f64,
    pub volume: f64,
}

impl SourceMetadata {
    pub fn from_store(store: &ParameterStore, volume: f64) -> Self {
        Self {
            source_index: store.source_index.lr(),
            source_type: store.source_type.lr(),
            azimuth: renderer_azimuth(store.azimuth.lr()),
            elevation: store.elevation.lr(),
            distance: store.distance.lr(),
            volume,
        }
    }

    /// The zero-based source type index.
    pub fn source_type_index(&self) -> u32 {
        self.source_type.index()
    }
}

/// Converts an azimuth from "`0` in front, clockwise" to "`0` to the right,
/// anticlockwise", in `[0, 360)`.
pub fn renderer_azimuth(azimuth: f64) -> f64 {
    wrap_degrees(90.0 - azimuth)
}
