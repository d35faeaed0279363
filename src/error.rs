//! Error types for distance processing.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("Invalid humidity: {0}% (expected 0 to 100)")]
    InvalidHumidity(f64),

    #[error("Invalid temperature: {0} °C")]
    InvalidTemperature(f64),

    #[error("Invalid pressure: {0} Pa")]
    InvalidPressure(f64),

    #[error("Invalid distance: {0} m")]
    InvalidDistance(f64),

    #[error("Distance {distance} m exceeds the supported maximum of {max} m")]
    DistanceOutOfRange { distance: f64, max: f64 },

    #[error("Invalid target attenuation: {0} dB")]
    InvalidAttenuation(f64),

    #[error("Invalid value for {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("Delay of {requested} samples is outside the delay line (max {max})")]
    DelayOutOfRange { requested: f64, max: f64 },

    #[error("Invalid sample rate: {0} Hz")]
    InvalidSampleRate(f64),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
