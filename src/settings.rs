//! Global constants.

/// The default sample rate, set to 48 kHz. Processors store their own sample
/// rate once prepared; this is only used before `prepare()` is called.
pub const DEFAULT_SAMPLE_RATE: f64 = 48000.0;

/// The number of audio channels processed by the signal chain.
pub const NUM_CHANNELS: usize = 2;

/// The default block size assumed before `prepare()` is called. Buffers
/// longer than the prepared block size are broken down into blocks which are
/// this big.
pub const DEFAULT_BLOCK_SIZE: usize = 512;

/// The furthest a source may be placed from the listener, in metres.
pub const MAX_DISTANCE_M: f64 = 300.0;

/// Distances are floored to this before being mapped.
pub const MIN_MAPPED_DISTANCE_M: f64 = 0.1;

/// The speed of sound in air at roughly 15 °C, in metres per second.
pub const SPEED_OF_SOUND_MPS: f64 = 340.0;

/// Extra ring buffer slots on top of the maximum delay, so that every tap of
/// the 4-point interpolator stays inside the buffer.
pub const DELAY_INTERP_HEADROOM: usize = 4;

/// The shortest representable delay in samples. A zero-length tap would read
/// a sample that has not been written yet.
pub const MIN_DELAY_SAMPLES: f64 = 1.0;

/// Ramp length of the amplitude smoother.
pub const AMPLITUDE_SMOOTHING_MS: f64 = 20.0;
/// Ramp length of the cutoff smoother.
pub const CUTOFF_SMOOTHING_MS: f64 = 20.0;
/// Ramp length of the delay-time smoother. Longer, as it sets the steepness
/// of the Doppler glide.
pub const DELAY_SMOOTHING_MS: f64 = 150.0;
/// Ramp length of the two feature toggles. `0.0` switches instantly.
pub const TOGGLE_SMOOTHING_MS: f64 = 0.0;

/// The lowest cutoff handed to the absorption filter.
pub const MIN_CUTOFF_HZ: f64 = 20.0;
/// The highest cutoff handed to the absorption filter, relative to the sample
/// rate.
pub const MAX_CUTOFF_RATIO: f64 = 0.499;
/// The cutoff used before any target has been computed.
pub const DEFAULT_CUTOFF_HZ: f64 = 20000.0;

/// Lower edge of the band searched by the cutoff solver.
pub const AUDIBLE_MIN_HZ: f64 = 20.0;
/// Upper edge of the band searched by the cutoff solver.
pub const AUDIBLE_MAX_HZ: f64 = 20000.0;

/// Number of logarithmically spaced points in the solver's bracketing scan.
pub const SOLVER_SCAN_POINTS: usize = 64;
/// Maximum bisection steps per solve.
pub const SOLVER_MAX_ITERATIONS: u32 = 100;
/// The solver stops once the bracket's upper/lower ratio is within this of 1.
pub const SOLVER_FREQ_TOLERANCE: f64 = 1e-12;
/// The solver stops once the attenuation error is within this many dB.
pub const SOLVER_ATTENUATION_TOLERANCE_DB: f64 = 1e-9;

/// Reference atmospheric humidity in percent.
pub const REFERENCE_HUMIDITY_PERCENT: f64 = 50.0;
/// Reference air temperature in degrees Celsius.
pub const REFERENCE_TEMPERATURE_C: f64 = 20.0;
/// Sea-level static pressure in pascals.
pub const SEA_LEVEL_PRESSURE_PA: f64 = 101_325.0;
/// The air temperature the relaxation model is normalised against, in kelvin.
pub const REFERENCE_AIR_TEMPERATURE_K: f64 = 293.15;
/// Triple-point isotherm temperature, in kelvin.
pub const TRIPLE_POINT_TEMPERATURE_K: f64 = 273.16;
/// Offset between the Celsius and Kelvin scales.
pub const CELSIUS_TO_KELVIN: f64 = 273.15;
/// The attenuation the air-absorption filter is placed at, in dB.
pub const REFERENCE_ATTENUATION_DB: f64 = 3.0;

/// Near-field radius range and default, in metres.
pub const NEAR_FIELD_RADIUS_RANGE: (f64, f64) = (1.0, 10.0);
pub const DEFAULT_NEAR_FIELD_RADIUS: f64 = 1.0;

/// Rolloff exponent range and default.
pub const ROLLOFF_RANGE: (f64, f64) = (0.0, 10.0);
pub const DEFAULT_ROLLOFF: f64 = 1.0;

/// Default source distance, in metres.
pub const DEFAULT_DISTANCE_M: f64 = 1.0;

/// Azimuth range in degrees (0° in front, clockwise).
pub const AZIMUTH_RANGE: (f64, f64) = (0.0, 360.0);
/// Elevation range in degrees.
pub const ELEVATION_RANGE: (f64, f64) = (-90.0, 90.0);
/// Renderer source index range.
pub const SOURCE_INDEX_RANGE: (u32, u32) = (1, 64);

/// How many audio-thread events may queue up before new ones are dropped.
pub const CHAIN_EVENT_QUEUE_SIZE: usize = 16;
