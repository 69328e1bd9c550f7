//! Periodic-sample gauge engine
//!
//! A [`Gauge`] reads the sensor at a fixed cadence, maps the raw reading
//! onto `0..=output_max`, optionally inverts it and smooths it with a
//! [`LowPassFilter`]. Out-of-range readings are clamped, never rejected.
//!
//! Calibration is checked once in [`Gauge::new`]; `advance` has no
//! failure path.

mod filter;

use core::fmt;

use embassy_time::{Duration, Instant};

#[cfg(feature = "esp32-log")]
use esp_println::println;

pub use filter::LowPassFilter;
use filter::clamp_to;

use crate::SampleSource;
use crate::timing::SampleGate;

/// Default interval between sensor reads
pub const DEFAULT_SAMPLING_PERIOD: Duration = Duration::from_millis(250);

/// Default weight of a new sample
pub const DEFAULT_FILTER_COEFFICIENT: f32 = 0.2;

/// Default full-scale display value
pub const DEFAULT_OUTPUT_MAX: u16 = 100;

/// Full-scale reading of a 10-bit ADC
pub const DEFAULT_INPUT_MAX: i32 = 1023;

/// Gauge calibration
#[derive(Debug, Clone, Copy)]
pub struct GaugeConfig {
    /// Minimum time between two sensor reads
    pub sampling_period: Duration,
    /// Weight given to a new sample (0.0-1.0)
    pub filter_coefficient: f32,
    /// Largest displayable value
    pub output_max: u16,
    /// Expected lowest raw reading
    pub input_min: i32,
    /// Expected highest raw reading
    pub input_max: i32,
    /// Low raw reading shows as a high value
    pub inverted: bool,
    /// Smoothed value before the first sample
    pub initial_value: u16,
}

impl Default for GaugeConfig {
    fn default() -> Self {
        Self {
            sampling_period: DEFAULT_SAMPLING_PERIOD,
            filter_coefficient: DEFAULT_FILTER_COEFFICIENT,
            output_max: DEFAULT_OUTPUT_MAX,
            input_min: 0,
            input_max: DEFAULT_INPUT_MAX,
            inverted: false,
            initial_value: 0,
        }
    }
}

/// Rejected gauge calibration
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CalibrationError {
    /// `input_max` is not above `input_min`
    EmptyInputSpan { input_min: i32, input_max: i32 },
    /// Filter coefficient is NaN or outside 0.0-1.0
    FilterCoefficientOutOfRange(f32),
}

impl fmt::Display for CalibrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInputSpan {
                input_min,
                input_max,
            } => write!(f, "input range {}..{} is empty", input_min, input_max),
            Self::FilterCoefficientOutOfRange(alpha) => {
                write!(f, "filter coefficient {} is outside 0.0-1.0", alpha)
            }
        }
    }
}

impl core::error::Error for CalibrationError {}

/// Smoothed, range-mapped sensor gauge
#[derive(Debug, Clone)]
pub struct Gauge {
    config: GaugeConfig,
    /// Width of the raw input range, never zero
    input_span: f32,
    gate: SampleGate,
    filter: LowPassFilter,
}

impl Gauge {
    /// Create a gauge from validated calibration
    ///
    /// The first sample is taken once `sampling_period` has passed since
    /// time zero.
    pub fn new(config: GaugeConfig) -> Result<Self, CalibrationError> {
        Self::starting_at(config, Instant::from_millis(0))
    }

    /// Create a gauge whose sampling cadence starts at `now`
    pub fn starting_at(config: GaugeConfig, now: Instant) -> Result<Self, CalibrationError> {
        if config.input_max <= config.input_min {
            return Err(CalibrationError::EmptyInputSpan {
                input_min: config.input_min,
                input_max: config.input_max,
            });
        }
        let alpha = config.filter_coefficient;
        if !(0.0..=1.0).contains(&alpha) {
            return Err(CalibrationError::FilterCoefficientOutOfRange(alpha));
        }

        #[allow(clippy::cast_precision_loss)]
        let input_span = (i64::from(config.input_max) - i64::from(config.input_min)) as f32;
        let output_max = f32::from(config.output_max);

        Ok(Self {
            config,
            input_span,
            gate: SampleGate::new(config.sampling_period, now),
            filter: LowPassFilter::new(alpha, output_max, f32::from(config.initial_value)),
        })
    }

    /// Advance the gauge to `now` and return the display value
    ///
    /// Reads `source` only when the sampling period has elapsed; otherwise
    /// returns the current value untouched.
    pub fn advance<S: SampleSource + ?Sized>(&mut self, now: Instant, source: &mut S) -> u16 {
        if !self.gate.is_due(now) {
            return self.value();
        }

        let raw = source.read();
        let mapped = self.map_raw(raw);
        self.filter.update(mapped);
        self.gate.mark(now);

        #[cfg(feature = "esp32-log")]
        println!(
            "[Gauge.advance] raw {} mapped {} smoothed {}",
            raw,
            mapped,
            self.filter.value()
        );

        self.value()
    }

    /// Map a raw reading onto `0..=output_max`, applying inversion
    ///
    /// Scales by the input span only. `input_min` is expected to read as a
    /// raw 0, so it is not subtracted.
    fn map_raw(&self, raw: i32) -> f32 {
        let output_max = f32::from(self.config.output_max);
        #[allow(clippy::cast_precision_loss)]
        let mapped = output_max * (raw as f32 / self.input_span);
        let mapped = clamp_to(mapped, output_max);
        if self.config.inverted {
            output_max - mapped
        } else {
            mapped
        }
    }

    /// Current display value, rounded to the nearest integer
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn value(&self) -> u16 {
        libm::roundf(self.filter.value()) as u16
    }

    /// Current smoothed value before rounding
    pub const fn raw_value(&self) -> f32 {
        self.filter.value()
    }

    /// Time of the last sensor read
    pub const fn last_sample(&self) -> Instant {
        self.gate.last()
    }

    /// Calibration this gauge was built with
    pub const fn config(&self) -> &GaugeConfig {
        &self.config
    }
}
