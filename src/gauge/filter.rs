//! Exponential low-pass filter
//!
//! Blends each new sample into the running value with weight `alpha`,
//! keeping `1 - alpha` of the previous value.

/// Single-pole low-pass filter over a bounded range
#[derive(Debug, Clone, Copy)]
pub struct LowPassFilter {
    /// Weight of the new sample (0.0-1.0)
    alpha: f32,
    /// Upper bound of the output (lower bound is 0)
    max: f32,
    /// Current smoothed value
    value: f32,
}

impl LowPassFilter {
    /// Create a filter starting at `initial`, clamped into `[0, max]`
    pub fn new(alpha: f32, max: f32, initial: f32) -> Self {
        Self {
            alpha,
            max,
            value: clamp_to(initial, max),
        }
    }

    /// Feed one sample and return the new smoothed value
    pub fn update(&mut self, sample: f32) -> f32 {
        let next = self.value - self.alpha * (self.value - sample);
        self.value = clamp_to(next, self.max);
        self.value
    }

    pub const fn value(&self) -> f32 {
        self.value
    }

    pub const fn alpha(&self) -> f32 {
        self.alpha
    }
}

/// Clamp `value` into `[0, max]`
///
/// NaN collapses to 0 so a bad sample can never escape the range.
pub(crate) fn clamp_to(value: f32, max: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, max)
}
