use serde::{Deserialize, Serialize};

/// Lower bound of the percentage space
pub const PERCENT_MIN: f64 = 0.0;

/// Upper bound of the percentage space
pub const PERCENT_MAX: f64 = 100.0;

/// Clamp a coordinate into `[0, 100]`.
///
/// NaN maps to 0, infinities map to the nearest bound.
pub fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        return PERCENT_MIN;
    }
    value.clamp(PERCENT_MIN, PERCENT_MAX)
}

/// A position relative to the container, in percent of width/height
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PercentPoint {
    pub x: f64,
    pub y: f64,
}

impl PercentPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Same point with both axes clamped into range
    pub fn clamped(self) -> Self {
        Self {
            x: clamp_percent(self.x),
            y: clamp_percent(self.y),
        }
    }

    /// Offset by a percentage delta (unclamped)
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}
