use serde::{Deserialize, Serialize};

use crate::percent::PercentPoint;

/// Bounding box of the map container in client pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Bounds anchored at the origin
    pub fn sized(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Convert a client-space pointer position to container percentages.
    ///
    /// The result is not clamped: clicks outside the container produce values
    /// outside `[0, 100]`.
    pub fn to_percent(&self, client_x: f64, client_y: f64) -> PercentPoint {
        PercentPoint {
            x: scale(client_x - self.left, self.width),
            y: scale(client_y - self.top, self.height),
        }
    }

    /// Convert a pixel delta to a percentage delta
    pub fn delta_to_percent(&self, dx: f64, dy: f64) -> (f64, f64) {
        (scale(dx, self.width), scale(dy, self.height))
    }

    /// Whether the container has a usable (positive, finite) area
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0)
    }
}

// Degenerate extents contribute nothing rather than dividing by zero
fn scale(pixels: f64, extent: f64) -> f64 {
    if extent.is_finite() && extent > 0.0 {
        pixels / extent * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_percent_relative_to_origin() {
        let bounds = Bounds::new(100.0, 50.0, 800.0, 400.0);
        let p = bounds.to_percent(580.0, 370.0);
        assert!((p.x - 60.0).abs() < 1e-9);
        assert!((p.y - 80.0).abs() < 1e-9);
    }

    #[test]
    fn delta_to_percent_scales_per_axis() {
        let bounds = Bounds::sized(200.0, 50.0);
        let (dx, dy) = bounds.delta_to_percent(20.0, -5.0);
        assert!((dx - 10.0).abs() < 1e-9);
        assert!((dy + 10.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_bounds_yield_zero() {
        let bounds = Bounds::sized(0.0, -10.0);
        assert!(bounds.is_degenerate());
        assert_eq!(bounds.delta_to_percent(15.0, 15.0), (0.0, 0.0));
        assert_eq!(bounds.to_percent(15.0, 15.0), PercentPoint::new(0.0, 0.0));
    }
}
