//! Snap-to-grid in percentage space.

use serde::{Deserialize, Serialize};

use crate::percent::PercentPoint;

/// Grid sizes offered by the editor's grid menu (percent of container)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridSize {
    Five,
    #[default]
    Ten,
    Twenty,
    TwentyFive,
}

impl GridSize {
    pub const ALL: [GridSize; 4] = [
        GridSize::Five,
        GridSize::Ten,
        GridSize::Twenty,
        GridSize::TwentyFive,
    ];

    pub fn percent(self) -> f64 {
        match self {
            GridSize::Five => 5.0,
            GridSize::Ten => 10.0,
            GridSize::Twenty => 20.0,
            GridSize::TwentyFive => 25.0,
        }
    }

    /// Look up a menu entry by its percentage value
    pub fn from_percent(value: f64) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.percent() == value)
    }

    /// Cycle to the next menu entry
    pub fn next(self) -> Self {
        match self {
            GridSize::Five => GridSize::Ten,
            GridSize::Ten => GridSize::Twenty,
            GridSize::Twenty => GridSize::TwentyFive,
            GridSize::TwentyFive => GridSize::Five,
        }
    }
}

/// Snap a coordinate to the nearest multiple of `grid_size`.
///
/// Returns the input unchanged when snapping is disabled or the grid size is
/// not a positive finite number.
pub fn snap(coordinate: f64, grid_size: f64, enabled: bool) -> f64 {
    if !enabled || !grid_size.is_finite() || grid_size <= 0.0 {
        return coordinate;
    }
    (coordinate / grid_size).round() * grid_size
}

/// Snap both axes of a point
pub fn snap_point(point: PercentPoint, grid_size: f64, enabled: bool) -> PercentPoint {
    PercentPoint {
        x: snap(point.x, grid_size, enabled),
        y: snap(point.y, grid_size, enabled),
    }
}
