//! Percentage-space geometry for map markers.
//!
//! Marker coordinates are stored as percentages of the map container's width
//! and height so they survive any viewport resize. This crate holds the pure
//! pieces: clamping, pixel-to-percent conversion against a container's
//! bounding box, and grid snapping.

pub mod bounds;
pub mod percent;
pub mod snap;

pub use bounds::Bounds;
pub use percent::{clamp_percent, PercentPoint, PERCENT_MAX, PERCENT_MIN};
pub use snap::{snap, snap_point, GridSize};
