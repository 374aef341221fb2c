use mapmark_geometry::{clamp_percent, PercentPoint};
use serde::{Deserialize, Serialize};

/// Label used when the source property has no name
pub const UNKNOWN_PROPERTY_NAME: &str = "Unknown Project";

/// Marker identifier, matches the external property record id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkerId(pub i64);

impl std::fmt::Display for MarkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for MarkerId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<i32> for MarkerId {
    fn from(id: i32) -> Self {
        Self(i64::from(id))
    }
}

/// One marker on the map, positioned in percent of the container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerPosition {
    pub id: MarkerId,
    pub name: String,
    pub x: f64,
    pub y: f64,
}

impl MarkerPosition {
    /// Create a marker, clamping the coordinates into range
    pub fn new(id: impl Into<MarkerId>, name: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            x: clamp_percent(x),
            y: clamp_percent(y),
        }
    }

    pub fn point(&self) -> PercentPoint {
        PercentPoint::new(self.x, self.y)
    }
}

/// A property row as supplied by the surrounding application.
///
/// Missing names and coordinates are tolerated; they default the same way
/// the admin console always has.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub id: MarkerId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
}

impl PropertyRecord {
    pub fn new(id: impl Into<MarkerId>, name: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
            x: Some(x),
            y: Some(y),
        }
    }

    /// Build the editor marker for this property
    pub fn to_marker(&self) -> MarkerPosition {
        let name = match self.name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => UNKNOWN_PROPERTY_NAME.to_string(),
        };
        MarkerPosition::new(self.id, name, self.x.unwrap_or(0.0), self.y.unwrap_or(0.0))
    }
}

/// Position handed back to the property store on save
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionUpdate {
    pub id: MarkerId,
    pub x: f64,
    pub y: f64,
}

impl From<&MarkerPosition> for PositionUpdate {
    fn from(marker: &MarkerPosition) -> Self {
        Self {
            id: marker.id,
            x: marker.x,
            y: marker.y,
        }
    }
}
