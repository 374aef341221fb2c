//! The position registry: the editable set of marker positions.
//!
//! Every mutation keeps `0 <= x, y <= 100` and unique ids. The registry never
//! records history on its own; callers push snapshots when a change should
//! become an undo step.

use std::collections::HashSet;

use mapmark_geometry::clamp_percent;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::RegistryError;
use crate::marker::{MarkerId, MarkerPosition, PositionUpdate, PropertyRecord};

/// Immutable copy of a registry at one point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    markers: Vec<MarkerPosition>,
}

impl Snapshot {
    pub fn markers(&self) -> &[MarkerPosition] {
        &self.markers
    }

    pub fn get(&self, id: MarkerId) -> Option<&MarkerPosition> {
        self.markers.iter().find(|m| m.id == id)
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

/// Ordered marker positions with unique ids
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registry {
    markers: Vec<MarkerPosition>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a registry from the external property list
    pub fn from_source(source: &[PropertyRecord]) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        registry.reset_from_source(source)?;
        Ok(registry)
    }

    pub fn get(&self, id: MarkerId) -> Option<&MarkerPosition> {
        self.markers.iter().find(|m| m.id == id)
    }

    pub fn contains(&self, id: MarkerId) -> bool {
        self.get(id).is_some()
    }

    /// Move a marker, clamping both coordinates.
    ///
    /// Returns false (and does nothing) when `id` is not in the registry.
    pub fn set_position(&mut self, id: MarkerId, x: f64, y: f64) -> bool {
        match self.markers.iter_mut().find(|m| m.id == id) {
            Some(marker) => {
                marker.x = clamp_percent(x);
                marker.y = clamp_percent(y);
                true
            }
            None => false,
        }
    }

    /// Replace every entry at once.
    ///
    /// Rejects the new contents if any id repeats; the registry is unchanged
    /// in that case.
    pub fn replace_all(&mut self, markers: Vec<MarkerPosition>) -> Result<(), RegistryError> {
        check_unique(markers.iter().map(|m| m.id))?;
        self.markers = markers
            .into_iter()
            .map(|m| MarkerPosition {
                x: clamp_percent(m.x),
                y: clamp_percent(m.y),
                ..m
            })
            .collect();
        Ok(())
    }

    /// Restore a previously taken snapshot
    pub fn restore(&mut self, snapshot: &Snapshot) -> Result<(), RegistryError> {
        self.replace_all(snapshot.markers.clone())
    }

    /// Rebuild the registry 1:1 from the property list
    pub fn reset_from_source(&mut self, source: &[PropertyRecord]) -> Result<(), RegistryError> {
        if let Err(e) = check_unique(source.iter().map(|r| r.id)) {
            warn!(error = %e, "rejected property list");
            return Err(e);
        }
        self.markers = source.iter().map(PropertyRecord::to_marker).collect();
        Ok(())
    }

    /// Scatter every marker to a random whole-number position
    pub fn randomize<R: Rng>(&mut self, rng: &mut R) {
        for marker in &mut self.markers {
            marker.x = f64::from(rng.random_range(0u8..100));
            marker.y = f64::from(rng.random_range(0u8..100));
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            markers: self.markers.clone(),
        }
    }

    /// Whether the registry currently holds exactly the snapshot's contents
    pub fn matches(&self, snapshot: &Snapshot) -> bool {
        self.markers == snapshot.markers
    }

    /// Positions in the shape the property store expects
    pub fn positions(&self) -> Vec<PositionUpdate> {
        self.markers.iter().map(PositionUpdate::from).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MarkerPosition> {
        self.markers.iter()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

fn check_unique(ids: impl Iterator<Item = MarkerId>) -> Result<(), RegistryError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(RegistryError::DuplicateId(id));
        }
    }
    Ok(())
}
