//! Collaborators that receive saved marker positions.
//!
//! The session only hands positions over; where they end up is up to the
//! store. [`JsonFileStore`] keeps the property list in a JSON file and
//! rewrites coordinates in place, leaving every other field alone.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use mapmark_core::{MapSettings, MarkerId, PositionUpdate, PropertyRecord};
use serde_json::Value;
use tracing::debug;

use crate::error::StoreError;

/// Destination for positions and settings on save
pub trait PositionStore {
    fn save_positions(&mut self, updates: &[PositionUpdate]) -> Result<(), StoreError>;

    fn save_map_settings(&mut self, settings: &MapSettings) -> Result<(), StoreError>;
}

/// In-memory store, keyed by marker id
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub positions: HashMap<MarkerId, PositionUpdate>,
    pub settings: Option<MapSettings>,
    /// Number of position saves received
    pub saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self, id: MarkerId) -> Option<&PositionUpdate> {
        self.positions.get(&id)
    }
}

impl PositionStore for MemoryStore {
    fn save_positions(&mut self, updates: &[PositionUpdate]) -> Result<(), StoreError> {
        for update in updates {
            self.positions.insert(update.id, *update);
        }
        self.saves += 1;
        Ok(())
    }

    fn save_map_settings(&mut self, settings: &MapSettings) -> Result<(), StoreError> {
        self.settings = Some(settings.clone());
        Ok(())
    }
}

/// Store backed by a JSON array of property objects
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    properties_path: PathBuf,
    settings_path: Option<PathBuf>,
}

impl JsonFileStore {
    pub fn new(properties_path: impl Into<PathBuf>) -> Self {
        Self {
            properties_path: properties_path.into(),
            settings_path: None,
        }
    }

    /// Also persist map settings to `path`
    pub fn with_settings_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings_path = Some(path.into());
        self
    }

    pub fn properties_path(&self) -> &Path {
        &self.properties_path
    }

    /// Read the property list the editor is seeded from
    pub fn load_properties(&self) -> Result<Vec<PropertyRecord>, StoreError> {
        let content = read(&self.properties_path)?;
        serde_json::from_str(&content).map_err(|source| StoreError::Json {
            path: self.properties_path.clone(),
            source,
        })
    }

    /// Read saved map settings, or defaults when none were saved yet
    pub fn load_map_settings(&self) -> Result<MapSettings, StoreError> {
        match &self.settings_path {
            Some(path) if path.exists() => {
                let content = read(path)?;
                serde_json::from_str(&content).map_err(|source| StoreError::Json {
                    path: path.clone(),
                    source,
                })
            }
            _ => Ok(MapSettings::default()),
        }
    }
}

impl PositionStore for JsonFileStore {
    fn save_positions(&mut self, updates: &[PositionUpdate]) -> Result<(), StoreError> {
        let path = &self.properties_path;
        let content = read(path)?;
        let mut rows: Value = serde_json::from_str(&content).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;
        let Some(rows) = rows.as_array_mut() else {
            return Err(StoreError::NotAnArray(path.clone()));
        };

        let by_id: HashMap<i64, &PositionUpdate> = updates.iter().map(|u| (u.id.0, u)).collect();
        let mut written = 0;
        for row in rows.iter_mut() {
            let Some(update) = row
                .get("id")
                .and_then(Value::as_i64)
                .and_then(|id| by_id.get(&id))
            else {
                continue;
            };
            if let Some(obj) = row.as_object_mut() {
                obj.insert("x".to_string(), Value::from(update.x));
                obj.insert("y".to_string(), Value::from(update.y));
                written += 1;
            }
        }
        debug!(path = %path.display(), written, "wrote marker positions");

        write_json(path, &Value::Array(std::mem::take(rows)))
    }

    fn save_map_settings(&mut self, settings: &MapSettings) -> Result<(), StoreError> {
        match &self.settings_path {
            Some(path) => {
                let value = serde_json::to_value(settings).map_err(|source| StoreError::Json {
                    path: path.clone(),
                    source,
                })?;
                write_json(path, &value)
            }
            None => Ok(()),
        }
    }
}

fn read(path: &Path) -> Result<String, StoreError> {
    fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write_json(path: &Path, value: &Value) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
    }
    let content = serde_json::to_string_pretty(value).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, content).map_err(io_err)
}
