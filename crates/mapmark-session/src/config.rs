//! Editor preferences, persisted as JSON in the user's config directory.

use std::fs;
use std::path::{Path, PathBuf};

use mapmark_geometry::GridSize;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;
use crate::history::DEFAULT_HISTORY_LIMIT;

/// Initial state of the editor's grid and history controls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Grid spacing in percent of the container
    pub grid_size: f64,
    pub snap_to_grid: bool,
    pub edit_mode: bool,
    pub show_grid: bool,
    /// Maximum undo snapshots kept; 0 keeps everything
    pub history_limit: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_size: GridSize::default().percent(),
            snap_to_grid: false,
            edit_mode: true,
            show_grid: true,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl EditorConfig {
    /// Load from the config directory, falling back to defaults
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "ignoring editor config");
                Self::default()
            }
        }
    }

    /// Load from an explicit path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        let config_dir = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".config")
            });
        config_dir.join("mapmark").join("editor.json")
    }

    /// Save to the config directory
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let content = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, content).map_err(io_err)
    }
}
