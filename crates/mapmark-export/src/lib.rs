//! JSON export of map settings and marker positions.
//!
//! An export is a pass-through snapshot for offline backup: the map settings,
//! every marker position and the time it was taken.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use mapmark_core::{MapSettings, MarkerPosition};
use mapmark_session::EditorSession;
use serde::{Deserialize, Serialize};
use tracing::info;

/// File name offered for downloads
pub const DEFAULT_EXPORT_FILE: &str = "map-positions.json";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Complete, stable snapshot of an editing session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSnapshot {
    pub map_settings: MapSettings,
    pub marker_positions: Vec<MarkerPosition>,
    pub timestamp: DateTime<Utc>,
}

impl ExportSnapshot {
    /// Capture the session's current settings and registry
    pub fn capture(session: &EditorSession) -> Self {
        Self::at(session, Utc::now())
    }

    pub fn at(session: &EditorSession, timestamp: DateTime<Utc>) -> Self {
        Self {
            map_settings: session.settings().clone(),
            marker_positions: session.registry().iter().cloned().collect(),
            timestamp,
        }
    }

    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ExportError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Write an export document to disk
pub fn write_export(path: &Path, snapshot: &ExportSnapshot) -> Result<(), ExportError> {
    let io_err = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
    }
    fs::write(path, snapshot.to_json()?).map_err(io_err)?;
    info!(
        path = %path.display(),
        markers = snapshot.marker_positions.len(),
        "exported marker positions"
    );
    Ok(())
}

/// Read an export document back
pub fn read_export(path: &Path) -> Result<ExportSnapshot, ExportError> {
    let content = fs::read_to_string(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    ExportSnapshot::from_json(&content)
}
