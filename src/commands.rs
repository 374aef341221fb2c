//! Scripted editor input.
//!
//! A script is the headless form of the pointer and form bindings a UI host
//! would install: each command maps onto one session call, in order.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use mapmark_core::{MapSettingsUpdate, MarkerId, Preset};
use mapmark_geometry::{Bounds, GridSize};
use mapmark_session::{Axis, EditorSession};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One editor input event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditorCommand {
    Select { id: MarkerId },
    Deselect,
    /// Click on the map at client pixel coordinates
    Click { x: f64, y: f64 },
    BeginDrag { id: MarkerId },
    /// Pointer moved by a pixel delta
    DragMove { dx: f64, dy: f64 },
    EndDrag,
    CancelDrag,
    SetPosition { x: f64, y: f64 },
    SetAxis { axis: Axis, value: f64 },
    Copy,
    CopyFrom { id: MarkerId },
    Paste,
    PasteTo { id: MarkerId },
    ApplyPreset { preset: Preset, index: usize },
    ResetAll,
    Randomize {
        #[serde(default)]
        seed: Option<u64>,
    },
    Undo,
    Redo,
    SetSnap { enabled: bool },
    SetGridSize { size: f64 },
    /// Pick a grid spacing from the grid menu
    SetGrid { grid: GridSize },
    SetShowGrid { show: bool },
    SetEditMode { enabled: bool },
    UpdateSettings { settings: MapSettingsUpdate },
}

/// A command list plus the container the pointer events are relative to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    #[serde(default = "default_bounds")]
    pub bounds: Bounds,
    pub commands: Vec<EditorCommand>,
}

fn default_bounds() -> Bounds {
    Bounds::sized(1000.0, 1000.0)
}

impl Script {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read script: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse script: {}", path.display()))
    }
}

/// Counts of commands that changed something vs. were no-ops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayReport {
    pub applied: usize,
    pub ignored: usize,
}

/// Apply one command; returns whether the session acted on it
pub fn apply(session: &mut EditorSession, command: &EditorCommand, bounds: &Bounds) -> bool {
    match command {
        EditorCommand::Select { id } => session.select(*id),
        EditorCommand::Deselect => {
            session.deselect();
            true
        }
        EditorCommand::Click { x, y } => session.click(*x, *y, bounds),
        EditorCommand::BeginDrag { id } => session.begin_drag(*id),
        EditorCommand::DragMove { dx, dy } => session.update_drag(*dx, *dy, bounds),
        EditorCommand::EndDrag => session.end_drag(),
        EditorCommand::CancelDrag => session.cancel_drag(),
        EditorCommand::SetPosition { x, y } => session.set_selected_position(*x, *y),
        EditorCommand::SetAxis { axis, value } => session.set_selected_axis(*axis, *value),
        EditorCommand::Copy => session.copy(),
        EditorCommand::CopyFrom { id } => session.copy_from(*id),
        EditorCommand::Paste => session.paste(),
        EditorCommand::PasteTo { id } => session.paste_to(*id),
        EditorCommand::ApplyPreset { preset, index } => session.apply_preset(*preset, *index),
        EditorCommand::ResetAll => session.reset_all(),
        EditorCommand::Randomize { seed: Some(seed) } => {
            session.randomize_with(&mut StdRng::seed_from_u64(*seed))
        }
        EditorCommand::Randomize { seed: None } => session.randomize(),
        EditorCommand::Undo => session.undo(),
        EditorCommand::Redo => session.redo(),
        EditorCommand::SetSnap { enabled } => {
            session.set_snap_enabled(*enabled);
            true
        }
        EditorCommand::SetGridSize { size } => {
            session.set_grid_size(*size);
            true
        }
        EditorCommand::SetGrid { grid } => {
            session.set_grid(*grid);
            true
        }
        EditorCommand::SetShowGrid { show } => {
            session.set_show_grid(*show);
            true
        }
        EditorCommand::SetEditMode { enabled } => {
            session.set_edit_mode(*enabled);
            true
        }
        EditorCommand::UpdateSettings { settings } => session.update_settings(settings),
    }
}

/// Replay a whole script in order
pub fn replay(session: &mut EditorSession, script: &Script) -> ReplayReport {
    let mut report = ReplayReport::default();
    for (index, command) in script.commands.iter().enumerate() {
        if apply(session, command, &script.bounds) {
            report.applied += 1;
        } else {
            debug!(index, ?command, "command had no effect");
            report.ignored += 1;
        }
    }
    // Pointer-up may never arrive at the end of a script
    if session.is_dragging() {
        session.end_drag();
    }
    report
}
