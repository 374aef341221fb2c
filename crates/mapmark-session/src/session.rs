//! The marker editor session.
//!
//! A session owns the registry, its undo history, the selection, the
//! clipboard and the current drag gesture. Every committed edit records the
//! resulting registry as one history entry; the session is seeded with the
//! opening registry so that the entry before the cursor is always the state
//! an undo returns to.

use mapmark_core::{
    MapSettings, MapSettingsUpdate, MarkerId, MarkerPosition, PositionUpdate, Preset,
    PropertyRecord, Registry, RegistryError, Snapshot,
};
use mapmark_geometry::{clamp_percent, snap_point, Bounds, GridSize, PercentPoint};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::EditorConfig;
use crate::error::StoreError;
use crate::gesture::{DragState, Gesture};
use crate::history::History;
use crate::store::PositionStore;

/// Unique identifier for an editing session (for logs)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Coordinate axis for numeric field edits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

/// Result of a successful save
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveSummary {
    pub markers: usize,
}

/// One operator's editing session over a map's markers
pub struct EditorSession {
    id: SessionId,
    /// Property list the session was opened from (reset target)
    source: Vec<PropertyRecord>,
    registry: Registry,
    history: History,
    settings: MapSettings,
    saved: Snapshot,
    saved_settings: MapSettings,
    selected: Option<MarkerId>,
    clipboard: Option<PercentPoint>,
    gesture: Gesture,
    grid_size: f64,
    snap_enabled: bool,
    edit_mode: bool,
    show_grid: bool,
}

impl EditorSession {
    /// Open an editor over the given property list
    pub fn open(
        source: Vec<PropertyRecord>,
        settings: MapSettings,
        config: &EditorConfig,
    ) -> Result<Self, RegistryError> {
        let registry = Registry::from_source(&source)?;
        let mut history = History::with_limit(config.history_limit);
        history.push(registry.snapshot());

        let session = Self {
            id: SessionId::new(),
            saved: registry.snapshot(),
            saved_settings: settings.clone(),
            source,
            registry,
            history,
            settings,
            selected: None,
            clipboard: None,
            gesture: Gesture::Idle,
            grid_size: config.grid_size,
            snap_enabled: config.snap_to_grid,
            edit_mode: config.edit_mode,
            show_grid: config.show_grid,
        };
        info!(session = %session.id, markers = session.registry.len(), "opened marker editor");
        Ok(session)
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn source(&self) -> &[PropertyRecord] {
        &self.source
    }

    pub fn marker(&self, id: MarkerId) -> Option<&MarkerPosition> {
        self.registry.get(id)
    }

    /// Current positions in the shape the property store expects
    pub fn positions(&self) -> Vec<PositionUpdate> {
        self.registry.positions()
    }

    // ---------------------------------------------------------------------
    // Selection and controls
    // ---------------------------------------------------------------------

    /// Select a marker, replacing any previous selection
    pub fn select(&mut self, id: MarkerId) -> bool {
        if !self.registry.contains(id) {
            return false;
        }
        self.selected = Some(id);
        true
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<MarkerId> {
        self.selected
    }

    pub fn selected_marker(&self) -> Option<&MarkerPosition> {
        self.selected.and_then(|id| self.registry.get(id))
    }

    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    /// Toggle edit mode; leaving it ends any drag in progress
    pub fn set_edit_mode(&mut self, enabled: bool) {
        if !enabled {
            self.settle_gesture();
        }
        self.edit_mode = enabled;
    }

    pub fn snap_enabled(&self) -> bool {
        self.snap_enabled
    }

    pub fn set_snap_enabled(&mut self, enabled: bool) {
        self.snap_enabled = enabled;
    }

    pub fn grid_size(&self) -> f64 {
        self.grid_size
    }

    /// Set the grid spacing; non-positive values behave as snapping off
    pub fn set_grid_size(&mut self, grid_size: f64) {
        self.grid_size = grid_size;
    }

    pub fn set_grid(&mut self, grid: GridSize) {
        self.grid_size = grid.percent();
    }

    pub fn show_grid(&self) -> bool {
        self.show_grid
    }

    pub fn set_show_grid(&mut self, show: bool) {
        self.show_grid = show;
    }

    pub fn settings(&self) -> &MapSettings {
        &self.settings
    }

    /// Apply a map settings change field by field
    pub fn update_settings(&mut self, update: &MapSettingsUpdate) -> bool {
        self.settings.apply(update)
    }

    // ---------------------------------------------------------------------
    // Pointer interaction
    // ---------------------------------------------------------------------

    /// Place the selected marker where the map was clicked
    pub fn click(&mut self, client_x: f64, client_y: f64, bounds: &Bounds) -> bool {
        if !self.edit_mode || self.gesture.is_dragging() {
            return false;
        }
        let Some(id) = self.selected else {
            return false;
        };
        let target = self.snapped(bounds.to_percent(client_x, client_y));
        self.registry.set_position(id, target.x, target.y) && self.commit("click")
    }

    /// Start dragging a marker. Selects it; nothing is recorded yet.
    pub fn begin_drag(&mut self, id: MarkerId) -> bool {
        if !self.edit_mode {
            return false;
        }
        let Some(origin) = self.registry.get(id).map(MarkerPosition::point) else {
            return false;
        };
        self.settle_gesture();
        self.selected = Some(id);
        self.gesture = Gesture::Dragging(DragState {
            marker: id,
            origin,
            raw: origin,
            moves: 0,
        });
        debug!(session = %self.id, marker = %id, "drag started");
        true
    }

    /// Apply one pointer move of `(dx, dy)` pixels to the dragged marker
    pub fn update_drag(&mut self, dx: f64, dy: f64, bounds: &Bounds) -> bool {
        let Gesture::Dragging(ref mut drag) = self.gesture else {
            return false;
        };
        let (px, py) = bounds.delta_to_percent(dx, dy);
        drag.raw = drag.raw.offset(px, py).clamped();
        drag.moves += 1;
        let (id, raw) = (drag.marker, drag.raw);

        let target = self.snapped(raw);
        self.registry.set_position(id, target.x, target.y)
    }

    /// Finish the drag, recording one history entry if the marker moved
    pub fn end_drag(&mut self) -> bool {
        let Gesture::Dragging(drag) = std::mem::take(&mut self.gesture) else {
            return false;
        };
        let pushed = self.commit("drag");
        debug!(
            session = %self.id,
            marker = %drag.marker,
            moves = drag.moves,
            pushed,
            "drag finished"
        );
        pushed
    }

    /// Abandon the drag and put the marker back where it started
    pub fn cancel_drag(&mut self) -> bool {
        let Gesture::Dragging(drag) = std::mem::take(&mut self.gesture) else {
            return false;
        };
        self.registry
            .set_position(drag.marker, drag.origin.x, drag.origin.y);
        debug!(session = %self.id, marker = %drag.marker, "drag cancelled");
        true
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.is_dragging()
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    // ---------------------------------------------------------------------
    // Direct edits
    // ---------------------------------------------------------------------

    /// Numeric x/y entry for the selected marker (not snapped)
    pub fn set_selected_position(&mut self, x: f64, y: f64) -> bool {
        self.settle_gesture();
        let Some(id) = self.selected else {
            return false;
        };
        self.registry.set_position(id, x, y) && self.commit("numeric edit")
    }

    /// Numeric entry for a single axis of the selected marker
    pub fn set_selected_axis(&mut self, axis: Axis, value: f64) -> bool {
        let Some(current) = self.selected_marker().map(MarkerPosition::point) else {
            return false;
        };
        match axis {
            Axis::X => self.set_selected_position(value, current.y),
            Axis::Y => self.set_selected_position(current.x, value),
        }
    }

    /// Move the selected marker to a preset district location
    pub fn apply_preset(&mut self, preset: Preset, index: usize) -> bool {
        let Some(location) = preset.location(index) else {
            return false;
        };
        self.set_selected_position(location.x, location.y)
    }

    /// Copy the selected marker's position
    pub fn copy(&mut self) -> bool {
        match self.selected {
            Some(id) => self.copy_from(id),
            None => false,
        }
    }

    /// Copy a marker's position into the clipboard
    pub fn copy_from(&mut self, id: MarkerId) -> bool {
        match self.registry.get(id) {
            Some(marker) => {
                self.clipboard = Some(marker.point());
                true
            }
            None => false,
        }
    }

    /// Paste the clipboard onto the selected marker
    pub fn paste(&mut self) -> bool {
        match self.selected {
            Some(id) => self.paste_to(id),
            None => false,
        }
    }

    /// Paste the clipboard onto a marker
    pub fn paste_to(&mut self, id: MarkerId) -> bool {
        let Some(point) = self.clipboard else {
            return false;
        };
        self.settle_gesture();
        self.registry.set_position(id, point.x, point.y) && self.commit("paste")
    }

    pub fn clipboard(&self) -> Option<PercentPoint> {
        self.clipboard
    }

    // ---------------------------------------------------------------------
    // Bulk operations
    // ---------------------------------------------------------------------

    /// Discard edits and return every marker to its source position
    pub fn reset_all(&mut self) -> bool {
        self.settle_gesture();
        if let Err(e) = self.registry.reset_from_source(&self.source) {
            warn!(session = %self.id, error = %e, "reset failed");
            return false;
        }
        info!(session = %self.id, "marker positions reset");
        self.commit("reset")
    }

    /// Scatter every marker using the thread-local RNG
    pub fn randomize(&mut self) -> bool {
        self.randomize_with(&mut rand::rng())
    }

    pub fn randomize_with<R: Rng>(&mut self, rng: &mut R) -> bool {
        self.settle_gesture();
        self.registry.randomize(rng);
        self.commit("randomize")
    }

    // ---------------------------------------------------------------------
    // History
    // ---------------------------------------------------------------------

    pub fn undo(&mut self) -> bool {
        self.settle_gesture();
        let Some(snapshot) = self.history.undo().cloned() else {
            return false;
        };
        self.restore(&snapshot, "undo")
    }

    pub fn redo(&mut self) -> bool {
        self.settle_gesture();
        let Some(snapshot) = self.history.redo().cloned() else {
            return false;
        };
        self.restore(&snapshot, "redo")
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ---------------------------------------------------------------------
    // Save
    // ---------------------------------------------------------------------

    /// Whether positions or settings differ from the last save
    pub fn is_dirty(&self) -> bool {
        !self.registry.matches(&self.saved) || self.settings != self.saved_settings
    }

    /// Hand every marker position, then the settings, to the store.
    ///
    /// Nothing is marked saved unless both writes succeed.
    pub fn save<S: PositionStore + ?Sized>(
        &mut self,
        store: &mut S,
    ) -> Result<SaveSummary, StoreError> {
        self.settle_gesture();
        let positions = self.registry.positions();
        store.save_positions(&positions)?;
        store.save_map_settings(&self.settings)?;

        // Saved positions become the new reset target
        for record in &mut self.source {
            if let Some(marker) = self.registry.get(record.id) {
                record.x = Some(marker.x);
                record.y = Some(marker.y);
            }
        }
        self.saved = self.registry.snapshot();
        self.saved_settings = self.settings.clone();

        info!(
            session = %self.id,
            markers = positions.len(),
            "Map settings updated with {} marker positions",
            positions.len()
        );
        Ok(SaveSummary {
            markers: positions.len(),
        })
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    fn snapped(&self, point: PercentPoint) -> PercentPoint {
        let clamped = point.clamped();
        let snapped = snap_point(clamped, self.grid_size, self.snap_enabled);
        PercentPoint::new(clamp_percent(snapped.x), clamp_percent(snapped.y))
    }

    /// Record the registry as a new history entry if it changed
    fn commit(&mut self, action: &'static str) -> bool {
        if self
            .history
            .current()
            .is_some_and(|current| self.registry.matches(current))
        {
            return false;
        }
        self.history.push(self.registry.snapshot());
        debug!(session = %self.id, action, entries = self.history.len(), "history push");
        true
    }

    fn restore(&mut self, snapshot: &Snapshot, action: &'static str) -> bool {
        match self.registry.restore(snapshot) {
            Ok(()) => {
                debug!(
                    session = %self.id,
                    action,
                    cursor = ?self.history.cursor(),
                    "history restore"
                );
                true
            }
            Err(e) => {
                warn!(session = %self.id, action, error = %e, "history restore rejected");
                false
            }
        }
    }

    /// Finish a drag the host never ended
    fn settle_gesture(&mut self) {
        if self.gesture.is_dragging() {
            self.end_drag();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn source() -> Vec<PropertyRecord> {
        vec![
            PropertyRecord::new(1, "King Fahd District", 10.0, 10.0),
            PropertyRecord::new(2, "Al Olaya", 45.0, 35.0),
            PropertyRecord::new(3, "Al Malqa", 25.0, 30.0),
        ]
    }

    fn open() -> EditorSession {
        EditorSession::open(source(), MapSettings::default(), &EditorConfig::default()).unwrap()
    }

    fn pos(session: &EditorSession, id: i64) -> (f64, f64) {
        let m = session.marker(MarkerId(id)).unwrap();
        (m.x, m.y)
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    const BOUNDS: Bounds = Bounds {
        left: 0.0,
        top: 0.0,
        width: 1000.0,
        height: 500.0,
    };

    #[test]
    fn open_seeds_history_with_registry() {
        let session = open();
        assert_eq!(session.history().len(), 1);
        assert!(!session.can_undo());
        assert!(!session.is_dirty());
    }

    #[test]
    fn open_rejects_duplicate_ids() {
        let mut records = source();
        records.push(PropertyRecord::new(1, "Exit 5", 70.0, 50.0));
        let result = EditorSession::open(records, MapSettings::default(), &EditorConfig::default());
        assert!(matches!(result, Err(RegistryError::DuplicateId(MarkerId(1)))));
    }

    #[test]
    fn select_unknown_marker_keeps_selection() {
        let mut session = open();
        assert!(session.select(MarkerId(2)));
        assert!(!session.select(MarkerId(42)));
        assert_eq!(session.selected(), Some(MarkerId(2)));
        assert!(session.select(MarkerId(3)));
        assert_eq!(session.selected(), Some(MarkerId(3)));
    }

    #[test]
    fn click_places_snapped_marker() {
        let mut session = open();
        session.set_snap_enabled(true);
        session.set_grid_size(10.0);
        session.select(MarkerId(1));
        assert!(session.click(600.0, 400.0, &BOUNDS));
        assert_eq!(pos(&session, 1), (60.0, 80.0));
    }

    #[test]
    fn click_without_snap_keeps_raw_position() {
        let mut session = open();
        session.select(MarkerId(1));
        assert!(session.click(634.0, 391.0, &BOUNDS));
        let (x, y) = pos(&session, 1);
        assert!(close(x, 63.4));
        assert!(close(y, 78.2));
    }

    #[test]
    fn click_is_undoable_to_prior_position() {
        let mut session = open();
        session.select(MarkerId(1));
        session.click(600.0, 400.0, &BOUNDS);
        assert_eq!(session.history().len(), 2);
        assert!(session.undo());
        assert_eq!(pos(&session, 1), (10.0, 10.0));
        assert!(session.redo());
        assert_eq!(pos(&session, 1), (60.0, 80.0));
    }

    #[test]
    fn click_requires_selection_and_edit_mode() {
        let mut session = open();
        assert!(!session.click(600.0, 400.0, &BOUNDS));
        session.select(MarkerId(1));
        session.set_edit_mode(false);
        assert!(!session.click(600.0, 400.0, &BOUNDS));
        assert_eq!(pos(&session, 1), (10.0, 10.0));
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn click_outside_container_is_clamped() {
        let mut session = open();
        session.select(MarkerId(2));
        session.click(-50.0, 900.0, &BOUNDS);
        assert_eq!(pos(&session, 2), (0.0, 100.0));
    }

    #[test]
    fn drag_gesture_records_one_entry() {
        let mut session = open();
        assert!(session.begin_drag(MarkerId(2)));
        assert_eq!(session.selected(), Some(MarkerId(2)));
        for _ in 0..50 {
            assert!(session.update_drag(2.0, 1.0, &BOUNDS));
        }
        assert_eq!(session.history().len(), 1);
        assert!(session.end_drag());
        assert_eq!(session.history().len(), 2);
        let (x, y) = pos(&session, 2);
        assert!(close(x, 55.0));
        assert!(close(y, 45.0));
        assert!(!session.is_dragging());
    }

    #[test]
    fn drag_clamps_at_container_edge() {
        let mut session = open();
        session.begin_drag(MarkerId(1));
        session.update_drag(-5000.0, -5000.0, &BOUNDS);
        assert_eq!(pos(&session, 1), (0.0, 0.0));
        // Running position was clamped, so moving back takes effect at once
        session.update_drag(100.0, 50.0, &BOUNDS);
        let (x, y) = pos(&session, 1);
        assert!(close(x, 10.0));
        assert!(close(y, 10.0));
    }

    #[test]
    fn small_moves_accumulate_while_snapping() {
        let mut session = open();
        session.set_snap_enabled(true);
        session.set_grid_size(10.0);
        session.begin_drag(MarkerId(1));
        // 4 moves of 2% each: 10 -> 18, snapped to 20
        for _ in 0..4 {
            session.update_drag(20.0, 0.0, &BOUNDS);
        }
        session.end_drag();
        assert_eq!(pos(&session, 1), (20.0, 10.0));
    }

    #[test]
    fn drag_without_movement_records_nothing() {
        let mut session = open();
        session.begin_drag(MarkerId(3));
        assert!(!session.end_drag());
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn cancel_drag_restores_origin() {
        let mut session = open();
        session.begin_drag(MarkerId(3));
        session.update_drag(300.0, 100.0, &BOUNDS);
        assert!(session.cancel_drag());
        assert_eq!(pos(&session, 3), (25.0, 30.0));
        assert_eq!(session.history().len(), 1);
        assert!(!session.update_drag(10.0, 10.0, &BOUNDS));
    }

    #[test]
    fn new_drag_settles_previous_one() {
        let mut session = open();
        session.begin_drag(MarkerId(1));
        session.update_drag(100.0, 0.0, &BOUNDS);
        session.begin_drag(MarkerId(2));
        assert_eq!(session.history().len(), 2);
        assert_eq!(session.gesture().active_marker(), Some(MarkerId(2)));
    }

    #[test]
    fn click_ignored_mid_drag() {
        let mut session = open();
        session.begin_drag(MarkerId(1));
        assert!(!session.click(600.0, 400.0, &BOUNDS));
    }

    #[test]
    fn numeric_edits_commit_once_each() {
        let mut session = open();
        session.select(MarkerId(2));
        assert!(session.set_selected_axis(Axis::X, 72.5));
        assert!(session.set_selected_axis(Axis::Y, 140.0));
        assert_eq!(pos(&session, 2), (72.5, 100.0));
        assert_eq!(session.history().len(), 3);
        // Writing the same value again is not a new step
        assert!(!session.set_selected_position(72.5, 100.0));
        assert_eq!(session.history().len(), 3);
    }

    #[test]
    fn preset_moves_selected_marker() {
        let mut session = open();
        session.select(MarkerId(3));
        assert!(session.apply_preset(Preset::Dubai, 1));
        assert_eq!(pos(&session, 3), (30.0, 55.0));
        assert!(!session.apply_preset(Preset::Dubai, 12));
    }

    #[test]
    fn copy_paste_between_markers() {
        let mut session = open();
        session.select(MarkerId(2));
        assert!(session.copy());
        session.select(MarkerId(3));
        assert!(session.paste());
        assert_eq!(pos(&session, 3), (45.0, 35.0));
        assert_eq!(session.history().len(), 2);
        // Clipboard survives the paste
        assert!(session.paste_to(MarkerId(1)));
        assert_eq!(pos(&session, 1), (45.0, 35.0));
    }

    #[test]
    fn paste_with_empty_clipboard_is_noop() {
        let mut session = open();
        session.select(MarkerId(2));
        assert!(!session.paste());
        assert_eq!(pos(&session, 2), (45.0, 35.0));
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn paste_without_selection_is_noop() {
        let mut session = open();
        session.copy_from(MarkerId(1));
        assert!(!session.paste());
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn randomize_then_reset_restores_source() {
        let mut session = open();
        let original = session.registry().snapshot();
        let mut rng = StdRng::seed_from_u64(42);
        assert!(session.randomize_with(&mut rng));
        assert!(session.reset_all());
        assert!(session.registry().matches(&original));
        assert_eq!(session.history().len(), 3);
    }

    #[test]
    fn undo_redo_round_trip() {
        let mut session = open();
        let start = session.registry().snapshot();
        session.select(MarkerId(1));
        session.set_selected_position(20.0, 20.0);
        session.select(MarkerId(2));
        session.click(100.0, 100.0, &BOUNDS);
        session.begin_drag(MarkerId(3));
        session.update_drag(50.0, 50.0, &BOUNDS);
        session.end_drag();
        let end = session.registry().snapshot();

        for _ in 0..3 {
            assert!(session.undo());
        }
        assert!(!session.undo());
        assert!(session.registry().matches(&start));
        for _ in 0..3 {
            assert!(session.redo());
        }
        assert!(!session.redo());
        assert!(session.registry().matches(&end));
    }

    #[test]
    fn new_edit_after_undo_discards_redo() {
        let mut session = open();
        session.select(MarkerId(1));
        session.set_selected_position(20.0, 20.0); // A
        session.set_selected_position(30.0, 30.0); // B
        session.undo();
        session.set_selected_position(40.0, 40.0); // C
        assert!(!session.redo());
        assert_eq!(session.history().len(), 3);
        assert_eq!(session.history().cursor(), Some(2));
        assert_eq!(pos(&session, 1), (40.0, 40.0));
    }

    #[test]
    fn undo_mid_drag_commits_gesture_first() {
        let mut session = open();
        session.begin_drag(MarkerId(1));
        session.update_drag(100.0, 0.0, &BOUNDS);
        assert!(session.undo());
        assert!(!session.is_dragging());
        assert_eq!(pos(&session, 1), (10.0, 10.0));
        assert!(session.can_redo());
    }

    #[test]
    fn history_limit_from_config() {
        let config = EditorConfig {
            history_limit: 3,
            ..Default::default()
        };
        let mut session = EditorSession::open(source(), MapSettings::default(), &config).unwrap();
        session.select(MarkerId(1));
        for x in [20.0, 30.0, 40.0, 50.0] {
            session.set_selected_position(x, x);
        }
        assert_eq!(session.history().len(), 3);
        assert!(session.undo());
        assert!(session.undo());
        assert!(!session.undo());
        assert_eq!(pos(&session, 1), (30.0, 30.0));
    }

    #[test]
    fn save_hands_positions_to_store() {
        let mut session = open();
        session.select(MarkerId(2));
        session.set_selected_position(5.0, 6.0);
        session.update_settings(&MapSettingsUpdate {
            show_labels: Some(false),
            ..Default::default()
        });
        assert!(session.is_dirty());

        let mut store = MemoryStore::new();
        let summary = session.save(&mut store).unwrap();
        assert_eq!(summary.markers, 3);
        assert_eq!(store.positions.len(), 3);
        let saved = store.position(MarkerId(2)).unwrap();
        assert_eq!((saved.x, saved.y), (5.0, 6.0));
        assert_eq!(store.settings.as_ref().map(|s| s.show_labels), Some(false));
        assert!(!session.is_dirty());
    }

    /// Rejects every position write
    struct FailingStore {
        settings_saved: bool,
    }

    impl PositionStore for FailingStore {
        fn save_positions(&mut self, _positions: &[PositionUpdate]) -> Result<(), StoreError> {
            Err(StoreError::NotAnArray("properties.json".into()))
        }

        fn save_map_settings(&mut self, _settings: &MapSettings) -> Result<(), StoreError> {
            self.settings_saved = true;
            Ok(())
        }
    }

    #[test]
    fn failed_position_write_leaves_settings_unsaved() {
        let mut session = open();
        session.update_settings(&MapSettingsUpdate {
            theme: Some(mapmark_core::MapTheme::Light),
            ..Default::default()
        });
        let mut store = FailingStore {
            settings_saved: false,
        };
        assert!(session.save(&mut store).is_err());
        assert!(!store.settings_saved);
        assert!(session.is_dirty());
    }

    #[test]
    fn grid_menu_and_visibility() {
        let mut session = open();
        assert!(session.show_grid());
        session.set_show_grid(false);
        assert!(!session.show_grid());
        session.set_grid(GridSize::TwentyFive);
        assert_eq!(session.grid_size(), 25.0);
        session.set_snap_enabled(true);
        session.select(MarkerId(1));
        session.click(380.0, 240.0, &BOUNDS);
        assert_eq!(pos(&session, 1), (50.0, 50.0));
    }

    #[test]
    fn reset_after_save_returns_to_saved_positions() {
        let mut session = open();
        session.select(MarkerId(2));
        session.set_selected_position(5.0, 6.0);
        session.save(&mut MemoryStore::new()).unwrap();
        session.set_selected_position(90.0, 90.0);
        session.reset_all();
        assert_eq!(pos(&session, 2), (5.0, 6.0));
    }

    #[test]
    fn leaving_edit_mode_ends_drag() {
        let mut session = open();
        session.begin_drag(MarkerId(1));
        session.update_drag(100.0, 0.0, &BOUNDS);
        session.set_edit_mode(false);
        assert!(!session.is_dragging());
        assert_eq!(session.history().len(), 2);
        assert!(!session.begin_drag(MarkerId(1)));
    }

    proptest! {
        #[test]
        fn undo_all_then_redo_all_round_trips(
            edits in prop::collection::vec((1i64..=3, 0.0f64..100.0, 0.0f64..100.0), 1..24)
        ) {
            let config = EditorConfig {
                history_limit: 0,
                ..Default::default()
            };
            let mut session =
                EditorSession::open(source(), MapSettings::default(), &config).unwrap();
            let start = session.registry().snapshot();
            let mut pushed = 0;
            for (id, x, y) in edits {
                session.select(MarkerId(id));
                if session.set_selected_position(x, y) {
                    pushed += 1;
                }
            }
            let end = session.registry().snapshot();

            for _ in 0..pushed {
                prop_assert!(session.undo());
            }
            prop_assert!(!session.can_undo());
            prop_assert!(session.registry().matches(&start));
            for _ in 0..pushed {
                prop_assert!(session.redo());
            }
            prop_assert!(session.registry().matches(&end));
        }
    }
}
