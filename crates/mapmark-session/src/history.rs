//! Linear undo/redo history over registry snapshots.
//!
//! Entries form a single list with a cursor pointing at the current state.
//! Pushing after an undo discards everything past the cursor, so an undone
//! branch can never be redone once new work is recorded.

use mapmark_core::Snapshot;

/// Default number of snapshots kept by an editor session
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Snapshot history with a cursor
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Snapshot>,
    cursor: usize,
    /// Maximum entries kept; 0 means unbounded
    max_history: usize,
}

impl History {
    /// Create an unbounded history
    pub fn new() -> Self {
        Self::with_limit(0)
    }

    /// Create a history that keeps at most `max_history` entries
    pub fn with_limit(max_history: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
            max_history,
        }
    }

    /// Record a new current state, dropping any redo branch
    pub fn push(&mut self, snapshot: Snapshot) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
        }
        self.entries.push(snapshot);

        // Limit history size
        if self.max_history > 0 && self.entries.len() > self.max_history {
            let excess = self.entries.len() - self.max_history;
            self.entries.drain(..excess);
        }
        self.cursor = self.entries.len() - 1;
    }

    /// Step back, returning the snapshot that is now current
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor)
    }

    /// Step forward, returning the snapshot that is now current
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        self.entries.get(self.cursor)
    }

    pub fn current(&self) -> Option<&Snapshot> {
        self.entries.get(self.cursor)
    }

    /// Index of the current entry, `None` while empty
    pub fn cursor(&self) -> Option<usize> {
        if self.entries.is_empty() {
            None
        } else {
            Some(self.cursor)
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty() && self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        !self.entries.is_empty() && self.cursor + 1 < self.entries.len()
    }

    /// Number of steps available to undo
    pub fn undo_count(&self) -> usize {
        self.cursor().unwrap_or(0)
    }

    /// Number of steps available to redo
    pub fn redo_count(&self) -> usize {
        self.cursor()
            .map(|c| self.entries.len() - 1 - c)
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.max_history
    }
}

impl Default for History {
    fn default() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }
}
