//! Snapshot-based undo/redo history.
//!
//! The log stores full overlay snapshots plus a cursor marking the state
//! currently on screen. Taking a snapshot after an undo discards the undone
//! branch. Once the log grows past its capacity the oldest snapshot is
//! evicted and the cursor stays put, so it keeps pointing at the newest entry.

use crate::part::{PartAttrs, PartId, PlacedPart};
use serde::{Deserialize, Serialize};

/// Serializable description of one overlay part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartDescriptor {
    pub id: PartId,
    /// Asset source; an empty source is skipped on restore.
    pub source: String,
    pub attrs: PartAttrs,
}

impl From<&PlacedPart> for PartDescriptor {
    fn from(part: &PlacedPart) -> Self {
        Self {
            id: part.id(),
            source: part.source.clone(),
            attrs: part.attrs,
        }
    }
}

/// Overlay state at one point in time, back to front.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub parts: Vec<PartDescriptor>,
}

impl Snapshot {
    pub fn new(parts: Vec<PartDescriptor>) -> Self {
        Self { parts }
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Bounded history log with a cursor.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Snapshot>,
    /// Index of the current entry; meaningful only when `entries` is non-empty.
    cursor: usize,
    capacity: usize,
}

impl History {
    /// Create an empty log. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Vec::with_capacity(capacity),
            cursor: 0,
            capacity,
        }
    }

    /// Record a new snapshot as the current state.
    pub fn push(&mut self, snapshot: Snapshot) {
        if self.entries.is_empty() {
            self.entries.push(snapshot);
            self.cursor = 0;
            return;
        }

        // Drop the redo branch
        self.entries.truncate(self.cursor + 1);
        self.entries.push(snapshot);

        if self.entries.len() > self.capacity {
            self.entries.remove(0);
        } else {
            self.cursor += 1;
        }
    }

    /// Step back one entry. Returns the snapshot to restore, or `None` if
    /// already at the earliest entry.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor)
    }

    /// Step forward one entry. Returns the snapshot to restore, or `None`
    /// if already at the latest entry.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        self.entries.get(self.cursor)
    }

    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty() && self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        !self.entries.is_empty() && self.cursor < self.entries.len() - 1
    }

    /// The snapshot at the cursor.
    pub fn current(&self) -> Option<&Snapshot> {
        self.entries.get(self.cursor)
    }

    /// Cursor position, or `None` for an empty log.
    pub fn cursor(&self) -> Option<usize> {
        (!self.entries.is_empty()).then_some(self.cursor)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn entries(&self) -> &[Snapshot] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn snap(tag: f64) -> Snapshot {
        Snapshot::new(vec![PartDescriptor {
            id: Uuid::new_v4(),
            source: "eye.png".to_string(),
            attrs: PartAttrs {
                x: tag,
                ..Default::default()
            },
        }])
    }

    fn tag(snapshot: &Snapshot) -> f64 {
        snapshot.parts[0].attrs.x
    }

    #[test]
    fn test_empty_history() {
        let mut history = History::new(10);
        assert!(history.is_empty());
        assert_eq!(history.cursor(), None);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_push_advances_cursor() {
        let mut history = History::new(10);
        history.push(Snapshot::default());
        assert_eq!(history.cursor(), Some(0));
        history.push(snap(1.0));
        assert_eq!(history.cursor(), Some(1));
        assert_eq!(history.len(), 2);
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_redo_walks_entries() {
        let mut history = History::new(10);
        history.push(Snapshot::default());
        history.push(snap(1.0));
        history.push(snap(2.0));

        assert_eq!(tag(history.undo().unwrap()), 1.0);
        assert!(history.undo().unwrap().is_empty());
        assert!(history.undo().is_none());
        assert_eq!(history.cursor(), Some(0));

        assert_eq!(tag(history.redo().unwrap()), 1.0);
        assert_eq!(tag(history.redo().unwrap()), 2.0);
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_push_after_undo_truncates_redo_branch() {
        let mut history = History::new(10);
        history.push(Snapshot::default());
        history.push(snap(1.0));
        history.push(snap(2.0));
        history.undo();
        history.push(snap(3.0));

        assert_eq!(history.len(), 3);
        assert!(!history.can_redo());
        assert_eq!(tag(history.current().unwrap()), 3.0);
        assert!(history.entries().iter().all(|s| s.is_empty() || tag(s) != 2.0));
    }

    #[test]
    fn test_eviction_keeps_cursor_on_newest() {
        let mut history = History::new(3);
        for i in 0..10 {
            history.push(snap(i as f64));
            assert!(history.len() <= 3);
            let cursor = history.cursor().unwrap();
            assert!(cursor < history.len());
            assert_eq!(tag(history.current().unwrap()), i as f64);
        }
        assert_eq!(history.cursor(), Some(2));
        assert_eq!(tag(&history.entries()[0]), 7.0);
    }

    #[test]
    fn test_eviction_after_undo_does_not_evict() {
        let mut history = History::new(3);
        history.push(snap(0.0));
        history.push(snap(1.0));
        history.push(snap(2.0));
        history.undo();
        history.undo();
        // Truncation leaves room, so nothing is evicted
        history.push(snap(3.0));
        assert_eq!(history.len(), 2);
        assert_eq!(history.cursor(), Some(1));
        assert_eq!(tag(&history.entries()[0]), 0.0);
    }

    #[test]
    fn test_capacity_of_one() {
        let mut history = History::new(0);
        assert_eq!(history.capacity(), 1);
        history.push(snap(0.0));
        history.push(snap(1.0));
        assert_eq!(history.len(), 1);
        assert_eq!(history.cursor(), Some(0));
        assert!(!history.can_undo());
        assert_eq!(tag(history.current().unwrap()), 1.0);
    }

    #[test]
    fn test_snapshot_json() {
        let snapshot = snap(4.0);
        let json = snapshot.to_json().unwrap();
        assert_eq!(Snapshot::from_json(&json).unwrap(), snapshot);
    }
}
