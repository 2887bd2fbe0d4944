//! Snapshot history for audit views
//!
//! Keeps the most recent settled snapshots, newest first. Identical
//! consecutive snapshots bump the head entry's repeat count instead of
//! adding an entry.

use serde::Serialize;

use crate::projection::ChangeSnapshot;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub snapshot: ChangeSnapshot,
    pub repeat_count: usize,
}

#[derive(Debug, Clone)]
pub struct SnapshotHistory {
    entries: Vec<HistoryEntry>,
    max_size: usize,
}

impl Default for SnapshotHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotHistory {
    /// Create a history with the default max size
    pub fn new() -> Self {
        Self::with_max_size(5)
    }

    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_size,
        }
    }

    /// Record a settled snapshot. Returns the head entry's repeat count.
    pub fn record(&mut self, snapshot: ChangeSnapshot) -> usize {
        if let Some(head) = self.entries.first_mut() {
            if head.snapshot == snapshot {
                head.repeat_count += 1;
                return head.repeat_count;
            }
        }

        self.entries.insert(
            0,
            HistoryEntry {
                snapshot,
                repeat_count: 1,
            },
        );

        // Trim if exceeded max size
        self.entries.truncate(self.max_size);
        1
    }

    /// Entries, newest first
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> ChangeSnapshot {
        ChangeSnapshot::PlainText(s.to_string())
    }

    #[test]
    fn test_identical_snapshots_coalesce() {
        let mut history = SnapshotHistory::new();
        assert_eq!(history.record(text("東")), 1);
        assert_eq!(history.record(text("東")), 2);
        assert_eq!(history.len(), 1);
        assert_eq!(history.latest().unwrap().repeat_count, 2);
    }

    #[test]
    fn test_newest_first() {
        let mut history = SnapshotHistory::new();
        history.record(text("東"));
        history.record(text("東京"));
        assert_eq!(history.entries()[0].snapshot, text("東京"));
        assert_eq!(history.entries()[1].snapshot, text("東"));
    }

    #[test]
    fn test_trims_to_max_size() {
        let mut history = SnapshotHistory::with_max_size(2);
        history.record(text("a"));
        history.record(text("b"));
        history.record(text("c"));
        assert_eq!(history.len(), 2);
        assert_eq!(history.entries()[1].snapshot, text("b"));
    }

    #[test]
    fn test_non_consecutive_repeat_adds_entry() {
        let mut history = SnapshotHistory::new();
        history.record(text("a"));
        history.record(ChangeSnapshot::Empty);
        history.record(text("a"));
        assert_eq!(history.len(), 3);
        assert!(history.entries().iter().all(|e| e.repeat_count == 1));
    }
}
