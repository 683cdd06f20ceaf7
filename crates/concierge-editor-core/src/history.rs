//! Undo/redo management for editor state.
//!
//! Provides:
//! - `UndoManager` trait for abstracting undo implementations
//! - `SnapshotHistory` - linear history of full snapshots
//! - `EditorSnapshot` - the content and image list as one undo step

use crate::types::ImageDescriptor;

/// Trait for managing undo/redo operations.
pub trait UndoManager {
    type Snapshot;

    /// Check if undo is available.
    fn can_undo(&self) -> bool;

    /// Check if redo is available.
    fn can_redo(&self) -> bool;

    /// Step back. Returns the snapshot that is now current, if any.
    fn undo(&mut self) -> Option<&Self::Snapshot>;

    /// Step forward. Returns the snapshot that is now current, if any.
    fn redo(&mut self) -> Option<&Self::Snapshot>;

    /// Drop every snapshot except the current one.
    fn clear_history(&mut self);
}

/// What one undo step restores: the content and the image list its
/// `[IMAGE_<n>]` placeholders point into.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditorSnapshot {
    pub content: String,
    pub images: Vec<ImageDescriptor>,
}

impl EditorSnapshot {
    pub fn new(content: impl Into<String>, images: &[ImageDescriptor]) -> Self {
        Self {
            content: content.into(),
            images: images.to_vec(),
        }
    }
}

/// Linear history of full snapshots.
///
/// The snapshot at `index()` always equals the live state. Recording a new
/// snapshot after an undo discards the redo branch for good; there is no
/// branching history.
#[derive(Clone, Debug)]
pub struct SnapshotHistory<T = EditorSnapshot> {
    snapshots: Vec<T>,
    index: usize,
    max_steps: Option<usize>,
}

impl<T: PartialEq> SnapshotHistory<T> {
    /// Create a history seeded with the session's initial state.
    pub fn new(initial: T) -> Self {
        Self {
            snapshots: vec![initial],
            index: 0,
            max_steps: None,
        }
    }

    /// Keep at most `max_steps` snapshots, dropping the oldest first.
    pub fn with_limit(mut self, max_steps: Option<usize>) -> Self {
        self.max_steps = max_steps.map(|n| n.max(1));
        self.trim();
        self
    }

    /// Record `snapshot` as the newest one.
    ///
    /// No-op if it equals the current snapshot. Otherwise everything after
    /// the current index is dropped before appending. Returns whether a
    /// snapshot was recorded.
    pub fn record(&mut self, snapshot: T) -> bool {
        if *self.current() == snapshot {
            return false;
        }

        self.snapshots.truncate(self.index + 1);
        self.snapshots.push(snapshot);
        self.index = self.snapshots.len() - 1;
        self.trim();
        true
    }

    /// The snapshot matching the live state.
    pub fn current(&self) -> &T {
        &self.snapshots[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of stored snapshots, including the seed.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn snapshots(&self) -> &[T] {
        &self.snapshots
    }

    fn trim(&mut self) {
        let Some(max) = self.max_steps else {
            return;
        };
        if self.snapshots.len() > max {
            let excess = self.snapshots.len() - max;
            self.snapshots.drain(..excess);
            self.index = self.index.saturating_sub(excess);
        }
    }
}

impl<T: PartialEq> UndoManager for SnapshotHistory<T> {
    type Snapshot = T;

    fn can_undo(&self) -> bool {
        self.index > 0
    }

    fn can_redo(&self) -> bool {
        self.index + 1 < self.snapshots.len()
    }

    fn undo(&mut self) -> Option<&T> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        Some(self.current())
    }

    fn redo(&mut self) -> Option<&T> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        Some(self.current())
    }

    fn clear_history(&mut self) {
        let current = self.snapshots.swap_remove(self.index);
        self.snapshots = vec![current];
        self.index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_writes_grow_history() {
        let mut history = SnapshotHistory::new("");
        for (i, content) in ["a", "ab", "abc"].into_iter().enumerate() {
            assert!(history.record(content));
            assert_eq!(history.index(), i + 1);
            assert_eq!(*history.current(), content);
        }
        // seed + 3 distinct writes
        assert_eq!(history.len(), 4);
    }

    #[test]
    fn test_repeated_write_is_idempotent() {
        let mut history = SnapshotHistory::new("start");
        assert!(history.record("x"));
        assert!(!history.record("x"));
        assert!(!history.record("x"));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_no_consecutive_duplicates() {
        let mut history = SnapshotHistory::new("a");
        for content in ["a", "b", "b", "a", "a", "c"] {
            history.record(content);
        }
        let snaps = history.snapshots();
        assert_eq!(snaps, &["a", "b", "a", "c"]);
        assert!(snaps.windows(2).all(|w| w[0] != w[1]));
    }

    #[test]
    fn test_undo_redo_walks_snapshots() {
        let mut history = SnapshotHistory::new("");
        history.record("a");
        history.record("ab");

        assert_eq!(history.undo(), Some(&"a"));
        assert_eq!(history.undo(), Some(&""));
        assert_eq!(history.undo(), None);
        assert_eq!(history.redo(), Some(&"a"));
        assert_eq!(history.redo(), Some(&"ab"));
        assert_eq!(history.redo(), None);
    }

    #[test]
    fn test_new_edit_discards_redo_branch() {
        let mut history = SnapshotHistory::new("");
        history.record("a");
        history.record("ab");
        history.undo();
        assert!(history.can_redo());

        history.record("ax");
        assert!(!history.can_redo());
        assert_eq!(history.snapshots(), &["", "a", "ax"]);
    }

    #[test]
    fn test_record_after_undo_to_same_content_is_noop() {
        let mut history = SnapshotHistory::new("");
        history.record("a");
        history.undo();
        // Writing the current snapshot again keeps the redo branch.
        assert!(!history.record(""));
        assert!(history.can_redo());
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut history = SnapshotHistory::new("").with_limit(Some(3));
        history.record("a");
        history.record("b");
        history.record("c");
        assert_eq!(history.snapshots(), &["a", "b", "c"]);
        assert_eq!(history.index(), 2);
        assert_eq!(*history.current(), "c");
    }

    #[test]
    fn test_editor_snapshot_compares_images() {
        let images = [ImageDescriptor::new("a.png")];
        let mut history = SnapshotHistory::new(EditorSnapshot::new("[IMAGE_0]", &images));

        assert!(!history.record(EditorSnapshot::new("[IMAGE_0]", &images)));
        let moved = [images[0].clone().with_width("40%")];
        assert!(history.record(EditorSnapshot::new("[IMAGE_0]", &moved)));

        let restored = history.undo().map(|s| s.images.clone());
        assert_eq!(restored, Some(images.to_vec()));
    }

    #[test]
    fn test_clear_keeps_current() {
        let mut history = SnapshotHistory::new("");
        history.record("a");
        history.record("b");
        history.undo();
        history.clear_history();
        assert_eq!(history.snapshots(), &["a"]);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }
}
