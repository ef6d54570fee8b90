use std::collections::VecDeque;
use std::sync::Arc;

use crate::shared::constants::{DEFAULT_HISTORY_CAPACITY, DEFAULT_HISTORY_MEMORY_BYTES};
use crate::shared::pixel_buffer::PixelBuffer;

struct HistoryEntry {
    snapshot: Arc<PixelBuffer>,
    label: String,
}

impl HistoryEntry {
    fn memory_size(&self) -> usize {
        self.snapshot.byte_len() + self.label.len()
    }
}

/// Linear snapshot history with a movable cursor.
///
/// Every entry is a full copy of the image after an edit. Pushing while the
/// cursor is behind the newest entry discards the redo branch. The stack is
/// bounded by entry count and, optionally, by total snapshot bytes; when
/// either is exceeded the oldest entries are evicted.
pub struct HistoryStack {
    entries: VecDeque<HistoryEntry>,
    cursor: usize,
    capacity: usize,
    max_memory_bytes: Option<usize>,
    total_memory: usize,
}

impl Default for HistoryStack {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl HistoryStack {
    /// Creates an empty stack keeping at most `capacity` snapshots (at
    /// least one) and at most [`DEFAULT_HISTORY_MEMORY_BYTES`].
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            cursor: 0,
            capacity: capacity.max(1),
            max_memory_bytes: Some(DEFAULT_HISTORY_MEMORY_BYTES),
            total_memory: 0,
        }
    }

    /// Replaces the memory cap; `None` disables it.
    pub fn with_memory_limit(mut self, max_bytes: Option<usize>) -> Self {
        self.max_memory_bytes = max_bytes;
        self.prune();
        self
    }

    /// Records `snapshot` as the newest state and moves the cursor to it.
    pub fn push(&mut self, snapshot: impl Into<Arc<PixelBuffer>>, label: impl Into<String>) {
        if !self.entries.is_empty() {
            for dropped in self.entries.drain(self.cursor + 1..) {
                self.total_memory = self.total_memory.saturating_sub(dropped.memory_size());
            }
        }

        let entry = HistoryEntry {
            snapshot: snapshot.into(),
            label: label.into(),
        };
        self.total_memory += entry.memory_size();
        self.entries.push_back(entry);
        self.cursor = self.entries.len() - 1;

        self.prune();
    }

    /// Steps back one entry and returns its snapshot, or `None` at the
    /// oldest entry.
    pub fn undo(&mut self) -> Option<Arc<PixelBuffer>> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        self.current()
    }

    /// Steps forward one entry and returns its snapshot, or `None` at the
    /// newest entry.
    pub fn redo(&mut self) -> Option<Arc<PixelBuffer>> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        self.current()
    }

    /// Moves the cursor straight to `index`. `None` if out of range.
    pub fn jump_to(&mut self, index: usize) -> Option<Arc<PixelBuffer>> {
        if index >= self.entries.len() {
            return None;
        }
        self.cursor = index;
        self.current()
    }

    pub fn current(&self) -> Option<Arc<PixelBuffer>> {
        self.entries.get(self.cursor).map(|e| Arc::clone(&e.snapshot))
    }

    pub fn current_label(&self) -> Option<&str> {
        self.entries.get(self.cursor).map(|e| e.label.as_str())
    }

    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty() && self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Labels from oldest to newest.
    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.label.as_str()).collect()
    }

    /// Bytes held by all snapshots and labels.
    pub fn memory_usage(&self) -> usize {
        self.total_memory
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
        self.total_memory = 0;
    }

    fn prune(&mut self) {
        let mut evicted = 0usize;

        while self.entries.len() > self.capacity {
            self.evict_oldest();
            evicted += 1;
        }

        if let Some(max_bytes) = self.max_memory_bytes {
            while self.total_memory > max_bytes && self.entries.len() > 1 {
                self.evict_oldest();
                evicted += 1;
            }
        }

        if evicted > 0 {
            log::debug!(
                "Evicted {} history entries ({} left, {} bytes)",
                evicted,
                self.entries.len(),
                self.total_memory
            );
        }
    }

    fn evict_oldest(&mut self) {
        if let Some(removed) = self.entries.pop_front() {
            self.total_memory = self.total_memory.saturating_sub(removed.memory_size());
            self.cursor = self.cursor.saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(tag: u8) -> PixelBuffer {
        PixelBuffer::filled(2, 2, [tag, 0, 0, 255])
    }

    fn tag(buffer: &PixelBuffer) -> u8 {
        buffer.pixel(0, 0)[0]
    }

    fn stack_with(n: u8) -> HistoryStack {
        let mut history = HistoryStack::new(50);
        for i in 0..n {
            history.push(snap(i), format!("edit {i}"));
        }
        history
    }

    // ── Basic navigation ─────────────────────────────────────────────

    #[test]
    fn test_empty_stack() {
        let mut history = HistoryStack::default();
        assert!(history.is_empty());
        assert!(history.current().is_none());
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_push_moves_cursor_to_newest() {
        let history = stack_with(3);
        assert_eq!(history.len(), 3);
        assert_eq!(history.cursor(), 2);
        assert_eq!(tag(&history.current().unwrap()), 2);
        assert_eq!(history.current_label(), Some("edit 2"));
    }

    #[test]
    fn test_undo_then_redo() {
        let mut history = stack_with(3);
        assert_eq!(tag(&history.undo().unwrap()), 1);
        assert_eq!(tag(&history.undo().unwrap()), 0);
        assert!(history.undo().is_none());
        assert_eq!(history.cursor(), 0);
        assert_eq!(tag(&history.redo().unwrap()), 1);
        assert_eq!(tag(&history.redo().unwrap()), 2);
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_single_entry_cannot_undo() {
        let mut history = stack_with(1);
        assert!(history.undo().is_none());
        assert_eq!(tag(&history.current().unwrap()), 0);
    }

    // ── Branching ────────────────────────────────────────────────────

    #[test]
    fn test_push_after_undo_discards_redo_branch() {
        // N pushes, M undos, one push → N - M + 1 entries.
        let mut history = stack_with(5);
        history.undo();
        history.undo();
        history.push(snap(99), "branch");
        assert_eq!(history.len(), 4);
        assert!(history.redo().is_none());
        assert_eq!(
            history.labels(),
            vec!["edit 0", "edit 1", "edit 2", "branch"]
        );
    }

    #[test]
    fn test_linearity_for_every_undo_depth() {
        for m in 0..5u8 {
            let mut history = stack_with(5);
            for _ in 0..m {
                history.undo();
            }
            history.push(snap(200), "new");
            assert_eq!(history.len(), 5 - m as usize + 1, "m = {m}");
            assert!(!history.can_redo());
        }
    }

    #[test]
    fn test_jump_to() {
        let mut history = stack_with(4);
        assert_eq!(tag(&history.jump_to(1).unwrap()), 1);
        assert!(history.can_redo());
        assert!(history.jump_to(10).is_none());
        assert_eq!(history.cursor(), 1);
    }

    // ── Limits ───────────────────────────────────────────────────────

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut history = HistoryStack::new(3);
        for i in 0..5 {
            history.push(snap(i), format!("edit {i}"));
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.cursor(), 2);
        assert_eq!(history.labels(), vec!["edit 2", "edit 3", "edit 4"]);
    }

    #[test]
    fn test_zero_capacity_keeps_one() {
        let mut history = HistoryStack::new(0);
        history.push(snap(1), "a");
        history.push(snap(2), "b");
        assert_eq!(history.len(), 1);
        assert_eq!(tag(&history.current().unwrap()), 2);
    }

    #[test]
    fn test_memory_limit_evicts_but_keeps_newest() {
        // Each entry is 16 bytes of pixels plus a one-byte label.
        let mut history = HistoryStack::new(50).with_memory_limit(Some(40));
        for (i, label) in ["a", "b", "c", "d"].into_iter().enumerate() {
            history.push(snap(i as u8), label);
        }
        assert_eq!(history.len(), 2);
        assert_eq!(history.memory_usage(), 34);
        assert_eq!(history.labels(), vec!["c", "d"]);

        let mut tiny = HistoryStack::new(50).with_memory_limit(Some(1));
        tiny.push(snap(7), "x");
        assert_eq!(tiny.len(), 1);
    }

    #[test]
    fn test_memory_usage_tracks_truncation_and_clear() {
        let mut history = stack_with(3);
        let per_entry = 16 + "edit 0".len();
        assert_eq!(history.memory_usage(), 3 * per_entry);
        history.undo();
        history.undo();
        history.push(snap(5), "edit 5");
        assert_eq!(history.memory_usage(), 2 * per_entry);
        history.clear();
        assert_eq!(history.memory_usage(), 0);
        assert!(history.is_empty());
    }

    #[test]
    fn test_snapshots_are_shared_not_copied() {
        let mut history = HistoryStack::new(5);
        let snapshot = Arc::new(snap(3));
        history.push(Arc::clone(&snapshot), "shared");
        assert!(Arc::ptr_eq(&snapshot, &history.current().unwrap()));
    }
}
