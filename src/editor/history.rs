use std::collections::VecDeque;

use super::Position;

/// Maximum number of entries retained; the oldest entry is evicted first.
pub const MAX_HISTORY_ENTRIES: usize = 1000;

/// What kind of mutation an entry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    InsertText,
    DeleteChar,
    InsertLine,
    DeleteLine,
    JoinLines,
    SplitLine,
}

/// One recorded mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub kind: EditKind,
    pub position: Position,
    pub data: String,
}

/// Bounded edit history with an undo cursor.
///
/// Undo and redo move the cursor through the recorded entries; they do not
/// replay the entries against the text. Recording a new entry discards any
/// entries after the cursor.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    index: usize,
    capacity: usize,
}

impl History {
    pub fn new() -> Self {
        Self::with_capacity(MAX_HISTORY_ENTRIES)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            index: 0,
            capacity: capacity.max(1),
        }
    }

    pub fn record(&mut self, kind: EditKind, position: Position, data: impl Into<String>) {
        self.entries.truncate(self.index);
        self.entries.push_back(HistoryEntry {
            kind,
            position,
            data: data.into(),
        });
        if self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        self.index = self.entries.len();
    }

    pub const fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index < self.entries.len()
    }

    /// Step back one entry. Returns the entry stepped over.
    pub fn undo(&mut self) -> Option<&HistoryEntry> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        self.entries.get(self.index)
    }

    /// Step forward one entry. Returns the entry stepped over.
    pub fn redo(&mut self) -> Option<&HistoryEntry> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        self.entries.get(self.index - 1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub const fn index(&self) -> usize {
        self.index
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index = 0;
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
