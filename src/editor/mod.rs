//! The text buffer: a document as a sequence of lines plus a cursor.
//!
//! Lines are stored without their line terminators and columns are always
//! character indices (see [`crate::text`]). The buffer never holds zero
//! lines and every mutation re-clamps the cursor.

mod buffer;
mod history;

pub use buffer::{BufferError, TextBuffer};
pub use history::{EditKind, History, HistoryEntry, MAX_HISTORY_ENTRIES};

/// A location in a buffer. `column` counts characters, not bytes, and may
/// equal the line length to denote the position after the last character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    /// Zero-based line index.
    pub line: usize,
    /// Zero-based character column.
    pub column: usize,
}

impl Position {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}
