//! Literal, case-sensitive text search over a buffer.
//!
//! Searching starts next to the cursor (one character after it going
//! forward, before it going backward), runs to the end of the buffer in the
//! search direction, and optionally wraps around to finish back at the
//! cursor line.

use crate::editor::{Position, TextBuffer};
use crate::text;

/// Search direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchDirection {
    #[default]
    Forward,
    Backward,
}

impl SearchDirection {
    /// Prompt character shown on the command row.
    pub const fn prompt(self) -> char {
        match self {
            Self::Forward => '/',
            Self::Backward => '?',
        }
    }
}

/// Pattern being typed plus the last executed search.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub input: String,
    pub direction: SearchDirection,
    pub last_pattern: Option<String>,
}

impl SearchState {
    /// Start collecting a new pattern.
    pub fn start(&mut self, direction: SearchDirection) {
        self.input.clear();
        self.direction = direction;
    }

    pub fn push(&mut self, ch: char) {
        self.input.push(ch);
    }

    /// Remove the last typed character.
    pub fn backspace(&mut self) {
        self.input.pop();
    }

    /// Take the typed pattern, remembering it for repeats. An empty input
    /// falls back to the previous pattern.
    pub fn commit(&mut self) -> Option<String> {
        let input = std::mem::take(&mut self.input);
        if input.is_empty() {
            return self.last_pattern.clone();
        }
        self.last_pattern = Some(input.clone());
        Some(input)
    }

    /// Prompt text for the command row, e.g. `/foo`.
    pub fn display(&self) -> String {
        format!("{}{}", self.direction.prompt(), self.input)
    }
}

/// A successful search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchHit {
    pub position: Position,
    /// The match was found only after wrapping past the buffer end.
    pub wrapped: bool,
}

/// Character columns of every match of `pattern` in `line`, overlapping
/// matches included.
fn match_columns(line: &str, pattern: &str) -> Vec<usize> {
    let mut columns = Vec::new();
    let mut byte = 0;
    while let Some(offset) = line.get(byte..).and_then(|rest| rest.find(pattern)) {
        let start = byte + offset;
        columns.push(text::byte_to_char(line, start));
        byte = text::next_boundary(line, start);
    }
    columns
}

/// Find `pattern` starting from `from`.
///
/// Returns `None` for an empty pattern or when nothing matches.
pub fn find(
    buffer: &TextBuffer,
    pattern: &str,
    from: Position,
    direction: SearchDirection,
    wrap: bool,
) -> Option<SearchHit> {
    if pattern.is_empty() {
        return None;
    }
    let count = buffer.line_count();
    let origin = from.line.min(count - 1);
    let columns = |line: usize| match_columns(buffer.line(line).unwrap_or(""), pattern);
    let hit = |line: usize, column: usize, wrapped: bool| SearchHit {
        position: Position::new(line, column),
        wrapped,
    };

    match direction {
        SearchDirection::Forward => {
            if let Some(&col) = columns(origin).iter().find(|&&c| c > from.column) {
                return Some(hit(origin, col, false));
            }
            for line in origin + 1..count {
                if let Some(&col) = columns(line).first() {
                    return Some(hit(line, col, false));
                }
            }
            if !wrap {
                return None;
            }
            for line in 0..origin {
                if let Some(&col) = columns(line).first() {
                    return Some(hit(line, col, true));
                }
            }
            columns(origin)
                .into_iter()
                .find(|&c| c <= from.column)
                .map(|col| hit(origin, col, true))
        }
        SearchDirection::Backward => {
            if let Some(&col) = columns(origin).iter().rev().find(|&&c| c < from.column) {
                return Some(hit(origin, col, false));
            }
            for line in (0..origin).rev() {
                if let Some(&col) = columns(line).last() {
                    return Some(hit(line, col, false));
                }
            }
            if !wrap {
                return None;
            }
            for line in (origin + 1..count).rev() {
                if let Some(&col) = columns(line).last() {
                    return Some(hit(line, col, true));
                }
            }
            columns(origin)
                .into_iter()
                .rev()
                .find(|&c| c >= from.column)
                .map(|col| hit(origin, col, true))
        }
    }
}
