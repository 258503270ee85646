use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::{EditKind, History, Position};
use crate::text;

/// Errors surfaced by buffer file operations.
#[derive(Debug, Error)]
pub enum BufferError {
    #[error("no file name")]
    NoPath,
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl BufferError {
    /// Whether the error is a missing file on load.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Word,
    Blank,
    Punct,
}

impl CharClass {
    fn of(ch: char) -> Self {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            Self::Word
        } else if ch.is_whitespace() {
            Self::Blank
        } else {
            Self::Punct
        }
    }
}

/// An editable document held as a list of lines.
///
/// There is always at least one line. The cursor is kept valid after every
/// operation: requested positions are clamped, never rejected. While the
/// buffer is read-only every mutation is a silent no-op.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    lines: Vec<String>,
    cursor: Position,
    path: Option<PathBuf>,
    modified: bool,
    read_only: bool,
    history: History,
}

impl TextBuffer {
    /// Create an unnamed buffer holding a single empty line.
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            cursor: Position::default(),
            path: None,
            modified: false,
            read_only: false,
            history: History::new(),
        }
    }

    /// Create an unnamed buffer from text.
    pub fn from_text(text: &str) -> Self {
        let mut buffer = Self::new();
        buffer.load_from_source(text);
        buffer
    }

    /// Load a file into a new buffer named after `path`.
    ///
    /// Bytes that are not valid UTF-8 are replaced rather than rejected.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::Io`] if the file cannot be read.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, BufferError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| BufferError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut buffer = Self::from_text(&String::from_utf8_lossy(&bytes));
        buffer.path = Some(path.to_path_buf());
        tracing::debug!(path = %path.display(), lines = buffer.line_count(), "buffer loaded");
        Ok(buffer)
    }

    /// Replace the whole document with `text`.
    ///
    /// Splits on `\n`, strips one trailing `\r` per line, and drops the empty
    /// piece after a final line break. Resets the cursor, the modified flag
    /// and the history.
    pub fn load_from_source(&mut self, text: &str) {
        let mut lines: Vec<String> = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect();
        if text.ends_with('\n') {
            lines.pop();
        }
        if lines.is_empty() {
            lines.push(String::new());
        }
        self.lines = lines;
        self.cursor = Position::default();
        self.modified = false;
        self.history.clear();
    }

    /// Re-read the buffer's file from disk, discarding changes.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::NoPath`] for unnamed buffers, or
    /// [`BufferError::Io`] if the file cannot be read.
    pub fn reload(&mut self) -> Result<(), BufferError> {
        let path = self.path.clone().ok_or(BufferError::NoPath)?;
        let fresh = Self::open(&path)?;
        self.lines = fresh.lines;
        self.cursor = Position::default();
        self.modified = false;
        self.history.clear();
        Ok(())
    }

    /// Write the buffer to `path`, or to its own path when `None`.
    ///
    /// Lines are joined with `\n` and no line break follows the last line.
    /// Saving to an explicit path renames the buffer. On failure the buffer
    /// is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::NoPath`] when neither `path` nor the buffer's
    /// own path is set, or [`BufferError::Io`] if the write fails.
    pub fn save(&mut self, path: Option<&Path>) -> Result<PathBuf, BufferError> {
        let target = path
            .map(Path::to_path_buf)
            .or_else(|| self.path.clone())
            .ok_or(BufferError::NoPath)?;
        fs::write(&target, self.to_text()).map_err(|source| BufferError::Io {
            path: target.clone(),
            source,
        })?;
        if path.is_some() {
            self.path = Some(target.clone());
        }
        self.modified = false;
        tracing::debug!(path = %target.display(), "buffer saved");
        Ok(target)
    }

    /// The document as a single string, lines joined with `\n`.
    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }

    // --- Queries ---

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// The text of a line, without its terminator.
    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// Length of a line in characters; 0 for lines past the end.
    pub fn line_len(&self, index: usize) -> usize {
        self.lines.get(index).map_or(0, |line| text::char_count(line))
    }

    pub fn is_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].is_empty()
    }

    pub const fn cursor(&self) -> Position {
        self.cursor
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.path = Some(path.into());
    }

    /// File name for display, or `[No Name]`.
    pub fn display_name(&self) -> String {
        self.path
            .as_ref()
            .map_or_else(|| "[No Name]".to_string(), |p| p.display().to_string())
    }

    pub const fn is_modified(&self) -> bool {
        self.modified
    }

    pub const fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub const fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    pub const fn history(&self) -> &History {
        &self.history
    }

    pub fn is_valid_position(&self, pos: Position) -> bool {
        pos.line < self.lines.len() && pos.column <= self.line_len(pos.line)
    }

    // --- Cursor ---

    /// Move the cursor to `pos`, clamped into the document.
    pub fn set_cursor(&mut self, pos: Position) {
        self.cursor = pos;
        self.clamp_cursor();
    }

    /// Move the cursor by a signed delta, clamping line then column.
    pub fn move_cursor_by(&mut self, delta_line: isize, delta_column: isize) {
        let last = self.lines.len() - 1;
        self.cursor.line = self.cursor.line.saturating_add_signed(delta_line).min(last);
        self.cursor.column = self.cursor.column.saturating_add_signed(delta_column);
        self.clamp_cursor();
    }

    // --- Editing ---

    /// Insert a character at the cursor.
    pub fn insert_char(&mut self, ch: char) {
        let mut encoded = [0u8; 4];
        self.insert_text(ch.encode_utf8(&mut encoded));
    }

    /// Insert text at the cursor and advance past it.
    ///
    /// Embedded line breaks split the line, leaving the cursor after the
    /// last inserted character.
    pub fn insert_text(&mut self, s: &str) {
        if self.read_only || s.is_empty() {
            return;
        }
        let mut first = true;
        for segment in s.split('\n') {
            if !first {
                self.split_at_cursor();
            }
            first = false;
            if segment.is_empty() {
                continue;
            }
            let at = self.cursor;
            let line = &mut self.lines[at.line];
            let byte = text::char_to_byte(line, at.column);
            line.insert_str(byte, segment);
            self.cursor.column += text::char_count(segment);
            self.history.record(EditKind::InsertText, at, segment);
        }
        self.modified = true;
        self.clamp_cursor();
    }

    /// Delete the character under the cursor, or join the next line when
    /// the cursor is at the end of the line.
    pub fn delete_char_forward(&mut self) {
        if self.read_only {
            return;
        }
        let at = self.cursor;
        let line_len = self.line_len(at.line);
        if at.column < line_len {
            let line = &mut self.lines[at.line];
            let start = text::char_to_byte(line, at.column);
            let end = text::next_boundary(line, start);
            let removed: String = line.drain(start..end).collect();
            self.history.record(EditKind::DeleteChar, at, removed);
            self.modified = true;
        } else if at.line + 1 < self.lines.len() {
            let next = self.lines.remove(at.line + 1);
            self.lines[at.line].push_str(&next);
            self.history.record(EditKind::JoinLines, at, "");
            self.modified = true;
        }
        self.clamp_cursor();
    }

    /// Delete the character before the cursor. At column 0 the line is
    /// joined onto the previous one and the cursor lands on the join point.
    pub fn delete_char_backward(&mut self) {
        if self.read_only {
            return;
        }
        if self.cursor.column > 0 {
            self.cursor.column -= 1;
            self.delete_char_forward();
        } else if self.cursor.line > 0 {
            let current = self.lines.remove(self.cursor.line);
            self.cursor.line -= 1;
            self.cursor.column = self.line_len(self.cursor.line);
            self.lines[self.cursor.line].push_str(&current);
            self.history.record(EditKind::JoinLines, self.cursor, "");
            self.modified = true;
        }
        self.clamp_cursor();
    }

    /// Remove the current line. A sole line is emptied instead.
    pub fn delete_line(&mut self) {
        if self.read_only {
            return;
        }
        let at = self.cursor;
        let removed = if self.lines.len() > 1 {
            self.lines.remove(at.line)
        } else {
            std::mem::take(&mut self.lines[0])
        };
        self.history.record(EditKind::DeleteLine, at, removed);
        self.cursor.column = 0;
        self.modified = true;
        self.clamp_cursor();
    }

    /// Open an empty line above the cursor and move onto it.
    pub fn insert_line_above(&mut self) {
        if self.read_only {
            return;
        }
        self.lines.insert(self.cursor.line, String::new());
        self.cursor.column = 0;
        self.history.record(EditKind::InsertLine, self.cursor, "");
        self.modified = true;
    }

    /// Open an empty line below the cursor and move onto it.
    pub fn insert_line_below(&mut self) {
        if self.read_only {
            return;
        }
        self.lines.insert(self.cursor.line + 1, String::new());
        self.cursor = Position::new(self.cursor.line + 1, 0);
        self.history.record(EditKind::InsertLine, self.cursor, "");
        self.modified = true;
    }

    /// Append the next line to the current one, separated by one space when
    /// both sides have content.
    pub fn join_with_next(&mut self) {
        if self.read_only || self.cursor.line + 1 >= self.lines.len() {
            return;
        }
        let next = self.lines.remove(self.cursor.line + 1);
        let current = &mut self.lines[self.cursor.line];
        if !current.is_empty() && !next.is_empty() {
            current.push(' ');
        }
        current.push_str(&next);
        self.history.record(EditKind::JoinLines, self.cursor, " ");
        self.modified = true;
        self.clamp_cursor();
    }

    /// Break the current line at the cursor; the cursor moves to the start
    /// of the new second line.
    pub fn split_at_cursor(&mut self) {
        if self.read_only {
            return;
        }
        let at = self.cursor;
        let line = &mut self.lines[at.line];
        let byte = text::char_to_byte(line, at.column);
        let tail = line.split_off(byte);
        self.lines.insert(at.line + 1, tail);
        self.cursor = Position::new(at.line + 1, 0);
        self.history.record(EditKind::SplitLine, at, "");
        self.modified = true;
    }

    // --- Navigation targets (do not move the cursor) ---

    /// Start of the next word: skip the run under the cursor, then blanks.
    /// From the end of a line, the first non-blank of the next line.
    pub fn next_word_boundary(&self) -> Position {
        let Position { line, column } = self.cursor;
        let chars: Vec<char> = self.lines[line].chars().collect();
        if column >= chars.len() {
            if line + 1 < self.lines.len() {
                return Position::new(line + 1, first_non_blank(&self.lines[line + 1]));
            }
            return self.cursor;
        }
        let mut col = column;
        let class = CharClass::of(chars[col]);
        if class != CharClass::Blank {
            while col < chars.len() && CharClass::of(chars[col]) == class {
                col += 1;
            }
        }
        while col < chars.len() && CharClass::of(chars[col]) == CharClass::Blank {
            col += 1;
        }
        Position::new(line, col)
    }

    /// Start of the current or previous word. From column 0, the end of the
    /// previous line.
    pub fn previous_word_boundary(&self) -> Position {
        let Position { line, column } = self.cursor;
        if column == 0 {
            if line > 0 {
                return Position::new(line - 1, self.line_len(line - 1));
            }
            return self.cursor;
        }
        let chars: Vec<char> = self.lines[line].chars().collect();
        let mut col = column.min(chars.len());
        while col > 0 && CharClass::of(chars[col - 1]) == CharClass::Blank {
            col -= 1;
        }
        if col == 0 {
            return Position::new(line, 0);
        }
        let class = CharClass::of(chars[col - 1]);
        while col > 0 && CharClass::of(chars[col - 1]) == class {
            col -= 1;
        }
        Position::new(line, col)
    }

    pub const fn line_start(&self) -> Position {
        Position::new(self.cursor.line, 0)
    }

    pub fn line_end(&self) -> Position {
        Position::new(self.cursor.line, self.line_len(self.cursor.line))
    }

    pub const fn buffer_start(&self) -> Position {
        Position::new(0, 0)
    }

    pub fn buffer_end(&self) -> Position {
        let last = self.lines.len() - 1;
        Position::new(last, self.line_len(last))
    }

    /// The `[A-Za-z0-9_]` run under the cursor, if the cursor is on one.
    pub fn word_at_cursor(&self) -> Option<String> {
        let chars: Vec<char> = self.lines[self.cursor.line].chars().collect();
        let col = self.cursor.column;
        if col >= chars.len() || CharClass::of(chars[col]) != CharClass::Word {
            return None;
        }
        let mut start = col;
        while start > 0 && CharClass::of(chars[start - 1]) == CharClass::Word {
            start -= 1;
        }
        let mut end = col;
        while end < chars.len() && CharClass::of(chars[end]) == CharClass::Word {
            end += 1;
        }
        Some(chars[start..end].iter().collect())
    }

    // --- Yank / paste (line mode) ---

    /// The raw text of the cursor line.
    pub fn yank_current_line(&self) -> String {
        self.lines[self.cursor.line].clone()
    }

    /// Insert `text` as whole line(s) above the cursor line.
    pub fn paste_before(&mut self, text: &str) {
        if self.read_only {
            return;
        }
        let at = self.cursor.line;
        for (offset, line) in text.split('\n').enumerate() {
            self.lines.insert(at + offset, line.to_string());
        }
        self.cursor = Position::new(at, 0);
        self.history.record(EditKind::InsertLine, self.cursor, text);
        self.modified = true;
    }

    /// Insert `text` as whole line(s) below the cursor line and move onto
    /// the first of them.
    pub fn paste_after(&mut self, text: &str) {
        if self.read_only {
            return;
        }
        let at = self.cursor.line + 1;
        for (offset, line) in text.split('\n').enumerate() {
            self.lines.insert(at + offset, line.to_string());
        }
        self.cursor = Position::new(at, 0);
        self.history.record(EditKind::InsertLine, self.cursor, text);
        self.modified = true;
    }

    // --- History ---

    /// Step the history back one entry.
    ///
    /// Only the history index moves; the text is not restored. Returns
    /// whether there was an entry to step over.
    pub fn undo(&mut self) -> bool {
        if self.read_only || self.history.undo().is_none() {
            return false;
        }
        self.modified = true;
        true
    }

    /// Step the history forward one entry. See [`Self::undo`].
    pub fn redo(&mut self) -> bool {
        if self.read_only || self.history.redo().is_none() {
            return false;
        }
        self.modified = true;
        true
    }

    fn clamp_cursor(&mut self) {
        let last = self.lines.len() - 1;
        self.cursor.line = self.cursor.line.min(last);
        self.cursor.column = self.cursor.column.min(self.line_len(self.cursor.line));
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

fn first_non_blank(line: &str) -> usize {
    line.chars().take_while(|ch| ch.is_whitespace()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::tempdir;

    fn buffer_at(text: &str, line: usize, column: usize) -> TextBuffer {
        let mut buf = TextBuffer::from_text(text);
        buf.set_cursor(Position::new(line, column));
        buf
    }

    fn lines(buf: &TextBuffer) -> Vec<&str> {
        buf.lines().collect()
    }

    // --- Construction and loading ---

    #[test]
    fn test_new_buffer_has_one_empty_line() {
        let buf = TextBuffer::new();
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line(0), Some(""));
        assert!(buf.is_empty());
        assert!(!buf.is_modified());
    }

    #[test]
    fn test_load_splits_lines_and_strips_carriage_returns() {
        let buf = TextBuffer::from_text("one\r\ntwo\nthree\r");
        assert_eq!(lines(&buf), vec!["one", "two", "three"]);
    }

    #[test]
    fn test_load_drops_single_trailing_break() {
        let buf = TextBuffer::from_text("hello\n");
        assert_eq!(lines(&buf), vec!["hello"]);
        let buf = TextBuffer::from_text("hello\n\n");
        assert_eq!(lines(&buf), vec!["hello", ""]);
    }

    #[test]
    fn test_load_empty_text_yields_one_line() {
        let buf = TextBuffer::from_text("");
        assert_eq!(buf.line_count(), 1);
    }

    #[test]
    fn test_load_resets_cursor_modified_and_history() {
        let mut buf = buffer_at("abc\ndef", 1, 2);
        buf.insert_text("x");
        buf.load_from_source("new");
        assert_eq!(buf.cursor(), Position::new(0, 0));
        assert!(!buf.is_modified());
        assert!(!buf.history().can_undo());
    }

    // --- Saving ---

    #[test]
    fn test_save_without_path_fails_and_keeps_state() {
        let mut buf = TextBuffer::from_text("abc");
        buf.insert_text("x");
        let err = buf.save(None).unwrap_err();
        assert!(matches!(err, BufferError::NoPath));
        assert!(buf.is_modified());
    }

    #[test]
    fn test_save_writes_without_trailing_break() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let mut buf = TextBuffer::from_text("a\nb\nc\n");
        buf.insert_text("x");
        buf.save(Some(&path)).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "xa\nb\nc");
        assert!(!buf.is_modified());
        assert_eq!(buf.path(), Some(path.as_path()));
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("round.txt");
        let content = "first line\n\tindented\nünïcødé\n\nlast";
        std::fs::write(&path, content).unwrap();

        let mut buf = TextBuffer::open(&path).unwrap();
        buf.save(None).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), content);

        let reopened = TextBuffer::open(&path).unwrap();
        assert_eq!(reopened.to_text(), content);
    }

    #[test]
    fn test_open_missing_file_reports_not_found() {
        let dir = tempdir().unwrap();
        let err = TextBuffer::open(dir.path().join("nope.txt")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_reload_discards_changes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("file.txt");
        std::fs::write(&path, "disk").unwrap();
        let mut buf = TextBuffer::open(&path).unwrap();
        buf.insert_text("changed ");
        buf.reload().unwrap();
        assert_eq!(buf.to_text(), "disk");
        assert!(!buf.is_modified());
    }

    // --- Insertion ---

    #[test]
    fn test_insert_text_advances_by_characters() {
        let mut buf = buffer_at("hd", 0, 1);
        buf.insert_text("ello wörl");
        assert_eq!(buf.line(0), Some("hello wörld"));
        assert_eq!(buf.cursor(), Position::new(0, 10));
        assert!(buf.is_modified());
    }

    #[test]
    fn test_insert_empty_is_noop() {
        let mut buf = TextBuffer::from_text("abc");
        buf.insert_text("");
        assert!(!buf.is_modified());
    }

    #[test]
    fn test_insert_char_multibyte() {
        let mut buf = buffer_at("caf", 0, 3);
        buf.insert_char('é');
        assert_eq!(buf.line(0), Some("café"));
        assert_eq!(buf.cursor().column, 4);
    }

    #[test]
    fn test_insert_text_with_line_break_splits() {
        let mut buf = buffer_at("ab", 0, 1);
        buf.insert_text("x\ny");
        assert_eq!(lines(&buf), vec!["ax", "yb"]);
        assert_eq!(buf.cursor(), Position::new(1, 1));
    }

    #[test]
    fn test_insert_then_backspace_restores_line() {
        let mut buf = buffer_at("naïve", 0, 3);
        buf.insert_text("é");
        buf.delete_char_backward();
        assert_eq!(buf.line(0), Some("naïve"));
        assert_eq!(buf.cursor(), Position::new(0, 3));
    }

    // --- Deletion ---

    #[test]
    fn test_delete_forward_removes_char_under_cursor() {
        let mut buf = buffer_at("héllo", 0, 1);
        buf.delete_char_forward();
        assert_eq!(buf.line(0), Some("hllo"));
        assert_eq!(buf.cursor(), Position::new(0, 1));
    }

    #[test]
    fn test_delete_forward_at_end_joins_next_line() {
        let mut buf = buffer_at("abc\ndef", 0, 3);
        buf.delete_char_forward();
        assert_eq!(lines(&buf), vec!["abcdef"]);
        assert_eq!(buf.cursor(), Position::new(0, 3));
    }

    #[test]
    fn test_delete_forward_at_end_of_last_line_is_noop() {
        let mut buf = buffer_at("abc", 0, 3);
        buf.delete_char_forward();
        assert_eq!(buf.line(0), Some("abc"));
        assert!(!buf.is_modified());
    }

    #[test]
    fn test_delete_backward_joins_previous_line() {
        let mut buf = buffer_at("abc\ndef", 1, 0);
        buf.delete_char_backward();
        assert_eq!(lines(&buf), vec!["abcdef"]);
        assert_eq!(buf.cursor(), Position::new(0, 3));
    }

    #[test]
    fn test_delete_backward_at_origin_is_noop() {
        let mut buf = TextBuffer::from_text("abc");
        buf.delete_char_backward();
        assert_eq!(buf.line(0), Some("abc"));
        assert!(!buf.is_modified());
    }

    #[test]
    fn test_delete_line_removes_and_clamps() {
        let mut buf = buffer_at("one\ntwo\nthree", 2, 3);
        buf.delete_line();
        assert_eq!(lines(&buf), vec!["one", "two"]);
        assert_eq!(buf.cursor(), Position::new(1, 0));
    }

    #[test]
    fn test_delete_only_line_clears_content() {
        let mut buf = buffer_at("lonely", 0, 4);
        buf.delete_line();
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line(0), Some(""));
        assert_eq!(buf.cursor(), Position::new(0, 0));
    }

    // --- Line operations ---

    #[test]
    fn test_insert_line_above_and_below() {
        let mut buf = buffer_at("a\nb", 1, 1);
        buf.insert_line_above();
        assert_eq!(lines(&buf), vec!["a", "", "b"]);
        assert_eq!(buf.cursor(), Position::new(1, 0));

        buf.insert_line_below();
        assert_eq!(lines(&buf), vec!["a", "", "", "b"]);
        assert_eq!(buf.cursor(), Position::new(2, 0));
    }

    #[test]
    fn test_join_inserts_space_only_between_content() {
        let mut buf = TextBuffer::from_text("foo\nbar\n\nbaz");
        buf.join_with_next();
        assert_eq!(buf.line(0), Some("foo bar"));
        buf.join_with_next();
        assert_eq!(buf.line(0), Some("foo bar"));
        buf.join_with_next();
        assert_eq!(buf.line(0), Some("foo barbaz"));
    }

    #[test]
    fn test_split_at_cursor_on_multibyte_boundary() {
        let mut buf = buffer_at("日本語", 0, 2);
        buf.split_at_cursor();
        assert_eq!(lines(&buf), vec!["日本", "語"]);
        assert_eq!(buf.cursor(), Position::new(1, 0));
    }

    // --- Cursor ---

    #[test]
    fn test_set_cursor_clamps() {
        let mut buf = TextBuffer::from_text("abc\nde");
        buf.set_cursor(Position::new(9, 9));
        assert_eq!(buf.cursor(), Position::new(1, 2));
    }

    #[test]
    fn test_move_cursor_by_clamps_both_axes() {
        let mut buf = buffer_at("abcdef\nxy", 0, 5);
        buf.move_cursor_by(1, 0);
        assert_eq!(buf.cursor(), Position::new(1, 2));
        buf.move_cursor_by(-5, -10);
        assert_eq!(buf.cursor(), Position::new(0, 0));
    }

    // --- Navigation ---

    #[test]
    fn test_next_word_boundary_skips_word_then_blanks() {
        let buf = buffer_at("hello  world", 0, 1);
        assert_eq!(buf.next_word_boundary(), Position::new(0, 7));
    }

    #[test]
    fn test_next_word_boundary_stops_at_punctuation() {
        let buf = buffer_at("foo.bar", 0, 0);
        assert_eq!(buf.next_word_boundary(), Position::new(0, 3));
    }

    #[test]
    fn test_next_word_boundary_wraps_from_line_end() {
        let buf = buffer_at("abc\n   next", 0, 3);
        assert_eq!(buf.next_word_boundary(), Position::new(1, 3));
    }

    #[test]
    fn test_previous_word_boundary() {
        let buf = buffer_at("hello world", 0, 8);
        assert_eq!(buf.previous_word_boundary(), Position::new(0, 6));
        let buf = buffer_at("hello world", 0, 6);
        assert_eq!(buf.previous_word_boundary(), Position::new(0, 0));
        let buf = buffer_at("abc\ndef", 1, 0);
        assert_eq!(buf.previous_word_boundary(), Position::new(0, 3));
    }

    #[test]
    fn test_navigation_queries_do_not_move_cursor() {
        let buf = buffer_at("abc\ndefgh", 1, 2);
        assert_eq!(buf.line_start(), Position::new(1, 0));
        assert_eq!(buf.line_end(), Position::new(1, 5));
        assert_eq!(buf.buffer_start(), Position::new(0, 0));
        assert_eq!(buf.buffer_end(), Position::new(1, 5));
        assert_eq!(buf.cursor(), Position::new(1, 2));
    }

    #[test]
    fn test_word_at_cursor() {
        let buf = buffer_at("let foo_bar = 1;", 0, 6);
        assert_eq!(buf.word_at_cursor().as_deref(), Some("foo_bar"));
        let buf = buffer_at("let foo_bar = 1;", 0, 12);
        assert_eq!(buf.word_at_cursor(), None);
    }

    // --- Yank / paste ---

    #[test]
    fn test_yank_and_paste_lines() {
        let mut buf = buffer_at("one\ntwo", 0, 2);
        let yanked = buf.yank_current_line();
        buf.paste_after(&yanked);
        assert_eq!(lines(&buf), vec!["one", "one", "two"]);
        assert_eq!(buf.cursor(), Position::new(1, 0));

        buf.set_cursor(Position::new(2, 1));
        buf.paste_before("zero");
        assert_eq!(lines(&buf), vec!["one", "one", "zero", "two"]);
        assert_eq!(buf.cursor(), Position::new(2, 0));
    }

    // --- Read-only ---

    #[test]
    fn test_read_only_rejects_every_mutation() {
        let mut buf = buffer_at("abc\ndef", 0, 1);
        buf.set_read_only(true);
        buf.insert_text("x");
        buf.delete_char_forward();
        buf.delete_char_backward();
        buf.delete_line();
        buf.insert_line_above();
        buf.insert_line_below();
        buf.join_with_next();
        buf.split_at_cursor();
        buf.paste_after("p");
        buf.paste_before("p");
        assert_eq!(lines(&buf), vec!["abc", "def"]);
        assert!(!buf.is_modified());
    }

    // --- History ---

    #[test]
    fn test_undo_moves_history_index_without_restoring_text() {
        let mut buf = TextBuffer::from_text("abc");
        buf.insert_text("x");
        buf.save(Some(&tempdir().unwrap().path().join("f"))).unwrap();
        assert!(buf.undo());
        assert!(buf.is_modified());
        assert_eq!(buf.line(0), Some("xabc"));
        assert!(!buf.undo());
        assert!(buf.redo());
        assert!(!buf.redo());
    }

    // --- Invariants ---

    #[derive(Debug, Clone)]
    enum Op {
        Insert(String),
        DeleteForward,
        DeleteBackward,
        DeleteLine,
        Split,
        Join,
        Above,
        Below,
        Move(isize, isize),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            "[a-zé日 ]{1,4}".prop_map(Op::Insert),
            Just(Op::DeleteForward),
            Just(Op::DeleteBackward),
            Just(Op::DeleteLine),
            Just(Op::Split),
            Just(Op::Join),
            Just(Op::Above),
            Just(Op::Below),
            (-3isize..3, -5isize..5).prop_map(|(l, c)| Op::Move(l, c)),
        ]
    }

    proptest! {
        #[test]
        fn prop_cursor_always_valid(ops in proptest::collection::vec(op_strategy(), 0..40)) {
            let mut buf = TextBuffer::from_text("alpha\nbeta gamma\n\nδelta");
            for op in ops {
                match op {
                    Op::Insert(s) => buf.insert_text(&s),
                    Op::DeleteForward => buf.delete_char_forward(),
                    Op::DeleteBackward => buf.delete_char_backward(),
                    Op::DeleteLine => buf.delete_line(),
                    Op::Split => buf.split_at_cursor(),
                    Op::Join => buf.join_with_next(),
                    Op::Above => buf.insert_line_above(),
                    Op::Below => buf.insert_line_below(),
                    Op::Move(l, c) => buf.move_cursor_by(l, c),
                }
                prop_assert!(buf.line_count() >= 1);
                prop_assert!(buf.is_valid_position(buf.cursor()));
            }
        }
    }
}
