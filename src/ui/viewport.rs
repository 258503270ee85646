//! The window onto the active buffer.
//!
//! A [`Viewport`] owns a scroll origin (`top_line`, `left_column`) and a
//! screen rectangle. It does not own the buffer: every method that needs
//! text takes the buffer as a parameter, and [`Viewport::set_buffer`]
//! resets the scroll state whenever the active buffer changes.

use std::borrow::Cow;
use std::rc::Rc;

use crate::editor::{Position, TextBuffer};
use crate::highlight::Tokenizer;
use crate::terminal::{Color, ScreenPos, Terminal};
use crate::text;

/// Default tab stop width.
pub const DEFAULT_TAB_WIDTH: usize = 4;

const GUTTER_COLOR: Color = Color::Cyan;

/// Scrolled view of a buffer.
///
/// # Example
///
/// ```
/// use kestrel::editor::{Position, TextBuffer};
/// use kestrel::ui::viewport::Viewport;
///
/// let mut buffer = TextBuffer::from_text(&"line\n".repeat(100));
/// let mut vp = Viewport::new(10, 40);
/// buffer.set_cursor(Position::new(50, 0));
/// vp.ensure_cursor_visible(&buffer);
/// assert_eq!(vp.top_line(), 41);
/// ```
pub struct Viewport {
    rows: u16,
    cols: u16,
    top_line: usize,
    left_column: usize,
    screen_cursor: ScreenPos,
    show_line_numbers: bool,
    wrap_lines: bool,
    tab_width: usize,
    tokenizer: Option<Rc<dyn Tokenizer>>,
    highlighting: bool,
}

impl std::fmt::Debug for Viewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Viewport")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .field("top_line", &self.top_line)
            .field("left_column", &self.left_column)
            .field("tokenizer", &self.tokenizer.as_ref().map(|t| t.name().to_string()))
            .finish_non_exhaustive()
    }
}

impl Viewport {
    /// Create a viewport at the top-left corner of the screen.
    pub const fn new(rows: u16, cols: u16) -> Self {
        Self {
            rows,
            cols,
            top_line: 0,
            left_column: 0,
            screen_cursor: ScreenPos::new(0, 0),
            show_line_numbers: true,
            wrap_lines: false,
            tab_width: DEFAULT_TAB_WIDTH,
            tokenizer: None,
            highlighting: true,
        }
    }

    pub const fn rows(&self) -> u16 {
        self.rows
    }

    pub const fn cols(&self) -> u16 {
        self.cols
    }

    pub const fn resize(&mut self, rows: u16, cols: u16) {
        self.rows = rows;
        self.cols = cols;
    }

    pub const fn top_line(&self) -> usize {
        self.top_line
    }

    pub const fn left_column(&self) -> usize {
        self.left_column
    }

    /// Cursor position on screen, as of the last recomputation.
    pub const fn screen_cursor(&self) -> ScreenPos {
        self.screen_cursor
    }

    pub const fn show_line_numbers(&self) -> bool {
        self.show_line_numbers
    }

    pub const fn set_show_line_numbers(&mut self, show: bool) {
        self.show_line_numbers = show;
    }

    pub const fn wrap_lines(&self) -> bool {
        self.wrap_lines
    }

    /// With wrapping on, the view never scrolls horizontally and long lines
    /// are clipped at the right edge.
    pub const fn set_wrap_lines(&mut self, wrap: bool) {
        self.wrap_lines = wrap;
        if wrap {
            self.left_column = 0;
        }
    }

    pub const fn tab_width(&self) -> usize {
        self.tab_width
    }

    pub fn set_tab_width(&mut self, width: usize) {
        self.tab_width = width.max(1);
    }

    pub fn tokenizer(&self) -> Option<&dyn Tokenizer> {
        self.tokenizer.as_deref()
    }

    pub fn set_tokenizer(&mut self, tokenizer: Option<Rc<dyn Tokenizer>>) {
        self.tokenizer = tokenizer;
    }

    pub const fn highlighting(&self) -> bool {
        self.highlighting
    }

    /// Enable or suspend token coloring without unbinding the tokenizer.
    pub const fn set_highlighting(&mut self, enabled: bool) {
        self.highlighting = enabled;
    }

    /// Rebind to a different buffer: scroll back to the origin and
    /// recompute the cursor.
    pub fn set_buffer(&mut self, buffer: &TextBuffer) {
        self.top_line = 0;
        self.left_column = 0;
        self.ensure_cursor_visible(buffer);
    }

    /// Width of the line-number column: digits of the last line number
    /// plus two, or zero when line numbers are off.
    pub fn gutter_width(&self, buffer: &TextBuffer) -> usize {
        if !self.show_line_numbers {
            return 0;
        }
        let mut digits = 1;
        let mut n = buffer.line_count();
        while n >= 10 {
            n /= 10;
            digits += 1;
        }
        digits + 2
    }

    /// Columns left for text after the gutter.
    pub fn text_width(&self, buffer: &TextBuffer) -> usize {
        usize::from(self.cols).saturating_sub(self.gutter_width(buffer))
    }

    /// Scroll the minimum amount needed to bring the cursor into view.
    pub fn ensure_cursor_visible(&mut self, buffer: &TextBuffer) {
        let cursor = buffer.cursor();
        let rows = usize::from(self.rows).max(1);
        if cursor.line < self.top_line {
            self.top_line = cursor.line;
        } else if cursor.line >= self.top_line + rows {
            self.top_line = cursor.line + 1 - rows;
        }

        if self.wrap_lines {
            self.left_column = 0;
        } else {
            let width = self.text_width(buffer).max(1);
            if cursor.column < self.left_column {
                self.left_column = cursor.column;
            } else if cursor.column >= self.left_column + width {
                self.left_column = cursor.column + 1 - width;
            }
        }
        self.update_screen_cursor(buffer);
    }

    /// Scroll so the cursor sits in the middle of the view.
    pub fn center_on_cursor(&mut self, buffer: &TextBuffer) {
        let cursor = buffer.cursor();
        self.top_line = cursor.line.saturating_sub(usize::from(self.rows) / 2);
        if !self.wrap_lines {
            self.left_column = cursor.column.saturating_sub(self.text_width(buffer) / 2);
        }
        self.update_screen_cursor(buffer);
    }

    /// Put `line` at the top of the view, if it exists.
    pub fn scroll_to_line(&mut self, buffer: &TextBuffer, line: usize) {
        if line < buffer.line_count() {
            self.top_line = line;
            self.update_screen_cursor(buffer);
        }
    }

    /// Map a buffer position to viewport-relative `(row, col)`. Positions
    /// scrolled out of view map outside `0..rows` / `0..cols`.
    pub fn buffer_to_screen(&self, buffer: &TextBuffer, pos: Position) -> (isize, isize) {
        let row = signed(pos.line) - signed(self.top_line);
        let col = signed(pos.column) - signed(self.left_column) + signed(self.gutter_width(buffer));
        (row, col)
    }

    /// Inverse of [`Self::buffer_to_screen`] for cells inside the view.
    /// Cells in the gutter map to the first visible column.
    pub fn screen_to_buffer(&self, buffer: &TextBuffer, pos: ScreenPos) -> Position {
        let gutter = self.gutter_width(buffer);
        let col = usize::from(pos.col).saturating_sub(gutter);
        Position::new(
            self.top_line + usize::from(pos.row),
            self.left_column + col,
        )
    }

    /// Recompute the on-screen cursor, clamped into the view rectangle.
    pub fn update_screen_cursor(&mut self, buffer: &TextBuffer) {
        let (row, col) = self.buffer_to_screen(buffer, buffer.cursor());
        self.screen_cursor = ScreenPos::new(
            clamp_to(row, self.rows),
            clamp_to(col, self.cols),
        );
    }

    /// Recompute the cursor and move the terminal cursor there.
    pub fn place_cursor(&mut self, buffer: &TextBuffer, terminal: &mut dyn Terminal) {
        self.update_screen_cursor(buffer);
        terminal.set_cursor(self.screen_cursor);
    }

    /// Draw the visible slice of `buffer`.
    pub fn render(&mut self, buffer: &TextBuffer, terminal: &mut dyn Terminal) {
        let _scope = crate::perf::scope("viewport.render");
        let blank = " ".repeat(usize::from(self.cols));
        let gutter = self.gutter_width(buffer);
        let width = self.text_width(buffer);
        let text_col = u16::try_from(gutter).unwrap_or(self.cols);
        let tokenizer = if self.highlighting {
            self.tokenizer.clone()
        } else {
            None
        };

        for row in 0..self.rows {
            let at = ScreenPos::new(row, 0);
            terminal.put_text(&blank, at);

            let line_index = self.top_line + usize::from(row);
            let Some(line) = buffer.line(line_index) else {
                continue;
            };

            if gutter > 0 {
                let number = format!("{:>w$} ", line_index + 1, w = gutter - 1);
                terminal.put_text_with_color(&number, at, GUTTER_COLOR, Color::Default);
            }
            if width == 0 {
                continue;
            }

            let expanded = expand_tabs(line, self.tab_width);
            let visible = text::substr(&expanded, self.left_column, Some(width));
            let text_at = ScreenPos::new(at.row, text_col);
            terminal.put_text(visible, text_at);

            let Some(tokenizer) = tokenizer.as_deref() else {
                continue;
            };
            let highlighted = tokenizer.tokenize_line(&expanded, line_index);
            let window_start = self.left_column;
            let window_end = self.left_column + width;
            for token in &highlighted.tokens {
                let start = token.start.max(window_start);
                let end = token.end().min(window_end);
                if start >= end {
                    continue;
                }
                let slice = text::substr(&highlighted.processed, start, Some(end - start));
                let offset = u16::try_from(start - window_start).unwrap_or(u16::MAX);
                terminal.put_styled_text(
                    slice,
                    ScreenPos::new(at.row, text_col.saturating_add(offset)),
                    token.style(),
                );
            }
        }
        self.place_cursor(buffer, terminal);
    }
}

/// Replace tabs with spaces up to the next multiple of `tab_width`.
pub fn expand_tabs(line: &str, tab_width: usize) -> Cow<'_, str> {
    if !line.contains('\t') {
        return Cow::Borrowed(line);
    }
    let tab_width = tab_width.max(1);
    let mut out = String::with_capacity(line.len() + tab_width);
    let mut column = 0;
    for ch in line.chars() {
        if ch == '\t' {
            let spaces = tab_width - column % tab_width;
            out.extend(std::iter::repeat_n(' ', spaces));
            column += spaces;
        } else {
            out.push(ch);
            column += 1;
        }
    }
    Cow::Owned(out)
}

#[allow(clippy::cast_possible_wrap)]
const fn signed(value: usize) -> isize {
    value as isize
}

fn clamp_to(value: isize, extent: u16) -> u16 {
    let max = isize::try_from(extent)
        .unwrap_or(isize::MAX)
        .saturating_sub(1)
        .max(0);
    u16::try_from(value.clamp(0, max)).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_with_lines(n: usize) -> TextBuffer {
        let text: Vec<String> = (0..n).map(|i| format!("line {i}")).collect();
        TextBuffer::from_text(&text.join("\n"))
    }

    #[test]
    fn test_gutter_width_tracks_line_count() {
        let vp = Viewport::new(10, 40);
        assert_eq!(vp.gutter_width(&buffer_with_lines(9)), 3);
        assert_eq!(vp.gutter_width(&buffer_with_lines(10)), 4);
        assert_eq!(vp.gutter_width(&buffer_with_lines(1000)), 6);

        let mut vp = Viewport::new(10, 40);
        vp.set_show_line_numbers(false);
        assert_eq!(vp.gutter_width(&buffer_with_lines(1000)), 0);
    }

    #[test]
    fn test_ensure_visible_scrolls_down_and_up() {
        let mut buf = buffer_with_lines(100);
        let mut vp = Viewport::new(10, 40);
        buf.set_cursor(Position::new(25, 0));
        vp.ensure_cursor_visible(&buf);
        assert_eq!(vp.top_line(), 16);
        assert_eq!(vp.screen_cursor().row, 9);

        buf.set_cursor(Position::new(3, 0));
        vp.ensure_cursor_visible(&buf);
        assert_eq!(vp.top_line(), 3);
        assert_eq!(vp.screen_cursor().row, 0);
    }

    #[test]
    fn test_ensure_visible_is_idempotent() {
        let mut buf = TextBuffer::from_text(&"x".repeat(200));
        buf.set_cursor(Position::new(0, 150));
        let mut vp = Viewport::new(5, 20);
        vp.ensure_cursor_visible(&buf);
        let first = (vp.top_line(), vp.left_column());
        vp.ensure_cursor_visible(&buf);
        assert_eq!((vp.top_line(), vp.left_column()), first);
    }

    #[test]
    fn test_horizontal_scroll_respects_gutter() {
        let mut buf = TextBuffer::from_text(&"x".repeat(100));
        let mut vp = Viewport::new(5, 20);
        // One line: gutter is 3, text width 17.
        buf.set_cursor(Position::new(0, 17));
        vp.ensure_cursor_visible(&buf);
        assert_eq!(vp.left_column(), 1);
        assert_eq!(vp.screen_cursor().col, 19);
    }

    #[test]
    fn test_wrap_mode_pins_left_column() {
        let mut buf = TextBuffer::from_text(&"x".repeat(100));
        let mut vp = Viewport::new(5, 20);
        vp.set_wrap_lines(true);
        buf.set_cursor(Position::new(0, 90));
        vp.ensure_cursor_visible(&buf);
        assert_eq!(vp.left_column(), 0);
        assert_eq!(vp.screen_cursor().col, 19);
    }

    #[test]
    fn test_center_on_cursor() {
        let mut buf = buffer_with_lines(100);
        let mut vp = Viewport::new(10, 40);
        buf.set_cursor(Position::new(50, 2));
        vp.center_on_cursor(&buf);
        assert_eq!(vp.top_line(), 45);
        assert_eq!(vp.left_column(), 0);
    }

    #[test]
    fn test_buffer_screen_mapping_round_trips() {
        let buf = buffer_with_lines(50);
        let mut vp = Viewport::new(10, 40);
        vp.scroll_to_line(&buf, 20);
        let (row, col) = vp.buffer_to_screen(&buf, Position::new(22, 3));
        assert_eq!((row, col), (2, 7));
        let back = vp.screen_to_buffer(&buf, ScreenPos::new(2, 7));
        assert_eq!(back, Position::new(22, 3));
        assert_eq!(vp.buffer_to_screen(&buf, Position::new(10, 0)).0, -10);
    }

    #[test]
    fn test_scroll_to_line_ignores_out_of_range() {
        let buf = buffer_with_lines(5);
        let mut vp = Viewport::new(3, 20);
        vp.scroll_to_line(&buf, 9);
        assert_eq!(vp.top_line(), 0);
    }

    #[test]
    fn test_set_buffer_resets_scroll() {
        let mut big = buffer_with_lines(100);
        big.set_cursor(Position::new(80, 0));
        let mut vp = Viewport::new(10, 40);
        vp.ensure_cursor_visible(&big);
        assert!(vp.top_line() > 0);
        vp.set_buffer(&buffer_with_lines(3));
        assert_eq!(vp.top_line(), 0);
    }

    #[test]
    fn test_clamp_to_screen_extent() {
        assert_eq!(clamp_to(-4, 10), 0);
        assert_eq!(clamp_to(7, 10), 7);
        assert_eq!(clamp_to(25, 10), 9);
        assert_eq!(clamp_to(3, 0), 0);
        assert_eq!(clamp_to(isize::MAX, u16::MAX), u16::MAX - 1);
    }

    #[test]
    fn test_expand_tabs_to_stops() {
        assert_eq!(expand_tabs("a\tb", 4), "a   b");
        assert_eq!(expand_tabs("\t\tx", 2), "    x");
        assert_eq!(expand_tabs("abcd\te", 4), "abcd    e");
        assert!(matches!(expand_tabs("none", 4), Cow::Borrowed(_)));
    }
}
