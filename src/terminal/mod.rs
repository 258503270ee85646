//! Terminal capability consumed by the viewport and the dispatcher.
//!
//! The editing core draws through [`Terminal`] and reads keys through
//! [`InputSource`]; it never talks to a backend directly. [`TuiTerminal`]
//! implements the drawing side over a ratatui cell buffer (crossterm in
//! production, `TestBackend` in tests). [`CrosstermInput`] and
//! [`ScriptedInput`] implement the input side.

mod input;
mod tui;

pub use input::{CrosstermInput, ScriptedInput, map_key_event};
pub use tui::TuiTerminal;

use thiserror::Error;

/// Errors raised by terminal backends and input sources.
#[derive(Debug, Error)]
pub enum TerminalError {
    #[error("terminal backend error: {0}")]
    Backend(String),
    #[error("input closed")]
    InputClosed,
    #[error("terminal not initialized")]
    NotInitialized,
}

/// The sixteen ANSI colors plus the terminal default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    #[default]
    Default,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
}

impl From<Color> for ratatui::style::Color {
    fn from(color: Color) -> Self {
        use ratatui::style::Color as Rc;
        match color {
            Color::Default => Rc::Reset,
            Color::Black => Rc::Black,
            Color::Red => Rc::Red,
            Color::Green => Rc::Green,
            Color::Yellow => Rc::Yellow,
            Color::Blue => Rc::Blue,
            Color::Magenta => Rc::Magenta,
            Color::Cyan => Rc::Cyan,
            Color::White => Rc::Gray,
            Color::BrightBlack => Rc::DarkGray,
            Color::BrightRed => Rc::LightRed,
            Color::BrightGreen => Rc::LightGreen,
            Color::BrightYellow => Rc::LightYellow,
            Color::BrightBlue => Rc::LightBlue,
            Color::BrightMagenta => Rc::LightMagenta,
            Color::BrightCyan => Rc::LightCyan,
            Color::BrightWhite => Rc::White,
        }
    }
}

/// Colors and attributes for a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextStyle {
    pub fg: Color,
    pub bg: Color,
    pub bold: bool,
    pub italic: bool,
}

impl TextStyle {
    pub const fn colored(fg: Color, bg: Color) -> Self {
        Self {
            fg,
            bg,
            bold: false,
            italic: false,
        }
    }
}

/// A cell coordinate on screen, zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScreenPos {
    pub row: u16,
    pub col: u16,
}

impl ScreenPos {
    pub const fn new(row: u16, col: u16) -> Self {
        Self { row, col }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TerminalSize {
    pub rows: u16,
    pub cols: u16,
}

/// A decoded key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Ctrl(char),
    Enter,
    Escape,
    Backspace,
    Delete,
    Tab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    Function(u8),
    Resize(u16, u16),
}

/// Drawing surface.
///
/// Text positions are character cells: each character of `text` occupies
/// one column, independent of its encoded length. Drawing is buffered until
/// [`Terminal::refresh`].
pub trait Terminal {
    /// Prepare the terminal for drawing.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be set up.
    fn initialize(&mut self) -> Result<(), TerminalError>;

    /// Release the terminal.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be restored.
    fn shutdown(&mut self) -> Result<(), TerminalError>;

    fn size(&self) -> TerminalSize;

    /// Blank every cell.
    fn clear(&mut self);

    /// Flush pending drawing to the screen.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend write fails.
    fn refresh(&mut self) -> Result<(), TerminalError>;

    fn set_cursor(&mut self, pos: ScreenPos);
    fn cursor(&self) -> ScreenPos;
    fn show_cursor(&mut self, visible: bool);

    fn put_text(&mut self, text: &str, pos: ScreenPos) {
        self.put_text_with_color(text, pos, Color::Default, Color::Default);
    }

    fn put_text_with_color(&mut self, text: &str, pos: ScreenPos, fg: Color, bg: Color);

    /// Draw text with attributes. Backends without attribute support keep
    /// only the colors.
    fn put_styled_text(&mut self, text: &str, pos: ScreenPos, style: TextStyle) {
        self.put_text_with_color(text, pos, style.fg, style.bg);
    }

    /// Toggle raw input mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the mode switch fails.
    fn set_raw_mode(&mut self, enabled: bool) -> Result<(), TerminalError>;

    /// The most recent backend failure, if any.
    fn last_error(&self) -> Option<&str>;
}

/// Source of key presses.
pub trait InputSource {
    /// Block until a key is available.
    ///
    /// # Errors
    ///
    /// Returns [`TerminalError::InputClosed`] when no more input will
    /// arrive, or a backend error.
    fn get_key(&mut self) -> Result<Key, TerminalError>;

    /// Whether a key is ready without blocking.
    ///
    /// # Errors
    ///
    /// Returns a backend error if polling fails.
    fn has_input(&mut self) -> Result<bool, TerminalError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bright_colors_map_to_light_variants() {
        assert_eq!(
            ratatui::style::Color::from(Color::BrightCyan),
            ratatui::style::Color::LightCyan
        );
        assert_eq!(
            ratatui::style::Color::from(Color::White),
            ratatui::style::Color::Gray
        );
        assert_eq!(
            ratatui::style::Color::from(Color::Default),
            ratatui::style::Color::Reset
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(TerminalError::InputClosed.to_string(), "input closed");
        assert_eq!(
            TerminalError::Backend("boom".into()).to_string(),
            "terminal backend error: boom"
        );
    }
}
