use std::io::Stdout;

use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use super::{Color, ScreenPos, Terminal, TerminalError, TerminalSize, TextStyle};

/// [`Terminal`] over a ratatui backend.
///
/// Drawing goes into an off-screen cell buffer; [`Terminal::refresh`] hands
/// that buffer to ratatui, which diffs it against the previous frame and
/// writes only changed cells.
pub struct TuiTerminal<B: Backend> {
    terminal: ratatui::Terminal<B>,
    cells: Buffer,
    cursor: ScreenPos,
    cursor_visible: bool,
    initialized: bool,
    raw_mode: bool,
    console: bool,
    last_error: Option<String>,
}

fn backend_error(err: impl std::fmt::Display) -> TerminalError {
    TerminalError::Backend(err.to_string())
}

impl<B: Backend> TuiTerminal<B> {
    /// Wrap a backend.
    ///
    /// # Errors
    ///
    /// Returns an error if ratatui cannot query the backend.
    pub fn new(backend: B) -> Result<Self, TerminalError> {
        let terminal = ratatui::Terminal::new(backend).map_err(backend_error)?;
        Ok(Self::from_terminal(terminal))
    }

    /// Wrap an already constructed ratatui terminal.
    pub fn from_terminal(terminal: ratatui::Terminal<B>) -> Self {
        let mut this = Self {
            terminal,
            cells: Buffer::empty(Rect::default()),
            cursor: ScreenPos::default(),
            cursor_visible: true,
            initialized: false,
            raw_mode: false,
            console: false,
            last_error: None,
        };
        this.sync_size();
        this
    }

    /// The pending (not yet refreshed) cell contents.
    pub const fn cells(&self) -> &Buffer {
        &self.cells
    }

    pub fn backend(&self) -> &B {
        self.terminal.backend()
    }

    /// Re-read the backend size, reallocating the cell buffer on change.
    fn sync_size(&mut self) {
        match self.terminal.size() {
            Ok(size) => {
                if size.width != self.cells.area.width || size.height != self.cells.area.height {
                    self.cells = Buffer::empty(Rect::new(0, 0, size.width, size.height));
                }
            }
            Err(err) => {
                tracing::warn!(%err, "terminal size query failed");
                self.last_error = Some(err.to_string());
            }
        }
    }

    fn record<T>(&mut self, result: Result<T, TerminalError>) -> Result<T, TerminalError> {
        if let Err(err) = &result {
            self.last_error = Some(err.to_string());
        }
        result
    }
}

impl TuiTerminal<CrosstermBackend<Stdout>> {
    /// Wrap the process console acquired through `ratatui::try_init`.
    ///
    /// The console starts in raw mode; [`Terminal::shutdown`] restores it.
    pub fn console(terminal: ratatui::DefaultTerminal) -> Self {
        let mut this = Self::from_terminal(terminal);
        this.console = true;
        this.raw_mode = true;
        this
    }
}

impl<B: Backend> Terminal for TuiTerminal<B> {
    fn initialize(&mut self) -> Result<(), TerminalError> {
        self.sync_size();
        self.cells.reset();
        let cleared = self.terminal.clear().map_err(backend_error);
        self.record(cleared)?;
        self.initialized = true;
        Ok(())
    }

    fn shutdown(&mut self) -> Result<(), TerminalError> {
        if !self.initialized {
            return Ok(());
        }
        self.initialized = false;
        if self.console {
            ratatui::restore();
            self.raw_mode = false;
        }
        Ok(())
    }

    fn size(&self) -> TerminalSize {
        TerminalSize {
            rows: self.cells.area.height,
            cols: self.cells.area.width,
        }
    }

    fn clear(&mut self) {
        self.sync_size();
        self.cells.reset();
    }

    fn refresh(&mut self) -> Result<(), TerminalError> {
        if !self.initialized {
            return Err(TerminalError::NotInitialized);
        }
        let Self {
            terminal,
            cells,
            cursor,
            cursor_visible,
            ..
        } = self;
        let drawn = terminal
            .draw(|frame| {
                frame.buffer_mut().merge(cells);
                if *cursor_visible {
                    frame.set_cursor_position((cursor.col, cursor.row));
                }
            })
            .map(|_| ())
            .map_err(backend_error);
        self.record(drawn)
    }

    fn set_cursor(&mut self, pos: ScreenPos) {
        self.cursor = pos;
    }

    fn cursor(&self) -> ScreenPos {
        self.cursor
    }

    fn show_cursor(&mut self, visible: bool) {
        self.cursor_visible = visible;
    }

    fn put_text_with_color(&mut self, text: &str, pos: ScreenPos, fg: Color, bg: Color) {
        self.put_styled_text(text, pos, TextStyle::colored(fg, bg));
    }

    fn put_styled_text(&mut self, text: &str, pos: ScreenPos, style: TextStyle) {
        let area = self.cells.area;
        if pos.row >= area.height {
            return;
        }
        let mut cell_style = Style::default().fg(style.fg.into()).bg(style.bg.into());
        if style.bold {
            cell_style = cell_style.add_modifier(Modifier::BOLD);
        }
        if style.italic {
            cell_style = cell_style.add_modifier(Modifier::ITALIC);
        }
        let mut col = pos.col;
        for ch in text.chars() {
            if col >= area.width {
                break;
            }
            if let Some(cell) = self.cells.cell_mut((col, pos.row)) {
                cell.reset();
                cell.set_char(ch).set_style(cell_style);
            }
            col += 1;
        }
    }

    fn set_raw_mode(&mut self, enabled: bool) -> Result<(), TerminalError> {
        if self.console && enabled != self.raw_mode {
            let switched = if enabled {
                crossterm::terminal::enable_raw_mode()
            } else {
                crossterm::terminal::disable_raw_mode()
            }
            .map_err(backend_error);
            self.record(switched)?;
        }
        self.raw_mode = enabled;
        Ok(())
    }

    fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
