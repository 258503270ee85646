use std::path::Path;

use crate::config::EditorOptions;
use crate::editor::TextBuffer;
use crate::highlight::TokenizerRegistry;
use crate::search::SearchState;
use crate::terminal::TerminalSize;
use crate::ui::viewport::Viewport;

/// Lines of a buffer handed to content-based tokenizer detection.
const DETECTION_SAMPLE_LINES: usize = 5;

/// Editing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    Insert,
    Visual,
    VisualLine,
    Command,
    Search,
}

impl Mode {
    /// Name shown in the status line.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Insert => "INSERT",
            Self::Visual => "VISUAL",
            Self::VisualLine => "VISUAL LINE",
            Self::Command => "COMMAND",
            Self::Search => "SEARCH",
        }
    }
}

/// Severity of a status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Error,
}

/// One-shot message shown in the status line until the next key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub level: StatusLevel,
    pub text: String,
}

/// How much of the screen the last update invalidated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Redraw {
    #[default]
    None,
    /// Only the cursor moved.
    Cursor,
    Full,
}

/// The complete editor state.
#[derive(Debug)]
pub struct Model {
    /// Open buffers; never empty.
    pub buffers: Vec<TextBuffer>,
    /// Index of the buffer shown in the viewport.
    pub active: usize,
    pub viewport: Viewport,
    pub mode: Mode,
    pub previous_mode: Mode,
    /// Text typed after `:`.
    pub command_line: String,
    pub search: SearchState,
    /// Last yanked text.
    pub yank: String,
    /// Whether `yank` holds whole lines; paste is enabled once set.
    pub yank_line_mode: bool,
    /// Keys of a multi-key command typed so far (`g`, `d`, `y`).
    pub sequence: String,
    /// Numeric prefix typed so far; zero means none.
    pub repeat_count: usize,
    pub status: Option<StatusMessage>,
    pub should_quit: bool,
    pub redraw: Redraw,
    pub registry: TokenizerRegistry,
    pub options: EditorOptions,
}

impl Model {
    /// A model holding one empty, unnamed buffer.
    pub fn new(options: EditorOptions, size: TerminalSize) -> Self {
        Self::with_registry(options, size, TokenizerRegistry::new())
    }

    /// A model with no tokenizers, used as a stand-in while the real one
    /// is moved through [`crate::app::update`].
    pub fn empty() -> Self {
        Self::with_registry(
            EditorOptions::default(),
            TerminalSize { rows: 0, cols: 0 },
            TokenizerRegistry::empty(),
        )
    }

    fn with_registry(
        options: EditorOptions,
        size: TerminalSize,
        registry: TokenizerRegistry,
    ) -> Self {
        let mut viewport = Viewport::new(size.rows.saturating_sub(1), size.cols);
        viewport.set_show_line_numbers(options.line_numbers);
        viewport.set_wrap_lines(options.wrap_lines);
        viewport.set_tab_width(options.tab_width);
        viewport.set_highlighting(options.highlighting);

        let mut buffer = TextBuffer::new();
        buffer.set_read_only(options.read_only);

        Self {
            buffers: vec![buffer],
            active: 0,
            viewport,
            mode: Mode::Normal,
            previous_mode: Mode::Normal,
            command_line: String::new(),
            search: SearchState::default(),
            yank: String::new(),
            yank_line_mode: false,
            sequence: String::new(),
            repeat_count: 0,
            status: None,
            should_quit: false,
            redraw: Redraw::Full,
            registry,
            options,
        }
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffers[self.active]
    }

    pub fn buffer_mut(&mut self) -> &mut TextBuffer {
        &mut self.buffers[self.active]
    }

    pub fn set_mode(&mut self, mode: Mode) {
        if mode != self.mode {
            self.previous_mode = self.mode;
            self.mode = mode;
        }
    }

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            level: StatusLevel::Info,
            text: text.into(),
        });
    }

    pub fn set_error(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            level: StatusLevel::Error,
            text: text.into(),
        });
    }

    /// Raise the pending redraw to at least `level`.
    pub fn request_redraw(&mut self, level: Redraw) {
        self.redraw = self.redraw.max(level);
    }

    /// Forget a partially typed sequence and count.
    pub fn clear_pending(&mut self) {
        self.sequence.clear();
        self.repeat_count = 0;
    }

    /// The terminal changed size; the last row stays reserved for status.
    pub fn resize(&mut self, size: TerminalSize) {
        self.viewport.resize(size.rows.saturating_sub(1), size.cols);
        self.viewport.ensure_cursor_visible(&self.buffers[self.active]);
        self.request_redraw(Redraw::Full);
    }

    /// Open `path` into a new buffer and show it.
    ///
    /// A missing file still yields an empty buffer carrying that name.
    pub fn open_file(&mut self, path: &Path) {
        let (mut buffer, existed) = match TextBuffer::open(path) {
            Ok(buffer) => (buffer, true),
            Err(err) if err.is_not_found() => {
                let mut buffer = TextBuffer::new();
                buffer.set_path(path);
                (buffer, false)
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "open failed");
                self.set_error(format!("Could not open file: {err}"));
                return;
            }
        };
        buffer.set_read_only(self.options.read_only);

        let index = self.push_buffer(buffer);
        self.show_buffer(index);

        let name = self.buffer().display_name();
        let verb = if existed { "Opened" } else { "New file" };
        let highlighter = self
            .viewport
            .tokenizer()
            .map(|t| format!(" ({})", t.name()))
            .unwrap_or_default();
        self.set_status(format!("{verb}: {name}{highlighter} [Buffer {}]", index + 1));
    }

    /// Put `buffer` in a slot, reusing the initial empty buffer if it was
    /// never touched. Returns the slot index.
    fn push_buffer(&mut self, buffer: TextBuffer) -> usize {
        let untouched = self.buffers.len() == 1
            && self.buffers[0].path().is_none()
            && !self.buffers[0].is_modified()
            && self.buffers[0].is_empty();
        if untouched {
            self.buffers[0] = buffer;
            0
        } else {
            self.buffers.push(buffer);
            self.buffers.len() - 1
        }
    }

    /// Make `index` the active buffer and rebind the viewport to it.
    fn show_buffer(&mut self, index: usize) {
        self.active = index.min(self.buffers.len() - 1);
        self.bind_tokenizer();
        self.viewport.set_buffer(&self.buffers[self.active]);
        self.request_redraw(Redraw::Full);
    }

    /// Pick a tokenizer for the active buffer by name, then by content.
    pub fn bind_tokenizer(&mut self) {
        let buffer = &self.buffers[self.active];
        let sample = buffer
            .lines()
            .take(DETECTION_SAMPLE_LINES)
            .collect::<Vec<_>>()
            .join("\n");
        let tokenizer = self.registry.for_file(&buffer.display_name(), Some(&sample));
        self.viewport.set_tokenizer(tokenizer);
    }

    /// Switch to buffer `index` (0-based) and report it.
    ///
    /// Returns `false` if there is no such buffer.
    pub fn switch_buffer(&mut self, index: usize) -> bool {
        if index >= self.buffers.len() {
            return false;
        }
        self.show_buffer(index);
        let name = self.buffer().display_name();
        self.set_status(format!("Switched to buffer {}: {name}", index + 1));
        true
    }

    pub fn next_buffer(&mut self) {
        if self.buffers.len() > 1 {
            self.switch_buffer((self.active + 1) % self.buffers.len());
        }
    }

    pub fn previous_buffer(&mut self) {
        let count = self.buffers.len();
        if count > 1 {
            self.switch_buffer((self.active + count - 1) % count);
        }
    }

    /// Close the active buffer.
    ///
    /// Refuses when it has unsaved changes (unless `force`) or when it is
    /// the only buffer.
    pub fn close_buffer(&mut self, force: bool) {
        if !force && self.buffer().is_modified() {
            self.set_error("No write since last change (use :bd! to override)");
            return;
        }
        if self.buffers.len() == 1 {
            self.set_error("Cannot close last buffer");
            return;
        }
        let closed = self.active;
        self.buffers.remove(closed);
        let mut next = self.active;
        if next >= closed && next > 0 {
            next -= 1;
        }
        self.show_buffer(next);
        self.set_status(format!(
            "Buffer closed. Now showing buffer {}",
            self.active + 1
        ));
    }

    /// One entry per buffer: number, `%` for the active one, `+` when
    /// modified, then the name.
    pub fn buffer_list(&self) -> Vec<String> {
        self.buffers
            .iter()
            .enumerate()
            .map(|(i, buffer)| {
                let current = if i == self.active { '%' } else { ' ' };
                let modified = if buffer.is_modified() { '+' } else { ' ' };
                format!("{}{current}{modified} {}", i + 1, buffer.display_name())
            })
            .collect()
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new(
            EditorOptions::default(),
            TerminalSize { rows: 24, cols: 80 },
        )
    }
}
