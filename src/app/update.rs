use crate::app::commands;
use crate::app::model::{Mode, Model, Redraw};
use crate::search::{self, SearchDirection};
use crate::terminal::TerminalSize;

/// Largest repeat count a numeric prefix can reach.
pub const MAX_REPEAT: usize = 9_999;

/// Every action the editor can take in response to input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Counts and sequences
    /// Append a digit to the repeat count
    CountDigit(u32),
    /// Feed a key into the pending multi-key sequence
    SequenceKey(char),
    /// Drop any pending sequence and count
    CancelPending,

    // Motion
    /// Move one character left
    MoveLeft,
    /// Move one character right
    MoveRight,
    /// Move one line up
    MoveUp,
    /// Move one line down
    MoveDown,
    /// Jump to the start of the next word
    WordForward,
    /// Jump to the start of the previous word
    WordBackward,
    /// Jump to column 0
    LineStart,
    /// Jump past the last character of the line
    LineEnd,
    /// Jump to the last line
    BufferEnd,
    /// Move up one screen
    PageUp,
    /// Move down one screen
    PageDown,

    // Mode changes
    /// Insert before the cursor
    EnterInsert,
    /// Insert after the cursor
    Append,
    /// Open a line below and insert there
    OpenBelow,
    /// Open a line above and insert there
    OpenAbove,
    /// Enter character-wise visual mode
    EnterVisual,
    /// Enter line-wise visual mode
    EnterVisualLine,
    /// Start typing an ex command
    EnterCommand,
    /// Start typing a search pattern
    StartSearch(SearchDirection),
    /// Return to normal mode
    ExitToNormal,

    // Editing
    /// Delete the character under the cursor
    DeleteChar,
    /// Step history back
    Undo,
    /// Step history forward
    Redo,
    /// Insert a character (insert mode)
    InsertChar(char),
    /// Insert a tab's worth of spaces
    InsertTab,
    /// Delete before the cursor
    Backspace,
    /// Delete under the cursor (insert mode)
    DeleteForward,
    /// Break the line at the cursor
    SplitLine,

    // Search
    /// Repeat the last search forward
    SearchNext,
    /// Repeat the last search backward
    SearchPrevious,
    /// Search for the word under the cursor
    SearchWord(SearchDirection),

    // Command row
    /// Type a character on the command row
    PromptInput(char),
    /// Erase one character on the command row
    PromptBackspace,
    /// Run the command or search
    PromptSubmit,
    /// Abandon the command row
    PromptCancel,

    // System
    /// Terminal resized
    Resize(TerminalSize),
}

impl Message {
    /// Plain cursor motion, which in insert mode needs no full redraw.
    const fn is_motion(&self) -> bool {
        matches!(
            self,
            Self::MoveLeft
                | Self::MoveRight
                | Self::MoveUp
                | Self::MoveDown
                | Self::LineStart
                | Self::LineEnd
        )
    }
}

/// Apply `msg` to `model`.
pub fn update(mut model: Model, msg: Message) -> Model {
    if !matches!(msg, Message::Resize(_)) {
        model.status = None;
    }
    let scroll_before = (model.viewport.top_line(), model.viewport.left_column());
    let cursor_only = model.mode == Mode::Insert && msg.is_motion();
    let keeps_count = matches!(
        msg,
        Message::CountDigit(_) | Message::SequenceKey(_) | Message::Resize(_)
    );

    match msg {
        Message::CountDigit(digit) => {
            model.repeat_count = model
                .repeat_count
                .saturating_mul(10)
                .saturating_add(digit as usize)
                .min(MAX_REPEAT);
        }
        Message::SequenceKey(ch) => handle_sequence(&mut model, ch),
        Message::CancelPending => model.clear_pending(),

        Message::MoveLeft => model.buffer_mut().move_cursor_by(0, -1),
        Message::MoveRight => model.buffer_mut().move_cursor_by(0, 1),
        Message::MoveUp => model.buffer_mut().move_cursor_by(-1, 0),
        Message::MoveDown => model.buffer_mut().move_cursor_by(1, 0),
        Message::WordForward => {
            let target = model.buffer().next_word_boundary();
            model.buffer_mut().set_cursor(target);
        }
        Message::WordBackward => {
            let target = model.buffer().previous_word_boundary();
            model.buffer_mut().set_cursor(target);
        }
        Message::LineStart => {
            let target = model.buffer().line_start();
            model.buffer_mut().set_cursor(target);
        }
        Message::LineEnd => {
            let target = model.buffer().line_end();
            model.buffer_mut().set_cursor(target);
        }
        Message::BufferEnd => {
            let target = model.buffer().buffer_end();
            model.buffer_mut().set_cursor(target);
        }
        Message::PageUp => {
            let page = page_size(&model);
            model.buffer_mut().move_cursor_by(-page, 0);
        }
        Message::PageDown => {
            let page = page_size(&model);
            model.buffer_mut().move_cursor_by(page, 0);
        }

        Message::EnterInsert => model.set_mode(Mode::Insert),
        Message::Append => {
            model.buffer_mut().move_cursor_by(0, 1);
            model.set_mode(Mode::Insert);
        }
        Message::OpenBelow => {
            model.buffer_mut().insert_line_below();
            model.set_mode(Mode::Insert);
        }
        Message::OpenAbove => {
            model.buffer_mut().insert_line_above();
            model.set_mode(Mode::Insert);
        }
        Message::EnterVisual => model.set_mode(Mode::Visual),
        Message::EnterVisualLine => model.set_mode(Mode::VisualLine),
        Message::EnterCommand => {
            model.command_line.clear();
            model.set_mode(Mode::Command);
        }
        Message::StartSearch(direction) => {
            model.search.start(direction);
            model.set_mode(Mode::Search);
        }
        Message::ExitToNormal => model.set_mode(Mode::Normal),

        Message::DeleteChar => model.buffer_mut().delete_char_forward(),
        Message::Undo => {
            if !model.buffer_mut().undo() && !model.buffer().is_read_only() {
                model.set_status("Already at oldest change");
            }
        }
        Message::Redo => {
            if !model.buffer_mut().redo() && !model.buffer().is_read_only() {
                model.set_status("Already at newest change");
            }
        }
        Message::InsertChar(ch) => model.buffer_mut().insert_char(ch),
        Message::InsertTab => {
            let spaces = " ".repeat(model.options.tab_width);
            model.buffer_mut().insert_text(&spaces);
        }
        Message::Backspace => model.buffer_mut().delete_char_backward(),
        Message::DeleteForward => model.buffer_mut().delete_char_forward(),
        Message::SplitLine => model.buffer_mut().split_at_cursor(),

        Message::SearchNext => repeat_search(&mut model, SearchDirection::Forward),
        Message::SearchPrevious => repeat_search(&mut model, SearchDirection::Backward),
        Message::SearchWord(direction) => match model.buffer().word_at_cursor() {
            Some(word) => {
                model.search.last_pattern = Some(word.clone());
                run_search(&mut model, &word, direction);
            }
            None => model.set_error("No word under cursor"),
        },

        Message::PromptInput(ch) => match model.mode {
            Mode::Search => model.search.push(ch),
            _ => model.command_line.push(ch),
        },
        Message::PromptBackspace => match model.mode {
            Mode::Search => model.search.backspace(),
            _ => {
                model.command_line.pop();
            }
        },
        Message::PromptSubmit => submit_prompt(&mut model),
        Message::PromptCancel => {
            model.command_line.clear();
            model.search.input.clear();
            model.set_mode(Mode::Normal);
        }

        Message::Resize(size) => model.resize(size),
    }

    if !keeps_count {
        model.repeat_count = 0;
    }

    let active = model.active;
    model.viewport.ensure_cursor_visible(&model.buffers[active]);
    let scrolled = scroll_before != (model.viewport.top_line(), model.viewport.left_column());
    if cursor_only && !scrolled {
        model.request_redraw(Redraw::Cursor);
    } else {
        model.request_redraw(Redraw::Full);
    }
    model
}

/// Lines moved by a page command: the view height less two lines of overlap.
fn page_size(model: &Model) -> isize {
    let rows = usize::from(model.viewport.rows()).saturating_sub(2).max(1);
    isize::try_from(rows).unwrap_or(isize::MAX)
}

/// Multi-key commands: `gg`, `dd`, `yy`, `p`, `P`.
fn handle_sequence(model: &mut Model, ch: char) {
    model.sequence.push(ch);
    let count = model.repeat_count.max(1);

    match model.sequence.as_str() {
        "g" | "d" | "y" => return,
        "gg" => {
            let start = model.buffer().buffer_start();
            model.buffer_mut().set_cursor(start);
        }
        "dd" => {
            let buffer = model.buffer_mut();
            let remaining = buffer.line_count() - buffer.cursor().line;
            for _ in 0..count.min(remaining) {
                buffer.delete_line();
            }
        }
        "yy" => {
            model.yank = model.buffer().yank_current_line();
            model.yank_line_mode = true;
            model.set_status("Yanked line");
        }
        "p" | "P" if model.yank_line_mode => {
            let text = model.yank.clone();
            let after = ch == 'p';
            for _ in 0..count {
                if after {
                    model.buffer_mut().paste_after(&text);
                } else {
                    model.buffer_mut().paste_before(&text);
                }
            }
        }
        _ => {}
    }
    model.clear_pending();
}

fn submit_prompt(model: &mut Model) {
    match model.mode {
        Mode::Search => {
            let direction = model.search.direction;
            model.set_mode(Mode::Normal);
            match model.search.commit() {
                Some(pattern) => run_search(model, &pattern, direction),
                None => model.set_error("No previous search pattern"),
            }
        }
        _ => {
            let line = std::mem::take(&mut model.command_line);
            model.set_mode(Mode::Normal);
            commands::execute(model, &line);
        }
    }
}

fn repeat_search(model: &mut Model, direction: SearchDirection) {
    match model.search.last_pattern.clone() {
        Some(pattern) => run_search(model, &pattern, direction),
        None => model.set_error("No previous search pattern"),
    }
}

/// Move to the next match of `pattern`, wrapping around the buffer.
fn run_search(model: &mut Model, pattern: &str, direction: SearchDirection) {
    let from = model.buffer().cursor();
    match search::find(model.buffer(), pattern, from, direction, true) {
        Some(hit) => {
            model.buffer_mut().set_cursor(hit.position);
            if hit.wrapped {
                model.set_status(match direction {
                    SearchDirection::Forward => "search hit BOTTOM, continuing at TOP",
                    SearchDirection::Backward => "search hit TOP, continuing at BOTTOM",
                });
            }
        }
        None => model.set_error(format!("Pattern not found: {pattern}")),
    }
}
