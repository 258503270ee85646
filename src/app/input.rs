use crate::app::{Message, Mode, Model};
use crate::search::SearchDirection;
use crate::terminal::{Key, TerminalSize};

/// Keys that start (or, for `p`/`P`, form) a sequence command.
const SEQUENCE_KEYS: [char; 5] = ['g', 'd', 'y', 'p', 'P'];

/// Translate a key press into a message for the current mode.
pub fn handle_key(key: Key, model: &Model) -> Option<Message> {
    if let Key::Resize(cols, rows) = key {
        return Some(Message::Resize(TerminalSize { rows, cols }));
    }
    match model.mode {
        Mode::Normal => handle_normal_key(key, model),
        Mode::Visual | Mode::VisualLine => match key {
            Key::Escape => Some(Message::ExitToNormal),
            _ => handle_normal_key(key, model),
        },
        Mode::Insert => handle_insert_key(key),
        Mode::Command | Mode::Search => handle_prompt_key(key),
    }
}

fn handle_normal_key(key: Key, model: &Model) -> Option<Message> {
    let ch = match key {
        Key::Char(ch) => ch,
        Key::Escape => return Some(Message::CancelPending),
        Key::Ctrl('r') => return Some(Message::Redo),
        Key::Ctrl('f') | Key::PageDown => return Some(Message::PageDown),
        Key::Ctrl('b') | Key::PageUp => return Some(Message::PageUp),
        _ => return navigation_key(key),
    };

    if let Some(digit) = ch.to_digit(10)
        && (model.repeat_count > 0 || digit != 0)
    {
        return Some(Message::CountDigit(digit));
    }
    if !model.sequence.is_empty() || SEQUENCE_KEYS.contains(&ch) {
        return Some(Message::SequenceKey(ch));
    }

    let msg = match ch {
        'h' => Message::MoveLeft,
        'j' => Message::MoveDown,
        'k' => Message::MoveUp,
        'l' => Message::MoveRight,
        'w' => Message::WordForward,
        'b' => Message::WordBackward,
        '0' => Message::LineStart,
        '$' => Message::LineEnd,
        'G' => Message::BufferEnd,
        'i' => Message::EnterInsert,
        'a' => Message::Append,
        'o' => Message::OpenBelow,
        'O' => Message::OpenAbove,
        'x' => Message::DeleteChar,
        'u' => Message::Undo,
        ':' => Message::EnterCommand,
        '/' => Message::StartSearch(SearchDirection::Forward),
        '?' => Message::StartSearch(SearchDirection::Backward),
        'n' => Message::SearchNext,
        'N' => Message::SearchPrevious,
        '*' => Message::SearchWord(SearchDirection::Forward),
        '#' => Message::SearchWord(SearchDirection::Backward),
        'v' => Message::EnterVisual,
        'V' => Message::EnterVisualLine,
        _ => Message::CancelPending,
    };
    Some(msg)
}

fn navigation_key(key: Key) -> Option<Message> {
    match key {
        Key::Left => Some(Message::MoveLeft),
        Key::Right => Some(Message::MoveRight),
        Key::Up => Some(Message::MoveUp),
        Key::Down => Some(Message::MoveDown),
        Key::Home => Some(Message::LineStart),
        Key::End => Some(Message::LineEnd),
        Key::PageUp => Some(Message::PageUp),
        Key::PageDown => Some(Message::PageDown),
        _ => None,
    }
}

fn handle_insert_key(key: Key) -> Option<Message> {
    match key {
        Key::Escape => Some(Message::ExitToNormal),
        Key::Backspace => Some(Message::Backspace),
        Key::Delete => Some(Message::DeleteForward),
        Key::Enter => Some(Message::SplitLine),
        Key::Tab => Some(Message::InsertTab),
        Key::Char(ch) if !ch.is_control() => Some(Message::InsertChar(ch)),
        _ => navigation_key(key),
    }
}

fn handle_prompt_key(key: Key) -> Option<Message> {
    match key {
        Key::Escape => Some(Message::PromptCancel),
        Key::Enter => Some(Message::PromptSubmit),
        Key::Backspace => Some(Message::PromptBackspace),
        Key::Char(ch) if !ch.is_control() => Some(Message::PromptInput(ch)),
        _ => None,
    }
}
