use std::collections::VecDeque;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::{InputSource, Key, TerminalError};

/// Translate a crossterm key event. Releases and unsupported keys map to
/// `None`.
pub fn map_key_event(key: KeyEvent) -> Option<Key> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let mapped = match key.code {
        KeyCode::Char(c) if ctrl => Key::Ctrl(c.to_ascii_lowercase()),
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Escape,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Tab => Key::Tab,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::Insert => Key::Insert,
        KeyCode::F(n) => Key::Function(n),
        _ => return None,
    };
    Some(mapped)
}

/// Keys read from the console through crossterm.
#[derive(Debug, Default)]
pub struct CrosstermInput;

impl CrosstermInput {
    pub const fn new() -> Self {
        Self
    }
}

impl InputSource for CrosstermInput {
    fn get_key(&mut self) -> Result<Key, TerminalError> {
        loop {
            let event = event::read().map_err(|e| TerminalError::Backend(e.to_string()))?;
            match event {
                Event::Key(key) => {
                    if let Some(key) = map_key_event(key) {
                        return Ok(key);
                    }
                }
                Event::Resize(cols, rows) => return Ok(Key::Resize(cols, rows)),
                _ => {}
            }
        }
    }

    fn has_input(&mut self) -> Result<bool, TerminalError> {
        event::poll(Duration::ZERO).map_err(|e| TerminalError::Backend(e.to_string()))
    }
}

/// A fixed queue of keys, for tests and replay.
///
/// [`ScriptedInput::parse`] accepts vi-style key notation: plain characters
/// stand for themselves and `<...>` names a special key, e.g.
/// `"ihello<Esc>:wq<CR>"`. Recognized names are `Esc`, `CR`/`Enter`, `BS`,
/// `Del`, `Tab`, `Up`, `Down`, `Left`, `Right`, `Home`, `End`, `PageUp`,
/// `PageDown`, `lt` (a literal `<`) and `C-x` for Ctrl+letter. Anything
/// else between angle brackets is taken literally.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    keys: VecDeque<Key>,
}

impl ScriptedInput {
    pub fn new(keys: impl IntoIterator<Item = Key>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    pub fn parse(script: &str) -> Self {
        let mut keys = VecDeque::new();
        let mut rest = script;
        while let Some(ch) = rest.chars().next() {
            if ch == '<'
                && let Some(end) = rest.find('>')
                && let Some(key) = named_key(&rest[1..end])
            {
                keys.push_back(key);
                rest = &rest[end + 1..];
                continue;
            }
            keys.push_back(Key::Char(ch));
            rest = &rest[ch.len_utf8()..];
        }
        Self { keys }
    }

    pub fn push(&mut self, key: Key) {
        self.keys.push_back(key);
    }

    pub fn remaining(&self) -> usize {
        self.keys.len()
    }
}

fn named_key(name: &str) -> Option<Key> {
    let key = match name {
        "Esc" => Key::Escape,
        "CR" | "Enter" => Key::Enter,
        "BS" => Key::Backspace,
        "Del" => Key::Delete,
        "Tab" => Key::Tab,
        "Up" => Key::Up,
        "Down" => Key::Down,
        "Left" => Key::Left,
        "Right" => Key::Right,
        "Home" => Key::Home,
        "End" => Key::End,
        "PageUp" => Key::PageUp,
        "PageDown" => Key::PageDown,
        "lt" => Key::Char('<'),
        _ => {
            let letter = name.strip_prefix("C-")?;
            let mut chars = letter.chars();
            let (Some(c), None) = (chars.next(), chars.next()) else {
                return None;
            };
            Key::Ctrl(c.to_ascii_lowercase())
        }
    };
    Some(key)
}

impl InputSource for ScriptedInput {
    fn get_key(&mut self) -> Result<Key, TerminalError> {
        self.keys.pop_front().ok_or(TerminalError::InputClosed)
    }

    fn has_input(&mut self) -> Result<bool, TerminalError> {
        Ok(!self.keys.is_empty())
    }
}
