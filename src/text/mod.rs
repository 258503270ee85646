//! Character/byte offset conversions for UTF-8 encoded lines.
//!
//! Every column value in the editor is a character index. These helpers
//! translate between those indices and byte offsets in the underlying
//! encoding. An invalid lead byte (a stray continuation byte, or `0xF8`
//! and above) counts as a one-byte character, so indexing never skips or
//! panics on malformed input. Callers that need strict validation use
//! [`is_valid`] or [`is_valid_char`].
//!
//! # Example
//!
//! ```
//! use kestrel::text;
//!
//! let line = "café au lait";
//! assert_eq!(text::char_count(line), 12);
//! assert_eq!(text::char_to_byte(line, 4), 5);
//! assert_eq!(text::substr(line, 0, Some(4)), "café");
//! ```

/// Byte length of the character whose lead byte sits at `pos`.
///
/// Returns 0 when `pos` is past the end. Truncated sequences report only
/// the bytes that remain.
pub fn char_byte_len<T: AsRef<[u8]> + ?Sized>(text: &T, pos: usize) -> usize {
    let bytes = text.as_ref();
    let Some(&lead) = bytes.get(pos) else {
        return 0;
    };
    let width = match lead {
        0x00..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 1,
    };
    width.min(bytes.len() - pos)
}

/// Number of characters in `text`.
pub fn char_count<T: AsRef<[u8]> + ?Sized>(text: &T) -> usize {
    let bytes = text.as_ref();
    let mut pos = 0;
    let mut count = 0;
    while pos < bytes.len() {
        pos += char_byte_len(bytes, pos);
        count += 1;
    }
    count
}

/// Byte offset of the boundary following the character at `pos`.
pub fn next_boundary<T: AsRef<[u8]> + ?Sized>(text: &T, pos: usize) -> usize {
    let bytes = text.as_ref();
    if pos >= bytes.len() {
        return bytes.len();
    }
    pos + char_byte_len(bytes, pos)
}

/// Byte offset of the character boundary preceding `pos`.
pub fn prev_boundary<T: AsRef<[u8]> + ?Sized>(text: &T, pos: usize) -> usize {
    let bytes = text.as_ref();
    let mut pos = pos.min(bytes.len());
    if pos == 0 {
        return 0;
    }
    pos -= 1;
    while pos > 0 && is_continuation(bytes[pos]) {
        pos -= 1;
    }
    pos
}

/// Byte offset of character index `index`, clamped to the text length.
pub fn char_to_byte<T: AsRef<[u8]> + ?Sized>(text: &T, index: usize) -> usize {
    let bytes = text.as_ref();
    let mut pos = 0;
    let mut current = 0;
    while pos < bytes.len() && current < index {
        pos += char_byte_len(bytes, pos);
        current += 1;
    }
    pos
}

/// Character index of the character containing byte offset `pos`.
///
/// Offsets inside a multi-byte sequence round up to the next character.
pub fn byte_to_char<T: AsRef<[u8]> + ?Sized>(text: &T, pos: usize) -> usize {
    let bytes = text.as_ref();
    let mut current = 0;
    let mut index = 0;
    while current < pos && current < bytes.len() {
        current += char_byte_len(bytes, current);
        index += 1;
    }
    index
}

/// The character at character index `index`, if any.
pub fn char_at(text: &str, index: usize) -> Option<&str> {
    let start = char_to_byte(text, index);
    if start >= text.len() {
        return None;
    }
    let end = start + char_byte_len(text, start);
    text.get(start..end)
}

/// Substring by character range. `len` of `None` takes the rest of the line.
pub fn substr(text: &str, start: usize, len: Option<usize>) -> &str {
    let from = char_to_byte(text, start);
    if from >= text.len() {
        return "";
    }
    let to = match len {
        Some(len) => from + char_to_byte(&text[from..], len),
        None => text.len(),
    };
    text.get(from..to).unwrap_or("")
}

/// Strict check that every sequence in `bytes` is well formed.
pub fn is_valid(bytes: &[u8]) -> bool {
    let mut pos = 0;
    while pos < bytes.len() {
        if !is_valid_char(bytes, pos) {
            return false;
        }
        pos += char_byte_len(bytes, pos);
    }
    true
}

/// Strict check of the single sequence starting at `pos`.
pub fn is_valid_char(bytes: &[u8], pos: usize) -> bool {
    let Some(&lead) = bytes.get(pos) else {
        return false;
    };
    let width = match lead {
        0x00..=0x7F => return true,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => return false,
    };
    pos + width <= bytes.len() && bytes[pos + 1..pos + width].iter().all(|&b| is_continuation(b))
}

const fn is_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}
