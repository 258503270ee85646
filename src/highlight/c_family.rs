use std::collections::HashSet;

use super::{Highlighted, SyntaxToken, Tokenizer};
use crate::terminal::Color;

const KEYWORDS: &[&str] = &[
    // C
    "auto", "break", "case", "char", "const", "continue", "default", "do", "double", "else",
    "enum", "extern", "float", "for", "goto", "if", "int", "long", "register", "return", "short",
    "signed", "sizeof", "static", "struct", "switch", "typedef", "union", "unsigned", "void",
    "volatile", "while",
    // C++
    "class", "namespace", "template", "typename", "public", "private", "protected", "virtual",
    "override", "final", "explicit", "inline", "friend", "operator", "new", "delete", "this",
    "try", "catch", "throw", "using", "constexpr", "decltype", "nullptr", "static_assert",
    "thread_local", "alignas", "alignof", "noexcept", "consteval", "constinit", "concept",
    "requires",
];

const TYPES: &[&str] = &[
    "bool", "true", "false", "nullptr_t", "size_t", "ptrdiff_t", "wchar_t", "char8_t",
    "char16_t", "char32_t", "int8_t", "int16_t", "int32_t", "int64_t", "uint8_t", "uint16_t",
    "uint32_t", "uint64_t", "intptr_t", "uintptr_t", "string", "vector", "map", "set", "list",
    "array", "unique_ptr", "shared_ptr",
];

const TWO_CHAR_OPERATORS: &[[char; 2]] = &[
    ['+', '+'],
    ['-', '-'],
    ['=', '='],
    ['!', '='],
    ['<', '='],
    ['>', '='],
    ['&', '&'],
    ['|', '|'],
    ['<', '<'],
    ['>', '>'],
    ['+', '='],
    ['-', '='],
    ['*', '='],
    ['/', '='],
    ['%', '='],
    [':', ':'],
    ['-', '>'],
];

// Plain assignment and statement punctuation are left uncolored.
const ONE_CHAR_OPERATORS: &[char] = &[
    '+', '-', '*', '/', '%', '<', '>', '!', '&', '|', '^', '~', '?', ':',
];

const COMMENT: Color = Color::Green;
const PREPROCESSOR: Color = Color::Magenta;
const LITERAL: Color = Color::Yellow;
const NUMBER: Color = Color::Cyan;
const KEYWORD: Color = Color::Blue;
const TYPE: Color = Color::BrightCyan;
const OPERATOR: Color = Color::Red;

/// Tokenizer for C and C++ sources.
///
/// Block comments are recognized only when they open and close on the same
/// line; an unclosed `/*` colors the rest of its line.
#[derive(Debug)]
pub struct CFamilyTokenizer {
    keywords: HashSet<&'static str>,
    types: HashSet<&'static str>,
}

impl CFamilyTokenizer {
    pub fn new() -> Self {
        Self {
            keywords: KEYWORDS.iter().copied().collect(),
            types: TYPES.iter().copied().collect(),
        }
    }

    fn classify(&self, word: &str) -> Option<Color> {
        if self.keywords.contains(word) {
            Some(KEYWORD)
        } else if self.types.contains(word) {
            Some(TYPE)
        } else {
            None
        }
    }
}

impl Default for CFamilyTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

const fn is_number_char(c: char) -> bool {
    c.is_ascii_hexdigit() || matches!(c, '.' | 'x' | 'X' | 'l' | 'L' | 'u' | 'U')
}

const fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl Tokenizer for CFamilyTokenizer {
    fn name(&self) -> &str {
        "C/C++"
    }

    fn version(&self) -> &str {
        "1.0.0"
    }

    fn extensions(&self) -> &[&str] {
        &["c", "cpp", "cxx", "cc", "c++", "h", "hpp", "hxx", "hh", "h++"]
    }

    fn matches_content(&self, sample: &str) -> bool {
        sample
            .lines()
            .any(|line| line.trim_start().starts_with("#include"))
    }

    fn tokenize_line<'a>(&self, line: &'a str, _line_number: usize) -> Highlighted<'a> {
        let chars: Vec<char> = line.chars().collect();
        let len = chars.len();
        let mut tokens = Vec::new();
        let mut pos = 0;

        while pos < len {
            let c = chars[pos];
            let next = chars.get(pos + 1).copied();

            if c.is_whitespace() {
                pos += 1;
                continue;
            }

            if c == '/' && next == Some('/') {
                tokens.push(SyntaxToken::new(pos, len - pos, COMMENT));
                break;
            }

            if c == '/' && next == Some('*') {
                let start = pos;
                pos += 2;
                while pos < len {
                    if chars[pos] == '*' && chars.get(pos + 1) == Some(&'/') {
                        pos += 2;
                        break;
                    }
                    pos += 1;
                }
                tokens.push(SyntaxToken::new(start, pos.min(len) - start, COMMENT));
                continue;
            }

            if c == '#' {
                let start = pos;
                while pos < len && !chars[pos].is_whitespace() {
                    pos += 1;
                }
                tokens.push(SyntaxToken::new(start, pos - start, PREPROCESSOR));
                continue;
            }

            if c == '"' {
                let start = pos;
                pos += 1;
                while pos < len {
                    match chars[pos] {
                        '\\' if pos + 1 < len => pos += 2,
                        '"' => {
                            pos += 1;
                            break;
                        }
                        _ => pos += 1,
                    }
                }
                tokens.push(SyntaxToken::new(start, pos.min(len) - start, LITERAL));
                continue;
            }

            if c == '\'' {
                let start = pos;
                pos += 1;
                if pos < len && chars[pos] == '\\' && pos + 1 < len {
                    pos += 2;
                } else if pos < len {
                    pos += 1;
                }
                if pos < len && chars[pos] == '\'' {
                    pos += 1;
                }
                tokens.push(SyntaxToken::new(start, pos - start, LITERAL));
                continue;
            }

            if c.is_ascii_digit() {
                let start = pos;
                while pos < len && is_number_char(chars[pos]) {
                    pos += 1;
                }
                tokens.push(SyntaxToken::new(start, pos - start, NUMBER));
                continue;
            }

            if c.is_ascii_alphabetic() || c == '_' {
                let start = pos;
                while pos < len && is_ident_char(chars[pos]) {
                    pos += 1;
                }
                let word: String = chars[start..pos].iter().collect();
                if let Some(color) = self.classify(&word) {
                    tokens.push(SyntaxToken::new(start, pos - start, color));
                }
                continue;
            }

            if let Some(n) = next
                && TWO_CHAR_OPERATORS.contains(&[c, n])
            {
                tokens.push(SyntaxToken::new(pos, 2, OPERATOR));
                pos += 2;
                continue;
            }

            if ONE_CHAR_OPERATORS.contains(&c) {
                tokens.push(SyntaxToken::new(pos, 1, OPERATOR));
            }
            pos += 1;
        }

        Highlighted::new(line, tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(line: &str) -> Vec<(usize, usize, Color)> {
        CFamilyTokenizer::new()
            .tokenize_line(line, 0)
            .tokens
            .iter()
            .map(|t| (t.start, t.len, t.fg))
            .collect()
    }

    #[test]
    fn test_declaration_with_trailing_comment() {
        assert_eq!(
            spans("int x = 5; // note"),
            vec![(0, 3, KEYWORD), (8, 1, NUMBER), (11, 7, COMMENT)]
        );
    }

    #[test]
    fn test_preprocessor_runs_to_whitespace() {
        assert_eq!(
            spans("#include <vector>"),
            vec![(0, 8, PREPROCESSOR), (9, 1, OPERATOR), (10, 6, TYPE), (16, 1, OPERATOR)]
        );
    }

    #[test]
    fn test_string_with_escaped_quote() {
        assert_eq!(spans(r#""a\"b" x"#), vec![(0, 6, LITERAL)]);
    }

    #[test]
    fn test_unterminated_string_runs_to_end() {
        assert_eq!(spans(r#"s = "open"#), vec![(4, 5, LITERAL)]);
    }

    #[test]
    fn test_char_literals() {
        assert_eq!(spans(r"'a' '\n'"), vec![(0, 3, LITERAL), (4, 4, LITERAL)]);
    }

    #[test]
    fn test_single_line_block_comment() {
        assert_eq!(
            spans("a /* c */ return"),
            vec![(2, 7, COMMENT), (10, 6, KEYWORD)]
        );
    }

    #[test]
    fn test_unclosed_block_comment_runs_to_end() {
        assert_eq!(spans("x /* open"), vec![(2, 7, COMMENT)]);
    }

    #[test]
    fn test_numbers_with_hex_and_suffixes() {
        assert_eq!(
            spans("0xFFul 3.14f"),
            vec![(0, 6, NUMBER), (7, 5, NUMBER)]
        );
    }

    #[test]
    fn test_two_char_operators_take_precedence() {
        assert_eq!(
            spans("a->b == c::d"),
            vec![(1, 2, OPERATOR), (5, 2, OPERATOR), (9, 2, OPERATOR)]
        );
    }

    #[test]
    fn test_types_and_keywords() {
        assert_eq!(
            spans("static size_t count;"),
            vec![(0, 6, KEYWORD), (7, 6, TYPE)]
        );
    }

    #[test]
    fn test_positions_are_characters() {
        assert_eq!(spans("é int"), vec![(2, 3, KEYWORD)]);
    }

    #[test]
    fn test_empty_line_has_no_tokens() {
        assert!(spans("").is_empty());
    }
}
