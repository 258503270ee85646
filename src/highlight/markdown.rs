use super::{Highlighted, SyntaxToken, Tokenizer};
use crate::terminal::Color;

/// Tokenizer for Markdown documents.
///
/// Each line goes through independent passes in a fixed order: headers,
/// blockquotes, list markers, code, emphasis, links. Passes do not look at
/// each other's output, so spans can overlap.
#[derive(Debug, Default)]
pub struct MarkdownTokenizer;

impl MarkdownTokenizer {
    pub const fn new() -> Self {
        Self
    }
}

fn leading_blanks(chars: &[char]) -> usize {
    chars.iter().take_while(|c| matches!(c, ' ' | '\t')).count()
}

fn find_char(chars: &[char], target: char, from: usize) -> Option<usize> {
    chars
        .get(from..)?
        .iter()
        .position(|&c| c == target)
        .map(|offset| from + offset)
}

fn starts_with_at(chars: &[char], pos: usize, prefix: &str) -> bool {
    let mut i = pos;
    for expected in prefix.chars() {
        if chars.get(i) != Some(&expected) {
            return false;
        }
        i += 1;
    }
    true
}

fn headers(chars: &[char], tokens: &mut Vec<SyntaxToken>) {
    let hashes = chars.iter().take_while(|&&c| c == '#').count();
    if hashes == 0 || hashes > 6 {
        return;
    }
    tokens.push(SyntaxToken::new(0, hashes, Color::Magenta).bold());
    let text_start = hashes + chars[hashes..].iter().take_while(|&&c| c == ' ').count();
    if text_start < chars.len() {
        tokens.push(SyntaxToken::new(text_start, chars.len() - text_start, Color::Cyan).bold());
    }
}

fn blockquotes(chars: &[char], tokens: &mut Vec<SyntaxToken>) {
    let pos = leading_blanks(chars);
    if chars.get(pos) != Some(&'>') {
        return;
    }
    tokens.push(SyntaxToken::new(pos, 1, Color::Magenta));
    let mut content = pos + 1;
    if chars.get(content) == Some(&' ') {
        content += 1;
    }
    if content < chars.len() {
        tokens.push(SyntaxToken::new(content, chars.len() - content, Color::BrightCyan));
    }
}

fn lists(chars: &[char], tokens: &mut Vec<SyntaxToken>) {
    let pos = leading_blanks(chars);
    let Some(&first) = chars.get(pos) else {
        return;
    };
    let blank_at = |i: usize| matches!(chars.get(i), Some(' ' | '\t'));
    if matches!(first, '-' | '*' | '+') {
        if blank_at(pos + 1) {
            tokens.push(SyntaxToken::new(pos, 1, Color::Red).bold());
        }
    } else if first.is_ascii_digit() {
        let digits = chars[pos..].iter().take_while(|c| c.is_ascii_digit()).count();
        let dot = pos + digits;
        if chars.get(dot) == Some(&'.') && blank_at(dot + 1) {
            tokens.push(SyntaxToken::new(pos, digits + 1, Color::Red).bold());
        }
    }
}

fn code(chars: &[char], tokens: &mut Vec<SyntaxToken>) {
    if starts_with_at(chars, 0, "```") {
        tokens.push(SyntaxToken::new(0, chars.len(), Color::Green));
        return;
    }
    let mut pos = 0;
    while let Some(open) = find_char(chars, '`', pos) {
        let Some(close) = find_char(chars, '`', open + 1) else {
            break;
        };
        tokens.push(SyntaxToken::new(open, close - open + 1, Color::Green));
        pos = close + 1;
    }
}

fn emphasis(chars: &[char], tokens: &mut Vec<SyntaxToken>) {
    let len = chars.len();
    let mut pos = 0;
    while pos < len {
        let marker = chars[pos];
        if !matches!(marker, '*' | '_') {
            pos += 1;
            continue;
        }
        if chars.get(pos + 1) == Some(&marker) {
            let closing = (pos + 2..len.saturating_sub(1))
                .find(|&i| chars[i] == marker && chars[i + 1] == marker);
            if let Some(close) = closing {
                tokens.push(SyntaxToken::new(pos, close + 2 - pos, Color::Yellow).bold());
                pos = close + 2;
            } else {
                pos += 2;
            }
        } else if let Some(close) = find_char(chars, marker, pos + 1) {
            tokens.push(SyntaxToken::new(pos, close + 1 - pos, Color::BrightYellow).italic());
            pos = close + 1;
        } else {
            pos += 1;
        }
    }
}

fn links(chars: &[char], tokens: &mut Vec<SyntaxToken>) {
    let len = chars.len();
    let mut pos = 0;
    while pos < len {
        if chars[pos] == '[' {
            let link = find_char(chars, ']', pos + 1)
                .filter(|&bracket| chars.get(bracket + 1) == Some(&'('))
                .and_then(|bracket| find_char(chars, ')', bracket + 2).map(|paren| (bracket, paren)));
            if let Some((bracket, paren)) = link {
                tokens.push(SyntaxToken::new(pos, bracket - pos + 1, Color::Blue));
                tokens.push(SyntaxToken::new(bracket + 1, paren - bracket, Color::BrightBlue));
                pos = paren + 1;
                continue;
            }
        } else if starts_with_at(chars, pos, "http://") || starts_with_at(chars, pos, "https://") {
            let start = pos;
            while pos < len && !matches!(chars[pos], ' ' | '\t') {
                pos += 1;
            }
            tokens.push(SyntaxToken::new(start, pos - start, Color::BrightBlue));
            continue;
        }
        pos += 1;
    }
}

impl Tokenizer for MarkdownTokenizer {
    fn name(&self) -> &str {
        "Markdown"
    }

    fn version(&self) -> &str {
        "1.0.0"
    }

    fn extensions(&self) -> &[&str] {
        &["md", "markdown", "mdown", "mkd", "mdx"]
    }

    fn matches_content(&self, sample: &str) -> bool {
        sample
            .lines()
            .find(|line| !line.trim().is_empty())
            .is_some_and(|line| line.starts_with("# "))
    }

    fn tokenize_line<'a>(&self, line: &'a str, _line_number: usize) -> Highlighted<'a> {
        let chars: Vec<char> = line.chars().collect();
        let mut tokens = Vec::new();
        if !chars.is_empty() {
            headers(&chars, &mut tokens);
            blockquotes(&chars, &mut tokens);
            lists(&chars, &mut tokens);
            code(&chars, &mut tokens);
            emphasis(&chars, &mut tokens);
            links(&chars, &mut tokens);
        }
        Highlighted::new(line, tokens)
    }
}
