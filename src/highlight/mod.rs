//! Line-scoped syntax tokenizers.
//!
//! A [`Tokenizer`] turns one line of text into colored [`SyntaxToken`]
//! spans. Tokenizers keep no state between lines. The
//! [`TokenizerRegistry`] picks a tokenizer for a file by extension, falling
//! back to each tokenizer's content check.

mod c_family;
mod markdown;

pub use c_family::CFamilyTokenizer;
pub use markdown::MarkdownTokenizer;

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

use crate::terminal::{Color, TextStyle};

/// A highlighted span of one line, in character units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntaxToken {
    pub start: usize,
    pub len: usize,
    pub fg: Color,
    pub bg: Color,
    pub bold: bool,
    pub italic: bool,
}

impl SyntaxToken {
    pub const fn new(start: usize, len: usize, fg: Color) -> Self {
        Self {
            start,
            len,
            fg,
            bg: Color::Default,
            bold: false,
            italic: false,
        }
    }

    #[must_use]
    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    #[must_use]
    pub const fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub const fn end(&self) -> usize {
        self.start + self.len
    }

    pub const fn style(&self) -> TextStyle {
        TextStyle {
            fg: self.fg,
            bg: self.bg,
            bold: self.bold,
            italic: self.italic,
        }
    }
}

/// Output of [`Tokenizer::tokenize_line`]: the spans in emission order and
/// the text they index into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlighted<'a> {
    pub tokens: Vec<SyntaxToken>,
    pub processed: Cow<'a, str>,
}

impl<'a> Highlighted<'a> {
    pub const fn new(line: &'a str, tokens: Vec<SyntaxToken>) -> Self {
        Self {
            tokens,
            processed: Cow::Borrowed(line),
        }
    }
}

/// A line tokenizer for one family of file types.
pub trait Tokenizer {
    /// Display name, shown in the status line when a file is opened.
    fn name(&self) -> &str;

    fn version(&self) -> &str;

    /// Lowercase extensions this tokenizer handles, without the dot.
    fn extensions(&self) -> &[&str];

    /// Content check used when no extension matches.
    fn matches_content(&self, _sample: &str) -> bool {
        false
    }

    /// Whether this tokenizer applies to `filename`, optionally looking at
    /// a sample of its content.
    fn can_tokenize(&self, filename: &str, sample: Option<&str>) -> bool {
        extension_of(filename).is_some_and(|ext| self.extensions().contains(&ext.as_str()))
            || sample.is_some_and(|s| self.matches_content(s))
    }

    /// Split a line into colored spans. Spans from different passes may
    /// overlap; later spans take precedence when drawn.
    fn tokenize_line<'a>(&self, line: &'a str, line_number: usize) -> Highlighted<'a>;
}

/// Lowercased extension of `filename`, if it has one.
pub fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
}

/// The set of available tokenizers and the extension lookup table.
pub struct TokenizerRegistry {
    tokenizers: Vec<Rc<dyn Tokenizer>>,
    by_extension: HashMap<String, usize>,
}

impl TokenizerRegistry {
    /// A registry holding the built-in C-family and Markdown tokenizers.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(Rc::new(CFamilyTokenizer::new()));
        registry.register(Rc::new(MarkdownTokenizer::new()));
        registry
    }

    pub fn empty() -> Self {
        Self {
            tokenizers: Vec::new(),
            by_extension: HashMap::new(),
        }
    }

    /// Add a tokenizer. Extensions already claimed by an earlier
    /// registration stay with that tokenizer.
    pub fn register(&mut self, tokenizer: Rc<dyn Tokenizer>) {
        let index = self.tokenizers.len();
        for ext in tokenizer.extensions() {
            self.by_extension
                .entry(ext.to_lowercase())
                .or_insert(index);
        }
        tracing::debug!(name = tokenizer.name(), "tokenizer registered");
        self.tokenizers.push(tokenizer);
    }

    /// Resolve a tokenizer by extension, then by content.
    pub fn for_file(&self, filename: &str, sample: Option<&str>) -> Option<Rc<dyn Tokenizer>> {
        if let Some(index) = extension_of(filename).and_then(|ext| self.by_extension.get(&ext)) {
            return Some(Rc::clone(&self.tokenizers[*index]));
        }
        let sample = sample?;
        self.tokenizers
            .iter()
            .find(|t| t.matches_content(sample))
            .map(Rc::clone)
    }

    pub fn tokenizers(&self) -> impl Iterator<Item = &dyn Tokenizer> {
        self.tokenizers.iter().map(|t| &**t)
    }

    pub fn len(&self) -> usize {
        self.tokenizers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokenizers.is_empty()
    }
}

impl Default for TokenizerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TokenizerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.tokenizers.iter().map(|t| t.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ShoutTokenizer;

    impl Tokenizer for ShoutTokenizer {
        fn name(&self) -> &str {
            "Shout"
        }

        fn version(&self) -> &str {
            "0.1.0"
        }

        fn extensions(&self) -> &[&str] {
            &["shout", "md"]
        }

        fn tokenize_line<'a>(&self, line: &'a str, _line_number: usize) -> Highlighted<'a> {
            Highlighted {
                tokens: vec![SyntaxToken::new(0, line.chars().count(), Color::Red)],
                processed: Cow::Owned(line.to_uppercase()),
            }
        }
    }

    #[test]
    fn test_lookup_by_extension_is_case_insensitive() {
        let registry = TokenizerRegistry::new();
        let c = registry.for_file("src/Main.CPP", None).unwrap();
        assert_eq!(c.name(), "C/C++");
        let md = registry.for_file("README.Markdown", None).unwrap();
        assert_eq!(md.name(), "Markdown");
    }

    #[test]
    fn test_unknown_extension_without_sample_is_none() {
        let registry = TokenizerRegistry::new();
        assert!(registry.for_file("notes.txt", None).is_none());
        assert!(registry.for_file("Makefile", None).is_none());
    }

    #[test]
    fn test_content_fallback() {
        let registry = TokenizerRegistry::new();
        let c = registry.for_file("config", Some("#include <stdio.h>\n")).unwrap();
        assert_eq!(c.name(), "C/C++");
        let md = registry.for_file("NOTES", Some("\n# Title\nbody")).unwrap();
        assert_eq!(md.name(), "Markdown");
        assert!(registry.for_file("data", Some("plain words")).is_none());
    }

    #[test]
    fn test_first_registration_wins_per_extension() {
        let mut registry = TokenizerRegistry::new();
        registry.register(Rc::new(ShoutTokenizer));
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.for_file("a.md", None).unwrap().name(), "Markdown");
        assert_eq!(registry.for_file("a.shout", None).unwrap().name(), "Shout");
    }

    #[test]
    fn test_can_tokenize_uses_extension_and_content() {
        let c = CFamilyTokenizer::new();
        assert!(c.can_tokenize("x.h", None));
        assert!(!c.can_tokenize("x.rs", None));
        assert!(c.can_tokenize("x", Some("#include \"a.h\"")));
    }

    #[test]
    fn test_processed_text_may_differ() {
        let out = ShoutTokenizer.tokenize_line("hey", 0);
        assert_eq!(out.processed, "HEY");
        assert_eq!(out.tokens[0].end(), 3);
    }
}
