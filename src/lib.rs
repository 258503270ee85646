// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. editor::EditKind)
    clippy::module_name_repetitions
)]

//! # Kestrel
//!
//! A modal, keyboard-driven text editor for terminals.
//!
//! Kestrel edits files with vi-style commands:
//! - Normal, Insert, Visual, Command and Search modes
//! - Repeat counts and multi-key commands (`3dd`, `gg`, `yy`, `p`)
//! - Literal search with wrap-around
//! - Several buffers with `:e`, `:b N`, `:bn`, `:bp`, `:bd`
//! - Line-level syntax highlighting for C-family sources and Markdown
//!
//! ## Architecture
//!
//! Kestrel uses The Elm Architecture (TEA) pattern:
//! - **Model**: editor state (buffers, viewport, mode, pending keys)
//! - **Message**: actions produced from key presses
//! - **Update**: state transitions
//! - **View**: render the viewport and status row to the terminal
//!
//! ## Modules
//!
//! - [`text`]: character/byte position helpers over UTF-8 text
//! - [`editor`]: the text buffer and its edit history
//! - [`highlight`]: line tokenizers and their registry
//! - [`search`]: literal search over a buffer
//! - [`terminal`]: terminal and key-input abstractions
//! - [`ui`]: viewport and status-line drawing
//! - [`app`]: dispatcher, commands and the main loop

pub mod app;
pub mod config;
pub mod editor;
pub mod highlight;
pub mod perf;
pub mod search;
pub mod terminal;
pub mod text;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Mode, Model};
    pub use crate::editor::{Position, TextBuffer};
    pub use crate::terminal::{InputSource, Key, Terminal};
    pub use crate::ui::viewport::Viewport;
}
