//! Editor state and main event loop.
//!
//! This module follows The Elm Architecture (TEA):
//! - [`Model`]: the complete editor state
//! - [`Message`]: every action a key can trigger
//! - [`update`]: state transition for one message
//! - [`App::run`]: main event loop with rendering

pub mod commands;
mod event_loop;
mod input;
mod model;
mod update;

pub use input::handle_key;
pub use model::{Mode, Model, Redraw, StatusLevel, StatusMessage};
pub use update::{Message, update};

use std::path::PathBuf;

use crate::config::EditorOptions;
use crate::terminal::TerminalSize;

/// Entry point that owns the startup files and options.
#[derive(Debug, Clone, Default)]
pub struct App {
    files: Vec<PathBuf>,
    options: EditorOptions,
}

impl App {
    /// Create an editor that opens `files` on startup.
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self {
            files,
            options: EditorOptions::default(),
        }
    }

    /// Set display and editing options.
    pub const fn with_options(mut self, options: EditorOptions) -> Self {
        self.options = options;
        self
    }

    /// The initial model for a terminal of `size`: startup files open, the
    /// first one shown.
    pub fn build_model(&self, size: TerminalSize) -> Model {
        let mut model = Model::new(self.options, size);
        for path in &self.files {
            model.open_file(path);
        }
        if model.buffers.len() > 1 {
            let opened = model.buffers.len();
            model.switch_buffer(0);
            model.set_status(format!("{opened} buffers loaded"));
        }
        model
    }
}
