//! Ex commands typed after `:`.

use std::path::{Path, PathBuf};

use crate::app::Model;

const HELP_TEXT: &str = "hjkl move | i a o O insert | x dd yy p P edit | u ^R undo/redo | \
                         /? n N * # search | :w :q :e :b N :bn :bp :bd :ls";

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit { force: bool },
    Write(Option<PathBuf>),
    WriteQuit,
    /// `:e` / `:e!`, with or without a file name.
    Edit { path: Option<PathBuf>, force: bool },
    ListBuffers,
    NextBuffer,
    PreviousBuffer,
    DeleteBuffer { force: bool },
    /// `:b N`, with the argument as typed.
    Buffer(String),
    Help,
    Unknown(String),
}

/// Parse a command line. Blank input is not a command.
pub fn parse(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (name, arg) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, Some(rest.trim()).filter(|s| !s.is_empty())),
        None => (line, None),
    };

    let command = match (name, arg) {
        ("q" | "quit", None) => Command::Quit { force: false },
        ("q!" | "quit!", None) => Command::Quit { force: true },
        ("w" | "write", arg) => Command::Write(arg.map(PathBuf::from)),
        ("wq" | "x", None) => Command::WriteQuit,
        ("e" | "edit", arg) => Command::Edit {
            path: arg.map(PathBuf::from),
            force: false,
        },
        ("e!" | "edit!", arg) => Command::Edit {
            path: arg.map(PathBuf::from),
            force: true,
        },
        ("ls" | "buffers", None) => Command::ListBuffers,
        ("bn" | "bnext", None) => Command::NextBuffer,
        ("bp" | "bprev", None) => Command::PreviousBuffer,
        ("bd" | "bdelete", None) => Command::DeleteBuffer { force: false },
        ("bd!" | "bdelete!", None) => Command::DeleteBuffer { force: true },
        ("b", Some(arg)) => Command::Buffer(arg.to_string()),
        ("h" | "help", None) => Command::Help,
        _ => Command::Unknown(line.to_string()),
    };
    Some(command)
}

/// Parse and run `line` against `model`.
pub fn execute(model: &mut Model, line: &str) {
    let Some(command) = parse(line) else {
        return;
    };
    tracing::debug!(?command, "ex command");
    match command {
        Command::Quit { force } => quit(model, force),
        Command::Write(path) => {
            write(model, path.as_deref());
        }
        Command::WriteQuit => {
            if write(model, None) {
                model.should_quit = true;
            }
        }
        Command::Edit { path: None, force } => {
            if force {
                reload(model);
            } else {
                model.set_error("No filename specified");
            }
        }
        Command::Edit {
            path: Some(path),
            force,
        } => edit(model, &path, force),
        Command::ListBuffers => {
            let listing = model.buffer_list().join(" | ");
            model.set_status(listing);
        }
        Command::NextBuffer => model.next_buffer(),
        Command::PreviousBuffer => model.previous_buffer(),
        Command::DeleteBuffer { force } => model.close_buffer(force),
        Command::Buffer(arg) => switch_to(model, &arg),
        Command::Help => model.set_status(HELP_TEXT),
        Command::Unknown(line) => model.set_error(format!("Unknown command: {line}")),
    }
}

fn quit(model: &mut Model, force: bool) {
    if !force && model.buffer().is_modified() {
        model.set_error("No write since last change (use :q! to override)");
        return;
    }
    model.should_quit = true;
}

/// Save the active buffer, reporting the outcome. Returns whether the
/// write succeeded.
fn write(model: &mut Model, path: Option<&Path>) -> bool {
    match model.buffer_mut().save(path) {
        Ok(saved) => {
            model.set_status(format!("Saved: {}", saved.display()));
            true
        }
        Err(err) => {
            tracing::warn!(error = %err, "save failed");
            model.set_error(format!("Could not save file: {err}"));
            false
        }
    }
}

fn reload(model: &mut Model) {
    if model.buffer().path().is_none() {
        model.set_error("No filename to reload");
        return;
    }
    let result = model.buffer_mut().reload();
    match result {
        Ok(()) => {
            let buffer = &model.buffers[model.active];
            model.viewport.set_buffer(buffer);
            let name = buffer.display_name();
            model.bind_tokenizer();
            model.set_status(format!("Reloaded: {name}"));
        }
        Err(err) => model.set_error(format!("Could not reload file: {err}")),
    }
}

fn edit(model: &mut Model, path: &Path, force: bool) {
    if !force && model.buffer().is_modified() {
        model.set_error("No write since last change (use :e! to override)");
        return;
    }
    model.open_file(path);
}

fn switch_to(model: &mut Model, arg: &str) {
    let Ok(number) = arg.parse::<usize>() else {
        model.set_error(format!("Invalid buffer number: {arg}"));
        return;
    };
    let switched = number
        .checked_sub(1)
        .is_some_and(|index| model.switch_buffer(index));
    if !switched {
        model.set_error(format!("No buffer {number}"));
    }
}
