//! Screen drawing.
//!
//! - [`viewport`]: scroll state, coordinate mapping, and drawing buffer text
//! - [`status`]: the status row at the bottom of the screen

pub mod status;
pub mod viewport;

use crate::app::Model;
use crate::terminal::Terminal;

/// Draw a full frame: buffer text, status row, cursor.
///
/// Nothing reaches the screen until the caller refreshes the terminal.
pub fn render(model: &mut Model, terminal: &mut dyn Terminal) {
    let _scope = crate::perf::scope("ui.render");
    terminal.clear();
    let active = model.active;
    model.viewport.render(&model.buffers[active], terminal);
    status::render_status_line(model, terminal);
    place_cursor(model, terminal);
}

/// Redraw only the status row and the cursor, for updates that left the
/// buffer text and scroll position untouched.
pub fn render_cursor_frame(model: &mut Model, terminal: &mut dyn Terminal) {
    status::render_status_line(model, terminal);
    place_cursor(model, terminal);
}

/// Move the terminal cursor to the buffer cursor, or onto the command row
/// while a command or search is being typed.
pub fn place_cursor(model: &mut Model, terminal: &mut dyn Terminal) {
    if let Some(pos) = status::prompt_cursor(model, terminal) {
        terminal.set_cursor(pos);
        return;
    }
    let active = model.active;
    model.viewport.place_cursor(&model.buffers[active], terminal);
}

#[cfg(test)]
mod tests;
