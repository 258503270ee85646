use unicode_width::UnicodeWidthChar;

use crate::app::{Mode, Model, StatusLevel};
use crate::terminal::{Color, ScreenPos, Terminal};

/// Text for the status row, before truncation.
pub fn status_text(model: &Model) -> String {
    let mode = model.mode.label();

    if let Some(status) = &model.status {
        return match status.level {
            StatusLevel::Error => format!(" ERROR: {}", status.text),
            StatusLevel::Info => format!(" {}", status.text),
        };
    }
    match model.mode {
        Mode::Command => return format!(":{}", model.command_line),
        Mode::Search => return model.search.display(),
        _ => {}
    }
    if !model.sequence.is_empty() || model.repeat_count > 0 {
        let count = if model.repeat_count > 0 {
            model.repeat_count.to_string()
        } else {
            String::new()
        };
        return format!(" {mode} | {count}{}", model.sequence);
    }

    let buffer = model.buffer();
    let cursor = buffer.cursor();
    let modified = if buffer.is_modified() { " [+]" } else { "" };
    let readonly = if buffer.is_read_only() { " [readonly]" } else { "" };
    format!(
        " {mode} | {}{modified}{readonly} | {}:{} | {} lines",
        buffer.display_name(),
        cursor.line + 1,
        cursor.column + 1,
        buffer.line_count()
    )
}

/// Cut `text` to at most `width` display cells.
pub fn truncate_to_width(text: &str, width: usize) -> &str {
    let mut used = 0;
    for (idx, ch) in text.char_indices() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            return &text[..idx];
        }
        used += w;
    }
    text
}

/// Draw the status row on the last terminal line.
pub fn render_status_line(model: &Model, terminal: &mut dyn Terminal) {
    let size = terminal.size();
    if size.rows == 0 {
        return;
    }
    let width = usize::from(size.cols);
    let text = status_text(model);
    let mut line = truncate_to_width(&text, width).to_string();
    let pad = width.saturating_sub(line.chars().map(|c| c.width().unwrap_or(0)).sum());
    line.push_str(&" ".repeat(pad));

    let bg = match model.status.as_ref().map(|s| s.level) {
        Some(StatusLevel::Error) => Color::Red,
        _ => Color::Blue,
    };
    terminal.put_text_with_color(&line, ScreenPos::new(size.rows - 1, 0), Color::White, bg);
}

/// Where the cursor sits while typing on the command row.
pub fn prompt_cursor(model: &Model, terminal: &dyn Terminal) -> Option<ScreenPos> {
    let size = terminal.size();
    let typed = match model.mode {
        Mode::Command => model.command_line.chars().count(),
        Mode::Search => model.search.input.chars().count(),
        _ => return None,
    };
    let col = u16::try_from(typed + 1).unwrap_or(u16::MAX);
    Some(ScreenPos::new(
        size.rows.saturating_sub(1),
        col.min(size.cols.saturating_sub(1)),
    ))
}
