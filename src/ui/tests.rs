use std::rc::Rc;

use ratatui::backend::TestBackend;
use ratatui::style::Color;

use super::*;
use crate::app::{Mode, Model};
use crate::config::EditorOptions;
use crate::editor::{Position, TextBuffer};
use crate::highlight::{CFamilyTokenizer, MarkdownTokenizer};
use crate::terminal::{ScreenPos, TerminalSize, TuiTerminal};

fn create_test_terminal(cols: u16, rows: u16) -> TuiTerminal<TestBackend> {
    let mut terminal = TuiTerminal::new(TestBackend::new(cols, rows)).unwrap();
    terminal.initialize().unwrap();
    terminal
}

fn create_test_model(text: &str, cols: u16, rows: u16) -> Model {
    let mut model = Model::new(EditorOptions::default(), TerminalSize { rows, cols });
    model.buffers[0] = TextBuffer::from_text(text);
    model
}

fn row_text(terminal: &TuiTerminal<TestBackend>, y: u16) -> String {
    (0..terminal.size().cols)
        .map(|x| terminal.cells()[(x, y)].symbol().to_string())
        .collect()
}

#[test]
fn test_render_draws_gutter_text_and_blank_rows() {
    let mut terminal = create_test_terminal(20, 5);
    let mut model = create_test_model("ab\ncd", 20, 5);

    render(&mut model, &mut terminal);

    assert_eq!(row_text(&terminal, 0), " 1 ab               ");
    assert_eq!(row_text(&terminal, 1), " 2 cd               ");
    assert_eq!(row_text(&terminal, 2).trim(), "");
    assert_eq!(
        terminal.cells()[(1, 0)].fg,
        ratatui::style::Color::Cyan
    );
    assert_eq!(terminal.cursor(), ScreenPos::new(0, 3));
}

#[test]
fn test_render_without_line_numbers() {
    let mut terminal = create_test_terminal(10, 3);
    let mut model = create_test_model("hello", 10, 3);
    model.viewport.set_show_line_numbers(false);

    render(&mut model, &mut terminal);

    assert_eq!(row_text(&terminal, 0), "hello     ");
}

#[test]
fn test_render_overlays_tokens() {
    let mut terminal = create_test_terminal(20, 3);
    let mut model = create_test_model("int x;", 20, 3);
    model.viewport.set_tokenizer(Some(Rc::new(CFamilyTokenizer::new())));

    render(&mut model, &mut terminal);

    assert_eq!(terminal.cells()[(3, 0)].fg, ratatui::style::Color::Blue);
    assert_eq!(terminal.cells()[(5, 0)].fg, ratatui::style::Color::Blue);
    assert_eq!(terminal.cells()[(7, 0)].fg, ratatui::style::Color::Reset);
}

#[test]
fn test_render_clips_tokens_to_scrolled_window() {
    let mut terminal = create_test_terminal(12, 3);
    let mut model = create_test_model("int alpha = 0; return 42;", 12, 3);
    model.viewport.set_tokenizer(Some(Rc::new(CFamilyTokenizer::new())));
    model.buffers[0].set_cursor(Position::new(0, 25));
    model.viewport.ensure_cursor_visible(&model.buffers[0]);
    assert_eq!(model.viewport.left_column(), 17);

    render(&mut model, &mut terminal);

    assert_eq!(row_text(&terminal, 0), " 1 turn 42; ");
    for x in 3..7 {
        assert_eq!(terminal.cells()[(x, 0)].fg, Color::Blue);
    }
    assert_eq!(terminal.cells()[(7, 0)].fg, Color::Reset);
    assert_eq!(terminal.cells()[(8, 0)].fg, Color::Cyan);
    assert_eq!(terminal.cells()[(9, 0)].fg, Color::Cyan);
    assert_eq!(terminal.cells()[(10, 0)].fg, Color::Reset);
}

#[test]
fn test_later_overlapping_token_wins() {
    let mut terminal = create_test_terminal(20, 3);
    let mut model = create_test_model("# a `b`", 20, 3);
    model.viewport.set_tokenizer(Some(Rc::new(MarkdownTokenizer::new())));

    render(&mut model, &mut terminal);

    assert_eq!(terminal.cells()[(3, 0)].fg, Color::Magenta);
    assert_eq!(terminal.cells()[(5, 0)].fg, Color::Cyan);
    for x in 7..10 {
        assert_eq!(terminal.cells()[(x, 0)].fg, Color::Green);
    }
}

#[test]
fn test_cursor_frame_refreshes_status_row() {
    let mut terminal = create_test_terminal(40, 4);
    let mut model = create_test_model("one\ntwo", 40, 4);
    model.set_status("Yanked line");
    render(&mut model, &mut terminal);
    assert!(row_text(&terminal, 3).starts_with(" Yanked line"));

    model.status = None;
    model.mode = Mode::Insert;
    model.buffers[0].set_cursor(Position::new(1, 1));
    render_cursor_frame(&mut model, &mut terminal);

    assert!(row_text(&terminal, 3).starts_with(" INSERT | [No Name] | 2:2 | 2 lines"));
    assert_eq!(row_text(&terminal, 0).trim_end(), " 1 one");
    assert_eq!(terminal.cursor(), ScreenPos::new(1, 4));
}

#[test]
fn test_render_skips_tokens_when_highlighting_off() {
    let mut terminal = create_test_terminal(20, 3);
    let mut model = create_test_model("int x;", 20, 3);
    model.viewport.set_tokenizer(Some(Rc::new(CFamilyTokenizer::new())));
    model.viewport.set_highlighting(false);

    render(&mut model, &mut terminal);

    assert_eq!(terminal.cells()[(3, 0)].fg, ratatui::style::Color::Reset);
}

#[test]
fn test_status_row_shows_mode_name_and_position() {
    let mut terminal = create_test_terminal(40, 4);
    let mut model = create_test_model("one\ntwo", 40, 4);
    model.buffers[0].set_path("notes.txt");
    model.buffers[0].set_cursor(crate::editor::Position::new(1, 2));

    render(&mut model, &mut terminal);

    let status = row_text(&terminal, 3);
    assert!(status.starts_with(" NORMAL | notes.txt | 2:3 | 2 lines"));
    assert_eq!(terminal.cells()[(0, 3)].bg, ratatui::style::Color::Blue);
}

#[test]
fn test_status_row_shows_error_in_red() {
    let mut terminal = create_test_terminal(30, 3);
    let mut model = create_test_model("", 30, 3);
    model.set_error("Unknown command: zz");

    render(&mut model, &mut terminal);

    assert!(row_text(&terminal, 2).starts_with(" ERROR: Unknown command: zz"));
    assert_eq!(terminal.cells()[(0, 2)].bg, ratatui::style::Color::Red);
}

#[test]
fn test_command_prompt_moves_cursor_to_status_row() {
    let mut terminal = create_test_terminal(30, 3);
    let mut model = create_test_model("", 30, 3);
    model.mode = Mode::Command;
    model.command_line.push_str("wq");

    render(&mut model, &mut terminal);

    assert!(row_text(&terminal, 2).starts_with(":wq "));
    assert_eq!(terminal.cursor(), ScreenPos::new(2, 3));
}

#[test]
fn test_status_text_pending_sequence_and_flags() {
    let mut model = create_test_model("x", 40, 5);
    model.repeat_count = 3;
    model.sequence.push('d');
    assert_eq!(status::status_text(&model), " NORMAL | 3d");

    model.clear_pending();
    model.buffers[0].set_read_only(true);
    model.buffers[0].insert_char('y');
    assert_eq!(
        status::status_text(&model),
        " NORMAL | [No Name] [readonly] | 1:1 | 1 lines"
    );
}

#[test]
fn test_truncate_counts_display_width() {
    assert_eq!(status::truncate_to_width("日本語", 4), "日本");
    assert_eq!(status::truncate_to_width("abc", 10), "abc");
    assert_eq!(status::truncate_to_width("abc", 0), "");
}
