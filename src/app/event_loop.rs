use std::time::Instant;

use anyhow::{Context, Result};

use crate::app::input::handle_key;
use crate::app::{App, Message, Model, Redraw, update};
use crate::terminal::{CrosstermInput, InputSource, Key, Terminal, TerminalError, TuiTerminal};

/// Keys handled back to back before a frame is drawn regardless of
/// pending input.
const MAX_DRAINED_KEYS: u32 = 64;

/// Consecutive inserted characters that make a typing burst.
const BURST_THRESHOLD: u32 = 4;

impl App {
    /// Run the editor on the process terminal.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be acquired or fails while
    /// the editor runs.
    pub fn run(&self) -> Result<()> {
        let _run_scope = crate::perf::scope("app.run.total");
        let init_scope = crate::perf::scope("app.ratatui_init");
        let console = ratatui::try_init()
            .context("Failed to initialize terminal; kestrel requires an interactive terminal")?;
        drop(init_scope);

        let mut terminal = TuiTerminal::console(console);
        let mut input = CrosstermInput::new();
        let result = self.run_with(&mut terminal, &mut input);
        let restored = terminal.shutdown();
        result?;
        restored.context("Failed to restore terminal")?;
        Ok(())
    }

    /// Run the editor against any terminal and input source, returning the
    /// final state.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal or the input source fails.
    pub fn run_with(
        &self,
        terminal: &mut dyn Terminal,
        input: &mut dyn InputSource,
    ) -> Result<Model> {
        terminal
            .initialize()
            .context("Failed to prepare terminal")?;
        terminal.show_cursor(true);
        let mut model = self.build_model(terminal.size());
        event_loop(&mut model, terminal, input)?;
        Ok(model)
    }
}

/// Read keys and redraw until a quit command runs or input ends.
fn event_loop(
    model: &mut Model,
    terminal: &mut dyn Terminal,
    input: &mut dyn InputSource,
) -> Result<()> {
    let mut frame_idx = 0_u64;
    let mut deferred = false;
    draw_frame(model, terminal, true)?;

    while !model.should_quit {
        let key = match input.get_key() {
            Ok(key) => key,
            Err(TerminalError::InputClosed) => {
                tracing::debug!("input closed");
                break;
            }
            Err(err) => return Err(err.into()),
        };
        let start = Instant::now();
        let mut inserted = u32::from(dispatch(model, key));

        // Coalesce key repeat bursts into a single render.
        let mut drained = 0_u32;
        while !model.should_quit && drained < MAX_DRAINED_KEYS && input.has_input()? {
            let key = input.get_key()?;
            drained += 1;
            if dispatch(model, key) {
                inserted += 1;
            } else {
                inserted = 0;
            }
        }
        if model.should_quit {
            break;
        }

        frame_idx += 1;
        let typing = inserted >= BURST_THRESHOLD && input.has_input()?;
        if deferred && !typing {
            model.request_redraw(Redraw::Full);
        }
        if typing {
            crate::perf::log_event(
                "render.defer",
                format!("frame={frame_idx} inserted={inserted}"),
            );
        }
        draw_frame(model, terminal, !typing)?;
        deferred = typing;

        crate::perf::log_event(
            "frame",
            format!(
                "frame={frame_idx} keys={} ms={:.3}",
                drained + 1,
                start.elapsed().as_secs_f64() * 1000.0
            ),
        );
    }
    Ok(())
}

/// Map and apply one key. Returns whether it inserted a character.
fn dispatch(model: &mut Model, key: Key) -> bool {
    let Some(msg) = handle_key(key, model) else {
        return false;
    };
    crate::perf::log_event("key.dispatch", format!("key={key:?} mode={:?}", model.mode));
    let inserted = matches!(msg, Message::InsertChar(_));
    *model = update(std::mem::replace(model, Model::empty()), msg);
    inserted
}

/// Draw whatever the last updates invalidated. With `highlight` off the
/// frame skips tokenizing.
fn draw_frame(
    model: &mut Model,
    terminal: &mut dyn Terminal,
    highlight: bool,
) -> Result<(), TerminalError> {
    match std::mem::take(&mut model.redraw) {
        Redraw::None => return Ok(()),
        Redraw::Cursor => crate::ui::render_cursor_frame(model, terminal),
        Redraw::Full => {
            let enabled = model.options.highlighting;
            model.viewport.set_highlighting(enabled && highlight);
            crate::ui::render(model, terminal);
            model.viewport.set_highlighting(enabled);
        }
    }
    terminal.refresh()
}
