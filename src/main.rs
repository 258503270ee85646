//! Kestrel - a modal terminal text editor.
//!
//! # Usage
//!
//! ```bash
//! kestrel main.c
//! kestrel --wrap notes.md todo.md
//! kestrel -R /etc/hosts
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use kestrel::app::App;
use kestrel::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    parse_flag_tokens, save_config_flags,
};
use kestrel::perf;

/// A modal terminal text editor
#[derive(Parser, Debug)]
#[command(name = "kestrel", version, about, long_about = None)]
#[allow(clippy::struct_excessive_bools)]
struct Cli {
    /// Files to open, one buffer each
    #[arg(value_name = "FILES")]
    files: Vec<PathBuf>,

    /// Hide the line-number gutter
    #[arg(long)]
    no_line_numbers: bool,

    /// Clip long lines instead of scrolling horizontally
    #[arg(long)]
    wrap: bool,

    /// Columns per tab stop
    #[arg(long, value_name = "N")]
    tab_width: Option<usize>,

    /// Disable syntax highlighting
    #[arg(long)]
    no_highlight: bool,

    /// Open buffers read-only
    #[arg(short = 'R', long)]
    readonly: bool,

    /// Enable timing logs
    #[arg(long)]
    perf: bool,

    /// Write frame, key, and render-deferral events to a file
    #[arg(long, value_name = "PATH")]
    render_debug_log: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

fn main() -> Result<()> {
    // Logs go to stderr so they never land on the editor screen.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);
    tracing::debug!(?effective, "effective flags");

    perf::set_enabled(effective.perf);
    let render_debug_log_path = effective
        .render_debug_log
        .clone()
        .or_else(|| std::env::var_os(perf::DEBUG_LOG_ENV).map(PathBuf::from));
    if let Err(err) = perf::set_debug_log_path(render_debug_log_path.as_deref()) {
        tracing::warn!(
            path = ?render_debug_log_path,
            error = %err,
            "failed to open render debug log"
        );
    }

    App::new(cli.files)
        .with_options(effective.editor_options())
        .run()
        .context("Editor error")
}
