//! Saved default flags.
//!
//! Defaults live in flag files holding the same tokens as the command line,
//! one or more per line, with `#` comments. The global file sits in the
//! platform config directory and a `.kestrelrc` in the working directory
//! overrides it. Effective flags are global ∪ local ∪ command line.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::ui::viewport::DEFAULT_TAB_WIDTH;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub no_line_numbers: bool,
    pub wrap: bool,
    pub no_highlight: bool,
    pub readonly: bool,
    pub perf: bool,
    pub tab_width: Option<usize>,
    pub render_debug_log: Option<PathBuf>,
}

impl ConfigFlags {
    /// Merge `other` over `self`: switches are OR-ed, valued options from
    /// `other` win when set.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            no_line_numbers: self.no_line_numbers || other.no_line_numbers,
            wrap: self.wrap || other.wrap,
            no_highlight: self.no_highlight || other.no_highlight,
            readonly: self.readonly || other.readonly,
            perf: self.perf || other.perf,
            tab_width: other.tab_width.or(self.tab_width),
            render_debug_log: other
                .render_debug_log
                .clone()
                .or_else(|| self.render_debug_log.clone()),
        }
    }

    pub fn editor_options(&self) -> EditorOptions {
        EditorOptions {
            line_numbers: !self.no_line_numbers,
            wrap_lines: self.wrap,
            tab_width: self.tab_width.unwrap_or(DEFAULT_TAB_WIDTH).max(1),
            highlighting: !self.no_highlight,
            read_only: self.readonly,
        }
    }
}

/// Display and editing options consumed by the dispatcher and viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorOptions {
    pub line_numbers: bool,
    pub wrap_lines: bool,
    pub tab_width: usize,
    pub highlighting: bool,
    pub read_only: bool,
}

impl Default for EditorOptions {
    fn default() -> Self {
        ConfigFlags::default().editor_options()
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("kestrel").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("kestrel")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("kestrel").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("kestrel")
                .join("config");
        }
    }

    local_override_path()
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".kestrelrc")
}

/// Read a flag file. A missing file yields empty flags.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

/// Write `flags` as a flag file, creating parent directories.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = vec!["# kestrel defaults (saved with --save)".to_string()];
    if flags.no_line_numbers {
        lines.push("--no-line-numbers".to_string());
    }
    if flags.wrap {
        lines.push("--wrap".to_string());
    }
    if flags.no_highlight {
        lines.push("--no-highlight".to_string());
    }
    if flags.readonly {
        lines.push("--readonly".to_string());
    }
    if let Some(width) = flags.tab_width {
        lines.push(format!("--tab-width {width}"));
    }
    if flags.perf {
        lines.push("--perf".to_string());
    }
    if let Some(path) = &flags.render_debug_log {
        lines.push(format!("--render-debug-log {}", path.display()));
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

/// Remove a flag file if present.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be removed.
pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pick the known flags out of a token list; everything else is ignored.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        match token {
            "--no-line-numbers" => flags.no_line_numbers = true,
            "--wrap" => flags.wrap = true,
            "--no-highlight" => flags.no_highlight = true,
            "-R" | "--readonly" => flags.readonly = true,
            "--perf" => flags.perf = true,
            "--tab-width" => {
                if let Some(next) = tokens.get(i + 1) {
                    flags.tab_width = parse_tab_width(next);
                    i += 1;
                }
            }
            "--render-debug-log" => {
                if let Some(next) = tokens.get(i + 1) {
                    flags.render_debug_log = Some(PathBuf::from(next));
                    i += 1;
                }
            }
            _ => {
                if let Some(value) = token.strip_prefix("--tab-width=") {
                    flags.tab_width = parse_tab_width(value);
                } else if let Some(value) = token.strip_prefix("--render-debug-log=") {
                    flags.render_debug_log = Some(PathBuf::from(value));
                }
            }
        }
        i += 1;
    }
    flags
}

fn parse_tab_width(s: &str) -> Option<usize> {
    s.parse().ok().filter(|&w| w > 0)
}
