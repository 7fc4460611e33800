//! Pythonico: a minimal terminal editor for Python source files.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p pythonico
//! ```
//!
//! The program takes no arguments; files are opened from the File menu.
//!
//! # Keys
//!
//! - F10 / Alt+F / Alt+E / Alt+H: menus
//! - Ctrl+O / Ctrl+S / Ctrl+Q: open / save / exit
//! - Ctrl+Z / Ctrl+Y: undo / redo
//! - Ctrl+X / Ctrl+C / Ctrl+V / Ctrl+A: cut / copy / paste / select all
//! - Arrows, Home/End, PageUp/PageDown (Shift extends the selection)
//!
//! Logs are written to a daily file under the local data directory; set `RUST_LOG` to
//! change the level.

mod app;
mod clipboard;
mod config;
mod dialog;
mod logging;
mod menu;
mod ui;

use anyhow::Context;
use app::App;
use clipboard::ClipboardBridge;
use config::AppConfig;
use crossterm::{
    event::{self, DisableBracketedPaste, EnableBracketedPaste, Event},
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode,
    },
};
use pythonico_highlight::{PythonStyles, RegexHighlighter};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, stdout};
use std::process::ExitCode;
use std::time::Duration;

fn main() -> ExitCode {
    let _log_guard = match logging::init() {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("pythonico: logging disabled: {err:#}");
            None
        }
    };

    // Rules are compiled before the terminal is touched so a bad rule fails cleanly.
    let highlighter = match RegexHighlighter::python(PythonStyles::default()) {
        Ok(highlighter) => highlighter,
        Err(err) => {
            tracing::error!(%err, "cannot start: highlight rules failed to compile");
            eprintln!("pythonico: {err}");
            return ExitCode::FAILURE;
        }
    };

    match run(highlighter) {
        Ok(()) => {
            tracing::info!("clean shutdown");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!("terminated with error: {err:#}");
            eprintln!("pythonico: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(highlighter: RegexHighlighter) -> anyhow::Result<()> {
    let config = AppConfig::default();

    enable_raw_mode().context("failed to enable raw mode")?;
    let _restore = TerminalRestore;
    let mut stdout = stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableBracketedPaste,
        SetTitle(config.title)
    )
    .context("failed to enter the alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let mut app = App::new(config, highlighter, ClipboardBridge::new());
    tracing::info!("editor started");
    run_app(&mut terminal, &mut app).context("event loop failed")
}

/// Leaves the alternate screen and raw mode when dropped, on every exit path.
struct TerminalRestore;

impl Drop for TerminalRestore {
    fn drop(&mut self) {
        let mut stdout = stdout();
        if let Err(err) = execute!(
            stdout,
            DisableBracketedPaste,
            LeaveAlternateScreen,
            crossterm::cursor::Show
        ) {
            tracing::warn!(%err, "failed to leave the alternate screen");
        }
        if let Err(err) = disable_raw_mode() {
            tracing::warn!(%err, "failed to disable raw mode");
        }
    }
}

fn run_app<B: ratatui::backend::Backend + io::Write>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    let mut shown_title = String::new();

    loop {
        terminal.draw(|frame| ui::draw(frame, app))?;

        let title = app.window_title();
        if title != shown_title {
            execute!(terminal.backend_mut(), SetTitle(&title))?;
            shown_title = title;
        }

        if app.should_quit() {
            break;
        }

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => app.handle_key_event(key),
                Event::Paste(text) => app.handle_paste(&text),
                // Redrawn on the next iteration.
                Event::Resize(_, _) => {}
                _ => {}
            }
        }

        app.maybe_end_undo_group_after_idle();
    }

    Ok(())
}
