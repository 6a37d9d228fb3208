//! Terminal management
//!
//! Handles terminal setup and the event loop, which multiplexes key input,
//! cache events, status messages and a redraw tick. Store work leaves the
//! loop through the action queue.

use std::{
    io::{self, Stdout},
    time::Duration,
};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event as TermEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use jot_core::Event;
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use super::{
    events::handle_key_event,
    rendering::render_ui,
    types::{Action, AppContext, JournalApp},
};

/// Pending terminal events before the reader blocks
const INPUT_CAPACITY: usize = 64;

/// Setup terminal for TUI rendering
///
/// # Errors
/// Returns error if terminal setup fails
pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).context("Failed to create terminal")
}

/// Cleanup terminal after TUI exits
///
/// # Errors
/// Returns error if terminal cleanup fails
pub fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")
}

/// Best-effort terminal restore when the event loop never got to clean up
///
/// # Errors
/// Returns error if raw mode or the alternate screen cannot be left
pub fn restore_terminal() -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(io::stdout(), LeaveAlternateScreen).context("Failed to leave alternate screen")
}

/// Read terminal events on a blocking thread
///
/// The thread polls with `tick` as timeout so it notices a dropped receiver
/// and exits.
pub fn spawn_input_reader(tick: Duration) -> mpsc::Receiver<TermEvent> {
    let (tx, rx) = mpsc::channel(INPUT_CAPACITY);
    tokio::task::spawn_blocking(move || loop {
        if tx.is_closed() {
            break;
        }
        match event::poll(tick) {
            Ok(true) => match event::read() {
                Ok(ev) => {
                    if tx.blocking_send(ev).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "terminal read failed");
                    break;
                }
            },
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(error = %e, "terminal poll failed");
                break;
            }
        }
    });
    rx
}

/// Main application event loop
///
/// # Errors
/// Returns error if rendering fails
pub async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut JournalApp,
    ctx: &AppContext,
    actions_tx: mpsc::Sender<Action>,
    mut events_rx: mpsc::Receiver<Event>,
    mut status_rx: mpsc::Receiver<String>,
    tick: Duration,
) -> Result<()> {
    let mut input_rx = spawn_input_reader(tick);
    let mut ticker = tokio::time::interval(tick);
    let mut status_open = true;

    loop {
        terminal.draw(|f| render_ui(f, app))?;

        if app.should_quit {
            break;
        }

        tokio::select! {
            input = input_rx.recv() => match input {
                Some(TermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                    if let Some(action) = handle_key_event(app, ctx, key) {
                        if let Err(e) = actions_tx.try_send(action) {
                            tracing::warn!(error = %e, "action queue rejected action");
                            app.set_status("busy, try again".to_string());
                        }
                    }
                }
                Some(TermEvent::Resize(width, _)) => app.terminal_width = width,
                Some(_) => {}
                None => {
                    tracing::warn!("terminal input closed");
                    break;
                }
            },
            event = events_rx.recv() => match event {
                Some(event) => {
                    let mut batch = vec![event];
                    while let Ok(more) = events_rx.try_recv() {
                        batch.push(more);
                    }
                    if app.apply_events(&batch) {
                        app.reload(ctx.cache.snapshot());
                    }
                }
                None => break,
            },
            status = status_rx.recv(), if status_open => match status {
                Some(status) => app.set_status(status),
                None => status_open = false,
            },
            _ = ticker.tick() => {}
        }
    }

    Ok(())
}
