//! UI rendering orchestration for the journal view
//!
//! Main entry point for rendering the journal UI.
//! Delegates to specialized modules for layout, widgets, and formatting.
//!
//! Module structure:
//! - `layout`: Terminal layout calculations and responsive mode selection
//! - `widgets`: Ratatui widget builders for the tree, sections, dialogs
//! - `formatting`: Text formatting and styling for rows

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use super::{layout, types::JournalApp, widgets};

/// Render the main journal UI
///
/// Orchestrates the rendering pipeline:
/// 1. Split frame into main content and status bar areas
/// 2. Render tree and section in main area with responsive layout
/// 3. Render status bar with help text
/// 4. Conditionally render active dialogs (input/confirm)
pub fn render_ui(f: &mut Frame, app: &JournalApp) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(f.area());

    layout::render_journal(f, app, chunks[0]);
    widgets::render_status_bar(f, app, chunks[1]);

    if let Some(dialog) = app.input_dialog.as_ref() {
        widgets::render_input_dialog(f, dialog);
    }

    if let Some(dialog) = app.confirm_dialog.as_ref() {
        widgets::render_confirm_dialog(f, dialog);
    }
}
