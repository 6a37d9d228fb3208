//! Layout and geometry calculations for the journal UI
//!
//! Handles terminal layout calculations, including:
//! - Responsive layout selection (tree pane plus section, or section only)
//! - Centered dialog positioning

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

use super::{
    types::{JournalApp, WIDE_TERMINAL_THRESHOLD},
    widgets,
};

/// Render the journal body with responsive layout selection
///
/// Wide terminals get the collection tree beside the selected section;
/// narrow ones show the section alone.
pub fn render_journal(f: &mut Frame, app: &JournalApp, area: Rect) {
    if app.terminal_width >= WIDE_TERMINAL_THRESHOLD {
        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(25), Constraint::Percentage(75)])
            .split(area);
        widgets::render_tree(f, app, panes[0]);
        widgets::render_section(f, app, panes[1]);
    } else {
        widgets::render_section(f, app, area);
    }
}

/// Create a centered rectangle for dialogs
///
/// Pure function: Calculates centered Rect using safe arithmetic.
/// Uses saturating arithmetic to prevent overflow on small terminals.
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(100u16.saturating_sub(percent_y).saturating_div(2)),
            Constraint::Percentage(percent_y),
            Constraint::Percentage(100u16.saturating_sub(percent_y).saturating_div(2)),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(100u16.saturating_sub(percent_x).saturating_div(2)),
            Constraint::Percentage(percent_x),
            Constraint::Percentage(100u16.saturating_sub(percent_x).saturating_div(2)),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use ratatui::{backend::TestBackend, Terminal};

    use super::*;

    #[test]
    fn test_centered_rect() {
        let full_area = Rect::new(0, 0, 100, 100);
        let centered = centered_rect(50, 50, full_area);

        assert_eq!(centered.width, 50);
        assert_eq!(centered.height, 50);
        assert_eq!(centered.x, 25);
        assert_eq!(centered.y, 25);
    }

    #[test]
    fn test_narrow_terminal_hides_tree() {
        let mut terminal = Terminal::new(TestBackend::new(60, 10)).expect("test terminal");
        let app = JournalApp::new(60);
        terminal
            .draw(|f| render_journal(f, &app, f.area()))
            .expect("draw");
        let rendered = format!("{:?}", terminal.backend().buffer());
        assert!(!rendered.contains("Collections"));
    }

    #[test]
    fn test_wide_terminal_shows_tree() {
        let mut terminal = Terminal::new(TestBackend::new(120, 10)).expect("test terminal");
        let app = JournalApp::new(120);
        terminal
            .draw(|f| render_journal(f, &app, f.area()))
            .expect("draw");
        let rendered = format!("{:?}", terminal.backend().buffer());
        assert!(rendered.contains("Collections"));
    }
}
