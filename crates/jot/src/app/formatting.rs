//! Text formatting and styling for journal display
//!
//! Handles conversion of journal rows and tree lines into styled UI text.
//! Pure functions: No side effects, functional Option/enum handling.

use jot_core::model::BulletKind;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::ListItem,
};

use super::types::{TreeLine, VisibleRow};

/// Indentation per nesting level
const INDENT: &str = "  ";

/// Format a row as a styled list item
///
/// Pure function: VisibleRow -> ListItem with conditional styling.
/// Combines indentation, signifier, bullet glyph and label.
pub fn format_row_item(row: &VisibleRow, is_selected: bool) -> ListItem<'static> {
    let line = Line::from(vec![
        Span::styled(
            row.signifier.glyph().to_string(),
            Style::default().fg(Color::Red),
        ),
        Span::raw(INDENT.repeat(row.depth)),
        Span::styled(format!("{} ", row.kind.glyph()), kind_style(row.kind)),
        Span::styled(row.label.clone(), label_style(row.kind, is_selected)),
    ]);

    ListItem::new(line)
}

/// Format a collection tree line
pub fn format_tree_item(line: &TreeLine, is_selected: bool) -> ListItem<'static> {
    let style = match (is_selected, line.implicit) {
        (true, _) => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        (false, true) => Style::default().fg(Color::DarkGray),
        (false, false) => Style::default(),
    };
    ListItem::new(Line::from(Span::styled(
        format!("{}{}", INDENT.repeat(line.depth), line.label),
        style,
    )))
}

fn kind_style(kind: BulletKind) -> Style {
    match kind {
        BulletKind::Task => Style::default().fg(Color::Cyan),
        BulletKind::Completed | BulletKind::Irrelevant => Style::default().fg(Color::DarkGray),
        BulletKind::Note => Style::default().fg(Color::Gray),
        BulletKind::Event => Style::default().fg(Color::Magenta),
    }
}

fn label_style(kind: BulletKind, is_selected: bool) -> Style {
    let base = match kind {
        BulletKind::Completed => Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::CROSSED_OUT),
        BulletKind::Irrelevant => Style::default().fg(Color::DarkGray),
        _ => Style::default(),
    };
    if is_selected {
        base.fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        base
    }
}

/// Human-readable age of the last refresh
pub fn format_age(elapsed: std::time::Duration) -> String {
    match elapsed.as_secs() {
        0 => "just now".to_string(),
        secs @ 1..=59 => format!("{secs}s ago"),
        secs => format!("{}m ago", secs / 60),
    }
}
