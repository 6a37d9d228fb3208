//! Widget builders for the journal UI
//!
//! Constructs ratatui widgets (List, Paragraph, Block) with appropriate
//! styling and content. All functions are pure with no side effects.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use super::{
    formatting, layout,
    types::{ConfirmDialog, InputDialog, JournalApp},
};

/// Render the collection tree
pub fn render_tree(f: &mut Frame, app: &JournalApp, area: Rect) {
    let selected = app.current_section().map(|s| s.id.as_str());
    let items: Vec<ListItem> = app
        .tree
        .iter()
        .map(|line| formatting::format_tree_item(line, Some(line.id.as_str()) == selected))
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(" Collections ")
            .borders(Borders::ALL),
    );
    f.render_widget(list, area);
}

/// Render the selected section as a List widget
///
/// A section without rows is shown as a placeholder line.
pub fn render_section(f: &mut Frame, app: &JournalApp, area: Rect) {
    let (title, subtitle) = app.current_section().map_or(("Journal", ""), |section| {
        (section.display_title(), section.subtitle.as_str())
    });
    let rows = app.visible_rows();

    let items: Vec<ListItem> = if rows.is_empty() {
        vec![ListItem::new(Line::from(Span::styled(
            "Nothing here yet. Press a to add an entry.",
            Style::default().fg(Color::DarkGray),
        )))]
    } else {
        rows.iter()
            .enumerate()
            .map(|(idx, row)| formatting::format_row_item(row, idx == app.selected_row))
            .collect()
    };

    let heading = if subtitle.is_empty() {
        format!(" {title} ")
    } else {
        format!(" {title} · {subtitle} ")
    };

    let list = List::new(items)
        .block(
            Block::default()
                .title(heading)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .highlight_style(Style::default().add_modifier(Modifier::BOLD));

    f.render_widget(list, area);
}

/// Render status bar with help text, last status and refresh age
pub fn render_status_bar(f: &mut Frame, app: &JournalApp, area: Rect) {
    let mut spans = vec![
        Span::raw("hjkl:"),
        Span::styled(" navigate ", Style::default().fg(Color::Gray)),
        Span::raw("a/A:"),
        Span::styled(" add/nest ", Style::default().fg(Color::Gray)),
        Span::raw("x:"),
        Span::styled(" done ", Style::default().fg(Color::Gray)),
        Span::raw("d:"),
        Span::styled(" delete ", Style::default().fg(Color::Gray)),
        Span::raw("c:"),
        Span::styled(" collection ", Style::default().fg(Color::Gray)),
        Span::raw("r:"),
        Span::styled(" refresh ", Style::default().fg(Color::Gray)),
        Span::raw("q:"),
        Span::styled(" quit ", Style::default().fg(Color::Gray)),
        Span::raw(format!(
            "| Updated {}",
            formatting::format_age(app.last_update.elapsed())
        )),
    ];
    if let Some(status) = app.status.as_deref() {
        spans.push(Span::styled(
            format!(" | {status}"),
            Style::default().fg(Color::Yellow),
        ));
    }

    let paragraph =
        Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL).title(" Help "));

    f.render_widget(paragraph, area);
}

/// Render input dialog for user text entry
///
/// Pure function: Creates centered dialog widget for input.
/// Displays prompt and styled text input area.
pub fn render_input_dialog(f: &mut Frame, dialog: &InputDialog) {
    let area = layout::centered_rect(60, 20, f.area());

    let text = vec![
        Line::from(dialog.prompt.as_str()),
        Line::from(""),
        Line::from(Span::styled(
            dialog.input.as_str(),
            Style::default().fg(Color::Yellow),
        )),
    ];

    let paragraph = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Input ")
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(ratatui::widgets::Clear, area);
    f.render_widget(paragraph, area);
}

/// Render confirmation dialog for destructive actions
///
/// Pure function: Creates centered confirmation dialog widget.
/// Displays message and instructions (Y to confirm, N to cancel).
pub fn render_confirm_dialog(f: &mut Frame, dialog: &ConfirmDialog) {
    let area = layout::centered_rect(60, 20, f.area());

    let text = vec![
        Line::from(dialog.message.as_str()),
        Line::from(""),
        Line::from(Span::styled(
            "Press Y to confirm, N to cancel",
            Style::default().fg(Color::Gray),
        )),
    ];

    let paragraph = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Confirm ")
            .border_style(Style::default().fg(Color::Yellow)),
    );

    f.render_widget(ratatui::widgets::Clear, area);
    f.render_widget(paragraph, area);
}
