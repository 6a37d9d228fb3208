//! App state management
//!
//! Handles all state operations for the journal view including
//! initialization, rebuilding from cache snapshots, navigation, and dialog
//! management.
//!
//! This module separates concerns into:
//! - **Initialization**: `new()` sets up an empty view
//! - **Updates**: `reload()` rebuilds the view from a cache snapshot and
//!   `apply_events()` decides whether cache events require one
//! - **State Transitions**: Navigation methods that modify selection state
//! - **Event Handling**: Dialog show/hide methods

use std::{collections::HashMap, time::Instant};

use itertools::Itertools;
use jot_core::{
    model::{bullet::walk, normalize_name, Bullet, Section},
    Event, Snapshot,
};

use super::types::{
    ConfirmAction, ConfirmDialog, InputAction, InputDialog, JournalApp, TreeLine, VisibleRow,
    FALLBACK_COLLECTION,
};

impl JournalApp {
    /// Create an empty journal view
    pub fn new(terminal_width: u16) -> Self {
        Self {
            sections: Vec::new(),
            tree: Vec::new(),
            selected_section: 0,
            selected_row: 0,
            terminal_width,
            last_update: Instant::now(),
            status: None,
            should_quit: false,
            vim_keys: true,
            confirm_dialog: None,
            input_dialog: None,
        }
    }
}

// ============================================================================
// UPDATE OPERATIONS: Snapshot reloads and cache events
// ============================================================================

impl JournalApp {
    /// Rebuild the view from a cache snapshot
    ///
    /// Sections are put in tree order. The selection follows the previously
    /// selected collection and bullet by id when they still exist.
    pub fn reload(&mut self, snapshot: Snapshot) {
        let keep_section = self.current_section().map(|s| normalize_name(&s.id));
        let keep_row = self.selected_visible_row().and_then(|row| row.id);

        let position: HashMap<String, usize> = snapshot
            .tree
            .order()
            .iter()
            .enumerate()
            .map(|(idx, name)| (normalize_name(name), idx))
            .collect();

        self.tree = snapshot
            .tree
            .iter()
            .map(|(depth, node)| TreeLine {
                depth,
                id: node.name().to_string(),
                label: node.meta.leaf_name().to_string(),
                implicit: node.implicit,
            })
            .collect();
        self.sections = snapshot
            .sections
            .into_iter()
            .sorted_by_key(|section| {
                position
                    .get(&normalize_name(&section.id))
                    .copied()
                    .unwrap_or(usize::MAX)
            })
            .collect();

        if let Some(idx) = keep_section.and_then(|key| {
            self.sections
                .iter()
                .position(|section| normalize_name(&section.id) == key)
        }) {
            self.selected_section = idx;
        }
        self.clamp_section();

        if let Some(idx) = keep_row.and_then(|id| {
            self.visible_rows()
                .iter()
                .position(|row| row.id.as_deref() == Some(id.as_str()))
        }) {
            self.selected_row = idx;
        }
        self.adjust_selection();
        self.last_update = Instant::now();
    }

    /// Inspect a batch of cache events
    ///
    /// Returns true when the view has to be rebuilt. Focus changes are echoes
    /// of our own navigation and never require one.
    pub fn apply_events(&mut self, events: &[Event]) -> bool {
        let mut stale = false;
        for event in events {
            match event {
                Event::FocusChanged { .. } => {}
                Event::CollectionDeleted { collection } => {
                    if self
                        .current_section()
                        .is_some_and(|s| normalize_name(&s.id) == normalize_name(&collection.name))
                    {
                        self.status = Some(format!("{} was removed", collection.name));
                    }
                    stale = true;
                }
                _ => stale = true,
            }
        }
        stale
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    #[must_use]
    pub fn current_section(&self) -> Option<&Section> {
        self.sections.get(self.selected_section)
    }

    /// Collection that new top-level bullets go into
    #[must_use]
    pub fn target_collection(&self) -> String {
        self.current_section()
            .map_or_else(|| FALLBACK_COLLECTION.to_string(), |s| s.id.clone())
    }

    /// Rows of the selected section in display order
    #[must_use]
    pub fn visible_rows(&self) -> Vec<VisibleRow> {
        self.current_section()
            .map(|section| visible_rows(&section.rows))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn selected_visible_row(&self) -> Option<VisibleRow> {
        self.visible_rows().into_iter().nth(self.selected_row)
    }

    /// Collection and bullet id of the selection, for focus tracking
    #[must_use]
    pub fn focus(&self) -> (Option<String>, Option<String>) {
        (
            self.current_section().map(|s| s.id.clone()),
            self.selected_visible_row().and_then(|row| row.id),
        )
    }
}

// ============================================================================
// STATE TRANSITIONS: Navigation and selection management
// ============================================================================

impl JournalApp {
    /// Move selection to the previous section
    pub fn move_left(&mut self) {
        if self.selected_section > 0 {
            self.selected_section = self.selected_section.saturating_sub(1);
            self.selected_row = 0;
        }
    }

    /// Move selection to the next section
    pub fn move_right(&mut self) {
        if self.selected_section.saturating_add(1) < self.sections.len() {
            self.selected_section = self.selected_section.saturating_add(1);
            self.selected_row = 0;
        }
    }

    /// Move selection up (to previous row in section)
    pub fn move_up(&mut self) {
        self.selected_row = self.selected_row.saturating_sub(1);
    }

    /// Move selection down (to next row in section)
    pub fn move_down(&mut self) {
        let max_row = self.visible_rows().len().saturating_sub(1);
        if self.selected_row < max_row {
            self.selected_row = self.selected_row.saturating_add(1);
        }
    }

    /// Keep the row index within the selected section
    pub fn adjust_selection(&mut self) {
        let max_row = self.visible_rows().len().saturating_sub(1);
        if self.selected_row > max_row {
            self.selected_row = max_row;
        }
    }

    fn clamp_section(&mut self) {
        let max_section = self.sections.len().saturating_sub(1);
        if self.selected_section > max_section {
            self.selected_section = max_section;
        }
    }
}

// ============================================================================
// EVENT HANDLING: Dialog management
// ============================================================================

impl JournalApp {
    /// Show dialog to add a bullet to the selected section
    pub fn show_add_dialog(&mut self) {
        let collection = self.target_collection();
        self.input_dialog = Some(InputDialog {
            prompt: format!("New entry in {collection}:"),
            input: String::new(),
            action: InputAction::AddBullet { collection },
        });
    }

    /// Show dialog to nest a bullet under the selected row
    pub fn show_add_child_dialog(&mut self) {
        let Some(section) = self.current_section() else {
            return;
        };
        let collection = section.id.clone();
        let Some(parent_id) = self.selected_visible_row().and_then(|row| row.id) else {
            return;
        };
        self.input_dialog = Some(InputDialog {
            prompt: "New sub-entry:".to_string(),
            input: String::new(),
            action: InputAction::AddChild {
                collection,
                parent_id,
            },
        });
    }

    /// Show dialog to create a collection
    pub fn show_collection_dialog(&mut self) {
        self.input_dialog = Some(InputDialog {
            prompt: "New collection (use / to nest):".to_string(),
            input: String::new(),
            action: InputAction::AddCollection,
        });
    }

    /// Show dialog to confirm deleting the selected bullet
    pub fn show_delete_dialog(&mut self) {
        let Some(section) = self.current_section() else {
            return;
        };
        let collection = section.id.clone();
        let Some(row) = self.selected_visible_row() else {
            return;
        };
        let Some(id) = row.id else {
            return;
        };
        self.confirm_dialog = Some(ConfirmDialog {
            message: format!("Delete '{}' and its sub-entries?", row.label),
            action: ConfirmAction::DeleteBullet { collection, id },
        });
    }
}

// ============================================================================
// UPDATE HELPERS
// ============================================================================

/// Flatten a row forest into display rows with depth
pub fn visible_rows(rows: &[Bullet]) -> Vec<VisibleRow> {
    walk(rows)
        .into_iter()
        .map(|visit| VisibleRow {
            id: visit.bullet.id.clone(),
            depth: visit.depth,
            label: visit.bullet.label.clone(),
            kind: visit.bullet.kind,
            signifier: visit.bullet.signifier,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use jot_core::{model::CollectionMeta, CollectionRef, TreeOrder};

    use super::*;

    fn snapshot(names: &[&str], rows: &[(&str, Vec<Bullet>)]) -> Snapshot {
        let metas = names.iter().map(|name| CollectionMeta::generic(name)).collect();
        let sections = rows
            .iter()
            .map(|(id, rows)| Section::for_id(*id).with_rows(rows.clone()))
            .collect();
        Snapshot::from_parts(metas, sections, &TreeOrder::new(["Inbox"]))
    }

    fn app_with(names: &[&str], rows: &[(&str, Vec<Bullet>)]) -> JournalApp {
        let mut app = JournalApp::new(120);
        app.reload(snapshot(names, rows));
        app
    }

    #[test]
    fn test_reload_orders_sections_like_tree() {
        let app = app_with(
            &["Work", "Inbox"],
            &[("Work", vec![]), ("Inbox", vec![Bullet::new("a", "milk")])],
        );
        let ids: Vec<_> = app.sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["Inbox", "Work"]);
        assert_eq!(app.tree.len(), 2);
        assert_eq!(app.target_collection(), "Inbox");
    }

    #[test]
    fn test_reload_keeps_selection_by_id() {
        let rows = vec![Bullet::new("a", "one"), Bullet::new("b", "two")];
        let mut app = app_with(&["Inbox", "Work"], &[("Inbox", rows), ("Work", vec![])]);
        app.move_down();
        assert_eq!(app.selected_visible_row().and_then(|r| r.id), Some("b".to_string()));

        // A new row sorted before the selection must not move it.
        let rows = vec![
            Bullet::new("0", "zero"),
            Bullet::new("a", "one"),
            Bullet::new("b", "two"),
        ];
        app.reload(snapshot(&["Inbox", "Work"], &[("Inbox", rows), ("Work", vec![])]));
        assert_eq!(app.selected_row, 2);
    }

    #[test]
    fn test_selection_clamps_when_rows_vanish() {
        let rows = vec![Bullet::new("a", "one"), Bullet::new("b", "two")];
        let mut app = app_with(&["Inbox"], &[("Inbox", rows)]);
        app.move_down();
        app.reload(snapshot(&["Inbox"], &[("Inbox", vec![Bullet::new("a", "one")])]));
        assert_eq!(app.selected_row, 0);

        app.reload(snapshot(&[], &[]));
        assert!(app.current_section().is_none());
        assert_eq!(app.target_collection(), FALLBACK_COLLECTION);
    }

    #[test]
    fn test_section_navigation_bounds() {
        let mut app = app_with(&["Inbox", "Work"], &[("Inbox", vec![]), ("Work", vec![])]);
        app.move_left();
        assert_eq!(app.selected_section, 0);
        app.move_right();
        app.move_right();
        assert_eq!(app.selected_section, 1);
    }

    #[test]
    fn test_visible_rows_include_children_with_depth() {
        let rows = vec![Bullet::new("a", "trip").with_children(vec![Bullet::new("b", "book")])];
        let visible = visible_rows(&rows);
        assert_eq!(visible.len(), 2);
        assert_eq!(visible[1].depth, 1);
        assert_eq!(visible[1].id.as_deref(), Some("b"));
    }

    #[test]
    fn test_focus_events_do_not_force_reload() {
        let mut app = app_with(&["Inbox"], &[("Inbox", vec![])]);
        let focus = Event::FocusChanged {
            collection: Some("Inbox".to_string()),
            bullet: None,
        };
        assert!(!app.apply_events(&[focus]));

        let deleted = Event::CollectionDeleted {
            collection: CollectionRef::from(&CollectionMeta::generic("Inbox")),
        };
        assert!(app.apply_events(&[deleted]));
        assert_eq!(app.status.as_deref(), Some("Inbox was removed"));
    }

    #[test]
    fn test_delete_dialog_targets_selected_bullet() {
        let mut app = app_with(&["Inbox"], &[("Inbox", vec![Bullet::new("a", "milk")])]);
        app.show_delete_dialog();
        let dialog = app.confirm_dialog.expect("dialog shown");
        assert_eq!(
            dialog.action,
            ConfirmAction::DeleteBullet {
                collection: "Inbox".to_string(),
                id: "a".to_string()
            }
        );
    }
}
