//! Event handling
//!
//! Processes keyboard input and manages dialog interactions. Keys that need
//! the store become an [`Action`] for the action queue; the handler itself
//! never waits on I/O.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::types::{
    Action, AppContext, ConfirmAction, ConfirmDialog, InputAction, InputDialog, JournalApp,
};

/// Handle keyboard input, returning the store work it asks for
pub fn handle_key_event(app: &mut JournalApp, ctx: &AppContext, key: KeyEvent) -> Option<Action> {
    // Handle dialogs first
    let action = if let Some(dialog) = app.input_dialog.take() {
        handle_input_dialog(app, dialog, key)
    } else if let Some(dialog) = app.confirm_dialog.take() {
        handle_confirm_dialog(app, dialog, key)
    } else {
        handle_normal_key(app, key)
    };

    let (collection, bullet) = app.focus();
    ctx.cache.set_focus(collection.as_deref(), bullet.as_deref());
    action
}

/// Handle normal keyboard input (no active dialogs)
fn handle_normal_key(app: &mut JournalApp, key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => {
            app.should_quit = true;
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }
        KeyCode::Left => app.move_left(),
        KeyCode::Right => app.move_right(),
        KeyCode::Down => app.move_down(),
        KeyCode::Up => app.move_up(),
        KeyCode::Char('h') if app.vim_keys => app.move_left(),
        KeyCode::Char('l') if app.vim_keys => app.move_right(),
        KeyCode::Char('j') if app.vim_keys => app.move_down(),
        KeyCode::Char('k') if app.vim_keys => app.move_up(),
        KeyCode::Char('a') => app.show_add_dialog(),
        KeyCode::Char('A') => app.show_add_child_dialog(),
        KeyCode::Char('c') => app.show_collection_dialog(),
        KeyCode::Char('d') => app.show_delete_dialog(),
        KeyCode::Char('x') => {
            return app
                .current_section()
                .map(|s| s.id.clone())
                .zip(app.selected_visible_row().and_then(|row| row.id))
                .map(|(collection, id)| Action::ToggleBullet { collection, id });
        }
        KeyCode::Char('r') => return Some(Action::Refresh),
        _ => {}
    }
    None
}

/// Handle input dialog events
fn handle_input_dialog(
    app: &mut JournalApp,
    mut dialog: InputDialog,
    key: KeyEvent,
) -> Option<Action> {
    match key.code {
        KeyCode::Enter => {
            let input = dialog.input.trim();
            if input.is_empty() {
                app.input_dialog = Some(dialog);
                return None;
            }
            let label = input.to_string();
            return Some(match dialog.action {
                InputAction::AddBullet { collection } => Action::AddBullet {
                    collection,
                    parent_id: None,
                    label,
                },
                InputAction::AddChild {
                    collection,
                    parent_id,
                } => Action::AddBullet {
                    collection,
                    parent_id: Some(parent_id),
                    label,
                },
                InputAction::AddCollection => Action::AddCollection { name: label },
            });
        }
        KeyCode::Esc => {
            // Dialog already taken, just return
        }
        KeyCode::Char(c) => {
            dialog.input.push(c);
            app.input_dialog = Some(dialog);
        }
        KeyCode::Backspace => {
            dialog.input.pop();
            app.input_dialog = Some(dialog);
        }
        _ => {
            app.input_dialog = Some(dialog);
        }
    }
    None
}

/// Handle confirmation dialog events
fn handle_confirm_dialog(
    app: &mut JournalApp,
    dialog: ConfirmDialog,
    key: KeyEvent,
) -> Option<Action> {
    match key.code {
        KeyCode::Char('y' | 'Y') => match dialog.action {
            ConfirmAction::DeleteBullet { collection, id } => {
                return Some(Action::DeleteBullet { collection, id });
            }
        },
        KeyCode::Char('n' | 'N') | KeyCode::Esc => {
            // Dialog already taken, just return
        }
        _ => {
            // Restore dialog if other key pressed
            app.confirm_dialog = Some(dialog);
        }
    }
    None
}
