//! Type definitions for the journal view
//!
//! Contains the app state, the services it talks to, and dialog types.

use std::{sync::Arc, time::Instant};

use jot_core::{
    model::{BulletKind, Section, Signifier},
    JournalStore, ReconcilingCache, SyncWorker,
};

/// Cache, store and sync worker shared by the view and its actions
#[derive(Clone)]
pub struct AppContext {
    pub cache: Arc<ReconcilingCache>,
    pub store: Arc<dyn JournalStore>,
    pub sync: SyncWorker,
}

impl AppContext {
    pub fn new(cache: Arc<ReconcilingCache>, store: Arc<dyn JournalStore>) -> Self {
        let sync = SyncWorker::new(Arc::clone(&cache), Arc::clone(&store));
        Self { cache, store, sync }
    }
}

/// One line of the collection tree pane
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeLine {
    pub depth: usize,
    /// Full collection name
    pub id: String,
    /// Last segment of the name
    pub label: String,
    pub implicit: bool,
}

/// One row of the selected section, flattened with its depth
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleRow {
    pub id: Option<String>,
    pub depth: usize,
    pub label: String,
    pub kind: BulletKind,
    pub signifier: Signifier,
}

/// Journal application state
#[derive(Debug)]
pub struct JournalApp {
    /// Sections in tree order
    pub sections: Vec<Section>,
    /// Collection tree, pre-order
    pub tree: Vec<TreeLine>,
    /// Index into `sections`
    pub selected_section: usize,
    /// Index into the selected section's visible rows
    pub selected_row: usize,
    /// Terminal width for responsive layout
    pub terminal_width: u16,
    /// Last time the view was rebuilt from the cache
    pub last_update: Instant,
    /// Last status or error message
    pub status: Option<String>,
    /// Whether to quit the application
    pub should_quit: bool,
    /// Accept h/j/k/l besides the arrow keys
    pub vim_keys: bool,
    /// Confirmation dialog state
    pub confirm_dialog: Option<ConfirmDialog>,
    /// Input dialog state
    pub input_dialog: Option<InputDialog>,
}

/// Confirmation dialog for destructive actions
#[derive(Debug, Clone)]
pub struct ConfirmDialog {
    pub message: String,
    pub action: ConfirmAction,
}

/// Action to perform on confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteBullet { collection: String, id: String },
}

/// Input dialog for new entries and collections
#[derive(Debug, Clone)]
pub struct InputDialog {
    pub prompt: String,
    pub input: String,
    pub action: InputAction,
}

/// Action to perform with input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    AddBullet { collection: String },
    AddChild { collection: String, parent_id: String },
    AddCollection,
}

/// Store-backed work queued by the key handler and run off the UI loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    AddBullet {
        collection: String,
        parent_id: Option<String>,
        label: String,
    },
    AddCollection { name: String },
    ToggleBullet { collection: String, id: String },
    DeleteBullet { collection: String, id: String },
    Refresh,
}

/// Collection that receives entries when the journal is empty
pub const FALLBACK_COLLECTION: &str = "Inbox";

/// Minimum terminal width for showing the tree pane
pub const WIDE_TERMINAL_THRESHOLD: u16 = 100;
