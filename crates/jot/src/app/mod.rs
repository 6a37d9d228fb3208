//! Interactive journal view
//!
//! Shows the collection tree beside the selected section with:
//! - Live updates from the reconciling cache's event stream
//! - Vim-style keyboard navigation (hjkl)
//! - Optimistic entry actions (add, nest, toggle, delete)
//! - Responsive layout based on terminal width
//!
//! # Architecture
//!
//! The view module is organized into focused submodules:
//! - `types`: Core type definitions
//! - `state`: Selection and snapshot reloads
//! - `rendering`: UI rendering with ratatui
//! - `events`: Keyboard input handling
//! - `actions`: Action queue; cache mutation followed by store writes
//! - `terminal`: Terminal setup and event loop

mod actions;
mod events;
mod formatting;
mod layout;
mod rendering;
mod state;
mod terminal;
mod types;
mod widgets;

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;
use jot_core::{
    config::Config,
    model::{CollectionKind, SectionTemplate},
    FileStore, JournalStore, ReconcilingCache, ShutdownCoordinator,
};
pub use terminal::restore_terminal;
use actions::run_actions;
use terminal::{cleanup_terminal, run_event_loop, setup_terminal};
use tokio::sync::mpsc;
use types::{AppContext, JournalApp, FALLBACK_COLLECTION};

/// Collection whose section shows today's date
const TODAY_COLLECTION: &str = "Today";

/// Pending status messages from sync and actions
const STATUS_CAPACITY: usize = 16;

/// Queued store actions before keys are turned away
const ACTION_CAPACITY: usize = 32;

/// Run the interactive journal
///
/// # Errors
/// Returns error if:
/// - The journal directory cannot be opened
/// - The initial read fails
/// - Terminal setup, rendering or cleanup fails
pub async fn run(config: Config, coordinator: &ShutdownCoordinator) -> Result<()> {
    let store: Arc<dyn JournalStore> = Arc::new(
        FileStore::open(config.journal_dir.clone())
            .await
            .with_context(|| format!("Failed to open journal at {}", config.journal_dir.display()))?,
    );
    let (cache, events_rx) = ReconcilingCache::new(&config.cache, config.tree.order());
    let ctx = AppContext::new(Arc::new(cache), Arc::clone(&store));

    ctx.cache.register_section_template(
        TODAY_COLLECTION,
        SectionTemplate::new(
            TODAY_COLLECTION,
            Local::now().format("%A, %B %-d").to_string(),
        ),
    )?;
    store
        .ensure_collection(TODAY_COLLECTION, Some(CollectionKind::Daily))
        .await?;
    store.ensure_collection(FALLBACK_COLLECTION, None).await?;

    let loaded = ctx
        .sync
        .refresh()
        .await
        .context("Failed to read journal")?;
    tracing::info!(events = loaded, root = %config.journal_dir.display(), "journal loaded");

    let mut app = JournalApp::new(0);
    app.vim_keys = config.ui.vim_keys;
    app.reload(ctx.cache.snapshot());

    let (status_tx, status_rx) = mpsc::channel(STATUS_CAPACITY);
    let (actions_tx, actions_rx) = mpsc::channel(ACTION_CAPACITY);
    let runner = tokio::spawn(run_actions(ctx.clone(), actions_rx, status_tx.clone()));
    coordinator.register_task(runner).await;

    if config.watch.enabled {
        match store.watch(&config.watch, coordinator.subscribe()).await {
            Ok(signals) => {
                let worker = ctx.sync.clone();
                let task = tokio::spawn(worker.run(signals, status_tx, coordinator.subscribe()));
                coordinator.register_task(task).await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "watching disabled");
                app.set_status(format!("not watching for changes: {e}"));
            }
        }
    }

    let mut terminal = setup_terminal()?;
    app.terminal_width = terminal.size().map(|size| size.width).unwrap_or_default();

    let result = run_event_loop(
        &mut terminal,
        &mut app,
        &ctx,
        actions_tx,
        events_rx,
        status_rx,
        config.ui.tick(),
    )
    .await;

    cleanup_terminal(&mut terminal)?;
    coordinator.shutdown().await?;

    result
}
