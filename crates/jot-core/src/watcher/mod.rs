//! Change watching for the journal directory
//!
//! Monitors the journal root and every bucket directory under it, classifies
//! each notification as "this collection changed" or "the catalog may have
//! changed", and coalesces bursts with a trailing-edge debounce.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use jot_core::{
//!     config::WatchConfig,
//!     shutdown::ShutdownCoordinator,
//!     watcher::{ChangeSignal, CollectionWatcher},
//! };
//!
//! # async fn example() -> jot_core::Result<()> {
//! let coordinator = ShutdownCoordinator::default();
//! let watcher = CollectionWatcher::new("/path/to/journal", Arc::new(|dir: &str| Some(dir.to_string())));
//! let mut rx = watcher.start(&WatchConfig::default(), coordinator.subscribe())?;
//!
//! while let Some(signal) = rx.recv().await {
//!     match signal {
//!         ChangeSignal::Changed { collection } => println!("{collection} changed"),
//!         ChangeSignal::CatalogInvalidated => println!("reload everything"),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

// ═══════════════════════════════════════════════════════════════════════════
// MODULE DEFINITIONS
// ═══════════════════════════════════════════════════════════════════════════

pub mod callbacks;
pub mod debounce;
pub mod state;
pub mod watching;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════════
// TYPES
// ═══════════════════════════════════════════════════════════════════════════

/// A debounced hint that stored data changed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChangeSignal {
    /// Entries of one collection changed.
    Changed { collection: String },
    /// The set of collections may have changed; re-read everything.
    CatalogInvalidated,
}

impl ChangeSignal {
    pub fn changed(collection: impl Into<String>) -> Self {
        Self::Changed {
            collection: collection.into(),
        }
    }
}

/// Maps a bucket directory name to the collection it stores.
pub type BucketDecoder = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

// ═══════════════════════════════════════════════════════════════════════════
// RE-EXPORTS
// ═══════════════════════════════════════════════════════════════════════════

pub use callbacks::{classify, Classified};
pub use debounce::{debounce_signals, Debouncer};
pub use state::{WatchRegistry, WatcherState};
pub use watching::CollectionWatcher;
