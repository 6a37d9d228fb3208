//! Persistence collaborators
//!
//! The cache and the snapshot builder only talk to [`JournalStore`]. Two
//! implementations ship with the crate:
//!
//! - [`FileStore`]: one directory per collection under a journal root, one
//!   JSON file per entry, plus an `index.json` catalog
//! - [`MemoryStore`]: everything in memory, with a hook to inject raw change
//!   signals

pub mod fs;
pub mod layout;
pub mod memory;

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{broadcast, mpsc};

use crate::{
    config::WatchConfig,
    model::{normalize_name, CollectionKind, CollectionMeta, Entry},
    shutdown::ShutdownSignal,
    watcher::ChangeSignal,
    Result,
};

pub use fs::FileStore;
pub use memory::MemoryStore;

/// Storage for entries and the collection catalog.
#[async_trait]
pub trait JournalStore: Send + Sync {
    /// Entries of one collection, in no particular order.
    async fn list_entries(&self, collection: &str) -> Result<Vec<Entry>>;

    /// Every stored entry.
    async fn list_all_entries(&self) -> Result<Vec<Entry>>;

    /// Every stored entry grouped by normalized collection name.
    async fn map_all_entries(&self) -> Result<HashMap<String, Vec<Entry>>> {
        let mut grouped: HashMap<String, Vec<Entry>> = HashMap::new();
        for entry in self.list_all_entries().await? {
            grouped
                .entry(normalize_name(&entry.collection))
                .or_default()
                .push(entry);
        }
        Ok(grouped)
    }

    /// Collections whose name starts with `prefix` (case-insensitive); an
    /// empty prefix lists everything.
    async fn list_collection_metas(&self, prefix: &str) -> Result<Vec<CollectionMeta>>;

    /// Insert or replace an entry. The collection is created if needed.
    async fn store(&self, entry: &Entry) -> Result<()>;

    /// Remove an entry. Removing a missing entry is not an error.
    async fn delete(&self, entry: &Entry) -> Result<()>;

    /// Create a collection if it does not exist and return its meta.
    async fn ensure_collection(
        &self,
        name: &str,
        kind: Option<CollectionKind>,
    ) -> Result<CollectionMeta>;

    async fn set_collection_kind(&self, name: &str, kind: CollectionKind) -> Result<()>;

    /// Start a watch session producing debounced change signals.
    async fn watch(
        &self,
        config: &WatchConfig,
        shutdown: broadcast::Receiver<ShutdownSignal>,
    ) -> Result<mpsc::Receiver<ChangeSignal>>;
}

/// Whether `name` falls under `prefix` for catalog listings.
pub(crate) fn matches_prefix(name: &str, prefix: &str) -> bool {
    normalize_name(name).starts_with(&normalize_name(prefix))
}
