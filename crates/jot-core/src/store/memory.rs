//! In-memory store
//!
//! Used by tests and when no journal directory is available. Its watch
//! session debounces signals pushed through [`MemoryStore::inject`], which
//! stands in for filesystem notifications.

use std::{
    collections::{HashMap, HashSet},
    sync::{Mutex, PoisonError},
};

use async_trait::async_trait;
use itertools::Itertools;
use tokio::sync::{broadcast, mpsc};

use super::{matches_prefix, JournalStore};
use crate::{
    config::WatchConfig,
    model::{canonical_name, normalize_name, CollectionKind, CollectionMeta, Entry},
    shutdown::ShutdownSignal,
    watcher::{debounce_signals, ChangeSignal},
    Error, Result,
};

#[derive(Debug, Default)]
struct MemoryState {
    metas: Vec<CollectionMeta>,
    /// Entries keyed by normalized collection name.
    entries: HashMap<String, Vec<Entry>>,
    reads: HashMap<String, usize>,
    failing: HashSet<String>,
}

impl MemoryState {
    fn ensure(&mut self, name: &str, kind: Option<CollectionKind>) -> Result<CollectionMeta> {
        let name = canonical_name(name);
        if name.is_empty() {
            return Err(Error::invalid_input("collection name is empty"));
        }
        let key = normalize_name(&name);
        if let Some(existing) = self.metas.iter().find(|meta| meta.key() == key) {
            return Ok(existing.clone());
        }
        let meta = CollectionMeta::new(&name, kind.unwrap_or_default());
        self.metas.push(meta.clone());
        Ok(meta)
    }
}

/// Journal kept entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
    raw: Mutex<Option<mpsc::Sender<ChangeSignal>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Push a raw change signal into the active watch session. Returns false
    /// when no session is running or its input is full.
    pub fn inject(&self, signal: ChangeSignal) -> bool {
        let raw = self.raw.lock().unwrap_or_else(PoisonError::into_inner);
        raw.as_ref()
            .is_some_and(|tx| tx.try_send(signal).is_ok())
    }

    /// How many times `list_entries` was called for `collection`.
    pub fn read_count(&self, collection: &str) -> usize {
        self.state()
            .reads
            .get(&normalize_name(collection))
            .copied()
            .unwrap_or(0)
    }

    /// Make every read of `collection` fail from now on.
    pub fn fail_reads_for(&self, collection: &str) {
        self.state().failing.insert(normalize_name(collection));
    }
}

#[async_trait]
impl JournalStore for MemoryStore {
    async fn list_entries(&self, collection: &str) -> Result<Vec<Entry>> {
        let key = normalize_name(collection);
        let mut state = self.state();
        *state.reads.entry(key.clone()).or_default() += 1;
        if state.failing.contains(&key) {
            return Err(Error::store_error(format!(
                "reads of {collection} are failing"
            )));
        }
        Ok(state.entries.get(&key).cloned().unwrap_or_default())
    }

    async fn list_all_entries(&self) -> Result<Vec<Entry>> {
        Ok(self
            .state()
            .entries
            .values()
            .flatten()
            .cloned()
            .sorted_by(|a, b| {
                a.collection
                    .cmp(&b.collection)
                    .then_with(|| a.created_at.cmp(&b.created_at))
            })
            .collect())
    }

    async fn list_collection_metas(&self, prefix: &str) -> Result<Vec<CollectionMeta>> {
        Ok(self
            .state()
            .metas
            .iter()
            .filter(|meta| matches_prefix(&meta.name, prefix))
            .cloned()
            .collect())
    }

    async fn store(&self, entry: &Entry) -> Result<()> {
        let mut state = self.state();
        let meta = state.ensure(&entry.collection, None)?;
        let mut stored = entry.clone();
        stored.collection.clone_from(&meta.name);

        let bucket = state.entries.entry(meta.key()).or_default();
        match bucket.iter_mut().find(|existing| existing.id == stored.id) {
            Some(existing) => *existing = stored,
            None => bucket.push(stored),
        }
        Ok(())
    }

    async fn delete(&self, entry: &Entry) -> Result<()> {
        let mut state = self.state();
        if let Some(bucket) = state.entries.get_mut(&normalize_name(&entry.collection)) {
            bucket.retain(|existing| existing.id != entry.id);
        }
        Ok(())
    }

    async fn ensure_collection(
        &self,
        name: &str,
        kind: Option<CollectionKind>,
    ) -> Result<CollectionMeta> {
        self.state().ensure(name, kind)
    }

    async fn set_collection_kind(&self, name: &str, kind: CollectionKind) -> Result<()> {
        let key = normalize_name(name);
        let mut state = self.state();
        let meta = state
            .metas
            .iter_mut()
            .find(|meta| meta.key() == key)
            .ok_or_else(|| Error::not_found(format!("collection {name}")))?;
        meta.kind = kind;
        Ok(())
    }

    async fn watch(
        &self,
        config: &WatchConfig,
        shutdown: broadcast::Receiver<ShutdownSignal>,
    ) -> Result<mpsc::Receiver<ChangeSignal>> {
        if !config.enabled {
            return Err(Error::invalid_config("File watcher is disabled"));
        }
        let (tx, rx) = mpsc::channel(config.channel_capacity.max(1));
        *self.raw.lock().unwrap_or_else(PoisonError::into_inner) = Some(tx);
        Ok(debounce_signals(
            rx,
            config.debounce(),
            config.channel_capacity,
            shutdown,
        ))
    }
}
