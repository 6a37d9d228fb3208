//! Watcher lifecycle state and the registry of watched directories

use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
    sync::{Arc, PoisonError, RwLock},
};

use strum::Display;

// ═══════════════════════════════════════════════════════════════════════════
// TYPES
// ═══════════════════════════════════════════════════════════════════════════

/// Lifecycle of one watch session.
///
/// `Uninitialized` → `Watching` → `Stopped`; there is no way back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum WatcherState {
    Uninitialized,
    Watching,
    Stopped,
}

/// State cell shared between a watcher handle and its worker.
#[derive(Debug, Clone)]
pub(crate) struct SharedState(Arc<RwLock<WatcherState>>);

impl SharedState {
    pub(crate) fn new() -> Self {
        Self(Arc::new(RwLock::new(WatcherState::Uninitialized)))
    }

    pub(crate) fn get(&self) -> WatcherState {
        *self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn set(&self, next: WatcherState) {
        let mut state = self.0.write().unwrap_or_else(PoisonError::into_inner);
        tracing::debug!(from = %*state, to = %next, "watcher state transition");
        *state = next;
    }
}

/// Directories currently under watch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchRegistry {
    dirs: BTreeSet<PathBuf>,
}

impl WatchRegistry {
    pub fn insert(&mut self, dir: PathBuf) -> bool {
        self.dirs.insert(dir)
    }

    pub fn remove(&mut self, dir: &Path) -> bool {
        self.dirs.remove(dir)
    }

    pub fn contains(&self, dir: &Path) -> bool {
        self.dirs.contains(dir)
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = PathBuf> + '_ {
        std::mem::take(&mut self.dirs).into_iter()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_display() {
        assert_eq!(WatcherState::Watching.to_string(), "watching");
    }

    #[test]
    fn test_shared_state_transitions() {
        let state = SharedState::new();
        let handle = state.clone();
        assert_eq!(state.get(), WatcherState::Uninitialized);
        handle.set(WatcherState::Watching);
        assert_eq!(state.get(), WatcherState::Watching);
    }

    #[test]
    fn test_registry_insert_remove() {
        let mut registry = WatchRegistry::default();
        assert!(registry.insert(PathBuf::from("/j/Inbox")));
        assert!(!registry.insert(PathBuf::from("/j/Inbox")));
        assert!(registry.contains(Path::new("/j/Inbox")));
        assert!(registry.remove(Path::new("/j/Inbox")));
        assert!(registry.is_empty());
    }
}
