//! Watch sessions over the journal directory
//!
//! A session owns one `notify` watcher. The notify callback runs on its own
//! thread and hands raw events to the async worker through a bounded
//! channel; if that channel is full, the worker raises a catalog
//! invalidation on its next turn instead of losing the change silently.

use std::{
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::{broadcast, mpsc};
use walkdir::WalkDir;

use super::{
    callbacks::classify,
    debounce::debounce_signals,
    state::{SharedState, WatchRegistry, WatcherState},
    BucketDecoder, ChangeSignal,
};
use crate::{config::WatchConfig, shutdown::ShutdownSignal, Error, Result};

// ═══════════════════════════════════════════════════════════════════════════
// TYPES
// ═══════════════════════════════════════════════════════════════════════════

/// Watches a journal root and its bucket directories.
pub struct CollectionWatcher {
    base: PathBuf,
    decoder: BucketDecoder,
    state: SharedState,
}

// ═══════════════════════════════════════════════════════════════════════════
// PUBLIC API
// ═══════════════════════════════════════════════════════════════════════════

impl CollectionWatcher {
    pub fn new(base: impl Into<PathBuf>, decoder: BucketDecoder) -> Self {
        Self {
            base: base.into(),
            decoder,
            state: SharedState::new(),
        }
    }

    pub fn state(&self) -> WatcherState {
        self.state.get()
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Register watches and start the session.
    ///
    /// Returns the debounced signal stream. The stream closes once the
    /// shutdown channel fires, closes, or lags.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Watcher is disabled in config
    /// - Debounce duration is outside 10-5000ms
    /// - The session was already started
    /// - Any watch registration fails
    pub fn start(
        &self,
        config: &WatchConfig,
        shutdown: broadcast::Receiver<ShutdownSignal>,
    ) -> Result<mpsc::Receiver<ChangeSignal>> {
        if !config.enabled {
            return Err(Error::invalid_config("File watcher is disabled"));
        }

        // Validate debounce_ms is in acceptable range (10-5000ms)
        if !(10..=5000).contains(&config.debounce_ms) {
            return Err(Error::invalid_config(format!(
                "debounce_ms must be between 10 and 5000, got {}",
                config.debounce_ms
            )));
        }

        if self.state.get() != WatcherState::Uninitialized {
            return Err(Error::invalid_input(format!(
                "watch session for {} already {}",
                self.base.display(),
                self.state.get()
            )));
        }

        let capacity = config.channel_capacity.max(1);
        let (bridge_tx, bridge_rx) = mpsc::channel::<notify::Result<notify::Event>>(capacity);
        let overflowed = Arc::new(AtomicBool::new(false));

        let flag = Arc::clone(&overflowed);
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<notify::Event>| match bridge_tx.try_send(res) {
                Ok(()) | Err(mpsc::error::TrySendError::Closed(_)) => {}
                Err(mpsc::error::TrySendError::Full(_)) => flag.store(true, Ordering::Relaxed),
            },
            notify::Config::default(),
        )
        .map_err(|e| Error::watcher_setup(self.base.display().to_string(), e.to_string()))?;

        let mut registry = WatchRegistry::default();
        register(&mut watcher, &self.base, RecursiveMode::NonRecursive)?;
        for dir in bucket_dirs(&self.base) {
            register(&mut watcher, &dir, RecursiveMode::NonRecursive)?;
            registry.insert(dir);
        }

        let (raw_tx, raw_rx) = mpsc::channel(capacity);
        let output = debounce_signals(raw_rx, config.debounce(), capacity, shutdown.resubscribe());

        self.state.set(WatcherState::Watching);
        tracing::info!(
            base = %self.base.display(),
            buckets = registry.len(),
            "watching journal"
        );

        let worker = Worker {
            base: self.base.clone(),
            decoder: Arc::clone(&self.decoder),
            state: self.state.clone(),
            watcher,
            registry,
            overflowed,
        };
        tokio::spawn(worker.run(bridge_rx, raw_tx, shutdown));

        Ok(output)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// WORKER
// ═══════════════════════════════════════════════════════════════════════════

struct Worker {
    base: PathBuf,
    decoder: BucketDecoder,
    state: SharedState,
    watcher: RecommendedWatcher,
    registry: WatchRegistry,
    overflowed: Arc<AtomicBool>,
}

impl Worker {
    async fn run(
        mut self,
        mut bridge: mpsc::Receiver<notify::Result<notify::Event>>,
        raw: mpsc::Sender<ChangeSignal>,
        mut shutdown: broadcast::Receiver<ShutdownSignal>,
    ) {
        loop {
            if let Some(signal) = self.take_overflow() {
                if raw.send(signal).await.is_err() {
                    break;
                }
            }

            let signals = tokio::select! {
                biased;
                _ = shutdown.recv() => break,
                received = bridge.recv() => match received {
                    Some(item) => self.on_received(item),
                    None => break,
                },
            };

            let mut closed = false;
            for signal in signals {
                if raw.send(signal).await.is_err() {
                    closed = true;
                    break;
                }
            }
            if closed {
                break;
            }
        }

        for dir in self.registry.drain() {
            let _ = self.watcher.unwatch(&dir);
        }
        let _ = self.watcher.unwatch(&self.base);
        self.state.set(WatcherState::Stopped);
        tracing::info!(base = %self.base.display(), "stopped watching journal");
    }

    /// Invalidation owed for notifications dropped on a full bridge.
    fn take_overflow(&self) -> Option<ChangeSignal> {
        if !self.overflowed.swap(false, Ordering::Relaxed) {
            return None;
        }
        tracing::warn!("notification bridge overflowed, invalidating catalog");
        Some(ChangeSignal::CatalogInvalidated)
    }

    /// Map one bridge item to signals. Notification errors leave the watched
    /// state unknown, so they invalidate the whole catalog.
    fn on_received(&mut self, item: notify::Result<notify::Event>) -> Vec<ChangeSignal> {
        match item {
            Ok(event) => self.handle(&event),
            Err(e) => {
                tracing::warn!(error = %e, "notification error, invalidating catalog");
                vec![ChangeSignal::CatalogInvalidated]
            }
        }
    }

    fn handle(&mut self, event: &notify::Event) -> Vec<ChangeSignal> {
        let classified = classify(event, &self.base, &self.registry, &self.decoder);

        for dir in classified.new_dirs {
            match register(&mut self.watcher, &dir, RecursiveMode::NonRecursive) {
                Ok(()) => {
                    self.registry.insert(dir);
                }
                Err(e) => tracing::warn!(error = %e, "failed to watch new bucket"),
            }
        }
        for dir in classified.removed_dirs {
            self.registry.remove(&dir);
            // The OS has usually dropped the watch already.
            let _ = self.watcher.unwatch(&dir);
        }
        classified.signals
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// HELPERS
// ═══════════════════════════════════════════════════════════════════════════

fn register(watcher: &mut RecommendedWatcher, path: &Path, mode: RecursiveMode) -> Result<()> {
    watcher
        .watch(path, mode)
        .map_err(|e| Error::watcher_setup(path.display().to_string(), e.to_string()))
}

/// Existing bucket directories directly under `base`.
fn bucket_dirs(base: &Path) -> Vec<PathBuf> {
    WalkDir::new(base)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable directory entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_dir())
        .map(walkdir::DirEntry::into_path)
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> BucketDecoder {
        Arc::new(|name: &str| Some(name.to_string()))
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Test 1: Watcher with disabled config returns error
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    #[tokio::test]
    async fn test_watcher_disabled() {
        let config = WatchConfig {
            enabled: false,
            ..WatchConfig::default()
        };
        let (_tx, rx) = broadcast::channel(1);

        let watcher = CollectionWatcher::new("/nonexistent", identity());
        let result = watcher.start(&config, rx);
        assert!(matches!(result, Err(Error::Validation(_))));
        assert_eq!(watcher.state(), WatcherState::Uninitialized);
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Test 2: Invalid debounce_ms
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    #[tokio::test]
    async fn test_watcher_invalid_debounce() {
        for debounce_ms in [5, 10_000] {
            let config = WatchConfig {
                debounce_ms,
                ..WatchConfig::default()
            };
            let (_tx, rx) = broadcast::channel(1);
            let result = CollectionWatcher::new("/nonexistent", identity()).start(&config, rx);
            assert!(matches!(result, Err(Error::Validation(_))));
        }
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Test 3: Missing base directory is a setup error
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    #[tokio::test]
    async fn test_missing_base_is_setup_error() {
        let (_tx, rx) = broadcast::channel(1);
        let watcher = CollectionWatcher::new("/nonexistent/jot/journal", identity());
        let result = watcher.start(&WatchConfig::default(), rx);
        assert!(matches!(result, Err(Error::System(_))));
        assert_eq!(watcher.state(), WatcherState::Uninitialized);
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Test 4: Bucket discovery
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    #[test]
    fn test_bucket_dirs_lists_only_direct_subdirectories() -> std::io::Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::create_dir_all(dir.path().join("Inbox/nested"))?;
        std::fs::create_dir(dir.path().join("Today"))?;
        std::fs::write(dir.path().join("index.json"), "[]")?;

        let mut found = bucket_dirs(dir.path());
        found.sort();
        assert_eq!(found, vec![dir.path().join("Inbox"), dir.path().join("Today")]);
        Ok(())
    }

    fn idle_worker(base: &Path) -> notify::Result<Worker> {
        let watcher = RecommendedWatcher::new(
            |_: notify::Result<notify::Event>| {},
            notify::Config::default(),
        )?;
        Ok(Worker {
            base: base.to_path_buf(),
            decoder: identity(),
            state: SharedState::new(),
            watcher,
            registry: WatchRegistry::default(),
            overflowed: Arc::new(AtomicBool::new(false)),
        })
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Test 5: Notification errors invalidate the catalog
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    #[test]
    fn test_notification_error_invalidates_catalog() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let mut worker = idle_worker(dir.path())?;

        let signals = worker.on_received(Err(notify::Error::generic("inotify queue overflow")));
        assert_eq!(signals, vec![ChangeSignal::CatalogInvalidated]);
        assert_eq!(worker.take_overflow(), None);
        Ok(())
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Test 6: A full bridge invalidates the catalog on the next turn
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    #[tokio::test]
    async fn test_bridge_overflow_invalidates_catalog() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let worker = idle_worker(dir.path())?;
        worker.overflowed.store(true, Ordering::Relaxed);
        let overflowed = Arc::clone(&worker.overflowed);
        let state = worker.state.clone();

        let (bridge_tx, bridge_rx) = mpsc::channel(4);
        let (raw_tx, mut raw_rx) = mpsc::channel(4);
        let (_shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let handle = tokio::spawn(worker.run(bridge_rx, raw_tx, shutdown_rx));

        let first =
            tokio::time::timeout(std::time::Duration::from_secs(2), raw_rx.recv()).await?;
        assert_eq!(first, Some(ChangeSignal::CatalogInvalidated));
        assert!(!overflowed.load(Ordering::Relaxed));

        drop(bridge_tx);
        handle.await?;
        assert_eq!(raw_rx.recv().await, None);
        assert_eq!(state.get(), WatcherState::Stopped);
        Ok(())
    }
}
