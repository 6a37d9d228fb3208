//! Background reconciliation driven by change signals
//!
//! `Changed` re-reads one collection; `CatalogInvalidated` rebuilds a full
//! snapshot. Failures never stop the worker: they are logged and forwarded
//! as status text.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};

use crate::{
    cache::ReconcilingCache,
    shutdown::ShutdownSignal,
    snapshot::SnapshotBuilder,
    store::JournalStore,
    watcher::ChangeSignal,
    Result,
};

/// Applies change signals to a cache.
#[derive(Clone)]
pub struct SyncWorker {
    cache: Arc<ReconcilingCache>,
    store: Arc<dyn JournalStore>,
}

impl SyncWorker {
    pub fn new(cache: Arc<ReconcilingCache>, store: Arc<dyn JournalStore>) -> Self {
        Self { cache, store }
    }

    /// Handle one signal; returns the number of events published.
    pub async fn handle(&self, signal: &ChangeSignal) -> Result<usize> {
        match signal {
            ChangeSignal::Changed { collection } => {
                self.cache
                    .sync_collection(self.store.as_ref(), collection)
                    .await
            }
            ChangeSignal::CatalogInvalidated => self.refresh().await,
        }
    }

    /// Full cold read followed by `apply_snapshot`.
    pub async fn refresh(&self) -> Result<usize> {
        let snapshot = SnapshotBuilder::new(self.store.as_ref())
            .with_order(self.cache.order().clone())
            .with_templates(self.cache.templates())
            .build()
            .await?;
        Ok(self.cache.apply_snapshot(snapshot))
    }

    /// Consume signals until the stream closes or shutdown fires.
    ///
    /// Status messages are offered without waiting; if the interface is not
    /// keeping up they are dropped.
    pub async fn run(
        self,
        mut signals: mpsc::Receiver<ChangeSignal>,
        status: mpsc::Sender<String>,
        mut shutdown: broadcast::Receiver<ShutdownSignal>,
    ) {
        tracing::info!("sync worker started");
        loop {
            let signal = tokio::select! {
                biased;
                _ = shutdown.recv() => break,
                signal = signals.recv() => match signal {
                    Some(signal) => signal,
                    None => break,
                },
            };

            match self.handle(&signal).await {
                Ok(events) => tracing::debug!(?signal, events, "applied change signal"),
                Err(e) => {
                    tracing::warn!(?signal, error = %e, "sync failed");
                    let _ = status.try_send(format!("sync failed: {e}"));
                }
            }
        }
        tracing::info!("sync worker stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::CacheConfig,
        events::Event,
        model::Entry,
        store::MemoryStore,
        tree::TreeOrder,
    };

    fn setup() -> (SyncWorker, Arc<MemoryStore>, mpsc::Receiver<Event>) {
        let store = Arc::new(MemoryStore::new());
        let (cache, rx) = ReconcilingCache::new(&CacheConfig::default(), TreeOrder::default());
        let worker = SyncWorker::new(Arc::new(cache), store.clone());
        (worker, store, rx)
    }

    #[tokio::test]
    async fn test_changed_signal_syncs_one_collection() -> Result<()> {
        let (worker, store, mut rx) = setup();
        let entry = Entry::new("Today", "water plants");
        store.store(&entry).await?;

        let events = worker.handle(&ChangeSignal::changed("Today")).await?;
        assert_eq!(events, 1);
        assert!(matches!(
            rx.try_recv(),
            Ok(Event::BulletCreated { bullet }) if bullet.id == entry.id
        ));
        assert_eq!(store.read_count("Today"), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_catalog_signal_rebuilds_snapshot() -> Result<()> {
        let (worker, store, mut rx) = setup();
        store.ensure_collection("Inbox", None).await?;

        worker.handle(&ChangeSignal::CatalogInvalidated).await?;
        assert!(matches!(
            rx.try_recv(),
            Ok(Event::CollectionCreated { collection }) if collection.name == "Inbox"
        ));
        assert!(matches!(rx.try_recv(), Ok(Event::OrderChanged { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_failure_becomes_status_text() -> Result<()> {
        let (worker, store, _rx) = setup();
        store.fail_reads_for("Broken");
        let (signal_tx, signal_rx) = mpsc::channel(4);
        let (status_tx, mut status_rx) = mpsc::channel(4);
        let (_shutdown_tx, shutdown_rx) = broadcast::channel(1);

        let task = tokio::spawn(worker.run(signal_rx, status_tx, shutdown_rx));
        assert!(signal_tx.send(ChangeSignal::changed("Broken")).await.is_ok());
        drop(signal_tx);

        let status = status_rx.recv().await;
        assert!(status.is_some_and(|text| text.starts_with("sync failed")));
        assert!(task.await.is_ok());
        Ok(())
    }

    #[tokio::test]
    async fn test_unreadable_collection_keeps_cached_rows_on_refresh() -> Result<()> {
        let (worker, store, mut rx) = setup();
        store.ensure_collection("Inbox", None).await?;
        store.store(&Entry::new("Inbox", "buy milk")).await?;
        store.store(&Entry::new("Inbox", "call mom")).await?;
        worker.refresh().await?;
        while rx.try_recv().is_ok() {}

        store.fail_reads_for("Inbox");
        assert_eq!(worker.refresh().await?, 0);

        let mut deletes = 0;
        while let Ok(event) = rx.try_recv() {
            if matches!(event, Event::BulletDeleted { .. }) {
                deletes += 1;
            }
        }
        assert_eq!(deletes, 0);
        assert_eq!(
            worker.cache.section("Inbox").map(|s| s.rows.len()),
            Some(2)
        );
        Ok(())
    }
}
