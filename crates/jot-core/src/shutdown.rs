//! Graceful shutdown coordinator for jot.
//!
//! Handles SIGINT/SIGTERM and quit requests, and coordinates cleanup of:
//! - Watch sessions
//! - The sync worker

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
};

use crate::{Error, Result};

/// Shutdown signal that can be sent to all active operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    /// Graceful shutdown requested (quit, SIGINT, SIGTERM)
    Graceful,
    /// Force shutdown requested (timeout exceeded)
    Force,
}

/// Coordinator for graceful shutdown across all components
pub struct ShutdownCoordinator {
    /// Channel to broadcast shutdown signals
    shutdown_tx: broadcast::Sender<ShutdownSignal>,
    /// Spawned tasks that should finish before exit
    tasks: Arc<Mutex<Vec<JoinHandle<()>>>>,
    requested: AtomicBool,
    /// Time to wait for tasks before aborting them
    shutdown_timeout: Duration,
}

impl ShutdownCoordinator {
    /// Create a new shutdown coordinator
    pub fn new(shutdown_timeout: Duration) -> Self {
        let (shutdown_tx, _) = broadcast::channel(16);

        Self {
            shutdown_tx,
            tasks: Arc::new(Mutex::new(Vec::new())),
            requested: AtomicBool::new(false),
            shutdown_timeout,
        }
    }

    /// Get a receiver for shutdown signals
    ///
    /// Components should call this and listen in their async loops. Any
    /// result from `recv` (a signal, a closed channel, a lag) means stop.
    pub fn subscribe(&self) -> broadcast::Receiver<ShutdownSignal> {
        self.shutdown_tx.subscribe()
    }

    /// Register a task to wait for on shutdown
    pub async fn register_task(&self, task: JoinHandle<()>) {
        self.tasks.lock().await.push(task);
    }

    /// Initiate graceful shutdown
    ///
    /// Broadcasts `Graceful`, then waits for registered tasks. Tasks still
    /// running after the timeout are aborted and `Force` is broadcast.
    pub async fn shutdown(&self) -> Result<()> {
        if self.requested.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        tracing::info!("Initiating graceful shutdown...");
        let _ = self.shutdown_tx.send(ShutdownSignal::Graceful);

        let tasks: Vec<JoinHandle<()>> = self.tasks.lock().await.drain(..).collect();
        let aborts: Vec<_> = tasks.iter().map(JoinHandle::abort_handle).collect();

        let joined = tokio::time::timeout(
            self.shutdown_timeout,
            futures::future::join_all(tasks),
        )
        .await;

        match joined {
            Ok(results) => {
                let panicked = results
                    .iter()
                    .filter(|result| result.as_ref().is_err_and(|e| e.is_panic()))
                    .count();
                if panicked > 0 {
                    tracing::error!(panicked, "Tasks panicked during shutdown");
                    return Err(Error::io_error(format!(
                        "{panicked} background task(s) panicked during shutdown"
                    )));
                }
                tracing::info!("Graceful shutdown completed");
                Ok(())
            }
            Err(_) => {
                // Timeout exceeded - force shutdown
                tracing::warn!("Shutdown timeout exceeded, forcing shutdown");
                for handle in aborts {
                    handle.abort();
                }
                let _ = self.shutdown_tx.send(ShutdownSignal::Force);
                Ok(())
            }
        }
    }

    /// Check if shutdown has been requested
    pub fn is_shutting_down(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

/// Create signal channels for SIGINT and SIGTERM
///
/// Returns receivers that will receive a value when the signal is detected
pub async fn signal_channels() -> Result<(broadcast::Receiver<()>, broadcast::Receiver<()>)> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigint = signal(SignalKind::interrupt())
            .map_err(|e| Error::io_error(format!("Failed to setup SIGINT: {e}")))?;
        let mut sigterm = signal(SignalKind::terminate())
            .map_err(|e| Error::io_error(format!("Failed to setup SIGTERM: {e}")))?;

        let (sigint_tx, sigint_rx) = broadcast::channel(1);
        let (sigterm_tx, sigterm_rx) = broadcast::channel(1);

        // Spawn tasks to forward signals to the channels
        tokio::spawn(async move {
            let _ = sigint.recv().await;
            tracing::info!("Received SIGINT");
            let _ = sigint_tx.send(());
        });

        tokio::spawn(async move {
            let _ = sigterm.recv().await;
            tracing::info!("Received SIGTERM");
            let _ = sigterm_tx.send(());
        });

        Ok((sigint_rx, sigterm_rx))
    }

    #[cfg(not(unix))]
    {
        // On non-Unix platforms, use Ctrl-C
        let (sigint_tx, sigint_rx) = broadcast::channel(1);
        let (sigterm_tx, sigterm_rx) = broadcast::channel(1);

        tokio::spawn(async move {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Received Ctrl-C");
            let _ = sigint_tx.send(());
            // On non-Unix, treat both the same
            let _ = sigterm_tx.send(());
        });

        Ok((sigint_rx, sigterm_rx))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_shutdown_coordinator_creation() {
        let coordinator = ShutdownCoordinator::default();
        assert!(!coordinator.is_shutting_down());
    }

    #[tokio::test]
    async fn test_shutdown_subscription() {
        let coordinator = ShutdownCoordinator::default();
        let mut rx = coordinator.subscribe();

        let shutdown_result = coordinator.shutdown().await;
        assert!(shutdown_result.is_ok(), "shutdown should succeed");
        assert!(coordinator.is_shutting_down());

        match tokio::time::timeout(Duration::from_millis(100), rx.recv()).await {
            Ok(Ok(signal)) => assert_eq!(signal, ShutdownSignal::Graceful),
            Ok(Err(e)) => unreachable!("should not receive broadcast error: {e}"),
            Err(e) => unreachable!("should receive signal within timeout: {e}"),
        }
    }

    #[tokio::test]
    async fn test_registered_task_sees_signal_and_finishes() {
        let coordinator = ShutdownCoordinator::default();
        let mut rx = coordinator.subscribe();
        let task = tokio::spawn(async move {
            let _ = rx.recv().await;
        });
        coordinator.register_task(task).await;

        assert!(coordinator.shutdown().await.is_ok());
        assert!(coordinator.tasks.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_stuck_task_is_aborted_after_timeout() {
        let coordinator = ShutdownCoordinator::new(Duration::from_millis(20));
        let mut rx = coordinator.subscribe();
        let task = tokio::spawn(async {
            tokio::time::sleep(Duration::from_secs(60)).await;
        });
        coordinator.register_task(task).await;

        assert!(coordinator.shutdown().await.is_ok());
        assert_eq!(rx.recv().await.ok(), Some(ShutdownSignal::Graceful));
        assert_eq!(rx.recv().await.ok(), Some(ShutdownSignal::Force));
    }

    #[tokio::test]
    async fn test_second_shutdown_is_noop() {
        let coordinator = ShutdownCoordinator::default();
        let mut rx = coordinator.subscribe();
        assert!(coordinator.shutdown().await.is_ok());
        assert!(coordinator.shutdown().await.is_ok());
        assert_eq!(rx.recv().await.ok(), Some(ShutdownSignal::Graceful));
        assert!(rx.try_recv().is_err());
    }
}
