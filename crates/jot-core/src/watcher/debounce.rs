//! Trailing-edge debounce
//!
//! [`Debouncer`] holds the pending signals and a single deadline. The window
//! opens with the first pending signal and is not pushed back by later ones,
//! so a continuous stream of writes still flushes once per window.

use std::{collections::HashSet, time::Duration};

use tokio::{
    sync::{broadcast, mpsc},
    time::{sleep_until, Instant},
};

use super::ChangeSignal;
use crate::shutdown::ShutdownSignal;

/// Pending signals plus one deadline.
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    pending: Vec<ChangeSignal>,
    seen: HashSet<ChangeSignal>,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: Vec::new(),
            seen: HashSet::new(),
            deadline: None,
        }
    }

    /// Record a signal. Returns false when an identical signal is already
    /// pending.
    pub fn push(&mut self, signal: ChangeSignal, now: Instant) -> bool {
        if !self.seen.insert(signal.clone()) {
            return false;
        }
        self.pending.push(signal);
        if self.deadline.is_none() {
            self.deadline = Some(now + self.window);
        }
        true
    }

    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Release every pending signal in first-seen order and close the window.
    pub fn flush(&mut self) -> Vec<ChangeSignal> {
        self.seen.clear();
        self.deadline = None;
        std::mem::take(&mut self.pending)
    }
}

/// Debounce a raw signal stream on a background task.
///
/// The output closes when the shutdown channel fires (or closes or lags),
/// or when `raw` closes, in which case pending signals are flushed first.
pub fn debounce_signals(
    mut raw: mpsc::Receiver<ChangeSignal>,
    window: Duration,
    capacity: usize,
    mut shutdown: broadcast::Receiver<ShutdownSignal>,
) -> mpsc::Receiver<ChangeSignal> {
    let (tx, rx) = mpsc::channel(capacity.max(1));

    tokio::spawn(async move {
        let mut debouncer = Debouncer::new(window);
        loop {
            let deadline = debouncer.deadline();
            tokio::select! {
                biased;
                _ = shutdown.recv() => {
                    tracing::debug!(pending = debouncer.pending.len(), "debounce cancelled");
                    break;
                }
                () = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    if !forward(&tx, debouncer.flush()).await {
                        break;
                    }
                }
                signal = raw.recv() => match signal {
                    Some(signal) => {
                        debouncer.push(signal, Instant::now());
                    }
                    None => {
                        let _ = forward(&tx, debouncer.flush()).await;
                        break;
                    }
                },
            }
        }
    });

    rx
}

async fn forward(tx: &mpsc::Sender<ChangeSignal>, signals: Vec<ChangeSignal>) -> bool {
    for signal in signals {
        tracing::debug!(?signal, "releasing debounced signal");
        if tx.send(signal).await.is_err() {
            return false;
        }
    }
    true
}

// ═══════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(100);

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Test 1: Duplicates collapse, order is first-seen
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    #[test]
    fn test_duplicates_collapse_in_first_seen_order() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);
        assert!(debouncer.push(ChangeSignal::changed("Today"), start));
        assert!(debouncer.push(ChangeSignal::CatalogInvalidated, start));
        assert!(!debouncer.push(ChangeSignal::changed("Today"), start));
        assert!(debouncer.push(ChangeSignal::changed("Inbox"), start));

        assert_eq!(
            debouncer.flush(),
            vec![
                ChangeSignal::changed("Today"),
                ChangeSignal::CatalogInvalidated,
                ChangeSignal::changed("Inbox"),
            ]
        );
        assert!(debouncer.is_empty());
        assert_eq!(debouncer.deadline(), None);
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Test 2: Window is fixed from the first signal
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    #[test]
    fn test_window_not_extended_by_later_signals() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);
        debouncer.push(ChangeSignal::changed("Today"), start);
        debouncer.push(
            ChangeSignal::changed("Inbox"),
            start + Duration::from_millis(90),
        );

        assert_eq!(debouncer.deadline(), Some(start + WINDOW));
        assert!(!debouncer.is_due(start + Duration::from_millis(99)));
        assert!(debouncer.is_due(start + WINDOW));
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Test 3: Signal after a flush is pending again
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    #[test]
    fn test_signal_after_flush_reopens_window() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);
        debouncer.push(ChangeSignal::changed("Today"), start);
        let _ = debouncer.flush();

        let later = start + Duration::from_secs(1);
        assert!(debouncer.push(ChangeSignal::changed("Today"), later));
        assert_eq!(debouncer.deadline(), Some(later + WINDOW));
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Test 4: Background debounce collapses a burst
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    #[tokio::test(start_paused = true)]
    async fn test_burst_yields_one_signal() {
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let (raw_tx, raw_rx) = mpsc::channel(16);
        let mut out = debounce_signals(raw_rx, WINDOW, 16, shutdown_rx);

        for _ in 0..5 {
            assert!(raw_tx.send(ChangeSignal::changed("Today")).await.is_ok());
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        assert_eq!(out.recv().await, Some(ChangeSignal::changed("Today")));
        assert!(out.try_recv().is_err());

        let _ = shutdown_tx.send(ShutdownSignal::Graceful);
        assert_eq!(out.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_input_flushes_pending() {
        let (_shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let (raw_tx, raw_rx) = mpsc::channel(16);
        let mut out = debounce_signals(raw_rx, WINDOW, 16, shutdown_rx);

        assert!(raw_tx.send(ChangeSignal::CatalogInvalidated).await.is_ok());
        drop(raw_tx);

        assert_eq!(out.recv().await, Some(ChangeSignal::CatalogInvalidated));
        assert_eq!(out.recv().await, None);
    }
}
