//! Change notifications published by the cache
//!
//! Every variant carries references (names, ids, kinds) only. Consumers that
//! need the payload read it back through `ReconcilingCache::snapshot`.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::model::{CollectionKind, CollectionMeta};

// ═══════════════════════════════════════════════════════════════════════════
// TYPES
// ═══════════════════════════════════════════════════════════════════════════

/// Lightweight reference to a collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollectionRef {
    pub name: String,
    pub kind: CollectionKind,
}

impl From<&CollectionMeta> for CollectionRef {
    fn from(meta: &CollectionMeta) -> Self {
        Self {
            name: meta.name.clone(),
            kind: meta.kind,
        }
    }
}

/// Lightweight reference to a bullet inside a collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BulletRef {
    pub collection: String,
    pub id: String,
    pub parent_id: Option<String>,
}

impl BulletRef {
    pub fn new(
        collection: impl Into<String>,
        id: impl Into<String>,
        parent_id: Option<String>,
    ) -> Self {
        Self {
            collection: collection.into(),
            id: id.into(),
            parent_id,
        }
    }
}

/// One change to the cached state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    CollectionCreated {
        collection: CollectionRef,
    },
    CollectionUpdated {
        current: CollectionRef,
        previous: Option<CollectionRef>,
    },
    CollectionDeleted {
        collection: CollectionRef,
    },
    BulletCreated {
        bullet: BulletRef,
    },
    BulletUpdated {
        bullet: BulletRef,
    },
    BulletDeleted {
        bullet: BulletRef,
    },
    /// Flattened display order of the collection tree.
    OrderChanged {
        order: Vec<String>,
    },
    FocusChanged {
        collection: Option<String>,
        bullet: Option<String>,
    },
}

impl Event {
    /// Collection the event is about, if it is about exactly one.
    pub fn collection(&self) -> Option<&str> {
        match self {
            Self::CollectionCreated { collection } | Self::CollectionDeleted { collection } => {
                Some(&collection.name)
            }
            Self::CollectionUpdated { current, .. } => Some(&current.name),
            Self::BulletCreated { bullet }
            | Self::BulletUpdated { bullet }
            | Self::BulletDeleted { bullet } => Some(&bullet.collection),
            Self::FocusChanged { collection, .. } => collection.as_deref(),
            Self::OrderChanged { .. } => None,
        }
    }

    pub const fn is_bullet_event(&self) -> bool {
        matches!(
            self,
            Self::BulletCreated { .. } | Self::BulletUpdated { .. } | Self::BulletDeleted { .. }
        )
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// PUBLISHER
// ═══════════════════════════════════════════════════════════════════════════

/// Sending half of the cache's event stream.
///
/// Publishing never waits. When the stream is full the newest event is
/// dropped and counted; when the receiver is gone events are discarded.
#[derive(Debug, Clone)]
pub struct EventPublisher {
    tx: mpsc::Sender<Event>,
    dropped: Arc<AtomicU64>,
}

impl EventPublisher {
    /// Bounded stream with room for `capacity` events (at least one).
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Event>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (
            Self {
                tx,
                dropped: Arc::new(AtomicU64::new(0)),
            },
            rx,
        )
    }

    pub fn publish(&self, event: Event) {
        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(event)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(?event, "event stream full, dropping newest event");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {}
        }
    }

    /// Publish in order, returning how many events were offered.
    pub fn publish_all(&self, events: impl IntoIterator<Item = Event>) -> usize {
        let mut offered = 0usize;
        for event in events {
            self.publish(event);
            offered = offered.saturating_add(1);
        }
        offered
    }

    /// Events discarded because the stream was full.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════
