//! # Jot Core
//!
//! Reconciling cache, diff engine and change watcher behind the `jot`
//! journal. Zero unwraps, no panics on malformed input.
//!
//! ## Laws (Compiler Enforced)
//!
//! - No `unwrap()` - returns `Result` instead
//! - No `expect()` - returns `Result` instead
//! - No `panic!()` - returns `Result` instead
//! - No `unsafe` - safe Rust only
//!
//! ## Data Flow
//!
//! - cold path: [`snapshot::SnapshotBuilder`] → [`diff`] →
//!   [`ReconcilingCache::apply_snapshot`] → event stream → interface
//! - optimistic path: interface action → cache mutation → store write →
//!   event stream
//! - the [`watcher`] reports changed collections, and the [`sync::SyncWorker`]
//!   turns those reports into cold-path refreshes

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod cache;
pub mod config;
pub mod diff;
mod error;
pub mod events;
pub mod model;
pub mod shutdown;
pub mod snapshot;
pub mod store;
pub mod sync;
pub mod tree;
pub mod watcher;

pub use cache::ReconcilingCache;
pub use error::{Error, ExecutionError, Result, SystemError, ValidationError};
pub use events::{BulletRef, CollectionRef, Event};
pub use shutdown::{signal_channels, ShutdownCoordinator, ShutdownSignal};
pub use snapshot::{Snapshot, SnapshotBuilder};
pub use store::{FileStore, JournalStore, MemoryStore};
pub use sync::SyncWorker;
pub use tree::{parse_tree, ParsedCollectionTree, TreeOrder};
pub use watcher::ChangeSignal;
