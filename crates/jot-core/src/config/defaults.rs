//! Default configuration values
//!
//! This module provides Default trait implementations for all configuration types.

use std::{path::PathBuf, time::Duration};

use super::types::{CacheConfig, Config, TreeConfig, UiConfig, WatchConfig};
use crate::tree::TreeOrder;

// ═══════════════════════════════════════════════════════════════════════════
// DEFAULT IMPLEMENTATIONS
// ═══════════════════════════════════════════════════════════════════════════

impl Default for Config {
    fn default() -> Self {
        Self {
            journal_dir: default_journal_dir(),
            watch: WatchConfig::default(),
            cache: CacheConfig::default(),
            tree: TreeConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            debounce_ms: 100,
            channel_capacity: 256,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            event_capacity: 256,
        }
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            pinned: vec![
                "Inbox".to_string(),
                "Today".to_string(),
                "Future".to_string(),
            ],
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_ms: 250,
            vim_keys: true,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// DERIVED VALUES
// ═══════════════════════════════════════════════════════════════════════════

impl WatchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(u64::from(self.debounce_ms))
    }
}

impl TreeConfig {
    pub fn order(&self) -> TreeOrder {
        TreeOrder::new(&self.pinned)
    }
}

impl UiConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

/// `<data dir>/journal`, or `.jot/journal` when no home directory is known.
fn default_journal_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "jot").map_or_else(
        || PathBuf::from(".jot/journal"),
        |dirs| dirs.data_dir().join("journal"),
    )
}
