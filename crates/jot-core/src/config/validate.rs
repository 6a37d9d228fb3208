//! Configuration validation
//!
//! This module contains validation logic for configuration values.

use super::types::Config;
use crate::{model::canonical_name, Error, Result};

// ═══════════════════════════════════════════════════════════════════════════
// VALIDATION LOGIC
// ═══════════════════════════════════════════════════════════════════════════

impl Config {
    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any values are out of range or invalid
    pub fn validate(&self) -> Result<()> {
        if self.journal_dir.as_os_str().is_empty() {
            return Err(Error::invalid_config("journal_dir cannot be empty"));
        }

        // Validate debounce_ms range [10-5000]
        if !(10..=5000).contains(&self.watch.debounce_ms) {
            return Err(Error::invalid_config(format!(
                "debounce_ms must be 10-5000, got {}",
                self.watch.debounce_ms
            )));
        }

        if self.watch.channel_capacity == 0 {
            return Err(Error::invalid_config(
                "watch.channel_capacity must be greater than 0",
            ));
        }

        if self.cache.event_capacity == 0 {
            return Err(Error::invalid_config(
                "cache.event_capacity must be greater than 0",
            ));
        }

        // Validate tick_ms range [10-10000]
        if !(10..=10_000).contains(&self.ui.tick_ms) {
            return Err(Error::invalid_config(format!(
                "ui.tick_ms must be 10-10000, got {}",
                self.ui.tick_ms
            )));
        }

        if let Some(blank) = self
            .tree
            .pinned
            .iter()
            .find(|name| canonical_name(name).is_empty())
        {
            return Err(Error::invalid_config(format!(
                "tree.pinned contains an empty collection name: {blank:?}"
            )));
        }

        Ok(())
    }
}
