//! Defaults-focused tests for configuration
//!
//! Tests for default configuration values and the derived helpers.

#[cfg(test)]
mod defaults_tests {
    use std::time::Duration;

    use crate::{
        config::{Config, TreeConfig, WatchConfig},
        model::CollectionMeta,
    };

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert!(config.watch.enabled);
        assert_eq!(config.watch.debounce_ms, 100);
        assert_eq!(config.cache.event_capacity, 256);
        assert_eq!(config.ui.tick_ms, 250);
        assert!(config.ui.vim_keys);
        assert!(config.journal_dir.ends_with("journal"));
    }

    #[test]
    fn test_debounce_duration() {
        let watch = WatchConfig {
            debounce_ms: 40,
            ..WatchConfig::default()
        };
        assert_eq!(watch.debounce(), Duration::from_millis(40));
    }

    #[test]
    fn test_default_pinned_order() {
        let order = TreeConfig::default().order();
        assert_eq!(order.priority(&CollectionMeta::generic("inbox")), 0);
        assert_eq!(order.priority(&CollectionMeta::generic("Future")), 2);
        assert_eq!(order.priority(&CollectionMeta::generic("Someday")), 3);
    }
}
