//! Validation-focused tests for configuration
//!
//! Tests for configuration range checks.

#[cfg(test)]
mod validation_tests {
    use crate::{
        config::{CacheConfig, Config, TreeConfig, UiConfig, WatchConfig},
        Error,
    };

    fn with_debounce(debounce_ms: u32) -> Config {
        Config {
            watch: WatchConfig {
                debounce_ms,
                ..WatchConfig::default()
            },
            ..Config::default()
        }
    }

    #[test]
    fn test_debounce_range_bounds() {
        assert!(with_debounce(10).validate().is_ok());
        assert!(with_debounce(5000).validate().is_ok());
        assert!(matches!(
            with_debounce(9).validate(),
            Err(Error::Validation(_))
        ));
        assert!(with_debounce(5001).validate().is_err());
    }

    #[test]
    fn test_zero_event_capacity_rejected() {
        let config = Config {
            cache: CacheConfig { event_capacity: 0 },
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_channel_capacity_rejected() {
        let config = Config {
            watch: WatchConfig {
                channel_capacity: 0,
                ..WatchConfig::default()
            },
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tick_range() {
        let config = Config {
            ui: UiConfig {
                tick_ms: 5,
                ..UiConfig::default()
            },
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_blank_pinned_name_rejected() {
        let config = Config {
            tree: TreeConfig {
                pinned: vec!["Inbox".to_string(), " / ".to_string()],
            },
            ..Config::default()
        };
        let err = config.validate().err().map(|e| e.to_string()).unwrap_or_default();
        assert!(err.contains("tree.pinned"));
    }

    #[test]
    fn test_empty_journal_dir_rejected() {
        let config = Config {
            journal_dir: std::path::PathBuf::new(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
