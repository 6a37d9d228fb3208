//! Loading-focused tests for configuration
//!
//! Tests for configuration file loading, parsing, layering, and environment
//! overrides.

#[cfg(test)]
mod loading_tests {
    use std::path::PathBuf;

    use serial_test::serial;

    use crate::{
        config::{global_config_path, load_config, load_toml_file, Config},
        Error, Result,
    };

    fn write_config(dir: &tempfile::TempDir, body: &str) -> Result<PathBuf> {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, body)
            .map_err(|e| Error::io_error(format!("Failed to write test file: {e}")))?;
        Ok(path)
    }

    const ENV_VARS: [&str; 5] = [
        "JOT_JOURNAL_DIR",
        "JOT_WATCH_ENABLED",
        "JOT_WATCH_DEBOUNCE_MS",
        "JOT_CACHE_EVENT_CAPACITY",
        "JOT_UI_TICK_MS",
    ];

    fn clear_env() {
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_partial_file_keeps_defaults() -> Result<()> {
        let dir = tempfile::tempdir()
            .map_err(|e| Error::io_error(format!("Failed to create temp dir: {e}")))?;
        let path = write_config(&dir, "[watch]\ndebounce_ms = 250\n")?;

        let config = load_toml_file(&path)?;
        assert_eq!(config.watch.debounce_ms, 250);
        assert!(config.watch.enabled);
        assert_eq!(config.cache.event_capacity, 256);
        Ok(())
    }

    #[test]
    fn test_malformed_toml_returns_parse_error() -> Result<()> {
        let dir = tempfile::tempdir()
            .map_err(|e| Error::io_error(format!("Failed to create temp dir: {e}")))?;
        let path = write_config(&dir, "journal_dir = \n invalid toml [[[")?;

        let result = load_toml_file(&path);
        assert!(matches!(result, Err(Error::Validation(_))));
        Ok(())
    }

    #[test]
    fn test_directory_path_is_rejected() -> Result<()> {
        let dir = tempfile::tempdir()
            .map_err(|e| Error::io_error(format!("Failed to create temp dir: {e}")))?;
        let result = load_toml_file(dir.path());
        assert!(matches!(result, Err(Error::System(_))));
        Ok(())
    }

    #[test]
    fn test_global_config_path() {
        if let Some(path) = global_config_path() {
            assert!(path.ends_with("config.toml"));
        }
    }

    #[test]
    #[serial]
    fn test_explicit_file_is_validated() -> Result<()> {
        clear_env();
        let dir = tempfile::tempdir()
            .map_err(|e| Error::io_error(format!("Failed to create temp dir: {e}")))?;
        let path = write_config(&dir, "[watch]\ndebounce_ms = 1\n")?;

        let result = load_config(Some(&path));
        assert!(matches!(result, Err(Error::Validation(_))));
        Ok(())
    }

    #[test]
    #[serial]
    fn test_missing_explicit_file_is_an_error() {
        clear_env();
        let result = load_config(Some(std::path::Path::new("/nonexistent/jot/config.toml")));
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_env_var_overrides_config() -> Result<()> {
        clear_env();
        std::env::set_var("JOT_JOURNAL_DIR", "/tmp/jot-env-journal");
        std::env::set_var("JOT_WATCH_ENABLED", "false");
        std::env::set_var("JOT_WATCH_DEBOUNCE_MS", "200");
        std::env::set_var("JOT_CACHE_EVENT_CAPACITY", "32");
        std::env::set_var("JOT_UI_TICK_MS", "100");

        let result = Config::default().apply_env_vars();
        clear_env();

        let config = result?;
        assert_eq!(config.journal_dir, PathBuf::from("/tmp/jot-env-journal"));
        assert!(!config.watch.enabled);
        assert_eq!(config.watch.debounce_ms, 200);
        assert_eq!(config.cache.event_capacity, 32);
        assert_eq!(config.ui.tick_ms, 100);
        Ok(())
    }

    #[test]
    #[serial]
    fn test_env_var_invalid_value() {
        clear_env();
        std::env::set_var("JOT_WATCH_DEBOUNCE_MS", "soon");
        let result = Config::default().apply_env_vars();
        clear_env();
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    #[serial]
    fn test_env_var_empty_journal_dir() {
        clear_env();
        std::env::set_var("JOT_JOURNAL_DIR", "  ");
        let result = Config::default().apply_env_vars();
        clear_env();
        assert!(result.is_err());
    }
}
