//! Configuration loading from files and environment
//!
//! This module handles loading configuration from:
//! 1. Built-in defaults
//! 2. Global config: `<config dir>/jot/config.toml`
//! 3. An explicit config file
//! 4. Environment variables: `JOT_*`

use std::path::{Path, PathBuf};

use toml::Table;

use super::{merge::merge_tables, types::Config};
use crate::{Error, Result};

// ═══════════════════════════════════════════════════════════════════════════
// PUBLIC API
// ═══════════════════════════════════════════════════════════════════════════

/// Load configuration from all sources with hierarchy
///
/// A missing global file is not an error; a missing explicit file is.
///
/// # Errors
///
/// Returns error if:
/// - A config file is malformed TOML or cannot be read
/// - An environment override cannot be parsed
/// - Config values fail validation
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let mut layered = Table::new();

    if let Some(global_path) = global_config_path().filter(|path| path.exists()) {
        tracing::debug!(path = %global_path.display(), "loading global config");
        merge_tables(&mut layered, load_toml_table(&global_path)?);
    }

    if let Some(path) = explicit {
        tracing::debug!(path = %path.display(), "loading config file");
        merge_tables(&mut layered, load_toml_table(path)?);
    }

    let config: Config = toml::Value::Table(layered).try_into()?;
    let config = config.apply_env_vars()?;
    config.validate()?;
    Ok(config)
}

// ═══════════════════════════════════════════════════════════════════════════
// PATH HELPERS
// ═══════════════════════════════════════════════════════════════════════════

/// Get path to global config file
pub fn global_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "jot")
        .map(|proj_dirs| proj_dirs.config_dir().join("config.toml"))
}

/// Load a single TOML file into a Config, defaults filling the gaps
///
/// # Errors
///
/// Returns error if:
/// - File cannot be read
/// - Path is a directory instead of a file
/// - TOML is malformed
pub fn load_toml_file(path: &Path) -> Result<Config> {
    let table = load_toml_table(path)?;
    toml::Value::Table(table).try_into().map_err(|e| {
        Error::parse_error(format!(
            "Failed to parse config file {}: {e}",
            path.display()
        ))
    })
}

fn load_toml_table(path: &Path) -> Result<Table> {
    if path.is_dir() {
        return Err(Error::io_error(format!(
            "Config path is a directory, not a file: {}",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::io_error(format!(
            "Failed to read config file {}: {e}",
            path.display()
        ))
    })?;

    content.parse::<Table>().map_err(|e| {
        Error::parse_error(format!(
            "Failed to parse config file {}: {e}\n\
             \n\
             The config file contains invalid TOML syntax.",
            path.display()
        ))
    })
}

// ═══════════════════════════════════════════════════════════════════════════
// ENVIRONMENT VARIABLE OVERRIDES
// ═══════════════════════════════════════════════════════════════════════════

impl Config {
    /// Apply environment variable overrides
    ///
    /// # Errors
    ///
    /// Returns error if environment variable values are invalid
    pub fn apply_env_vars(mut self) -> Result<Self> {
        // JOT_JOURNAL_DIR
        if let Ok(value) = std::env::var("JOT_JOURNAL_DIR") {
            if value.trim().is_empty() {
                return Err(Error::invalid_config(
                    "JOT_JOURNAL_DIR cannot be empty - unset the variable or provide a path",
                ));
            }
            self.journal_dir = PathBuf::from(value);
        }

        // JOT_WATCH_ENABLED
        if let Ok(value) = std::env::var("JOT_WATCH_ENABLED") {
            self.watch.enabled = value.parse().map_err(|e| {
                Error::invalid_config(format!("Invalid JOT_WATCH_ENABLED value: {e}"))
            })?;
        }

        // JOT_WATCH_DEBOUNCE_MS
        if let Ok(value) = std::env::var("JOT_WATCH_DEBOUNCE_MS") {
            self.watch.debounce_ms = value.parse().map_err(|e| {
                Error::invalid_config(format!("Invalid JOT_WATCH_DEBOUNCE_MS value: {e}"))
            })?;
        }

        // JOT_CACHE_EVENT_CAPACITY
        if let Ok(value) = std::env::var("JOT_CACHE_EVENT_CAPACITY") {
            self.cache.event_capacity = value.parse().map_err(|e| {
                Error::invalid_config(format!("Invalid JOT_CACHE_EVENT_CAPACITY value: {e}"))
            })?;
        }

        // JOT_UI_TICK_MS
        if let Ok(value) = std::env::var("JOT_UI_TICK_MS") {
            self.ui.tick_ms = value.parse().map_err(|e| {
                Error::invalid_config(format!("Invalid JOT_UI_TICK_MS value: {e}"))
            })?;
        }

        Ok(self)
    }
}
