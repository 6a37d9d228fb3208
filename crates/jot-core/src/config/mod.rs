//! Configuration loading and management
//!
//! # Hierarchy
//!
//! Configuration is loaded in this order (later overrides earlier):
//! 1. Built-in defaults
//! 2. Global config: `<config dir>/jot/config.toml`
//! 3. Explicit config file passed by the caller
//! 4. Environment variables: `JOT_*`
//!
//! # Example Config
//!
//! ```toml
//! journal_dir = "/home/me/notes/journal"
//!
//! [watch]
//! enabled = true
//! debounce_ms = 100
//!
//! [tree]
//! pinned = ["Inbox", "Today", "Future"]
//! ```
//!
//! # Module Structure
//!
//! - `types`: Configuration structure definitions
//! - `defaults`: Default value implementations
//! - `load`: Loading from files and environment
//! - `merge`: Layering of partial TOML documents
//! - `validate`: Range and emptiness checks

// Module declarations
mod defaults;
mod load;
mod merge;
mod types;
mod validate;

// Test modules (organized by concern)
#[cfg(test)]
mod tests_defaults;
#[cfg(test)]
mod tests_loading;
#[cfg(test)]
mod tests_validation;

// Re-export public API
pub use load::{global_config_path, load_config, load_toml_file};
pub use types::{CacheConfig, Config, TreeConfig, UiConfig, WatchConfig};
