//! Command-line surface, configuration overrides and logging setup

use std::{
    fs::{self, OpenOptions},
    path::PathBuf,
    sync::Mutex,
};

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use jot_core::config::{load_config, Config};
use tracing_subscriber::EnvFilter;

/// Log file inside the journal directory
const LOG_FILE: &str = "jot.log";

pub fn build_cli() -> Command {
    Command::new("jot")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Terminal bullet journal")
        .long_about(
            "Terminal Bullet Journal\n\
             \n\
             Opens the journal in an interactive view. Entries live as one\n\
             file each under the journal directory; edits made by other\n\
             programs show up live while watching is enabled.\n\
             \n\
             CONFIGURATION:\n  \
             ~/.config/jot/config.toml, then --config, then JOT_* variables.\n\
             \n\
             LOGGING:\n  \
             RUST_LOG controls the filter (default: warn). Output goes to\n  \
             jot.log in the journal directory.",
        )
        .arg(
            Arg::new("journal-dir")
                .long("journal-dir")
                .short('d')
                .value_name("DIR")
                .value_parser(value_parser!(PathBuf))
                .help("Journal directory (overrides config and JOT_JOURNAL_DIR)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Extra config file layered over the global one"),
        )
        .arg(
            Arg::new("no-watch")
                .long("no-watch")
                .action(ArgAction::SetTrue)
                .help("Do not watch the journal for outside changes"),
        )
}

/// Parsed command-line options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOptions {
    pub journal_dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub no_watch: bool,
}

impl CliOptions {
    pub fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            journal_dir: matches.get_one::<PathBuf>("journal-dir").cloned(),
            config: matches.get_one::<PathBuf>("config").cloned(),
            no_watch: matches.get_flag("no-watch"),
        }
    }

    /// Layer command-line flags over the loaded configuration
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(dir) = &self.journal_dir {
            config.journal_dir.clone_from(dir);
        }
        if self.no_watch {
            config.watch.enabled = false;
        }
        config
    }
}

/// Load configuration and apply command-line overrides
///
/// # Errors
/// Returns error if any config layer fails to parse or validate
pub fn load(options: &CliOptions) -> Result<Config> {
    let config = load_config(options.config.as_deref()).context("Failed to load configuration")?;
    Ok(options.apply(config))
}

/// Send tracing output to the journal's log file
///
/// The terminal belongs to the interactive view, so nothing is written to
/// stdout or stderr.
///
/// # Errors
/// Returns error if the journal directory or log file cannot be created
pub fn init_logging(config: &Config) -> Result<()> {
    fs::create_dir_all(&config.journal_dir).with_context(|| {
        format!(
            "Failed to create journal directory {}",
            config.journal_dir.display()
        )
    })?;
    let path = config.journal_dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install logger: {e}"))
}

/// Format an error for user display, with its cause when it adds detail
pub fn format_error(err: &anyhow::Error) -> String {
    let msg = err.to_string();
    if let Some(source) = err.source() {
        let source_msg = source.to_string();
        if !msg.contains(&source_msg) && !source_msg.is_empty() {
            return format!("{msg}\nCause: {source_msg}");
        }
    }
    msg
}
