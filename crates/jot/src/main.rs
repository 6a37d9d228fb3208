//! jot - terminal bullet journal
//!
//! Binary name: `jot`

use std::{process, time::Duration};

mod app;
mod cli;

use anyhow::Result;
use cli::{build_cli, format_error, init_logging, load, CliOptions};
use jot_core::ShutdownCoordinator;

/// Parse flags, load configuration and run the journal view
async fn run_cli(coordinator: &ShutdownCoordinator) -> Result<()> {
    let matches = build_cli().get_matches();
    let config = load(&CliOptions::from_matches(&matches))?;
    init_logging(&config)?;
    tracing::info!(journal = %config.journal_dir.display(), "starting");
    app::run(config, coordinator).await
}

#[tokio::main]
async fn main() {
    let shutdown_coordinator = ShutdownCoordinator::new(Duration::from_secs(5));

    let (mut sigint, mut sigterm) = match jot_core::signal_channels().await {
        Ok(channels) => channels,
        Err(e) => {
            #[allow(clippy::print_stderr)]
            {
                eprintln!("Error: Failed to setup signal handlers: {e}");
            }
            #[allow(clippy::exit)]
            process::exit(1);
        }
    };

    let cli_result = tokio::select! {
        result = run_cli(&shutdown_coordinator) => result,
        _ = sigint.recv() => {
            tracing::info!("Received SIGINT, initiating shutdown...");
            let _ = app::restore_terminal();
            let _ = shutdown_coordinator.shutdown().await;
            Err(anyhow::anyhow!("Shutdown requested"))
        }
        _ = sigterm.recv() => {
            tracing::info!("Received SIGTERM, initiating shutdown...");
            let _ = app::restore_terminal();
            let _ = shutdown_coordinator.shutdown().await;
            Err(anyhow::anyhow!("Shutdown requested"))
        }
    };

    if let Err(err) = cli_result {
        #[allow(clippy::print_stderr)]
        {
            eprintln!("Error: {}", format_error(&err));
        }

        let code = err
            .downcast_ref::<jot_core::Error>()
            .map_or(1, jot_core::Error::exit_code);

        #[allow(clippy::exit)]
        process::exit(code);
    }
}
