//! # RandomSpawn Console
//!
//! Dry-run host for the RandomSpawn plugin. Simulates superflat worlds and
//! players in memory so spawn placement can be exercised without a server.
//!
//! ## Quick Start
//!
//! ```bash
//! # Run with default configuration
//! randomspawn
//!
//! # Specify custom configuration
//! randomspawn --config dry-run.toml
//!
//! # JSON logging
//! randomspawn --json-logs --log-level debug
//! ```
//!
//! Then type commands on stdin:
//!
//! ```text
//! join Steve
//! respawn Steve
//! respawn Steve bed
//! rd reload
//! stats
//! quit
//! ```
//!
//! ## Configuration
//!
//! The host loads its configuration from a TOML file (default:
//! `randomspawn.toml`) and the plugin reads its own file, named by
//! `spawn_config`. Missing files are created with defaults.

use tracing::error;

mod app;
mod cli;
mod config;
mod host;
mod logging;
mod signals;

use app::Application;
use cli::CliArgs;
use config::AppConfig;

/// Runs the console host.
///
/// # Exit Codes
///
/// * **0**: Successful execution and shutdown
/// * **1**: Error during startup, configuration, or runtime
pub async fn init() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Logging settings come from the config file, overridden by the CLI.
    let mut logging = AppConfig::load_from_file(&args.config_path)
        .await
        .unwrap_or_default()
        .logging;
    if let Some(level) = &args.log_level {
        logging.level = level.clone();
    }

    if let Err(e) = logging::setup_logging(&logging, args.json_logs) {
        eprintln!("❌ Failed to setup logging: {e}");
        std::process::exit(1);
    }

    match Application::new(args).await {
        Ok(app) => {
            if let Err(e) = app.run().await {
                error!("❌ Application error: {:?}", e);
                std::process::exit(1);
            }
        }
        Err(e) => {
            error!("❌ Failed to start application: {e:?}");
            std::process::exit(1);
        }
    }

    Ok(())
}

pub use config::{LayerSettings, LoggingSettings, WorldSettings};
pub use host::{ConsoleHost, PlayerState};
