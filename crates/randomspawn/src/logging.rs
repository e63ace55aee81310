//! Console logging.
//!
//! Every console action (teleports, transfers, plugin replies) is reported
//! through `tracing`, so the subscriber installed here is the console's output.

use crate::config::LoggingSettings;
use tracing::info;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

/// Level filter for the console: `RUST_LOG` when set, else the configured level.
fn console_filter(settings: &LoggingSettings) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.level))
}

/// Installs the global subscriber.
///
/// `force_json` comes from `--json-logs` and wins over `logging.json_format`.
/// Fails if a subscriber is already installed.
pub fn setup_logging(
    settings: &LoggingSettings,
    force_json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let output: Box<dyn Layer<Registry> + Send + Sync> = if force_json || settings.json_format {
        fmt::layer()
            .json()
            .with_thread_ids(true)
            .with_target(false)
            .boxed()
    } else {
        fmt::layer()
            .with_ansi(true)
            .with_thread_ids(true)
            .with_target(false)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(output.with_filter(console_filter(settings)))
        .try_init()?;

    info!("🔧 Console logging at level '{}'", settings.level);
    Ok(())
}

/// Shows the console banner and the available commands.
pub fn display_banner() {
    let version = option_env!("CARGO_PKG_VERSION").unwrap_or("UNK");
    info!("🎲 RandomSpawn console v{} (dry run)", version);
    info!("   join <player>                 first join in the primary world");
    info!("   respawn <player> [bed|anchor] death respawn");
    info!("   rd | random [reload]          plugin command");
    info!("   stats                         players and cache contents");
    info!("   quit                          stop the console");
}
