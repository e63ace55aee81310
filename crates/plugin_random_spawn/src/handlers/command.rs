//! # Administrative Command
//!
//! `/rd` and `/random` (any case). The only subcommand is `reload`; anything
//! else prints the help text.

use crate::events::CommandEvent;
use crate::host::SpawnHost;
use crate::RandomSpawnPlugin;
use tracing::{info, warn};

pub const MESSAGE_PREFIX: &str = "[RandomSpawn] ";
pub const RELOAD_PERMISSION: &str = "randomspawn.reload";
pub const COMMAND_LABELS: [&str; 2] = ["rd", "random"];

/// Lines of the help text, without the message prefix.
pub fn help_lines() -> Vec<String> {
    let mut lines = vec!["=== RandomSpawn Help ===".to_string()];
    lines.extend(
        COMMAND_LABELS
            .iter()
            .map(|label| format!("/{} reload - Reload the configuration", label)),
    );
    lines
}

pub fn is_command_label(label: &str) -> bool {
    COMMAND_LABELS.iter().any(|l| l.eq_ignore_ascii_case(label))
}

/// Handles one command event. Returns `false` when the label isn't ours.
pub async fn handle_command(plugin: &RandomSpawnPlugin, event: &CommandEvent) -> bool {
    if !is_command_label(&event.label) {
        return false;
    }

    let host = plugin.host();
    let reply = |message: String| send_prefixed(host.as_ref(), event, message);

    match event.args.first() {
        Some(arg) if arg.eq_ignore_ascii_case("reload") => {
            if !host.has_permission(&event.sender, RELOAD_PERMISSION) {
                reply("You don't have permission to use this command!".to_string()).await;
                return true;
            }

            match plugin.reload().await {
                Ok(()) => {
                    info!("🎲 RandomSpawn: Configuration reloaded by {:?}", event.sender);
                    reply("Configuration reloaded successfully!".to_string()).await;
                }
                Err(e) => {
                    warn!("🎲 RandomSpawn: Reload failed, keeping previous configuration: {}", e);
                    reply(format!("Failed to reload configuration: {}", e)).await;
                }
            }
        }
        _ => {
            for line in help_lines() {
                reply(line).await;
            }
        }
    }

    true
}

async fn send_prefixed(host: &dyn SpawnHost, event: &CommandEvent, message: String) {
    host.send_message(&event.sender, &format!("{}{}", MESSAGE_PREFIX, message))
        .await;
}
