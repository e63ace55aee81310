//! Main application logic and lifecycle management.
//!
//! The `Application` wires a [`ConsoleHost`] to the RandomSpawn plugin and
//! drives both from lines typed on stdin until `quit`, end of input or a
//! shutdown signal.

use crate::{
    cli::CliArgs,
    config::AppConfig,
    host::ConsoleHost,
    logging::display_banner,
    signals::wait_for_shutdown,
};
use plugin_random_spawn::{
    CommandEvent, CommandSender, PlayerJoinEvent, PlayerRespawnEvent, RandomSpawnPlugin,
};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// A parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Join(String),
    Respawn { player: String, bed: bool, anchor: bool },
    /// A plugin command line such as `rd reload`
    Plugin(String),
    Stats,
    Quit,
}

impl ConsoleCommand {
    /// Parses one console line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let mut parts = line.split_whitespace();
        let Some(keyword) = parts.next() else {
            return Ok(None);
        };

        let command = match keyword.to_ascii_lowercase().as_str() {
            "join" => Self::Join(single_name(keyword, parts.next(), parts.next())?),
            "respawn" => {
                let player = parts
                    .next()
                    .ok_or_else(|| "Usage: respawn <player> [bed|anchor]".to_string())?
                    .to_string();
                let (mut bed, mut anchor) = (false, false);
                for flag in parts {
                    match flag.to_ascii_lowercase().as_str() {
                        "bed" => bed = true,
                        "anchor" => anchor = true,
                        other => return Err(format!("Unknown respawn flag '{}'", other)),
                    }
                }
                Self::Respawn { player, bed, anchor }
            }
            "stats" => Self::Stats,
            "quit" | "exit" | "stop" => Self::Quit,
            _ => Self::Plugin(line.trim().to_string()),
        };

        Ok(Some(command))
    }
}

fn single_name(keyword: &str, name: Option<&str>, extra: Option<&str>) -> Result<String, String> {
    match (name, extra) {
        (Some(name), None) => Ok(name.to_string()),
        _ => Err(format!("Usage: {} <player>", keyword)),
    }
}

/// Main application struct.
pub struct Application {
    config: AppConfig,
    host: Arc<ConsoleHost>,
    plugin: RandomSpawnPlugin,
    /// Delayed teleports and transfers still running
    pending: Vec<JoinHandle<()>>,
}

impl Application {
    /// Creates a new application instance.
    ///
    /// # Process
    ///
    /// 1. Load configuration from file (creating default if missing)
    /// 2. Apply command-line argument overrides
    /// 3. Validate merged configuration
    /// 4. Build the simulated worlds and enable the plugin
    pub async fn new(args: CliArgs) -> Result<Self, Box<dyn std::error::Error>> {
        info!("🔧 Loading configuration from: {}", args.config_path.display());
        let mut config = AppConfig::load_from_file(&args.config_path).await?;
        apply_overrides(&mut config, &args);

        if let Err(e) = config.validate() {
            return Err(format!("Configuration validation failed: {e}").into());
        }
        info!("✅ Configuration loaded and validated successfully");

        display_banner();

        Self::from_config(config).await
    }

    /// Builds the host and enables the plugin from an already validated
    /// configuration.
    pub async fn from_config(config: AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let host = Arc::new(ConsoleHost::new(config.worlds.build_terrains()));
        let plugin = RandomSpawnPlugin::enable(&config.spawn_config, host.clone()).await?;

        Ok(Self {
            config,
            host,
            plugin,
            pending: Vec::new(),
        })
    }

    pub fn plugin(&self) -> &RandomSpawnPlugin {
        &self.plugin
    }

    pub fn host(&self) -> &Arc<ConsoleHost> {
        &self.host
    }

    /// Reads commands from stdin until `quit`, end of input or a shutdown
    /// signal.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        info!("🌟 Starting RandomSpawn console");
        self.log_configuration_summary();

        let input = BufReader::new(tokio::io::stdin());
        self.run_with_input(input).await
    }

    /// Drives the application from any line source.
    pub async fn run_with_input<R>(mut self, input: R) -> Result<(), Box<dyn std::error::Error>>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        let shutdown = wait_for_shutdown();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                line = lines.next_line() => match line {
                    Ok(Some(line)) => {
                        if !self.handle_line(&line).await {
                            break;
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        error!("❌ Failed to read input: {}", e);
                        break;
                    }
                },
                result = &mut shutdown => {
                    if let Err(e) = result {
                        error!("❌ Signal handling failed: {}", e);
                    }
                    break;
                }
            }
        }

        self.shutdown().await;
        Ok(())
    }

    /// Executes one console line. Returns `false` when the console should stop.
    pub async fn handle_line(&mut self, line: &str) -> bool {
        let command = match ConsoleCommand::parse(line) {
            Ok(Some(command)) => command,
            Ok(None) => return true,
            Err(usage) => {
                warn!("⚠️ {}", usage);
                return true;
            }
        };

        match command {
            ConsoleCommand::Join(name) => self.join(&name),
            ConsoleCommand::Respawn { player, bed, anchor } => self.respawn(&player, bed, anchor),
            ConsoleCommand::Plugin(line) => self.plugin_command(&line).await,
            ConsoleCommand::Stats => self.log_statistics(),
            ConsoleCommand::Quit => return false,
        }

        self.pending.retain(|task| !task.is_finished());
        true
    }

    fn join(&mut self, name: &str) {
        let Some((player_id, has_played_before)) = self.host.connect(name) else {
            warn!("⚠️ No world to join");
            return;
        };
        info!(
            "👋 {} joined{}",
            name,
            if has_played_before { "" } else { " for the first time" }
        );

        let event = PlayerJoinEvent { player_id, has_played_before };
        if let Some(task) = self.plugin.on_player_join(&event) {
            self.pending.push(task);
        }
    }

    fn respawn(&mut self, name: &str, bed: bool, anchor: bool) {
        let Some(player) = self.host.player(name) else {
            warn!("⚠️ Unknown player '{}'", name);
            return;
        };

        let mut event = PlayerRespawnEvent::new(player.id, player.world.clone());
        event.is_bed_spawn = bed;
        event.is_anchor_spawn = anchor;

        let task = self.plugin.on_player_respawn(&mut event);
        match event.respawn_location {
            Some(location) => {
                info!("💀 {} respawns at {}", name, location);
                self.host.set_location(player.id, location);
            }
            None => info!("💀 {} respawns at the default spawn point", name),
        }
        if let Some(task) = task {
            self.pending.push(task);
        }
    }

    async fn plugin_command(&self, line: &str) {
        let Some(event) = CommandEvent::parse(CommandSender::Console, line) else {
            return;
        };
        if !self.plugin.on_command(&event).await {
            warn!("⚠️ Unknown command '{}'", event.label);
        }
    }

    fn log_statistics(&self) {
        let policy = self.plugin.policy();
        info!("📊 Statistics:");
        info!(
            "  - Players: {} ({} online)",
            self.host.player_count(),
            self.host.online_count()
        );
        info!(
            "  - Enabled worlds: {:?}",
            policy.enabled_worlds().collect::<Vec<_>>()
        );
        let summary = self.plugin.selector().cache().summary();
        if summary.is_empty() {
            info!("  - Safe-location cache: empty");
        }
        for (world, count) in summary {
            info!("  - Safe-location cache '{}': {} entries", world, count);
        }
    }

    fn log_configuration_summary(&self) {
        let policy = self.plugin.policy();
        let region = policy.region();
        let (x_min, x_max) = region.x_bounds();
        let (y_min, y_max) = region.y_bounds();
        let (z_min, z_max) = region.z_bounds();

        info!("📋 Configuration Summary:");
        info!("  📂 Plugin config: {}", self.plugin.config_path().display());
        info!("  🌍 Worlds: {:?}", self.config.worlds.names);
        info!(
            "  🧱 Surface height: {}",
            self.config.worlds.surface_height()
        );
        info!(
            "  🎯 Region: x {}..{} | y {}..{} | z {}..{}",
            x_min, x_max, y_min, y_max, z_min, z_max
        );
        info!(
            "  🔁 Max tries: {} | Force ground: {}",
            policy.max_tries(),
            policy.force_ground_spawn()
        );
    }

    async fn shutdown(self) {
        info!("⏳ Waiting for {} pending player tasks...", self.pending.len());
        for task in self.pending {
            if let Err(e) = task.await {
                error!("❌ Player task failed: {}", e);
            }
        }

        self.plugin.on_disable();
        info!("✅ RandomSpawn console shutdown complete");
    }
}

fn apply_overrides(config: &mut AppConfig, args: &CliArgs) {
    if let Some(log_level) = &args.log_level {
        config.logging.level = log_level.clone();
    }

    if args.json_logs {
        config.logging.json_format = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    async fn app(dir: &tempfile::TempDir, plugin_toml: &str) -> Application {
        let spawn_config = dir.path().join("plugin.toml");
        tokio::fs::write(&spawn_config, plugin_toml).await.unwrap();

        let mut config = AppConfig::default();
        config.spawn_config = spawn_config;
        config.worlds.names = vec!["world".to_string(), "world_nether".to_string()];
        Application::from_config(config).await.unwrap()
    }

    #[test]
    fn test_parse_console_commands() {
        assert_eq!(
            ConsoleCommand::parse("join Steve"),
            Ok(Some(ConsoleCommand::Join("Steve".to_string())))
        );
        assert_eq!(
            ConsoleCommand::parse("respawn Steve bed"),
            Ok(Some(ConsoleCommand::Respawn {
                player: "Steve".to_string(),
                bed: true,
                anchor: false
            }))
        );
        assert_eq!(
            ConsoleCommand::parse("  /rd reload "),
            Ok(Some(ConsoleCommand::Plugin("/rd reload".to_string())))
        );
        assert_eq!(ConsoleCommand::parse("STATS"), Ok(Some(ConsoleCommand::Stats)));
        assert_eq!(ConsoleCommand::parse("quit"), Ok(Some(ConsoleCommand::Quit)));
        assert_eq!(ConsoleCommand::parse("   "), Ok(None));
    }

    #[test]
    fn test_parse_rejects_bad_usage() {
        assert!(ConsoleCommand::parse("join").is_err());
        assert!(ConsoleCommand::parse("join Steve Alex").is_err());
        assert!(ConsoleCommand::parse("respawn").is_err());
        assert!(ConsoleCommand::parse("respawn Steve hammock").is_err());
    }

    #[test]
    fn test_cli_overrides_apply() {
        let mut config = AppConfig::default();
        let args = CliArgs {
            config_path: PathBuf::from("randomspawn.toml"),
            log_level: Some("debug".to_string()),
            json_logs: true,
        };
        apply_overrides(&mut config, &args);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json_format);
    }

    #[tokio::test]
    async fn test_respawn_moves_player() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir, "[spawn]\nforce_ground_spawn = true\n").await;

        assert!(app.handle_line("join Steve").await);
        assert!(app.handle_line("respawn Steve").await);

        let steve = app.host().player("Steve").unwrap();
        let location = steve.location.expect("random respawn location");
        assert_eq!(location.world, "world");
        assert_eq!(location.y, 64.0);
    }

    #[tokio::test]
    async fn test_bed_respawn_keeps_default() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir, "[spawn]\nforce_ground_spawn = true\n").await;

        app.handle_line("join Alex").await;
        app.handle_line("respawn Alex anchor").await;
        assert!(app.host().player("Alex").unwrap().location.is_none());
    }

    #[tokio::test]
    async fn test_scripted_session() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(&dir, "[spawn]\nforce_ground_spawn = true\n").await;
        let host = Arc::clone(app.host());

        let script: &[u8] = b"join Steve\nrd reload\nstats\nquit\njoin Alex\n";
        app.run_with_input(script).await.unwrap();

        // The first-join teleport ran before shutdown; Alex came after quit.
        let steve = host.player("Steve").unwrap();
        assert_eq!(steve.location.map(|l| l.y), Some(64.0));
        assert!(host.player("Alex").is_none());
    }
}
