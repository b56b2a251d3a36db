//! tvremote-server - LAN remote-control gateway
//!
//! Binary entry point for the HTTP gateway.

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::LevelFilter;
use std::path::{Path, PathBuf};
use tokio::fs;
use tvremote::config::GatewayConfig;
use tvremote::discovery::{DiscoveryEngine, DiscoveryStrategy};
use tvremote::server::start_server;
use tvremote::utils::logging::init_server_logging;

#[derive(Parser)]
#[command(name = "tvremote-server")]
#[command(about = "TV remote-control gateway")]
struct ServerCli {
    /// Server configuration file
    #[arg(short, long, default_value = "tvremote.toml")]
    config: PathBuf,

    /// Bind address (overrides the configuration)
    #[arg(short, long)]
    bind: Option<String>,

    /// Port to listen on (overrides the configuration)
    #[arg(short, long)]
    port: Option<u16>,

    /// Saved devices file (overrides the configuration)
    #[arg(long)]
    devices_file: Option<PathBuf>,

    /// Directory with the web UI
    #[arg(long)]
    static_dir: Option<PathBuf>,

    /// Emit one JSON object per log line
    #[arg(long)]
    json_logs: bool,

    /// Append logs to this file (JSON logs only)
    #[arg(long)]
    log_file: Option<String>,

    /// Log level: error, warn, info, debug or trace
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,

    #[command(subcommand)]
    command: Option<ServerCommands>,
}

#[derive(Subcommand)]
enum ServerCommands {
    /// Start the server
    Start,
    /// Run one discovery pass and exit
    Discover {
        #[arg(short, long, default_value = "ssdp")]
        strategy: DiscoveryStrategy,
        #[arg(short, long)]
        base: Option<String>,
    },
    /// Generate default configuration
    Config,
}

impl ServerCli {
    /// Configuration file merged with command line overrides
    fn gateway_config(&self) -> Result<GatewayConfig> {
        let mut config = GatewayConfig::load(&self.config)?;
        if let Some(bind) = &self.bind {
            config.server.bind_address = bind.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(path) = &self.devices_file {
            config.registry.devices_file = path.clone();
        }
        if let Some(dir) = &self.static_dir {
            config.server.static_dir = dir.clone();
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = ServerCli::parse();
    init_server_logging(cli.json_logs, cli.log_file.as_deref(), Some(cli.log_level))?;

    match &cli.command {
        Some(ServerCommands::Start) | None => {
            println!("📺 Starting tvremote gateway...");
            start_server(cli.gateway_config()?).await
        }
        Some(ServerCommands::Discover { strategy, base }) => {
            discover_only(cli.gateway_config()?, *strategy, base.as_deref()).await
        }
        Some(ServerCommands::Config) => {
            println!("⚙️  Generating default configuration...");
            generate_config(&cli.config).await
        }
    }
}

/// Generate a default server configuration file
async fn generate_config(config_path: &Path) -> Result<()> {
    let toml_content = GatewayConfig::default().to_toml()?;

    fs::write(config_path, toml_content).await.map_err(|e| {
        anyhow::anyhow!(
            "Failed to write config file '{}': {}",
            config_path.display(),
            e
        )
    })?;

    println!(
        "✅ Generated default configuration file: {}",
        config_path.display()
    );
    println!("ℹ️  You can edit this file to customize server settings.");
    println!(
        "ℹ️  Use --config {} to load this configuration.",
        config_path.display()
    );

    Ok(())
}

/// Discover TVs and print them without starting the server
async fn discover_only(
    config: GatewayConfig,
    strategy: DiscoveryStrategy,
    base: Option<&str>,
) -> Result<()> {
    let engine = DiscoveryEngine::new(config.discovery.clone(), &config.protocol)?;
    println!("🔍 Discovering TVs ({})...", strategy);

    let devices = engine.discover(strategy, base, None).await?;
    if devices.is_empty() {
        println!("📋 No TVs answered");
        println!("💡 Make sure the TV is on and on the same network as this machine");
        return Ok(());
    }

    for device in devices {
        println!("  {:<15}  {:<24}  {}", device.ip, device.name, device.model);
    }
    Ok(())
}
