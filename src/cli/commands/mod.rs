//! CLI command implementations

pub mod control;
pub mod devices;
pub mod discover;

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::cli::args::{Cli, Commands};
use crate::config::GatewayConfig;
use crate::dispatch::CommandDispatcher;
use crate::models::KeyEvent;
use crate::protocols::AdapterRegistry;
use crate::registry::DeviceRegistry;

/// Configuration and shared services for one CLI invocation
pub struct CliContext {
    pub config: GatewayConfig,
    pub registry: Arc<DeviceRegistry>,
}

impl CliContext {
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut config = GatewayConfig::load(&cli.config)?;
        if let Some(path) = &cli.devices_file {
            config.registry.devices_file = path.clone();
        }
        let registry = Arc::new(DeviceRegistry::new(config.registry.devices_file.clone()));
        Ok(Self { config, registry })
    }

    /// Connect to `--ip`, or to the most recently used saved device
    pub async fn connect(&self, cli: &Cli) -> Result<CommandDispatcher> {
        let recent = match cli.ip {
            Some(_) => None,
            None => self.registry.most_recent().await,
        };
        let ip = match (&cli.ip, &recent) {
            (Some(ip), _) => ip.clone(),
            (None, Some(device)) => device.ip.to_string(),
            (None, None) => anyhow::bail!("No TV given; pass --ip or run `tvremote discover --save` first"),
        };
        let vendor = cli
            .vendor
            .or(recent.as_ref().map(|d| d.vendor))
            .unwrap_or_default();

        let adapters = Arc::new(AdapterRegistry::new(&self.config.protocol)?);
        let mut dispatcher = CommandDispatcher::new(
            adapters,
            self.registry.clone(),
            self.config.protocol.connect_timeout(),
        );
        dispatcher
            .connect(vendor, Some(&ip), cli.token.clone())
            .await
            .with_context(|| format!("Could not connect to {} at {}", vendor, ip))?;
        Ok(dispatcher)
    }
}

/// Execute a CLI command
pub async fn execute_command(command: Commands, cli: &Cli) -> Result<()> {
    let ctx = CliContext::load(cli)?;

    match command {
        Commands::Devices => devices::execute_list_command(&ctx).await,
        Commands::Discover {
            strategy,
            base,
            save,
        } => discover::execute_discover_command(&ctx, strategy, base.as_deref(), save).await,
        Commands::Key { key, down, up } => {
            let event = match (down, up) {
                (true, _) => KeyEvent::Down,
                (_, true) => KeyEvent::Up,
                _ => KeyEvent::Press,
            };
            control::execute_key_command(&ctx, cli, &key, event).await
        }
        Commands::Launch { app_id, name } => {
            control::execute_launch_command(&ctx, cli, app_id.as_deref(), name.as_deref()).await
        }
        Commands::Search { keyword } => control::execute_search_command(&ctx, cli, &keyword).await,
        Commands::Text { text } => control::execute_text_command(&ctx, cli, &text).await,
        Commands::Apps => control::execute_apps_command(&ctx, cli).await,
        Commands::Info => control::execute_info_command(&ctx, cli).await,
        Commands::Save { ip, name, model } => {
            devices::execute_save_command(&ctx, cli, ip, name, model).await
        }
        Commands::Rename { ip, name } => devices::execute_rename_command(&ctx, &ip, &name).await,
        Commands::Forget { ip } => devices::execute_forget_command(&ctx, &ip).await,
    }
}
