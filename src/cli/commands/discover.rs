//! Discover command implementation

use anyhow::Result;

use super::CliContext;
use super::devices::print_device;
use crate::discovery::{DiscoveryEngine, DiscoveryStrategy};

/// Execute the discover command
pub async fn execute_discover_command(
    ctx: &CliContext,
    strategy: DiscoveryStrategy,
    base: Option<&str>,
    save: bool,
) -> Result<()> {
    let engine = DiscoveryEngine::new(ctx.config.discovery.clone(), &ctx.config.protocol)?;
    let last_used = ctx.registry.most_recent().await.map(|device| device.ip);
    // Without any history, the machine's own /24 beats the static default
    let local_base = match (base, last_used) {
        (None, None) => crate::utils::network::local_subnet(),
        _ => None,
    };
    let base = base.or(local_base.as_deref());

    println!("🔍 Searching for TVs ({})...", strategy);
    let devices = engine.discover(strategy, base, last_used).await?;

    if devices.is_empty() {
        println!("📋 No TVs answered yet");
        println!("💡 Troubleshooting:");
        println!("   • Make sure the TV is on and on the same network");
        println!("   • Try `--strategy sweep --base <your subnet>`");
        return Ok(());
    }

    println!("📺 Found {} TV(s):", devices.len());
    for device in &devices {
        print_device(device);
    }

    if save {
        for device in devices {
            ctx.registry.upsert(device).await?;
        }
        println!("💾 Saved to {}", ctx.registry.path().display());
    }
    Ok(())
}
