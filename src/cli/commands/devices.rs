//! Saved device management commands

use anyhow::Result;

use super::CliContext;
use crate::cli::args::Cli;
use crate::models::{Device, SaveDeviceRequest, parse_ip};

pub fn print_device(device: &Device) {
    let last_used = device
        .last_used
        .map(|t| t.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "never".to_string());
    println!(
        "  {:<15}  {:<24}  {:<18}  {:<8}  last used {}",
        device.ip.to_string(),
        device.name,
        device.model,
        device.vendor.as_str(),
        last_used
    );
}

/// List saved devices
pub async fn execute_list_command(ctx: &CliContext) -> Result<()> {
    let devices = ctx.registry.list().await;
    if devices.is_empty() {
        println!("📋 No saved devices");
        println!("💡 Run `tvremote discover --save` to find TVs on your network");
        return Ok(());
    }

    println!("📺 {} saved device(s):", devices.len());
    for device in &devices {
        print_device(device);
    }
    Ok(())
}

pub async fn execute_save_command(
    ctx: &CliContext,
    cli: &Cli,
    ip: String,
    name: Option<String>,
    model: Option<String>,
) -> Result<()> {
    let device = ctx
        .registry
        .save(SaveDeviceRequest {
            ip: Some(ip),
            name,
            model,
            serial: None,
            vendor: cli.vendor,
        })
        .await?;
    println!("✅ Saved {} ({})", device.name, device.ip);
    Ok(())
}

pub async fn execute_rename_command(ctx: &CliContext, ip: &str, name: &str) -> Result<()> {
    let ip = parse_ip(Some(ip))?;
    let device = ctx.registry.rename(ip, name).await?;
    println!("✅ Renamed {} to {}", device.ip, device.name);
    Ok(())
}

pub async fn execute_forget_command(ctx: &CliContext, ip: &str) -> Result<()> {
    let ip = parse_ip(Some(ip))?;
    if ctx.registry.remove(ip).await? {
        println!("🗑️  Forgot {}", ip);
    } else {
        println!("ℹ️  {} was not saved", ip);
    }
    Ok(())
}
