//! Remote control commands: keys, apps, search and text

use anyhow::Result;

use super::CliContext;
use crate::cli::args::Cli;
use crate::models::KeyEvent;

pub async fn execute_key_command(ctx: &CliContext, cli: &Cli, key: &str, event: KeyEvent) -> Result<()> {
    let dispatcher = ctx.connect(cli).await?;
    let (action, outcome) = dispatcher.send_key(key, event).await?;
    if outcome.accepted {
        println!("✅ {} sent", action);
    } else {
        println!("⚠️  {} sent, but the TV answered {:?}", action, outcome.status);
    }
    Ok(())
}

pub async fn execute_launch_command(
    ctx: &CliContext,
    cli: &Cli,
    app_id: Option<&str>,
    name: Option<&str>,
) -> Result<()> {
    let dispatcher = ctx.connect(cli).await?;
    match (app_id, name) {
        (Some(app_id), _) => {
            dispatcher.launch(app_id).await?;
            println!("🚀 Launched app {}", app_id);
        }
        (None, Some(name)) => {
            let app = dispatcher.launch_by_name(name).await?;
            println!("🚀 Launched {} ({})", app.name, app.id);
        }
        (None, None) => anyhow::bail!("Give an app id or --name"),
    }
    Ok(())
}

pub async fn execute_search_command(ctx: &CliContext, cli: &Cli, keyword: &str) -> Result<()> {
    let dispatcher = ctx.connect(cli).await?;
    dispatcher.search(keyword).await?;
    println!("🔎 Searching for \"{}\"", keyword);
    Ok(())
}

pub async fn execute_text_command(ctx: &CliContext, cli: &Cli, text: &str) -> Result<()> {
    let dispatcher = ctx.connect(cli).await?;
    let sent = dispatcher.input_text(text).await?;
    println!("⌨️  Typed {} character(s)", sent.len());
    Ok(())
}

pub async fn execute_apps_command(ctx: &CliContext, cli: &Cli) -> Result<()> {
    let dispatcher = ctx.connect(cli).await?;
    let apps = dispatcher.list_apps().await?;

    println!("📦 {} installed app(s):", apps.len());
    for app in apps {
        println!(
            "  {:<16}  {:<32}  {}",
            app.id,
            app.name,
            app.version.as_deref().unwrap_or("")
        );
    }
    Ok(())
}

pub async fn execute_info_command(ctx: &CliContext, cli: &Cli) -> Result<()> {
    let dispatcher = ctx.connect(cli).await?;
    let info = dispatcher.device_info().await?;
    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}
