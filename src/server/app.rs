//! Server application implementation

use anyhow::Result;
use chrono::{DateTime, Local};
use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;
use warp::Filter;

use crate::config::GatewayConfig;
use crate::discovery::DiscoveryEngine;
use crate::dispatch::SessionTable;
use crate::errors::ROKU_REMOTE_HINT;
use crate::protocols::AdapterRegistry;
use crate::registry::DeviceRegistry;

/// Server application main struct
pub struct ServerApp {
    config: GatewayConfig,
    state: Arc<ServerState>,
}

/// Shared by every route; sessions are the only per-client state
pub struct ServerState {
    pub config: GatewayConfig,
    pub adapters: Arc<AdapterRegistry>,
    pub registry: Arc<DeviceRegistry>,
    pub discovery: DiscoveryEngine,
    pub sessions: SessionTable,
    pub started_at: DateTime<Local>,
}

impl ServerState {
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let adapters = Arc::new(AdapterRegistry::new(&config.protocol)?);
        let registry = Arc::new(DeviceRegistry::new(config.registry.devices_file.clone()));
        let discovery = DiscoveryEngine::new(config.discovery.clone(), &config.protocol)?;
        let sessions = SessionTable::new(
            adapters.clone(),
            registry.clone(),
            config.protocol.connect_timeout(),
            config.server.max_sessions,
            config.server.session_idle_timeout(),
        );

        Ok(Self {
            config,
            adapters,
            registry,
            discovery,
            sessions,
            started_at: Local::now(),
        })
    }
}

impl ServerApp {
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let state = Arc::new(ServerState::new(config.clone())?);
        Ok(Self { config, state })
    }

    pub fn get_state(&self) -> Arc<ServerState> {
        self.state.clone()
    }

    pub async fn run(self) -> Result<()> {
        let bind_addr = self.config.bind_addr()?;
        let state = self.get_state();

        let saved = state.registry.list().await.len();
        info!(
            "Loaded {} saved device(s) from {}",
            saved,
            state.registry.path().display()
        );
        if !self.config.server.static_dir.exists() {
            warn!(
                "Static directory {} not found, web UI disabled",
                self.config.server.static_dir.display()
            );
        }

        let cors = warp::cors()
            .allow_any_origin()
            .allow_headers(vec!["content-type"])
            .allow_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"]);
        let logging = crate::server::middleware::logging::with_request_logging();

        let routes = crate::server::routes::create_routes(state.clone())
            .recover(crate::server::routes::handle_rejection)
            .with(logging)
            .with(cors);

        let (addr, server) =
            warp::serve(routes).try_bind_with_graceful_shutdown(bind_addr, async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    warn!("Failed to listen for Ctrl+C: {}", e);
                    std::future::pending::<()>().await;
                }
                info!("Received shutdown signal (Ctrl+C)...");
            })?;

        let reaper = spawn_session_reaper(state.clone());
        print_banner(addr);
        server.await;
        reaper.abort();

        let open_sessions = state.sessions.len().await;
        if open_sessions > 0 {
            info!("Dropping {} open session(s)", open_sessions);
        }
        let uptime = Local::now().signed_duration_since(state.started_at);
        info!(
            "Server shut down gracefully after {}s",
            uptime.num_seconds()
        );
        Ok(())
    }
}

/// Periodically close sessions whose clients went away
fn spawn_session_reaper(state: Arc<ServerState>) -> tokio::task::JoinHandle<()> {
    let period = (state.sessions.idle_timeout() / 4).max(Duration::from_secs(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            state.sessions.evict_idle().await;
        }
    })
}

fn print_banner(addr: std::net::SocketAddr) {
    println!("📺 TV remote gateway listening on http://{}", addr);
    match crate::utils::network::lan_ipv4() {
        Some(ip) => println!("📱 Open http://{}:{} on your phone", ip, addr.port()),
        None => println!("📱 No LAN address found; open the gateway from this machine"),
    }
    println!("💡 {}", ROKU_REMOTE_HINT);
    println!("📄 API endpoints:");
    println!("   GET    /api/saved-devices              - List saved devices");
    println!("   POST   /api/saved-devices              - Save a device");
    println!("   PUT    /api/saved-devices/{{ip}}         - Rename a device");
    println!("   DELETE /api/saved-devices/{{ip}}         - Forget a device");
    println!("   GET    /api/discover                   - Find TVs (ssdp|sweep|combined)");
    println!("   GET    /api/device-info?ip=            - Roku device info");
    println!("   GET    /api/apps?ip=                   - Installed Roku apps");
    println!("   POST   /api/keypress/{{key}}?ip=         - Send a key");
    println!("   POST   /api/launch/{{appId}}?ip=         - Launch an app");
    println!("   POST   /api/search?ip=                 - Search");
    println!("   POST   /api/input?ip=                  - Type text");
    println!("   POST   /api/samsung/keypress/{{key}}?ip= - Samsung key");
    println!("   POST   /api/sessions                   - Open a session");
    println!("   GET    /health                         - Health check");
}
