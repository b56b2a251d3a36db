//! HTTP gateway
//!
//! Serves the remote-control API, the saved-device registry and the static
//! web UI from a single warp server.

pub mod app;
pub mod middleware;
pub mod routes;

pub use app::*;

use anyhow::Result;

use crate::config::GatewayConfig;

/// Start the gateway and run until Ctrl+C
pub async fn start_server(config: GatewayConfig) -> Result<()> {
    let app = ServerApp::new(config)?;
    app.run().await
}
