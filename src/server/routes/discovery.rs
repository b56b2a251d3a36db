//! Discovery route

use log::info;
use std::sync::Arc;
use warp::Filter;
use warp::Reply;

use super::{discovery_error_reply, with_server_state};
use crate::discovery::DiscoveryStrategy;
use crate::models::{DevicesResponse, DiscoverQuery};
use crate::server::app::ServerState;

/// GET /api/discover?strategy=ssdp|sweep|combined&base=a.b.c
pub fn create_discovery_routes(
    state: Arc<ServerState>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::path("api")
        .and(warp::path("discover"))
        .and(warp::get())
        .and(warp::path::end())
        .and(warp::query::<DiscoverQuery>())
        .and(with_server_state(state))
        .and_then(discover_handler)
}

async fn discover_handler(
    query: DiscoverQuery,
    state: Arc<ServerState>,
) -> Result<warp::reply::Response, warp::Rejection> {
    let strategy = match query.strategy.as_deref() {
        Some(raw) => match raw.parse::<DiscoveryStrategy>() {
            Ok(strategy) => strategy,
            Err(e) => return Ok(discovery_error_reply(&e)),
        },
        None => DiscoveryStrategy::default(),
    };

    let last_used = state.registry.most_recent().await.map(|device| device.ip);
    info!("Discovery requested ({})", strategy);

    match state
        .discovery
        .discover(strategy, query.base.as_deref(), last_used)
        .await
    {
        Ok(devices) => Ok(warp::reply::json(&DevicesResponse { devices }).into_response()),
        Err(e) => Ok(discovery_error_reply(&e)),
    }
}
