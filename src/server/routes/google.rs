//! Google TV routes: every call answers 501

use std::sync::Arc;
use warp::Filter;

use super::{remote_error_reply, with_server_state};
use crate::models::Vendor;
use crate::server::app::ServerState;

/// GET or POST /api/google/*
pub fn create_google_routes(
    state: Arc<ServerState>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::path("api")
        .and(warp::path("google"))
        .and(warp::path::tail())
        .and(warp::get().or(warp::post()).unify())
        .and(with_server_state(state))
        .and_then(google_handler)
}

async fn google_handler(
    tail: warp::path::Tail,
    state: Arc<ServerState>,
) -> Result<warp::reply::Response, warp::Rejection> {
    log::debug!("Google TV request for /{}", tail.as_str());
    let err = state
        .adapters
        .adapter(Vendor::GoogleTv)
        .not_implemented("remote control");
    Ok(remote_error_reply(&err))
}
