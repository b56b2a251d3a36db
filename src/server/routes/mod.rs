//! HTTP routes for the gateway

pub mod devices;
pub mod discovery;
pub mod google;
pub mod health;
pub mod remote;
pub mod samsung;
pub mod sessions;
pub mod static_files;

use log::warn;
use std::convert::Infallible;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

use crate::errors::{DiscoveryError, RegistryError, RemoteError};
use crate::models::ErrorResponse;
use crate::server::app::ServerState;

/// Create all server routes
pub fn create_routes(
    state: Arc<ServerState>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let static_dir = state.config.server.static_dir.clone();

    devices::create_device_routes(state.clone())
        .or(discovery::create_discovery_routes(state.clone()))
        .or(samsung::create_samsung_routes(state.clone()))
        .or(google::create_google_routes(state.clone()))
        .or(sessions::create_session_routes(state.clone()))
        .or(remote::create_remote_routes(state))
        .or(health::create_health_route())
        .or(static_files::create_static_routes(static_dir))
}

/// Helper function to pass server state to handlers
pub(crate) fn with_server_state(
    state: Arc<ServerState>,
) -> impl Filter<Extract = (Arc<ServerState>,), Error = Infallible> + Clone {
    warp::any().map(move || Arc::clone(&state))
}

/// JSON body limited to a few KB; every request body here is tiny
pub(crate) fn json_body<T>() -> impl Filter<Extract = (T,), Error = Rejection> + Clone
where
    T: serde::de::DeserializeOwned + Send,
{
    warp::body::content_length_limit(16 * 1024).and(warp::body::json())
}

pub(crate) fn error_reply(
    status: u16,
    error: &str,
    message: impl ToString,
    hint: Option<&str>,
) -> warp::reply::Response {
    let body = ErrorResponse {
        success: false,
        error: error.to_string(),
        message: message.to_string(),
        hint: hint.map(str::to_string),
    };
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    warp::reply::with_status(warp::reply::json(&body), status).into_response()
}

pub(crate) fn remote_error_reply(err: &RemoteError) -> warp::reply::Response {
    if err.status_code() >= 500 {
        warn!("{}", err);
    }
    error_reply(err.status_code(), err.kind(), err, err.hint())
}

pub(crate) fn registry_error_reply(err: &RegistryError) -> warp::reply::Response {
    if err.status_code() >= 500 {
        warn!("{}", err);
    }
    error_reply(err.status_code(), err.kind(), err, None)
}

pub(crate) fn discovery_error_reply(err: &DiscoveryError) -> warp::reply::Response {
    if err.status_code() >= 500 {
        warn!("{}", err);
    }
    error_reply(err.status_code(), err.kind(), err, None)
}

/// Turn warp's own rejections into the shared JSON error body
pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let reply = if err.is_not_found() {
        error_reply(404, "not_found", "Not found", None)
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        error_reply(400, "invalid_body", e, None)
    } else if let Some(e) = err.find::<warp::reject::InvalidQuery>() {
        error_reply(400, "invalid_query", e, None)
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        error_reply(413, "payload_too_large", "Request body too large", None)
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        error_reply(405, "method_not_allowed", "Method not allowed", None)
    } else {
        warn!("Unhandled rejection: {:?}", err);
        error_reply(500, "internal_error", "Internal server error", None)
    };
    Ok(reply)
}
