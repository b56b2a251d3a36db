//! Samsung control routes (WebSocket-backed)

use std::sync::Arc;
use warp::Filter;
use warp::Reply;

use super::{remote_error_reply, with_server_state};
use crate::models::{KeyEvent, KeyResponse, Target, TargetQuery, Vendor};
use crate::server::app::ServerState;

/// Create Samsung routes under `/api/samsung`
pub fn create_samsung_routes(
    state: Arc<ServerState>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let samsung = warp::path("api").and(warp::path("samsung"));

    let keypress = samsung
        .and(warp::path("keypress"))
        .and(warp::path::param::<String>())
        .and(warp::post())
        .and(warp::path::end())
        .and(warp::query::<TargetQuery>())
        .and(with_server_state(state.clone()))
        .and_then(samsung_keypress_handler);

    let device_info = samsung
        .and(warp::path("device-info"))
        .and(warp::get())
        .and(warp::path::end())
        .and(warp::query::<TargetQuery>())
        .and(with_server_state(state))
        .and_then(samsung_device_info_handler);

    keypress.or(device_info)
}

/// POST /api/samsung/keypress/{key}?ip=&token=; `key` may be "VolumeUp" or "KEY_VOLUP"
async fn samsung_keypress_handler(
    key: String,
    query: TargetQuery,
    state: Arc<ServerState>,
) -> Result<warp::reply::Response, warp::Rejection> {
    let result = async {
        let target = Target::parse(query.ip.as_deref())?.with_token(query.token.clone());
        let adapter = state.adapters.adapter(Vendor::Samsung);
        let action = adapter.key_map().resolve(&key)?;
        adapter.send_key(&target, action, KeyEvent::Press).await
    }
    .await;

    match result {
        Ok(_) => Ok(warp::reply::json(&KeyResponse {
            success: true,
            key,
            platform: Some(Vendor::Samsung),
        })
        .into_response()),
        Err(e) => Ok(remote_error_reply(&e)),
    }
}

async fn samsung_device_info_handler(
    query: TargetQuery,
    state: Arc<ServerState>,
) -> Result<warp::reply::Response, warp::Rejection> {
    let result = async {
        let target = Target::parse(query.ip.as_deref())?;
        state
            .adapters
            .adapter(Vendor::Samsung)
            .device_info(&target)
            .await
    }
    .await;

    match result {
        Ok(info) => Ok(warp::reply::json(&info).into_response()),
        Err(e) => Ok(remote_error_reply(&e)),
    }
}
