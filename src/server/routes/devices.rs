//! Saved-device registry routes

use log::debug;
use std::sync::Arc;
use warp::Filter;
use warp::Reply;

use super::{json_body, registry_error_reply, remote_error_reply, with_server_state};
use crate::models::{
    DeviceResponse, DevicesResponse, RenameDeviceRequest, SaveDeviceRequest, SuccessResponse,
    parse_ip,
};
use crate::server::app::ServerState;

/// Create all saved-device routes under `/api/saved-devices`
pub fn create_device_routes(
    state: Arc<ServerState>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let base = warp::path("api").and(warp::path("saved-devices"));

    let list = base
        .and(warp::get())
        .and(warp::path::end())
        .and(with_server_state(state.clone()))
        .and_then(list_devices_handler);

    let save = base
        .and(warp::post())
        .and(warp::path::end())
        .and(json_body::<SaveDeviceRequest>())
        .and(with_server_state(state.clone()))
        .and_then(save_device_handler);

    let rename = base
        .and(warp::path::param::<String>())
        .and(warp::put())
        .and(warp::path::end())
        .and(json_body::<RenameDeviceRequest>())
        .and(with_server_state(state.clone()))
        .and_then(rename_device_handler);

    let remove = base
        .and(warp::path::param::<String>())
        .and(warp::delete())
        .and(warp::path::end())
        .and(with_server_state(state))
        .and_then(remove_device_handler);

    list.or(save).or(rename).or(remove)
}

/// Handler for GET /api/saved-devices
async fn list_devices_handler(state: Arc<ServerState>) -> Result<impl warp::Reply, warp::Rejection> {
    let devices = state.registry.list().await;
    Ok(warp::reply::json(&DevicesResponse { devices }))
}

/// Handler for POST /api/saved-devices
async fn save_device_handler(
    request: SaveDeviceRequest,
    state: Arc<ServerState>,
) -> Result<warp::reply::Response, warp::Rejection> {
    match state.registry.save(request).await {
        Ok(device) => Ok(warp::reply::json(&DeviceResponse {
            success: true,
            device,
        })
        .into_response()),
        Err(e) => Ok(registry_error_reply(&e)),
    }
}

/// Handler for PUT /api/saved-devices/{ip}
async fn rename_device_handler(
    ip: String,
    request: RenameDeviceRequest,
    state: Arc<ServerState>,
) -> Result<warp::reply::Response, warp::Rejection> {
    let ip = match parse_ip(Some(&ip)) {
        Ok(ip) => ip,
        Err(e) => return Ok(remote_error_reply(&e)),
    };

    match state.registry.rename(ip, &request.name).await {
        Ok(device) => Ok(warp::reply::json(&DeviceResponse {
            success: true,
            device,
        })
        .into_response()),
        Err(e) => Ok(registry_error_reply(&e)),
    }
}

/// Handler for DELETE /api/saved-devices/{ip}; deleting an unknown device succeeds
async fn remove_device_handler(
    ip: String,
    state: Arc<ServerState>,
) -> Result<warp::reply::Response, warp::Rejection> {
    // An address that does not parse was never saved
    let Ok(ip) = parse_ip(Some(&ip)) else {
        debug!("Nothing to remove for unparseable address {}", ip);
        return Ok(warp::reply::json(&SuccessResponse { success: true }).into_response());
    };

    match state.registry.remove(ip).await {
        Ok(_) => Ok(warp::reply::json(&SuccessResponse { success: true }).into_response()),
        Err(e) => Ok(registry_error_reply(&e)),
    }
}
