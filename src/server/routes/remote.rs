//! Stateless Roku control routes
//!
//! Every request names its target with `?ip=`; nothing is remembered
//! between calls.

use serde_json::json;
use std::sync::Arc;
use warp::Filter;
use warp::Reply;
use warp::http::header::CONTENT_TYPE;

use super::{json_body, remote_error_reply, with_server_state};
use crate::errors::RemoteError;
use crate::models::{
    AppsResponse, KeyEvent, KeyResponse, LaunchByNameRequest, LaunchResponse, SearchRequest,
    SearchResponse, Target, TargetQuery, TextInputRequest, TextInputResponse, Vendor,
    find_app_by_name,
};
use crate::protocols::RemoteAdapter;
use crate::server::app::ServerState;

/// Create all Roku routes under `/api`
pub fn create_remote_routes(
    state: Arc<ServerState>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let api = warp::path("api");

    let device_info = api
        .and(warp::path("device-info"))
        .and(warp::get())
        .and(warp::path::end())
        .and(warp::query::<TargetQuery>())
        .and(with_server_state(state.clone()))
        .and_then(device_info_handler);

    let apps = api
        .and(warp::path("apps"))
        .and(warp::get())
        .and(warp::path::end())
        .and(warp::query::<TargetQuery>())
        .and(with_server_state(state.clone()))
        .and_then(apps_handler);

    let app_icon = api
        .and(warp::path("app-icon"))
        .and(warp::path::param::<String>())
        .and(warp::get())
        .and(warp::path::end())
        .and(warp::query::<TargetQuery>())
        .and(with_server_state(state.clone()))
        .and_then(app_icon_handler);

    let keypress = key_route("keypress", KeyEvent::Press, state.clone());
    let keydown = key_route("keydown", KeyEvent::Down, state.clone());
    let keyup = key_route("keyup", KeyEvent::Up, state.clone());

    let launch = api
        .and(warp::path("launch"))
        .and(warp::path::param::<String>())
        .and(warp::post())
        .and(warp::path::end())
        .and(warp::query::<TargetQuery>())
        .and(with_server_state(state.clone()))
        .and_then(launch_handler);

    let launch_by_name = api
        .and(warp::path("launch-by-name"))
        .and(warp::post())
        .and(warp::path::end())
        .and(warp::query::<TargetQuery>())
        .and(json_body::<LaunchByNameRequest>())
        .and(with_server_state(state.clone()))
        .and_then(launch_by_name_handler);

    let search = api
        .and(warp::path("search"))
        .and(warp::post())
        .and(warp::path::end())
        .and(warp::query::<TargetQuery>())
        .and(json_body::<SearchRequest>())
        .and(with_server_state(state.clone()))
        .and_then(search_handler);

    let input = api
        .and(warp::path("input"))
        .and(warp::post())
        .and(warp::path::end())
        .and(warp::query::<TargetQuery>())
        .and(json_body::<TextInputRequest>())
        .and(with_server_state(state))
        .and_then(input_handler);

    device_info
        .or(apps)
        .or(app_icon)
        .or(keypress)
        .or(keydown)
        .or(keyup)
        .or(launch)
        .or(launch_by_name)
        .or(search)
        .or(input)
}

/// POST /api/{verb}/{key}?ip=
fn key_route(
    verb: &'static str,
    event: KeyEvent,
    state: Arc<ServerState>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::path("api")
        .and(warp::path(verb))
        .and(warp::path::param::<String>())
        .and(warp::post())
        .and(warp::path::end())
        .and(warp::query::<TargetQuery>())
        .and(with_server_state(state))
        .and_then(move |key, query, state| key_handler(key, event, query, state))
}

fn roku(state: &ServerState) -> &dyn RemoteAdapter {
    state.adapters.adapter(Vendor::Roku)
}

fn target(query: &TargetQuery) -> Result<Target, RemoteError> {
    Target::parse(query.ip.as_deref())
}

async fn device_info_handler(
    query: TargetQuery,
    state: Arc<ServerState>,
) -> Result<warp::reply::Response, warp::Rejection> {
    let result = async { roku(&state).device_info(&target(&query)?).await }.await;
    match result {
        Ok(info) => Ok(warp::reply::json(&info).into_response()),
        Err(e) => Ok(remote_error_reply(&e)),
    }
}

async fn apps_handler(
    query: TargetQuery,
    state: Arc<ServerState>,
) -> Result<warp::reply::Response, warp::Rejection> {
    let result = async { roku(&state).list_apps(&target(&query)?).await }.await;
    match result {
        Ok(apps) => Ok(warp::reply::json(&AppsResponse { apps }).into_response()),
        Err(e) => Ok(remote_error_reply(&e)),
    }
}

/// Binary passthrough keeping the device's content type
async fn app_icon_handler(
    app_id: String,
    query: TargetQuery,
    state: Arc<ServerState>,
) -> Result<warp::reply::Response, warp::Rejection> {
    let result = async { roku(&state).app_icon(&target(&query)?, &app_id).await }.await;
    match result {
        Ok(icon) => Ok(warp::reply::with_header(icon.data.to_vec(), CONTENT_TYPE, icon.content_type)
            .into_response()),
        Err(e) => Ok(remote_error_reply(&e)),
    }
}

async fn key_handler(
    key: String,
    event: KeyEvent,
    query: TargetQuery,
    state: Arc<ServerState>,
) -> Result<warp::reply::Response, warp::Rejection> {
    let result = async {
        let target = target(&query)?;
        let adapter = roku(&state);
        let action = adapter.key_map().resolve(&key)?;
        adapter.send_key(&target, action, event).await
    }
    .await;

    match result {
        Ok(_) => Ok(warp::reply::json(&KeyResponse {
            success: true,
            key,
            platform: None,
        })
        .into_response()),
        Err(e) => Ok(remote_error_reply(&e)),
    }
}

async fn launch_handler(
    app_id: String,
    query: TargetQuery,
    state: Arc<ServerState>,
) -> Result<warp::reply::Response, warp::Rejection> {
    let result = async { roku(&state).launch_app(&target(&query)?, &app_id).await }.await;
    match result {
        Ok(_) => Ok(warp::reply::json(&LaunchResponse {
            success: true,
            app_id,
        })
        .into_response()),
        Err(e) => Ok(remote_error_reply(&e)),
    }
}

async fn launch_by_name_handler(
    query: TargetQuery,
    request: LaunchByNameRequest,
    state: Arc<ServerState>,
) -> Result<warp::reply::Response, warp::Rejection> {
    let result = async {
        let target = target(&query)?;
        let adapter = roku(&state);
        let apps = adapter.list_apps(&target).await?;
        let app = find_app_by_name(&apps, &request.name)
            .cloned()
            .ok_or_else(|| RemoteError::AppNotFound(request.name.clone()))?;
        adapter.launch_app(&target, &app.id).await?;
        Ok::<_, RemoteError>(app)
    }
    .await;

    match result {
        Ok(app) => Ok(warp::reply::json(&json!({
            "success": true,
            "appId": app.id,
            "name": app.name
        }))
        .into_response()),
        Err(e) => Ok(remote_error_reply(&e)),
    }
}

async fn search_handler(
    query: TargetQuery,
    request: SearchRequest,
    state: Arc<ServerState>,
) -> Result<warp::reply::Response, warp::Rejection> {
    let result = async { roku(&state).search(&target(&query)?, &request.keyword).await }.await;
    match result {
        Ok(_) => Ok(warp::reply::json(&SearchResponse {
            success: true,
            keyword: request.keyword,
        })
        .into_response()),
        Err(e) => Ok(remote_error_reply(&e)),
    }
}

/// Characters are typed one by one with the configured spacing
async fn input_handler(
    query: TargetQuery,
    request: TextInputRequest,
    state: Arc<ServerState>,
) -> Result<warp::reply::Response, warp::Rejection> {
    let result = async { roku(&state).input_text(&target(&query)?, &request.text).await }.await;
    match result {
        Ok(_) => Ok(warp::reply::json(&TextInputResponse {
            success: true,
            text: request.text,
        })
        .into_response()),
        Err(e) => Ok(remote_error_reply(&e)),
    }
}
