//! Session routes: a per-client connection driven through the dispatcher

use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;
use warp::Filter;
use warp::Reply;
use warp::http::StatusCode;

use super::{error_reply, json_body, remote_error_reply, with_server_state};
use crate::dispatch::SessionSnapshot;
use crate::dispatch::session::SessionHandle;
use crate::models::{
    ConnectRequest, DeviceResponse, KeyEvent, KeyResponse, LaunchByNameRequest, LaunchResponse,
    SearchRequest, SearchResponse, SuccessResponse, TextInputRequest, TextInputResponse,
};
use crate::server::app::ServerState;

/// Create all session routes under `/api/sessions`
pub fn create_session_routes(
    state: Arc<ServerState>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let sessions = warp::path("api").and(warp::path("sessions"));
    let session = sessions.and(warp::path::param::<Uuid>());

    let create = sessions
        .and(warp::post())
        .and(warp::path::end())
        .and(with_server_state(state.clone()))
        .and_then(create_session_handler);

    let get = session
        .and(warp::get())
        .and(warp::path::end())
        .and(with_server_state(state.clone()))
        .and_then(get_session_handler);

    let delete = session
        .and(warp::delete())
        .and(warp::path::end())
        .and(with_server_state(state.clone()))
        .and_then(delete_session_handler);

    let connect = session
        .and(warp::path("connect"))
        .and(warp::post())
        .and(warp::path::end())
        .and(json_body::<ConnectRequest>())
        .and(with_server_state(state.clone()))
        .and_then(connect_handler);

    let disconnect = session
        .and(warp::path("disconnect"))
        .and(warp::post())
        .and(warp::path::end())
        .and(with_server_state(state.clone()))
        .and_then(disconnect_handler);

    let keypress = session
        .and(warp::path("keypress"))
        .and(warp::path::param::<String>())
        .and(warp::post())
        .and(warp::path::end())
        .and(with_server_state(state.clone()))
        .and_then(keypress_handler);

    let launch = session
        .and(warp::path("launch"))
        .and(warp::path::param::<String>())
        .and(warp::post())
        .and(warp::path::end())
        .and(with_server_state(state.clone()))
        .and_then(launch_handler);

    let launch_by_name = session
        .and(warp::path("launch-by-name"))
        .and(warp::post())
        .and(warp::path::end())
        .and(json_body::<LaunchByNameRequest>())
        .and(with_server_state(state.clone()))
        .and_then(launch_by_name_handler);

    let search = session
        .and(warp::path("search"))
        .and(warp::post())
        .and(warp::path::end())
        .and(json_body::<SearchRequest>())
        .and(with_server_state(state.clone()))
        .and_then(search_handler);

    let input = session
        .and(warp::path("input"))
        .and(warp::post())
        .and(warp::path::end())
        .and(json_body::<TextInputRequest>())
        .and(with_server_state(state))
        .and_then(input_handler);

    create
        .or(get)
        .or(delete)
        .or(connect)
        .or(disconnect)
        .or(keypress)
        .or(launch)
        .or(launch_by_name)
        .or(search)
        .or(input)
}

async fn lookup(state: &ServerState, id: &Uuid) -> Result<SessionHandle, warp::reply::Response> {
    state.sessions.get(id).await.ok_or_else(|| {
        error_reply(
            404,
            "session_not_found",
            format!("Session {} not found", id),
            None,
        )
    })
}

/// Handler for POST /api/sessions
async fn create_session_handler(
    state: Arc<ServerState>,
) -> Result<warp::reply::Response, warp::Rejection> {
    match state.sessions.create().await {
        Ok(id) => Ok(warp::reply::with_status(
            warp::reply::json(&json!({ "success": true, "sessionId": id })),
            StatusCode::CREATED,
        )
        .into_response()),
        Err(e) => Ok(error_reply(e.status_code(), e.kind(), &e, None)),
    }
}

async fn get_session_handler(
    id: Uuid,
    state: Arc<ServerState>,
) -> Result<warp::reply::Response, warp::Rejection> {
    let session = match lookup(&state, &id).await {
        Ok(session) => session,
        Err(reply) => return Ok(reply),
    };
    let dispatcher = session.lock().await;
    Ok(warp::reply::json(&SessionSnapshot::capture(id, &dispatcher)).into_response())
}

async fn delete_session_handler(
    id: Uuid,
    state: Arc<ServerState>,
) -> Result<warp::reply::Response, warp::Rejection> {
    if state.sessions.remove(&id).await {
        Ok(warp::reply::json(&SuccessResponse { success: true }).into_response())
    } else {
        Ok(error_reply(
            404,
            "session_not_found",
            format!("Session {} not found", id),
            None,
        ))
    }
}

async fn connect_handler(
    id: Uuid,
    request: ConnectRequest,
    state: Arc<ServerState>,
) -> Result<warp::reply::Response, warp::Rejection> {
    let session = match lookup(&state, &id).await {
        Ok(session) => session,
        Err(reply) => return Ok(reply),
    };
    let mut dispatcher = session.lock().await;

    match dispatcher
        .connect(request.vendor, request.ip.as_deref(), request.token)
        .await
    {
        Ok(device) => Ok(warp::reply::json(&DeviceResponse {
            success: true,
            device,
        })
        .into_response()),
        Err(e) => Ok(remote_error_reply(&e)),
    }
}

async fn disconnect_handler(
    id: Uuid,
    state: Arc<ServerState>,
) -> Result<warp::reply::Response, warp::Rejection> {
    let session = match lookup(&state, &id).await {
        Ok(session) => session,
        Err(reply) => return Ok(reply),
    };
    session.lock().await.disconnect();
    Ok(warp::reply::json(&SuccessResponse { success: true }).into_response())
}

async fn keypress_handler(
    id: Uuid,
    key: String,
    state: Arc<ServerState>,
) -> Result<warp::reply::Response, warp::Rejection> {
    let session = match lookup(&state, &id).await {
        Ok(session) => session,
        Err(reply) => return Ok(reply),
    };
    let dispatcher = session.lock().await;
    let platform = dispatcher.connection().map(|c| c.vendor);

    match dispatcher.send_key(&key, KeyEvent::Press).await {
        Ok(_) => Ok(warp::reply::json(&KeyResponse {
            success: true,
            key,
            platform,
        })
        .into_response()),
        Err(e) => Ok(remote_error_reply(&e)),
    }
}

async fn launch_handler(
    id: Uuid,
    app_id: String,
    state: Arc<ServerState>,
) -> Result<warp::reply::Response, warp::Rejection> {
    let session = match lookup(&state, &id).await {
        Ok(session) => session,
        Err(reply) => return Ok(reply),
    };
    let dispatcher = session.lock().await;

    match dispatcher.launch(&app_id).await {
        Ok(_) => Ok(warp::reply::json(&LaunchResponse {
            success: true,
            app_id,
        })
        .into_response()),
        Err(e) => Ok(remote_error_reply(&e)),
    }
}

async fn launch_by_name_handler(
    id: Uuid,
    request: LaunchByNameRequest,
    state: Arc<ServerState>,
) -> Result<warp::reply::Response, warp::Rejection> {
    let session = match lookup(&state, &id).await {
        Ok(session) => session,
        Err(reply) => return Ok(reply),
    };
    let dispatcher = session.lock().await;

    match dispatcher.launch_by_name(&request.name).await {
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
    id: Uuid,
    request: SearchRequest,
    state: Arc<ServerState>,
) -> Result<warp::reply::Response, warp::Rejection> {
    let session = match lookup(&state, &id).await {
        Ok(session) => session,
        Err(reply) => return Ok(reply),
    };
    let dispatcher = session.lock().await;

    match dispatcher.search(&request.keyword).await {
        Ok(_) => Ok(warp::reply::json(&SearchResponse {
            success: true,
            keyword: request.keyword,
        })
        .into_response()),
        Err(e) => Ok(remote_error_reply(&e)),
    }
}

async fn input_handler(
    id: Uuid,
    request: TextInputRequest,
    state: Arc<ServerState>,
) -> Result<warp::reply::Response, warp::Rejection> {
    let session = match lookup(&state, &id).await {
        Ok(session) => session,
        Err(reply) => return Ok(reply),
    };
    let dispatcher = session.lock().await;

    match dispatcher.input_text(&request.text).await {
        Ok(_) => Ok(warp::reply::json(&TextInputResponse {
            success: true,
            text: request.text,
        })
        .into_response()),
        Err(e) => Ok(remote_error_reply(&e)),
    }
}
