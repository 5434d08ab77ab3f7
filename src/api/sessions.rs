// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::ApiError,
    models::ConnectSessionRequest,
    rpc::method::RpcMethod,
    session::{Session, SessionTopic},
    state::AppState,
};

#[utoipa::path(
    post,
    path = "/v1/sessions",
    request_body = ConnectSessionRequest,
    tag = "Sessions",
    responses(
        (status = 201, description = "Session connected", body = Session),
        (status = 400, description = "Invalid peer url or unknown method name")
    )
)]
pub async fn connect_session(
    State(state): State<AppState>,
    Json(request): Json<ConnectSessionRequest>,
) -> Result<(StatusCode, Json<Session>), ApiError> {
    let mut approved = Vec::with_capacity(request.approved_methods.len());
    for name in &request.approved_methods {
        let method: RpcMethod = name
            .parse()
            .map_err(|_| ApiError::bad_request(format!("Unknown rpc method: {name}")))?;
        approved.push(method);
    }

    let session = state.sessions.connect(request.peer, approved)?;
    Ok((StatusCode::CREATED, Json(session)))
}

#[utoipa::path(
    get,
    path = "/v1/sessions",
    tag = "Sessions",
    responses((status = 200, description = "Live sessions, oldest first", body = [Session]))
)]
pub async fn list_sessions(State(state): State<AppState>) -> Json<Vec<Session>> {
    Json(state.sessions.list())
}

#[utoipa::path(
    delete,
    path = "/v1/sessions/{topic}",
    params(
        ("topic" = String, Path, description = "Topic of the session to disconnect")
    ),
    tag = "Sessions",
    responses(
        (status = 204, description = "Session disconnected, pending approvals cancelled"),
        (status = 404, description = "No session with that topic")
    )
)]
pub async fn disconnect_session(
    Path(topic): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    match state.teardown_session(&SessionTopic::from(topic.as_str())) {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err(ApiError::not_found(format!("No session with topic {topic}"))),
    }
}
