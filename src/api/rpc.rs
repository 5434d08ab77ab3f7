// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};

use crate::{
    rpc::{self, JsonRpcCall, JsonRpcResponse, RpcError},
    session::SessionTopic,
    state::AppState,
};

/// Submits one JSON-RPC call over a session.
///
/// Always answers HTTP 200 with a response envelope; pipeline failures
/// travel inside it. The body is taken as raw bytes so an unparseable
/// payload maps to a parse-error envelope instead of an axum rejection.
#[utoipa::path(
    post,
    path = "/v1/sessions/{topic}/rpc",
    params(
        ("topic" = String, Path, description = "Topic of the session the call arrives over")
    ),
    request_body = JsonRpcCall,
    tag = "Rpc",
    responses(
        (status = 200, description = "JSON-RPC response envelope", body = JsonRpcResponse)
    )
)]
pub async fn submit_rpc(
    Path(topic): Path<String>,
    State(state): State<AppState>,
    body: Bytes,
) -> Json<JsonRpcResponse> {
    let call: JsonRpcCall = match serde_json::from_slice(&body) {
        Ok(call) => call,
        Err(err) => {
            tracing::warn!(%topic, error = %err, "unparseable rpc body");
            return Json(JsonRpcResponse::error_without_id(&RpcError::Parse));
        }
    };

    Json(rpc::dispatch(&state, &SessionTopic::from(topic), call).await)
}
