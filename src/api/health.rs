// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};

use crate::models::HealthResponse;
use crate::state::AppState;

/// Liveness probe handler.
///
/// Always returns 200 while the process is running. Everything the
/// gateway serves lives in memory, so there are no dependencies to
/// probe; the counters are there for operators eyeballing the service.
#[utoipa::path(
    get,
    path = "/v1/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        sessions: state.sessions.list().len(),
        pending_approvals: state.approvals.pending().len(),
    })
}
