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
    models::{ApproveRequest, PendingApprovalView, RejectRequest},
    rpc::approval::ApprovalDecision,
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/v1/approvals",
    tag = "Approvals",
    responses(
        (status = 200, description = "Requests awaiting approval, oldest first", body = [PendingApprovalView])
    )
)]
pub async fn list_approvals(State(state): State<AppState>) -> Json<Vec<PendingApprovalView>> {
    Json(
        state
            .approvals
            .pending()
            .into_iter()
            .map(PendingApprovalView::from)
            .collect(),
    )
}

/// Approve a pending request. The optional body carries edited prompt
/// data for prompts the user may change before confirming.
#[utoipa::path(
    post,
    path = "/v1/approvals/{request_id}/approve",
    params(
        ("request_id" = u64, Path, description = "JSON-RPC id of the pending request")
    ),
    request_body = ApproveRequest,
    tag = "Approvals",
    responses(
        (status = 204, description = "Decision delivered to the waiting request"),
        (status = 404, description = "No approval is pending for that id")
    )
)]
pub async fn approve_request(
    Path(request_id): Path<u64>,
    State(state): State<AppState>,
    body: Option<Json<ApproveRequest>>,
) -> Result<StatusCode, ApiError> {
    let data = body.and_then(|Json(request)| request.data);
    state
        .approvals
        .resolve(request_id, ApprovalDecision::Approved { data })?;
    Ok(StatusCode::NO_CONTENT)
}

/// Reject a pending request. A message marks a wallet-side failure;
/// omitting it means the user declined.
#[utoipa::path(
    post,
    path = "/v1/approvals/{request_id}/reject",
    params(
        ("request_id" = u64, Path, description = "JSON-RPC id of the pending request")
    ),
    request_body = RejectRequest,
    tag = "Approvals",
    responses(
        (status = 204, description = "Decision delivered to the waiting request"),
        (status = 404, description = "No approval is pending for that id")
    )
)]
pub async fn reject_request(
    Path(request_id): Path<u64>,
    State(state): State<AppState>,
    body: Option<Json<RejectRequest>>,
) -> Result<StatusCode, ApiError> {
    let message = body.and_then(|Json(request)| request.message);
    state
        .approvals
        .resolve(request_id, ApprovalDecision::Rejected { message })?;
    Ok(StatusCode::NO_CONTENT)
}
