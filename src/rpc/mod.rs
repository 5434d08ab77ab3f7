// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The JSON-RPC request pipeline.
//!
//! [`dispatch`] takes a raw call submitted over a session and walks it
//! through the full lifecycle: envelope checks, session lookup,
//! method resolution against the catalog, allow-list enforcement,
//! handler validation, the optional approval wait, and execution. Every
//! exit produces a JSON-RPC response envelope; the HTTP layer never
//! turns a pipeline failure into a transport error.

pub mod approval;
pub mod error;
pub mod handlers;
pub mod method;
pub mod params;
pub mod request;
pub mod response;

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures_util::FutureExt;
use serde_json::Value;

use crate::session::SessionTopic;
use crate::state::AppState;

pub use approval::{ApprovalController, ApprovalDecision, ApprovalPrompt, PendingApproval};
pub use error::{ErrorObject, RpcError, ValidationIssue};
pub use handlers::{HandlerOutcome, HandlerRegistry, RpcRequestHandler};
pub use method::RpcMethod;
pub use request::{JsonRpcCall, RpcRequest};
pub use response::JsonRpcResponse;

use approval::ApprovalError;
use request::ValidatedCall;

/// Runs one call through the pipeline and renders the outcome as a
/// response envelope.
pub async fn dispatch(
    state: &AppState,
    topic: &SessionTopic,
    call: JsonRpcCall,
) -> JsonRpcResponse {
    let call = match call.validated() {
        Ok(call) => call,
        Err(err) => {
            tracing::warn!(%topic, error = %err, "rejected rpc envelope");
            return JsonRpcResponse::error_without_id(&err);
        }
    };

    let id = call.id;
    let method = call.method.clone();
    match run(state, topic, call).await {
        Ok(result) => {
            tracing::debug!(%topic, %method, id, "rpc request completed");
            JsonRpcResponse::result(id, result)
        }
        Err(err) if err.is_server_fault() => {
            tracing::error!(%topic, %method, id, code = err.code(), error = %err, "rpc request failed");
            JsonRpcResponse::error(id, &err)
        }
        Err(err) => {
            tracing::warn!(%topic, %method, id, code = err.code(), error = %err, "rpc request refused");
            JsonRpcResponse::error(id, &err)
        }
    }
}

async fn run(
    state: &AppState,
    topic: &SessionTopic,
    call: ValidatedCall,
) -> Result<Value, RpcError> {
    let session = state.sessions.get(topic).ok_or(RpcError::Disconnected)?;

    let method: RpcMethod = call
        .method
        .parse()
        .map_err(|_| RpcError::method_not_found(call.method.clone()))?;

    if !session.allows(method) {
        return Err(RpcError::Unauthorized);
    }

    // Registry coverage is asserted at construction; a gap here is a
    // wiring fault, but it still answers as method-not-found.
    let handler = state
        .registry
        .get(method)
        .ok_or_else(|| RpcError::method_not_found(method.as_str()))?;

    let request = RpcRequest {
        id: call.id,
        method,
        params: call.params,
        session_topic: topic.clone(),
    };

    let outcome = guard(
        method,
        "handle",
        handler.handle(&request, state.provider.as_ref()),
    )
    .await?;

    let prompt = match outcome {
        HandlerOutcome::Complete(result) => return Ok(result),
        HandlerOutcome::Defer(prompt) => prompt,
    };

    let ticket = state
        .approvals
        .begin(request.id, topic.clone(), method, prompt)
        .map_err(|err| match err {
            ApprovalError::AlreadyPending(id) => {
                RpcError::invalid_request(format!("request {id} is already awaiting approval"))
            }
            other => RpcError::internal(other.to_string()),
        })?;

    tracing::info!(%topic, %method, id = request.id, "rpc request awaiting approval");

    match ticket.wait().await {
        ApprovalDecision::Approved { data } => {
            guard(
                method,
                "approve",
                handler.approve(&request, data.as_ref(), state.provider.as_ref()),
            )
            .await
        }
        ApprovalDecision::Rejected { message: None } => Err(RpcError::UserRejected),
        ApprovalDecision::Rejected {
            message: Some(message),
        } => Err(RpcError::Internal(message)),
    }
}

/// Runs a handler stage, converting a panic into [`RpcError::Unexpected`]
/// so one misbehaving handler cannot take the request task down without
/// a response.
async fn guard<F, T>(method: RpcMethod, stage: &'static str, fut: F) -> Result<T, RpcError>
where
    F: Future<Output = Result<T, RpcError>>,
{
    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(result) => result,
        Err(panic) => {
            tracing::error!(%method, stage, detail = panic_detail(&panic), "handler panicked");
            Err(RpcError::Unexpected)
        }
    }
}

fn panic_detail(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}
