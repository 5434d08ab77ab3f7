// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{
        ApproveRequest, ConnectSessionRequest, HealthResponse, PendingApprovalView, RejectRequest,
    },
    rpc::{ErrorObject, JsonRpcCall, JsonRpcResponse, RpcMethod, ValidationIssue},
    session::{PeerMeta, Session, SessionTopic},
    state::AppState,
};

pub mod approvals;
pub mod health;
pub mod rpc;
pub mod sessions;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/health", get(health::health))
        .route(
            "/sessions",
            get(sessions::list_sessions).post(sessions::connect_session),
        )
        .route("/sessions/{topic}", delete(sessions::disconnect_session))
        .route("/sessions/{topic}/rpc", post(rpc::submit_rpc))
        .route("/approvals", get(approvals::list_approvals))
        .route(
            "/approvals/{request_id}/approve",
            post(approvals::approve_request),
        )
        .route(
            "/approvals/{request_id}/reject",
            post(approvals::reject_request),
        )
        .with_state(state);

    Router::new()
        .nest("/v1", v1_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        sessions::connect_session,
        sessions::list_sessions,
        sessions::disconnect_session,
        rpc::submit_rpc,
        approvals::list_approvals,
        approvals::approve_request,
        approvals::reject_request
    ),
    components(
        schemas(
            ConnectSessionRequest,
            Session,
            PeerMeta,
            SessionTopic,
            RpcMethod,
            JsonRpcCall,
            JsonRpcResponse,
            ErrorObject,
            ValidationIssue,
            PendingApprovalView,
            ApproveRequest,
            RejectRequest,
            HealthResponse
        )
    ),
    tags(
        (name = "Health", description = "Service liveness"),
        (name = "Sessions", description = "dApp session lifecycle"),
        (name = "Rpc", description = "JSON-RPC submission over a session"),
        (name = "Approvals", description = "Pending-request review and resolution")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let app = router(AppState::default());
        // Ensure the router can be converted into a service without panicking.
        let _ = app.into_make_service();
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let app = router(AppState::default());

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::GET)
                    .uri("/v1/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let payload = body_json(response).await;
        assert_eq!(payload["status"].as_str(), Some("ok"));
        assert_eq!(payload["sessions"].as_u64(), Some(0));
        assert_eq!(payload["pending_approvals"].as_u64(), Some(0));
    }

    #[tokio::test]
    async fn connect_then_submit_rpc_round_trip() {
        let app = router(AppState::default());

        let response = app
            .clone()
            .oneshot(post_json(
                "/v1/sessions",
                json!({
                    "peer": { "name": "Test dApp", "url": "https://dapp.example" },
                    "approved_methods": []
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let session = body_json(response).await;
        let topic = session["topic"].as_str().unwrap().to_string();

        let response = app
            .oneshot(post_json(
                &format!("/v1/sessions/{topic}/rpc"),
                json!({ "jsonrpc": "2.0", "id": 1, "method": "avalanche_getAccounts" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let envelope = body_json(response).await;
        assert_eq!(envelope["jsonrpc"].as_str(), Some("2.0"));
        assert_eq!(envelope["id"].as_u64(), Some(1));
        assert!(envelope["result"].is_array());
    }

    #[tokio::test]
    async fn rpc_to_an_unknown_topic_is_a_json_rpc_error_not_a_transport_error() {
        let app = router(AppState::default());

        let response = app
            .oneshot(post_json(
                "/v1/sessions/nope/rpc",
                json!({ "jsonrpc": "2.0", "id": 1, "method": "avalanche_getAccounts" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let envelope = body_json(response).await;
        assert_eq!(envelope["error"]["code"].as_i64(), Some(4900));
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let app = router(AppState::default());

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::GET)
                    .uri("/api-doc/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let document = body_json(response).await;
        assert!(document["paths"]["/v1/sessions/{topic}/rpc"].is_object());
        assert!(document["paths"]["/v1/approvals/{request_id}/approve"].is_object());
    }
}
