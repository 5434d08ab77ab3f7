// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response shapes of the REST management surface. All types
//! derive the serde traits and `ToSchema` for automatic JSON handling
//! and OpenAPI documentation.
//!
//! The RPC wire shapes live elsewhere: envelopes in [`crate::rpc`] and
//! wallet objects in [`crate::provider`]. This module only covers what
//! the session and approval endpoints exchange.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::rpc::approval::PendingApproval;
use crate::rpc::method::RpcMethod;
use crate::session::{PeerMeta, SessionTopic};

// =============================================================================
// Session Models
// =============================================================================

/// Request to connect a new dApp session.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConnectSessionRequest {
    /// Metadata the dApp presents about itself.
    pub peer: PeerMeta,
    /// Methods the user grants this session, by wire name. Empty or
    /// omitted means unrestricted. Names are strings rather than
    /// [`RpcMethod`] so an unknown name fails with a message naming it
    /// instead of a bare deserialization error.
    #[serde(default)]
    pub approved_methods: Vec<String>,
}

// =============================================================================
// Approval Models
// =============================================================================

/// A request parked for user approval, as the approval surface lists it.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PendingApprovalView {
    /// JSON-RPC id of the waiting request.
    pub request_id: u64,
    /// Session the request arrived over.
    pub session_topic: SessionTopic,
    /// Method awaiting approval.
    pub method: RpcMethod,
    /// One-line description of the action.
    pub summary: String,
    /// Method-specific payload to render; may be handed back edited on
    /// approval.
    #[schema(value_type = Object)]
    pub display: Value,
    pub created_at: DateTime<Utc>,
}

impl From<PendingApproval> for PendingApprovalView {
    fn from(pending: PendingApproval) -> Self {
        Self {
            request_id: pending.request_id,
            session_topic: pending.session_topic,
            method: pending.method,
            summary: pending.prompt.summary,
            display: pending.prompt.display,
            created_at: pending.created_at,
        }
    }
}

/// Body of an approve call. `data` optionally replaces the prompt
/// payload for prompts the user may edit.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ApproveRequest {
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub data: Option<Value>,
}

/// Body of a reject call. A message marks a wallet-side failure the
/// requester sees as an internal error; omitting it means the user
/// declined.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct RejectRequest {
    #[serde(default)]
    pub message: Option<String>,
}

// =============================================================================
// Health Models
// =============================================================================

/// Liveness snapshot.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    /// Live session count.
    pub sessions: usize,
    /// Requests currently parked for approval.
    pub pending_approvals: usize,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::rpc::approval::ApprovalPrompt;

    use super::*;

    #[test]
    fn connect_request_defaults_to_an_empty_allow_list() {
        let request: ConnectSessionRequest = serde_json::from_value(json!({
            "peer": { "name": "dApp", "url": "https://dapp.example" }
        }))
        .unwrap();

        assert!(request.approved_methods.is_empty());
        assert_eq!(request.peer.description, "");
    }

    #[test]
    fn pending_view_flattens_the_prompt() {
        let view = PendingApprovalView::from(PendingApproval {
            request_id: 7,
            session_topic: SessionTopic::from("topic-1"),
            method: RpcMethod::AvalancheSignMessage,
            prompt: ApprovalPrompt {
                summary: "Sign message".to_string(),
                display: json!({ "message": "hello" }),
            },
            created_at: Utc::now(),
        });

        let body = serde_json::to_value(&view).unwrap();
        assert_eq!(body["request_id"], 7);
        assert_eq!(body["method"], "avalanche_signMessage");
        assert_eq!(body["summary"], "Sign message");
        assert_eq!(body["display"]["message"], "hello");
    }
}
