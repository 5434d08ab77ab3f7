// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Inbound request envelopes.
//!
//! [`JsonRpcCall`] is the permissive wire shape: every field optional so
//! that envelope problems surface as JSON-RPC errors instead of
//! transport-level rejections. [`RpcRequest`] is the immutable request
//! the pipeline dispatches once the envelope and method name have been
//! checked.

use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::rpc::error::RpcError;
use crate::rpc::method::RpcMethod;
use crate::session::SessionTopic;

/// A JSON-RPC call as submitted over a session, before any checking.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct JsonRpcCall {
    /// Version tag. Optional, but must be `"2.0"` when present.
    #[serde(default)]
    pub jsonrpc: Option<String>,
    /// Request id. Required, must be a non-negative integer.
    #[serde(default)]
    #[schema(value_type = Option<u64>)]
    pub id: Option<Value>,
    /// Method wire name.
    #[serde(default)]
    pub method: Option<String>,
    /// Method parameters, defaulting to `null` when absent.
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub params: Value,
}

/// An envelope that passed structural checks. The method name is still
/// a raw string; resolving it against the supported set happens at
/// dispatch so the failure maps to method-not-found.
#[derive(Debug, Clone)]
pub struct ValidatedCall {
    pub id: u64,
    pub method: String,
    pub params: Value,
}

impl JsonRpcCall {
    /// Checks the envelope: version tag, id and method presence, id type.
    pub fn validated(self) -> Result<ValidatedCall, RpcError> {
        if let Some(version) = &self.jsonrpc {
            if version != "2.0" {
                return Err(RpcError::invalid_request(format!(
                    "unsupported jsonrpc version \"{version}\""
                )));
            }
        }

        let id = self
            .id
            .as_ref()
            .and_then(Value::as_u64)
            .ok_or_else(|| RpcError::invalid_request("request id must be a non-negative integer"))?;

        let method = match self.method {
            Some(method) if !method.is_empty() => method,
            _ => return Err(RpcError::invalid_request("request method is missing")),
        };

        Ok(ValidatedCall {
            id,
            method,
            params: self.params,
        })
    }
}

/// A validated, dispatchable request. Immutable once constructed; the
/// approval flow re-reads `params` when the user confirms, so what was
/// submitted is what gets executed.
#[derive(Debug, Clone)]
pub struct RpcRequest {
    pub id: u64,
    pub method: RpcMethod,
    pub params: Value,
    pub session_topic: SessionTopic,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call(body: Value) -> JsonRpcCall {
        serde_json::from_value(body).expect("envelope deserializes")
    }

    #[test]
    fn full_envelope_validates() {
        let valid = call(json!({
            "jsonrpc": "2.0",
            "id": 7,
            "method": "avalanche_signMessage",
            "params": ["hello"]
        }))
        .validated()
        .expect("envelope is valid");

        assert_eq!(valid.id, 7);
        assert_eq!(valid.method, "avalanche_signMessage");
        assert_eq!(valid.params, json!(["hello"]));
    }

    #[test]
    fn version_tag_is_optional() {
        let valid = call(json!({ "id": 1, "method": "avalanche_getAccounts" }))
            .validated()
            .expect("missing jsonrpc tag is tolerated");
        assert_eq!(valid.params, Value::Null);
    }

    #[test]
    fn wrong_version_is_rejected() {
        let err = call(json!({ "jsonrpc": "1.0", "id": 1, "method": "eth_sign" }))
            .validated()
            .unwrap_err();
        assert_eq!(err.code(), -32600);
    }

    #[test]
    fn missing_id_is_rejected() {
        let err = call(json!({ "method": "eth_sign" })).validated().unwrap_err();
        assert_eq!(err.code(), -32600);
    }

    #[test]
    fn non_integer_id_is_rejected() {
        for id in [json!("5"), json!(-3), json!(1.5), json!(null)] {
            let err = call(json!({ "id": id, "method": "eth_sign" }))
                .validated()
                .unwrap_err();
            assert_eq!(err.code(), -32600, "id {id} should be rejected");
        }
    }

    #[test]
    fn missing_method_is_rejected() {
        let err = call(json!({ "id": 1 })).validated().unwrap_err();
        assert_eq!(err.code(), -32600);

        let err = call(json!({ "id": 1, "method": "" })).validated().unwrap_err();
        assert_eq!(err.code(), -32600);
    }
}
