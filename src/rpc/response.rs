// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Outbound response envelopes.

use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::rpc::error::{ErrorObject, RpcError};

/// Wire shape of a JSON-RPC response. Exactly one of `result` and
/// `error` is present; the constructors below are the only way to build
/// one.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    /// Echoes the request id, or `null` when the envelope never yielded one.
    #[schema(value_type = Option<u64>)]
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorObject>,
}

impl JsonRpcResponse {
    pub fn result(id: u64, value: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id: Value::from(id),
            result: Some(value),
            error: None,
        }
    }

    pub fn error(id: u64, err: &RpcError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id: Value::from(id),
            result: None,
            error: Some(ErrorObject::from(err)),
        }
    }

    /// Error response for failures that happen before a request id is
    /// known (unparseable body, malformed envelope). The id is `null`.
    pub fn error_without_id(err: &RpcError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id: Value::Null,
            result: None,
            error: Some(ErrorObject::from(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn result_envelope_shape() {
        let body = serde_json::to_value(JsonRpcResponse::result(42, json!("0xsig"))).unwrap();
        assert_eq!(
            body,
            json!({ "jsonrpc": "2.0", "id": 42, "result": "0xsig" })
        );
    }

    #[test]
    fn error_envelope_shape() {
        let body =
            serde_json::to_value(JsonRpcResponse::error(9, &RpcError::UserRejected)).unwrap();
        assert_eq!(body["id"], 9);
        assert_eq!(body["error"]["code"], 4001);
        assert_eq!(body["error"]["message"], "User rejected the request");
        assert!(body.get("result").is_none());
    }

    #[test]
    fn detached_error_has_null_id() {
        let body = serde_json::to_value(JsonRpcResponse::error_without_id(&RpcError::Parse)).unwrap();
        assert_eq!(body["id"], Value::Null);
        assert_eq!(body["error"]["code"], -32700);
    }
}
