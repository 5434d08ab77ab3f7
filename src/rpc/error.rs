// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request-pipeline error taxonomy.
//!
//! Every failure that leaves the pipeline is one of the classifications
//! below. Codes and messages are stable so dApps can match on them:
//! `-32xxx` codes follow JSON-RPC 2.0, `4xxx` codes follow the EIP-1193
//! provider-error convention. Internal detail travels in `data` (for
//! structured validation issues) or not at all (for unexpected faults,
//! which are logged server-side and surface as a fixed message).

use serde::Serialize;
use serde_json::{json, Value};
use utoipa::ToSchema;

use crate::provider::ProviderError;

/// A single schema violation inside a request's `params`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ValidationIssue {
    /// Path of the offending value, e.g. `params[1]`.
    pub path: String,
    /// The constraint the value failed to meet.
    pub expected: String,
}

impl ValidationIssue {
    pub fn new(path: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            expected: expected.into(),
        }
    }
}

/// A classified request failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RpcError {
    /// The request body was not valid JSON.
    #[error("Parse error")]
    Parse,
    /// The envelope is malformed: bad version tag, missing id or method.
    #[error("{0}")]
    InvalidRequest(String),
    /// The method name is not part of the supported set.
    #[error("The method does not exist / is not available")]
    MethodNotFound {
        /// Wire name the caller asked for.
        method: String,
    },
    /// The params failed schema validation.
    #[error("{message}")]
    InvalidParams {
        message: String,
        issues: Vec<ValidationIssue>,
    },
    /// A handler or the wallet provider failed with a caller-facing message.
    #[error("{0}")]
    Internal(String),
    /// An unclassified fault. Detail is logged, never forwarded.
    #[error("Unexpected error")]
    Unexpected,
    /// The user declined the request.
    #[error("User rejected the request")]
    UserRejected,
    /// The session's allow-list does not include the method.
    #[error("The requested method is not authorized by the user")]
    Unauthorized,
    /// The request referenced a topic with no live session.
    #[error("The session is disconnected")]
    Disconnected,
}

impl RpcError {
    /// Invalid-params error with the default message and the collected issues.
    pub fn invalid_params(issues: Vec<ValidationIssue>) -> Self {
        RpcError::InvalidParams {
            message: "Invalid method parameter(s)".to_string(),
            issues,
        }
    }

    /// Invalid-params error with a bespoke message and no issue list.
    pub fn invalid_params_msg(message: impl Into<String>) -> Self {
        RpcError::InvalidParams {
            message: message.into(),
            issues: Vec::new(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        RpcError::InvalidRequest(message.into())
    }

    pub fn method_not_found(method: impl Into<String>) -> Self {
        RpcError::MethodNotFound {
            method: method.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        RpcError::Internal(message.into())
    }

    /// Stable numeric code for the wire.
    pub fn code(&self) -> i64 {
        match self {
            RpcError::Parse => -32700,
            RpcError::InvalidRequest(_) => -32600,
            RpcError::MethodNotFound { .. } => -32601,
            RpcError::InvalidParams { .. } => -32602,
            RpcError::Internal(_) | RpcError::Unexpected => -32603,
            RpcError::UserRejected => 4001,
            RpcError::Unauthorized => 4100,
            RpcError::Disconnected => 4900,
        }
    }

    /// Structured detail for the wire, where the classification has any.
    pub fn data(&self) -> Option<Value> {
        match self {
            RpcError::MethodNotFound { method } => Some(json!({ "method": method })),
            RpcError::InvalidParams { issues, .. } if !issues.is_empty() => {
                Some(json!({ "issues": issues }))
            }
            _ => None,
        }
    }

    /// True for faults of the gateway or wallet rather than the caller.
    pub fn is_server_fault(&self) -> bool {
        matches!(self, RpcError::Internal(_) | RpcError::Unexpected)
    }
}

/// Wallet failures surface as internal errors carrying the provider's
/// message. Anything the caller could have prevented is caught by
/// validation before the provider runs.
impl From<ProviderError> for RpcError {
    fn from(err: ProviderError) -> Self {
        RpcError::Internal(err.to_string())
    }
}

/// Wire shape of a JSON-RPC error object.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub data: Option<Value>,
}

impl From<&RpcError> for ErrorObject {
    fn from(err: &RpcError) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
            data: err.data(),
        }
    }
}
