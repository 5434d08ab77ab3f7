// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! `avalanche_signTransaction` and `avalanche_sendTransaction`.
//!
//! Both defer with the decoded transaction request as the prompt
//! payload; they differ only in what runs after approval (sign vs
//! sign-and-broadcast) and in the result shape.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::provider::WalletProvider;
use crate::rpc::approval::ApprovalPrompt;
use crate::rpc::error::RpcError;
use crate::rpc::method::RpcMethod;
use crate::rpc::params::parse_avalanche_tx;
use crate::rpc::request::RpcRequest;

use super::{HandlerOutcome, RpcRequestHandler};

fn defer(summary: &str, request: &RpcRequest) -> Result<HandlerOutcome, RpcError> {
    let tx = parse_avalanche_tx(&request.params).map_err(RpcError::invalid_params)?;
    Ok(HandlerOutcome::Defer(ApprovalPrompt {
        summary: summary.to_string(),
        display: json!({
            "chainAlias": tx.chain_alias,
            "transactionHex": tx.transaction_hex,
        }),
    }))
}

// =============================================================================
// avalanche_signTransaction
// =============================================================================

pub struct AvalancheSignTransactionHandler;

#[async_trait]
impl RpcRequestHandler for AvalancheSignTransactionHandler {
    fn methods(&self) -> &'static [RpcMethod] {
        &[RpcMethod::AvalancheSignTransaction]
    }

    async fn handle(
        &self,
        request: &RpcRequest,
        _provider: &dyn WalletProvider,
    ) -> Result<HandlerOutcome, RpcError> {
        defer("Sign Avalanche transaction", request)
    }

    async fn approve(
        &self,
        request: &RpcRequest,
        _data: Option<&Value>,
        provider: &dyn WalletProvider,
    ) -> Result<Value, RpcError> {
        let tx = parse_avalanche_tx(&request.params).map_err(RpcError::invalid_params)?;
        let signed = provider.sign_transaction(&tx).await?;
        serde_json::to_value(signed).map_err(|err| RpcError::internal(err.to_string()))
    }
}

// =============================================================================
// avalanche_sendTransaction
// =============================================================================

pub struct AvalancheSendTransactionHandler;

#[async_trait]
impl RpcRequestHandler for AvalancheSendTransactionHandler {
    fn methods(&self) -> &'static [RpcMethod] {
        &[RpcMethod::AvalancheSendTransaction]
    }

    async fn handle(
        &self,
        request: &RpcRequest,
        _provider: &dyn WalletProvider,
    ) -> Result<HandlerOutcome, RpcError> {
        defer("Send Avalanche transaction", request)
    }

    async fn approve(
        &self,
        request: &RpcRequest,
        _data: Option<&Value>,
        provider: &dyn WalletProvider,
    ) -> Result<Value, RpcError> {
        let tx = parse_avalanche_tx(&request.params).map_err(RpcError::invalid_params)?;
        let tx_id = provider.send_transaction(&tx).await?;
        Ok(Value::String(tx_id))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::provider::DevWalletProvider;
    use crate::session::SessionTopic;

    use super::*;

    fn request(method: RpcMethod, params: Value) -> RpcRequest {
        RpcRequest {
            id: 3,
            method,
            params,
            session_topic: SessionTopic::from("test-topic"),
        }
    }

    fn tx_params() -> Value {
        json!({
            "transactionHex": "0x0000000102030405",
            "chainAlias": "X",
            "externalIndices": [0, 1]
        })
    }

    #[tokio::test]
    async fn sign_defers_with_the_transaction() {
        let provider = DevWalletProvider::new();
        let outcome = AvalancheSignTransactionHandler
            .handle(
                &request(RpcMethod::AvalancheSignTransaction, tx_params()),
                &provider,
            )
            .await
            .unwrap();

        match outcome {
            HandlerOutcome::Defer(prompt) => {
                assert_eq!(prompt.summary, "Sign Avalanche transaction");
                assert_eq!(prompt.display["chainAlias"], "X");
                assert_eq!(prompt.display["transactionHex"], "0x0000000102030405");
            }
            other => panic!("expected a deferral, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn sign_approve_returns_the_signed_envelope() {
        let provider = DevWalletProvider::new();
        let result = AvalancheSignTransactionHandler
            .approve(
                &request(RpcMethod::AvalancheSignTransaction, tx_params()),
                None,
                &provider,
            )
            .await
            .unwrap();

        assert!(result["signedTransactionHex"]
            .as_str()
            .unwrap()
            .starts_with("0x0000000102030405"));
        let signatures = result["signatures"].as_array().unwrap();
        assert_eq!(signatures.len(), 2);
        assert_eq!(signatures[0]["sigIndices"], json!([0, 0]));
        assert_eq!(signatures[1]["sigIndices"], json!([1, 1]));
    }

    #[tokio::test]
    async fn send_approve_returns_the_tx_id() {
        let provider = DevWalletProvider::new();
        let result = AvalancheSendTransactionHandler
            .approve(
                &request(RpcMethod::AvalancheSendTransaction, tx_params()),
                None,
                &provider,
            )
            .await
            .unwrap();

        let tx_id = result.as_str().unwrap();
        assert!(tx_id.starts_with("0x"));
        assert_eq!(tx_id.len(), 66);
    }

    #[tokio::test]
    async fn rejects_an_unknown_chain_alias() {
        let provider = DevWalletProvider::new();
        let err = AvalancheSendTransactionHandler
            .handle(
                &request(
                    RpcMethod::AvalancheSendTransaction,
                    json!({ "transactionHex": "0x00", "chainAlias": "Q" }),
                ),
                &provider,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RpcError::InvalidParams { .. }));
    }
}
