// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! `avalanche_signMessage`: sign free text with an account's X/P key.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::provider::{WalletAccount, WalletProvider};
use crate::rpc::approval::ApprovalPrompt;
use crate::rpc::error::{RpcError, ValidationIssue};
use crate::rpc::method::RpcMethod;
use crate::rpc::params::{parse_sign_message, SignMessageParams};
use crate::rpc::request::RpcRequest;

use super::{HandlerOutcome, RpcRequestHandler};

pub struct SignMessageHandler;

/// The account a parsed request signs with: the indexed account when the
/// dApp named one, the active account otherwise.
async fn signing_account(
    params: &SignMessageParams,
    provider: &dyn WalletProvider,
) -> Result<WalletAccount, RpcError> {
    let accounts = provider.accounts().await?;
    match params.account_index {
        Some(index) => accounts
            .into_iter()
            .find(|account| account.index == index)
            .ok_or_else(|| {
                RpcError::invalid_params(vec![ValidationIssue::new(
                    "params[1]",
                    "index of an existing wallet account",
                )])
            }),
        None => accounts
            .into_iter()
            .find(|account| account.active)
            .ok_or_else(|| RpcError::invalid_request("no active account to sign with")),
    }
}

#[async_trait]
impl RpcRequestHandler for SignMessageHandler {
    fn methods(&self) -> &'static [RpcMethod] {
        &[RpcMethod::AvalancheSignMessage]
    }

    async fn handle(
        &self,
        request: &RpcRequest,
        provider: &dyn WalletProvider,
    ) -> Result<HandlerOutcome, RpcError> {
        let params = parse_sign_message(&request.params).map_err(RpcError::invalid_params)?;
        let account = signing_account(&params, provider).await?;

        Ok(HandlerOutcome::Defer(ApprovalPrompt {
            summary: "Sign message".to_string(),
            display: json!({
                "message": params.message,
                "accountIndex": account.index,
                "accountName": account.name,
            }),
        }))
    }

    async fn approve(
        &self,
        request: &RpcRequest,
        _data: Option<&Value>,
        provider: &dyn WalletProvider,
    ) -> Result<Value, RpcError> {
        // Re-parse on approval: what was submitted is what gets signed.
        let params = parse_sign_message(&request.params).map_err(RpcError::invalid_params)?;
        let account = signing_account(&params, provider).await?;
        let signature = provider.sign_message(account.index, &params.message).await?;
        Ok(Value::String(signature))
    }
}
