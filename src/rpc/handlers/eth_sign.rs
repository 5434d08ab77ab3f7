// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The EVM signing family: `eth_sign`, `personal_sign` and the
//! `eth_signTypedData` variants, all routed through one handler because
//! they share the address-ownership check and the approve path.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::provider::{EvmMessageKind, WalletAccount, WalletProvider};
use crate::rpc::approval::ApprovalPrompt;
use crate::rpc::error::{RpcError, ValidationIssue};
use crate::rpc::method::RpcMethod;
use crate::rpc::params::{
    parse_eth_sign, parse_personal_sign, parse_typed_data, parse_typed_data_object, EvmSignParams,
};
use crate::rpc::request::RpcRequest;

use super::{HandlerOutcome, RpcRequestHandler};

pub struct EthSignHandler;

fn parse_for(method: RpcMethod, params: &Value) -> Result<EvmSignParams, RpcError> {
    let parsed = match method {
        RpcMethod::EthSign => parse_eth_sign(params),
        RpcMethod::PersonalSign => parse_personal_sign(params),
        RpcMethod::EthSignTypedData | RpcMethod::EthSignTypedDataV1 => parse_typed_data(params),
        RpcMethod::EthSignTypedDataV3 | RpcMethod::EthSignTypedDataV4 => {
            parse_typed_data_object(params)
        }
        other => {
            // Routing is registry-checked; anything else is a wiring fault.
            return Err(RpcError::internal(format!(
                "{other} is not an EVM signing method"
            )));
        }
    };
    parsed.map_err(RpcError::invalid_params)
}

fn message_kind(method: RpcMethod) -> EvmMessageKind {
    match method {
        RpcMethod::EthSign => EvmMessageKind::Raw,
        RpcMethod::PersonalSign => EvmMessageKind::Personal,
        _ => EvmMessageKind::TypedData,
    }
}

/// `personal_sign` puts the address second; every other variant puts it
/// first.
fn address_path(method: RpcMethod) -> &'static str {
    match method {
        RpcMethod::PersonalSign => "params[1]",
        _ => "params[0]",
    }
}

/// The requested address must belong to the wallet.
async fn wallet_account_for(
    method: RpcMethod,
    address: &str,
    provider: &dyn WalletProvider,
) -> Result<WalletAccount, RpcError> {
    let accounts = provider.accounts().await?;
    accounts
        .into_iter()
        .find(|account| account.address_c.eq_ignore_ascii_case(address))
        .ok_or_else(|| RpcError::InvalidParams {
            message: "Account does not exist".to_string(),
            issues: vec![ValidationIssue::new(
                address_path(method),
                "C-chain address of a wallet account",
            )],
        })
}

#[async_trait]
impl RpcRequestHandler for EthSignHandler {
    fn methods(&self) -> &'static [RpcMethod] {
        &[
            RpcMethod::EthSign,
            RpcMethod::PersonalSign,
            RpcMethod::EthSignTypedData,
            RpcMethod::EthSignTypedDataV1,
            RpcMethod::EthSignTypedDataV3,
            RpcMethod::EthSignTypedDataV4,
        ]
    }

    async fn handle(
        &self,
        request: &RpcRequest,
        provider: &dyn WalletProvider,
    ) -> Result<HandlerOutcome, RpcError> {
        let params = parse_for(request.method, &request.params)?;
        wallet_account_for(request.method, &params.address, provider).await?;

        let summary = match message_kind(request.method) {
            EvmMessageKind::TypedData => "Sign typed data",
            _ => "Sign message",
        };
        Ok(HandlerOutcome::Defer(ApprovalPrompt {
            summary: summary.to_string(),
            display: json!({
                "method": request.method,
                "address": params.address,
                "data": params.data,
            }),
        }))
    }

    async fn approve(
        &self,
        request: &RpcRequest,
        _data: Option<&Value>,
        provider: &dyn WalletProvider,
    ) -> Result<Value, RpcError> {
        let params = parse_for(request.method, &request.params)?;
        let account = wallet_account_for(request.method, &params.address, provider).await?;
        let signature = provider
            .sign_evm_message(&account.address_c, message_kind(request.method), &params.data)
            .await?;
        Ok(Value::String(signature))
    }
}
