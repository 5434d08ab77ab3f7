// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! `eth_sendTransaction`: sign and broadcast a C-chain transaction.
//!
//! The prompt shows the decoded transaction; on approval the surface may
//! hand back edited fee fields (the usual "user bumps the gas" flow),
//! which are validated and merged before the provider broadcasts.

use async_trait::async_trait;
use serde_json::Value;

use crate::provider::{EvmTransactionRequest, WalletProvider};
use crate::rpc::approval::ApprovalPrompt;
use crate::rpc::error::{RpcError, ValidationIssue};
use crate::rpc::method::RpcMethod;
use crate::rpc::params::{is_hex_quantity, parse_evm_tx};
use crate::rpc::request::RpcRequest;

use super::{HandlerOutcome, RpcRequestHandler};

pub struct EthSendTransactionHandler;

/// `from` must be a wallet account; dApps cannot spend addresses the
/// wallet does not hold.
async fn ensure_wallet_sender(
    tx: &EvmTransactionRequest,
    provider: &dyn WalletProvider,
) -> Result<(), RpcError> {
    let accounts = provider.accounts().await?;
    if accounts
        .iter()
        .any(|account| account.address_c.eq_ignore_ascii_case(&tx.from))
    {
        Ok(())
    } else {
        Err(RpcError::InvalidParams {
            message: "Account does not exist".to_string(),
            issues: vec![ValidationIssue::new(
                "params[0].from",
                "C-chain address of a wallet account",
            )],
        })
    }
}

/// Merges edited fee fields from the approval surface into the parsed
/// transaction. Only fee and nonce fields may change; anything else in
/// the payload is ignored, and a malformed override is refused rather
/// than silently dropped.
fn apply_overrides(tx: &mut EvmTransactionRequest, data: &Value) -> Result<(), RpcError> {
    let Some(object) = data.as_object() else {
        return Err(RpcError::invalid_params_msg(
            "Approval data must be an object",
        ));
    };

    let mut issues = Vec::new();
    let merge = |key: &str, slot: &mut Option<String>, issues: &mut Vec<ValidationIssue>| {
        match object.get(key) {
            None | Some(Value::Null) => {}
            Some(value) => match value.as_str() {
                Some(quantity) if is_hex_quantity(quantity) => *slot = Some(quantity.to_string()),
                _ => issues.push(ValidationIssue::new(
                    format!("approvalData.{key}"),
                    "0x-prefixed hex quantity",
                )),
            },
        }
    };
    merge("gas", &mut tx.gas, &mut issues);
    merge("gasPrice", &mut tx.gas_price, &mut issues);
    merge("maxFeePerGas", &mut tx.max_fee_per_gas, &mut issues);
    merge(
        "maxPriorityFeePerGas",
        &mut tx.max_priority_fee_per_gas,
        &mut issues,
    );
    merge("nonce", &mut tx.nonce, &mut issues);

    if issues.is_empty() {
        Ok(())
    } else {
        Err(RpcError::invalid_params(issues))
    }
}

#[async_trait]
impl RpcRequestHandler for EthSendTransactionHandler {
    fn methods(&self) -> &'static [RpcMethod] {
        &[RpcMethod::EthSendTransaction]
    }

    async fn handle(
        &self,
        request: &RpcRequest,
        provider: &dyn WalletProvider,
    ) -> Result<HandlerOutcome, RpcError> {
        let tx = parse_evm_tx(&request.params).map_err(RpcError::invalid_params)?;
        ensure_wallet_sender(&tx, provider).await?;

        let display =
            serde_json::to_value(&tx).map_err(|err| RpcError::internal(err.to_string()))?;
        Ok(HandlerOutcome::Defer(ApprovalPrompt {
            summary: "Send transaction".to_string(),
            display,
        }))
    }

    async fn approve(
        &self,
        request: &RpcRequest,
        data: Option<&Value>,
        provider: &dyn WalletProvider,
    ) -> Result<Value, RpcError> {
        let mut tx = parse_evm_tx(&request.params).map_err(RpcError::invalid_params)?;
        ensure_wallet_sender(&tx, provider).await?;
        if let Some(data) = data {
            apply_overrides(&mut tx, data)?;
        }
        let tx_hash = provider.send_evm_transaction(&tx).await?;
        Ok(Value::String(tx_hash))
    }
}
