// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! `avalanche_getAccounts` and `avalanche_getContacts`: read-only
//! lookups that complete without user approval.

use async_trait::async_trait;
use serde_json::Value;

use crate::provider::WalletProvider;
use crate::rpc::error::RpcError;
use crate::rpc::method::RpcMethod;
use crate::rpc::params::ensure_no_params;
use crate::rpc::request::RpcRequest;

use super::{HandlerOutcome, RpcRequestHandler};

fn complete<T: serde::Serialize>(items: Vec<T>) -> Result<HandlerOutcome, RpcError> {
    let value = serde_json::to_value(items).map_err(|err| RpcError::internal(err.to_string()))?;
    Ok(HandlerOutcome::Complete(value))
}

// =============================================================================
// avalanche_getAccounts
// =============================================================================

pub struct GetAccountsHandler;

#[async_trait]
impl RpcRequestHandler for GetAccountsHandler {
    fn methods(&self) -> &'static [RpcMethod] {
        &[RpcMethod::AvalancheGetAccounts]
    }

    async fn handle(
        &self,
        request: &RpcRequest,
        provider: &dyn WalletProvider,
    ) -> Result<HandlerOutcome, RpcError> {
        ensure_no_params(&request.params).map_err(RpcError::invalid_params)?;
        complete(provider.accounts().await?)
    }
}

// =============================================================================
// avalanche_getContacts
// =============================================================================

pub struct GetContactsHandler;

#[async_trait]
impl RpcRequestHandler for GetContactsHandler {
    fn methods(&self) -> &'static [RpcMethod] {
        &[RpcMethod::AvalancheGetContacts]
    }

    async fn handle(
        &self,
        request: &RpcRequest,
        provider: &dyn WalletProvider,
    ) -> Result<HandlerOutcome, RpcError> {
        ensure_no_params(&request.params).map_err(RpcError::invalid_params)?;
        complete(provider.contacts().await?)
    }
}
