// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! `avalanche_getAddressesInRange`: derive external/internal addresses
//! over a clamped index range. Read-only, no approval, served from a
//! TTL'd LRU cache because address-discovery dApps poll it repeatedly.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::provider::{AddressCache, WalletProvider};
use crate::rpc::error::RpcError;
use crate::rpc::method::RpcMethod;
use crate::rpc::params::parse_address_range;
use crate::rpc::request::RpcRequest;

use super::{HandlerOutcome, RpcRequestHandler};

const CACHE_CAPACITY: usize = 64;
const CACHE_TTL: Duration = Duration::from_secs(30);

pub struct AddressRangeHandler {
    cache: AddressCache,
}

impl AddressRangeHandler {
    pub fn new() -> Self {
        Self {
            cache: AddressCache::new(CACHE_CAPACITY, CACHE_TTL),
        }
    }
}

impl Default for AddressRangeHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RpcRequestHandler for AddressRangeHandler {
    fn methods(&self) -> &'static [RpcMethod] {
        &[RpcMethod::AvalancheGetAddressesInRange]
    }

    async fn handle(
        &self,
        request: &RpcRequest,
        provider: &dyn WalletProvider,
    ) -> Result<HandlerOutcome, RpcError> {
        let range = parse_address_range(&request.params).map_err(RpcError::invalid_params)?;

        let addresses = match self.cache.get(&range) {
            Some(cached) => {
                tracing::debug!(?range, "address range served from cache");
                cached
            }
            None => {
                let derived = provider.derive_addresses(&range).await?;
                self.cache.put(range, derived.clone());
                derived
            }
        };

        let value =
            serde_json::to_value(addresses).map_err(|err| RpcError::internal(err.to_string()))?;
        Ok(HandlerOutcome::Complete(value))
    }
}
