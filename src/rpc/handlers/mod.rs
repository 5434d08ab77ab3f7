// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-method request handlers.
//!
//! Each handler owns a slice of the method catalog: it validates params,
//! decides whether the request completes immediately or defers to user
//! approval, and executes approved requests against the wallet provider.
//! The registry maps every supported method to its handler and is
//! asserted to cover the whole catalog, so adding a method without a
//! handler fails fast in tests.

pub mod accounts;
pub mod address_range;
pub mod avalanche_tx;
pub mod eth_send_transaction;
pub mod eth_sign;
pub mod sign_message;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::provider::WalletProvider;
use crate::rpc::approval::ApprovalPrompt;
use crate::rpc::error::RpcError;
use crate::rpc::method::RpcMethod;
use crate::rpc::request::RpcRequest;

pub use accounts::{GetAccountsHandler, GetContactsHandler};
pub use address_range::AddressRangeHandler;
pub use avalanche_tx::{AvalancheSendTransactionHandler, AvalancheSignTransactionHandler};
pub use eth_send_transaction::EthSendTransactionHandler;
pub use eth_sign::EthSignHandler;
pub use sign_message::SignMessageHandler;

// =============================================================================
// Handler seam
// =============================================================================

/// What [`RpcRequestHandler::handle`] produced.
#[derive(Debug)]
pub enum HandlerOutcome {
    /// The method finished without user involvement; this is the result.
    Complete(Value),
    /// The request must wait for explicit user approval. The prompt is
    /// what the approval surface shows.
    Defer(ApprovalPrompt),
}

/// A validator/executor for one or more RPC methods.
#[async_trait]
pub trait RpcRequestHandler: Send + Sync {
    /// The methods this handler serves.
    fn methods(&self) -> &'static [RpcMethod];

    /// Validates the request and either completes it or defers it.
    async fn handle(
        &self,
        request: &RpcRequest,
        provider: &dyn WalletProvider,
    ) -> Result<HandlerOutcome, RpcError>;

    /// Executes a deferred request after the user approved it. `data` is
    /// the optional edited payload the approval surface handed back.
    ///
    /// Handlers that never defer keep the default, which reports a wiring
    /// fault instead of silently succeeding.
    async fn approve(
        &self,
        request: &RpcRequest,
        data: Option<&Value>,
        provider: &dyn WalletProvider,
    ) -> Result<Value, RpcError> {
        let _ = (data, provider);
        Err(RpcError::internal(format!(
            "method {} does not defer to approval",
            request.method
        )))
    }
}

// =============================================================================
// Registry
// =============================================================================

/// Method-to-handler table, built once at startup.
pub struct HandlerRegistry {
    handlers: HashMap<RpcMethod, Arc<dyn RpcRequestHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            handlers: HashMap::new(),
        };
        registry.register(Arc::new(SignMessageHandler));
        registry.register(Arc::new(EthSignHandler));
        registry.register(Arc::new(AvalancheSignTransactionHandler));
        registry.register(Arc::new(AvalancheSendTransactionHandler));
        registry.register(Arc::new(EthSendTransactionHandler));
        registry.register(Arc::new(GetAccountsHandler));
        registry.register(Arc::new(GetContactsHandler));
        registry.register(Arc::new(AddressRangeHandler::new()));

        debug_assert!(
            RpcMethod::ALL
                .iter()
                .all(|method| registry.handlers.contains_key(method)),
            "every supported method needs a handler"
        );

        registry
    }

    fn register(&mut self, handler: Arc<dyn RpcRequestHandler>) {
        for &method in handler.methods() {
            let previous = self.handlers.insert(method, Arc::clone(&handler));
            debug_assert!(previous.is_none(), "duplicate handler for {method}");
        }
    }

    pub fn get(&self, method: RpcMethod) -> Option<Arc<dyn RpcRequestHandler>> {
        self.handlers.get(&method).cloned()
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
