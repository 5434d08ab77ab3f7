// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The wallet-provider seam.
//!
//! Handlers reach the wallet only through [`WalletProvider`], and only
//! after validation and (for signing methods) user approval. The trait
//! keeps the pipeline testable and the dev backend swappable for a
//! hardware- or keystore-backed one.

pub mod cache;
pub mod dev;

pub use cache::AddressCache;
pub use dev::DevWalletProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Avalanche virtual-machine alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChainAlias {
    X,
    P,
    C,
}

impl ChainAlias {
    pub fn parse(alias: &str) -> Option<Self> {
        match alias {
            "X" => Some(ChainAlias::X),
            "P" => Some(ChainAlias::P),
            "C" => Some(ChainAlias::C),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChainAlias::X => "X",
            ChainAlias::P => "P",
            ChainAlias::C => "C",
        }
    }
}

/// An account held by the wallet, addressed per chain.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletAccount {
    pub index: u32,
    pub name: String,
    /// C-chain (EVM) address, EIP-55 checksummed.
    pub address_c: String,
    pub address_x: String,
    pub address_p: String,
    /// Whether this is the account requests fall back to when no index
    /// is given.
    pub active: bool,
}

/// An address-book entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contact {
    pub id: String,
    pub name: String,
    /// C-chain address.
    pub address: String,
    #[serde(rename = "addressXP", skip_serializing_if = "Option::is_none")]
    pub address_xp: Option<String>,
}

/// How an EVM message should be interpreted before signing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvmMessageKind {
    /// `eth_sign`: raw data, hex-decoded when hex-shaped.
    Raw,
    /// `personal_sign`: EIP-191 personal message.
    Personal,
    /// `eth_signTypedData*`: EIP-712 typed payload.
    TypedData,
}

/// An Avalanche transaction submitted for signing or broadcast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvalancheTxRequest {
    /// Hex-encoded unsigned transaction bytes.
    pub transaction_hex: String,
    pub chain_alias: ChainAlias,
    /// External address indices expected to sign, when the dApp knows them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_indices: Option<Vec<u32>>,
    /// Internal (change) address indices expected to sign.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_indices: Option<Vec<u32>>,
}

/// One credential attached to a signed Avalanche transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TxSignature {
    pub signature: String,
    /// `[credential index, signature index]` the credential slots into.
    pub sig_indices: [u32; 2],
}

/// Result of signing an Avalanche transaction without broadcasting it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedAvalancheTx {
    pub signed_transaction_hex: String,
    pub signatures: Vec<TxSignature>,
}

/// An EVM transaction as a dApp submits it: quantities as 0x-hex strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvmTransactionRequest {
    pub from: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_fee_per_gas: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_priority_fee_per_gas: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
}

/// A clamped derivation-index range, external and internal chains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AddressRange {
    pub external_start: u32,
    pub internal_start: u32,
    pub external_limit: u32,
    pub internal_limit: u32,
}

/// Addresses derived for an [`AddressRange`], in index order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedAddresses {
    pub external: Vec<String>,
    pub internal: Vec<String>,
}

/// Wallet-side failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("account {0} not found")]
    AccountNotFound(u32),
    #[error("address {0} does not belong to this wallet")]
    UnknownAddress(String),
    #[error("signing failed: {0}")]
    Signing(String),
    #[error("invalid transaction payload: {0}")]
    InvalidTransaction(String),
}

/// The operations the request pipeline needs from a wallet.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// All accounts, in index order.
    async fn accounts(&self) -> Result<Vec<WalletAccount>, ProviderError>;

    /// The address book, in display order.
    async fn contacts(&self) -> Result<Vec<Contact>, ProviderError>;

    /// Signs `message` with the X/P key of the account at `account_index`,
    /// using the Avalanche signed-message scheme. Returns the signature
    /// as 0x-hex.
    async fn sign_message(&self, account_index: u32, message: &str)
        -> Result<String, ProviderError>;

    /// Signs EVM `data` with the key behind `address`. Returns the
    /// 65-byte recoverable signature as 0x-hex.
    async fn sign_evm_message(
        &self,
        address: &str,
        kind: EvmMessageKind,
        data: &Value,
    ) -> Result<String, ProviderError>;

    /// Signs an Avalanche transaction without broadcasting it.
    async fn sign_transaction(
        &self,
        tx: &AvalancheTxRequest,
    ) -> Result<SignedAvalancheTx, ProviderError>;

    /// Signs and broadcasts an Avalanche transaction. Returns the tx id.
    async fn send_transaction(&self, tx: &AvalancheTxRequest) -> Result<String, ProviderError>;

    /// Signs and broadcasts an EVM transaction. Returns the tx hash.
    async fn send_evm_transaction(
        &self,
        tx: &EvmTransactionRequest,
    ) -> Result<String, ProviderError>;

    /// Derives external and internal addresses over `range`.
    async fn derive_addresses(&self, range: &AddressRange)
        -> Result<DerivedAddresses, ProviderError>;
}
