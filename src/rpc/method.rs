// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The closed set of dApp-callable RPC methods.
//!
//! Dispatch is keyed on [`RpcMethod`] rather than raw strings so the
//! handler registry can be checked for full coverage and session
//! allow-lists can be validated when a dApp connects. Parsing an unknown
//! wire name fails; the pipeline maps that to a method-not-found error.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A method a connected dApp can request of the wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum RpcMethod {
    /// Sign an arbitrary message with an X/P-chain account key.
    #[serde(rename = "avalanche_signMessage")]
    AvalancheSignMessage,
    /// Sign (but do not broadcast) an Avalanche transaction.
    #[serde(rename = "avalanche_signTransaction")]
    AvalancheSignTransaction,
    /// Sign and broadcast an Avalanche transaction.
    #[serde(rename = "avalanche_sendTransaction")]
    AvalancheSendTransaction,
    /// List the wallet's accounts.
    #[serde(rename = "avalanche_getAccounts")]
    AvalancheGetAccounts,
    /// List the wallet's address book.
    #[serde(rename = "avalanche_getContacts")]
    AvalancheGetContacts,
    /// Derive external/internal addresses over an index range.
    #[serde(rename = "avalanche_getAddressesInRange")]
    AvalancheGetAddressesInRange,
    /// Legacy EVM data signing.
    #[serde(rename = "eth_sign")]
    EthSign,
    /// EIP-191 personal message signing.
    #[serde(rename = "personal_sign")]
    PersonalSign,
    /// EIP-712 typed-data signing (unversioned).
    #[serde(rename = "eth_signTypedData")]
    EthSignTypedData,
    /// EIP-712 typed-data signing, v1 payloads.
    #[serde(rename = "eth_signTypedData_v1")]
    EthSignTypedDataV1,
    /// EIP-712 typed-data signing, v3 payloads.
    #[serde(rename = "eth_signTypedData_v3")]
    EthSignTypedDataV3,
    /// EIP-712 typed-data signing, v4 payloads.
    #[serde(rename = "eth_signTypedData_v4")]
    EthSignTypedDataV4,
    /// Sign and broadcast an EVM transaction.
    #[serde(rename = "eth_sendTransaction")]
    EthSendTransaction,
}

impl RpcMethod {
    /// Every supported method. The handler registry asserts it covers
    /// this table in full.
    pub const ALL: [RpcMethod; 13] = [
        RpcMethod::AvalancheSignMessage,
        RpcMethod::AvalancheSignTransaction,
        RpcMethod::AvalancheSendTransaction,
        RpcMethod::AvalancheGetAccounts,
        RpcMethod::AvalancheGetContacts,
        RpcMethod::AvalancheGetAddressesInRange,
        RpcMethod::EthSign,
        RpcMethod::PersonalSign,
        RpcMethod::EthSignTypedData,
        RpcMethod::EthSignTypedDataV1,
        RpcMethod::EthSignTypedDataV3,
        RpcMethod::EthSignTypedDataV4,
        RpcMethod::EthSendTransaction,
    ];

    /// Wire name of the method.
    pub fn as_str(&self) -> &'static str {
        match self {
            RpcMethod::AvalancheSignMessage => "avalanche_signMessage",
            RpcMethod::AvalancheSignTransaction => "avalanche_signTransaction",
            RpcMethod::AvalancheSendTransaction => "avalanche_sendTransaction",
            RpcMethod::AvalancheGetAccounts => "avalanche_getAccounts",
            RpcMethod::AvalancheGetContacts => "avalanche_getContacts",
            RpcMethod::AvalancheGetAddressesInRange => "avalanche_getAddressesInRange",
            RpcMethod::EthSign => "eth_sign",
            RpcMethod::PersonalSign => "personal_sign",
            RpcMethod::EthSignTypedData => "eth_signTypedData",
            RpcMethod::EthSignTypedDataV1 => "eth_signTypedData_v1",
            RpcMethod::EthSignTypedDataV3 => "eth_signTypedData_v3",
            RpcMethod::EthSignTypedDataV4 => "eth_signTypedData_v4",
            RpcMethod::EthSendTransaction => "eth_sendTransaction",
        }
    }
}

impl fmt::Display for RpcMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for method names outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown rpc method: {0}")]
pub struct UnknownMethod(pub String);

impl FromStr for RpcMethod {
    type Err = UnknownMethod;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        RpcMethod::ALL
            .iter()
            .find(|method| method.as_str() == name)
            .copied()
            .ok_or_else(|| UnknownMethod(name.to_string()))
    }
}
