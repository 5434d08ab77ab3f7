// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Deterministic development wallet.
//!
//! Two accounts derived from the well-known local-node test keys, a
//! fixed address book, and real ECDSA signatures over the same digests
//! a production signer would use. Broadcasts are simulated: `send_*`
//! return stable ids derived from the payload instead of hitting a
//! node, and X/P addresses are stable placeholders rather than proper
//! bech32 derivations.
//!
//! EIP-712 payloads are signed over their canonical JSON encoding with
//! the EIP-191 scheme. That keeps signatures deterministic and
//! verifiable in dev without carrying a full typed-data hasher; a
//! production provider plugs in real struct hashing behind the same
//! trait method.

use alloy::hex;
use alloy::primitives::keccak256;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer;
use async_trait::async_trait;
use k256::ecdsa::SigningKey;
use serde_json::Value;
use sha2::{Digest, Sha256};

use super::{
    AddressRange, AvalancheTxRequest, Contact, DerivedAddresses, EvmMessageKind,
    EvmTransactionRequest, ProviderError, SignedAvalancheTx, TxSignature, WalletAccount,
    WalletProvider,
};

// =============================================================================
// Fixtures
// =============================================================================

/// Private keys for the dev accounts. These are the first two accounts of
/// the standard local-node test mnemonic and hold no real funds.
const DEV_ACCOUNT_KEYS: [&str; 2] = [
    "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
    "59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d",
];

/// Avalanche signed-message prefix: 0x1A (prefix length) followed by the
/// prefix text, matching the AVM wallet convention.
const AVALANCHE_MESSAGE_PREFIX: &[u8] = b"\x1aAvalanche Signed Message:\n";

struct DevAccount {
    index: u32,
    name: String,
    xp_key: SigningKey,
    evm_signer: PrivateKeySigner,
}

impl DevAccount {
    fn wallet_account(&self) -> WalletAccount {
        let xp = xp_address(&self.xp_key);
        WalletAccount {
            index: self.index,
            name: self.name.clone(),
            address_c: self.evm_signer.address().to_string(),
            address_x: format!("X-{xp}"),
            address_p: format!("P-{xp}"),
            active: self.index == 0,
        }
    }
}

// =============================================================================
// Provider
// =============================================================================

/// In-process wallet backed by fixed dev keys.
pub struct DevWalletProvider {
    accounts: Vec<DevAccount>,
    contacts: Vec<Contact>,
}

impl DevWalletProvider {
    pub fn new() -> Self {
        let accounts = DEV_ACCOUNT_KEYS
            .iter()
            .enumerate()
            .map(|(index, key_hex)| {
                let bytes = hex::decode(key_hex).expect("dev key constant is valid hex");
                DevAccount {
                    index: index as u32,
                    name: format!("Account {index}"),
                    xp_key: SigningKey::from_slice(&bytes)
                        .expect("dev key constant is a valid secp256k1 scalar"),
                    evm_signer: PrivateKeySigner::from_slice(&bytes)
                        .expect("dev key constant is a valid secp256k1 scalar"),
                }
            })
            .collect();

        let contacts = vec![
            Contact {
                id: "dev-contact-1".to_string(),
                name: "Dev Faucet".to_string(),
                address: "0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC".to_string(),
                address_xp: None,
            },
            Contact {
                id: "dev-contact-2".to_string(),
                name: "Test Recipient".to_string(),
                address: "0x90F79bf6EB2c4f870365E785982E1f101E93b906".to_string(),
                address_xp: None,
            },
        ];

        Self { accounts, contacts }
    }

    fn account_at(&self, index: u32) -> Result<&DevAccount, ProviderError> {
        self.accounts
            .iter()
            .find(|account| account.index == index)
            .ok_or(ProviderError::AccountNotFound(index))
    }

    fn account_for_evm_address(&self, address: &str) -> Result<&DevAccount, ProviderError> {
        self.accounts
            .iter()
            .find(|account| {
                account
                    .evm_signer
                    .address()
                    .to_string()
                    .eq_ignore_ascii_case(address)
            })
            .ok_or_else(|| ProviderError::UnknownAddress(address.to_string()))
    }

    /// Constructed with at least one account, so index 0 always exists.
    fn active_account(&self) -> &DevAccount {
        &self.accounts[0]
    }

    fn sign_recoverable(key: &SigningKey, digest: &[u8]) -> Result<String, ProviderError> {
        let (signature, recovery_id) = key
            .sign_prehash_recoverable(digest)
            .map_err(|err| ProviderError::Signing(err.to_string()))?;
        let mut bytes = signature.to_bytes().to_vec();
        bytes.push(recovery_id.to_byte());
        Ok(hex::encode_prefixed(bytes))
    }
}

impl Default for DevWalletProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WalletProvider for DevWalletProvider {
    async fn accounts(&self) -> Result<Vec<WalletAccount>, ProviderError> {
        Ok(self
            .accounts
            .iter()
            .map(DevAccount::wallet_account)
            .collect())
    }

    async fn contacts(&self) -> Result<Vec<Contact>, ProviderError> {
        Ok(self.contacts.clone())
    }

    async fn sign_message(
        &self,
        account_index: u32,
        message: &str,
    ) -> Result<String, ProviderError> {
        let account = self.account_at(account_index)?;
        let digest = avalanche_message_digest(message);
        Self::sign_recoverable(&account.xp_key, &digest)
    }

    async fn sign_evm_message(
        &self,
        address: &str,
        kind: EvmMessageKind,
        data: &Value,
    ) -> Result<String, ProviderError> {
        let account = self.account_for_evm_address(address)?;
        let bytes = match kind {
            EvmMessageKind::Raw | EvmMessageKind::Personal => {
                let text = data.as_str().ok_or_else(|| {
                    ProviderError::Signing("message payload must be a string".to_string())
                })?;
                evm_message_bytes(text)
            }
            EvmMessageKind::TypedData => serde_json::to_string(data)
                .map_err(|err| ProviderError::Signing(err.to_string()))?
                .into_bytes(),
        };
        let signature = account
            .evm_signer
            .sign_message(&bytes)
            .await
            .map_err(|err| ProviderError::Signing(err.to_string()))?;
        Ok(hex::encode_prefixed(signature.as_bytes()))
    }

    async fn sign_transaction(
        &self,
        tx: &AvalancheTxRequest,
    ) -> Result<SignedAvalancheTx, ProviderError> {
        let bytes = decode_tx_hex(&tx.transaction_hex)?;
        let digest = Sha256::digest(&bytes);
        let signature = Self::sign_recoverable(&self.active_account().xp_key, &digest)?;

        let signatures: Vec<TxSignature> = credential_slots(tx)
            .into_iter()
            .map(|sig_indices| TxSignature {
                signature: signature.clone(),
                sig_indices,
            })
            .collect();

        // Simulated framing: unsigned bytes with the credential bytes
        // appended, so the result is stable and visibly derived from the
        // input.
        let signed_transaction_hex = format!(
            "{}{}",
            hex::encode_prefixed(&bytes),
            signature.trim_start_matches("0x")
        );

        Ok(SignedAvalancheTx {
            signed_transaction_hex,
            signatures,
        })
    }

    async fn send_transaction(&self, tx: &AvalancheTxRequest) -> Result<String, ProviderError> {
        let bytes = decode_tx_hex(&tx.transaction_hex)?;
        let mut hasher = Sha256::new();
        hasher.update(tx.chain_alias.as_str().as_bytes());
        hasher.update(&bytes);
        let tx_id = hex::encode_prefixed(hasher.finalize());
        tracing::info!(
            chain = tx.chain_alias.as_str(),
            tx_id = %tx_id,
            "simulated Avalanche broadcast"
        );
        Ok(tx_id)
    }

    async fn send_evm_transaction(
        &self,
        tx: &EvmTransactionRequest,
    ) -> Result<String, ProviderError> {
        self.account_for_evm_address(&tx.from)?;
        let encoded =
            serde_json::to_string(tx).map_err(|err| ProviderError::Signing(err.to_string()))?;
        let tx_hash = keccak256(encoded.as_bytes()).to_string();
        tracing::info!(tx_hash = %tx_hash, "simulated EVM broadcast");
        Ok(tx_hash)
    }

    async fn derive_addresses(
        &self,
        range: &AddressRange,
    ) -> Result<DerivedAddresses, ProviderError> {
        let root = &self.active_account().xp_key;
        Ok(DerivedAddresses {
            external: derive_chain(root, 0, range.external_start, range.external_limit)?,
            internal: derive_chain(root, 1, range.internal_start, range.internal_limit)?,
        })
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// sha256 over the Avalanche signed-message framing: prefix, 4-byte
/// big-endian message length, message bytes.
fn avalanche_message_digest(message: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(AVALANCHE_MESSAGE_PREFIX);
    hasher.update((message.len() as u32).to_be_bytes());
    hasher.update(message.as_bytes());
    hasher.finalize().into()
}

/// `eth_sign`/`personal_sign` payloads arrive either as hex bytes or as
/// plain text. Hex-shaped input is decoded; anything else signs its
/// UTF-8 bytes.
fn evm_message_bytes(data: &str) -> Vec<u8> {
    let digits = data.strip_prefix("0x").unwrap_or(data);
    if !digits.is_empty() && digits.len() % 2 == 0 && digits.bytes().all(|b| b.is_ascii_hexdigit())
    {
        if let Ok(bytes) = hex::decode(digits) {
            return bytes;
        }
    }
    data.as_bytes().to_vec()
}

fn decode_tx_hex(transaction_hex: &str) -> Result<Vec<u8>, ProviderError> {
    let digits = transaction_hex.strip_prefix("0x").unwrap_or(transaction_hex);
    hex::decode(digits)
        .map_err(|_| ProviderError::InvalidTransaction("transaction bytes are not valid hex".to_string()))
}

/// Credential slots to sign: one per requested address index, in the
/// order the dApp listed them (external first), or a single slot when
/// the request named none.
fn credential_slots(tx: &AvalancheTxRequest) -> Vec<[u32; 2]> {
    match (&tx.external_indices, &tx.internal_indices) {
        (None, None) => vec![[0, 0]],
        (external, internal) => external
            .iter()
            .flatten()
            .chain(internal.iter().flatten())
            .enumerate()
            .map(|(credential, &index)| [credential as u32, index])
            .collect(),
    }
}

/// Stable bech32-shaped placeholder for an X/P address: `avax1` plus
/// 19 bytes of the compressed public key's sha256. Not a real
/// derivation.
fn xp_address(key: &SigningKey) -> String {
    let compressed = key.verifying_key().to_encoded_point(true);
    let digest = Sha256::digest(compressed.as_bytes());
    format!("avax1{}", hex::encode(&digest[..19]))
}

fn derive_chain(
    root: &SigningKey,
    change: u8,
    start: u32,
    limit: u32,
) -> Result<Vec<String>, ProviderError> {
    (start..start.saturating_add(limit))
        .map(|index| {
            let mut hasher = Sha256::new();
            hasher.update(root.to_bytes());
            hasher.update([change]);
            hasher.update(index.to_be_bytes());
            let digest = hasher.finalize();
            let key = SigningKey::from_slice(&digest)
                .map_err(|err| ProviderError::Signing(err.to_string()))?;
            Ok(xp_address(&key))
        })
        .collect()
}
