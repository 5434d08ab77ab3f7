// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-method parameter validation.
//!
//! Each parser takes the raw `params` value and produces either the
//! typed parameters or the full list of [`ValidationIssue`]s, so a dApp
//! developer sees every problem at once rather than one per round trip.
//! Parsers never panic on malformed input.

use serde_json::Value;

use crate::provider::{AddressRange, AvalancheTxRequest, ChainAlias, EvmTransactionRequest};
use crate::rpc::error::ValidationIssue;

/// Upper bound applied to range-style limits. Values above it are
/// clamped, not rejected.
pub const RANGE_LIMIT_MAX: u32 = 100;

type ParseResult<T> = Result<T, Vec<ValidationIssue>>;

fn issue(path: &str, expected: &str) -> ValidationIssue {
    ValidationIssue::new(path, expected)
}

fn as_index(value: &Value) -> Option<u32> {
    value.as_u64().and_then(|n| u32::try_from(n).ok())
}

/// C-chain / EVM address: 0x followed by 40 hex digits.
fn is_evm_address(value: &str) -> bool {
    value.len() == 42
        && value.starts_with("0x")
        && value[2..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Hex payload with optional 0x prefix, non-empty, even length.
fn is_hex_payload(value: &str) -> bool {
    let digits = value.strip_prefix("0x").unwrap_or(value);
    !digits.is_empty() && digits.len() % 2 == 0 && digits.chars().all(|c| c.is_ascii_hexdigit())
}

/// 0x-prefixed hex quantity, as EVM JSON-RPC encodes numbers.
pub(crate) fn is_hex_quantity(value: &str) -> bool {
    value
        .strip_prefix("0x")
        .is_some_and(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_hexdigit()))
}

// =============================================================================
// avalanche_signMessage
// =============================================================================

/// Parameters of `avalanche_signMessage`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignMessageParams {
    pub message: String,
    /// Account to sign with; the active account when omitted.
    pub account_index: Option<u32>,
}

/// `[message]` or `[message, accountIndex]`.
pub fn parse_sign_message(params: &Value) -> ParseResult<SignMessageParams> {
    let items = match params.as_array() {
        Some(items) if (1..=2).contains(&items.len()) => items,
        _ => return Err(vec![issue("params", "array of 1 or 2 elements")]),
    };

    let mut issues = Vec::new();

    let message = match items[0].as_str() {
        Some(message) => Some(message.to_string()),
        None => {
            issues.push(issue("params[0]", "string message"));
            None
        }
    };

    let account_index = match items.get(1) {
        None => None,
        Some(value) => match as_index(value) {
            Some(index) => Some(index),
            None => {
                issues.push(issue("params[1]", "non-negative integer account index"));
                None
            }
        },
    };

    match (message, issues.is_empty()) {
        (Some(message), true) => Ok(SignMessageParams {
            message,
            account_index,
        }),
        _ => Err(issues),
    }
}

// =============================================================================
// eth_sign / personal_sign / eth_signTypedData*
// =============================================================================

/// Parameters shared by the EVM signing methods: the signing address and
/// the payload to sign. For typed-data methods `data` is the parsed
/// typed payload, never the JSON string it may have arrived as.
#[derive(Debug, Clone, PartialEq)]
pub struct EvmSignParams {
    pub address: String,
    pub data: Value,
}

/// `eth_sign`: `[address, data]`.
pub fn parse_eth_sign(params: &Value) -> ParseResult<EvmSignParams> {
    let items = match params.as_array() {
        Some(items) if items.len() == 2 => items,
        _ => return Err(vec![issue("params", "array of 2 elements")]),
    };

    let mut issues = Vec::new();
    let address = match items[0].as_str() {
        Some(address) if is_evm_address(address) => Some(address.to_string()),
        _ => {
            issues.push(issue("params[0]", "0x-prefixed signing address"));
            None
        }
    };
    let data = match items[1].as_str() {
        Some(data) => Some(Value::String(data.to_string())),
        None => {
            issues.push(issue("params[1]", "string data to sign"));
            None
        }
    };

    match (address, data) {
        (Some(address), Some(data)) if issues.is_empty() => Ok(EvmSignParams { address, data }),
        _ => Err(issues),
    }
}

/// `personal_sign`: `[data, address]`, tolerating the historical third
/// element some dApps still send.
pub fn parse_personal_sign(params: &Value) -> ParseResult<EvmSignParams> {
    let items = match params.as_array() {
        Some(items) if (2..=3).contains(&items.len()) => items,
        _ => return Err(vec![issue("params", "array of 2 or 3 elements")]),
    };

    let mut issues = Vec::new();
    let data = match items[0].as_str() {
        Some(data) => Some(Value::String(data.to_string())),
        None => {
            issues.push(issue("params[0]", "string message to sign"));
            None
        }
    };
    let address = match items[1].as_str() {
        Some(address) if is_evm_address(address) => Some(address.to_string()),
        _ => {
            issues.push(issue("params[1]", "0x-prefixed signing address"));
            None
        }
    };

    match (address, data) {
        (Some(address), Some(data)) if issues.is_empty() => Ok(EvmSignParams { address, data }),
        _ => Err(issues),
    }
}

/// `eth_signTypedData` / `_v1`: `[address, typedData]` where the payload
/// may be an object, the v1 array form, or a JSON string of either.
pub fn parse_typed_data(params: &Value) -> ParseResult<EvmSignParams> {
    parse_typed(params, false)
}

/// `eth_signTypedData_v3` / `_v4`: the payload must be an EIP-712
/// object (or a JSON string encoding one).
pub fn parse_typed_data_object(params: &Value) -> ParseResult<EvmSignParams> {
    parse_typed(params, true)
}

fn parse_typed(params: &Value, object_only: bool) -> ParseResult<EvmSignParams> {
    let items = match params.as_array() {
        Some(items) if items.len() == 2 => items,
        _ => return Err(vec![issue("params", "array of 2 elements")]),
    };

    let mut issues = Vec::new();
    let address = match items[0].as_str() {
        Some(address) if is_evm_address(address) => Some(address.to_string()),
        _ => {
            issues.push(issue("params[0]", "0x-prefixed signing address"));
            None
        }
    };

    let expected = if object_only {
        "typed-data object or JSON string of one"
    } else {
        "typed-data object, array, or JSON string of either"
    };
    let payload = match &items[1] {
        Value::String(encoded) => serde_json::from_str::<Value>(encoded).ok(),
        other => Some(other.clone()),
    };
    let data = match payload {
        Some(Value::Object(map)) => Some(Value::Object(map)),
        Some(Value::Array(list)) if !object_only => Some(Value::Array(list)),
        _ => {
            issues.push(issue("params[1]", expected));
            None
        }
    };

    match (address, data) {
        (Some(address), Some(data)) if issues.is_empty() => Ok(EvmSignParams { address, data }),
        _ => Err(issues),
    }
}

// =============================================================================
// avalanche_signTransaction / avalanche_sendTransaction
// =============================================================================

/// `{ transactionHex, chainAlias, externalIndices?, internalIndices? }`.
pub fn parse_avalanche_tx(params: &Value) -> ParseResult<AvalancheTxRequest> {
    let object = match params.as_object() {
        Some(object) => object,
        None => return Err(vec![issue("params", "transaction object")]),
    };

    let mut issues = Vec::new();

    let transaction_hex = match object.get("transactionHex").and_then(Value::as_str) {
        Some(hex) if is_hex_payload(hex) => Some(hex.to_string()),
        _ => {
            issues.push(issue(
                "params.transactionHex",
                "hex-encoded transaction bytes",
            ));
            None
        }
    };

    let chain_alias = match object
        .get("chainAlias")
        .and_then(Value::as_str)
        .and_then(ChainAlias::parse)
    {
        Some(alias) => Some(alias),
        None => {
            issues.push(issue("params.chainAlias", "one of \"X\", \"P\", \"C\""));
            None
        }
    };

    let external_indices = parse_index_list(object, "externalIndices", &mut issues);
    let internal_indices = parse_index_list(object, "internalIndices", &mut issues);

    match (transaction_hex, chain_alias, issues.is_empty()) {
        (Some(transaction_hex), Some(chain_alias), true) => Ok(AvalancheTxRequest {
            transaction_hex,
            chain_alias,
            external_indices,
            internal_indices,
        }),
        _ => Err(issues),
    }
}

fn parse_index_list(
    object: &serde_json::Map<String, Value>,
    key: &str,
    issues: &mut Vec<ValidationIssue>,
) -> Option<Vec<u32>> {
    let value = object.get(key)?;
    if value.is_null() {
        return None;
    }
    let indices = value
        .as_array()
        .and_then(|items| items.iter().map(as_index).collect::<Option<Vec<u32>>>());
    if indices.is_none() {
        issues.push(ValidationIssue::new(
            format!("params.{key}"),
            "array of non-negative integers",
        ));
    }
    indices
}

// =============================================================================
// eth_sendTransaction
// =============================================================================

/// `[{ from, to?, value?, data?, gas?, ... }]`.
pub fn parse_evm_tx(params: &Value) -> ParseResult<EvmTransactionRequest> {
    let object = match params.as_array() {
        Some(items) if items.len() == 1 => match items[0].as_object() {
            Some(object) => object,
            None => return Err(vec![issue("params[0]", "transaction object")]),
        },
        _ => return Err(vec![issue("params", "array of 1 transaction object")]),
    };

    let mut issues = Vec::new();

    let from = match object.get("from").and_then(Value::as_str) {
        Some(from) if is_evm_address(from) => from.to_string(),
        _ => {
            issues.push(issue("params[0].from", "0x-prefixed sender address"));
            String::new()
        }
    };

    let to = match object.get("to") {
        None | Some(Value::Null) => None,
        Some(value) => match value.as_str() {
            Some(to) if is_evm_address(to) => Some(to.to_string()),
            _ => {
                issues.push(issue("params[0].to", "0x-prefixed recipient address"));
                None
            }
        },
    };

    let mut quantity = |key: &str| -> Option<String> {
        match object.get(key) {
            None | Some(Value::Null) => None,
            Some(value) => match value.as_str() {
                Some(hex) if is_hex_quantity(hex) => Some(hex.to_string()),
                _ => {
                    issues.push(ValidationIssue::new(
                        format!("params[0].{key}"),
                        "0x-prefixed hex quantity",
                    ));
                    None
                }
            },
        }
    };

    let value = quantity("value");
    let gas = quantity("gas");
    let gas_price = quantity("gasPrice");
    let max_fee_per_gas = quantity("maxFeePerGas");
    let max_priority_fee_per_gas = quantity("maxPriorityFeePerGas");
    let nonce = quantity("nonce");

    let data = match object.get("data") {
        None | Some(Value::Null) => None,
        Some(value) => match value.as_str() {
            Some(data) if is_hex_quantity(data) => Some(data.to_string()),
            _ => {
                issues.push(issue("params[0].data", "0x-prefixed call data"));
                None
            }
        },
    };

    if !issues.is_empty() {
        return Err(issues);
    }

    Ok(EvmTransactionRequest {
        from,
        to,
        value,
        data,
        gas,
        gas_price,
        max_fee_per_gas,
        max_priority_fee_per_gas,
        nonce,
    })
}

// =============================================================================
// avalanche_getAddressesInRange
// =============================================================================

/// `[externalStart, internalStart, externalLimit?, internalLimit?]`.
/// Limits default to 0 and are clamped to [`RANGE_LIMIT_MAX`].
pub fn parse_address_range(params: &Value) -> ParseResult<AddressRange> {
    let items = match params.as_array() {
        Some(items) if (2..=4).contains(&items.len()) => items,
        _ => return Err(vec![issue("params", "array of 2 to 4 elements")]),
    };

    let mut issues = Vec::new();
    let mut field = |position: usize, expected: &str| -> u32 {
        match items.get(position) {
            None => 0,
            Some(value) => match as_index(value) {
                Some(index) => index,
                None => {
                    issues.push(ValidationIssue::new(format!("params[{position}]"), expected));
                    0
                }
            },
        }
    };

    let external_start = field(0, "non-negative integer start index");
    let internal_start = field(1, "non-negative integer start index");
    let external_limit = field(2, "non-negative integer limit");
    let internal_limit = field(3, "non-negative integer limit");

    if !issues.is_empty() {
        return Err(issues);
    }

    Ok(AddressRange {
        external_start,
        internal_start,
        external_limit: external_limit.min(RANGE_LIMIT_MAX),
        internal_limit: internal_limit.min(RANGE_LIMIT_MAX),
    })
}

// =============================================================================
// parameterless methods
// =============================================================================

/// `avalanche_getAccounts` / `avalanche_getContacts` take no parameters;
/// absent params and an empty array are both accepted.
pub fn ensure_no_params(params: &Value) -> ParseResult<()> {
    match params {
        Value::Null => Ok(()),
        Value::Array(items) if items.is_empty() => Ok(()),
        _ => Err(vec![issue("params", "no parameters")]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    #[test]
    fn sign_message_accepts_both_arities() {
        let parsed = parse_sign_message(&json!(["hello"])).unwrap();
        assert_eq!(parsed.message, "hello");
        assert_eq!(parsed.account_index, None);

        let parsed = parse_sign_message(&json!(["hello", 2])).unwrap();
        assert_eq!(parsed.account_index, Some(2));
    }

    #[test]
    fn sign_message_rejects_malformed_params() {
        for params in [
            json!(null),
            json!([]),
            json!("hello"),
            json!(["a", 1, "extra"]),
        ] {
            assert!(parse_sign_message(&params).is_err(), "params {params}");
        }

        let issues = parse_sign_message(&json!([42])).unwrap_err();
        assert_eq!(issues[0].path, "params[0]");

        for bad_index in [json!(["hello", -1]), json!(["hello", 1.5]), json!(["hello", "2"])] {
            let issues = parse_sign_message(&bad_index).unwrap_err();
            assert_eq!(issues[0].path, "params[1]");
        }
    }

    #[test]
    fn sign_message_reports_every_issue_at_once() {
        let issues = parse_sign_message(&json!([42, -1])).unwrap_err();
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].path, "params[0]");
        assert_eq!(issues[1].path, "params[1]");
    }

    #[test]
    fn eth_sign_wants_address_then_data() {
        let parsed = parse_eth_sign(&json!([ADDRESS, "0xdeadbeef"])).unwrap();
        assert_eq!(parsed.address, ADDRESS);
        assert_eq!(parsed.data, json!("0xdeadbeef"));

        for params in [
            json!(null),
            json!([]),
            json!([null]),
            json!(["48656c6c6f2041564158", ADDRESS]),
            json!([ADDRESS]),
        ] {
            assert!(parse_eth_sign(&params).is_err(), "params {params}");
        }
    }

    #[test]
    fn personal_sign_wants_data_then_address() {
        let parsed = parse_personal_sign(&json!(["hello message", ADDRESS])).unwrap();
        assert_eq!(parsed.address, ADDRESS);
        assert_eq!(parsed.data, json!("hello message"));

        // Historical third element is tolerated and ignored.
        let parsed =
            parse_personal_sign(&json!(["hello message", ADDRESS, "some password"])).unwrap();
        assert_eq!(parsed.data, json!("hello message"));

        for params in [
            json!(null),
            json!([null]),
            json!(["0xdata"]),
            json!([ADDRESS, "position 1 must be the address"]),
            json!(["msg", ADDRESS, "x", "y"]),
        ] {
            assert!(parse_personal_sign(&params).is_err(), "params {params}");
        }
    }

    #[test]
    fn typed_data_accepts_object_array_and_json_string() {
        let object = json!({ "types": {}, "domain": {}, "message": {} });
        let v1_array = json!([{ "type": "string", "name": "greeting", "value": "hi" }]);

        let parsed = parse_typed_data(&json!([ADDRESS, object])).unwrap();
        assert!(parsed.data.is_object());

        let parsed = parse_typed_data(&json!([ADDRESS, v1_array])).unwrap();
        assert!(parsed.data.is_array());

        let parsed = parse_typed_data(&json!([ADDRESS, object.to_string()])).unwrap();
        assert_eq!(parsed.data, object);
    }

    #[test]
    fn versioned_typed_data_requires_an_object() {
        let object = json!({ "types": {}, "domain": {}, "message": {} });
        let v1_array = json!([{ "type": "string", "name": "greeting", "value": "hi" }]);

        assert!(parse_typed_data_object(&json!([ADDRESS, object])).is_ok());
        assert!(parse_typed_data_object(&json!([ADDRESS, object.to_string()])).is_ok());

        let issues = parse_typed_data_object(&json!([ADDRESS, v1_array])).unwrap_err();
        assert_eq!(issues[0].path, "params[1]");

        let issues = parse_typed_data_object(&json!([ADDRESS, "not json"])).unwrap_err();
        assert_eq!(issues[0].path, "params[1]");
    }

    #[test]
    fn avalanche_tx_parses_the_full_object() {
        let parsed = parse_avalanche_tx(&json!({
            "transactionHex": "0x00000001abcd",
            "chainAlias": "X",
            "externalIndices": [0, 1],
            "internalIndices": []
        }))
        .unwrap();

        assert_eq!(parsed.transaction_hex, "0x00000001abcd");
        assert_eq!(parsed.chain_alias, ChainAlias::X);
        assert_eq!(parsed.external_indices, Some(vec![0, 1]));
        assert_eq!(parsed.internal_indices, Some(vec![]));
    }

    #[test]
    fn avalanche_tx_rejects_bad_fields() {
        let issues = parse_avalanche_tx(&json!({
            "transactionHex": "not hex",
            "chainAlias": "Q"
        }))
        .unwrap_err();
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].path, "params.transactionHex");
        assert_eq!(issues[1].path, "params.chainAlias");

        assert!(parse_avalanche_tx(&json!(["0xabcd", "X"])).is_err());
        assert!(parse_avalanche_tx(&json!(null)).is_err());

        let issues = parse_avalanche_tx(&json!({
            "transactionHex": "0xabcd",
            "chainAlias": "P",
            "externalIndices": [0, -1]
        }))
        .unwrap_err();
        assert_eq!(issues[0].path, "params.externalIndices");
    }

    #[test]
    fn evm_tx_requires_a_single_object_with_sender() {
        let parsed = parse_evm_tx(&json!([{
            "from": ADDRESS,
            "to": "0x70997970C51812dc3A010C7d01b50e0d17dc79C8",
            "value": "0x0de0b6b3a7640000"
        }]))
        .unwrap();
        assert_eq!(parsed.from, ADDRESS);
        assert_eq!(parsed.value.as_deref(), Some("0x0de0b6b3a7640000"));
        assert_eq!(parsed.gas, None);

        assert!(parse_evm_tx(&json!([])).is_err());
        assert!(parse_evm_tx(&json!([{}, {}])).is_err());
        assert!(parse_evm_tx(&json!(["nope"])).is_err());

        let issues = parse_evm_tx(&json!([{ "to": ADDRESS }])).unwrap_err();
        assert_eq!(issues[0].path, "params[0].from");

        let issues = parse_evm_tx(&json!([{ "from": ADDRESS, "value": "1000" }])).unwrap_err();
        assert_eq!(issues[0].path, "params[0].value");
    }

    #[test]
    fn address_range_defaults_and_clamps_limits() {
        let range = parse_address_range(&json!([0, 0])).unwrap();
        assert_eq!(range.external_limit, 0);
        assert_eq!(range.internal_limit, 0);

        let range = parse_address_range(&json!([5, 3, 20, 10])).unwrap();
        assert_eq!(
            range,
            AddressRange {
                external_start: 5,
                internal_start: 3,
                external_limit: 20,
                internal_limit: 10
            }
        );

        // Values above the cap clamp to exactly the cap.
        let range = parse_address_range(&json!([0, 0, 250, 101])).unwrap();
        assert_eq!(range.external_limit, RANGE_LIMIT_MAX);
        assert_eq!(range.internal_limit, RANGE_LIMIT_MAX);

        let range = parse_address_range(&json!([0, 0, 100, 100])).unwrap();
        assert_eq!(range.external_limit, 100);
    }

    #[test]
    fn address_range_rejects_negatives_and_bad_arity() {
        assert!(parse_address_range(&json!([0])).is_err());
        assert!(parse_address_range(&json!([0, 0, 0, 0, 0])).is_err());
        assert!(parse_address_range(&json!(null)).is_err());

        let issues = parse_address_range(&json!([0, 0, -5])).unwrap_err();
        assert_eq!(issues[0].path, "params[2]");
    }

    #[test]
    fn parameterless_methods_accept_null_and_empty_array() {
        assert!(ensure_no_params(&Value::Null).is_ok());
        assert!(ensure_no_params(&json!([])).is_ok());
        assert!(ensure_no_params(&json!(["extra"])).is_err());
        assert!(ensure_no_params(&json!({})).is_err());
    }
}
