//! # Account Content Hashing
//!
//! Type-dispatched, deterministic digest over the semantically relevant
//! fields of an account. Nodes compare these digests to agree on state, so
//! the hashed view of each kind is fixed:
//!
//! | Kind | Hashed view |
//! |------|-------------|
//! | administrative / secure | whole object minus `hash` |
//! | EVM account | `{EVMAccountInfo, operatorAccountInfo?, timestamp}` |
//! | contract storage | `{key, value}` |
//! | contract code | `{key: codeHash, value: codeByte}` |
//! | receipt | `{key: txId, value: receipt}` |
//!
//! Digests are Keccak256 over canonical JSON, rendered as 64 lower-case hex
//! characters without prefix.

use serde::Serialize;
use serde_json::Value;
use sha3::{Digest, Keccak256};
use shared_types::{canonical_json, canonical_json_value, Hash};

use super::{Account, EvmAccountInfo, OperatorAccountInfo, StateError};

/// Compute Keccak256 hash.
pub fn keccak256(data: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Hex digest of any serializable value's canonical JSON.
pub fn hash_object<T: Serialize + ?Sized>(value: &T) -> Result<String, StateError> {
    let canonical = canonical_json(value)?;
    Ok(hex::encode(keccak256(canonical.as_bytes())))
}

fn hash_value(value: &Value) -> Result<String, StateError> {
    let canonical = canonical_json_value(value)?;
    Ok(hex::encode(keccak256(canonical.as_bytes())))
}

#[derive(Serialize)]
struct EvmHashView<'a> {
    #[serde(rename = "EVMAccountInfo")]
    evm_account_info: &'a EvmAccountInfo,
    #[serde(rename = "operatorAccountInfo", skip_serializing_if = "Option::is_none")]
    operator_account_info: Option<&'a OperatorAccountInfo>,
    timestamp: u64,
}

#[derive(Serialize)]
struct KeyValueView<K: Serialize, V: Serialize> {
    key: K,
    value: V,
}

/// Stateless hasher dispatching on the account discriminant.
pub struct AccountHasher;

impl AccountHasher {
    /// Compute the content hash without touching the account.
    ///
    /// Any hash already stored on the account is ignored.
    pub fn compute(account: &Account) -> Result<String, StateError> {
        match account {
            Account::Evm(a) => hash_object(&EvmHashView {
                evm_account_info: &a.account,
                operator_account_info: a.operator_account_info.as_ref(),
                timestamp: a.timestamp,
            }),
            Account::ContractStorage(a) => hash_object(&KeyValueView {
                key: &a.key,
                value: hex::encode(&a.value),
            }),
            Account::ContractCode(a) => hash_object(&KeyValueView {
                key: hex::encode(a.code_hash),
                value: hex::encode(&a.code_byte),
            }),
            Account::Receipt(a) => hash_object(&KeyValueView {
                key: &a.tx_id,
                value: &a.receipt,
            }),
            Account::Internal(a) => {
                let mut value = serde_json::to_value(a)?;
                strip_hash(&mut value);
                hash_value(&value)
            }
            Account::Secure(a) => {
                let mut value = serde_json::to_value(a)?;
                strip_hash(&mut value);
                if let Value::Object(map) = &mut value {
                    map.insert(
                        "accountType".into(),
                        Value::from(u16::from(account.account_type())),
                    );
                }
                hash_value(&value)
            }
        }
    }

    /// Strip the prior hash, recompute, store it on the account and return it.
    pub fn hash(account: &mut Account) -> Result<String, StateError> {
        account.set_hash(String::new());
        let digest = Self::compute(account)?;
        account.set_hash(digest.clone());
        Ok(digest)
    }
}

fn strip_hash(value: &mut Value) {
    if let Value::Object(map) = value {
        map.remove("hash");
    }
}
