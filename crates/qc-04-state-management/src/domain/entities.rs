//! # Domain Entities for State Management
//!
//! Tagged account representation shared by the treasury engine.
//!
//! ## Type Decisions
//!
//! - `AccountType` is the explicit discriminant; numeric values are the ones
//!   written into hashes and the binary layout, so they must never be
//!   renumbered.
//! - `balance: U256` - EVM balances are 256-bit; treasury amounts such as
//!   2×10¹⁸ already exceed `u64`.
//! - Account bodies keep camelCase JSON names because the content hash is
//!   computed over their JSON form and must match on every node.

use serde::{Deserialize, Serialize};
use shared_types::{Hash, U256};

/// Key of an account in the host's state view: 64 lower-case hex chars.
pub type StateAddress = String;

/// Empty code hash for externally owned accounts (EOAs).
pub const EMPTY_CODE_HASH: Hash = [0u8; 32];

/// Keccak256 hash of an empty RLP-encoded trie.
/// Value: keccak256(RLP("")) = 0x56e81f171bcc55a6ff8345e692c0f86e5b48e01b996cadc001622fb5e363b421
pub const EMPTY_TRIE_ROOT: Hash = [
    0x56, 0xe8, 0x1f, 0x17, 0x1b, 0xcc, 0x55, 0xa6, 0xff, 0x83, 0x45, 0xe6, 0x92, 0xc0, 0xf8, 0x6e,
    0x5b, 0x48, 0xe0, 0x1b, 0x99, 0x6c, 0xad, 0xc0, 0x01, 0x62, 0x2f, 0xb5, 0xe3, 0x63, 0xb4, 0x21,
];

// =============================================================================
// DISCRIMINANT
// =============================================================================

/// Account kind discriminant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum AccountType {
    Account = 0,
    ContractStorage = 1,
    ContractCode = 2,
    Receipt = 3,
    Debug = 4,
    NetworkAccount = 5,
    NodeAccount = 6,
    NodeRewardReceipt = 7,
    DevAccount = 8,
    NodeAccount2 = 9,
    StakeReceipt = 10,
    UnstakeReceipt = 11,
    InternalTxReceipt = 12,
    SecureAccount = 13,
}

impl AccountType {
    /// Kinds whose content hash covers the whole object (minus `hash`) and
    /// which are stored as [`InternalAccount`].
    pub fn is_administrative(self) -> bool {
        matches!(
            self,
            Self::Debug
                | Self::NetworkAccount
                | Self::NodeAccount
                | Self::NodeAccount2
                | Self::NodeRewardReceipt
                | Self::StakeReceipt
                | Self::UnstakeReceipt
                | Self::InternalTxReceipt
                | Self::DevAccount
        )
    }
}

impl TryFrom<u16> for AccountType {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => Self::Account,
            1 => Self::ContractStorage,
            2 => Self::ContractCode,
            3 => Self::Receipt,
            4 => Self::Debug,
            5 => Self::NetworkAccount,
            6 => Self::NodeAccount,
            7 => Self::NodeRewardReceipt,
            8 => Self::DevAccount,
            9 => Self::NodeAccount2,
            10 => Self::StakeReceipt,
            11 => Self::UnstakeReceipt,
            12 => Self::InternalTxReceipt,
            13 => Self::SecureAccount,
            other => return Err(format!("unknown account type {other}")),
        })
    }
}

impl From<AccountType> for u16 {
    fn from(kind: AccountType) -> Self {
        kind as u16
    }
}

// =============================================================================
// ACCOUNT BODIES
// =============================================================================

/// Core EVM account fields.
///
/// ## Fields
///
/// - `nonce`: Transaction count, increments by exactly 1 per sent transfer
/// - `balance`: Balance in base units (wei equivalent)
/// - `storage_root`: Root of the account's storage trie
/// - `code_hash`: Hash of contract bytecode (EMPTY_CODE_HASH for EOAs)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvmAccountInfo {
    pub nonce: u64,
    pub balance: U256,
    #[serde(with = "hex::serde")]
    pub storage_root: Hash,
    #[serde(with = "hex::serde")]
    pub code_hash: Hash,
}

impl Default for EvmAccountInfo {
    fn default() -> Self {
        Self {
            nonce: 0,
            balance: U256::zero(),
            storage_root: EMPTY_TRIE_ROOT,
            code_hash: EMPTY_CODE_HASH,
        }
    }
}

impl EvmAccountInfo {
    /// Create an account with the specified balance.
    pub fn new(balance: U256) -> Self {
        Self {
            balance,
            ..Default::default()
        }
    }

    /// Builder method to set nonce.
    pub fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = nonce;
        self
    }
}

/// Staking metadata attached to an operator's EOA.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorAccountInfo {
    pub stake: U256,
    pub nominee: String,
    pub cert_exp: u64,
}

/// Externally owned account wrapped for the shard state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvmAccount {
    pub eth_address: String,
    pub hash: String,
    pub timestamp: u64,
    pub account: EvmAccountInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator_account_info: Option<OperatorAccountInfo>,
}

impl EvmAccount {
    pub fn new(eth_address: impl Into<String>, account: EvmAccountInfo) -> Self {
        Self {
            eth_address: eth_address.into(),
            hash: String::new(),
            timestamp: 0,
            account,
            operator_account_info: None,
        }
    }
}

/// One contract storage slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractStorageAccount {
    pub eth_address: String,
    pub hash: String,
    pub timestamp: u64,
    pub key: String,
    #[serde(with = "hex::serde")]
    pub value: Vec<u8>,
}

/// Deployed contract bytecode.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractCodeAccount {
    pub eth_address: String,
    pub hash: String,
    pub timestamp: u64,
    #[serde(with = "hex::serde")]
    pub code_hash: Hash,
    #[serde(with = "hex::serde")]
    pub code_byte: Vec<u8>,
}

/// EVM transaction receipt stored as an account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptAccount {
    pub eth_address: String,
    pub hash: String,
    pub timestamp: u64,
    pub tx_id: String,
    pub receipt: serde_json::Value,
}

/// Identity and administrative accounts (network, node, dev, stake
/// receipts, ...). Their body is opaque to the treasury engine; only the
/// discriminant and the common header fields are typed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalAccount {
    pub id: String,
    pub account_type: AccountType,
    pub hash: String,
    pub timestamp: u64,
    pub data: serde_json::Value,
}

impl InternalAccount {
    /// Returns `None` when `account_type` is not an administrative kind.
    pub fn new(
        id: impl Into<String>,
        account_type: AccountType,
        timestamp: u64,
        data: serde_json::Value,
    ) -> Option<Self> {
        account_type.is_administrative().then(|| Self {
            id: id.into(),
            account_type,
            hash: String::new(),
            timestamp,
            data,
        })
    }
}

/// Multisig-governed treasury account.
///
/// `next_transfer_amount` is the per-transfer ceiling and
/// `next_transfer_time` the earliest unix-ms at which the next transfer may
/// execute. Neither is advanced by transfers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecureAccount {
    pub id: String,
    pub hash: String,
    pub timestamp: u64,
    pub name: String,
    pub next_transfer_amount: U256,
    pub next_transfer_time: u64,
    pub nonce: u64,
}

// =============================================================================
// TAGGED ACCOUNT
// =============================================================================

/// Any account the engine can see in a state view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Account {
    Evm(EvmAccount),
    ContractStorage(ContractStorageAccount),
    ContractCode(ContractCodeAccount),
    Receipt(ReceiptAccount),
    Internal(InternalAccount),
    Secure(SecureAccount),
}

impl Account {
    pub fn account_type(&self) -> AccountType {
        match self {
            Self::Evm(_) => AccountType::Account,
            Self::ContractStorage(_) => AccountType::ContractStorage,
            Self::ContractCode(_) => AccountType::ContractCode,
            Self::Receipt(_) => AccountType::Receipt,
            Self::Internal(a) => a.account_type,
            Self::Secure(_) => AccountType::SecureAccount,
        }
    }

    pub fn hash(&self) -> &str {
        match self {
            Self::Evm(a) => &a.hash,
            Self::ContractStorage(a) => &a.hash,
            Self::ContractCode(a) => &a.hash,
            Self::Receipt(a) => &a.hash,
            Self::Internal(a) => &a.hash,
            Self::Secure(a) => &a.hash,
        }
    }

    pub(crate) fn set_hash(&mut self, hash: String) {
        match self {
            Self::Evm(a) => a.hash = hash,
            Self::ContractStorage(a) => a.hash = hash,
            Self::ContractCode(a) => a.hash = hash,
            Self::Receipt(a) => a.hash = hash,
            Self::Internal(a) => a.hash = hash,
            Self::Secure(a) => a.hash = hash,
        }
    }

    pub fn timestamp(&self) -> u64 {
        match self {
            Self::Evm(a) => a.timestamp,
            Self::ContractStorage(a) => a.timestamp,
            Self::ContractCode(a) => a.timestamp,
            Self::Receipt(a) => a.timestamp,
            Self::Internal(a) => a.timestamp,
            Self::Secure(a) => a.timestamp,
        }
    }

    pub fn as_evm(&self) -> Option<&EvmAccount> {
        match self {
            Self::Evm(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_secure(&self) -> Option<&SecureAccount> {
        match self {
            Self::Secure(a) => Some(a),
            _ => None,
        }
    }
}

impl From<EvmAccount> for Account {
    fn from(account: EvmAccount) -> Self {
        Self::Evm(account)
    }
}

impl From<SecureAccount> for Account {
    fn from(account: SecureAccount) -> Self {
        Self::Secure(account)
    }
}
