//! Host-facing result shapes: wrapped accounts and the apply accumulator.

use serde::{Deserialize, Serialize};

use super::{Account, AccountHasher, StateAddress, StateError};

/// An account as the host runtime stores it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WrappedAccount {
    pub account_id: StateAddress,
    /// Content hash of `data`.
    pub state_id: String,
    pub data: Account,
    pub timestamp: u64,
}

/// Wrap an account for the host, hashing it first.
///
/// Contract-code accounts that already carry a hash are clean and reuse it.
pub fn wrap_account(account_id: StateAddress, mut account: Account) -> Result<WrappedAccount, StateError> {
    let state_id = match &account {
        Account::ContractCode(code) if !code.hash.is_empty() => code.hash.clone(),
        _ => AccountHasher::hash(&mut account)?,
    };
    Ok(WrappedAccount {
        account_id,
        state_id,
        timestamp: account.timestamp(),
        data: account,
    })
}

/// One account changed by an applied transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountWrite {
    pub account_id: StateAddress,
    pub hash: String,
    pub timestamp: u64,
    pub account: Account,
}

/// Auxiliary audit record emitted alongside an applied transfer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppReceiptData {
    pub tx_id: String,
    pub timestamp: u64,
    pub data: serde_json::Value,
}

/// Accumulator the host passes into `apply`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApplyResponse {
    pub tx_id: String,
    pub tx_timestamp: u64,
    pub account_writes: Vec<AccountWrite>,
    pub app_receipt_data: Option<AppReceiptData>,
}

impl ApplyResponse {
    pub fn new(tx_id: impl Into<String>, tx_timestamp: u64) -> Self {
        Self {
            tx_id: tx_id.into(),
            tx_timestamp,
            ..Default::default()
        }
    }

    /// Record a changed account with the hash it currently carries.
    pub fn add_changed_account(&mut self, account_id: StateAddress, account: Account) {
        self.account_writes.push(AccountWrite {
            account_id,
            hash: account.hash().to_string(),
            timestamp: account.timestamp(),
            account,
        });
    }

    pub fn add_receipt_data(&mut self, data: AppReceiptData) {
        self.app_receipt_data = Some(data);
    }

    pub fn changed(&self, account_id: &str) -> Option<&AccountWrite> {
        self.account_writes.iter().find(|w| w.account_id == account_id)
    }
}
