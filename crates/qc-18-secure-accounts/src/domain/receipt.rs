//! Audit receipt emitted for each applied transfer.

use serde::{Deserialize, Serialize};
use shared_types::U256;

/// Body of the `AppReceiptData` attached to an applied transfer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferReceipt {
    /// Configured source EOA address, as written in genesis.
    pub source: String,
    pub recipient: String,
    /// `0x`-prefixed hex amount.
    pub amount: String,
    pub tx_id: String,
    pub timestamp: u64,
    pub account_name: String,
}

impl TransferReceipt {
    pub fn new(
        source: impl Into<String>,
        recipient: impl Into<String>,
        amount: U256,
        tx_id: impl Into<String>,
        timestamp: u64,
        account_name: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            recipient: recipient.into(),
            amount: format!("0x{:x}", amount),
            tx_id: tx_id.into(),
            timestamp,
            account_name: account_name.into(),
        }
    }
}
