//! The treasury transfer transaction as submitted by the host.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use shared_types::Sign;

/// Internal transaction discriminant. Only the treasury transfer is handled
/// here; every other kind is carried through so it can be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum InternalTxType {
    TransferFromSecureAccount,
    Other(u8),
}

impl InternalTxType {
    const TRANSFER_FROM_SECURE_ACCOUNT: u8 = 13;
}

impl From<u8> for InternalTxType {
    fn from(value: u8) -> Self {
        match value {
            Self::TRANSFER_FROM_SECURE_ACCOUNT => Self::TransferFromSecureAccount,
            other => Self::Other(other),
        }
    }
}

impl From<InternalTxType> for u8 {
    fn from(kind: InternalTxType) -> Self {
        match kind {
            InternalTxType::TransferFromSecureAccount => InternalTxType::TRANSFER_FROM_SECURE_ACCOUNT,
            InternalTxType::Other(other) => other,
        }
    }
}

/// Transfer out of a treasury's source EOA into its recipient EOA.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferFromSecureAccountTx {
    #[serde(rename = "internalTXType")]
    pub internal_tx_type: InternalTxType,
    /// Unsigned decimal string.
    pub amount: String,
    pub account_name: String,
    /// Must equal the secure account's nonce + 1.
    pub nonce: i64,
    #[serde(default)]
    pub sign: Vec<Sign>,
    #[serde(default)]
    pub timestamp: u64,
}

impl TransferFromSecureAccountTx {
    pub fn new(amount: impl Into<String>, account_name: impl Into<String>, nonce: i64) -> Self {
        Self {
            internal_tx_type: InternalTxType::TransferFromSecureAccount,
            amount: amount.into(),
            account_name: account_name.into(),
            nonce,
            sign: Vec::new(),
            timestamp: 0,
        }
    }

    /// The object signers sign: every field except `sign` that identifies
    /// the transfer.
    pub fn signing_payload(&self) -> Value {
        json!({
            "amount": self.amount,
            "accountName": self.account_name,
            "nonce": self.nonce,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape() {
        let tx: TransferFromSecureAccountTx = serde_json::from_str(
            r#"{"internalTXType":13,"amount":"5","accountName":"Foundation","nonce":1,
                "sign":[{"owner":"0x01","sig":"0x02"}],"timestamp":7}"#,
        )
        .unwrap();
        assert_eq!(tx.internal_tx_type, InternalTxType::TransferFromSecureAccount);
        assert_eq!(tx.sign.len(), 1);

        let other: InternalTxType = serde_json::from_str("6").unwrap();
        assert_eq!(other, InternalTxType::Other(6));
        assert_eq!(serde_json::to_string(&other).unwrap(), "6");
    }

    #[test]
    fn test_signing_payload_excludes_signatures() {
        let mut tx = TransferFromSecureAccountTx::new("5", "Foundation", 1);
        tx.sign.push(Sign {
            owner: "0x01".into(),
            sig: "0x02".into(),
        });
        let payload = tx.signing_payload();
        assert_eq!(payload, json!({"amount": "5", "accountName": "Foundation", "nonce": 1}));
    }
}
