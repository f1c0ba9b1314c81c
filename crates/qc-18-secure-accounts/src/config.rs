//! Runtime policy for treasury transfers

use serde::Deserialize;
use shared_types::{MultisigKeys, SecurityLevel};

/// Transfer authorization and receipt settings.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct TreasuryConfig {
    /// Allowed signer keys and their clearance.
    pub multisig_keys: MultisigKeys,

    /// Network-wide signature minimum; transfers never require fewer than one.
    pub min_multisig_required_for_global_txs: usize,

    /// Emit an audit receipt for each applied transfer.
    pub support_internal_tx_receipt: bool,
}

impl Default for TreasuryConfig {
    fn default() -> Self {
        Self {
            multisig_keys: MultisigKeys::new(),
            min_multisig_required_for_global_txs: 1,
            support_internal_tx_receipt: true,
        }
    }
}

impl TreasuryConfig {
    /// Clearance every counted signer must hold.
    pub const REQUIRED_LEVEL: SecurityLevel = SecurityLevel::High;

    pub fn required_signatures(&self) -> usize {
        self.min_multisig_required_for_global_txs.max(1)
    }
}
