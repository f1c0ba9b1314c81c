//! # Multisig Verification Service
//!
//! Application service implementing the `MultisigVerifier` port on top of
//! Ethereum `personal_sign` recovery.

use crate::domain::multisig;
use crate::ports::inbound::MultisigVerifier;
use serde_json::Value;
use shared_types::{MultisigKeys, SecurityLevel, Sign};
use tracing::debug;

/// Verifier for signatures produced by Ethereum wallets.
#[derive(Clone, Copy, Debug, Default)]
pub struct EthMultisigVerifier;

impl EthMultisigVerifier {
    pub fn new() -> Self {
        Self
    }
}

impl MultisigVerifier for EthMultisigVerifier {
    fn verify(
        &self,
        payload: &Value,
        signatures: &[Sign],
        allowed_keys: &MultisigKeys,
        required: usize,
        min_level: SecurityLevel,
    ) -> bool {
        let ok = multisig::verify_multi_sigs(payload, signatures, allowed_keys, required, min_level);
        debug!(
            "[qc-10] multisig check: {} signatures, {} required at {:?} -> {}",
            signatures.len(),
            required,
            min_level,
            ok
        );
        ok
    }
}
