//! # Inbound Ports (Driving Ports / API)
//!
//! Traits that define the public API of this subsystem.

use serde_json::Value;
use shared_types::{MultisigKeys, SecurityLevel, Sign};

/// Multi-signature authorization check.
///
/// Implementations must be stateless and thread-safe (`Send + Sync`): the
/// same inputs always give the same answer on every node.
pub trait MultisigVerifier: Send + Sync {
    /// True when at least `required` distinct owners from `allowed_keys`,
    /// each at or above `min_level`, signed `payload`.
    fn verify(
        &self,
        payload: &Value,
        signatures: &[Sign],
        allowed_keys: &MultisigKeys,
        required: usize,
        min_level: SecurityLevel,
    ) -> bool;
}
