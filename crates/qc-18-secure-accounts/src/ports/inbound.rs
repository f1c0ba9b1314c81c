//! Inbound ports (driving side - API)
//!
//! The host runtime drives a secure-account transfer through three callbacks:
//! `crack` to learn which accounts to lock, `verify` against its view of
//! those accounts, and `apply` once the transfer is accepted.

use qc_04_state_management::{ApplyResponse, TransactionalState};
use shared_types::ValidationOutcome;

use crate::domain::{CrackedKeys, TransferFromSecureAccountTx};
use crate::error::{ApplyError, RegistryError};

/// Host callbacks for `TransferFromSecureAccount` transactions.
pub trait SecureAccountTxHandler: Send + Sync {
    /// Declare the source and target state keys the transfer touches.
    fn crack(&self, tx: &TransferFromSecureAccountTx) -> Result<CrackedKeys, RegistryError>;

    /// Stateless validation; a failing outcome carries the rejection reason.
    fn validate(&self, tx: &TransferFromSecureAccountTx) -> ValidationOutcome;

    /// Full validation against the host's state view.
    fn verify(
        &self,
        tx: &TransferFromSecureAccountTx,
        states: &dyn TransactionalState,
    ) -> ValidationOutcome;

    /// Apply an accepted transfer atomically.
    fn apply(
        &self,
        tx: &TransferFromSecureAccountTx,
        tx_id: &str,
        tx_timestamp: u64,
        states: &mut dyn TransactionalState,
        response: &mut ApplyResponse,
    ) -> Result<(), ApplyError>;
}
