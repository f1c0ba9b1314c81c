//! # Secure Account Engine
//!
//! Application service bundling the registry, validator and applier behind
//! the host callbacks of [`SecureAccountTxHandler`].

use std::sync::Arc;

use qc_04_state_management::{ApplyResponse, StateError, TransactionalState};
use qc_10_signature_verification::{EthMultisigVerifier, MultisigVerifier};
use shared_types::{CycleInfo, ValidationOutcome};
use tracing::debug;

use crate::adapters::SystemClock;
use crate::config::TreasuryConfig;
use crate::domain::{
    CrackedKeys, GenesisSecureAccounts, SecureAccountRegistry, TransferApplier,
    TransferFromSecureAccountTx, TransferValidator,
};
use crate::error::{ApplyError, RegistryError};
use crate::ports::{SecureAccountTxHandler, TimeSource};

pub struct SecureAccountEngine {
    registry: Arc<SecureAccountRegistry>,
    validator: TransferValidator,
    applier: TransferApplier,
    clock: Arc<dyn TimeSource>,
}

impl SecureAccountEngine {
    pub fn new(
        registry: Arc<SecureAccountRegistry>,
        verifier: Arc<dyn MultisigVerifier>,
        config: TreasuryConfig,
        clock: Arc<dyn TimeSource>,
    ) -> Self {
        let applier = TransferApplier::new(registry.clone(), config.support_internal_tx_receipt);
        let validator = TransferValidator::new(registry.clone(), verifier, config);
        Self {
            registry,
            validator,
            applier,
            clock,
        }
    }

    /// Engine verifying Ethereum wallet signatures against the system clock.
    pub fn with_defaults(registry: Arc<SecureAccountRegistry>, config: TreasuryConfig) -> Self {
        Self::new(
            registry,
            Arc::new(EthMultisigVerifier::new()),
            config,
            Arc::new(SystemClock),
        )
    }

    pub fn registry(&self) -> &SecureAccountRegistry {
        &self.registry
    }

    pub fn validator(&self) -> &TransferValidator {
        &self.validator
    }

    /// Genesis accounts for every configured treasury.
    pub fn genesis(&self, cycles: &[CycleInfo]) -> Result<GenesisSecureAccounts, StateError> {
        GenesisSecureAccounts::build(&self.registry, cycles)
    }
}

impl SecureAccountTxHandler for SecureAccountEngine {
    fn crack(&self, tx: &TransferFromSecureAccountTx) -> Result<CrackedKeys, RegistryError> {
        self.registry.crack(tx)
    }

    fn validate(&self, tx: &TransferFromSecureAccountTx) -> ValidationOutcome {
        self.validator.validate(tx)
    }

    fn verify(
        &self,
        tx: &TransferFromSecureAccountTx,
        states: &dyn TransactionalState,
    ) -> ValidationOutcome {
        let now_ms = self.clock.now_ms();
        let outcome = self.validator.verify_against_state(tx, states, now_ms);
        debug!(
            "[qc-18] verify {} nonce {} at {}: {} {}",
            tx.account_name, tx.nonce, now_ms, outcome.success, outcome.reason
        );
        outcome
    }

    fn apply(
        &self,
        tx: &TransferFromSecureAccountTx,
        tx_id: &str,
        tx_timestamp: u64,
        states: &mut dyn TransactionalState,
        response: &mut ApplyResponse,
    ) -> Result<(), ApplyError> {
        self.applier.apply(tx, tx_id, tx_timestamp, states, response)
    }
}
