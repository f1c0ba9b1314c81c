//! # Transfer Validation
//!
//! Stateless checks run on every node before a transfer is accepted, and the
//! stateful checks run against the host's view of the three involved
//! accounts. Checks short-circuit in a fixed order so every node reports the
//! same reason for the same input.

use std::sync::Arc;

use qc_04_state_management::{Account, TransactionalState};
use qc_10_signature_verification::MultisigVerifier;
use shared_types::{MultisigKeys, SecurityLevel, ValidationOutcome, U256};
use tracing::warn;

use super::registry::{ResolvedSecureAccount, SecureAccountRegistry};
use super::rejection::TransferRejection;
use super::transaction::{InternalTxType, TransferFromSecureAccountTx};
use crate::config::TreasuryConfig;

/// Reason attached to a transfer that passed every stateful check.
pub const VALID_TRANSACTION: &str = "Valid transaction";

/// Parse an unsigned decimal amount; any non-digit input is a format error.
pub fn parse_amount(amount: &str) -> Result<U256, TransferRejection> {
    if amount.is_empty() || !amount.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TransferRejection::InvalidAmountFormat);
    }
    U256::from_dec_str(amount).map_err(|_| TransferRejection::InvalidAmountFormat)
}

pub struct TransferValidator {
    registry: Arc<SecureAccountRegistry>,
    verifier: Arc<dyn MultisigVerifier>,
    config: TreasuryConfig,
}

impl TransferValidator {
    pub fn new(
        registry: Arc<SecureAccountRegistry>,
        verifier: Arc<dyn MultisigVerifier>,
        config: TreasuryConfig,
    ) -> Self {
        Self {
            registry,
            verifier,
            config,
        }
    }

    /// Stateless validation under the configured signer policy.
    pub fn validate(&self, tx: &TransferFromSecureAccountTx) -> ValidationOutcome {
        ValidationOutcome::from_result(self.check(tx).map(|_| ()), "")
    }

    /// Stateless validation under an explicit signer policy.
    pub fn validate_with(
        &self,
        tx: &TransferFromSecureAccountTx,
        allowed_keys: &MultisigKeys,
        required: usize,
        min_level: SecurityLevel,
    ) -> ValidationOutcome {
        let result = self.check_with(tx, allowed_keys, required, min_level);
        ValidationOutcome::from_result(result.map(|_| ()), "")
    }

    /// Stateless checks; returns the resolved entry and parsed amount.
    pub fn check(
        &self,
        tx: &TransferFromSecureAccountTx,
    ) -> Result<(&ResolvedSecureAccount, U256), TransferRejection> {
        self.check_with(
            tx,
            &self.config.multisig_keys,
            self.config.required_signatures(),
            TreasuryConfig::REQUIRED_LEVEL,
        )
    }

    fn check_with(
        &self,
        tx: &TransferFromSecureAccountTx,
        allowed_keys: &MultisigKeys,
        required: usize,
        min_level: SecurityLevel,
    ) -> Result<(&ResolvedSecureAccount, U256), TransferRejection> {
        if tx.internal_tx_type != InternalTxType::TransferFromSecureAccount {
            return Err(TransferRejection::InvalidTransactionType);
        }

        let amount = parse_amount(&tx.amount)?;
        if amount.is_zero() {
            return Err(TransferRejection::NonPositiveAmount);
        }

        if tx.account_name.trim().is_empty() {
            return Err(TransferRejection::InvalidAccountName);
        }

        if tx.nonce < 0 {
            return Err(TransferRejection::InvalidNonce);
        }

        let entry = self
            .registry
            .get(&tx.account_name)
            .ok_or(TransferRejection::UnknownSecureAccount)?;

        if tx.sign.is_empty() {
            return Err(TransferRejection::MissingSignatures);
        }

        let payload = tx.signing_payload();
        if !self
            .verifier
            .verify(&payload, &tx.sign, allowed_keys, required, min_level)
        {
            warn!(
                "[qc-18] invalid signatures for transfer from secure account {}: required {} at {:?}, {} allowed keys, {} signatures, payload {}",
                tx.account_name,
                required,
                min_level,
                allowed_keys.len(),
                tx.sign.len(),
                payload
            );
            return Err(TransferRejection::InvalidSignatures);
        }

        Ok((entry, amount))
    }

    /// Full validation against the host's state view at `now_ms`.
    pub fn verify_against_state<S: TransactionalState + ?Sized>(
        &self,
        tx: &TransferFromSecureAccountTx,
        states: &S,
        now_ms: u64,
    ) -> ValidationOutcome {
        ValidationOutcome::from_result(self.check_against_state(tx, states, now_ms), VALID_TRANSACTION)
    }

    pub fn check_against_state<S: TransactionalState + ?Sized>(
        &self,
        tx: &TransferFromSecureAccountTx,
        states: &S,
        now_ms: u64,
    ) -> Result<(), TransferRejection> {
        let (entry, amount) = self.check(tx)?;

        let secure = match states.get_account(&entry.secure_key) {
            Some(Account::Secure(secure)) => secure,
            _ => return Err(TransferRejection::SecureAccountInvalid),
        };

        let source_balance = match (
            states.get_account(&entry.source_key),
            states.get_account(&entry.recipient_key),
        ) {
            (Some(Account::Evm(source)), Some(Account::Evm(_))) => source.account.balance,
            _ => return Err(TransferRejection::FundsAccountsNotFound),
        };

        if source_balance < amount {
            return Err(TransferRejection::InsufficientBalance);
        }
        if source_balance.checked_sub(amount).is_none() {
            return Err(TransferRejection::BalanceUnderflow);
        }

        // tx.nonce >= 0 after the stateless checks
        let expected = secure.nonce.saturating_add(1);
        if u64::try_from(tx.nonce).ok() != Some(expected) {
            return Err(TransferRejection::NonceMismatch {
                expected,
                actual: tx.nonce,
            });
        }

        if now_ms < secure.next_transfer_time {
            return Err(TransferRejection::TimeRestricted);
        }

        if amount > secure.next_transfer_amount {
            return Err(TransferRejection::AmountExceedsLimit);
        }

        Ok(())
    }
}
