//! # Transfer Application
//!
//! Moves funds from a treasury's source EOA to its recipient and advances the
//! secure account's nonce, inside one checkpoint scope of the host state.
//!
//! The host only calls `apply` after `verify` succeeded, so any failure here
//! is an invariant violation: the scope is reverted and the error propagated.

use std::sync::Arc;

use qc_04_state_management::{
    Account, AccountHasher, AccountType, AppReceiptData, ApplyResponse, EvmAccount, SecureAccount,
    StateAddress, StateError, TransactionalState,
};
use shared_types::U256;
use tracing::{error, info};

use super::receipt::TransferReceipt;
use super::registry::{ResolvedSecureAccount, SecureAccountRegistry};
use super::transaction::TransferFromSecureAccountTx;
use super::validator::parse_amount;
use crate::error::ApplyError;

pub struct TransferApplier {
    registry: Arc<SecureAccountRegistry>,
    receipts_enabled: bool,
}

/// The three accounts touched by one transfer, as loaded before mutation.
struct Involved {
    source: EvmAccount,
    recipient: EvmAccount,
    secure: SecureAccount,
}

impl TransferApplier {
    pub fn new(registry: Arc<SecureAccountRegistry>, receipts_enabled: bool) -> Self {
        Self {
            registry,
            receipts_enabled,
        }
    }

    /// Apply a verified transfer and record its writes in `response`.
    pub fn apply<S: TransactionalState + ?Sized>(
        &self,
        tx: &TransferFromSecureAccountTx,
        tx_id: &str,
        tx_timestamp: u64,
        states: &mut S,
        response: &mut ApplyResponse,
    ) -> Result<(), ApplyError> {
        let entry = self.registry.resolve(&tx.account_name)?;
        let amount =
            parse_amount(&tx.amount).map_err(|_| ApplyError::InvalidAmount(tx.amount.clone()))?;

        let involved = Involved {
            source: load_evm(states, &entry.source_key, "source")?,
            recipient: load_evm(states, &entry.recipient_key, "recipient")?,
            secure: load_secure(states, &entry.secure_key)?,
        };

        // Everything fallible outside the state scope happens before it opens.
        let receipt = self.receipt_data(entry, amount, tx_id, tx_timestamp)?;

        states.checkpoint();
        let writes = match transfer(states, entry, involved, amount, tx_timestamp) {
            Ok(writes) => writes,
            Err(e) => {
                if let Err(revert_err) = states.revert() {
                    error!(
                        "[qc-18] failed to revert transfer {} from {}: {}",
                        tx_id, entry.config.name, revert_err
                    );
                }
                return Err(e.into());
            }
        };
        states.commit()?;

        for (key, account) in writes {
            response.add_changed_account(key, account);
        }

        if let Some(receipt) = receipt {
            response.add_receipt_data(receipt);
        }

        info!(
            "[qc-18] applied transfer {} of {} from secure account {} (nonce {})",
            tx_id, amount, entry.config.name, tx.nonce
        );
        Ok(())
    }

    /// Receipt payload for a transfer, or `None` when receipts are off.
    fn receipt_data(
        &self,
        entry: &ResolvedSecureAccount,
        amount: U256,
        tx_id: &str,
        tx_timestamp: u64,
    ) -> Result<Option<AppReceiptData>, ApplyError> {
        if !self.receipts_enabled {
            return Ok(None);
        }
        let receipt = TransferReceipt::new(
            &entry.config.source_funds_address,
            &entry.config.recipient_funds_address,
            amount,
            tx_id,
            tx_timestamp,
            &entry.config.name,
        );
        Ok(Some(AppReceiptData {
            tx_id: tx_id.to_string(),
            timestamp: tx_timestamp,
            data: serde_json::to_value(receipt).map_err(StateError::from)?,
        }))
    }
}

/// Mutate and persist all three accounts. Runs inside the checkpoint scope.
fn transfer<S: TransactionalState + ?Sized>(
    states: &mut S,
    entry: &ResolvedSecureAccount,
    involved: Involved,
    amount: U256,
    timestamp: u64,
) -> Result<[(StateAddress, Account); 3], StateError> {
    let Involved {
        mut source,
        mut recipient,
        mut secure,
    } = involved;

    let available = source.account.balance;
    source.account.balance = available
        .checked_sub(amount)
        .ok_or_else(|| StateError::BalanceUnderflow {
            required: amount.to_string(),
            available: available.to_string(),
        })?;
    source.account.nonce = source
        .account
        .nonce
        .checked_add(1)
        .ok_or_else(|| StateError::NonceOverflow {
            address: entry.source_key.clone(),
        })?;
    recipient.account.balance = recipient
        .account
        .balance
        .checked_add(amount)
        .ok_or_else(|| StateError::BalanceOverflow {
            address: entry.recipient_key.clone(),
        })?;
    source.timestamp = timestamp;
    recipient.timestamp = timestamp;

    let mut source = Account::Evm(source);
    let mut recipient = Account::Evm(recipient);
    AccountHasher::hash(&mut source)?;
    AccountHasher::hash(&mut recipient)?;
    states.put_account(entry.source_key.clone(), source.clone())?;
    states.put_account(entry.recipient_key.clone(), recipient.clone())?;

    secure.nonce = secure
        .nonce
        .checked_add(1)
        .ok_or_else(|| StateError::NonceOverflow {
            address: entry.secure_key.clone(),
        })?;
    secure.timestamp = timestamp;
    let mut secure = Account::Secure(secure);
    AccountHasher::hash(&mut secure)?;
    states.put_account(entry.secure_key.clone(), secure.clone())?;

    Ok([
        (entry.source_key.clone(), source),
        (entry.recipient_key.clone(), recipient),
        (entry.secure_key.clone(), secure),
    ])
}

fn load_evm<S: TransactionalState + ?Sized>(
    states: &S,
    key: &str,
    role: &'static str,
) -> Result<EvmAccount, ApplyError> {
    match states.get_account(key) {
        Some(Account::Evm(account)) => Ok(account),
        Some(other) => Err(ApplyError::WrongAccountType {
            address: key.to_string(),
            expected: AccountType::Account,
            actual: other.account_type(),
        }),
        None => Err(ApplyError::MissingAccount {
            role,
            address: key.to_string(),
        }),
    }
}

fn load_secure<S: TransactionalState + ?Sized>(
    states: &S,
    key: &str,
) -> Result<SecureAccount, ApplyError> {
    match states.get_account(key) {
        Some(Account::Secure(account)) => Ok(account),
        Some(other) => Err(ApplyError::WrongAccountType {
            address: key.to_string(),
            expected: AccountType::SecureAccount,
            actual: other.account_type(),
        }),
        None => Err(ApplyError::MissingAccount {
            role: "secure",
            address: key.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::registry::SecureAccountConfig;
    use qc_04_state_management::{EvmAccountInfo, InMemoryWrappedStates};

    fn registry() -> Arc<SecureAccountRegistry> {
        Arc::new(
            SecureAccountRegistry::new(vec![SecureAccountConfig {
                name: "Foundation".into(),
                source_funds_address: "0x1111111111111111111111111111111111111111".into(),
                recipient_funds_address: "0x2222222222222222222222222222222222222222".into(),
                secure_account_address: format!("0x{}", "ab".repeat(32)),
                source_funds_balance: "0".into(),
            }])
            .unwrap(),
        )
    }

    fn seeded(registry: &SecureAccountRegistry, balance: u64) -> InMemoryWrappedStates {
        let entry = registry.get("Foundation").unwrap();
        InMemoryWrappedStates::new()
            .with_account(
                entry.source_key.clone(),
                Account::Evm(EvmAccount::new("0x11", EvmAccountInfo::new(U256::from(balance)))),
            )
            .with_account(
                entry.recipient_key.clone(),
                Account::Evm(EvmAccount::new("0x22", EvmAccountInfo::new(U256::from(5)))),
            )
            .with_account(
                entry.secure_key.clone(),
                Account::Secure(SecureAccount {
                    id: entry.config.secure_account_address.clone(),
                    hash: String::new(),
                    timestamp: 0,
                    name: "Foundation".into(),
                    next_transfer_amount: U256::from(1_000),
                    next_transfer_time: 0,
                    nonce: 0,
                }),
            )
    }

    #[test]
    fn test_apply_moves_funds_and_bumps_nonces() {
        let registry = registry();
        let entry = registry.get("Foundation").unwrap().clone();
        let mut states = seeded(&registry, 100);
        let mut response = ApplyResponse::new("tx-1", 42);

        TransferApplier::new(registry, true)
            .apply(
                &TransferFromSecureAccountTx::new("40", "Foundation", 1),
                "tx-1",
                42,
                &mut states,
                &mut response,
            )
            .unwrap();

        let source = states.get_account(&entry.source_key).unwrap();
        let source = source.as_evm().unwrap();
        assert_eq!(source.account.balance, U256::from(60));
        assert_eq!(source.account.nonce, 1);
        assert_eq!(source.timestamp, 42);

        let recipient = states.get_account(&entry.recipient_key).unwrap();
        assert_eq!(recipient.as_evm().unwrap().account.balance, U256::from(45));

        let secure = states.get_account(&entry.secure_key).unwrap();
        assert_eq!(secure.as_secure().unwrap().nonce, 1);
        assert_eq!(states.depth(), 0);

        assert_eq!(response.account_writes.len(), 3);
        for write in &response.account_writes {
            assert_eq!(write.hash, AccountHasher::compute(&write.account).unwrap());
            assert_eq!(write.timestamp, 42);
        }
        let receipt = response.app_receipt_data.unwrap();
        assert_eq!(receipt.data["amount"], "0x28");
        assert_eq!(receipt.data["accountName"], "Foundation");
    }

    #[test]
    fn test_underflow_reverts_scope() {
        let registry = registry();
        let mut states = seeded(&registry, 10);
        let before = states.clone();
        let mut response = ApplyResponse::new("tx-2", 1);

        let err = TransferApplier::new(registry.clone(), true)
            .apply(
                &TransferFromSecureAccountTx::new("11", "Foundation", 1),
                "tx-2",
                1,
                &mut states,
                &mut response,
            )
            .unwrap_err();

        assert!(matches!(err, ApplyError::State(StateError::BalanceUnderflow { .. })));
        assert_eq!(states.depth(), 0);
        for key in [
            &registry.get("Foundation").unwrap().source_key,
            &registry.get("Foundation").unwrap().secure_key,
        ] {
            assert_eq!(states.get_account(key), before.get_account(key));
        }
        assert!(response.account_writes.is_empty());
        assert!(response.app_receipt_data.is_none());
    }

    #[test]
    fn test_no_receipt_when_disabled() {
        let registry = registry();
        let mut states = seeded(&registry, 100);
        let mut response = ApplyResponse::new("tx-5", 7);

        TransferApplier::new(registry, false)
            .apply(
                &TransferFromSecureAccountTx::new("40", "Foundation", 1),
                "tx-5",
                7,
                &mut states,
                &mut response,
            )
            .unwrap();

        assert_eq!(response.account_writes.len(), 3);
        assert!(response.app_receipt_data.is_none());
    }

    #[test]
    fn test_receipt_built_outside_state_scope() {
        let registry = registry();
        let entry = registry.get("Foundation").unwrap().clone();
        let applier = TransferApplier::new(registry.clone(), true);

        let receipt = applier
            .receipt_data(&entry, U256::from(40), "tx-6", 9)
            .unwrap()
            .unwrap();
        assert_eq!(receipt.tx_id, "tx-6");
        assert_eq!(receipt.data["amount"], "0x28");
        assert_eq!(receipt.data["source"], entry.config.source_funds_address);
        assert!(TransferApplier::new(registry, false)
            .receipt_data(&entry, U256::from(40), "tx-6", 9)
            .unwrap()
            .is_none());

        // the applied receipt is exactly the one prepared before the scope opened
        let mut states = seeded(&applier.registry, 100);
        let mut response = ApplyResponse::new("tx-6", 9);
        applier
            .apply(
                &TransferFromSecureAccountTx::new("40", "Foundation", 1),
                "tx-6",
                9,
                &mut states,
                &mut response,
            )
            .unwrap();
        assert_eq!(response.app_receipt_data, Some(receipt));
    }

    #[test]
    fn test_missing_recipient_is_fatal() {
        let registry = registry();
        let entry = registry.get("Foundation").unwrap().clone();
        let states = seeded(&registry, 10);
        let mut partial = InMemoryWrappedStates::new();
        for key in [&entry.source_key, &entry.secure_key] {
            partial
                .put_account(key.clone(), states.get_account(key).unwrap())
                .unwrap();
        }

        let err = TransferApplier::new(registry, false)
            .apply(
                &TransferFromSecureAccountTx::new("1", "Foundation", 1),
                "tx-3",
                1,
                &mut partial,
                &mut ApplyResponse::new("tx-3", 1),
            )
            .unwrap_err();
        assert!(matches!(err, ApplyError::MissingAccount { role: "recipient", .. }));
        assert_eq!(partial.depth(), 0);
    }

    #[test]
    fn test_unknown_account_name() {
        let registry = registry();
        let mut states = seeded(&registry, 10);
        let err = TransferApplier::new(registry, false)
            .apply(
                &TransferFromSecureAccountTx::new("1", "Nobody", 1),
                "tx-4",
                1,
                &mut states,
                &mut ApplyResponse::new("tx-4", 1),
            )
            .unwrap_err();
        assert!(matches!(err, ApplyError::Registry(_)));
    }
}
