//! # Genesis Initialisation
//!
//! Builds the accounts a network starts with for each configured treasury:
//! the secure account itself and its funded source EOA. Recipients are
//! created by the host when first credited.
//!
//! Transfer ceilings start at zero, so no transfer can execute until the
//! ceilings are raised out of band.

use qc_04_state_management::{
    Account, AccountHasher, EvmAccount, EvmAccountInfo, SecureAccount, StateAddress, StateError,
    TransactionalState,
};
use shared_types::{CycleInfo, U256};
use tracing::info;

use super::registry::{SecureAccountConfig, SecureAccountRegistry};

/// Genesis timestamp in unix ms: the first known cycle's start, or 0.
fn genesis_timestamp(cycles: &[CycleInfo]) -> u64 {
    cycles
        .first()
        .map_or(0, |cycle| cycle.start.saturating_mul(1000))
}

/// Create the hashed secure account for one treasury entry.
pub fn initialize_secure_account(
    config: &SecureAccountConfig,
    cycles: &[CycleInfo],
) -> Result<SecureAccount, StateError> {
    let mut secure = SecureAccount {
        id: config.secure_account_address.clone(),
        hash: String::new(),
        timestamp: genesis_timestamp(cycles),
        name: config.name.clone(),
        next_transfer_amount: U256::zero(),
        next_transfer_time: 0,
        nonce: 0,
    };
    secure.hash = AccountHasher::compute(&Account::Secure(secure.clone()))?;
    Ok(secure)
}

/// All genesis accounts for a registry, keyed by state address.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenesisSecureAccounts {
    accounts: Vec<(StateAddress, Account)>,
}

impl GenesisSecureAccounts {
    pub fn build(
        registry: &SecureAccountRegistry,
        cycles: &[CycleInfo],
    ) -> Result<Self, StateError> {
        let timestamp = genesis_timestamp(cycles);
        let mut accounts = Vec::with_capacity(registry.len() * 2);

        for entry in registry.iter() {
            let secure = initialize_secure_account(&entry.config, cycles)?;
            accounts.push((entry.secure_key.clone(), Account::Secure(secure)));

            let mut source = EvmAccount::new(
                entry.config.source_funds_address.clone(),
                EvmAccountInfo::new(entry.source_funds_balance),
            );
            source.timestamp = timestamp;
            let mut source = Account::Evm(source);
            AccountHasher::hash(&mut source)?;
            accounts.push((entry.source_key.clone(), source));
        }

        Ok(Self { accounts })
    }

    pub fn accounts(&self) -> &[(StateAddress, Account)] {
        &self.accounts
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Write every genesis account into `states` in one checkpoint scope.
    pub fn seed<S: TransactionalState + ?Sized>(&self, states: &mut S) -> Result<(), StateError> {
        states.checkpoint();
        for (key, account) in &self.accounts {
            if let Err(e) = states.put_account(key.clone(), account.clone()) {
                states.revert()?;
                return Err(e);
            }
        }
        states.commit()?;
        info!("[qc-18] seeded {} genesis treasury accounts", self.accounts.len());
        Ok(())
    }
}
