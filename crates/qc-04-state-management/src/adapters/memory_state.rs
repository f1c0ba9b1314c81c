use crate::domain::{wrap_account, Account, StateAddress, StateError, WrappedAccount};
use crate::ports::TransactionalState;
use std::collections::HashMap;
use tracing::debug;

/// In-memory implementation of TransactionalState.
///
/// Each checkpoint snapshots the whole account map; scopes nest.
#[derive(Debug, Default, Clone)]
pub struct InMemoryWrappedStates {
    accounts: HashMap<StateAddress, Account>,
    snapshots: Vec<HashMap<StateAddress, Account>>,
}

impl InMemoryWrappedStates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an account outside any transactional scope.
    pub fn with_account(mut self, address: impl Into<StateAddress>, account: Account) -> Self {
        self.accounts.insert(address.into(), account);
        self
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Number of open checkpoints.
    pub fn depth(&self) -> usize {
        self.snapshots.len()
    }

    /// Host view of an account, hashed.
    pub fn wrapped(&self, address: &str) -> Result<Option<WrappedAccount>, StateError> {
        self.accounts
            .get(address)
            .cloned()
            .map(|account| wrap_account(address.to_string(), account))
            .transpose()
    }
}

impl TransactionalState for InMemoryWrappedStates {
    fn get_account(&self, address: &str) -> Option<Account> {
        self.accounts.get(address).cloned()
    }

    fn put_account(&mut self, address: StateAddress, account: Account) -> Result<(), StateError> {
        self.accounts.insert(address, account);
        Ok(())
    }

    fn checkpoint(&mut self) {
        self.snapshots.push(self.accounts.clone());
        debug!("[qc-04] checkpoint opened (depth {})", self.snapshots.len());
    }

    fn commit(&mut self) -> Result<(), StateError> {
        self.snapshots
            .pop()
            .ok_or(StateError::NoCheckpoint("commit"))?;
        Ok(())
    }

    fn revert(&mut self) -> Result<(), StateError> {
        let snapshot = self
            .snapshots
            .pop()
            .ok_or(StateError::NoCheckpoint("revert"))?;
        self.accounts = snapshot;
        debug!("[qc-04] checkpoint reverted (depth {})", self.snapshots.len());
        Ok(())
    }
}
