use crate::domain::{Account, StateAddress, StateError};

/// Checkpointed account view supplied by the host runtime.
///
/// Every `checkpoint` must be closed by exactly one `commit` or `revert`
/// before control returns to the host. Writes made after a checkpoint are
/// discarded by `revert`.
pub trait TransactionalState: Send {
    /// Look up an account by its state address.
    fn get_account(&self, address: &str) -> Option<Account>;

    /// Insert or replace an account.
    fn put_account(&mut self, address: StateAddress, account: Account) -> Result<(), StateError>;

    /// Open a transactional scope.
    fn checkpoint(&mut self);

    /// Keep every write made since the matching checkpoint.
    fn commit(&mut self) -> Result<(), StateError>;

    /// Discard every write made since the matching checkpoint.
    fn revert(&mut self) -> Result<(), StateError>;
}
