//! Error types for the secure-accounts subsystem.
//!
//! Expected transfer rejections are not errors: they are
//! [`TransferRejection`](crate::domain::TransferRejection) values folded into
//! a `ValidationOutcome`. The types here cover startup configuration faults
//! and invariant violations inside `apply`.

use qc_04_state_management::{AccountType, StateError};
use shared_types::AddressError;
use thiserror::Error;

/// Genesis configuration errors. Any of these aborts startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read secure account config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed secure account config: {0}")]
    Parse(String),

    #[error("Secure account entry {index} has an empty name")]
    EmptyName { index: usize },

    #[error("Duplicate secure account name: {0}")]
    DuplicateName(String),

    #[error("Secure account {name}: invalid {field}: {reason}")]
    InvalidAddress {
        name: String,
        field: &'static str,
        reason: AddressError,
    },

    #[error("Secure account {name}: invalid SourceFundsBalance {value:?}")]
    InvalidBalance { name: String, value: String },

    #[error("Secure account {name}: source and recipient are the same address {address}")]
    SourceIsRecipient { name: String, address: String },

    #[error("Address {address} is used by both {first} and {second}")]
    DuplicateAddress {
        address: String,
        first: String,
        second: String,
    },

    #[error("Secure account {name}: address {address} is already used by {owner}")]
    SecureAddressConflict {
        name: String,
        address: String,
        owner: String,
    },
}

/// Registry lookup errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Secure account {0} not found")]
    UnknownAccount(String),
}

/// Invariant violations raised by `apply`. The state scope has already been
/// reverted when one of these is returned.
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Invalid transfer amount {0:?}")]
    InvalidAmount(String),

    #[error("Required {role} account {address} not found")]
    MissingAccount { role: &'static str, address: String },

    #[error("Account {address} has type {actual:?}, expected {expected:?}")]
    WrongAccountType {
        address: String,
        expected: AccountType,
        actual: AccountType,
    },

    #[error(transparent)]
    State(#[from] StateError),
}
