use super::AccountType;
use thiserror::Error;

/// Errors raised by account hashing and the checkpointed state view.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("Account not found: {address}")]
    AccountNotFound { address: String },

    #[error("Unexpected account type at {address}: expected {expected:?}, got {actual:?}")]
    UnexpectedAccountType {
        address: String,
        expected: AccountType,
        actual: AccountType,
    },

    #[error("Balance underflow: required {required}, available {available}")]
    BalanceUnderflow { required: String, available: String },

    #[error("Balance overflow crediting {address}")]
    BalanceOverflow { address: String },

    #[error("Nonce overflow for {address}")]
    NonceOverflow { address: String },

    #[error("No open checkpoint to {0}")]
    NoCheckpoint(&'static str),

    #[error("State write failed: {0}")]
    WriteFailed(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StateError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

/// Errors raised by the secure-account binary codec.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("{entity} version mismatch: found {found}, supported {supported}")]
    VersionMismatch {
        entity: &'static str,
        found: u8,
        supported: u8,
    },

    #[error("Unexpected end of buffer: remaining bytes: {remaining}, needed {needed}")]
    UnexpectedEnd { remaining: usize, needed: usize },

    #[error("Invalid UTF-8 in {field}")]
    InvalidUtf8 { field: &'static str },

    #[error("Value out of range for {field}")]
    ValueOutOfRange { field: &'static str },

    #[error("Unknown type identifier: {0}")]
    UnknownTypeIdentifier(u16),

    #[error("Unexpected account type tag: {0}")]
    UnexpectedAccountType(u16),
}
