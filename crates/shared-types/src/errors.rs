//! # Error Types
//!
//! Errors shared by every crate that parses addresses.

use thiserror::Error;

/// Errors raised while parsing a hex-encoded address.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AddressError {
    /// Hex body has the wrong number of characters.
    #[error("Invalid address length: expected {expected} hex chars, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Input contains non-hex characters.
    #[error("Invalid hex in address: {0}")]
    InvalidHex(String),
}
