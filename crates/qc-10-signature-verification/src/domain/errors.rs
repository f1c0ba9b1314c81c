//! # Signature Errors
//!
//! Error types for signature parsing, recovery and signing.

use thiserror::Error;

/// Errors that can occur while handling a single signature.
///
/// The multisig verifier never surfaces these to its caller: a signature
/// that fails for any of these reasons simply does not count.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignatureError {
    /// The signature format is invalid (wrong length, invalid encoding)
    #[error("Invalid signature format")]
    InvalidFormat,

    /// Signature has high S value (EIP-2 malleability protection)
    #[error("Malleable signature (high S value)")]
    MalleableSignature,

    /// Invalid recovery ID (v must be 0, 1, 27, or 28)
    #[error("Invalid recovery ID: {0}")]
    InvalidRecoveryId(u8),

    /// Failed to recover public key from signature
    #[error("Failed to recover public key")]
    RecoveryFailed,

    /// Recovered signer does not match expected signer
    #[error("Signer mismatch: expected {expected:?}, got {actual:?}")]
    SignerMismatch {
        expected: [u8; 20],
        actual: [u8; 20],
    },

    /// Payload could not be rendered as canonical JSON
    #[error("Payload canonicalization failed: {0}")]
    Canonicalization(String),

    /// The private key refused to sign the digest
    #[error("Signing failed: {0}")]
    SigningFailed(String),
}
