//! # Signature Verification Subsystem (QC-10)
//!
//! Multi-signature authorization shared by the treasury engine and the
//! ticket manager.
//!
//! ## Architecture
//!
//! This subsystem follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): Pure cryptographic logic, no I/O
//! - **Ports Layer** (`ports/`): The `MultisigVerifier` trait
//! - **Service Layer** (`service.rs`): `EthMultisigVerifier`
//!
//! ## Security Notes
//!
//! - **Malleability Prevention (EIP-2)**: Signatures with high S values are rejected
//! - **Distinct Signers**: An owner counts toward a threshold at most once
//! - **Canonical Payloads**: Signer and verifier render the payload with
//!   sorted keys, so field order never changes the signed digest

pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use domain::ecdsa::{
    address_from_pubkey, keccak256, personal_message_hash, recover_address, verify_ecdsa,
    verify_ecdsa_signer,
};
pub use domain::entities::{Address, EcdsaSignature, VerificationResult};
pub use domain::errors::SignatureError;
pub use domain::multisig::{payload_digest, payload_message_hash, verify_multi_sigs};
pub use domain::signer::sign_payload;
pub use ports::inbound::MultisigVerifier;
pub use service::EthMultisigVerifier;
