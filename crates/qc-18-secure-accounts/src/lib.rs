//! # Secure Accounts (Subsystem 18)
//!
//! Multisig-gated transfers out of treasury accounts.
//!
//! ## Purpose
//!
//! A treasury is a named triple from the genesis config: a source EOA holding
//! the funds, a recipient EOA and a secure account carrying the transfer
//! policy (nonce, per-transfer ceiling, earliest next transfer time). A
//! transfer moves funds from source to recipient when enough High-level
//! signers approved `{amount, accountName, nonce}`.
//!
//! ## Host Contract
//!
//! ```text
//! crack(tx)                 -> CrackedKeys { source_keys, target_keys }
//! verify(tx, states)        -> ValidationOutcome { success, reason }
//! apply(tx, id, ts, states) -> Result<(), ApplyError>
//! ```
//!
//! Expected rejections are reported through `ValidationOutcome`. `apply`
//! mutates all three accounts inside one checkpoint scope and reverts it on
//! any error, so the state never holds a partial transfer.
//!
//! ## Module Structure
//!
//! - [`domain`]: registry, validator, applier, genesis and receipts
//! - [`ports`]: host callbacks (inbound) and the time source (outbound)
//! - [`adapters`]: system and fixed clocks
//! - [`service`]: [`SecureAccountEngine`] wiring it all together

#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

mod config;
mod error;

pub use config::TreasuryConfig;
pub use error::{ApplyError, ConfigError, RegistryError};

pub use adapters::{FixedClock, SystemClock};
pub use domain::{
    initialize_secure_account, parse_amount, validate_config, CrackedKeys, GenesisSecureAccounts, InternalTxType,
    ResolvedSecureAccount, SecureAccountConfig, SecureAccountRegistry, TransferApplier,
    TransferFromSecureAccountTx, TransferReceipt, TransferRejection, TransferValidator,
    VALID_TRANSACTION,
};
pub use ports::{SecureAccountTxHandler, TimeSource};
pub use service::SecureAccountEngine;

/// Subsystem identifier used in log prefixes.
pub const SUBSYSTEM_ID: u8 = 18;
