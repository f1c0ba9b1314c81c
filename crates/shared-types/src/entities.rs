//! # Core Domain Entities
//!
//! Primitives shared by the treasury engine and the ticket manager.
//!
//! ## Clusters
//!
//! - **Identity**: `Hash`, `Address`, hex helpers
//! - **Authorization**: `Sign`, `SecurityLevel`, `MultisigKeys`
//! - **Host Contract**: `ValidationOutcome`, `CycleInfo`

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::AddressError;

// Re-export U256 from primitive-types for balances and transfer ceilings
pub use primitive_types::U256;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// A 32-byte digest.
pub type Hash = [u8; 32];

/// A 20-byte Ethereum-style address.
pub type Address = [u8; 20];

/// Parse a `0x`-prefixed (or bare) 40-char hex string into an address.
///
/// Parsing is case-insensitive, so checksummed and lower-case forms of the
/// same address compare equal once parsed.
pub fn parse_address(input: &str) -> Result<Address, AddressError> {
    let body = strip_hex_prefix(input);
    if body.len() != 40 {
        return Err(AddressError::InvalidLength {
            expected: 40,
            actual: body.len(),
        });
    }
    let mut address = [0u8; 20];
    hex::decode_to_slice(body, &mut address)
        .map_err(|e| AddressError::InvalidHex(e.to_string()))?;
    Ok(address)
}

/// Format an address as lower-case `0x` hex.
pub fn format_address(address: &Address) -> String {
    format!("0x{}", hex::encode(address))
}

/// Remove a leading `0x` / `0X` if present.
pub fn strip_hex_prefix(input: &str) -> &str {
    input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input)
}

// =============================================================================
// CLUSTER B: AUTHORIZATION
// =============================================================================

/// One entry of a multi-signature set.
///
/// `owner` is the claimed signer address, `sig` the 65-byte `r || s || v`
/// signature in `0x` hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sign {
    pub owner: String,
    pub sig: String,
}

/// Clearance level attached to an allowed signer key.
///
/// Serialized as its numeric value so config files can write
/// `{"0xabc...": 3}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SecurityLevel {
    Unauthorized = 0,
    Low = 1,
    Medium = 2,
    High = 3,
}

impl TryFrom<u8> for SecurityLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Unauthorized),
            1 => Ok(Self::Low),
            2 => Ok(Self::Medium),
            3 => Ok(Self::High),
            other => Err(format!("unknown security level {other}")),
        }
    }
}

impl From<SecurityLevel> for u8 {
    fn from(level: SecurityLevel) -> Self {
        level as u8
    }
}

/// Allowed signer keys mapped to their clearance.
///
/// Ordered so that logging and iteration are identical on every node.
pub type MultisigKeys = BTreeMap<String, SecurityLevel>;

// =============================================================================
// CLUSTER C: HOST CONTRACT
// =============================================================================

/// Structured `{success, reason}` answer returned to the host runtime.
///
/// Expected validation failures are reported through this type and never as
/// errors or panics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub success: bool,
    pub reason: String,
}

impl ValidationOutcome {
    /// A passing outcome carrying an informational reason.
    pub fn ok(reason: impl Into<String>) -> Self {
        Self {
            success: true,
            reason: reason.into(),
        }
    }

    /// A failing outcome.
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            reason: reason.into(),
        }
    }

    /// Collapse a typed validation result into the host shape.
    pub fn from_result<E: fmt::Display>(result: Result<(), E>, ok_reason: &str) -> Self {
        match result {
            Ok(()) => Self::ok(ok_reason),
            Err(e) => Self::rejected(e.to_string()),
        }
    }
}

/// Minimal view of a consensus cycle record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleInfo {
    /// Cycle start in unix seconds.
    pub start: u64,
}
