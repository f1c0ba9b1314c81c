//! Mapping of user-facing addresses onto the 32-byte shard address space.

use shared_types::{strip_hex_prefix, AddressError};

use super::StateAddress;

/// Derive the state key for an address.
///
/// 20-byte EOA addresses are lower-cased and right-padded with 24 zero
/// nibbles; 32-byte addresses are only lower-cased. Any other length is
/// rejected.
pub fn to_state_address(address: &str) -> Result<StateAddress, AddressError> {
    let body = strip_hex_prefix(address);
    if !body.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(AddressError::InvalidHex(address.to_string()));
    }
    match body.len() {
        40 => Ok(format!("{}{}", body.to_ascii_lowercase(), "0".repeat(24))),
        64 => Ok(body.to_ascii_lowercase()),
        actual => Err(AddressError::InvalidLength {
            expected: 40,
            actual,
        }),
    }
}
