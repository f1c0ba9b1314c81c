//! # Domain Entities
//!
//! Signature shapes used by the multisig verifier.

use super::errors::SignatureError;
use shared_types::strip_hex_prefix;

pub use shared_types::Address;

// =============================================================================
// ECDSA Types (secp256k1)
// =============================================================================

/// ECDSA signature with recovery ID.
///
/// Wire form is 65 bytes `r || s || v` in `0x` hex, as produced by Ethereum
/// `personal_sign`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EcdsaSignature {
    /// R component (32 bytes)
    pub r: [u8; 32],
    /// S component (32 bytes)
    pub s: [u8; 32],
    /// Recovery ID (0, 1, 27, or 28)
    pub v: u8,
}

impl EcdsaSignature {
    /// Parse a 65-byte `r || s || v` hex string (with or without `0x`).
    pub fn from_hex(input: &str) -> Result<Self, SignatureError> {
        let mut raw = [0u8; 65];
        hex::decode_to_slice(strip_hex_prefix(input), &mut raw)
            .map_err(|_| SignatureError::InvalidFormat)?;
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&raw[..32]);
        s.copy_from_slice(&raw[32..64]);
        Ok(Self { r, s, v: raw[64] })
    }

    /// Render as `0x`-prefixed lower-case hex.
    pub fn to_hex(&self) -> String {
        let mut raw = Vec::with_capacity(65);
        raw.extend_from_slice(&self.r);
        raw.extend_from_slice(&self.s);
        raw.push(self.v);
        format!("0x{}", hex::encode(raw))
    }
}

/// Result of verifying a single signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationResult {
    /// Whether the signature is valid.
    pub valid: bool,
    /// Recovered signer address (if valid).
    pub recovered_address: Option<Address>,
    /// Error details (if invalid).
    pub error: Option<SignatureError>,
}

impl VerificationResult {
    /// Create a successful verification result.
    pub fn valid(address: Address) -> Self {
        Self {
            valid: true,
            recovered_address: Some(address),
            error: None,
        }
    }

    /// Create a failed verification result.
    pub fn invalid(error: SignatureError) -> Self {
        Self {
            valid: false,
            recovered_address: None,
            error: Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_hex_roundtrip() {
        let sig = EcdsaSignature {
            r: [0x11; 32],
            s: [0x22; 32],
            v: 28,
        };
        let encoded = sig.to_hex();
        assert_eq!(encoded.len(), 2 + 130);
        assert!(encoded.ends_with("1c"));
        assert_eq!(EcdsaSignature::from_hex(&encoded).unwrap(), sig);
        assert_eq!(EcdsaSignature::from_hex(&encoded[2..]).unwrap(), sig);
    }

    #[test]
    fn test_signature_wrong_length_rejected() {
        assert_eq!(
            EcdsaSignature::from_hex("0x1234"),
            Err(SignatureError::InvalidFormat)
        );
        assert_eq!(
            EcdsaSignature::from_hex(&format!("0x{}", "zz".repeat(65))),
            Err(SignatureError::InvalidFormat)
        );
    }
}
