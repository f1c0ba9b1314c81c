//! # Multisig Threshold Verification
//!
//! Counts distinct allowed signers over a JSON payload.
//!
//! ## Signed Message
//!
//! 1. Render the payload as canonical JSON (keys sorted at every depth).
//! 2. `digest = "0x" || hex(keccak256(canonical))`.
//! 3. Each signer `personal_sign`s the 66-byte ASCII `digest` string.
//!
//! ## Counting Rules
//!
//! - More signatures than allowed keys, or fewer than required, fails fast.
//! - An owner counts at most once, however many entries carry it.
//! - An owner counts only if its level is above `Unauthorized` and at least
//!   the required level, and the recovered signer equals the owner.
//! - Malformed entries are skipped, never fatal.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use shared_types::{canonical_json, parse_address, Address, MultisigKeys, SecurityLevel, Sign};
use tracing::debug;

use super::ecdsa::{keccak256, personal_message_hash, verify_ecdsa_signer};
use super::entities::EcdsaSignature;
use super::errors::SignatureError;

/// `0x`-prefixed Keccak256 of the payload's canonical JSON.
pub fn payload_digest<T: Serialize + ?Sized>(payload: &T) -> Result<String, SignatureError> {
    let canonical =
        canonical_json(payload).map_err(|e| SignatureError::Canonicalization(e.to_string()))?;
    Ok(format!("0x{}", hex::encode(keccak256(canonical.as_bytes()))))
}

/// The prehash each signer actually signs for `payload`.
pub fn payload_message_hash<T: Serialize + ?Sized>(
    payload: &T,
) -> Result<shared_types::Hash, SignatureError> {
    let digest = payload_digest(payload)?;
    Ok(personal_message_hash(digest.as_bytes()))
}

/// Count distinct allowed signers and compare against `required`.
pub fn verify_multi_sigs<T: Serialize + ?Sized>(
    payload: &T,
    signatures: &[Sign],
    allowed_keys: &MultisigKeys,
    required: usize,
    min_level: SecurityLevel,
) -> bool {
    if signatures.len() < required || signatures.len() > allowed_keys.len() {
        return false;
    }

    let message_hash = match payload_message_hash(payload) {
        Ok(hash) => hash,
        Err(e) => {
            debug!("[qc-10] payload not signable: {}", e);
            return false;
        }
    };

    // Keys compare case-insensitively, so index them by parsed address.
    let levels: HashMap<Address, SecurityLevel> = allowed_keys
        .iter()
        .filter_map(|(key, level)| parse_address(key).ok().map(|addr| (addr, *level)))
        .collect();

    let mut counted: HashSet<Address> = HashSet::new();
    for entry in signatures {
        if counted.len() >= required {
            break;
        }
        let Ok(owner) = parse_address(&entry.owner) else {
            continue;
        };
        if counted.contains(&owner) {
            continue;
        }
        match levels.get(&owner) {
            Some(level) if *level > SecurityLevel::Unauthorized && *level >= min_level => {}
            _ => continue,
        }
        let Ok(signature) = EcdsaSignature::from_hex(&entry.sig) else {
            continue;
        };
        if verify_ecdsa_signer(&message_hash, &signature, owner).valid {
            counted.insert(owner);
        }
    }

    counted.len() >= required
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ecdsa::address_from_pubkey;
    use crate::domain::signer::sign_payload;
    use k256::ecdsa::SigningKey;
    use serde_json::json;
    use shared_types::format_address;

    fn keys(n: usize) -> Vec<SigningKey> {
        (0..n)
            .map(|_| SigningKey::random(&mut rand::thread_rng()))
            .collect()
    }

    fn owner(key: &SigningKey) -> String {
        format_address(&address_from_pubkey(key.verifying_key()))
    }

    fn allow(keys: &[SigningKey], level: SecurityLevel) -> MultisigKeys {
        keys.iter().map(|k| (owner(k), level)).collect()
    }

    fn payload() -> serde_json::Value {
        json!({"amount": "1000000000000000000", "accountName": "Foundation", "nonce": 1})
    }

    #[test]
    fn test_digest_is_order_independent() {
        let a = json!({"amount": "1", "accountName": "A", "nonce": 1});
        let b = json!({"nonce": 1, "accountName": "A", "amount": "1"});
        let digest = payload_digest(&a).unwrap();
        assert_eq!(digest, payload_digest(&b).unwrap());
        assert_eq!(digest.len(), 66);
    }

    #[test]
    fn test_threshold_met_by_distinct_signers() {
        let signers = keys(3);
        let allowed = allow(&signers, SecurityLevel::High);
        let sigs: Vec<Sign> = signers
            .iter()
            .map(|k| sign_payload(&payload(), k).unwrap())
            .collect();

        assert!(verify_multi_sigs(&payload(), &sigs, &allowed, 3, SecurityLevel::High));
        assert!(verify_multi_sigs(&payload(), &sigs[..1], &allowed, 1, SecurityLevel::High));
        assert!(!verify_multi_sigs(&payload(), &sigs[..2], &allowed, 3, SecurityLevel::High));
    }

    #[test]
    fn test_duplicate_owner_counts_once() {
        let signers = keys(3);
        let allowed = allow(&signers, SecurityLevel::High);
        let sig = sign_payload(&payload(), &signers[0]).unwrap();
        let sigs = vec![sig.clone(), sig.clone(), sig];
        assert!(!verify_multi_sigs(&payload(), &sigs, &allowed, 2, SecurityLevel::High));
    }

    #[test]
    fn test_low_level_and_unknown_keys_do_not_count() {
        let signers = keys(2);
        let mut allowed = allow(&signers[..1], SecurityLevel::Low);
        allowed.insert(owner(&keys(1)[0]), SecurityLevel::High);
        let sigs = vec![
            sign_payload(&payload(), &signers[0]).unwrap(),
            sign_payload(&payload(), &signers[1]).unwrap(),
        ];
        assert!(!verify_multi_sigs(&payload(), &sigs, &allowed, 1, SecurityLevel::High));
        assert!(verify_multi_sigs(&payload(), &sigs[..1], &allowed, 1, SecurityLevel::Low));
    }

    #[test]
    fn test_unauthorized_level_never_counts() {
        let signers = keys(1);
        let allowed = allow(&signers, SecurityLevel::Unauthorized);
        let sigs = vec![sign_payload(&payload(), &signers[0]).unwrap()];
        assert!(!verify_multi_sigs(
            &payload(),
            &sigs,
            &allowed,
            1,
            SecurityLevel::Unauthorized
        ));
    }

    #[test]
    fn test_owner_case_is_ignored() {
        let signers = keys(1);
        let allowed: MultisigKeys = [(owner(&signers[0]).to_uppercase().replace("0X", "0x"), SecurityLevel::High)]
            .into_iter()
            .collect();
        let sigs = vec![sign_payload(&payload(), &signers[0]).unwrap()];
        assert!(verify_multi_sigs(&payload(), &sigs, &allowed, 1, SecurityLevel::High));
    }

    #[test]
    fn test_signature_over_other_payload_rejected() {
        let signers = keys(1);
        let allowed = allow(&signers, SecurityLevel::High);
        let other = json!({"amount": "1", "accountName": "Foundation", "nonce": 1});
        let sigs = vec![sign_payload(&other, &signers[0]).unwrap()];
        assert!(!verify_multi_sigs(&payload(), &sigs, &allowed, 1, SecurityLevel::High));
    }

    #[test]
    fn test_claimed_owner_must_match_recovered_signer() {
        let signers = keys(2);
        let allowed = allow(&signers, SecurityLevel::High);
        let mut forged = sign_payload(&payload(), &signers[0]).unwrap();
        forged.owner = owner(&signers[1]);
        assert!(!verify_multi_sigs(&payload(), &[forged], &allowed, 1, SecurityLevel::High));
    }

    #[test]
    fn test_more_signatures_than_keys_fails_fast() {
        let signers = keys(2);
        let allowed = allow(&signers[..1], SecurityLevel::High);
        let sigs: Vec<Sign> = signers
            .iter()
            .map(|k| sign_payload(&payload(), k).unwrap())
            .collect();
        assert!(!verify_multi_sigs(&payload(), &sigs, &allowed, 1, SecurityLevel::High));
    }

    #[test]
    fn test_wallet_signed_ticket_vector() {
        // Produced by an Ethereum wallet over the digest of {type, data}.
        let payload = json!({
            "type": "silver",
            "data": [{"address": "0xd79eFA2f9bB9C780e4Ce05D6b8a15541915e4636"}],
        });
        let sigs = vec![Sign {
            owner: "0x1e5e12568b7103E8B22cd680A6fa6256DD66ED76".into(),
            sig: "0xf3e7f8ccc763a8b832ad933b35bb181962d9d94316407e49142cd182d090559d66904856ea2811d44ee11c000678cf9d10134636cd8e4aaa26e78baca19a896f1c".into(),
        }];
        let allowed: MultisigKeys = [(
            "0x1e5e12568b7103E8B22cd680A6fa6256DD66ED76".to_string(),
            SecurityLevel::High,
        )]
        .into_iter()
        .collect();

        assert!(verify_multi_sigs(&payload, &sigs, &allowed, 1, SecurityLevel::High));

        let tampered = json!({
            "type": "silver",
            "data": [{"address": "0xd79eFA2f9bB9C780e4Ce05D6b8a15541915e4631"}],
        });
        assert!(!verify_multi_sigs(&tampered, &sigs, &allowed, 1, SecurityLevel::High));
    }

    #[test]
    fn test_malformed_entries_are_skipped() {
        let signers = keys(2);
        let allowed = allow(&signers, SecurityLevel::High);
        let sigs = vec![
            Sign {
                owner: "not-an-address".into(),
                sig: "0x00".into(),
            },
            sign_payload(&payload(), &signers[1]).unwrap(),
        ];
        assert!(verify_multi_sigs(&payload(), &sigs, &allowed, 1, SecurityLevel::High));
    }
}
