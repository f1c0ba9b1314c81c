//! Producing `{owner, sig}` entries the multisig verifier accepts.

use k256::ecdsa::SigningKey;
use serde::Serialize;
use shared_types::{format_address, Sign};

use super::ecdsa::{address_from_pubkey, sign_prehash};
use super::errors::SignatureError;
use super::multisig::payload_message_hash;

/// Sign `payload` the way an Ethereum wallet `personal_sign`s its digest.
pub fn sign_payload<T: Serialize + ?Sized>(
    payload: &T,
    key: &SigningKey,
) -> Result<Sign, SignatureError> {
    let message_hash = payload_message_hash(payload)?;
    let signature = sign_prehash(&message_hash, key)?;
    Ok(Sign {
        owner: format_address(&address_from_pubkey(key.verifying_key())),
        sig: signature.to_hex(),
    })
}
