//! Digest constructions over ordered sequences of integers.
//!
//! [`challenge_hash`] and [`label_digest`] serialize their inputs differently and both layouts
//! are checked bit-for-bit by the tally service. They must never be swapped.
use crate::*;
use num_bigint_dig::BigUint;
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Fiat-Shamir challenge: SHA-256 over the decimal renderings concatenated without separator,
/// hex digest read as an integer.
pub fn challenge_hash(values: &[BigUint]) -> BigUint {
    let mut hasher = Sha256::new();
    for value in values {
        hasher.update(value.to_str_radix(10).as_bytes());
    }
    let hex_digest = hex::encode(hasher.finalize());

    // 64 hex characters always parse
    BigUint::parse_bytes(hex_digest.as_bytes(), 16).unwrap_or_default()
}

/// Ballot label commitment: SHA-256 over `base64(decimal) + "|"` for each value, every digest
/// byte rendered as three zero-padded decimal digits, the 96-digit string read as an integer.
pub fn label_digest(values: &[BigUint]) -> BigUint {
    let mut hasher = Sha256::new();
    for value in values {
        hasher.update(bigint_to_base64(value).as_bytes());
        hasher.update(b"|");
    }

    let digits: String = hasher
        .finalize()
        .iter()
        .map(|byte| format!("{:03}", byte))
        .collect();

    BigUint::parse_bytes(digits.as_bytes(), 10).unwrap_or_default()
}

/// Voter nonce: SHA-256 of the JSON serialization of the voter identity, big-endian.
pub fn nonce_digest<U: Serialize + ?Sized>(user: &U) -> Result<BigUint, Error> {
    let serialized = serde_json::to_vec(user)?;
    Ok(BigUint::from_bytes_be(&Sha256::digest(&serialized)))
}
