//! RSA blind signatures over ballot labels.
//!
//! The voter blinds the label with `r^e`, the registrar signs the blinded value without
//! learning the label, and the voter strips `r` to get a plain RSA signature on the label.
use crate::*;
use num_bigint_dig::BigUint;
use num_traits::{One, Zero};
use rand_core::RngCore;
use rsa::PublicKeyParts;

/// RSA verification key of the registrar
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(try_from = "RawSigningKey")]
pub struct SigningPublicKey {
    #[serde(with = "serde_base64")]
    n: BigUint,

    #[serde(with = "serde_base64")]
    e: BigUint,
}

#[derive(Deserialize)]
struct RawSigningKey {
    #[serde(with = "serde_base64")]
    n: BigUint,

    #[serde(with = "serde_base64")]
    e: BigUint,
}

impl std::convert::TryFrom<RawSigningKey> for SigningPublicKey {
    type Error = Error;

    fn try_from(raw: RawSigningKey) -> Result<Self, Error> {
        SigningPublicKey::new(raw.n, raw.e)
    }
}

impl From<&rsa::RSAPublicKey> for SigningPublicKey {
    fn from(key: &rsa::RSAPublicKey) -> Self {
        SigningPublicKey {
            n: key.n().clone(),
            e: key.e().clone(),
        }
    }
}

impl SigningPublicKey {
    /// The modulus must exceed 3 so that the blinding range `[2, n-1]` is non-empty.
    pub fn new(n: BigUint, e: BigUint) -> Result<Self, Error> {
        if n <= BigUint::from(3u32) {
            return Err(Error::InvalidPublicKey("signing modulus must be greater than 3"));
        }
        if e.is_zero() {
            return Err(Error::InvalidPublicKey("signing exponent must be non-zero"));
        }
        Ok(SigningPublicKey { n, e })
    }

    pub fn n(&self) -> &BigUint {
        &self.n
    }

    pub fn e(&self) -> &BigUint {
        &self.e
    }
}

/// A blinded message and the secret factor needed to unblind its signature
#[derive(Debug, Clone)]
pub struct BlindedBallot {
    pub blinded_message: BigUint,

    /// Secret. Discard after unblinding.
    pub r: BigUint,
}

/// Blind `message` with a fresh factor `r` drawn from `[2, n-1]` and coprime to `n`
pub fn blind<R: RngCore + ?Sized>(
    rng: &mut R,
    message: &BigUint,
    pk: &SigningPublicKey,
) -> Result<BlindedBallot, Error> {
    let span = &pk.n - BigUint::from(2u32);
    let mut bytes = vec![0u8; pk.n.bits() / 8 + 1];

    loop {
        rng.fill_bytes(&mut bytes);
        let r = BigUint::from_bytes_be(&bytes) % &span + BigUint::from(2u32);
        if gcd(&r, &pk.n).is_one() {
            return blind_with_factor(message, &r, pk);
        }
    }
}

/// Blind `message` with a caller-chosen factor `r`
pub fn blind_with_factor(
    message: &BigUint,
    r: &BigUint,
    pk: &SigningPublicKey,
) -> Result<BlindedBallot, Error> {
    if !gcd(r, &pk.n).is_one() {
        return Err(Error::NoInverse);
    }
    let r_e = mod_pow(r, &pk.e, &pk.n);
    Ok(BlindedBallot {
        blinded_message: (message * r_e) % &pk.n,
        r: r.clone(),
    })
}

/// Remove the blinding factor from the registrar's signature: `s = s' · r^-1 mod n`
pub fn unblind(blinded_signature: &BigUint, r: &BigUint, n: &BigUint) -> Result<BigUint, Error> {
    let r_inv = mod_inverse(r, n)?;
    Ok((blinded_signature * r_inv) % n)
}

/// Plain RSA verification: `signature^e mod n == message`
pub fn verify_signature(message: &BigUint, signature: &BigUint, pk: &SigningPublicKey) -> bool {
    mod_pow(signature, &pk.e, &pk.n) == *message
}

/// Accept a plain signature, or one the registrar issued over `message · multiplier`
/// (its marker for a re-cast ballot).
///
/// The product is not reduced mod `n`, so once `message · multiplier >= n` only the plain
/// signature verifies.
pub fn verify_signature_with_multiplier(
    message: &BigUint,
    signature: &BigUint,
    pk: &SigningPublicKey,
    multiplier: &BigUint,
) -> bool {
    verify_signature(message, signature, pk)
        || verify_signature(&(message * multiplier), signature, pk)
}
