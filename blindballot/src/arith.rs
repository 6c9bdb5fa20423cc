//! Modular big-integer arithmetic shared by the encryption, proof and signature code.
use crate::*;
use num_bigint_dig::{BigInt, BigUint, Sign};
use num_traits::{One, Signed, Zero};
use rand_core::RngCore;

/// Greatest common divisor (Euclid)
pub fn gcd(a: &BigUint, b: &BigUint) -> BigUint {
    let mut a = a.clone();
    let mut b = b.clone();
    while !b.is_zero() {
        let r = &a % &b;
        a = b;
        b = r;
    }
    a
}

/// Least common multiple. Zero if either argument is zero.
pub fn lcm(a: &BigUint, b: &BigUint) -> BigUint {
    if a.is_zero() || b.is_zero() {
        return BigUint::zero();
    }
    (a * b) / gcd(a, b)
}

/// `base^exp mod modulus`, with `base` reduced first. Always zero for a modulus of one.
///
/// Panics if `modulus` is zero.
pub fn mod_pow(base: &BigUint, exp: &BigUint, modulus: &BigUint) -> BigUint {
    if modulus.is_one() {
        return BigUint::zero();
    }
    (base % modulus).modpow(exp, modulus)
}

/// `mod_pow` accepting a negative exponent, defined as `mod_inverse(base^|exp|, modulus)`.
pub fn mod_pow_signed(base: &BigUint, exp: &BigInt, modulus: &BigUint) -> Result<BigUint, Error> {
    let magnitude = exp.abs().to_biguint().unwrap_or_default();
    let power = mod_pow(base, &magnitude, modulus);
    if exp.is_negative() {
        mod_inverse(&power, modulus)
    } else {
        Ok(power)
    }
}

/// Multiplicative inverse of `a` modulo `m` via the extended Euclidean algorithm,
/// normalized into `[0, m)`.
pub fn mod_inverse(a: &BigUint, m: &BigUint) -> Result<BigUint, Error> {
    if m.is_one() {
        return Ok(BigUint::zero());
    }

    let modulus = BigInt::from_biguint(Sign::Plus, m.clone());
    let (mut old_r, mut r) = (BigInt::from_biguint(Sign::Plus, a.clone()), modulus.clone());
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());

    while !r.is_zero() {
        let quotient = &old_r / &r;
        let next_r = &old_r - &quotient * &r;
        old_r = std::mem::replace(&mut r, next_r);
        let next_s = &old_s - &quotient * &s;
        old_s = std::mem::replace(&mut s, next_s);
    }

    if !old_r.is_one() {
        return Err(Error::NoInverse);
    }

    let normalized = ((old_s % &modulus) + &modulus) % &modulus;
    normalized.to_biguint().ok_or(Error::NoInverse)
}

/// Draw a random integer in `[1, max)`.
///
/// Fills `ceil(bits(max) / 8)` random bytes, reduces them modulo `max` and redraws on zero.
/// The single reduction is slightly biased toward small values; the remote verifier
/// was built against exactly this sampler, so keep it as is.
///
/// Panics if `max <= 1`.
pub fn random_below<R: RngCore + ?Sized>(rng: &mut R, max: &BigUint) -> BigUint {
    assert!(
        *max > BigUint::one(),
        "blindballot: random_below requires max > 1"
    );
    let mut bytes = vec![0u8; (max.bits() + 7) / 8];
    loop {
        rng.fill_bytes(&mut bytes);
        let value = BigUint::from_bytes_be(&bytes) % max;
        if !value.is_zero() {
            return value;
        }
    }
}

/// Draw a random integer in `[1, n)` that is coprime to `n`.
pub fn random_unit<R: RngCore + ?Sized>(rng: &mut R, n: &BigUint) -> BigUint {
    loop {
        let r = random_below(rng, n);
        if gcd(&r, n).is_one() {
            return r;
        }
    }
}

/// `0 <= value < modulus`
pub fn in_range(value: &BigUint, modulus: &BigUint) -> bool {
    value < modulus
}

/// Paillier's `L(x) = (x - 1) / n`
pub fn l_function(x: &BigUint, n: &BigUint) -> BigUint {
    if x.is_zero() {
        return BigUint::zero();
    }
    (x - BigUint::one()) / n
}
