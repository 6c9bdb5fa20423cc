use crate::*;
use num_bigint_dig::{BigInt, BigUint, Sign};
use num_traits::One;
use rand_core::RngCore;

/// Paillier-style public key with the `g = n + 1` optimization
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(try_from = "RawPublicKey")]
pub struct HomomorphicPublicKey {
    #[serde(with = "serde_base64")]
    n: BigUint,

    #[serde(skip)]
    nn: BigUint,
}

#[derive(Deserialize)]
struct RawPublicKey {
    #[serde(with = "serde_base64")]
    n: BigUint,
}

impl std::convert::TryFrom<RawPublicKey> for HomomorphicPublicKey {
    type Error = Error;

    fn try_from(raw: RawPublicKey) -> Result<Self, Error> {
        HomomorphicPublicKey::new(raw.n)
    }
}

impl HomomorphicPublicKey {
    pub fn new(n: BigUint) -> Result<Self, Error> {
        if n <= BigUint::one() {
            return Err(Error::InvalidPublicKey("paillier modulus must be greater than 1"));
        }
        let nn = &n * &n;
        Ok(HomomorphicPublicKey { n, nn })
    }

    pub fn n(&self) -> &BigUint {
        &self.n
    }

    /// The ciphertext modulus `n²`
    pub fn nn(&self) -> &BigUint {
        &self.nn
    }

    pub fn g(&self) -> BigUint {
        &self.n + BigUint::one()
    }

    /// `c = g^m · r^n mod n²`. `r` must be coprime to `n`.
    pub fn encrypt(&self, m: &BigUint, r: &BigUint) -> BigUint {
        let gm = mod_pow(&self.g(), m, &self.nn);
        let rn = mod_pow(r, &self.n, &self.nn);
        (gm * rn) % &self.nn
    }

    /// Encrypt with fresh randomness. Returns the ciphertext and the randomness used.
    pub fn encrypt_random<R: RngCore + ?Sized>(&self, rng: &mut R, m: &BigUint) -> (BigUint, BigUint) {
        let r = random_unit(rng, &self.n);
        (self.encrypt(m, &r), r)
    }

    /// Homomorphic addition: the product of two ciphertexts encrypts the sum of their plaintexts
    pub fn add_ciphertexts(&self, c1: &BigUint, c2: &BigUint) -> BigUint {
        (c1 * c2) % &self.nn
    }

    /// `u = c · (g^m)^-1 mod n²`, which is an `n`-th residue exactly when `c` encrypts `m`
    pub fn strip_message(&self, ciphertext: &BigUint, m: &BigUint) -> Result<BigUint, Error> {
        let gm = mod_pow(&self.g(), m, &self.nn);
        let gm_inv = mod_inverse(&gm, &self.nn)?;
        Ok((ciphertext * gm_inv) % &self.nn)
    }

    /// Check a published randomness opening: `r'^n ≡ c (mod n)`
    pub fn verify_randomness(&self, ciphertext: &BigUint, r_prime: &BigUint) -> bool {
        mod_pow(r_prime, &self.n, &self.n) == ciphertext % &self.n
    }

    /// Recover the plaintext from a ciphertext and its randomness opening:
    /// `L(c · r'^-n mod n²) mod n`
    pub fn recover_plaintext(&self, ciphertext: &BigUint, r_prime: &BigUint) -> Result<BigUint, Error> {
        let neg_n = -BigInt::from_biguint(Sign::Plus, self.n.clone());
        let r_inv_n = mod_pow_signed(r_prime, &neg_n, &self.nn)?;
        let numerator = (ciphertext * r_inv_n) % &self.nn;
        Ok(l_function(&numerator, &self.n) % &self.n)
    }
}

/// The k valid plaintexts of a ballot, `2^(base·i) mod n²` in option order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteVariants {
    variants: Vec<BigUint>,
}

impl VoteVariants {
    /// Build the variants for `options_amount` options separated by `base` bits
    pub fn generate(
        base: u32,
        options_amount: usize,
        pk: &HomomorphicPublicKey,
    ) -> Result<Self, Error> {
        let two = BigUint::from(2u32);
        let mut variants = Vec::with_capacity(options_amount);

        for i in 0..options_amount {
            let exp = BigUint::from(base as u64) * BigUint::from(i as u64);
            let variant = mod_pow(&two, &exp, pk.nn());

            if !in_range(&variant, pk.n()) {
                return Err(Error::InvalidParameters(format!(
                    "vote variant {} does not fit below the paillier modulus",
                    i
                )));
            }
            if variants.contains(&variant) {
                return Err(Error::InvalidParameters(format!(
                    "vote variant {} is not distinct",
                    i
                )));
            }
            variants.push(variant);
        }

        Ok(VoteVariants { variants })
    }

    pub fn variant(&self, index: usize) -> Option<&BigUint> {
        self.variants.get(index)
    }

    pub fn index_of(&self, value: &BigUint) -> Option<usize> {
        self.variants.iter().position(|v| v == value)
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    pub fn as_slice(&self) -> &[BigUint] {
        &self.variants
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    // 2^61 - 1 and 2^31 - 1
    fn test_key() -> HomomorphicPublicKey {
        let p = BigUint::from(2_305_843_009_213_693_951u64);
        let q = BigUint::from(2_147_483_647u64);
        HomomorphicPublicKey::new(p * q).unwrap()
    }

    #[test]
    fn test_new_rejects_small_modulus() {
        assert!(HomomorphicPublicKey::new(BigUint::from(1u32)).is_err());
        assert!(HomomorphicPublicKey::new(BigUint::from(0u32)).is_err());
    }

    #[test]
    fn test_encrypt_and_open() {
        let pk = test_key();
        let m = BigUint::from(1u64 << 30);
        let (c, r) = pk.encrypt_random(&mut OsRng, &m);

        assert!(in_range(&c, pk.nn()));
        assert!(pk.verify_randomness(&c, &r));
        assert_eq!(pk.recover_plaintext(&c, &r).unwrap(), m);

        let wrong_r = (&r + BigUint::one()) % pk.n();
        assert!(!pk.verify_randomness(&c, &wrong_r));
    }

    #[test]
    fn test_homomorphic_addition() {
        let pk = test_key();
        let m1 = BigUint::from(5u32);
        let m2 = BigUint::from(37u32);
        let (c1, r1) = pk.encrypt_random(&mut OsRng, &m1);
        let (c2, r2) = pk.encrypt_random(&mut OsRng, &m2);

        let sum = pk.add_ciphertexts(&c1, &c2);
        let r = (r1 * r2) % pk.n();
        assert_eq!(pk.recover_plaintext(&sum, &r).unwrap(), BigUint::from(42u32));
    }

    #[test]
    fn test_strip_message() {
        let pk = test_key();
        let m = BigUint::from(7u32);
        let r = BigUint::from(12345u32);
        let c = pk.encrypt(&m, &r);

        // Stripping the right message leaves r^n
        let u = pk.strip_message(&c, &m).unwrap();
        assert_eq!(u, mod_pow(&r, pk.n(), pk.nn()));
    }

    #[test]
    fn test_vote_variants() {
        let pk = test_key();
        let variants = VoteVariants::generate(30, 3, &pk).unwrap();
        assert_eq!(variants.len(), 3);
        assert_eq!(variants.variant(0), Some(&BigUint::from(1u32)));
        assert_eq!(variants.variant(1), Some(&BigUint::from(1u64 << 30)));
        assert_eq!(variants.variant(2), Some(&BigUint::from(1u64 << 60)));
        assert_eq!(variants.index_of(&BigUint::from(1u64 << 60)), Some(2));
        assert_eq!(variants.index_of(&BigUint::from(3u32)), None);

        // 2^120 does not fit below a 92-bit modulus
        assert!(VoteVariants::generate(30, 5, &pk).is_err());
    }
}
