//! Non-interactive 1-of-k proof that a Paillier ciphertext encrypts one of a known set of
//! plaintexts, without revealing which.
//!
//! For every valid message `m_i` the prover shows that `u_i = c · g^-m_i` is an `n`-th residue.
//! All but the true index are simulated by picking `e_i` and `z_i` first and solving for `a_i`.
//! The true index commits to `a = w^n`, and its challenge is whatever makes the `e_i` sum to the
//! Fiat-Shamir challenge over all `a_i`.
use crate::*;
use num_bigint_dig::BigUint;
use num_traits::One;
use rand_core::RngCore;

/// Default challenge size in bits
pub const CHALLENGE_BITS: u32 = 256;

/// A proof that `ciphertext` encrypts one of `valid_messages`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CorrectMessageProof {
    #[serde(with = "serde_base64::vec")]
    pub e_vec: Vec<BigUint>,

    #[serde(with = "serde_base64::vec")]
    pub z_vec: Vec<BigUint>,

    #[serde(with = "serde_base64::vec")]
    pub a_vec: Vec<BigUint>,

    #[serde(with = "serde_base64")]
    pub ciphertext: BigUint,

    #[serde(with = "serde_base64::vec")]
    pub valid_messages: Vec<BigUint>,
}

impl CorrectMessageProof {
    /// Encrypt `true_message` under `pk` and prove it is one of `valid_messages`
    pub fn generate<R: RngCore + ?Sized>(
        rng: &mut R,
        pk: &HomomorphicPublicKey,
        valid_messages: &[BigUint],
        true_message: &BigUint,
        challenge_bits: u32,
    ) -> Result<Self, Error> {
        let n = pk.n();
        let nn = pk.nn();
        let challenge_modulus = BigUint::one() << challenge_bits as usize;

        let (ciphertext, r) = pk.encrypt_random(rng, true_message);

        let u_vec = valid_messages
            .iter()
            .map(|m| pk.strip_message(&ciphertext, m))
            .collect::<Result<Vec<_>, _>>()?;

        let true_index = valid_messages
            .iter()
            .position(|m| m == true_message)
            .ok_or(Error::InvalidWitness)?;

        let k = valid_messages.len();
        let mut e_vec = Vec::with_capacity(k);
        let mut z_vec = Vec::with_capacity(k);
        let mut a_vec = Vec::with_capacity(k);

        // Simulated transcripts for every index but the true one
        for (i, u) in u_vec.iter().enumerate() {
            if i == true_index {
                // filled in once the challenge is known
                e_vec.push(BigUint::default());
                z_vec.push(BigUint::default());
                a_vec.push(BigUint::default());
                continue;
            }
            let e = random_below(rng, &challenge_modulus);
            let z = random_below(rng, n);
            let z_n = mod_pow(&z, n, nn);
            let u_e_inv = mod_inverse(&mod_pow(u, &e, nn), nn)?;
            a_vec.push((z_n * u_e_inv) % nn);
            e_vec.push(e);
            z_vec.push(z);
        }

        let w = random_below(rng, n);
        a_vec[true_index] = mod_pow(&w, n, nn);

        let challenge = challenge_hash(&a_vec) % &challenge_modulus;
        let simulated_sum = e_vec
            .iter()
            .fold(BigUint::default(), |acc, e| (acc + e) % &challenge_modulus);

        let e_true = (challenge + &challenge_modulus - simulated_sum) % &challenge_modulus;
        let z_true = (w * mod_pow(&r, &e_true, n)) % n;
        e_vec[true_index] = e_true;
        z_vec[true_index] = z_true;

        Ok(CorrectMessageProof {
            e_vec,
            z_vec,
            a_vec,
            ciphertext,
            valid_messages: valid_messages.to_vec(),
        })
    }

    /// Verify the proof against `pk`
    pub fn verify(&self, pk: &HomomorphicPublicKey, challenge_bits: u32) -> Result<(), Error> {
        verify(
            &self.e_vec,
            &self.z_vec,
            &self.a_vec,
            &self.ciphertext,
            &self.valid_messages,
            pk,
            challenge_bits,
        )
    }

    pub fn is_valid(&self, pk: &HomomorphicPublicKey, challenge_bits: u32) -> bool {
        self.verify(pk, challenge_bits).is_ok()
    }
}

/// Verify a proof given as separate vectors
pub fn verify(
    e_vec: &[BigUint],
    z_vec: &[BigUint],
    a_vec: &[BigUint],
    ciphertext: &BigUint,
    valid_messages: &[BigUint],
    pk: &HomomorphicPublicKey,
    challenge_bits: u32,
) -> Result<(), Error> {
    let k = valid_messages.len();
    if k == 0 || e_vec.len() != k || z_vec.len() != k || a_vec.len() != k {
        return Err(Error::MalformedProof);
    }

    let n = pk.n();
    let nn = pk.nn();
    let challenge_modulus = BigUint::one() << challenge_bits as usize;

    let challenge = challenge_hash(a_vec) % &challenge_modulus;
    let e_sum = e_vec
        .iter()
        .fold(BigUint::default(), |acc, e| (acc + e) % &challenge_modulus);
    if challenge != e_sum {
        debug!("zkp: challenge does not match sum of e_vec");
        return Err(Error::ChallengeMismatch);
    }

    for (i, m) in valid_messages.iter().enumerate() {
        let u = pk.strip_message(ciphertext, m)?;
        let lhs = mod_pow(&z_vec[i], n, nn);
        let rhs = (&a_vec[i] * mod_pow(&u, &e_vec[i], nn)) % nn;
        if lhs != rhs {
            debug!("zkp: equation {} does not hold", i);
            return Err(Error::EquationMismatch(i));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn test_key() -> HomomorphicPublicKey {
        let p = BigUint::from(2_305_843_009_213_693_951u64);
        let q = BigUint::from(2_147_483_647u64);
        HomomorphicPublicKey::new(p * q).unwrap()
    }

    fn four_variants() -> Vec<BigUint> {
        (0..4u32).map(|i| BigUint::one() << (30 * i) as usize).collect()
    }

    #[test]
    fn test_generate_and_verify() {
        let pk = test_key();
        let valid = four_variants();

        for true_message in valid.iter() {
            let proof =
                CorrectMessageProof::generate(&mut OsRng, &pk, &valid, true_message, CHALLENGE_BITS)
                    .unwrap();
            proof.verify(&pk, CHALLENGE_BITS).unwrap();
            assert_eq!(proof.e_vec.len(), 4);
            assert!(proof.ciphertext < *pk.nn());
        }
    }

    #[test]
    fn test_invalid_witness() {
        let pk = test_key();
        let valid = four_variants();
        let result = CorrectMessageProof::generate(
            &mut OsRng,
            &pk,
            &valid,
            &BigUint::from(3u32),
            CHALLENGE_BITS,
        );
        assert!(matches!(result, Err(Error::InvalidWitness)));
    }

    #[test]
    fn test_single_option() {
        let pk = test_key();
        let valid = vec![BigUint::one()];
        let proof =
            CorrectMessageProof::generate(&mut OsRng, &pk, &valid, &valid[0], CHALLENGE_BITS)
                .unwrap();
        assert!(proof.is_valid(&pk, CHALLENGE_BITS));
    }

    #[test]
    fn test_tampering_is_detected() {
        let pk = test_key();
        let valid = four_variants();
        let proof = CorrectMessageProof::generate(
            &mut ChaCha20Rng::seed_from_u64(42),
            &pk,
            &valid,
            &valid[1],
            CHALLENGE_BITS,
        )
        .unwrap();

        for i in 0..valid.len() {
            let mut bad = proof.clone();
            bad.e_vec[i] += BigUint::one();
            assert!(!bad.is_valid(&pk, CHALLENGE_BITS), "e_vec[{}]", i);

            let mut bad = proof.clone();
            bad.z_vec[i] += BigUint::one();
            assert!(matches!(
                bad.verify(&pk, CHALLENGE_BITS),
                Err(Error::EquationMismatch(j)) if j == i
            ));

            let mut bad = proof.clone();
            bad.a_vec[i] += BigUint::one();
            assert!(matches!(
                bad.verify(&pk, CHALLENGE_BITS),
                Err(Error::ChallengeMismatch)
            ));
        }
    }

    #[test]
    fn test_wrong_ciphertext() {
        let pk = test_key();
        let valid = four_variants();
        let mut proof =
            CorrectMessageProof::generate(&mut OsRng, &pk, &valid, &valid[2], CHALLENGE_BITS)
                .unwrap();

        // A ciphertext of a message outside the set cannot reuse the proof
        proof.ciphertext = pk.encrypt(&BigUint::from(5u32), &BigUint::from(7u32));
        assert!(!proof.is_valid(&pk, CHALLENGE_BITS));
    }

    #[test]
    fn test_malformed() {
        let pk = test_key();
        let valid = four_variants();
        let mut proof =
            CorrectMessageProof::generate(&mut OsRng, &pk, &valid, &valid[0], CHALLENGE_BITS)
                .unwrap();
        proof.z_vec.pop();
        assert!(matches!(
            proof.verify(&pk, CHALLENGE_BITS),
            Err(Error::MalformedProof)
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let pk = test_key();
        let valid = four_variants();
        let proof =
            CorrectMessageProof::generate(&mut OsRng, &pk, &valid, &valid[3], CHALLENGE_BITS)
                .unwrap();

        let json = serde_json::to_string(&proof).unwrap();
        let decoded: CorrectMessageProof = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, proof);
        decoded.verify(&pk, CHALLENGE_BITS).unwrap();
    }
}
