//! The ballot-casting state machine.
//!
//! ```text
//! Idle -> Preparing -> Signing -> Submitting -> Completed
//!   \          \           \           \
//!    Cancelled  +-----------+-----------+--> Errored
//! ```
//!
//! A session owns everything produced while casting one ballot: the proof, the label and
//! the signature. Nothing is retried automatically. An errored session must be [`reset`]
//! by the caller before it can be confirmed again.
//!
//! [`reset`]: BallotSession::reset
use crate::*;
use num_bigint_dig::BigUint;
use rand_core::RngCore;
use std::fmt;

/// The registrar issues blind signatures on ballot labels
pub trait Registrar {
    fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, NetworkError>;
}

/// The tally service accepts signed ballots
pub trait TallyService {
    /// Submit a ballot. The response body is opaque.
    fn submit(&self, submission: &BallotSubmission) -> Result<serde_json::Value, NetworkError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Preparing,
    Signing,
    Submitting,
    Completed,
    Cancelled,
    Errored,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            SessionStatus::Idle => "idle",
            SessionStatus::Preparing => "preparing",
            SessionStatus::Signing => "signing",
            SessionStatus::Submitting => "submitting",
            SessionStatus::Completed => "completed",
            SessionStatus::Cancelled => "cancelled",
            SessionStatus::Errored => "errored",
        };
        write!(f, "{}", name)
    }
}

/// Why a session ended up `Errored`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    ProofGeneration,
    /// The nonce or label could not be derived while signing
    LabelDerivation,
    LabelTooLarge,
    SignatureInvalid,
    NetworkFailure(Phase),
}

/// One attempt at casting one ballot
pub struct BallotSession {
    params: ElectionParams,
    variants: VoteVariants,
    user: serde_json::Value,
    prior: Option<PriorBallot>,

    status: SessionStatus,
    failure: Option<FailureReason>,

    proof: Option<CorrectMessageProof>,
    nonce: Option<BigUint>,
    label: Option<BigUint>,
    signature: Option<BigUint>,
    submission: Option<BallotSubmission>,
}

impl BallotSession {
    /// Start a session for `user`. Pass the receipt of an earlier ballot in `prior` to re-vote.
    pub fn new(
        params: ElectionParams,
        user: serde_json::Value,
        prior: Option<PriorBallot>,
    ) -> Result<Self, Error> {
        params.validate()?;
        let variants = params.vote_variants()?;

        Ok(BallotSession {
            params,
            variants,
            user,
            prior,
            status: SessionStatus::Idle,
            failure: None,
            proof: None,
            nonce: None,
            label: None,
            signature: None,
            submission: None,
        })
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn failure(&self) -> Option<FailureReason> {
        self.failure
    }

    pub fn params(&self) -> &ElectionParams {
        &self.params
    }

    pub fn variants(&self) -> &VoteVariants {
        &self.variants
    }

    pub fn proof(&self) -> Option<&CorrectMessageProof> {
        self.proof.as_ref()
    }

    pub fn label(&self) -> Option<&BigUint> {
        self.label.as_ref()
    }

    /// The payload sent to the tally service, once submitted
    pub fn submission(&self) -> Option<&BallotSubmission> {
        self.submission.as_ref()
    }

    /// Confirm the chosen option (`Idle -> Preparing -> Signing`).
    ///
    /// Encrypts the option's vote variant and proves it is one of the ballot's variants.
    /// A missing or unknown option leaves the session `Idle`.
    pub fn confirm<R: RngCore + ?Sized>(
        &mut self,
        rng: &mut R,
        choice: Option<usize>,
    ) -> Result<(), Error> {
        self.expect_status(Phase::Prepare, SessionStatus::Idle)?;

        let index = choice.ok_or(Error::NoSelection)?;
        let true_message = self
            .variants
            .variant(index)
            .ok_or(Error::InvalidOption(index))?
            .clone();

        self.transition(SessionStatus::Preparing);

        let proof = CorrectMessageProof::generate(
            rng,
            &self.params.paillier,
            self.variants.as_slice(),
            &true_message,
            self.params.challenge_bits,
        );

        match proof {
            Ok(proof) => {
                self.proof = Some(proof);
                self.transition(SessionStatus::Signing);
                Ok(())
            }
            Err(e) => Err(self.fail(FailureReason::ProofGeneration, e)),
        }
    }

    /// Obtain a blind signature on the ballot label (`Signing -> Submitting`)
    pub fn sign<R: RngCore + ?Sized, G: Registrar + ?Sized>(
        &mut self,
        rng: &mut R,
        registrar: &G,
    ) -> Result<(), Error> {
        self.expect_status(Phase::Sign, SessionStatus::Signing)?;

        let ciphertext = match self.proof.as_ref().map(|proof| proof.ciphertext.clone()) {
            Some(ciphertext) => ciphertext,
            None => {
                return Err(self.fail(
                    FailureReason::LabelDerivation,
                    Error::InvalidState {
                        phase: Phase::Sign,
                        expected: SessionStatus::Signing,
                        found: SessionStatus::Preparing,
                    },
                ))
            }
        };

        let nonce = match nonce_digest(&self.user) {
            Ok(nonce) => nonce,
            Err(e) => return Err(self.fail(FailureReason::LabelDerivation, e)),
        };
        let label = label_digest(&[nonce.clone(), ciphertext]);

        let signing_key = self.params.rsa.clone();
        if !in_range(&label, signing_key.n()) {
            return Err(self.fail(FailureReason::LabelTooLarge, Error::LabelTooLarge));
        }

        let blinded = match blind(rng, &label, &signing_key) {
            Ok(blinded) => blinded,
            Err(e) => return Err(self.fail(FailureReason::SignatureInvalid, e)),
        };

        let request = RegisterRequest {
            voting_id: self.params.voting_id.clone(),
            blinded_ballot: blinded.blinded_message.clone(),
        };

        let blinded_signature = match registrar
            .register(&request)
            .and_then(RegisterResponse::into_signature)
        {
            Ok(signature) => signature,
            Err(source) => {
                return Err(self.fail(
                    FailureReason::NetworkFailure(Phase::Sign),
                    Error::Network {
                        phase: Phase::Sign,
                        source,
                    },
                ))
            }
        };

        let signature = match unblind(&blinded_signature, &blinded.r, signing_key.n()) {
            Ok(signature) => signature,
            Err(e) => return Err(self.fail(FailureReason::SignatureInvalid, e)),
        };
        drop(blinded);

        if !verify_signature_with_multiplier(
            &label,
            &signature,
            &signing_key,
            &self.params.re_voting_multiplier,
        ) {
            return Err(self.fail(FailureReason::SignatureInvalid, Error::SignatureInvalid));
        }

        self.nonce = Some(nonce);
        self.label = Some(label);
        self.signature = Some(signature);
        self.transition(SessionStatus::Submitting);
        Ok(())
    }

    /// Send the signed ballot to the tally service (`Submitting -> Completed`).
    ///
    /// Returns the tally service's response.
    pub fn submit<T: TallyService + ?Sized>(
        &mut self,
        tally: &T,
    ) -> Result<serde_json::Value, Error> {
        self.expect_status(Phase::Submit, SessionStatus::Submitting)?;

        let signed = match (&self.proof, &self.label, &self.signature) {
            (Some(proof), Some(label), Some(signature)) => {
                Some((proof.clone(), label.clone(), signature.clone()))
            }
            _ => None,
        };
        let (proof, label, signature) = match signed {
            Some(signed) => signed,
            None => return Err(self.fail(FailureReason::SignatureInvalid, Error::SignatureInvalid)),
        };

        if !verify_signature_with_multiplier(
            &label,
            &signature,
            &self.params.rsa,
            &self.params.re_voting_multiplier,
        ) {
            return Err(self.fail(FailureReason::SignatureInvalid, Error::SignatureInvalid));
        }

        let submission = BallotSubmission::new(
            &self.params.voting_id,
            &proof,
            signature,
            label,
            self.prior.as_ref(),
        );

        match tally.submit(&submission) {
            Ok(response) => {
                self.submission = Some(submission);
                self.transition(SessionStatus::Completed);
                Ok(response)
            }
            Err(source) => Err(self.fail(
                FailureReason::NetworkFailure(Phase::Submit),
                Error::Network {
                    phase: Phase::Submit,
                    source,
                },
            )),
        }
    }

    /// Run all three phases
    pub fn run<R, G, T>(
        &mut self,
        rng: &mut R,
        choice: Option<usize>,
        registrar: &G,
        tally: &T,
    ) -> Result<serde_json::Value, Error>
    where
        R: RngCore + ?Sized,
        G: Registrar + ?Sized,
        T: TallyService + ?Sized,
    {
        self.confirm(rng, choice)?;
        self.sign(rng, registrar)?;
        self.submit(tally)
    }

    /// Abandon the session. Only possible before preparation has started.
    pub fn cancel(&mut self) -> Result<(), Error> {
        if self.status != SessionStatus::Idle {
            return Err(Error::CancelNotPermitted(self.status));
        }
        self.transition(SessionStatus::Cancelled);
        Ok(())
    }

    /// Return an errored or cancelled session to `Idle`, discarding its proof, label and signature
    pub fn reset(&mut self) -> Result<(), Error> {
        match self.status {
            SessionStatus::Errored | SessionStatus::Cancelled => {
                self.clear();
                self.failure = None;
                self.transition(SessionStatus::Idle);
                Ok(())
            }
            found => Err(Error::InvalidState {
                phase: Phase::Prepare,
                expected: SessionStatus::Errored,
                found,
            }),
        }
    }

    /// The receipt to keep for a later re-vote, once the ballot has been accepted
    pub fn receipt(&self) -> Option<PriorBallot> {
        if self.status != SessionStatus::Completed {
            return None;
        }
        match (&self.label, &self.nonce) {
            (Some(label), Some(nonce)) => Some(PriorBallot {
                label: label.clone(),
                nonce: nonce.clone(),
            }),
            _ => None,
        }
    }

    fn expect_status(&self, phase: Phase, expected: SessionStatus) -> Result<(), Error> {
        if self.status != expected {
            return Err(Error::InvalidState {
                phase,
                expected,
                found: self.status,
            });
        }
        Ok(())
    }

    fn transition(&mut self, to: SessionStatus) {
        info!(
            "ballot session {}: {} -> {}",
            self.params.voting_id, self.status, to
        );
        self.status = to;
    }

    fn fail(&mut self, reason: FailureReason, error: Error) -> Error {
        warn!(
            "ballot session {}: {:?} while {}: {}",
            self.params.voting_id, reason, self.status, error
        );
        self.clear();
        self.failure = Some(reason);
        self.transition(SessionStatus::Errored);
        error
    }

    fn clear(&mut self) {
        self.proof = None;
        self.nonce = None;
        self.label = None;
        self.signature = None;
        self.submission = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use serde_json::json;

    struct Unreachable;

    impl Registrar for Unreachable {
        fn register(&self, _: &RegisterRequest) -> Result<RegisterResponse, NetworkError> {
            Err(NetworkError::Transport("connection refused".to_string()))
        }
    }

    fn params() -> ElectionParams {
        // 2^127 - 1 and 2^89 - 1
        let p = (BigUint::from(1u32) << 127usize) - BigUint::from(1u32);
        let q = (BigUint::from(1u32) << 89usize) - BigUint::from(1u32);
        ElectionParams {
            voting_id: "3".to_string(),
            base: 30,
            re_voting_multiplier: BigUint::from(3u32),
            challenge_bits: CHALLENGE_BITS,
            options_amount: 4,
            paillier: HomomorphicPublicKey::new(p.clone() * q.clone()).unwrap(),
            // Labels are 96 decimal digits, so the signing modulus needs more than 319 bits
            rsa: SigningPublicKey::new(p.clone() * p * q, BigUint::from(65537u32)).unwrap(),
        }
    }

    fn session() -> BallotSession {
        BallotSession::new(params(), json!({"id": 1}), None).unwrap()
    }

    #[test]
    fn test_confirm_requires_a_valid_choice() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let mut session = session();

        assert!(matches!(
            session.confirm(&mut rng, None),
            Err(Error::NoSelection)
        ));
        assert_eq!(session.status(), SessionStatus::Idle);

        assert!(matches!(
            session.confirm(&mut rng, Some(4)),
            Err(Error::InvalidOption(4))
        ));
        assert_eq!(session.status(), SessionStatus::Idle);

        session.confirm(&mut rng, Some(2)).unwrap();
        assert_eq!(session.status(), SessionStatus::Signing);
        let proof = session.proof().unwrap();
        proof
            .verify(&session.params().paillier, CHALLENGE_BITS)
            .unwrap();
    }

    #[test]
    fn test_phases_are_ordered() {
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        let mut session = session();

        assert!(matches!(
            session.sign(&mut rng, &Unreachable),
            Err(Error::InvalidState {
                phase: Phase::Sign,
                expected: SessionStatus::Signing,
                found: SessionStatus::Idle,
            })
        ));
        assert_eq!(session.status(), SessionStatus::Idle);
    }

    #[test]
    fn test_network_failure_while_signing() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let mut session = session();
        session.confirm(&mut rng, Some(0)).unwrap();

        let err = session.sign(&mut rng, &Unreachable).unwrap_err();
        assert!(matches!(
            err,
            Error::Network {
                phase: Phase::Sign,
                source: NetworkError::Transport(_),
            }
        ));
        assert_eq!(session.status(), SessionStatus::Errored);
        assert_eq!(
            session.failure(),
            Some(FailureReason::NetworkFailure(Phase::Sign))
        );
        assert!(session.proof().is_none());
        assert!(session.receipt().is_none());

        // No automatic retry: the caller resets and starts over
        assert!(session.confirm(&mut rng, Some(0)).is_err());
        session.reset().unwrap();
        assert_eq!(session.status(), SessionStatus::Idle);
        assert_eq!(session.failure(), None);
        session.confirm(&mut rng, Some(0)).unwrap();
    }

    #[test]
    fn test_cancel() {
        let mut rng = ChaCha20Rng::seed_from_u64(4);

        let mut session = session();
        session.cancel().unwrap();
        assert_eq!(session.status(), SessionStatus::Cancelled);
        assert!(session.confirm(&mut rng, Some(0)).is_err());

        let mut session = self::session();
        session.confirm(&mut rng, Some(1)).unwrap();
        assert!(matches!(
            session.cancel(),
            Err(Error::CancelNotPermitted(SessionStatus::Signing))
        ));
    }

    #[test]
    fn test_label_must_fit_signing_key() {
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        let mut params = params();
        params.rsa = SigningPublicKey::new(BigUint::from(3233u32), BigUint::from(17u32)).unwrap();

        let mut session = BallotSession::new(params, json!("alice"), None).unwrap();
        session.confirm(&mut rng, Some(0)).unwrap();
        assert!(matches!(
            session.sign(&mut rng, &Unreachable),
            Err(Error::LabelTooLarge)
        ));
        assert_eq!(session.failure(), Some(FailureReason::LabelTooLarge));
    }

    #[test]
    fn test_signing_without_proof_fails_in_sign_phase() {
        let mut rng = ChaCha20Rng::seed_from_u64(6);
        let mut session = session();
        session.status = SessionStatus::Signing;

        assert!(matches!(
            session.sign(&mut rng, &Unreachable),
            Err(Error::InvalidState {
                phase: Phase::Sign,
                ..
            })
        ));
        assert_eq!(session.status(), SessionStatus::Errored);
        assert_eq!(session.failure(), Some(FailureReason::LabelDerivation));
    }

    #[test]
    fn test_new_validates_params() {
        let mut params = params();
        params.options_amount = 0;
        assert!(BallotSession::new(params, json!(null), None).is_err());
    }
}
