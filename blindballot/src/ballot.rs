use crate::*;
use num_bigint_dig::BigUint;

/// Body of `POST /ballot/register`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RegisterRequest {
    pub voting_id: String,

    #[serde(with = "serde_base64")]
    pub blinded_ballot: BigUint,
}

/// Registrar's answer to a [`RegisterRequest`]
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct RegisterResponse {
    #[serde(default)]
    pub success: bool,

    #[serde(default, with = "serde_base64::option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<BigUint>,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RegisterResponse {
    /// Extract the blind signature, treating anything but an explicit success as a rejection
    pub fn into_signature(self) -> Result<BigUint, NetworkError> {
        match (self.success, self.signature) {
            (true, Some(signature)) => Ok(signature),
            (true, None) => Err(NetworkError::Decode(
                "registrar reported success without a signature".to_string(),
            )),
            (false, _) => Err(NetworkError::Rejected(
                self.error
                    .or(self.message)
                    .unwrap_or_else(|| "registrar refused to sign the ballot".to_string()),
            )),
        }
    }
}

/// Body of `POST /ballot/submit`
///
/// Constructed once per vote and never changed after it is sent.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BallotSubmission {
    #[serde(with = "crate::election::voting_id")]
    pub voting_id: String,

    #[serde(with = "serde_base64")]
    pub encrypted_ballot: BigUint,

    #[serde(with = "serde_base64::vec")]
    pub zkp_proof_e_vec: Vec<BigUint>,

    #[serde(with = "serde_base64::vec")]
    pub zkp_proof_z_vec: Vec<BigUint>,

    #[serde(with = "serde_base64::vec")]
    pub zkp_proof_a_vec: Vec<BigUint>,

    #[serde(with = "serde_base64")]
    pub signature: BigUint,

    #[serde(with = "serde_base64")]
    pub label: BigUint,

    /// Label of the ballot this one supersedes
    #[serde(default, with = "serde_base64::option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_label: Option<BigUint>,

    #[serde(default, with = "serde_base64::option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_nonce: Option<BigUint>,
}

impl BallotSubmission {
    pub fn new(
        voting_id: &str,
        proof: &CorrectMessageProof,
        signature: BigUint,
        label: BigUint,
        prior: Option<&PriorBallot>,
    ) -> Self {
        BallotSubmission {
            voting_id: voting_id.to_string(),
            encrypted_ballot: proof.ciphertext.clone(),
            zkp_proof_e_vec: proof.e_vec.clone(),
            zkp_proof_z_vec: proof.z_vec.clone(),
            zkp_proof_a_vec: proof.a_vec.clone(),
            signature,
            label,
            old_label: prior.map(|p| p.label.clone()),
            old_nonce: prior.map(|p| p.nonce.clone()),
        }
    }

    /// Verify the enclosed proof against the ballot's valid messages
    pub fn verify_proof(
        &self,
        pk: &HomomorphicPublicKey,
        valid_messages: &[BigUint],
        challenge_bits: u32,
    ) -> Result<(), Error> {
        verify(
            &self.zkp_proof_e_vec,
            &self.zkp_proof_z_vec,
            &self.zkp_proof_a_vec,
            &self.encrypted_ballot,
            valid_messages,
            pk,
            challenge_bits,
        )
    }
}

/// Receipt of a cast ballot, kept so that a later re-vote can supersede it
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PriorBallot {
    #[serde(with = "serde_base64")]
    pub label: BigUint,

    #[serde(with = "serde_base64")]
    pub nonce: BigUint,
}
