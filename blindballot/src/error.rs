use crate::*;

use thiserror::Error;

/// Error types
#[derive(Debug, Error)]
pub enum Error {
    #[error("blindballot: no modular inverse - arguments are not coprime")]
    NoInverse,

    #[error("blindballot: true message is not one of the valid messages")]
    InvalidWitness,

    #[error("blindballot: proof rejected - challenge does not match sum of e_vec")]
    ChallengeMismatch,

    #[error("blindballot: proof rejected - equation {0} does not hold")]
    EquationMismatch(usize),

    #[error("blindballot: proof rejected - vectors do not match the number of valid messages")]
    MalformedProof,

    #[error("blindballot: blind signature does not verify against the ballot label")]
    SignatureInvalid,

    #[error("blindballot: {phase}: network failure: {source}")]
    Network {
        phase: Phase,
        #[source]
        source: NetworkError,
    },

    #[error("blindballot: no option selected")]
    NoSelection,

    #[error("blindballot: option {0} does not exist on this ballot")]
    InvalidOption(usize),

    #[error("blindballot: {phase}: session is {found}, expected {expected}")]
    InvalidState {
        phase: Phase,
        expected: SessionStatus,
        found: SessionStatus,
    },

    #[error("blindballot: session can only be cancelled before preparation starts (session is {0})")]
    CancelNotPermitted(SessionStatus),

    #[error("blindballot: invalid public key: {0}")]
    InvalidPublicKey(&'static str),

    #[error("blindballot: invalid election parameters: {0}")]
    InvalidParameters(String),

    #[error("blindballot: ballot label does not fit below the signing modulus")]
    LabelTooLarge,

    #[error("blindballot: invalid base64: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    #[error("blindballot: invalid decimal integer")]
    DecimalDecode,

    #[error("blindballot: JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures at the registrar and tally boundaries
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("server responded with HTTP {0}")]
    Status(u16),

    #[error("server rejected the request: {0}")]
    Rejected(String),

    #[error("malformed server response: {0}")]
    Decode(String),
}

/// The protocol phase an error was raised in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Prepare,
    Sign,
    Submit,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            Phase::Prepare => "prepare",
            Phase::Sign => "sign",
            Phase::Submit => "submit",
        };
        write!(f, "{}", name)
    }
}
