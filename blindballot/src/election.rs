use crate::*;
use num_bigint_dig::BigUint;
use num_traits::Zero;

/// Public parameters of a single election
///
/// This is the layout of the deployment's `crypto.json`. Secret halves of the keys
/// (`rsa.d`, `paillier.lambda`) may be present in the file and are ignored.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ElectionParams {
    /// Accepted as a JSON number or string
    #[serde(with = "voting_id")]
    pub voting_id: String,

    /// Bits separating consecutive vote variants
    pub base: u32,

    /// Factor the registrar applies to a blinded ballot it has already signed once
    #[serde(with = "serde_base64")]
    pub re_voting_multiplier: BigUint,

    #[serde(default = "default_challenge_bits")]
    pub challenge_bits: u32,

    /// Number of options on the ballot. Usually supplied by the ballot page rather than the file.
    #[serde(default)]
    pub options_amount: usize,

    pub paillier: HomomorphicPublicKey,

    pub rsa: SigningPublicKey,
}

fn default_challenge_bits() -> u32 {
    CHALLENGE_BITS
}

impl ElectionParams {
    /// Parse parameters from JSON
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate the parameters before a session may use them
    pub fn validate(&self) -> Result<(), Error> {
        if self.voting_id.is_empty() {
            return Err(Error::InvalidParameters("voting_id is empty".to_string()));
        }
        if self.base == 0 {
            return Err(Error::InvalidParameters("base must be positive".to_string()));
        }
        if self.challenge_bits == 0 || self.challenge_bits > 256 {
            return Err(Error::InvalidParameters(format!(
                "challenge_bits must be between 1 and 256, got {}",
                self.challenge_bits
            )));
        }
        if self.re_voting_multiplier.is_zero() {
            return Err(Error::InvalidParameters(
                "re_voting_multiplier must be non-zero".to_string(),
            ));
        }
        if self.options_amount == 0 {
            return Err(Error::InvalidParameters(
                "ballot must have at least one option".to_string(),
            ));
        }

        self.vote_variants()?;
        Ok(())
    }

    /// The valid plaintexts for this ballot, in option order
    pub fn vote_variants(&self) -> Result<VoteVariants, Error> {
        VoteVariants::generate(self.base, self.options_amount, &self.paillier)
    }
}

/// voting_id is a string in the client and an integer in the tally service.
pub(crate) mod voting_id {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &str, serializer: S) -> Result<S::Ok, S::Error> {
        match value.parse::<u64>() {
            Ok(numeric) => serializer.serialize_u64(numeric),
            Err(_) => serializer.serialize_str(value),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(s) => Ok(s),
            serde_json::Value::Number(n) => Ok(n.to_string()),
            other => Err(de::Error::custom(format!(
                "voting_id must be a string or number, got {}",
                other
            ))),
        }
    }
}
