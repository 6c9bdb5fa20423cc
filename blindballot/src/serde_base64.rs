//! `#[serde(with = "serde_base64")]` helpers for big integers in the base64(decimal) wire format.
use crate::codec::{base64_to_bigint, bigint_to_base64};
use num_bigint_dig::BigUint;
use serde::{de, Deserialize, Deserializer, Serializer};

pub fn serialize<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&bigint_to_base64(value))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigUint, D::Error> {
    let encoded = String::deserialize(deserializer)?;
    base64_to_bigint(&encoded).map_err(de::Error::custom)
}

/// For `Vec<BigUint>` fields, encoded as an ordered array of strings
pub mod vec {
    use super::*;
    use serde::ser::SerializeSeq;

    pub fn serialize<S: Serializer>(values: &[BigUint], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(values.len()))?;
        for value in values {
            seq.serialize_element(&bigint_to_base64(value))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<BigUint>, D::Error> {
        let encoded = Vec::<String>::deserialize(deserializer)?;
        encoded
            .iter()
            .map(|e| base64_to_bigint(e).map_err(de::Error::custom))
            .collect()
    }
}

/// For `Option<BigUint>` fields. An empty string reads as `None`.
pub mod option {
    use super::*;

    pub fn serialize<S: Serializer>(
        value: &Option<BigUint>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => serializer.serialize_some(&bigint_to_base64(value)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<BigUint>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(encoded) if !encoded.is_empty() => base64_to_bigint(&encoded)
                .map(Some)
                .map_err(de::Error::custom),
            _ => Ok(None),
        }
    }
}
