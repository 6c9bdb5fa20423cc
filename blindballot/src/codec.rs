//! Text encodings for big integers.
//!
//! Two schemes coexist and are not interchangeable:
//!
//! - [`bigint_to_base64`] / [`base64_to_bigint`]: base64 over the ASCII decimal rendering.
//!   This is the wire format for every registrar and tally request, and the input to
//!   [`label_digest`](crate::label_digest).
//! - [`bigint_to_base64_bytes`] / [`base64_bytes_to_bigint`]: base64 over the big-endian
//!   magnitude bytes.
use crate::*;
use num_bigint_dig::BigUint;

/// Encode as base64 of the decimal string
pub fn bigint_to_base64(value: &BigUint) -> String {
    base64::encode(&value.to_str_radix(10))
}

/// Decode base64 of a decimal string. Missing `=` padding is tolerated.
pub fn base64_to_bigint(encoded: &str) -> Result<BigUint, Error> {
    let decoded = base64::decode(&pad(encoded.trim()))?;
    parse_decimal(&decoded)
}

/// Encode as base64 of the big-endian bytes. Zero encodes as a single zero byte.
pub fn bigint_to_base64_bytes(value: &BigUint) -> String {
    base64::encode(&value.to_bytes_be())
}

/// Decode base64 of big-endian bytes. Missing `=` padding is tolerated.
pub fn base64_bytes_to_bigint(encoded: &str) -> Result<BigUint, Error> {
    let decoded = base64::decode(&pad(encoded.trim()))?;
    Ok(BigUint::from_bytes_be(&decoded))
}

/// Parse ASCII decimal digits
pub fn parse_decimal(digits: &[u8]) -> Result<BigUint, Error> {
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return Err(Error::DecimalDecode);
    }
    BigUint::parse_bytes(digits, 10).ok_or(Error::DecimalDecode)
}

fn pad(encoded: &str) -> String {
    let mut padded = encoded.to_owned();
    while padded.len() % 4 != 0 {
        padded.push('=');
    }
    padded
}
