use std::fmt;
use std::str::FromStr;

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, URL_SAFE_NO_PAD};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use hmac::digest::{InvalidLength, KeyInit};
use hmac::{Hmac, Mac};
use serde_json::{Map, Value};
use sha2::{Sha256, Sha384, Sha512};

/// Base64url that accepts segments with or without `=` padding and ignores
/// non-zero trailing bits. Pasted tokens are often sloppy about both.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Base64url without padding, as JWT segments are written. Trailing bits
/// are ignored like the other decoders in the JWT ecosystem do.
const UNPADDED: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::RequireNone)
        .with_decode_allow_trailing_bits(true),
);

/// HMAC signing algorithms this service can produce and check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Algorithm {
    HS256,
    HS384,
    HS512,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::HS256 => "HS256",
            Algorithm::HS384 => "HS384",
            Algorithm::HS512 => "HS512",
        }
    }

    /// Digest output size in bytes.
    pub fn output_len(&self) -> usize {
        match self {
            Algorithm::HS256 => 32,
            Algorithm::HS384 => 48,
            Algorithm::HS512 => 64,
        }
    }

    pub fn sign(&self, key: &[u8], message: &[u8]) -> Result<Vec<u8>, InvalidLength> {
        Ok(match self {
            Algorithm::HS256 => keyed::<Hmac<Sha256>>(key, message)?.finalize().into_bytes().to_vec(),
            Algorithm::HS384 => keyed::<Hmac<Sha384>>(key, message)?.finalize().into_bytes().to_vec(),
            Algorithm::HS512 => keyed::<Hmac<Sha512>>(key, message)?.finalize().into_bytes().to_vec(),
        })
    }

    /// Constant-time comparison of `signature` against the MAC of `message`.
    pub fn verify(&self, key: &[u8], message: &[u8], signature: &[u8]) -> Result<bool, InvalidLength> {
        Ok(match self {
            Algorithm::HS256 => keyed::<Hmac<Sha256>>(key, message)?.verify_slice(signature).is_ok(),
            Algorithm::HS384 => keyed::<Hmac<Sha384>>(key, message)?.verify_slice(signature).is_ok(),
            Algorithm::HS512 => keyed::<Hmac<Sha512>>(key, message)?.verify_slice(signature).is_ok(),
        })
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|alg| alg.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn keyed<M: Mac + KeyInit>(key: &[u8], message: &[u8]) -> Result<M, InvalidLength> {
    let mut mac = <M as KeyInit>::new_from_slice(key)?;
    mac.update(message);
    Ok(mac)
}

/// Splits a compact token into header, payload and signature segments.
pub fn split(token: &str) -> Option<[&str; 3]> {
    let mut parts = token.split('.');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(header), Some(payload), Some(signature), None) => Some([header, payload, signature]),
        _ => None,
    }
}

pub fn decode_segment_lenient(segment: &str) -> Result<Vec<u8>, base64::DecodeError> {
    LENIENT.decode(segment)
}

pub fn decode_segment_strict(segment: &str) -> Result<Vec<u8>, base64::DecodeError> {
    UNPADDED.decode(segment)
}

pub fn encode_segment(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Parses a JSON document that must be an object.
pub fn parse_object(bytes: &[u8]) -> Result<Map<String, Value>, serde_json::Error> {
    serde_json::from_slice(bytes)
}
