use serde_json::{Map, Value};
use thiserror::Error;

/// Failures while decoding a token without checking its signature.
///
/// The `Display` text is returned verbatim in the `error` field of
/// `/api/decode` responses.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Invalid JWT format. Expected 3 parts separated by dots.")]
    InvalidFormat,
    #[error("Failed to decode header: {0}")]
    HeaderEncoding(base64::DecodeError),
    #[error("Failed to parse header JSON: {0}")]
    HeaderJson(serde_json::Error),
    #[error("Failed to decode payload: {0}")]
    PayloadEncoding(base64::DecodeError),
    #[error("Failed to parse payload JSON: {0}")]
    PayloadJson(serde_json::Error),
}

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("Unsupported algorithm: {0}. Supported: HS256, HS384, HS512")]
    UnsupportedAlgorithm(String),
    #[error("Failed to sign token: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Failed to sign token: invalid key length")]
    InvalidKey,
}

/// Why a token failed verification.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// Carries the failing step and, when there is one, the underlying
    /// decoder error, e.g. `could not JSON decode claim: expected value`.
    #[error("token is malformed: {0}")]
    Malformed(String),
    #[error("token is unverifiable: {0}")]
    Unverifiable(String),
    #[error("token signature is invalid: signature is invalid")]
    SignatureInvalid,
    /// The signature checked out but `exp` has passed. The claims are kept
    /// so callers can still show them.
    #[error("token has invalid claims: token is expired")]
    Expired { claims: Map<String, Value> },
    #[error("token has invalid claims: token is not valid yet")]
    NotValidYet,
    #[error("token has invalid claims: {0}")]
    InvalidClaims(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid PORT value {0:?}")]
    InvalidPort(String),
    #[error("invalid HOST value {0:?}")]
    InvalidHost(String),
    #[error("invalid APP_MODE value {0:?}, expected \"debug\" or \"release\"")]
    InvalidMode(String),
}
