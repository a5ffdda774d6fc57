use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::common::claims::numeric_date;
use crate::common::error::VerifyError;
use crate::common::token::{self, Algorithm};

/// Algorithm names a JWT library would recognise but which cannot be checked
/// with a shared secret.
const ASYMMETRIC_OR_NONE: &[&str] = &[
    "RS256", "RS384", "RS512", "PS256", "PS384", "PS512", "ES256", "ES384", "ES512", "EdDSA",
    "none",
];

/// Verifies an HMAC-signed token against `secret` and validates its `exp`
/// and `nbf` claims at `now`. Returns the claims on success.
pub fn verify_token(
    token: &str,
    secret: &[u8],
    now: DateTime<Utc>,
) -> Result<Map<String, Value>, VerifyError> {
    let [header_b64, claims_b64, signature_b64] = token::split(token).ok_or_else(|| {
        VerifyError::Malformed("token contains an invalid number of segments".to_string())
    })?;

    let header_bytes = token::decode_segment_strict(header_b64)
        .map_err(|e| malformed("could not base64 decode header", e))?;
    let header = token::parse_object(&header_bytes)
        .map_err(|e| malformed("could not JSON decode header", e))?;

    let claims_bytes = token::decode_segment_strict(claims_b64)
        .map_err(|e| malformed("could not base64 decode claim", e))?;
    let claims = token::parse_object(&claims_bytes)
        .map_err(|e| malformed("could not JSON decode claim", e))?;

    let alg = known_signing_method(&header)?;

    let signature = token::decode_segment_strict(signature_b64)
        .map_err(|e| malformed("could not base64 decode signature", e))?;

    let algorithm = hmac_method(alg)?;

    // Everything before the last dot is what was signed
    let signing_input = &token[..header_b64.len() + 1 + claims_b64.len()];
    let matches = algorithm
        .verify(secret, signing_input.as_bytes(), &signature)
        .map_err(|e| VerifyError::Unverifiable(format!("error while executing keyfunc: {}", e)))?;
    if !matches {
        return Err(VerifyError::SignatureInvalid);
    }

    validate_claims(claims, now)
}

fn malformed(step: &str, cause: impl std::fmt::Display) -> VerifyError {
    VerifyError::Malformed(format!("{}: {}", step, cause))
}

/// Looks up `alg` among the methods a JWT library knows. Unknown or missing
/// names fail here, before the signature segment is even decoded.
fn known_signing_method(header: &Map<String, Value>) -> Result<&str, VerifyError> {
    let alg = header.get("alg").and_then(Value::as_str).unwrap_or_default();
    if alg.parse::<Algorithm>().is_ok() || ASYMMETRIC_OR_NONE.contains(&alg) {
        Ok(alg)
    } else {
        Err(VerifyError::Unverifiable(
            "signing method (alg) is unavailable".to_string(),
        ))
    }
}

/// Only HMAC keys are available, so any other known method is rejected.
fn hmac_method(alg: &str) -> Result<Algorithm, VerifyError> {
    alg.parse::<Algorithm>().map_err(|_| {
        VerifyError::Unverifiable(format!(
            "error while executing keyfunc: unexpected signing method: {}",
            alg
        ))
    })
}

/// Checks `exp` and `nbf` with no leeway. An expired token wins over one
/// that is not yet valid, which wins over a claim of the wrong type.
fn validate_claims(
    claims: Map<String, Value>,
    now: DateTime<Utc>,
) -> Result<Map<String, Value>, VerifyError> {
    let now = now.timestamp();
    let mut invalid = None;

    let expired = match claims.get("exp").map(numeric_date) {
        Some(Some(exp)) => now >= exp,
        Some(None) => {
            invalid = Some("exp is invalid");
            false
        }
        None => false,
    };
    let not_yet_valid = match claims.get("nbf").map(numeric_date) {
        Some(Some(nbf)) => now < nbf,
        Some(None) => {
            invalid.get_or_insert("nbf is invalid");
            false
        }
        None => false,
    };

    if expired {
        return Err(VerifyError::Expired { claims });
    }
    if not_yet_valid {
        return Err(VerifyError::NotValidYet);
    }
    if let Some(reason) = invalid {
        return Err(VerifyError::InvalidClaims(reason.to_string()));
    }
    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils;
    use assert_matches::assert_matches;
    use serde_json::json;

    const SAMPLE: &str = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.\
        eyJzdWIiOiIxMjM0NTY3ODkwIiwibmFtZSI6IkpvaG4gRG9lIiwiaWF0IjoxNTE2MjM5MDIyfQ.\
        SflKxwRJSMeKKF2QT4fwpMeJf36POk6yJV_adQssw5c";

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn test_reference_token_verifies() {
        let claims = verify_token(SAMPLE, b"your-256-bit-secret", at(1_700_000_000)).unwrap();
        assert_eq!(claims.get("name"), Some(&json!("John Doe")));
    }

    #[test]
    fn test_wrong_secret() {
        let err = verify_token(SAMPLE, b"not-the-secret", at(0)).unwrap_err();
        assert_matches!(err, VerifyError::SignatureInvalid);
    }

    #[test]
    fn test_all_hmac_algorithms_round_trip() {
        for alg in Algorithm::ALL {
            let token = test_utils::sign(alg.as_str(), json!({ "sub": "alice" }), "k");
            let claims = verify_token(&token, b"k", at(0)).unwrap();
            assert_eq!(claims.get("sub"), Some(&json!("alice")));
        }
    }

    #[test]
    fn test_expiry_boundaries() {
        let token = test_utils::sign("HS256", json!({ "exp": 1000 }), "k");
        assert!(verify_token(&token, b"k", at(999)).is_ok());
        let err = verify_token(&token, b"k", at(1000)).unwrap_err();
        assert_matches!(err, VerifyError::Expired { ref claims } if claims.get("exp") == Some(&json!(1000)));
    }

    #[test]
    fn test_not_before() {
        let token = test_utils::sign("HS256", json!({ "nbf": 1000 }), "k");
        assert_matches!(verify_token(&token, b"k", at(999)), Err(VerifyError::NotValidYet));
        assert!(verify_token(&token, b"k", at(1000)).is_ok());
    }

    #[test]
    fn test_expired_takes_precedence() {
        let token = test_utils::sign("HS256", json!({ "exp": 10, "nbf": "soon" }), "k");
        assert_matches!(verify_token(&token, b"k", at(20)), Err(VerifyError::Expired { .. }));

        // both time claims fail at t=20
        let token = test_utils::sign("HS256", json!({ "exp": 10, "nbf": 30 }), "k");
        assert_matches!(verify_token(&token, b"k", at(20)), Err(VerifyError::Expired { .. }));

        let token = test_utils::sign("HS256", json!({ "exp": "later" }), "k");
        let err = verify_token(&token, b"k", at(20)).unwrap_err();
        assert_eq!(err.to_string(), "token has invalid claims: exp is invalid");
    }

    #[test]
    fn test_not_yet_valid_beats_invalid_claim_type() {
        let token = test_utils::sign("HS256", json!({ "exp": "x", "nbf": 30 }), "k");
        assert_matches!(verify_token(&token, b"k", at(20)), Err(VerifyError::NotValidYet));

        let token = test_utils::sign("HS256", json!({ "nbf": "soon" }), "k");
        let err = verify_token(&token, b"k", at(20)).unwrap_err();
        assert_matches!(err, VerifyError::InvalidClaims(ref reason) if reason == "nbf is invalid");
        assert_eq!(err.to_string(), "token has invalid claims: nbf is invalid");
    }

    #[test]
    fn test_signature_trailing_bits_are_ignored() {
        // last character changed from 'c' to 'd', which only flips bits
        // past the end of the 32-byte MAC
        let token = SAMPLE.replace("w5c", "w5d");
        assert!(token.ends_with("w5d"));
        let claims = verify_token(&token, b"your-256-bit-secret", at(1_700_000_000)).unwrap();
        assert_eq!(claims.get("sub"), Some(&json!("1234567890")));
    }

    #[test]
    fn test_malformed_tokens() {
        let err = verify_token("a.b", b"k", at(0)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "token is malformed: token contains an invalid number of segments"
        );
        assert_matches!(
            verify_token("e30=.e30.sig", b"k", at(0)),
            Err(VerifyError::Malformed(ref reason)) if reason.starts_with("could not base64 decode header: ")
        );

        let err = verify_token("e30.WzFd.sig", b"k", at(0)).unwrap_err();
        let text = err.to_string();
        assert!(text.starts_with("token is malformed: could not JSON decode claim: "));
        assert!(text.len() > "token is malformed: could not JSON decode claim: ".len());
    }

    #[test]
    fn test_bad_signature_encoding_is_malformed_before_method_check() {
        // {"alg":"RS256"} with an undecodable signature
        let err = verify_token("eyJhbGciOiJSUzI1NiJ9.e30.!!!", b"k", at(0)).unwrap_err();
        assert_matches!(
            err,
            VerifyError::Malformed(ref reason) if reason.starts_with("could not base64 decode signature: ")
        );
    }

    #[test]
    fn test_signing_method_checks() {
        // {"alg":"RS256"}
        let err = verify_token("eyJhbGciOiJSUzI1NiJ9.e30.c2ln", b"k", at(0)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "token is unverifiable: error while executing keyfunc: unexpected signing method: RS256"
        );
        // {}
        let err = verify_token("e30.e30.c2ln", b"k", at(0)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "token is unverifiable: signing method (alg) is unavailable"
        );
    }
}
