use chrono::{DateTime, Utc};
use tracing::debug;

use crate::common::claims::ClaimInfo;
use crate::common::decode::decode_token;
use crate::common::error::VerifyError;
use crate::common::signer::encode_token;
use crate::common::types::{
    DecodeResponse, EncodeRequest, EncodeResponse, VerifyRequest, VerifyResponse,
};
use crate::common::verify::verify_token;

pub type Clock = fn() -> DateTime<Utc>;

/// Turns decode/encode/verify results into API responses.
///
/// Failures never surface as `Err`; they are reported inside the response
/// body, which is what the browser UI renders.
#[derive(Clone, Copy, Debug)]
pub struct JwtService {
    clock: Clock,
}

impl Default for JwtService {
    fn default() -> Self {
        Self::new()
    }
}

impl JwtService {
    pub fn new() -> Self {
        Self { clock: Utc::now }
    }

    pub fn with_clock(clock: Clock) -> Self {
        Self { clock }
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    pub fn decode(&self, token: &str) -> DecodeResponse {
        match decode_token(token) {
            Ok(decoded) => {
                let claim_info = ClaimInfo::extract(&decoded.payload, self.now());
                DecodeResponse {
                    header: Some(decoded.header),
                    payload: Some(decoded.payload),
                    signature: decoded.signature,
                    claim_info: Some(claim_info),
                    error: None,
                }
            }
            Err(e) => {
                debug!(error = %e, "decode failed");
                DecodeResponse {
                    error: Some(e.to_string()),
                    ..Default::default()
                }
            }
        }
    }

    pub fn encode(&self, request: &EncodeRequest) -> EncodeResponse {
        match encode_token(
            &request.header,
            &request.payload,
            request.secret.as_bytes(),
            &request.algorithm,
        ) {
            Ok(token) => EncodeResponse {
                token: Some(token),
                error: None,
            },
            Err(e) => {
                debug!(error = %e, "encode failed");
                EncodeResponse {
                    token: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    pub fn verify(&self, request: &VerifyRequest) -> VerifyResponse {
        let now = self.now();
        let mut response = match verify_token(&request.token, request.secret.as_bytes(), now) {
            Ok(claims) => {
                let expired = ClaimInfo::extract(&claims, now).is_expired;
                VerifyResponse {
                    valid: true,
                    message: if expired {
                        "Token signature is valid but token is expired"
                    } else {
                        "Token is valid"
                    }
                    .to_string(),
                    claims: Some(claims),
                    ..Default::default()
                }
            }
            Err(e) => {
                debug!(error = %e, "verification failed");
                rejected(e)
            }
        };

        response.claim_info = response
            .claims
            .as_ref()
            .map(|claims| ClaimInfo::extract(claims, now));
        response
    }
}

fn rejected(err: VerifyError) -> VerifyResponse {
    let (message, claims, error) = match err {
        VerifyError::Expired { claims } => ("Token is expired", Some(claims), None),
        VerifyError::NotValidYet => ("Token is not valid yet (nbf claim)", None, None),
        VerifyError::SignatureInvalid => ("Signature verification failed", None, None),
        e @ VerifyError::Malformed(_) => ("Token is malformed", None, Some(e.to_string())),
        e => ("Token validation failed", None, Some(e.to_string())),
    };
    VerifyResponse {
        valid: false,
        message: message.to_string(),
        claims,
        claim_info: None,
        error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{self, fixed_now};
    use chrono::Duration;
    use serde_json::{json, Map};

    fn service() -> JwtService {
        JwtService::with_clock(fixed_now)
    }

    fn verify(token: String, secret: &str) -> VerifyResponse {
        service().verify(&VerifyRequest {
            token,
            secret: secret.to_string(),
        })
    }

    #[test]
    fn test_decode_success_includes_claim_info() {
        let token = test_utils::create_session_token("alice", fixed_now(), Duration::hours(1), "k");
        let response = service().decode(&token);

        assert_eq!(response.error, None);
        assert_eq!(response.header.unwrap().get("alg"), Some(&json!("HS256")));
        let info = response.claim_info.unwrap();
        assert_eq!(info.sub.as_deref(), Some("alice"));
        assert!(!info.is_expired);
    }

    #[test]
    fn test_decode_failure_shape() {
        let response = service().decode("garbage");
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "header": null,
                "payload": null,
                "signature": "",
                "error": "Invalid JWT format. Expected 3 parts separated by dots."
            })
        );
    }

    #[test]
    fn test_encode_then_verify() {
        let encoded = service().encode(&EncodeRequest {
            header: Map::new(),
            payload: test_utils::as_object(json!({ "sub": "bob" })),
            secret: "s3cret".to_string(),
            algorithm: "HS384".to_string(),
        });
        let response = verify(encoded.token.unwrap(), "s3cret");

        assert!(response.valid);
        assert_eq!(response.message, "Token is valid");
        assert_eq!(response.claim_info.unwrap().sub.as_deref(), Some("bob"));
        assert_eq!(response.error, None);
    }

    #[test]
    fn test_encode_error() {
        let response = service().encode(&EncodeRequest {
            header: Map::new(),
            payload: Map::new(),
            secret: "s".to_string(),
            algorithm: "ES256".to_string(),
        });
        assert_eq!(response.token, None);
        assert_eq!(
            response.error.as_deref(),
            Some("Unsupported algorithm: ES256. Supported: HS256, HS384, HS512")
        );
    }

    #[test]
    fn test_expired_token_keeps_claims() {
        let token = test_utils::create_session_token("alice", fixed_now(), Duration::hours(-1), "k");
        let response = verify(token, "k");

        assert!(!response.valid);
        assert_eq!(response.message, "Token is expired");
        assert!(response.claims.is_some());
        assert!(response.claim_info.unwrap().is_expired);
        assert_eq!(response.error, None);
    }

    #[test]
    fn test_not_yet_valid_token() {
        let nbf = fixed_now().timestamp() + 60;
        let response = verify(test_utils::sign("HS256", json!({ "nbf": nbf }), "k"), "k");

        assert!(!response.valid);
        assert_eq!(response.message, "Token is not valid yet (nbf claim)");
        assert_eq!(response.claims, None);
        assert_eq!(response.claim_info, None);
    }

    #[test]
    fn test_bad_signature_and_malformed() {
        let token = test_utils::sign("HS256", json!({ "sub": "x" }), "k");
        let response = verify(token, "wrong");
        assert_eq!(response.message, "Signature verification failed");
        assert_eq!(response.error, None);

        let response = verify("a.b".to_string(), "k");
        assert_eq!(response.message, "Token is malformed");
        assert_eq!(
            response.error.as_deref(),
            Some("token is malformed: token contains an invalid number of segments")
        );
    }

    #[test]
    fn test_other_failures_report_error() {
        // {"alg":"none"}
        let response = verify("eyJhbGciOiJub25lIn0.e30.".to_string(), "k");
        assert_eq!(response.message, "Token validation failed");
        assert!(response.error.unwrap().contains("unexpected signing method: none"));
    }
}
