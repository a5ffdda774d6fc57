use serde_json::{Map, Value};

use crate::common::error::DecodeError;
use crate::common::token;

/// A token split into its parts. Nothing here has been verified.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedToken {
    pub header: Map<String, Value>,
    pub payload: Map<String, Value>,
    /// Base64url signature segment as it appeared in the token.
    pub signature: String,
}

/// Decodes a token without checking its signature.
pub fn decode_token(token: &str) -> Result<DecodedToken, DecodeError> {
    let [header, payload, signature] = token::split(token).ok_or(DecodeError::InvalidFormat)?;

    let header_bytes = token::decode_segment_lenient(header).map_err(DecodeError::HeaderEncoding)?;
    let header = token::parse_object(&header_bytes).map_err(DecodeError::HeaderJson)?;

    let payload_bytes = token::decode_segment_lenient(payload).map_err(DecodeError::PayloadEncoding)?;
    let payload = token::parse_object(&payload_bytes).map_err(DecodeError::PayloadJson)?;

    Ok(DecodedToken {
        header,
        payload,
        signature: signature.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    // The well-known example token from jwt.io, signed with "your-256-bit-secret".
    const SAMPLE: &str = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.\
        eyJzdWIiOiIxMjM0NTY3ODkwIiwibmFtZSI6IkpvaG4gRG9lIiwiaWF0IjoxNTE2MjM5MDIyfQ.\
        SflKxwRJSMeKKF2QT4fwpMeJf36POk6yJV_adQssw5c";

    #[test]
    fn test_decode_sample_token() {
        let decoded = decode_token(SAMPLE).unwrap();
        assert_eq!(Value::Object(decoded.header), json!({ "alg": "HS256", "typ": "JWT" }));
        assert_eq!(
            Value::Object(decoded.payload),
            json!({ "sub": "1234567890", "name": "John Doe", "iat": 1516239022 })
        );
        assert_eq!(decoded.signature, "SflKxwRJSMeKKF2QT4fwpMeJf36POk6yJV_adQssw5c");
    }

    #[test]
    fn test_decode_ignores_signature_contents() {
        let decoded = decode_token("e30.e30.not-a-real-signature!").unwrap();
        assert!(decoded.header.is_empty());
        assert_eq!(decoded.signature, "not-a-real-signature!");
    }

    #[test]
    fn test_decode_accepts_padded_segments() {
        let decoded = decode_token("e30=.eyJhIjoxfQ==.").unwrap();
        assert_eq!(decoded.payload.get("a"), Some(&json!(1)));
    }

    #[test]
    fn test_wrong_segment_count() {
        let err = decode_token("only.two").unwrap_err();
        assert_matches!(err, DecodeError::InvalidFormat);
        assert_eq!(err.to_string(), "Invalid JWT format. Expected 3 parts separated by dots.");
        assert_matches!(decode_token("a.b.c.d"), Err(DecodeError::InvalidFormat));
    }

    #[test]
    fn test_bad_header() {
        assert_matches!(decode_token("!!!.e30.sig"), Err(DecodeError::HeaderEncoding(_)));
        // "WzFd" is "[1]", valid JSON but not an object
        let err = decode_token("WzFd.e30.sig").unwrap_err();
        assert_matches!(err, DecodeError::HeaderJson(_));
        assert!(err.to_string().starts_with("Failed to parse header JSON: "));
    }

    #[test]
    fn test_bad_payload() {
        let err = decode_token("e30.***.sig").unwrap_err();
        assert_matches!(err, DecodeError::PayloadEncoding(_));
        assert!(err.to_string().starts_with("Failed to decode payload: "));
        // "bm9wZQ" is "nope"
        assert_matches!(decode_token("e30.bm9wZQ.sig"), Err(DecodeError::PayloadJson(_)));
    }
}
