use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Map, Value};

use crate::common::signer::encode_token;

/// Signs `claims` with `secret` using the given HMAC algorithm name.
pub fn sign(algorithm: &str, claims: Value, secret: &str) -> String {
    let claims = as_object(claims);
    encode_token(&Map::new(), &claims, secret.as_bytes(), algorithm).unwrap()
}

/// A token for `sub` that expires `ttl` after `now`.
pub fn create_session_token(sub: &str, now: DateTime<Utc>, ttl: Duration, secret: &str) -> String {
    sign(
        "HS256",
        json!({
            "sub": sub,
            "iss": "jwt-debugger-tests",
            "iat": now.timestamp(),
            "exp": (now + ttl).timestamp(),
        }),
        secret,
    )
}

/// A fixed instant used by tests that need a deterministic clock.
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

pub fn as_object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {}", other),
    }
}
