use std::collections::BTreeMap;

use rand::RngCore;
use serde_json::{Map, Value};

use crate::common::error::EncodeError;
use crate::common::token::{self, Algorithm};

/// Resolves the algorithm requested by a client. An empty name means HS256.
pub fn resolve_algorithm(name: &str) -> Result<Algorithm, EncodeError> {
    if name.is_empty() {
        return Ok(Algorithm::HS256);
    }
    name.parse().map_err(EncodeError::UnsupportedAlgorithm)
}

/// Builds and signs a compact token.
///
/// The header starts as `{"typ":"JWT","alg":...}`, the caller's fields are
/// laid over it, and `alg` is then forced back to `algorithm` so the header
/// always describes the signature that was actually produced.
pub fn encode_token(
    header: &Map<String, Value>,
    payload: &Map<String, Value>,
    secret: &[u8],
    algorithm: &str,
) -> Result<String, EncodeError> {
    let algorithm = resolve_algorithm(algorithm)?;

    // BTreeMap keeps top-level keys sorted whatever order `Map` preserves
    let mut full_header: BTreeMap<&str, &Value> = BTreeMap::new();
    let typ = Value::from("JWT");
    let alg = Value::from(algorithm.as_str());
    full_header.insert("typ", &typ);
    full_header.extend(header.iter().map(|(k, v)| (k.as_str(), v)));
    full_header.insert("alg", &alg);
    let payload: BTreeMap<&str, &Value> = payload.iter().map(|(k, v)| (k.as_str(), v)).collect();

    let signing_input = format!(
        "{}.{}",
        token::encode_segment(&serde_json::to_vec(&full_header)?),
        token::encode_segment(&serde_json::to_vec(&payload)?)
    );
    let signature = algorithm
        .sign(secret, signing_input.as_bytes())
        .map_err(|_| EncodeError::InvalidKey)?;

    Ok(format!("{}.{}", signing_input, token::encode_segment(&signature)))
}

/// Generates a random base64url secret as long as the algorithm's digest.
pub fn generate_secret<R: RngCore>(algorithm: Algorithm, rng: &mut R) -> String {
    let mut bytes = vec![0u8; algorithm.output_len()];
    rng.fill_bytes(&mut bytes);
    token::encode_segment(&bytes)
}
