use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::common::claims::ClaimInfo;

/// Returned with a 400 when a request body is unusable.
pub const INVALID_REQUEST: &str = "Invalid request format";

/// Request structure for `/api/decode`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DecodeRequest {
    pub token: String,
}

/// Request structure for `/api/encode`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EncodeRequest {
    pub header: Map<String, Value>,
    pub payload: Map<String, Value>,
    pub secret: String,
    /// HS256, HS384 or HS512. Empty means HS256.
    #[serde(default)]
    pub algorithm: String,
}

/// Request structure for `/api/verify`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VerifyRequest {
    pub token: String,
    pub secret: String,
}

impl DecodeRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        require(&self.token)
    }
}

impl EncodeRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        require(&self.secret)
    }
}

impl VerifyRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        require(&self.token)?;
        require(&self.secret)
    }
}

fn require(field: &str) -> Result<(), &'static str> {
    if field.is_empty() {
        Err(INVALID_REQUEST)
    } else {
        Ok(())
    }
}

/// Response structure for `/api/decode`.
///
/// On failure only `error` is meaningful; `header` and `payload` are null and
/// `signature` is empty.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DecodeResponse {
    pub header: Option<Map<String, Value>>,
    pub payload: Option<Map<String, Value>>,
    pub signature: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claim_info: Option<ClaimInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response structure for `/api/encode`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EncodeResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response structure for `/api/verify`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub valid: bool,
    pub message: String,
    pub claims: Option<Map<String, Value>>,
    pub claim_info: Option<ClaimInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn invalid_request() -> Self {
        ErrorResponse {
            error: INVALID_REQUEST.to_string(),
        }
    }
}
