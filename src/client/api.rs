use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::common::types::{
    DecodeRequest, DecodeResponse, EncodeRequest, EncodeResponse, ErrorResponse, VerifyRequest,
    VerifyResponse,
};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {message}")]
    Status { status: StatusCode, message: String },
}

/// Talks to the `/api` endpoints of a running debugger.
#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        ApiClient { base_url, http }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn decode(&self, token: &str) -> Result<DecodeResponse, ClientError> {
        self.post("decode", &DecodeRequest {
            token: token.to_string(),
        })
        .await
    }

    pub async fn encode(
        &self,
        header: Map<String, Value>,
        payload: Map<String, Value>,
        secret: &str,
        algorithm: &str,
    ) -> Result<EncodeResponse, ClientError> {
        self.post("encode", &EncodeRequest {
            header,
            payload,
            secret: secret.to_string(),
            algorithm: algorithm.to_string(),
        })
        .await
    }

    pub async fn verify(&self, token: &str, secret: &str) -> Result<VerifyResponse, ClientError> {
        self.post("verify", &VerifyRequest {
            token: token.to_string(),
            secret: secret.to_string(),
        })
        .await
    }

    async fn post<B, R>(&self, endpoint: &str, body: &B) -> Result<R, ClientError>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let url = format!("{}/api/{}", self.base_url, endpoint);
        let response = self.http.post(&url).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await?;
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .map(|e| e.error)
                .unwrap_or(text);
            return Err(ClientError::Status { status, message });
        }

        Ok(response.json().await?)
    }
}
