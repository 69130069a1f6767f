//! Off-chain JSON retrieval for metadata URIs.
//!
//! Failures are reported as [`JsonFetchError`]; callers that only enrich an on-chain
//! record with the document are expected to log the error and continue without it.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JsonFetchError {
    #[error("Invalid URI: {0}")]
    InvalidUri(String),
    #[error("Request failed: {0}")]
    Request(String),
    #[error("Request error (HTTP {status_code}): {error}")]
    Status { error: String, status_code: u16 },
    #[error("Invalid JSON: {0}")]
    Parse(String),
    #[error("Failed to create HTTP client: {0}")]
    Client(String),
}

#[async_trait]
#[cfg_attr(test, automock)]
pub trait JsonFetcherTrait: Send + Sync {
    async fn fetch_json(&self, uri: &str) -> Result<Value, JsonFetchError>;
}

#[derive(Debug, Clone)]
pub struct HttpJsonFetcher {
    client: Client,
}

impl HttpJsonFetcher {
    pub fn new(timeout_seconds: u64) -> Result<Self, JsonFetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| JsonFetchError::Client(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl JsonFetcherTrait for HttpJsonFetcher {
    async fn fetch_json(&self, uri: &str) -> Result<Value, JsonFetchError> {
        let url = reqwest::Url::parse(uri)
            .map_err(|e| JsonFetchError::InvalidUri(format!("{uri}: {e}")))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| JsonFetchError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status_code = response.status().as_u16();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(JsonFetchError::Status {
                error: error_text,
                status_code,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| JsonFetchError::Parse(e.to_string()))
    }
}
