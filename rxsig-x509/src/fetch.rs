// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! CRL retrieval.
//!
//! The revocation checker talks to distribution points through the
//! [`CrlFetcher`] trait so tests can inject canned responses;
//! [`HttpCrlFetcher`] is the production implementation.

use std::time::Duration;

use async_trait::async_trait;

#[derive(thiserror::Error, Debug)]
pub enum CrlFetchError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    #[error("empty response body")]
    EmptyBody,
}

/// Fetches the DER bytes of a CRL from one distribution point URI.
///
/// Every error variant is a soft failure to the caller: the next
/// distribution point is tried, never a revoked/invalid verdict.
#[async_trait]
pub trait CrlFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, CrlFetchError>;
}

/// HTTP(S) GET with a bounded per-request timeout. No authentication, no
/// retries; a timeout surfaces as a transport error like any other.
pub struct HttpCrlFetcher {
    client: reqwest::Client,
}

impl HttpCrlFetcher {
    pub fn new(timeout: Duration) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| format!("failed to build HTTP client: {e}"))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl CrlFetcher for HttpCrlFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, CrlFetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CrlFetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CrlFetchError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| CrlFetchError::Transport(e.to_string()))?;
        if body.is_empty() {
            return Err(CrlFetchError::EmptyBody);
        }
        Ok(body.to_vec())
    }
}
