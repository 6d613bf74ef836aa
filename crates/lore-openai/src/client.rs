// SPDX-FileCopyrightText: 2026 Lore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for OpenAI-compatible APIs.
//!
//! Provides [`OpenAiClient`], which handles authentication, JSON request
//! construction, and retry of transient errors (429, 500, 503).

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::types::ApiErrorResponse;

const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Failures talking to the API, before they are mapped into the
/// embedding or generation error taxonomy.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("API returned {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("failed to decode API response: {0}")]
    Decode(String),
}

impl ApiError {
    /// True for authentication failures (bad or revoked key).
    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::Status { status, .. } if *status == StatusCode::UNAUTHORIZED || *status == StatusCode::FORBIDDEN)
    }
}

/// HTTP client for one OpenAI-compatible endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
    max_retries: u32,
    retry_delay: Duration,
}

impl OpenAiClient {
    /// Creates a client authenticated with `api_key`.
    pub fn new(
        api_key: &str,
        base_url: &str,
        timeout: Duration,
        max_retries: u32,
    ) -> Result<Self, String> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| format!("invalid API key header value: {e}"))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| format!("failed to build HTTP client: {e}"))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            max_retries,
            retry_delay: DEFAULT_RETRY_DELAY,
        })
    }

    /// Shortens the delay between retries (for tests against wiremock).
    #[cfg(test)]
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POSTs `body` as JSON to `{base_url}{path}` and decodes the reply.
    ///
    /// On transient errors, retries up to `max_retries` times after a delay.
    pub async fn post_json<Req, Resp>(&self, path: &str, body: &Req) -> Result<Resp, ApiError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, path, "retrying request after transient error");
                tokio::time::sleep(self.retry_delay).await;
            }

            let response = self
                .client
                .post(&url)
                .json(body)
                .send()
                .await
                .map_err(|e| self.transport_error(e))?;

            let status = response.status();
            debug!(status = %status, attempt, path, "response received");

            if status.is_success() {
                let text = response.text().await.map_err(|e| self.transport_error(e))?;
                return serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()));
            }

            let text = response.text().await.unwrap_or_default();
            let error = ApiError::Status {
                status,
                message: error_message(&text),
            };

            if is_transient_error(status) && attempt < self.max_retries {
                warn!(status = %status, "transient error, will retry");
                last_error = Some(error);
                continue;
            }

            return Err(error);
        }

        Err(last_error.unwrap_or_else(|| ApiError::Decode("request failed after retries".into())))
    }

    /// `GET {base_url}/models`, used as a token-free reachability and
    /// credential check.
    pub async fn ping(&self) -> Result<(), ApiError> {
        let url = format!("{}/models", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let text = response.text().await.unwrap_or_default();
        Err(ApiError::Status {
            status,
            message: error_message(&text),
        })
    }

    fn transport_error(&self, e: reqwest::Error) -> ApiError {
        if e.is_timeout() {
            ApiError::Timeout(self.timeout)
        } else {
            ApiError::Transport(e)
        }
    }
}

/// Extracts the human-readable message from an error body.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(api_err) => match api_err.error.type_ {
            Some(kind) => format!("{} ({kind})", api_err.error.message),
            None => api_err.error.message,
        },
        Err(_) => body.to_string(),
    }
}

/// Returns true for HTTP status codes that indicate transient errors worth retrying.
fn is_transient_error(status: StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503)
}
