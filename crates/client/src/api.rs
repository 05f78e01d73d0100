//! REST client for the Beauty Generation HTTP endpoints.
//!
//! Wraps job submission (`/api/generate`, `/api/generate/random`,
//! `/api/generate/custom`), status checks, preset listing, and image
//! download using [`reqwest`].  Every request carries the caller's API
//! key in the `X-API-Key` header; there is no built-in key.

use std::collections::BTreeMap;
use std::time::Duration;

use beautygen_core::decode;
use beautygen_core::request::{GenerationMode, GenerationRequest};

use crate::error::ClientError;
use crate::job::GenerationJob;
use crate::status::{StatusReport, SubmitResponse};

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for one Beauty Generation deployment.
pub struct GenerationApi {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GenerationApi {
    /// Create a new API client.
    ///
    /// * `base_url` - e.g. `https://gen1.example.org` (trailing slash tolerated).
    /// * `api_key`  - caller-supplied key; sent on every request.
    /// * `timeout`  - per-request timeout.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("beautygen/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, base_url, api_key))
    }

    /// Create an API client reusing an existing [`reqwest::Client`]
    /// (useful for connection pooling across batches).
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client,
            base_url,
            api_key: api_key.into(),
        }
    }

    /// Base HTTP URL this client targets.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Submit a generation request.
    ///
    /// Chooses the endpoint from the request mode (preset mode resolves
    /// to the standard endpoint with merged parameters) and returns the
    /// job with its server-assigned `prompt_id`.
    pub async fn submit(&self, request: &GenerationRequest) -> Result<GenerationJob, ClientError> {
        let body = request.body()?;
        let endpoint = match request.mode {
            GenerationMode::Standard | GenerationMode::Preset(_) => "/api/generate",
            GenerationMode::Random => "/api/generate/random",
            GenerationMode::Custom => "/api/generate/custom",
        };

        let response = self
            .client
            .post(format!("{}{}", self.base_url, endpoint))
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;
        if !status.is_success() {
            return Err(classify_http_error(status.as_u16(), &bytes));
        }

        let submit: SubmitResponse =
            decode::decode_json(&bytes).ok_or(ClientError::Decode)?;

        if !submit.success {
            return Err(ClientError::Api {
                status: status.as_u16(),
                body: submit.error.unwrap_or_else(|| "Unknown error".to_string()),
            });
        }
        let prompt_id = submit.prompt_id.filter(|id| !id.is_empty()).ok_or_else(|| {
            ClientError::Api {
                status: status.as_u16(),
                body: "Submission response carried no prompt_id".to_string(),
            }
        })?;

        tracing::info!(prompt_id = %prompt_id, endpoint, "Generation job submitted");

        Ok(GenerationJob {
            prompt_id,
            status: submit.status.unwrap_or_else(|| "queued".to_string()),
            message: None,
            prompt: submit.prompt,
            images: Vec::new(),
        })
    }

    /// Issue one status request for a job.
    ///
    /// Never fails: transport errors, non-2xx responses, undecodable
    /// bodies, and protection pages all degrade to a soft `error`
    /// report so the polling loop can apply its retry budget.
    pub async fn poll_status(&self, prompt_id: &str) -> StatusReport {
        let result = self
            .client
            .get(format!("{}/api/status/{}", self.base_url, prompt_id))
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(prompt_id, error = %e, "Status request failed");
                return StatusReport::soft_error(format!("Status request failed: {e}"));
            }
        };

        let status = response.status();
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(prompt_id, error = %e, "Failed to read status body");
                return StatusReport::soft_error(format!("Failed to read status body: {e}"));
            }
        };

        if !status.is_success() {
            if decode::looks_like_protection_page(&bytes) {
                return StatusReport::soft_error("Server protection detected");
            }
            return StatusReport::soft_error(format!("HTTP {}", status.as_u16()));
        }

        StatusReport::from_bytes(&bytes)
    }

    /// Fetch the map of parameter categories to allowed values.
    pub async fn get_presets(
        &self,
    ) -> Result<BTreeMap<String, serde_json::Value>, ClientError> {
        let response = self
            .client
            .get(format!("{}/api/presets", self.base_url))
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;
        if !status.is_success() {
            return Err(classify_http_error(status.as_u16(), &bytes));
        }

        decode::decode_json(&bytes).ok_or(ClientError::Decode)
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.client
    }

    pub(crate) fn api_key(&self) -> &str {
        &self.api_key
    }
}

/// Classify a non-2xx response by status code: 401 -> auth, 429 -> rate
/// limit, anything else -> generic API error with the decoded body.
pub(crate) fn classify_http_error(status: u16, body: &[u8]) -> ClientError {
    let text = decode::decode_text(body);
    let message = decode::decode_json::<serde_json::Value>(body)
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("error"))
                .and_then(|m| m.as_str().map(str::to_string))
        })
        .unwrap_or(text);

    match status {
        401 => ClientError::Auth(message),
        429 => ClientError::RateLimit(message),
        _ => ClientError::Api {
            status,
            body: message,
        },
    }
}
