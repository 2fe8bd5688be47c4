//! `GeminiClient`: the `GenerativeBackend` that talks to the Gemini REST API.
//!
//! One `POST {base_url}/{model}:generateContent` per request. There is no
//! retry, no streaming and, unless a timeout is configured, no deadline.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use ciphersync_contracts::{
    error::{CipherError, CipherResult},
    generation::{GenerationReply, GenerationRequest},
};
use ciphersync_core::traits::GenerativeBackend;

use crate::wire::{ErrorWrapper, GenerateContentRequest, GenerateContentResponse};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini HTTP backend.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    /// A client for the public endpoint with no request timeout.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// A client with an explicit endpoint and optional per-request timeout.
    pub fn with_options(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> CipherResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| CipherError::Config {
            reason: format!("failed to build HTTP client: {e}"),
        })?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// The `generateContent` URL for `model`, without the key.
    pub fn endpoint(&self, model: &str) -> String {
        format!("{}/{model}:generateContent", self.base_url)
    }
}

#[async_trait]
impl GenerativeBackend for GeminiClient {
    async fn generate(&self, request: GenerationRequest) -> CipherResult<GenerationReply> {
        let url = self.endpoint(&request.model);
        let body = GenerateContentRequest::from(&request);

        debug!(model = %request.model, turns = request.contents.len(), "sending generateContent");

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| CipherError::Transport {
                reason: format!("Gemini API request failed: {}", e.without_url()),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read Gemini error body".to_string());
            return Err(map_http_error(status, &body_text));
        }

        let parsed: GenerateContentResponse =
            response.json().await.map_err(|e| CipherError::Serialization {
                reason: format!("failed to decode Gemini response: {}", e.without_url()),
            })?;

        let text = parsed.first_text();
        debug!(model = %request.model, has_text = text.is_some(), "generateContent answered");
        Ok(GenerationReply { text })
    }
}

/// Turn a non-success response into `CipherError::Upstream`, preferring the
/// `STATUS: message` from Google's error envelope over the raw body.
pub(crate) fn map_http_error(status: StatusCode, body: &str) -> CipherError {
    let message = serde_json::from_str::<ErrorWrapper>(body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.to_string());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.to_string());

    CipherError::Upstream {
        status: status.as_u16(),
        message,
    }
}
