//! Anthropic Count Tokens API client.
//!
//! Claude tokenizers are not published, so exact counts come from
//! `POST /v1/messages/count_tokens`. The client exposes a blocking
//! interface: each call drives the async request to completion on a
//! private current-thread runtime.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::runtime::Runtime;

use crate::config::AnthropicConfig;
use crate::error::{BenchError, Result};

/// Remote token counting endpoint
///
/// Implemented by [`AnthropicClient`]; tests substitute their own.
pub trait CountTokensApi: Send + Sync {
    /// Count the input tokens of `text` sent as a single user message to `model`
    fn count_tokens(&self, model: &str, text: &str) -> Result<usize>;
}

#[derive(Debug, Serialize)]
struct CountTokensRequest<'a> {
    model: &'a str,
    messages: [UserMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct UserMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct CountTokensResponse {
    input_tokens: u64,
}

/// Blocking client for the Anthropic Count Tokens API
pub struct AnthropicClient {
    http: Client,
    runtime: Runtime,
    endpoint: String,
    api_key: String,
    api_version: String,
}

impl AnthropicClient {
    /// Create a client for `config.base_url` authenticated with `api_key`
    pub fn new(config: &AnthropicConfig, api_key: impl Into<String>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| BenchError::Network(format!("Failed to create HTTP client: {e}")))?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        Ok(Self {
            http,
            runtime,
            endpoint: format!(
                "{}/v1/messages/count_tokens",
                config.base_url.trim_end_matches('/')
            ),
            api_key: api_key.into(),
            api_version: config.api_version.clone(),
        })
    }

    /// Full URL of the count_tokens endpoint
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn request(&self, model: &str, text: &str) -> Result<usize> {
        let body = CountTokensRequest {
            model,
            messages: [UserMessage {
                role: "user",
                content: text,
            }],
        };

        let response = self
            .http
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", &self.api_version)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BenchError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: CountTokensResponse = response
            .json()
            .await
            .map_err(|e| BenchError::MalformedResponse(e.to_string()))?;

        usize::try_from(parsed.input_tokens)
            .map_err(|e| BenchError::MalformedResponse(format!("input_tokens out of range: {e}")))
    }
}

impl CountTokensApi for AnthropicClient {
    fn count_tokens(&self, model: &str, text: &str) -> Result<usize> {
        self.runtime.block_on(self.request(model, text))
    }
}

impl std::fmt::Debug for AnthropicClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicClient")
            .field("endpoint", &self.endpoint)
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}
