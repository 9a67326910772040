//! Anthropic provider implementation
//!
//! Calls the Messages API with a single user message per request.
//!
//! ## Security
//!
//! The API key is held as a [`SecretString`]: it never shows up in `Debug`
//! output and is only exposed when the request header is built.

use crate::{block_on, LlmError};
use presswire_domain::{GenerationRequest, LlmProvider};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable name for the Anthropic API key.
pub const ANTHROPIC_API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";

/// Default model
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic Messages API provider
pub struct AnthropicProvider {
    api_key: SecretString,
    base_url: String,
    model: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl std::fmt::Debug for AnthropicProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicProvider")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

impl AnthropicProvider {
    /// Create a new provider for the given key and model
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        let timeout = Duration::from_secs(60);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            api_key: SecretString::from(api_key.into()),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: model.into(),
            timeout,
            client,
        }
    }

    /// Create from an environment variable holding the key
    ///
    /// The variable's value is never logged.
    pub fn from_env(var: &str, model: impl Into<String>) -> Result<Self, LlmError> {
        let key = std::env::var(var)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                LlmError::NotConfigured(format!("API key not found: set the {} environment variable", var))
            })?;
        Ok(Self::new(key, model))
    }

    /// Set custom base URL
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Model used for every request
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one request to the Messages API
    pub async fn generate_async(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: request.max_output_tokens,
            temperature: request.temperature,
            messages: vec![Message {
                role: "user",
                content: &request.instructions,
            }],
        };

        let response = self
            .client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Communication(format!("Timeout after {:?}", self.timeout))
                } else {
                    LlmError::Communication(e.to_string())
                }
            })?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimitExceeded);
        }

        if !status.is_success() {
            let message = response
                .json::<ErrorResponse>()
                .await
                .map(|e| e.error.message)
                .unwrap_or_else(|e| format!("unreadable error body: {}", e));
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: MessagesResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        Ok(body.text())
    }
}

impl LlmProvider for AnthropicProvider {
    type Error = LlmError;

    fn generate(&self, request: &GenerationRequest) -> Result<String, Self::Error> {
        block_on(self.generate_async(request))?
    }

    fn name(&self) -> &str {
        "anthropic"
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

impl MessagesResponse {
    /// Concatenate every text block of the reply
    fn text(self) -> String {
        self.content
            .into_iter()
            .filter_map(|block| block.text)
            .collect::<Vec<_>>()
            .join("")
    }
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    #[allow(dead_code)] // Required for deserialization, not read directly
    type_: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}
