//! Local Ollama server
//!
//! Calls `POST {endpoint}/api/generate` with streaming off. The request's
//! temperature and token limit travel as `options.temperature` and
//! `options.num_predict`. Transport failures, rate limiting and 5xx replies
//! are retried with exponential backoff; other failures return at once.
//!
//! ```no_run
//! use presswire_llm::OllamaProvider;
//!
//! let provider = OllamaProvider::new("http://localhost:11434", "llama3");
//! ```

use crate::{block_on, LlmError};
use presswire_domain::{GenerationRequest, LlmProvider};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Where a stock Ollama install listens
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Per-call HTTP timeout; local models can take a while on long prompts
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Attempts per call, the first one included
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Text generation through a local Ollama model
pub struct OllamaProvider {
    endpoint: String,
    model: String,
    client: reqwest::Client,
    max_retries: u32,
}

#[derive(Serialize)]
struct GenerateBody<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: ModelOptions,
}

#[derive(Serialize)]
struct ModelOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Deserialize)]
struct GenerateReply {
    response: String,
}

impl std::fmt::Debug for OllamaProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OllamaProvider")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl OllamaProvider {
    /// Provider for `model` served at `endpoint`; a trailing `/` is ignored
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            client,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Provider on [`DEFAULT_ENDPOINT`]
    pub fn default_endpoint(model: impl Into<String>) -> Self {
        Self::new(DEFAULT_ENDPOINT, model)
    }

    /// Attempts per call; at least one is always made
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Send one request, retrying transient failures
    ///
    /// An unknown model (404) is reported as [`LlmError::ModelNotAvailable`]
    /// without retrying.
    pub async fn generate_async(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        let url = format!("{}/api/generate", self.endpoint);
        let body = GenerateBody {
            model: &self.model,
            prompt: &request.instructions,
            stream: false,
            options: ModelOptions {
                temperature: request.temperature,
                num_predict: request.max_output_tokens,
            },
        };

        let mut attempt = 1;
        loop {
            match self.send(&url, &body).await {
                Ok(text) => {
                    debug!(model = %self.model, attempt, chars = text.len(), "Ollama reply received");
                    return Ok(text);
                }
                Err(e) if attempt < self.max_retries && is_transient(&e) => {
                    let delay = backoff(attempt);
                    warn!(attempt, ?delay, error = %e, "Ollama call failed, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn send(&self, url: &str, body: &GenerateBody<'_>) -> Result<String, LlmError> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request to {} failed: {}", url, e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LlmError::ModelNotAvailable(self.model.clone()));
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimitExceeded);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let reply: GenerateReply = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Unexpected Ollama reply: {}", e)))?;
        Ok(reply.response)
    }
}

/// 1s, 2s, 4s, ...
fn backoff(attempt: u32) -> Duration {
    Duration::from_secs(1u64 << attempt.saturating_sub(1).min(6))
}

fn is_transient(error: &LlmError) -> bool {
    match error {
        LlmError::Communication(_) | LlmError::RateLimitExceeded => true,
        LlmError::Api { status, .. } => *status >= 500,
        _ => false,
    }
}

impl LlmProvider for OllamaProvider {
    type Error = LlmError;

    fn generate(&self, request: &GenerationRequest) -> Result<String, Self::Error> {
        block_on(self.generate_async(request))?
    }

    fn name(&self) -> &str {
        "ollama"
    }
}
