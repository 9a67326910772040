//! Presswire LLM Provider Layer
//!
//! Implementations of the `LlmProvider` trait from `presswire-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Scripted, deterministic provider for tests
//! - `AnthropicProvider`: Anthropic Messages API
//! - `OllamaProvider`: Local Ollama API integration
//!
//! The trait is blocking. The HTTP providers run their async client on a
//! short-lived current-thread runtime per call, so they must not be called
//! from inside another tokio runtime.
//!
//! # Examples
//!
//! ```
//! use presswire_llm::MockProvider;
//! use presswire_domain::{GenerationRequest, LlmProvider};
//!
//! let provider = MockProvider::new("Hello from LLM!");
//! let request = GenerationRequest::new("test prompt", 0.3, 100);
//! assert_eq!(provider.generate(&request).unwrap(), "Hello from LLM!");
//! ```

#![warn(missing_docs)]

pub mod anthropic;
pub mod ollama;

use presswire_domain::{GenerationRequest, LlmProvider};
use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

pub use anthropic::AnthropicProvider;
pub use ollama::OllamaProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// The API answered with an error status
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from the response body
        message: String,
    },

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Provider is missing credentials or settings
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// Run an async provider call to completion from the blocking trait
pub(crate) fn block_on<F: Future>(future: F) -> Result<F::Output, LlmError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| LlmError::Other(format!("Failed to start runtime: {}", e)))?;
    Ok(runtime.block_on(future))
}

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Error(String),
}

impl MockReply {
    fn into_result(self) -> Result<String, LlmError> {
        match self {
            MockReply::Text(text) => Ok(text),
            MockReply::Error(message) => Err(LlmError::Other(message)),
        }
    }
}

/// Mock LLM provider for deterministic testing
///
/// Replies are chosen in this order:
/// 1. the first rule whose pattern occurs in the instructions,
/// 2. the next queued reply,
/// 3. the default reply.
///
/// Every request is recorded so tests can inspect what was sent.
///
/// # Examples
///
/// ```
/// use presswire_llm::MockProvider;
/// use presswire_domain::{GenerationRequest, LlmProvider};
///
/// let provider = MockProvider::default();
/// provider.add_response("classify", r#"{"content_type": "other"}"#);
/// provider.push_response("first");
/// provider.push_response("second");
///
/// let ask = |text: &str| provider.generate(&GenerationRequest::new(text, 0.3, 100)).unwrap();
/// assert_eq!(ask("please classify this"), r#"{"content_type": "other"}"#);
/// assert_eq!(ask("anything"), "first");
/// assert_eq!(ask("anything"), "second");
/// assert_eq!(ask("anything"), "Default mock response");
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    rules: Arc<Mutex<Vec<(String, MockReply)>>>,
    queue: Arc<Mutex<VecDeque<MockReply>>>,
    requests: Arc<Mutex<Vec<GenerationRequest>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            rules: Arc::new(Mutex::new(Vec::new())),
            queue: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a provider that answers with the given replies in order
    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let provider = Self::default();
        for reply in replies {
            provider.push_response(reply);
        }
        provider
    }

    /// Reply with `response` whenever the instructions contain `pattern`
    pub fn add_response(&self, pattern: impl Into<String>, response: impl Into<String>) {
        lock(&self.rules).push((pattern.into(), MockReply::Text(response.into())));
    }

    /// Fail whenever the instructions contain `pattern`
    pub fn add_error(&self, pattern: impl Into<String>) {
        lock(&self.rules).push((pattern.into(), MockReply::Error("Mock error".to_string())));
    }

    /// Queue a reply for the next unmatched call
    pub fn push_response(&self, response: impl Into<String>) {
        lock(&self.queue).push_back(MockReply::Text(response.into()));
    }

    /// Queue a failure for the next unmatched call
    pub fn push_error(&self, message: impl Into<String>) {
        lock(&self.queue).push_back(MockReply::Error(message.into()));
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }

    /// All requests received so far
    pub fn requests(&self) -> Vec<GenerationRequest> {
        lock(&self.requests).clone()
    }

    /// Forget recorded requests
    pub fn reset_call_count(&self) {
        lock(&self.requests).clear();
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProvider for MockProvider {
    type Error = LlmError;

    fn generate(&self, request: &GenerationRequest) -> Result<String, Self::Error> {
        lock(&self.requests).push(request.clone());

        let matched = lock(&self.rules)
            .iter()
            .find(|(pattern, _)| request.instructions.contains(pattern.as_str()))
            .map(|(_, reply)| reply.clone());
        if let Some(reply) = matched {
            return reply.into_result();
        }

        if let Some(reply) = lock(&self.queue).pop_front() {
            return reply.into_result();
        }

        Ok(self.default_response.clone())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ask(provider: &MockProvider, text: &str) -> Result<String, LlmError> {
        provider.generate(&GenerationRequest::new(text, 0.3, 2000))
    }

    #[test]
    fn test_fixed_reply() {
        let provider = MockProvider::new(r#"{"content_type": "other"}"#);
        assert_eq!(ask(&provider, "classify this").unwrap(), r#"{"content_type": "other"}"#);
    }

    #[test]
    fn test_rules_take_priority_over_queue() {
        let provider = MockProvider::with_replies(["queued"]);
        provider.add_response("classifier", "classification reply");
        provider.add_response("headline", "headline reply");

        assert_eq!(ask(&provider, "You are a sports content classifier").unwrap(), "classification reply");
        assert_eq!(ask(&provider, "Write a headline").unwrap(), "headline reply");
        assert_eq!(ask(&provider, "Extract metadata").unwrap(), "queued");
        assert_eq!(ask(&provider, "Extract metadata").unwrap(), "Default mock response");
    }

    #[test]
    fn test_requests_are_recorded_in_order() {
        let provider = MockProvider::default();
        provider.generate(&GenerationRequest::new("classify", 0.3, 2000)).unwrap();
        provider.generate(&GenerationRequest::new("headlines", 0.7, 2000)).unwrap();

        let temperatures: Vec<f32> = provider.requests().iter().map(|r| r.temperature).collect();
        assert_eq!(temperatures, vec![0.3, 0.7]);
        assert_eq!(provider.call_count(), 2);

        provider.reset_call_count();
        assert!(provider.requests().is_empty());
    }

    #[test]
    fn test_injected_failures() {
        let provider = MockProvider::default();
        provider.add_error("EXPLODE");
        provider.push_error("service unavailable");

        assert!(matches!(ask(&provider, "EXPLODE now"), Err(LlmError::Other(_))));
        let err = ask(&provider, "fine").unwrap_err();
        assert!(err.to_string().contains("service unavailable"));
        assert!(ask(&provider, "fine").is_ok());
    }

    #[test]
    fn test_clones_share_script_and_history() {
        let scripted = MockProvider::default();
        let handle = scripted.clone();
        handle.push_response("from the handle");

        assert_eq!(ask(&scripted, "anything").unwrap(), "from the handle");
        assert_eq!(handle.call_count(), 1);
    }
}
