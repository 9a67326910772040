//! Provider selection from configuration.

use presswire_domain::{GenerationRequest, LlmProvider};
use presswire_llm::{AnthropicProvider, LlmError, MockProvider, OllamaProvider};
use presswire_pipeline::{LlmConfig, ProviderKind};
use serde_json::json;
use tracing::info;

/// The configured text-generation backend.
#[derive(Debug)]
pub enum Backend {
    /// Anthropic Messages API
    Anthropic(AnthropicProvider),
    /// Local Ollama server
    Ollama(OllamaProvider),
    /// Canned offline replies
    Mock(MockProvider),
}

impl Backend {
    /// Build the backend named in `config`.
    ///
    /// Fails when the Anthropic key variable is unset.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let backend = match config.provider {
            ProviderKind::Anthropic => {
                let mut provider = AnthropicProvider::from_env(&config.api_key_env, config.model.clone())?;
                if let Some(endpoint) = &config.endpoint {
                    provider = provider.with_base_url(endpoint.clone());
                }
                Backend::Anthropic(provider)
            }
            ProviderKind::Ollama => Backend::Ollama(match &config.endpoint {
                Some(endpoint) => OllamaProvider::new(endpoint.clone(), config.model.clone()),
                None => OllamaProvider::default_endpoint(config.model.clone()),
            }),
            ProviderKind::Mock => Backend::Mock(offline_provider()),
        };
        info!(provider = %config.provider, model = %config.model, "LLM backend ready");
        Ok(backend)
    }
}

impl LlmProvider for Backend {
    type Error = LlmError;

    fn generate(&self, request: &GenerationRequest) -> Result<String, Self::Error> {
        match self {
            Backend::Anthropic(provider) => provider.generate(request),
            Backend::Ollama(provider) => provider.generate(request),
            Backend::Mock(provider) => provider.generate(request),
        }
    }

    fn name(&self) -> &str {
        match self {
            Backend::Anthropic(provider) => provider.name(),
            Backend::Ollama(provider) => provider.name(),
            Backend::Mock(provider) => provider.name(),
        }
    }
}

/// Mock provider answering each stage prompt with a fixed, valid reply.
///
/// Every item comes out as a match report, which is enough to exercise
/// the whole pipeline and the file layout without network access.
pub fn offline_provider() -> MockProvider {
    let provider = MockProvider::new("{}");
    provider.add_response(
        "You are a sports content classifier",
        json!({
            "content_type": "match_report",
            "confidence": 0.9,
            "reasoning": "Offline reply"
        })
        .to_string(),
    );
    provider.add_response(
        "Extract structured metadata",
        format!(
            "```json\n{}\n```",
            json!({
                "teams": ["Manchester United", "Liverpool"],
                "players": ["Marcus Rashford", "Bruno Fernandes", "Mohamed Salah"],
                "competition": "Premier League",
                "sentiment": "positive",
                "key_stats": {"score": "2-1", "venue": "Old Trafford"}
            })
        ),
    );
    provider.add_response(
        "You are a sports headline writer",
        json!({
            "neutral": "Manchester United defeat Liverpool 2-1 at Old Trafford",
            "fan_oriented": "Red Devils edge rivals Liverpool in Old Trafford thriller",
            "casual_viewer": "Manchester United beat Liverpool 2-1 in Premier League clash"
        })
        .to_string(),
    );
    provider
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_backend_needs_no_credentials() {
        let config = LlmConfig {
            provider: ProviderKind::Mock,
            ..LlmConfig::default()
        };
        let backend = Backend::from_config(&config).unwrap();
        assert!(matches!(backend, Backend::Mock(_)));
    }

    #[test]
    fn test_anthropic_backend_requires_key() {
        let config = LlmConfig {
            provider: ProviderKind::Anthropic,
            api_key_env: "PRESSWIRE_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..LlmConfig::default()
        };
        let err = Backend::from_config(&config).unwrap_err();
        assert!(err.to_string().contains("PRESSWIRE_TEST_KEY_THAT_IS_NEVER_SET"));
    }

    #[test]
    fn test_ollama_backend_uses_endpoint() {
        let config = LlmConfig {
            provider: ProviderKind::Ollama,
            model: "llama3".to_string(),
            endpoint: Some("http://ollama.internal:11434/".to_string()),
            ..LlmConfig::default()
        };
        assert!(matches!(Backend::from_config(&config).unwrap(), Backend::Ollama(_)));
    }

    #[test]
    fn test_offline_provider_answers_each_stage() {
        let provider = offline_provider();
        let ask = |text: &str| provider.generate(&GenerationRequest::new(text, 0.3, 100)).unwrap();

        let classification: serde_json::Value =
            serde_json::from_str(&ask("You are a sports content classifier. ...")).unwrap();
        assert_eq!(classification["content_type"], "match_report");
        assert!(ask("Extract structured metadata from this sports content.").starts_with("```json"));
        assert!(ask("You are a sports headline writer").contains("fan_oriented"));
    }
}
