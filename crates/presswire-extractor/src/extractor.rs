//! Stage 2: pull structured metadata, shaped by content type

use crate::stage::{ask, RunContext, StageClient};
use crate::{PromptBuilder, StageConfig, StageError};
use presswire_domain::{ContentItem, ContentType, GenerationRequest, LlmProvider, Metadata, Stage};
use presswire_gatekeeper::Gatekeeper;
use std::fmt::Display;
use std::sync::Arc;
use tracing::debug;

/// Extracts metadata using the schema for the item's content type
///
/// Only the reply's top-level shape is checked. Missing outer keys fall back
/// to empty values and `key_stats` is kept as returned.
pub struct Extractor<L> {
    llm: Arc<L>,
    gatekeeper: Gatekeeper,
    config: StageConfig,
}

impl<L> Extractor<L>
where
    L: LlmProvider,
    L::Error: Display,
{
    /// Create an extractor sharing `llm` with the other stages
    pub fn new(llm: Arc<L>, gatekeeper: Gatekeeper, config: StageConfig) -> Self {
        Self {
            llm,
            gatekeeper,
            config,
        }
    }

    /// Extract metadata for an item already classified as `content_type`
    pub fn extract(&self, item: &ContentItem, content_type: ContentType) -> Result<Metadata, StageError> {
        let stage = Stage::Extract;
        let request = GenerationRequest::new(
            PromptBuilder::new(item.text()).extraction(content_type),
            self.config.extract_temperature,
            self.config.max_output_tokens,
        );

        let context = format!("metadata extraction for {}", item.id());
        let reply = ask(self.llm.as_ref(), stage, &request, &context)?;
        // Outer keys are optional, so only the mapping itself is required
        let object = self
            .gatekeeper
            .validate_keys(&reply, &[], "Metadata extraction result")
            .map_err(|source| StageError::Validation { stage, source })?;

        let metadata = Metadata::from_map(object);
        debug!(
            input_id = item.id(),
            stage = stage.label(),
            %content_type,
            teams_found = metadata.teams.len(),
            players_found = metadata.players.len(),
            competition = metadata.competition.as_deref().unwrap_or("N/A"),
            "Extracted metadata"
        );
        Ok(metadata)
    }
}

impl<L> StageClient for Extractor<L>
where
    L: LlmProvider,
    L::Error: Display,
{
    type Output = Metadata;

    fn stage(&self) -> Stage {
        Stage::Extract
    }

    fn run(&self, item: &ContentItem, context: &RunContext) -> Result<Metadata, StageError> {
        let classification = context.require_classification(Stage::Extract)?;
        self.extract(item, classification.content_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use presswire_domain::{Classification, ErrorKind};
    use presswire_llm::MockProvider;

    fn extractor(llm: &MockProvider) -> Extractor<MockProvider> {
        Extractor::new(Arc::new(llm.clone()), Gatekeeper::default_config(), StageConfig::default())
    }

    fn context(content_type: ContentType) -> RunContext {
        RunContext {
            classification: Some(Classification {
                content_type,
                confidence: 0.9,
                reasoning: String::new(),
            }),
            metadata: None,
        }
    }

    #[test]
    fn test_extract_match_report() {
        let llm = MockProvider::new(
            r#"{"teams": ["Manchester United", "Liverpool"], "players": ["Marcus Rashford"],
                "competition": "Premier League", "sentiment": "positive",
                "key_stats": {"score": "2-1", "goalscorers": ["Marcus Rashford"]}}"#,
        );
        let item = ContentItem::new("United beat Liverpool").with_id("item_1");
        let metadata = extractor(&llm)
            .run(&item, &context(ContentType::MatchReport))
            .unwrap();

        assert_eq!(metadata.teams, vec!["Manchester United", "Liverpool"]);
        assert_eq!(metadata.competition.as_deref(), Some("Premier League"));
        assert_eq!(metadata.key_stats["score"], "2-1");

        let request = &llm.requests()[0];
        assert_eq!(request.temperature, 0.3);
        assert!(request.instructions.contains("goalscorers"));
    }

    #[test]
    fn test_schema_follows_classification() {
        let llm = MockProvider::new("{}");
        let item = ContentItem::new("Chelsea sign striker");
        extractor(&llm).run(&item, &context(ContentType::TransferNews)).unwrap();
        assert!(llm.requests()[0].instructions.contains("transfer_fee"));
        assert!(!llm.requests()[0].instructions.contains("goalscorers"));
    }

    #[test]
    fn test_sparse_reply_falls_back_to_defaults() {
        let llm = MockProvider::new(r#"{"teams": null, "key_stats": {"unexpected": [1, 2]}}"#);
        let metadata = extractor(&llm)
            .extract(&ContentItem::new("x"), ContentType::Other)
            .unwrap();
        assert!(metadata.teams.is_empty());
        assert_eq!(metadata.competition, None);
        assert_eq!(metadata.sentiment, "neutral");
        assert_eq!(metadata.key_stats["unexpected"], serde_json::json!([1, 2]));
    }

    #[test]
    fn test_array_reply_is_validation_error() {
        let llm = MockProvider::new(r#"["Manchester United", "Liverpool"]"#);
        let err = extractor(&llm)
            .extract(&ContentItem::new("x"), ContentType::MatchReport)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.stage(), Stage::Extract);
    }

    #[test]
    fn test_run_requires_classification() {
        let llm = MockProvider::new("{}");
        let err = extractor(&llm)
            .run(&ContentItem::new("x"), &RunContext::new())
            .unwrap_err();
        assert!(matches!(err, StageError::MissingContext { missing: "classification", .. }));
        assert_eq!(llm.call_count(), 0);
    }
}
