//! Stage 1: assign a content type

use crate::stage::{ask, RunContext, StageClient};
use crate::{PromptBuilder, StageConfig, StageError};
use presswire_domain::{Classification, ContentItem, GenerationRequest, LlmProvider, Stage};
use presswire_gatekeeper::Gatekeeper;
use serde_json::Value;
use std::fmt::Display;
use std::sync::Arc;
use tracing::debug;

const REQUIRED_KEYS: [&str; 3] = ["content_type", "confidence", "reasoning"];

/// Classifies an item into one of the fixed content types
pub struct Classifier<L> {
    llm: Arc<L>,
    gatekeeper: Gatekeeper,
    config: StageConfig,
}

impl<L> Classifier<L>
where
    L: LlmProvider,
    L::Error: Display,
{
    /// Create a classifier sharing `llm` with the other stages
    pub fn new(llm: Arc<L>, gatekeeper: Gatekeeper, config: StageConfig) -> Self {
        Self {
            llm,
            gatekeeper,
            config,
        }
    }

    /// Classify one item
    pub fn classify(&self, item: &ContentItem) -> Result<Classification, StageError> {
        let stage = Stage::Classify;
        let request = GenerationRequest::new(
            PromptBuilder::new(item.text()).classification(),
            self.config.classify_temperature,
            self.config.max_output_tokens,
        );

        let reply = ask(
            self.llm.as_ref(),
            stage,
            &request,
            &format!("classification for {}", item.id()),
        )?;
        let classification = self
            .validate(&reply)
            .map_err(|source| StageError::Validation { stage, source })?;

        debug!(
            input_id = item.id(),
            stage = stage.label(),
            content_type = %classification.content_type,
            confidence = classification.confidence,
            "Classified item"
        );
        Ok(classification)
    }

    fn validate(&self, reply: &Value) -> Result<Classification, presswire_gatekeeper::ValidationError> {
        let object = self
            .gatekeeper
            .validate_keys(reply, &REQUIRED_KEYS, "Classification result")?;
        let content_type = self.gatekeeper.validate_content_type(object)?;
        let confidence = self.gatekeeper.validate_confidence(object)?;
        let reasoning = match object.get("reasoning") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        };

        Ok(Classification {
            content_type,
            confidence,
            reasoning,
        })
    }
}

impl<L> StageClient for Classifier<L>
where
    L: LlmProvider,
    L::Error: Display,
{
    type Output = Classification;

    fn stage(&self) -> Stage {
        Stage::Classify
    }

    fn run(&self, item: &ContentItem, _context: &RunContext) -> Result<Classification, StageError> {
        self.classify(item)
    }
}
