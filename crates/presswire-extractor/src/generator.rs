//! Stage 3: write headlines for three audiences

use crate::stage::{ask, RunContext, StageClient};
use crate::{PromptBuilder, StageConfig, StageError};
use presswire_domain::{Classification, ContentItem, GenerationRequest, HeadlineSet, LlmProvider, Metadata, Stage};
use presswire_gatekeeper::Gatekeeper;
use std::fmt::Display;
use std::sync::Arc;
use tracing::debug;

const REQUIRED_KEYS: [&str; 3] = ["neutral", "fan_oriented", "casual_viewer"];

/// Generates neutral, fan-oriented and casual-viewer headlines
pub struct Generator<L> {
    llm: Arc<L>,
    gatekeeper: Gatekeeper,
    config: StageConfig,
}

impl<L> Generator<L>
where
    L: LlmProvider,
    L::Error: Display,
{
    /// Create a generator sharing `llm` with the other stages
    pub fn new(llm: Arc<L>, gatekeeper: Gatekeeper, config: StageConfig) -> Self {
        Self {
            llm,
            gatekeeper,
            config,
        }
    }

    /// Generate headlines from the item and the earlier stages' outputs
    pub fn generate(
        &self,
        item: &ContentItem,
        classification: &Classification,
        metadata: &Metadata,
    ) -> Result<HeadlineSet, StageError> {
        let stage = Stage::Generate;
        let instructions = PromptBuilder::new(item.text()).generation(
            classification,
            metadata,
            self.config.headline_excerpt_chars,
            self.config.context_players_limit,
        );
        let request = GenerationRequest::new(
            instructions,
            self.config.generate_temperature,
            self.config.max_output_tokens,
        );

        let context = format!("headline generation for {}", item.id());
        let reply = ask(self.llm.as_ref(), stage, &request, &context)?;
        let object = self
            .gatekeeper
            .validate_keys(&reply, &REQUIRED_KEYS, "Headline generation result")
            .map_err(|source| StageError::Validation { stage, source })?;

        debug!(input_id = item.id(), stage = stage.label(), headline_count = 3, "Generated headlines");
        Ok(HeadlineSet::from_map(object))
    }
}

impl<L> StageClient for Generator<L>
where
    L: LlmProvider,
    L::Error: Display,
{
    type Output = HeadlineSet;

    fn stage(&self) -> Stage {
        Stage::Generate
    }

    fn run(&self, item: &ContentItem, context: &RunContext) -> Result<HeadlineSet, StageError> {
        let classification = context.require_classification(Stage::Generate)?;
        let metadata = context.require_metadata(Stage::Generate)?;
        self.generate(item, classification, metadata)
    }
}
