//! The shared shape of the three collaborator-backed stages

use crate::error::StageError;
use crate::parser::extract_json_for;
use presswire_domain::{Classification, ContentItem, GenerationRequest, LlmProvider, Metadata, Stage};
use serde_json::Value;
use std::fmt::Display;

/// Outputs of earlier stages, visible read-only to later ones
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunContext {
    /// Set once classification succeeds
    pub classification: Option<Classification>,
    /// Set once extraction succeeds
    pub metadata: Option<Metadata>,
}

impl RunContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Classification, or a [`StageError::MissingContext`] for `stage`
    pub fn require_classification(&self, stage: Stage) -> Result<&Classification, StageError> {
        self.classification.as_ref().ok_or(StageError::MissingContext {
            stage,
            missing: "classification",
        })
    }

    /// Metadata, or a [`StageError::MissingContext`] for `stage`
    pub fn require_metadata(&self, stage: Stage) -> Result<&Metadata, StageError> {
        self.metadata.as_ref().ok_or(StageError::MissingContext {
            stage,
            missing: "metadata",
        })
    }
}

/// One stage that asks the collaborator and validates its reply
pub trait StageClient {
    /// Structured result of the stage
    type Output;

    /// Which stage this client implements
    fn stage(&self) -> Stage;

    /// Run the stage for one item
    fn run(&self, item: &ContentItem, context: &RunContext) -> Result<Self::Output, StageError>;
}

/// Send one request and parse the reply into JSON
pub(crate) fn ask<L>(
    llm: &L,
    stage: Stage,
    request: &GenerationRequest,
    context: &str,
) -> Result<Value, StageError>
where
    L: LlmProvider + ?Sized,
    L::Error: Display,
{
    let reply = llm.generate(request).map_err(|e| StageError::Llm {
        stage,
        message: e.to_string(),
    })?;

    extract_json_for(&reply, context).map_err(|source| StageError::Parse { stage, source })
}
