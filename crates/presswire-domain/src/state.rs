//! Per-item state machine and stage labels

use serde::{Deserialize, Serialize};
use std::fmt;

/// State of a single pipeline run
///
/// Runs progress strictly forward:
/// `Start → Classified → Extracted → Generated → Routed → Complete`.
/// `Failed` is reachable from any non-terminal state and ends the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PipelineState {
    /// Nothing has run yet
    Start,

    /// Classification succeeded
    Classified,

    /// Metadata extraction succeeded
    Extracted,

    /// Headline generation succeeded
    Generated,

    /// The record was written to its bucket
    Routed,

    /// Run finished successfully
    Complete,

    /// Run aborted; no later stage executed
    Failed,
}

impl PipelineState {
    /// Get the state name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineState::Start => "START",
            PipelineState::Classified => "CLASSIFIED",
            PipelineState::Extracted => "EXTRACTED",
            PipelineState::Generated => "GENERATED",
            PipelineState::Routed => "ROUTED",
            PipelineState::Complete => "COMPLETE",
            PipelineState::Failed => "FAILED",
        }
    }

    /// The state reached when the current step succeeds
    pub fn next(&self) -> Option<Self> {
        match self {
            PipelineState::Start => Some(PipelineState::Classified),
            PipelineState::Classified => Some(PipelineState::Extracted),
            PipelineState::Extracted => Some(PipelineState::Generated),
            PipelineState::Generated => Some(PipelineState::Routed),
            PipelineState::Routed => Some(PipelineState::Complete),
            PipelineState::Complete | PipelineState::Failed => None,
        }
    }

    /// Whether the run has ended
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Complete | PipelineState::Failed)
    }

    /// The stage that runs from this state, if any
    pub fn pending_stage(&self) -> Option<Stage> {
        match self {
            PipelineState::Start => Some(Stage::Classify),
            PipelineState::Classified => Some(Stage::Extract),
            PipelineState::Extracted => Some(Stage::Generate),
            PipelineState::Generated => Some(Stage::Route),
            _ => None,
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the four ordered processing steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Assign a content type
    Classify,

    /// Pull structured metadata
    Extract,

    /// Write audience-specific headlines
    Generate,

    /// Persist the record to its bucket
    Route,
}

impl Stage {
    /// Label used in stage-transition log records
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Classify => "CLASSIFY",
            Stage::Extract => "EXTRACT",
            Stage::Generate => "GENERATE",
            Stage::Route => "ROUTE",
        }
    }

    /// State entered when this stage succeeds
    pub fn completes_into(&self) -> PipelineState {
        match self {
            Stage::Classify => PipelineState::Classified,
            Stage::Extract => PipelineState::Extracted,
            Stage::Generate => PipelineState::Generated,
            Stage::Route => PipelineState::Routed,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_progression() {
        assert_eq!(PipelineState::Start.next(), Some(PipelineState::Classified));
        assert_eq!(PipelineState::Classified.next(), Some(PipelineState::Extracted));
        assert_eq!(PipelineState::Extracted.next(), Some(PipelineState::Generated));
        assert_eq!(PipelineState::Generated.next(), Some(PipelineState::Routed));
        assert_eq!(PipelineState::Routed.next(), Some(PipelineState::Complete));
        assert_eq!(PipelineState::Complete.next(), None);
        assert_eq!(PipelineState::Failed.next(), None);
    }

    #[test]
    fn test_terminal_states() {
        assert!(PipelineState::Complete.is_terminal());
        assert!(PipelineState::Failed.is_terminal());
        assert!(!PipelineState::Generated.is_terminal());
    }

    #[test]
    fn test_stages_line_up_with_states() {
        let mut state = PipelineState::Start;
        let mut seen = Vec::new();
        while let Some(stage) = state.pending_stage() {
            assert_eq!(state.next(), Some(stage.completes_into()));
            seen.push(stage);
            state = stage.completes_into();
        }
        assert_eq!(seen, vec![Stage::Classify, Stage::Extract, Stage::Generate, Stage::Route]);
        assert_eq!(state, PipelineState::Routed);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Stage::Classify.to_string(), "CLASSIFY");
        assert_eq!(PipelineState::Failed.to_string(), "FAILED");
    }
}
