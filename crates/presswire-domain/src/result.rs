//! Terminal per-item result

use crate::{Classification, HeadlineSet, Metadata, PipelineState, Stage};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Overall outcome of one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStatus {
    /// All four stages succeeded
    Success,

    /// A stage failed and the run was aborted
    Failed,
}

/// Failure classes reported for a failed item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Collaborator reply could not be recovered as JSON
    Parse,

    /// Parsed JSON lacked required keys or broke a constraint
    Validation,

    /// The collaborator call itself failed
    ExternalCall,

    /// Writing the routed record failed
    Io,
}

impl ErrorKind {
    /// Error class name as used in log details
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Parse => "ParseError",
            ErrorKind::Validation => "ValidationError",
            ErrorKind::ExternalCall => "ExternalCallError",
            ErrorKind::Io => "IOError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one pipeline run
///
/// One per submitted item. On failure the outputs of the stages that did
/// succeed are kept for diagnosis, but nothing was routed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineResult {
    /// Identifier of the processed item
    pub input_id: String,

    /// Success or failure
    pub status: PipelineStatus,

    /// Terminal state reached
    pub state: PipelineState,

    /// Stage 1 output, if it ran successfully
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<Classification>,

    /// Stage 2 output, if it ran successfully
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,

    /// Stage 3 output, if it ran successfully
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headlines: Option<HeadlineSet>,

    /// Where the record was written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,

    /// Human-readable error text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Failure class
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,

    /// Stage that failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_stage: Option<Stage>,
}

impl PipelineResult {
    /// Whether the run succeeded
    pub fn is_success(&self) -> bool {
        self.status == PipelineStatus::Success
    }
}
