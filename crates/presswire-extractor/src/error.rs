//! Error types for the stage clients

use presswire_domain::{ErrorKind, Stage};
use presswire_gatekeeper::ValidationError;
use thiserror::Error;

/// No JSON value could be recovered from a reply
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Reply was empty or whitespace only
    #[error("Empty response received for {context}")]
    Empty {
        /// What the reply was for
        context: String,
    },

    /// Reply contains neither `{` nor `[`
    #[error("No JSON found in {context}. Response: {preview}")]
    NoJson {
        /// What the reply was for
        context: String,
        /// Start of the reply
        preview: String,
    },

    /// Closing delimiter missing or before the opener
    #[error("Malformed JSON in {context}. Response: {preview}")]
    Malformed {
        /// What the reply was for
        context: String,
        /// Start of the reply
        preview: String,
    },

    /// Best candidate span did not parse
    #[error("Failed to parse JSON from {context}. Response: {preview} Extracted: {candidate} Error: {reason}")]
    Invalid {
        /// What the reply was for
        context: String,
        /// Start of the reply
        preview: String,
        /// Start of the candidate span
        candidate: String,
        /// Underlying decoder message
        reason: String,
    },
}

/// Failure of a single stage client
#[derive(Error, Debug)]
pub enum StageError {
    /// Reply could not be turned into JSON
    #[error("{stage} failed: {source}")]
    Parse {
        /// Stage that failed
        stage: Stage,
        /// Parser error
        #[source]
        source: ParseError,
    },

    /// Reply parsed but has the wrong shape
    #[error("{stage} failed: {source}")]
    Validation {
        /// Stage that failed
        stage: Stage,
        /// Validation error
        #[source]
        source: ValidationError,
    },

    /// Collaborator call failed
    #[error("{stage} failed: LLM call failed: {message}")]
    Llm {
        /// Stage that failed
        stage: Stage,
        /// Provider error text
        message: String,
    },

    /// An earlier stage's output was not supplied
    #[error("{stage} failed: no {missing} available from an earlier stage")]
    MissingContext {
        /// Stage that failed
        stage: Stage,
        /// Name of the missing output
        missing: &'static str,
    },
}

impl StageError {
    /// Stage the error came from
    pub fn stage(&self) -> Stage {
        match self {
            StageError::Parse { stage, .. }
            | StageError::Validation { stage, .. }
            | StageError::Llm { stage, .. }
            | StageError::MissingContext { stage, .. } => *stage,
        }
    }

    /// Error category reported on the pipeline result
    pub fn kind(&self) -> ErrorKind {
        match self {
            StageError::Parse { .. } => ErrorKind::Parse,
            StageError::Validation { .. } | StageError::MissingContext { .. } => ErrorKind::Validation,
            StageError::Llm { .. } => ErrorKind::ExternalCall,
        }
    }
}
