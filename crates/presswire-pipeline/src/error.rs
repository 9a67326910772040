//! Error types for the pipeline

use presswire_domain::{ErrorKind, Stage};
use presswire_extractor::StageError;
use presswire_router::RouteError;
use thiserror::Error;

/// Why a single item's run was aborted
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Classification, extraction or generation failed
    #[error(transparent)]
    Stage(#[from] StageError),

    /// The record could not be written
    #[error(transparent)]
    Route(#[from] RouteError),
}

impl PipelineError {
    /// Error category reported on the pipeline result
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::Stage(e) => e.kind(),
            PipelineError::Route(e) => e.kind(),
        }
    }

    /// Stage that failed
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Stage(e) => e.stage(),
            PipelineError::Route(_) => Stage::Route,
        }
    }
}

/// Pipeline configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to write TOML
    #[error("Failed to serialize config TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// A section failed validation
    #[error("Invalid [{section}] configuration: {message}")]
    Invalid {
        /// Offending section
        section: &'static str,
        /// What is wrong
        message: String,
    },
}
