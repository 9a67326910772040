//! Trait definitions for external interactions
//!
//! These traits define the boundaries between pipeline logic and
//! infrastructure. Implementations live in other crates.

use crate::RoutedRecord;
use serde::{Deserialize, Serialize};

/// One call to the text-generation collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Full instruction text, including the content being processed
    pub instructions: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Upper bound on reply length
    pub max_output_tokens: u32,
}

impl GenerationRequest {
    /// Create a request
    pub fn new(instructions: impl Into<String>, temperature: f32, max_output_tokens: u32) -> Self {
        Self {
            instructions: instructions.into(),
            temperature,
            max_output_tokens,
        }
    }
}

/// Trait for text-generation providers
///
/// Implemented by the infrastructure layer (presswire-llm). Calls block until
/// the reply arrives; timeouts are the implementation's concern.
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Send instructions, receive the reply text
    fn generate(&self, request: &GenerationRequest) -> Result<String, Self::Error>;

    /// Provider name for logs
    fn name(&self) -> &str;
}

/// Trait for persisting routed records
///
/// Implemented by the infrastructure layer (presswire-store).
pub trait RecordSink {
    /// Error type for store operations
    type Error;

    /// Write a record into a bucket under the given name, returning its location
    fn write(&self, bucket: &str, name: &str, record: &RoutedRecord) -> Result<String, Self::Error>;

    /// Number of records currently stored in a bucket
    fn count(&self, bucket: &str) -> Result<usize, Self::Error>;
}
