//! Presswire Domain Layer
//!
//! Core data model for the sports content pipeline. Every other crate in the
//! workspace depends on the types and trait boundaries defined here.
//!
//! ## Key Concepts
//!
//! - **ContentItem**: One raw article entering the pipeline
//! - **ContentType**: The fixed set of categories an item can be classified into
//! - **Classification / Metadata / HeadlineSet**: The structured output of each stage
//! - **RoutedRecord**: The durable record written to a bucket after a successful run
//! - **PipelineState**: The per-item state machine driven by the orchestrator
//!
//! ## Architecture
//!
//! - Pure data and state transitions only
//! - Collaborators (text generation, record persistence) are reached through
//!   the traits in [`traits`]; implementations live in other crates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod content;
pub mod content_type;
pub mod record;
pub mod result;
pub mod state;
pub mod traits;

// Re-exports for convenience
pub use content::{ContentInput, ContentItem};
pub use content_type::ContentType;
pub use record::{Classification, HeadlineSet, Metadata, RoutedRecord, RoutingStats, PIPELINE_VERSION};
pub use result::{ErrorKind, PipelineResult, PipelineStatus};
pub use state::{PipelineState, Stage};
pub use traits::{GenerationRequest, LlmProvider, RecordSink};
