//! Presswire Extractor
//!
//! Turns collaborator replies into validated stage outputs.
//!
//! # Architecture
//!
//! ```text
//! ContentItem → Classifier → Extractor → Generator
//!                   │            │           │
//!                   └── LLM reply → parser → Gatekeeper ──┘
//! ```
//!
//! The three stage clients share one injected [`LlmProvider`] and implement
//! [`StageClient`], so the orchestrator drives them uniformly. Each client
//! builds its instructions with [`PromptBuilder`], recovers JSON from the
//! reply with [`extract_json_for`] and validates the shape with the
//! gatekeeper before returning a typed result.
//!
//! # Example Usage
//!
//! ```
//! use presswire_domain::{ContentItem, ContentType};
//! use presswire_extractor::{Classifier, StageConfig};
//! use presswire_gatekeeper::Gatekeeper;
//! use presswire_llm::MockProvider;
//! use std::sync::Arc;
//!
//! let llm = Arc::new(MockProvider::new(
//!     r#"{"content_type": "injury_update", "confidence": 0.9, "reasoning": "hamstring"}"#,
//! ));
//! let classifier = Classifier::new(llm, Gatekeeper::default_config(), StageConfig::default());
//!
//! let item = ContentItem::new("Star striker ruled out for six weeks");
//! let classification = classifier.classify(&item).unwrap();
//! assert_eq!(classification.content_type, ContentType::InjuryUpdate);
//! ```
//!
//! [`LlmProvider`]: presswire_domain::LlmProvider

#![warn(missing_docs)]

mod classifier;
mod config;
mod error;
mod extractor;
mod generator;
pub mod parser;
pub mod prompt;
mod stage;


pub use classifier::Classifier;
pub use config::StageConfig;
pub use error::{ParseError, StageError};
pub use extractor::Extractor;
pub use generator::Generator;
pub use parser::{extract_json, extract_json_for};
pub use prompt::{schema_for, PromptBuilder, SchemaDescriptor, METADATA_SCHEMAS};
pub use stage::{RunContext, StageClient};
