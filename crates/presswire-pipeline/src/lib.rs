//! Presswire Pipeline
//!
//! Chains the stage clients and the router into a per-item state machine.
//!
//! # Overview
//!
//! ```text
//! START → CLASSIFIED → EXTRACTED → GENERATED → ROUTED → COMPLETE
//!   └──────────┴────────────┴───────────┴─────────┴──→ FAILED
//! ```
//!
//! Each transition is reported as a [`StageEvent`] to the registered
//! [`EventObserver`]s. Every item produces exactly one
//! [`PipelineResult`](presswire_domain::PipelineResult); batches are
//! processed sequentially and one item's failure never affects another's.
//!
//! # Usage
//!
//! ```no_run
//! use presswire_domain::ContentInput;
//! use presswire_gatekeeper::Gatekeeper;
//! use presswire_llm::AnthropicProvider;
//! use presswire_pipeline::{Pipeline, PipelineConfig, TracingObserver};
//! use presswire_router::Router;
//! use presswire_store::FileSink;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PipelineConfig::from_file("presswire.toml")?;
//! let llm = Arc::new(AnthropicProvider::from_env(&config.llm.api_key_env, config.llm.model.clone())?);
//! let router = Router::new(FileSink::new(&config.router.output_dir), config.router.clone());
//!
//! let pipeline = Pipeline::new(llm, router, config.stages.clone(), Gatekeeper::new(config.validation.clone()))
//!     .with_observer(TracingObserver);
//!
//! let report = pipeline.process_batch(vec![ContentInput::new("Chelsea have signed ...")]);
//! println!("{}", report.summary_text());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
pub mod events;
mod metrics;
mod pipeline;

pub use config::{LlmConfig, LoggingConfig, PipelineConfig, ProviderKind};
pub use error::{ConfigError, PipelineError};
pub use events::{
    EventObserver, EventStatus, JsonLinesObserver, MemoryObserver, StageEvent, TracingObserver, PROCESS_COMPLETE,
    PROCESS_START,
};
pub use metrics::{BatchReport, BatchSummary};
pub use pipeline::Pipeline;
