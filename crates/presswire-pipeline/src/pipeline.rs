//! The orchestrator: drives one item through the four stages

use crate::events::{EventObserver, StageEvent, PROCESS_COMPLETE, PROCESS_START};
use crate::metrics::{BatchReport, BatchSummary};
use crate::PipelineError;
use presswire_domain::{
    ContentInput, ContentItem, HeadlineSet, LlmProvider, PipelineResult, PipelineState, PipelineStatus,
    RecordSink, RoutingStats, Stage,
};
use presswire_extractor::{Classifier, Extractor, Generator, RunContext, StageClient, StageConfig, StageError};
use presswire_gatekeeper::Gatekeeper;
use presswire_router::{RouteReceipt, RouteRequest, Router};
use serde_json::{json, Map, Value};
use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, info_span};

/// Per-item scratch state, discarded once the result is built
struct Run {
    state: PipelineState,
    context: RunContext,
    headlines: Option<HeadlineSet>,
    receipt: Option<RouteReceipt>,
}

impl Run {
    fn new() -> Self {
        Self {
            state: PipelineState::Start,
            context: RunContext::new(),
            headlines: None,
            receipt: None,
        }
    }

    fn into_result(self, input_id: &str, error: Option<&PipelineError>) -> PipelineResult {
        PipelineResult {
            input_id: input_id.to_string(),
            status: if error.is_some() {
                PipelineStatus::Failed
            } else {
                PipelineStatus::Success
            },
            state: self.state,
            classification: self.context.classification,
            metadata: self.context.metadata,
            headlines: self.headlines,
            destination: self.receipt.map(|r| r.location),
            error: error.map(ToString::to_string),
            error_kind: error.map(PipelineError::kind),
            failed_stage: error.map(PipelineError::stage),
        }
    }
}

fn details(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Sequential four-stage pipeline over one shared collaborator
///
/// Stages run in fixed order (classify, extract, generate, route). The
/// first failure ends the item's run in `FAILED`; nothing is retried and
/// the router is never reached after an earlier failure. One item's
/// failure never affects another's.
///
/// # Examples
///
/// ```
/// use presswire_domain::ContentItem;
/// use presswire_extractor::StageConfig;
/// use presswire_gatekeeper::Gatekeeper;
/// use presswire_llm::MockProvider;
/// use presswire_pipeline::Pipeline;
/// use presswire_router::{Router, RouterConfig};
/// use presswire_store::MemorySink;
/// use std::sync::Arc;
///
/// let llm = Arc::new(MockProvider::new("not json"));
/// let router = Router::new(MemorySink::new(), RouterConfig::default());
/// let pipeline = Pipeline::new(llm, router, StageConfig::default(), Gatekeeper::default_config());
///
/// let result = pipeline.process(&ContentItem::new("Some article"));
/// assert!(!result.is_success());
/// assert_eq!(pipeline.routing_stats().total(), 0);
/// ```
pub struct Pipeline<L, S> {
    classifier: Classifier<L>,
    extractor: Extractor<L>,
    generator: Generator<L>,
    router: Router<S>,
    observers: Vec<Box<dyn EventObserver>>,
}

impl<L, S> Pipeline<L, S>
where
    L: LlmProvider,
    L::Error: Display,
    S: RecordSink,
    S::Error: Display,
{
    /// Create a pipeline whose three stage clients share `llm`
    pub fn new(llm: Arc<L>, router: Router<S>, stages: StageConfig, gatekeeper: Gatekeeper) -> Self {
        Self {
            classifier: Classifier::new(Arc::clone(&llm), gatekeeper.clone(), stages.clone()),
            extractor: Extractor::new(Arc::clone(&llm), gatekeeper.clone(), stages.clone()),
            generator: Generator::new(llm, gatekeeper, stages),
            router,
            observers: Vec::new(),
        }
    }

    /// Register an observer for stage events
    pub fn with_observer(mut self, observer: impl EventObserver + 'static) -> Self {
        self.observers.push(Box::new(observer));
        self
    }

    /// The router, for inspection
    pub fn router(&self) -> &Router<S> {
        &self.router
    }

    /// Current routing counts
    pub fn routing_stats(&self) -> RoutingStats {
        self.router.get_stats()
    }

    /// Run one item through every stage
    pub fn process(&self, item: &ContentItem) -> PipelineResult {
        let input_id = item.id();
        let _span = info_span!("process", input_id).entered();

        let start_details = item.source().map(|s| json!({ "source": s })).unwrap_or_default();
        self.emit(StageEvent::success(PROCESS_START, input_id).with_details(details(start_details)));

        let mut run = Run::new();
        while let Some(stage) = run.state.pending_stage() {
            match self.step(stage, item, &mut run) {
                Ok(stage_details) => {
                    run.state = stage.completes_into();
                    self.emit(StageEvent::success(stage.label(), input_id).with_details(stage_details));
                }
                Err(error) => {
                    run.state = PipelineState::Failed;
                    self.emit(StageEvent::failure(stage.label(), input_id).with_details(details(json!({
                        "error": error.to_string(),
                        "error_type": error.kind().as_str(),
                    }))));
                    debug!(input_id, stage = stage.label(), "Run aborted");
                    return run.into_result(input_id, Some(&error));
                }
            }
        }

        if let Some(next) = run.state.next() {
            run.state = next;
        }
        let output_path = run.receipt.as_ref().map(|r| r.location.clone()).unwrap_or_default();
        self.emit(
            StageEvent::success(PROCESS_COMPLETE, input_id)
                .with_details(details(json!({ "output_path": output_path }))),
        );
        run.into_result(input_id, None)
    }

    /// Run a batch entry, generating an id when none was given
    pub fn process_input(&self, input: ContentInput) -> PipelineResult {
        self.process(&input.into_item())
    }

    /// Run entries one after another, in submission order
    pub fn process_batch<I>(&self, inputs: I) -> BatchReport
    where
        I: IntoIterator<Item = ContentInput>,
    {
        let mut summary = BatchSummary::new();
        let results: Vec<PipelineResult> = inputs
            .into_iter()
            .map(|input| {
                let result = self.process_input(input);
                summary.record(&result);
                result
            })
            .collect();

        BatchReport {
            results,
            summary,
            routing_stats: self.routing_stats(),
        }
    }

    fn step(&self, stage: Stage, item: &ContentItem, run: &mut Run) -> Result<Map<String, Value>, PipelineError> {
        let context = &mut run.context;
        let stage_details = match stage {
            Stage::Classify => {
                let classification = self.classifier.run(item, context)?;
                let d = json!({
                    "content_type": classification.content_type,
                    "confidence": classification.confidence,
                });
                context.classification = Some(classification);
                d
            }
            Stage::Extract => {
                let metadata = self.extractor.run(item, context)?;
                let d = json!({
                    "teams_found": metadata.teams.len(),
                    "players_found": metadata.players.len(),
                    "competition": metadata.competition.as_deref().unwrap_or("N/A"),
                });
                context.metadata = Some(metadata);
                d
            }
            Stage::Generate => {
                run.headlines = Some(self.generator.run(item, context)?);
                json!({ "headline_count": 3 })
            }
            Stage::Route => {
                let headlines = run.headlines.as_ref().ok_or(StageError::MissingContext {
                    stage,
                    missing: "headlines",
                })?;
                let receipt = self.router.route(RouteRequest {
                    item,
                    classification: context.require_classification(stage)?,
                    metadata: context.require_metadata(stage)?,
                    headlines,
                })?;
                let d = json!({
                    "destination": receipt.bucket,
                    "output_file": receipt.location,
                });
                run.receipt = Some(receipt);
                d
            }
        };
        Ok(details(stage_details))
    }

    fn emit(&self, event: StageEvent) {
        for observer in &self.observers {
            observer.on_event(&event);
        }
    }
}
