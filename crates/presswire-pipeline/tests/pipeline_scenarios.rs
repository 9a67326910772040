//! End-to-end runs against a scripted collaborator

use presswire_domain::{ContentInput, ContentItem, ContentType, ErrorKind, PipelineState, PipelineStatus, RoutedRecord, Stage};
use presswire_extractor::StageConfig;
use presswire_gatekeeper::Gatekeeper;
use presswire_llm::MockProvider;
use presswire_pipeline::{
    EventStatus, JsonLinesObserver, MemoryObserver, Pipeline, StageEvent, PROCESS_COMPLETE, PROCESS_START,
};
use presswire_router::{Router, RouterConfig};
use presswire_store::{FileSink, MemorySink};
use std::sync::Arc;
use tempfile::TempDir;

const CLASSIFY: &str = "sports content classifier";
const EXTRACT: &str = "Extract structured metadata";
const GENERATE: &str = "sports headline writer";

const MATCH_TEXT: &str = "Team A beat Team B 2-1 on Saturday. Striker Jones scored twice \
    in front of an attendance of 50,000.";

fn reply_for(llm: &MockProvider, content_type: &str) {
    llm.add_response(
        CLASSIFY,
        format!(r#"{{"content_type": "{}", "confidence": 0.92, "reasoning": "clear signals"}}"#, content_type),
    );
    llm.add_response(
        EXTRACT,
        "Here is the metadata:\n```json\n{\"teams\": [\"Team A\", \"Team B\"], \"players\": [\"Jones\"], \
         \"competition\": \"League One\", \"sentiment\": \"positive\", \
         \"key_stats\": {\"score\": \"2-1\", \"attendance\": \"50,000\"}}\n```",
    );
    llm.add_response(
        GENERATE,
        r#"{"neutral": "Team A beat Team B 2-1", "fan_oriented": "Jones double sinks Team B!", "casual_viewer": "Team A edge Team B 2-1 in front of 50,000"}"#,
    );
}

fn memory_pipeline(llm: &MockProvider, config: RouterConfig) -> (Pipeline<MockProvider, MemorySink>, MemorySink, MemoryObserver) {
    let sink = MemorySink::new();
    let observer = MemoryObserver::new();
    let pipeline = Pipeline::new(
        Arc::new(llm.clone()),
        Router::new(sink.clone(), config),
        StageConfig::default(),
        Gatekeeper::default_config(),
    )
    .with_observer(observer.clone());
    (pipeline, sink, observer)
}

fn stages_of(events: &[StageEvent]) -> Vec<(String, EventStatus)> {
    events.iter().map(|e| (e.stage.clone(), e.status)).collect()
}

#[test]
fn test_match_report_is_routed_and_counted() {
    let dir = TempDir::new().unwrap();
    let llm = MockProvider::default();
    reply_for(&llm, "match_report");

    let observer = MemoryObserver::new();
    let router = Router::new(FileSink::new(dir.path()), RouterConfig::default());
    let pipeline = Pipeline::new(Arc::new(llm.clone()), router, StageConfig::default(), Gatekeeper::default_config())
        .with_observer(observer.clone());

    let before = pipeline.routing_stats().get(ContentType::MatchReport);
    let item = ContentItem::new(MATCH_TEXT).with_id("match_001").with_source("wire");
    let result = pipeline.process(&item);

    assert_eq!(result.status, PipelineStatus::Success, "{:?}", result.error);
    assert_eq!(result.state, PipelineState::Complete);
    assert_eq!(result.classification.as_ref().map(|c| c.content_type), Some(ContentType::MatchReport));
    assert_eq!(result.metadata.as_ref().map(|m| m.key_stats["attendance"].clone()), Some("50,000".into()));
    assert_eq!(result.headlines.as_ref().map(|h| h.neutral.as_str()), Some("Team A beat Team B 2-1"));
    assert_eq!(pipeline.routing_stats().get(ContentType::MatchReport), before + 1);
    assert_eq!(pipeline.routing_stats().total(), 1);

    // Exactly one record, in the match report bucket
    let destination = result.destination.clone().unwrap();
    let bucket = dir.path().join("match_reports");
    assert!(destination.starts_with(bucket.to_str().unwrap()));
    let files: Vec<_> = std::fs::read_dir(&bucket).unwrap().collect();
    assert_eq!(files.len(), 1);

    let record: RoutedRecord = serde_json::from_str(&std::fs::read_to_string(&destination).unwrap()).unwrap();
    assert_eq!(record.input_id, "match_001");
    assert_eq!(record.original_content, MATCH_TEXT);
    assert_eq!(record.pipeline_version, "1.0");
    assert_eq!(record.source.as_deref(), Some("wire"));

    // Stage order and temperatures
    let temperatures: Vec<f32> = llm.requests().iter().map(|r| r.temperature).collect();
    assert_eq!(temperatures, vec![0.3, 0.3, 0.7]);

    let events = observer.events_for("match_001");
    let success = EventStatus::Success;
    assert_eq!(
        stages_of(&events),
        vec![
            (PROCESS_START.to_string(), success),
            ("CLASSIFY".to_string(), success),
            ("EXTRACT".to_string(), success),
            ("GENERATE".to_string(), success),
            ("ROUTE".to_string(), success),
            (PROCESS_COMPLETE.to_string(), success),
        ]
    );
    let start = events[0].details.as_ref().unwrap();
    assert_eq!(start["source"], "wire");
    let route = events[4].details.as_ref().unwrap();
    assert_eq!(route["destination"], "match_reports");
}

#[test]
fn test_empty_classification_reply_is_parse_error() {
    let llm = MockProvider::new("");
    let (pipeline, sink, observer) = memory_pipeline(&llm, RouterConfig::default());

    let result = pipeline.process(&ContentItem::new(MATCH_TEXT).with_id("empty_001"));

    assert_eq!(result.status, PipelineStatus::Failed);
    assert_eq!(result.state, PipelineState::Failed);
    assert_eq!(result.error_kind, Some(ErrorKind::Parse));
    assert_eq!(result.failed_stage, Some(Stage::Classify));
    assert!(result.classification.is_none());
    assert!(result.destination.is_none());

    // No later stage ran and nothing was routed
    assert_eq!(llm.call_count(), 1);
    assert!(sink.buckets().is_empty());
    assert_eq!(pipeline.routing_stats().total(), 0);

    let events = observer.events_for("empty_001");
    assert_eq!(
        stages_of(&events),
        vec![
            (PROCESS_START.to_string(), EventStatus::Success),
            ("CLASSIFY".to_string(), EventStatus::Failure),
        ]
    );
    let failure = events[1].details.as_ref().unwrap();
    assert_eq!(failure["error_type"], "ParseError");
}

#[test]
fn test_missing_confidence_is_validation_error() {
    let llm = MockProvider::new(r#"{"content_type": "match_report", "reasoning": "score line"}"#);
    let (pipeline, _sink, _observer) = memory_pipeline(&llm, RouterConfig::default());

    let result = pipeline.process(&ContentItem::new(MATCH_TEXT));

    assert_eq!(result.status, PipelineStatus::Failed);
    assert_eq!(result.error_kind, Some(ErrorKind::Validation));
    let error = result.error.unwrap();
    assert!(error.contains("confidence"), "{}", error);
    assert!(error.starts_with("CLASSIFY failed"));
}

#[test]
fn test_unknown_content_type_is_not_coerced() {
    let llm = MockProvider::new(r#"{"content_type": "gossip", "confidence": 0.9, "reasoning": "rumour"}"#);
    let (pipeline, sink, _observer) = memory_pipeline(&llm, RouterConfig::default());

    let result = pipeline.process(&ContentItem::new("Who is dating whom"));
    assert_eq!(result.error_kind, Some(ErrorKind::Validation));
    assert!(sink.records("other").is_empty());
    assert_eq!(pipeline.routing_stats().get(ContentType::Other), 0);
}

#[test]
fn test_generation_failure_keeps_earlier_outputs() {
    let broken = MockProvider::default();
    broken.add_response(CLASSIFY, r#"{"content_type": "transfer_news", "confidence": 0.8, "reasoning": "fee"}"#);
    broken.add_response(EXTRACT, r#"{"teams": ["Chelsea"]}"#);
    broken.add_error(GENERATE);
    let (pipeline, sink, _observer) = memory_pipeline(&broken, RouterConfig::default());

    let result = pipeline.process(&ContentItem::new("Chelsea have signed a striker for £50m"));

    assert_eq!(result.failed_stage, Some(Stage::Generate));
    assert_eq!(result.error_kind, Some(ErrorKind::ExternalCall));
    assert!(result.classification.is_some());
    assert_eq!(result.metadata.map(|m| m.teams), Some(vec!["Chelsea".to_string()]));
    assert!(result.headlines.is_none());
    assert!(sink.buckets().is_empty());
}

#[test]
fn test_write_failure_is_io_error() {
    let llm = MockProvider::default();
    reply_for(&llm, "injury_update");
    let (pipeline, sink, observer) = memory_pipeline(&llm, RouterConfig::default());
    sink.fail_writes(true);

    let result = pipeline.process(&ContentItem::new("Jones out for six weeks").with_id("inj_1"));

    assert_eq!(result.state, PipelineState::Failed);
    assert_eq!(result.failed_stage, Some(Stage::Route));
    assert_eq!(result.error_kind, Some(ErrorKind::Io));
    assert!(result.headlines.is_some());
    assert_eq!(pipeline.routing_stats().total(), 0);

    let last = observer.events_for("inj_1").pop().unwrap();
    assert_eq!((last.stage.as_str(), last.status), ("ROUTE", EventStatus::Failure));
}

#[test]
fn test_unmapped_type_goes_to_fallback_bucket() {
    let llm = MockProvider::default();
    reply_for(&llm, "opinion_piece");
    let mut config = RouterConfig::default();
    config.buckets.remove("opinion_piece");
    let (pipeline, sink, _observer) = memory_pipeline(&llm, config);

    let result = pipeline.process(&ContentItem::new("Why the press is failing"));

    assert!(result.is_success());
    let records = sink.records("other");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].content_type, ContentType::OpinionPiece);
    assert_eq!(pipeline.routing_stats().get(ContentType::Other), 1);
    assert_eq!(pipeline.routing_stats().get(ContentType::OpinionPiece), 0);
}

#[test]
fn test_batch_isolates_failures_and_keeps_order() {
    let llm = MockProvider::default();
    // Checked before the stage rules, so item 3 fails at classification
    llm.add_response("ITEM_THREE", "I cannot help with that.");
    reply_for(&llm, "match_report");
    let (pipeline, sink, _observer) = memory_pipeline(&llm, RouterConfig::default());

    let inputs: Vec<ContentInput> = (1..=5)
        .map(|i| {
            let text = if i == 3 {
                "ITEM_THREE unreadable wire copy".to_string()
            } else {
                format!("{} (item {})", MATCH_TEXT, i)
            };
            ContentInput::new(text).with_id(format!("batch_{}", i))
        })
        .collect();

    let report = pipeline.process_batch(inputs);

    let ids: Vec<&str> = report.results.iter().map(|r| r.input_id.as_str()).collect();
    assert_eq!(ids, vec!["batch_1", "batch_2", "batch_3", "batch_4", "batch_5"]);

    let statuses: Vec<PipelineStatus> = report.results.iter().map(|r| r.status).collect();
    assert_eq!(statuses.iter().filter(|s| **s == PipelineStatus::Success).count(), 4);
    assert_eq!(statuses[2], PipelineStatus::Failed);
    assert_eq!(report.results[2].error_kind, Some(ErrorKind::Parse));

    assert_eq!(report.summary.total, 5);
    assert_eq!(report.summary.successful, 4);
    assert_eq!(report.summary.failed, 1);
    assert_eq!(report.routing_stats.total(), 4);
    assert_eq!(sink.records("match_reports").len(), 4);
}

#[test]
fn test_repeated_ids_keep_every_record_on_disk() {
    let dir = TempDir::new().unwrap();
    let llm = MockProvider::default();
    reply_for(&llm, "match_report");
    let router = Router::new(FileSink::new(dir.path()), RouterConfig::default());
    let pipeline = Pipeline::new(Arc::new(llm), router, StageConfig::default(), Gatekeeper::default_config());

    // Same id, plus an id that sanitizes to the same file name
    let mut inputs: Vec<ContentInput> = (0..20).map(|_| ContentInput::new(MATCH_TEXT).with_id("dup")).collect();
    inputs.push(ContentInput::new(MATCH_TEXT).with_id("a/b"));
    inputs.push(ContentInput::new(MATCH_TEXT).with_id("a_b"));

    let report = pipeline.process_batch(inputs);
    assert_eq!(report.summary.successful, 22);

    let counter = pipeline.routing_stats().get(ContentType::MatchReport);
    let on_disk = std::fs::read_dir(dir.path().join("match_reports")).unwrap().count();
    assert_eq!(counter, 22);
    assert_eq!(on_disk as u64, counter);

    let mut destinations: Vec<&str> = report.results.iter().filter_map(|r| r.destination.as_deref()).collect();
    destinations.sort_unstable();
    destinations.dedup();
    assert_eq!(destinations.len(), 22);

    // A fresh router reading the directory agrees with the live counters
    let restored = Router::new(FileSink::new(dir.path()), RouterConfig::default())
        .restore_stats()
        .unwrap();
    assert_eq!(restored, pipeline.routing_stats());
}

#[test]
fn test_batch_generates_missing_ids() {
    let llm = MockProvider::default();
    reply_for(&llm, "match_report");
    let (pipeline, _sink, _observer) = memory_pipeline(&llm, RouterConfig::default());

    let report = pipeline.process_batch(vec![ContentInput::new(MATCH_TEXT), ContentInput::new(MATCH_TEXT)]);
    let first = &report.results[0].input_id;
    let second = &report.results[1].input_id;
    assert!(first.starts_with("content_"));
    assert_ne!(first, second);
}

#[test]
fn test_event_log_file_records_every_transition() {
    let dir = TempDir::new().unwrap();
    let log_path = dir.path().join("logs").join("pipeline_processing.log");

    let llm = MockProvider::default();
    reply_for(&llm, "match_report");
    let pipeline = Pipeline::new(
        Arc::new(llm),
        Router::new(MemorySink::new(), RouterConfig::default()),
        StageConfig::default(),
        Gatekeeper::default_config(),
    )
    .with_observer(JsonLinesObserver::open(&log_path).unwrap());

    pipeline.process(&ContentItem::new(MATCH_TEXT).with_id("logged_1"));

    let lines: Vec<StageEvent> = std::fs::read_to_string(&log_path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 6);
    assert!(lines.iter().all(|e| e.input_id == "logged_1"));
    assert_eq!(lines[5].stage, PROCESS_COMPLETE);
}
