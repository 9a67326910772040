//! Stage transition events and their observers
//!
//! The orchestrator reports every transition as a [`StageEvent`]. Where the
//! events go is up to the registered [`EventObserver`]s: the tracing
//! subscriber, an append-only JSON lines file, or memory for tests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{error, info, warn};

/// Label of the event emitted before the first stage
pub const PROCESS_START: &str = "PROCESS_START";

/// Label of the event emitted after a successful run
pub const PROCESS_COMPLETE: &str = "PROCESS_COMPLETE";

/// Outcome of a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    /// The step succeeded
    Success,
    /// The step failed and the run stops
    Failure,
}

/// One structured log record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageEvent {
    /// When the event happened
    pub timestamp: DateTime<Utc>,
    /// Stage label (`CLASSIFY`, ..., `PROCESS_START`, `PROCESS_COMPLETE`)
    pub stage: String,
    /// Success or failure
    pub status: EventStatus,
    /// Item the event belongs to
    pub input_id: String,
    /// Stage-specific details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Map<String, Value>>,
}

impl StageEvent {
    /// Create an event stamped with the current time
    pub fn new(stage: impl Into<String>, status: EventStatus, input_id: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            stage: stage.into(),
            status,
            input_id: input_id.into(),
            details: None,
        }
    }

    /// Successful transition
    pub fn success(stage: impl Into<String>, input_id: impl Into<String>) -> Self {
        Self::new(stage, EventStatus::Success, input_id)
    }

    /// Failed transition
    pub fn failure(stage: impl Into<String>, input_id: impl Into<String>) -> Self {
        Self::new(stage, EventStatus::Failure, input_id)
    }

    /// Attach details; an empty map is dropped
    pub fn with_details(mut self, details: Map<String, Value>) -> Self {
        self.details = if details.is_empty() { None } else { Some(details) };
        self
    }

    /// Single-line JSON rendering
    pub fn to_json_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(
                r#"{{"stage":"{}","input_id":"{}","error":"unserializable event: {}"}}"#,
                self.stage, self.input_id, e
            )
        })
    }
}

/// Receives every event the orchestrator emits
pub trait EventObserver: Send + Sync {
    /// Handle one event. Observers must not fail the run.
    fn on_event(&self, event: &StageEvent);
}

/// Forwards events to `tracing`: info on success, error on failure
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl EventObserver for TracingObserver {
    fn on_event(&self, event: &StageEvent) {
        let line = event.to_json_line();
        match event.status {
            EventStatus::Success => info!(target: "presswire::events", "{}", line),
            EventStatus::Failure => error!(target: "presswire::events", "{}", line),
        }
    }
}

/// Appends one JSON line per event to a file
#[derive(Debug)]
pub struct JsonLinesObserver {
    file: Mutex<File>,
}

impl JsonLinesObserver {
    /// Open `path` for appending, creating parent directories as needed
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl EventObserver for JsonLinesObserver {
    fn on_event(&self, event: &StageEvent) {
        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = writeln!(file, "{}", event.to_json_line()) {
            warn!(error = %e, "Failed to append event to log file");
        }
    }
}

/// Collects events in memory; clones share the same buffer
#[derive(Debug, Clone, Default)]
pub struct MemoryObserver {
    events: Arc<Mutex<Vec<StageEvent>>>,
}

impl MemoryObserver {
    /// Create an empty observer
    pub fn new() -> Self {
        Self::default()
    }

    /// All events so far
    pub fn events(&self) -> Vec<StageEvent> {
        self.lock().clone()
    }

    /// Events for one item, in emission order
    pub fn events_for(&self, input_id: &str) -> Vec<StageEvent> {
        self.lock()
            .iter()
            .filter(|e| e.input_id == input_id)
            .cloned()
            .collect()
    }

    /// Forget collected events
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<StageEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl EventObserver for MemoryObserver {
    fn on_event(&self, event: &StageEvent) {
        self.lock().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn details(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_event_json_shape() {
        let event = StageEvent::success("CLASSIFY", "article_001")
            .with_details(details(json!({"content_type": "match_report", "confidence": 0.95})));
        let value: Value = serde_json::from_str(&event.to_json_line()).unwrap();

        assert_eq!(value["stage"], "CLASSIFY");
        assert_eq!(value["status"], "SUCCESS");
        assert_eq!(value["input_id"], "article_001");
        assert_eq!(value["details"]["content_type"], "match_report");
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn test_empty_details_are_omitted() {
        let event = StageEvent::failure(PROCESS_START, "x").with_details(Map::new());
        assert_eq!(event.details, None);
        assert!(!event.to_json_line().contains("details"));
        assert!(event.to_json_line().contains("FAILURE"));
    }

    #[test]
    fn test_memory_observer_filters_by_item() {
        let observer = MemoryObserver::new();
        let handle = observer.clone();
        observer.on_event(&StageEvent::success(PROCESS_START, "a"));
        observer.on_event(&StageEvent::success(PROCESS_START, "b"));
        observer.on_event(&StageEvent::success("CLASSIFY", "a"));

        assert_eq!(handle.events().len(), 3);
        let stages: Vec<String> = handle.events_for("a").into_iter().map(|e| e.stage).collect();
        assert_eq!(stages, vec![PROCESS_START, "CLASSIFY"]);

        handle.clear();
        assert!(observer.events().is_empty());
    }

    #[test]
    fn test_json_lines_observer_appends() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs").join("pipeline_processing.log");

        let observer = JsonLinesObserver::open(&path).unwrap();
        observer.on_event(&StageEvent::success(PROCESS_START, "a"));
        observer.on_event(&StageEvent::failure("EXTRACT", "a"));
        drop(observer);

        // Reopening keeps earlier lines
        let observer = JsonLinesObserver::open(&path).unwrap();
        observer.on_event(&StageEvent::success(PROCESS_START, "b"));

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<StageEvent> = contents
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].status, EventStatus::Failure);
        assert_eq!(lines[2].input_id, "b");
    }

    #[test]
    fn test_tracing_observer_does_not_panic_without_subscriber() {
        TracingObserver.on_event(&StageEvent::success(PROCESS_COMPLETE, "a"));
        TracingObserver.on_event(&StageEvent::failure("ROUTE", "a"));
    }
}
