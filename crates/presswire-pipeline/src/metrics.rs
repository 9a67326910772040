//! Batch outcome counts and reporting

use presswire_domain::{ErrorKind, PipelineResult, RoutingStats};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate outcome of a batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Items submitted
    pub total: usize,

    /// Items that reached COMPLETE
    pub successful: usize,

    /// Items that ended FAILED
    pub failed: usize,

    /// Failed items per error kind
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub failures_by_kind: BTreeMap<String, usize>,
}

impl BatchSummary {
    /// Create an empty summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one finished item
    pub fn record(&mut self, result: &PipelineResult) {
        self.total += 1;
        if result.is_success() {
            self.successful += 1;
        } else {
            self.failed += 1;
            let kind = result.error_kind.map_or("Unknown", |k: ErrorKind| k.as_str());
            *self.failures_by_kind.entry(kind.to_string()).or_insert(0) += 1;
        }
    }

    /// Summarize a slice of results
    pub fn from_results(results: &[PipelineResult]) -> Self {
        let mut summary = Self::new();
        for result in results {
            summary.record(result);
        }
        summary
    }
}

/// Everything a batch run produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Per-item results, in submission order
    pub results: Vec<PipelineResult>,

    /// Aggregate counts
    pub summary: BatchSummary,

    /// Router counts after the batch
    pub routing_stats: RoutingStats,
}

impl BatchReport {
    /// Generate a human-readable report
    pub fn summary_text(&self) -> String {
        let mut lines = vec![
            "Batch Summary".to_string(),
            "=============".to_string(),
            format!("Total processed: {}", self.summary.total),
            format!("Successful: {}", self.summary.successful),
            format!("Failed: {}", self.summary.failed),
        ];

        if !self.summary.failures_by_kind.is_empty() {
            lines.push(String::new());
            lines.push("Failures by kind:".to_string());
            for (kind, count) in &self.summary.failures_by_kind {
                lines.push(format!("  {}: {}", kind, count));
            }
        }

        let routed: Vec<_> = self.routing_stats.iter().filter(|(_, count)| *count > 0).collect();
        if !routed.is_empty() {
            lines.push(String::new());
            lines.push("Routing statistics:".to_string());
            for (content_type, count) in routed {
                lines.push(format!("  {}: {} items", content_type, count));
            }
        }

        lines.join("\n")
    }
}
