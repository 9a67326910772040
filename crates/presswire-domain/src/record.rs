//! Stage outputs and the durable routed record

use crate::ContentType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Version tag written into every routed record
pub const PIPELINE_VERSION: &str = "1.0";

/// Output of the classification stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Category, always a member of the fixed set
    pub content_type: ContentType,

    /// Collaborator's confidence in [0.0, 1.0]
    pub confidence: f64,

    /// Short explanation of the choice
    pub reasoning: String,
}

/// Output of the metadata extraction stage
///
/// The outer keys are the same for every content type. Only the shape of
/// `key_stats` varies, and it is kept exactly as the collaborator returned it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Team names mentioned
    #[serde(default)]
    pub teams: Vec<String>,

    /// Player names mentioned
    #[serde(default)]
    pub players: Vec<String>,

    /// League or tournament, if any
    #[serde(default)]
    pub competition: Option<String>,

    /// Overall sentiment label
    #[serde(default = "default_sentiment")]
    pub sentiment: String,

    /// Type-specific figures (score, fee, absence, ...)
    #[serde(default)]
    pub key_stats: Map<String, Value>,

    /// Any additional keys the collaborator returned
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

const METADATA_KEYS: [&str; 5] = ["teams", "players", "competition", "sentiment", "key_stats"];

fn default_sentiment() -> String {
    "neutral".to_string()
}

impl Metadata {
    /// Build metadata from a parsed JSON object
    ///
    /// Missing or ill-typed outer keys fall back to empty lists, `None` and a
    /// `"neutral"` sentiment rather than failing the item.
    pub fn from_map(map: &Map<String, Value>) -> Self {
        let competition = map
            .get("competition")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let sentiment = map
            .get("sentiment")
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(default_sentiment);

        let key_stats = map
            .get("key_stats")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        let extra = map
            .iter()
            .filter(|(k, _)| !METADATA_KEYS.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Self {
            teams: string_list(map.get("teams")),
            players: string_list(map.get("players")),
            competition,
            sentiment,
            key_stats,
            extra,
        }
    }
}

impl Default for Metadata {
    fn default() -> Self {
        Self::from_map(&Map::new())
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter(|v| !v.is_null())
            .map(text_of)
            .filter(|s| !s.trim().is_empty())
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}

/// Render a JSON value as plain text: strings as-is, anything else as JSON
fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Output of the headline generation stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadlineSet {
    /// Objective headline for general sports news
    pub neutral: String,

    /// Headline written for team supporters
    pub fan_oriented: String,

    /// Context-rich headline for casual followers
    pub casual_viewer: String,
}

impl HeadlineSet {
    /// Build from a JSON object whose required keys were already validated
    ///
    /// Absent keys become empty strings; non-string values are rendered as JSON.
    pub fn from_map(map: &Map<String, Value>) -> Self {
        let field = |key: &str| map.get(key).map(text_of).unwrap_or_default();
        Self {
            neutral: field("neutral"),
            fan_oriented: field("fan_oriented"),
            casual_viewer: field("casual_viewer"),
        }
    }
}

/// The durable record written to a bucket after a successful run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutedRecord {
    /// Identifier of the processed item
    pub input_id: String,

    /// When the record was created
    pub processed_at: DateTime<Utc>,

    /// Classified type (duplicated from `classification` for easy filtering)
    pub content_type: ContentType,

    /// Stage 1 output
    pub classification: Classification,

    /// Stage 2 output
    pub metadata: Metadata,

    /// Stage 3 output
    pub headlines: HeadlineSet,

    /// The raw input text
    pub original_content: String,

    /// Pipeline version tag
    pub pipeline_version: String,

    /// Destination bucket
    pub bucket: String,

    /// Source description, if the input carried one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Snapshot of routed-record counts per content type
///
/// Always contains an entry for every content type, zero included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoutingStats {
    counts: BTreeMap<ContentType, u64>,
}

impl RoutingStats {
    /// Create a snapshot with every count at zero
    pub fn new() -> Self {
        Self {
            counts: ContentType::ALL.into_iter().map(|t| (t, 0)).collect(),
        }
    }

    /// Build from explicit counts; missing types are filled with zero
    pub fn from_counts(counts: impl IntoIterator<Item = (ContentType, u64)>) -> Self {
        let mut stats = Self::new();
        for (content_type, count) in counts {
            stats.counts.insert(content_type, count);
        }
        stats
    }

    /// Count for one content type
    pub fn get(&self, content_type: ContentType) -> u64 {
        self.counts.get(&content_type).copied().unwrap_or(0)
    }

    /// Sum across all types
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Iterate in content type order
    pub fn iter(&self) -> impl Iterator<Item = (ContentType, u64)> + '_ {
        self.counts.iter().map(|(t, c)| (*t, *c))
    }
}

impl Default for RoutingStats {
    fn default() -> Self {
        Self::new()
    }
}
