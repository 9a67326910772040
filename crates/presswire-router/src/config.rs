//! Bucket table and fallback for the Router

use presswire_domain::ContentType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Router configuration
///
/// `buckets` is keyed by content type wire name (`match_report`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Root directory for file-backed sinks
    pub output_dir: PathBuf,

    /// Bucket for content types missing from `buckets`
    pub fallback_bucket: String,

    /// Destination bucket per content type
    pub buckets: BTreeMap<String, String>,
}

impl RouterConfig {
    /// Bucket configured for `content_type`, if any
    pub fn bucket(&self, content_type: ContentType) -> Option<&str> {
        self.buckets.get(content_type.as_str()).map(String::as_str)
    }

    /// Every distinct bucket a record can land in
    pub fn all_buckets(&self) -> Vec<&str> {
        let mut all: Vec<&str> = self.buckets.values().map(String::as_str).collect();
        all.push(&self.fallback_bucket);
        all.sort_unstable();
        all.dedup();
        all
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.fallback_bucket.trim().is_empty() {
            return Err("fallback_bucket must not be empty".to_string());
        }
        // Counts are restored per bucket, so each bucket has one owner
        let mut owners: BTreeMap<&str, &str> = BTreeMap::new();
        for (key, bucket) in &self.buckets {
            if ContentType::parse(key).is_none() {
                return Err(format!("Unknown content type in bucket table: {}", key));
            }
            if bucket.trim().is_empty() {
                return Err(format!("Bucket for {} must not be empty", key));
            }
            if key != ContentType::Other.as_str() && *bucket == self.fallback_bucket {
                return Err(format!(
                    "Bucket for {} ({}) must differ from fallback_bucket",
                    key, bucket
                ));
            }
            if let Some(previous) = owners.insert(bucket, key) {
                return Err(format!(
                    "Content types {} and {} share bucket {}",
                    previous, key, bucket
                ));
            }
        }
        // "other" and the fallback share one bucket and one counter
        if let Some(other) = self.bucket(ContentType::Other) {
            if other != self.fallback_bucket {
                return Err(format!(
                    "Bucket for other ({}) must match fallback_bucket ({})",
                    other, self.fallback_bucket
                ));
            }
        }
        Ok(())
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        let buckets = [
            (ContentType::MatchReport, "match_reports"),
            (ContentType::TransferNews, "transfer_news"),
            (ContentType::InjuryUpdate, "injury_updates"),
            (ContentType::OpinionPiece, "opinion_pieces"),
            (ContentType::Other, "other"),
        ]
        .into_iter()
        .map(|(t, b)| (t.as_str().to_string(), b.to_string()))
        .collect();

        Self {
            output_dir: PathBuf::from("outputs"),
            fallback_bucket: "other".to_string(),
            buckets,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let config = RouterConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bucket(ContentType::MatchReport), Some("match_reports"));
        assert_eq!(config.bucket(ContentType::InjuryUpdate), Some("injury_updates"));
        assert_eq!(config.bucket(ContentType::Other), Some("other"));
        assert_eq!(config.all_buckets().len(), 5);
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            output_dir = "/tmp/out"

            [buckets]
            match_report = "live"
            other = "other"
        "#;

        let config: RouterConfig = toml::from_str(toml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.bucket(ContentType::MatchReport), Some("live"));
        assert_eq!(config.bucket(ContentType::TransferNews), None);
        assert_eq!(config.fallback_bucket, "other");
    }

    #[test]
    fn test_unknown_content_type_key() {
        let mut config = RouterConfig::default();
        config.buckets.insert("gossip".to_string(), "gossip".to_string());
        assert!(config.validate().unwrap_err().contains("gossip"));
    }

    #[test]
    fn test_other_must_share_fallback() {
        let mut config = RouterConfig::default();
        config.fallback_bucket = "misc".to_string();
        assert!(config.validate().is_err());

        config.buckets.remove("other");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bucket_has_one_owner() {
        let mut config = RouterConfig::default();
        config
            .buckets
            .insert("opinion_piece".to_string(), "match_reports".to_string());
        let err = config.validate().unwrap_err();
        assert!(err.contains("match_report") && err.contains("opinion_piece"));

        let mut config = RouterConfig::default();
        config
            .buckets
            .insert("transfer_news".to_string(), "other".to_string());
        assert!(config.validate().unwrap_err().contains("transfer_news"));
    }
}
