//! Persist finished items and count them per content type

use crate::RouterConfig;
use chrono::{DateTime, Utc};
use presswire_domain::{
    Classification, ContentItem, ContentType, ErrorKind, HeadlineSet, Metadata, RecordSink, RoutedRecord,
    RoutingStats, PIPELINE_VERSION,
};
use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tracing::debug;

/// Routing failure
#[derive(Error, Debug)]
pub enum RouteError {
    /// The sink refused or failed the write
    #[error("Routing failed: could not write to {bucket}: {message}")]
    Io {
        /// Destination bucket
        bucket: String,
        /// Sink error text
        message: String,
    },
}

impl RouteError {
    /// Error category reported on the pipeline result
    pub fn kind(&self) -> ErrorKind {
        match self {
            RouteError::Io { .. } => ErrorKind::Io,
        }
    }
}

/// Everything the router needs from a successful run
#[derive(Debug, Clone, Copy)]
pub struct RouteRequest<'a> {
    /// The processed item
    pub item: &'a ContentItem,
    /// Stage 1 output
    pub classification: &'a Classification,
    /// Stage 2 output
    pub metadata: &'a Metadata,
    /// Stage 3 output
    pub headlines: &'a HeadlineSet,
}

/// Where a record ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteReceipt {
    /// Bucket the record was written to
    pub bucket: String,
    /// Name requested from the sink; a sink that finds it taken stores
    /// the record under a suffixed name, reported in `location`
    pub name: String,
    /// Location reported by the sink
    pub location: String,
    /// Counter that was incremented
    pub counted_as: ContentType,
}

/// Writes routed records to a [`RecordSink`] and keeps per-type counts
///
/// Counters are atomics, so a router shared between threads stays
/// consistent. A count only moves after the sink confirms the write.
pub struct Router<S> {
    sink: S,
    config: RouterConfig,
    counters: [AtomicU64; ContentType::ALL.len()],
}

fn slot(content_type: ContentType) -> usize {
    ContentType::ALL
        .iter()
        .position(|t| *t == content_type)
        .unwrap_or(ContentType::ALL.len() - 1)
}

/// Record name: input id plus a millisecond timestamp
///
/// Characters that are unsafe in file names are replaced with `_`.
pub fn record_name(input_id: &str, at: DateTime<Utc>) -> String {
    let id: String = input_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("{}_{}", id, at.format("%Y%m%d_%H%M%S_%3f"))
}

impl<S> Router<S>
where
    S: RecordSink,
    S::Error: Display,
{
    /// Create a router with zeroed counters
    pub fn new(sink: S, config: RouterConfig) -> Self {
        Self {
            sink,
            config,
            counters: Default::default(),
        }
    }

    /// Underlying sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Active configuration
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Destination bucket and counted type for `content_type`
    ///
    /// Types missing from the table go to the fallback bucket and are
    /// counted under [`ContentType::Other`].
    pub fn destination(&self, content_type: ContentType) -> (&str, ContentType) {
        match self.config.bucket(content_type) {
            Some(bucket) => (bucket, content_type),
            None => (&self.config.fallback_bucket, ContentType::Other),
        }
    }

    /// Build the record for a finished item, write it, and count it
    pub fn route(&self, request: RouteRequest<'_>) -> Result<RouteReceipt, RouteError> {
        let content_type = request.classification.content_type;
        let (bucket, counted_as) = self.destination(content_type);
        let processed_at = Utc::now();
        let name = record_name(request.item.id(), processed_at);

        let record = RoutedRecord {
            input_id: request.item.id().to_string(),
            processed_at,
            content_type,
            classification: request.classification.clone(),
            metadata: request.metadata.clone(),
            headlines: request.headlines.clone(),
            original_content: request.item.text().to_string(),
            pipeline_version: PIPELINE_VERSION.to_string(),
            bucket: bucket.to_string(),
            source: request.item.source().map(str::to_string),
        };

        let location = self.sink.write(bucket, &name, &record).map_err(|e| RouteError::Io {
            bucket: bucket.to_string(),
            message: e.to_string(),
        })?;

        self.counters[slot(counted_as)].fetch_add(1, Ordering::Relaxed);
        debug!(input_id = request.item.id(), bucket, %location, "Routed record");

        Ok(RouteReceipt {
            bucket: bucket.to_string(),
            name,
            location,
            counted_as,
        })
    }

    /// Snapshot of records routed per content type
    pub fn get_stats(&self) -> RoutingStats {
        RoutingStats::from_counts(
            ContentType::ALL
                .into_iter()
                .map(|t| (t, self.counters[slot(t)].load(Ordering::Relaxed))),
        )
    }

    /// Seed the counters from what the sink already holds
    ///
    /// Only mapped types read their own bucket; the fallback bucket is
    /// counted under `other`.
    pub fn restore_stats(&self) -> Result<RoutingStats, RouteError> {
        for content_type in ContentType::ALL {
            let bucket = match self.config.bucket(content_type) {
                Some(bucket) => bucket,
                None if content_type == ContentType::Other => &self.config.fallback_bucket,
                None => {
                    self.counters[slot(content_type)].store(0, Ordering::Relaxed);
                    continue;
                }
            };
            let count = self.sink.count(bucket).map_err(|e| RouteError::Io {
                bucket: bucket.to_string(),
                message: e.to_string(),
            })?;
            self.counters[slot(content_type)].store(count as u64, Ordering::Relaxed);
        }
        Ok(self.get_stats())
    }
}
