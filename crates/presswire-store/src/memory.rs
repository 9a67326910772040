//! In-memory record sink

use crate::{check_name, StoreError};
use presswire_domain::{RecordSink, RoutedRecord};
use std::collections::BTreeMap;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type Buckets = BTreeMap<String, Vec<(String, RoutedRecord)>>;

/// Keeps records in memory, grouped by bucket
///
/// Clones share the same buckets, so a test can keep a handle after giving
/// the sink to a router.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    buckets: Arc<Mutex<Buckets>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail with an I/O error (or stop doing so)
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Records written to `bucket`, in write order
    pub fn records(&self, bucket: &str) -> Vec<RoutedRecord> {
        self.lock()
            .get(bucket)
            .map(|records| records.iter().map(|(_, r)| r.clone()).collect())
            .unwrap_or_default()
    }

    /// Names written to `bucket`, in write order
    pub fn names(&self, bucket: &str) -> Vec<String> {
        self.lock()
            .get(bucket)
            .map(|records| records.iter().map(|(n, _)| n.clone()).collect())
            .unwrap_or_default()
    }

    /// Buckets that hold at least one record
    pub fn buckets(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    fn lock(&self) -> MutexGuard<'_, Buckets> {
        self.buckets.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RecordSink for MemorySink {
    type Error = StoreError;

    fn write(&self, bucket: &str, name: &str, record: &RoutedRecord) -> Result<String, Self::Error> {
        check_name(bucket)?;
        check_name(name)?;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Io {
                path: format!("{}/{}", bucket, name),
                source: io::Error::other("write failure injected"),
            });
        }

        self.lock()
            .entry(bucket.to_string())
            .or_default()
            .push((name.to_string(), record.clone()));
        Ok(format!("memory://{}/{}", bucket, name))
    }

    fn count(&self, bucket: &str) -> Result<usize, Self::Error> {
        Ok(self.lock().get(bucket).map_or(0, Vec::len))
    }
}
