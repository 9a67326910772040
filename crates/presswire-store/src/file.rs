//! Directory-per-bucket record sink

use crate::{check_name, StoreError};
use presswire_domain::{RecordSink, RoutedRecord};
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writes each record to `<output_dir>/<bucket>/<name>.json`
///
/// Bucket directories are created on first write. Existing files are never
/// replaced: a taken name gets a numeric suffix (`<name>_1.json`, ...).
#[derive(Debug, Clone)]
pub struct FileSink {
    output_dir: PathBuf,
}

impl FileSink {
    /// Create a sink rooted at `output_dir`
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Root directory
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Create the directories for `buckets` ahead of the first write
    pub fn prepare<I, S>(&self, buckets: I) -> Result<(), StoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for bucket in buckets {
            self.bucket_dir(bucket.as_ref()).and_then(|dir| create_dir(&dir))?;
        }
        Ok(())
    }

    fn bucket_dir(&self, bucket: &str) -> Result<PathBuf, StoreError> {
        check_name(bucket)?;
        Ok(self.output_dir.join(bucket))
    }
}

fn create_dir(dir: &Path) -> Result<(), StoreError> {
    fs::create_dir_all(dir).map_err(|source| io_error(dir, source))
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Highest suffix tried before giving up on a name
const MAX_NAME_SUFFIX: u32 = 10_000;

/// Create `<name>.json`, or the first free `<name>_<n>.json`
fn create_unique(dir: &Path, name: &str) -> Result<(PathBuf, File), StoreError> {
    let mut path = dir.join(format!("{}.json", name));
    let mut suffix = 0;
    loop {
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists && suffix < MAX_NAME_SUFFIX => {
                suffix += 1;
                path = dir.join(format!("{}_{}.json", name, suffix));
            }
            Err(e) => return Err(io_error(&path, e)),
        }
    }
}

impl RecordSink for FileSink {
    type Error = StoreError;

    fn write(&self, bucket: &str, name: &str, record: &RoutedRecord) -> Result<String, Self::Error> {
        check_name(name)?;
        let dir = self.bucket_dir(bucket)?;
        create_dir(&dir)?;

        let body = serde_json::to_string_pretty(record)?;
        let (path, mut file) = create_unique(&dir, name)?;
        file.write_all(body.as_bytes())
            .map_err(|source| io_error(&path, source))?;

        debug!(bucket, path = %path.display(), "Wrote record");
        Ok(path.display().to_string())
    }

    fn count(&self, bucket: &str) -> Result<usize, Self::Error> {
        let dir = self.bucket_dir(bucket)?;
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(io_error(&dir, e)),
        };

        let mut count = 0;
        for entry in entries {
            let path = entry.map_err(|e| io_error(&dir, e))?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                count += 1;
            }
        }
        Ok(count)
    }
}
