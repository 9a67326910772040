//! Presswire Storage Layer
//!
//! Implements the `RecordSink` trait from `presswire-domain`.
//!
//! # Sinks
//!
//! - [`FileSink`]: one directory per bucket, one pretty-printed JSON file per record
//! - [`MemorySink`]: in-process buckets for tests and dry runs
//!
//! # Examples
//!
//! ```no_run
//! use presswire_store::FileSink;
//!
//! let sink = FileSink::new("output");
//! sink.prepare(["match_reports", "other"]).unwrap();
//! ```

#![warn(missing_docs)]

mod file;
mod memory;

use thiserror::Error;

pub use file::FileSink;
pub use memory::MemorySink;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filesystem error
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path being accessed
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Record could not be encoded
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Bucket or record name would escape the output directory
    #[error("Invalid name: {0:?}")]
    InvalidName(String),
}

/// Reject names that are empty or could address another directory
pub(crate) fn check_name(name: &str) -> Result<(), StoreError> {
    let invalid = name.trim().is_empty()
        || name.starts_with('.')
        || name.contains(['/', '\\', '\0'])
        || name.contains("..");
    if invalid {
        return Err(StoreError::InvalidName(name.to_string()));
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_name() {
        assert!(check_name("match_001_20250101_120000_000").is_ok());
        assert!(check_name("match_reports").is_ok());

        for bad in ["", "  ", "../escape", "a/b", "a\\b", ".hidden", "x..y"] {
            assert!(matches!(check_name(bad), Err(StoreError::InvalidName(_))), "{:?}", bad);
        }
    }
}
