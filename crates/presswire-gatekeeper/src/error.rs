//! Error types for the Gatekeeper

use thiserror::Error;

/// A parsed reply that does not have the expected shape
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Value is not a keyed mapping
    #[error("{context} must be a JSON object, got {found}")]
    NotAnObject {
        /// What was being validated
        context: String,
        /// JSON type actually found
        found: &'static str,
    },

    /// One or more required keys are absent
    #[error("{context} missing required keys: {missing:?}. Available keys: {present:?}")]
    MissingKeys {
        /// What was being validated
        context: String,
        /// Required keys that were not found
        missing: Vec<String>,
        /// Keys the object does have
        present: Vec<String>,
    },

    /// `content_type` is outside the fixed set
    #[error("Invalid content_type: {value}")]
    InvalidContentType {
        /// Offending value (truncated)
        value: String,
    },

    /// A field has the wrong type or is out of range
    #[error("Invalid {field}: {reason}")]
    InvalidField {
        /// Field name
        field: String,
        /// What is wrong with it
        reason: String,
    },
}

impl ValidationError {
    /// Names of missing keys, empty for other variants
    pub fn missing_keys(&self) -> &[String] {
        match self {
            ValidationError::MissingKeys { missing, .. } => missing,
            _ => &[],
        }
    }
}
