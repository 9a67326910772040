//! Gatekeeper configuration

use serde::{Deserialize, Serialize};

/// Configuration for validation rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Reject confidence values outside [0.0, 1.0]
    pub enforce_confidence_range: bool,

    /// Longest offending value quoted in an error message
    pub max_reported_value_chars: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            enforce_confidence_range: true,
            max_reported_value_chars: 64,
        }
    }
}

impl ValidationConfig {
    /// Create a permissive configuration (presence and type checks only)
    pub fn permissive() -> Self {
        Self {
            enforce_confidence_range: false,
            ..Self::default()
        }
    }
}
