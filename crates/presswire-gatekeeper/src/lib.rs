//! Presswire Gatekeeper
//!
//! Checks parsed collaborator replies before a stage accepts them.
//!
//! The Gatekeeper provides:
//! - Required-key validation for JSON objects
//! - Content type membership in the fixed set
//! - Confidence bounds checking
//!
//! Error messages name keys, never values, so oversized replies do not end
//! up in logs.
//!
//! # Examples
//!
//! ```
//! use presswire_gatekeeper::validate_keys;
//! use serde_json::json;
//!
//! let reply = json!({"neutral": "A", "fan_oriented": "B"});
//! let err = validate_keys(&reply, &["neutral", "casual_viewer"], "Headlines").unwrap_err();
//! assert!(err.to_string().contains("casual_viewer"));
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod validator;

pub use config::ValidationConfig;
pub use error::ValidationError;
pub use validator::{json_type_name, validate_keys, Gatekeeper};
