//! Reply validation logic

use crate::{ValidationConfig, ValidationError};
use presswire_domain::ContentType;
use serde_json::{Map, Value};

/// Check that `value` is an object containing every key in `required`
///
/// Returns the object on success so callers can keep reading from it.
pub fn validate_keys<'a>(
    value: &'a Value,
    required: &[&str],
    context: &str,
) -> Result<&'a Map<String, Value>, ValidationError> {
    let object = value.as_object().ok_or_else(|| ValidationError::NotAnObject {
        context: context.to_string(),
        found: json_type_name(value),
    })?;

    let missing: Vec<String> = required
        .iter()
        .filter(|key| !object.contains_key(**key))
        .map(|key| key.to_string())
        .collect();

    if !missing.is_empty() {
        return Err(ValidationError::MissingKeys {
            context: context.to_string(),
            missing,
            present: object.keys().cloned().collect(),
        });
    }

    Ok(object)
}

/// Name of a JSON value's type, for error messages
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// The Gatekeeper validates parsed replies against stage constraints
#[derive(Debug, Clone, Default)]
pub struct Gatekeeper {
    config: ValidationConfig,
}

impl Gatekeeper {
    /// Create a new Gatekeeper with the given configuration
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Create a Gatekeeper with default configuration
    pub fn default_config() -> Self {
        Self::new(ValidationConfig::default())
    }

    /// Active configuration
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// See [`validate_keys`]
    pub fn validate_keys<'a>(
        &self,
        value: &'a Value,
        required: &[&str],
        context: &str,
    ) -> Result<&'a Map<String, Value>, ValidationError> {
        validate_keys(value, required, context)
    }

    /// Read `content_type` and check it belongs to the fixed set
    ///
    /// Unknown values are rejected, never mapped to `other`.
    pub fn validate_content_type(
        &self,
        object: &Map<String, Value>,
    ) -> Result<ContentType, ValidationError> {
        let value = object.get("content_type").unwrap_or(&Value::Null);
        value
            .as_str()
            .and_then(ContentType::parse)
            .ok_or_else(|| ValidationError::InvalidContentType {
                value: self.quote(value),
            })
    }

    /// Read `confidence` as a number, checking bounds when configured
    pub fn validate_confidence(&self, object: &Map<String, Value>) -> Result<f64, ValidationError> {
        let value = object.get("confidence").unwrap_or(&Value::Null);
        let confidence = value.as_f64().ok_or_else(|| ValidationError::InvalidField {
            field: "confidence".to_string(),
            reason: format!("expected a number, got {}", json_type_name(value)),
        })?;

        if self.config.enforce_confidence_range && !(0.0..=1.0).contains(&confidence) {
            return Err(ValidationError::InvalidField {
                field: "confidence".to_string(),
                reason: format!("{} out of range [0.0, 1.0]", confidence),
            });
        }

        Ok(confidence)
    }

    fn quote(&self, value: &Value) -> String {
        let text = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        let limit = self.config.max_reported_value_chars;
        if text.chars().count() > limit {
            let truncated: String = text.chars().take(limit).collect();
            format!("{}...", truncated)
        } else {
            text
        }
    }
}
