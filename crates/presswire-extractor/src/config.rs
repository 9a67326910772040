//! Configuration for the stage clients

use serde::{Deserialize, Serialize};

/// Sampling and prompt settings shared by the three stage clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    /// Sampling temperature for classification
    pub classify_temperature: f32,

    /// Sampling temperature for metadata extraction
    pub extract_temperature: f32,

    /// Sampling temperature for headline generation
    pub generate_temperature: f32,

    /// Upper bound on reply length for every request
    pub max_output_tokens: u32,

    /// Characters of the article quoted in the headline prompt
    pub headline_excerpt_chars: usize,

    /// Players listed in the headline prompt
    pub context_players_limit: usize,
}

impl StageConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("classify_temperature", self.classify_temperature),
            ("extract_temperature", self.extract_temperature),
            ("generate_temperature", self.generate_temperature),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("{} must be between 0.0 and 1.0, got {}", name, value));
            }
        }
        if self.max_output_tokens == 0 {
            return Err("max_output_tokens must be greater than 0".to_string());
        }
        if self.headline_excerpt_chars == 0 {
            return Err("headline_excerpt_chars must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            classify_temperature: 0.3,
            extract_temperature: 0.3,
            generate_temperature: 0.7,
            max_output_tokens: 2000,
            headline_excerpt_chars: 500,
            context_players_limit: 3,
        }
    }
}
