//! Configuration file parsing for the pipeline
//!
//! One TOML file with a section per component:
//!
//! ```toml
//! [llm]
//! provider = "anthropic"
//! model = "claude-sonnet-4-20250514"
//!
//! [stages]
//! generate_temperature = 0.7
//!
//! [router]
//! output_dir = "outputs"
//!
//! [logging]
//! log_file = "logs/pipeline_processing.log"
//! ```
//!
//! Every section and field is optional; defaults apply. An empty
//! `log_file` switches the JSON lines event log off.

use crate::ConfigError;
use presswire_extractor::StageConfig;
use presswire_gatekeeper::ValidationConfig;
use presswire_router::RouterConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Which text-generation backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Anthropic Messages API
    Anthropic,
    /// Local Ollama server
    Ollama,
    /// Scripted offline replies
    Mock,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Ollama => "ollama",
            ProviderKind::Mock => "mock",
        })
    }
}

/// `[llm]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Backend
    pub provider: ProviderKind,

    /// Model name passed to the backend
    pub model: String,

    /// Base URL override
    pub endpoint: Option<String>,

    /// Environment variable holding the API key. The key itself never
    /// appears in configuration files.
    pub api_key_env: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Anthropic,
            model: "claude-sonnet-4-20250514".to_string(),
            endpoint: None,
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
        }
    }
}

/// `[logging]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// JSON lines file receiving every stage event; `""` turns it off
    #[serde(with = "optional_path")]
    pub log_file: Option<PathBuf>,

    /// Default tracing filter when `RUST_LOG` is unset
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_file: Some(PathBuf::from("logs/pipeline_processing.log")),
            filter: "info".to_string(),
        }
    }
}

/// `None` is written as `""` so that an explicit "off" survives a reload
mod optional_path {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::path::PathBuf;

    pub fn serialize<S: Serializer>(path: &Option<PathBuf>, serializer: S) -> Result<S::Ok, S::Error> {
        match path {
            Some(path) => serializer.serialize_str(&path.to_string_lossy()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<PathBuf>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(if raw.trim().is_empty() { None } else { Some(PathBuf::from(raw)) })
    }
}

/// Complete pipeline configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Text-generation backend
    pub llm: LlmConfig,

    /// Stage client settings
    pub stages: StageConfig,

    /// Reply validation rules
    pub validation: ValidationConfig,

    /// Bucket table and output directory
    pub router: RouterConfig,

    /// Event log destination
    pub logging: LoggingConfig,
}

impl PipelineConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: PipelineConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validate every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::Invalid {
                section: "llm",
                message: "model must not be empty".to_string(),
            });
        }
        if self.llm.provider == ProviderKind::Anthropic && self.llm.api_key_env.trim().is_empty() {
            return Err(ConfigError::Invalid {
                section: "llm",
                message: "api_key_env must name an environment variable".to_string(),
            });
        }
        self.stages
            .validate()
            .map_err(|message| ConfigError::Invalid { section: "stages", message })?;
        self.router
            .validate()
            .map_err(|message| ConfigError::Invalid { section: "router", message })?;
        Ok(())
    }
}
