//! Configuration loading, validation, and management for GraphScout.
//!
//! Loads configuration from `~/.graphscout/config.toml` with environment
//! variable overrides. Validates all settings at startup. Everything here
//! is read-only after initialization; concurrent runs share it safely.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.graphscout/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Model identifiers and credentials
    #[serde(default)]
    pub model: ModelConfig,

    /// Loop ceilings and the prompt token budget
    #[serde(default)]
    pub research: ResearchConfig,

    /// Retry policy for model invocations
    #[serde(default)]
    pub retry: RetryConfig,

    /// Knowledge-graph retrieval backend
    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

/// Model selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model used for normal iterations
    #[serde(default = "default_primary_model")]
    pub primary: String,

    /// Conservative model substituted on the last forced-finish attempt
    #[serde(default = "default_conservative_model")]
    pub conservative: String,

    /// Environment variable holding the model API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

/// Iteration ceilings and context budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchConfig {
    /// Maximum normal iterations per run
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Maximum forced-finish attempts once the ceiling is hit
    #[serde(default = "default_max_forced_attempts")]
    pub max_forced_attempts: u32,

    /// Prompt token budget
    #[serde(default = "default_token_limit")]
    pub token_limit: usize,
}

/// Bounded retry with a fixed delay between attempts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Retries after the first attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Fixed delay between attempts, in seconds
    #[serde(default = "default_retry_delay_secs")]
    pub delay_secs: u64,
}

/// Knowledge-graph retrieval backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Service base URL (also the token audience)
    #[serde(default = "default_retrieval_url")]
    pub base_url: String,

    /// Fixed project identifier sent with every query
    #[serde(default = "default_project")]
    pub project: String,

    /// Token budget for returned context
    #[serde(default = "default_context_window")]
    pub context_window: u32,

    /// Result count
    #[serde(default = "default_k")]
    pub k: u32,

    /// Default start of the query time window, "YYYY-MM-DD"
    #[serde(default = "default_start_date")]
    pub start_date: String,

    /// Default end of the query time window, "YYYY-MM-DD"
    #[serde(default = "default_end_date")]
    pub end_date: String,

    /// Environment variable holding the bearer token
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

fn default_primary_model() -> String {
    "gemini-2.0-flash".into()
}
fn default_conservative_model() -> String {
    "gemini-1.5-pro-latest".into()
}
fn default_api_key_env() -> String {
    "GOOGLE_API_KEY".into()
}
fn default_max_iterations() -> u32 {
    10
}
fn default_max_forced_attempts() -> u32 {
    3
}
fn default_token_limit() -> usize {
    50_000
}
fn default_max_retries() -> u32 {
    3
}
fn default_retry_delay_secs() -> u64 {
    5
}
fn default_retrieval_url() -> String {
    "https://graph-output-api.example.run.app".into()
}
fn default_project() -> String {
    "FINCATCH".into()
}
fn default_context_window() -> u32 {
    10_000
}
fn default_k() -> u32 {
    50
}
fn default_start_date() -> String {
    "2024-06-01".into()
}
fn default_end_date() -> String {
    "2025-03-22".into()
}
fn default_token_env() -> String {
    "GRAPHSCOUT_RETRIEVAL_TOKEN".into()
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            primary: default_primary_model(),
            conservative: default_conservative_model(),
            api_key_env: default_api_key_env(),
        }
    }
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            max_forced_attempts: default_max_forced_attempts(),
            token_limit: default_token_limit(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            delay_secs: default_retry_delay_secs(),
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            base_url: default_retrieval_url(),
            project: default_project(),
            context_window: default_context_window(),
            k: default_k(),
            start_date: default_start_date(),
            end_date: default_end_date(),
            token_env: default_token_env(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            research: ResearchConfig::default(),
            retry: RetryConfig::default(),
            retrieval: RetrievalConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path with env var overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from(&Self::config_path())?;

        config.apply_env_overrides(
            std::env::var("GRAPHSCOUT_MODEL").ok(),
            std::env::var("GRAPHSCOUT_RETRIEVAL_URL").ok(),
            std::env::var("GRAPHSCOUT_PROJECT").ok(),
        );

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides. A set value wins over the file value.
    pub fn apply_env_overrides(
        &mut self,
        model: Option<String>,
        retrieval_url: Option<String>,
        project: Option<String>,
    ) {
        if let Some(model) = model {
            self.model.primary = model;
        }
        if let Some(url) = retrieval_url {
            self.retrieval.base_url = url;
        }
        if let Some(project) = project {
            self.retrieval.project = project;
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration file path.
    pub fn config_path() -> PathBuf {
        dirs_home().join(".graphscout").join("config.toml")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.research.max_iterations == 0 {
            return Err(ConfigError::ValidationError(
                "research.max_iterations must be at least 1".into(),
            ));
        }
        if self.research.max_forced_attempts == 0 {
            return Err(ConfigError::ValidationError(
                "research.max_forced_attempts must be at least 1".into(),
            ));
        }
        if self.research.token_limit == 0 {
            return Err(ConfigError::ValidationError(
                "research.token_limit must be > 0".into(),
            ));
        }
        if self.model.primary.is_empty() || self.model.conservative.is_empty() {
            return Err(ConfigError::ValidationError(
                "model identifiers must not be empty".into(),
            ));
        }
        if self.retrieval.base_url.is_empty() {
            return Err(ConfigError::ValidationError(
                "retrieval.base_url must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.model.primary, "gemini-2.0-flash");
        assert_eq!(config.research.max_iterations, 10);
        assert_eq!(config.research.token_limit, 50_000);
        assert_eq!(config.retry.delay_secs, 5);
        assert_eq!(config.retrieval.k, 50);
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let back: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(back.model.primary, config.model.primary);
        assert_eq!(back.retrieval.base_url, config.retrieval.base_url);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[model]\nprimary = \"gemini-exp-1206\"").unwrap();

        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.model.primary, "gemini-exp-1206");
        // Untouched sections keep defaults
        assert_eq!(config.research.max_iterations, 10);
        assert_eq!(config.retrieval.project, "FINCATCH");
    }

    #[test]
    fn env_overrides_win_over_file_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[model]\nprimary = \"file-model\"\n\n[retrieval]\nbase_url = \"https://file.example.test\"\nproject = \"FILEPROJ\""
        )
        .unwrap();

        let mut config = AppConfig::load_from(file.path()).unwrap();
        config.apply_env_overrides(
            Some("env-model".into()),
            Some("https://env.example.test".into()),
            None,
        );

        assert_eq!(config.model.primary, "env-model");
        assert_eq!(config.retrieval.base_url, "https://env.example.test");
        // Unset overrides leave the file value in place
        assert_eq!(config.retrieval.project, "FILEPROJ");
    }

    #[test]
    fn missing_file_uses_defaults() {
        let config = AppConfig::load_from(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.model.primary, "gemini-2.0-flash");
    }

    #[test]
    fn zero_iterations_rejected() {
        let mut config = AppConfig::default();
        config.research.max_iterations = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn empty_model_rejected() {
        let mut config = AppConfig::default();
        config.model.primary = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_toml_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "model = not valid toml [").unwrap();
        assert!(matches!(
            AppConfig::load_from(file.path()),
            Err(ConfigError::ParseError { .. })
        ));
    }
}
