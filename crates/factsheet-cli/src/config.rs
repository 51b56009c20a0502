//! Configuration management for the CLI.
//!
//! Settings are resolved in layers: built-in defaults, an optional TOML
//! file, environment variables (after loading `.env`), then command-line
//! flags. The resolved [`Config`] is an ordinary value handed to each
//! component through its constructor.

use crate::error::{CliError, Result};
use factsheet_documents::DocumentLimits;
use factsheet_extractor::{ExtractorConfig, FailurePolicy, DEFAULT_INSTRUCTION_SUFFIX};
use factsheet_llm::openai::{DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use factsheet_llm::ProviderConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Base URL used for the `openai` provider when none is configured
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Input, template and output locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Model provider settings
    #[serde(default)]
    pub model: ModelConfig,

    /// Extraction behavior
    #[serde(default)]
    pub extraction: ExtractionSettings,

    /// Input document limits
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Filesystem locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory holding prompt specifications
    pub prompt_dir: PathBuf,
    /// Directory holding output templates
    pub templates_dir: PathBuf,
    /// Template file inside `templates_dir`
    pub template_filename: String,
    /// Directory receiving generated factsheets
    pub output_dir: PathBuf,
    /// Generated factsheet file name
    pub output_filename: String,
    /// Staging directory for uploaded inputs
    pub upload_dir: PathBuf,
    /// Write logs to a timestamped file here instead of stderr
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            prompt_dir: PathBuf::from("prompts"),
            templates_dir: PathBuf::from("templates"),
            template_filename: "factsheet_template.md".to_string(),
            output_dir: PathBuf::from("outputs"),
            output_filename: "generated_doc.md".to_string(),
            upload_dir: PathBuf::from("uploads"),
            log_dir: None,
        }
    }
}

/// Which model backend answers extraction prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// OpenRouter chat-completions API
    #[default]
    OpenRouter,
    /// OpenAI chat-completions API
    OpenAi,
    /// Offline provider answering "null" to every prompt
    Mock,
}

impl FromStr for ProviderKind {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "openrouter" => Ok(ProviderKind::OpenRouter),
            "openai" => Ok(ProviderKind::OpenAi),
            "mock" => Ok(ProviderKind::Mock),
            other => Err(CliError::Config(format!(
                "Unknown model provider '{}' (expected openrouter, openai or mock)",
                other
            ))),
        }
    }
}

/// Model provider settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Backend
    pub provider: ProviderKind,
    /// Chat-completions base URL
    pub base_url: String,
    /// Model identifier
    pub model: String,
    /// Bearer credential
    pub api_key: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Completion length cap
    pub max_tokens: u32,
    /// HTTP timeout in seconds
    pub timeout_secs: u64,
    /// System framing sent with every call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: String::new(),
            temperature: 0.0,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            system_prompt: None,
        }
    }
}

/// Extraction behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionSettings {
    /// Behavior when one field fails
    pub failure_policy: FailurePolicy,
    /// Line appended to each prompt at submission; blank disables it
    pub instruction_suffix: String,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            failure_policy: FailurePolicy::default(),
            instruction_suffix: DEFAULT_INSTRUCTION_SUFFIX.to_string(),
        }
    }
}

/// Input document limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Largest accepted input, in MiB
    pub max_file_size_mb: u64,
    /// Replace line breaks in extracted text with spaces
    pub flatten_newlines: bool,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 10,
            flatten_newlines: true,
        }
    }
}

/// Log output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Resolve configuration from an optional file and the process environment.
    ///
    /// A `.env` file in the working directory is loaded first when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Override settings from environment variables read through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = var("PROMPT_DIR") {
            self.paths.prompt_dir = PathBuf::from(v);
        }
        if let Some(v) = var("TEMPLATES_DIR") {
            self.paths.templates_dir = PathBuf::from(v);
        }
        if let Some(v) = var("TEMPLATE_FILENAME") {
            self.paths.template_filename = v;
        }
        if let Some(v) = var("OUTPUT_DIR") {
            self.paths.output_dir = PathBuf::from(v);
        }
        if let Some(v) = var("OUTPUT_FILENAME") {
            self.paths.output_filename = v;
        }
        if let Some(v) = var("UPLOAD_DIR") {
            self.paths.upload_dir = PathBuf::from(v);
        }
        if let Some(v) = var("LOG_DIR") {
            self.paths.log_dir = Some(PathBuf::from(v));
        }

        if let Some(v) = var("MODEL_PROVIDER") {
            self.model.provider = v.parse()?;
        }
        if let Some(v) = var("MODEL_BASE_URL") {
            self.model.base_url = v;
        }
        let (model_var, key_var) = match self.model.provider {
            ProviderKind::OpenAi => ("OPENAI_MODEL", "OPENAI_API_KEY"),
            _ => ("OPENROUTER_MODEL", "OPENROUTER_API_KEY"),
        };
        if let Some(v) = var(model_var) {
            self.model.model = v;
        }
        if let Some(v) = var(key_var) {
            self.model.api_key = v;
        }
        if let Some(v) = var("MODEL_TEMPERATURE") {
            self.model.temperature = parse_number("MODEL_TEMPERATURE", &v)?;
        }
        if let Some(v) = var("MODEL_MAX_TOKENS") {
            self.model.max_tokens = parse_number("MODEL_MAX_TOKENS", &v)?;
        }
        if let Some(v) = var("MODEL_TIMEOUT_SECS") {
            self.model.timeout_secs = parse_number("MODEL_TIMEOUT_SECS", &v)?;
        }

        if let Some(v) = var("FAILURE_POLICY") {
            self.extraction.failure_policy = v.parse().map_err(CliError::Config)?;
        }
        if let Some(v) = var("MAX_FILE_SIZE") {
            self.limits.max_file_size_mb = parse_number("MAX_FILE_SIZE", &v)?;
        }

        Ok(())
    }

    /// Check values that would only fail later in the pipeline
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.model.temperature) {
            return Err(CliError::Config(format!(
                "model.temperature must be between 0.0 and 2.0, got {}",
                self.model.temperature
            )));
        }
        if self.model.max_tokens == 0 {
            return Err(CliError::Config("model.max_tokens must be positive".to_string()));
        }
        if self.limits.max_file_size_mb == 0 {
            return Err(CliError::Config("limits.max_file_size_mb must be positive".to_string()));
        }
        if self.paths.template_filename.trim().is_empty() || self.paths.output_filename.trim().is_empty() {
            return Err(CliError::Config("template and output file names must be set".to_string()));
        }
        Ok(())
    }

    /// Configured output template
    pub fn template_path(&self) -> PathBuf {
        self.paths.templates_dir.join(&self.paths.template_filename)
    }

    /// Configured factsheet destination
    pub fn output_path(&self) -> PathBuf {
        self.paths.output_dir.join(&self.paths.output_filename)
    }

    /// Settings for the chat-completions provider
    pub fn provider_config(&self) -> ProviderConfig {
        let mut base_url = self.model.base_url.clone();
        let mut model = self.model.model.clone();

        if self.model.provider == ProviderKind::OpenAi {
            if base_url == DEFAULT_BASE_URL {
                base_url = OPENAI_BASE_URL.to_string();
            }
            // OpenRouter model ids carry a vendor prefix OpenAI does not accept
            if model == DEFAULT_MODEL {
                model = DEFAULT_MODEL.trim_start_matches("openai/").to_string();
            }
        }

        ProviderConfig {
            base_url,
            model,
            api_key: self.model.api_key.clone(),
            temperature: self.model.temperature,
            max_tokens: self.model.max_tokens,
            timeout_secs: self.model.timeout_secs,
        }
    }

    /// Settings for the extraction orchestrator
    pub fn extractor_config(&self) -> ExtractorConfig {
        ExtractorConfig {
            failure_policy: self.extraction.failure_policy,
            system_prompt: self.model.system_prompt.clone(),
            instruction_suffix: Some(self.extraction.instruction_suffix.clone()),
        }
    }

    /// Limits for the document reader
    pub fn document_limits(&self) -> DocumentLimits {
        DocumentLimits {
            flatten_newlines: self.limits.flatten_newlines,
            ..DocumentLimits::with_max_size_mb(self.limits.max_file_size_mb)
        }
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| CliError::Config(format!("{} must be a number, got '{}'", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.template_path(), PathBuf::from("templates/factsheet_template.md"));
        assert_eq!(config.output_path(), PathBuf::from("outputs/generated_doc.md"));
        assert_eq!(config.model.provider, ProviderKind::OpenRouter);
        assert_eq!(config.model.model, "openai/gpt-4.1-nano");
        assert_eq!(config.model.max_tokens, 256);
        assert_eq!(config.limits.max_file_size_mb, 10);
        assert_eq!(config.extraction.failure_policy, FailurePolicy::AbortOnFirstError);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            [paths]
            prompt_dir = "specs"
            output_filename = "factsheet.md"

            [model]
            provider = "mock"
            temperature = 0.2

            [extraction]
            failure_policy = "continue"

            [limits]
            max_file_size_mb = 5
            flatten_newlines = false
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.paths.prompt_dir, PathBuf::from("specs"));
        assert_eq!(config.paths.templates_dir, PathBuf::from("templates"));
        assert_eq!(config.output_path(), PathBuf::from("outputs/factsheet.md"));
        assert_eq!(config.model.provider, ProviderKind::Mock);
        assert_eq!(config.model.max_tokens, 256);
        assert_eq!(config.extraction.failure_policy, FailurePolicy::ContinueOnError);
        assert_eq!(config.extraction.instruction_suffix, DEFAULT_INSTRUCTION_SUFFIX);
        assert_eq!(config.document_limits().max_file_size_bytes, 5 * 1024 * 1024);
        assert!(!config.document_limits().flatten_newlines);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_env(env(&[
                ("PROMPT_DIR", "/srv/prompts"),
                ("OUTPUT_DIR", "/srv/out"),
                ("OPENROUTER_API_KEY", "sk-or"),
                ("OPENROUTER_MODEL", "anthropic/claude"),
                ("MODEL_MAX_TOKENS", "512"),
                ("FAILURE_POLICY", "continue"),
                ("MAX_FILE_SIZE", "20"),
                ("LOG_DIR", "logs"),
            ]))
            .unwrap();

        assert_eq!(config.paths.prompt_dir, PathBuf::from("/srv/prompts"));
        assert_eq!(config.output_path(), PathBuf::from("/srv/out/generated_doc.md"));
        assert_eq!(config.model.api_key, "sk-or");
        assert_eq!(config.model.model, "anthropic/claude");
        assert_eq!(config.model.max_tokens, 512);
        assert_eq!(config.extraction.failure_policy, FailurePolicy::ContinueOnError);
        assert_eq!(config.limits.max_file_size_mb, 20);
        assert_eq!(config.paths.log_dir, Some(PathBuf::from("logs")));
    }

    #[test]
    fn test_oversized_file_limit_saturates() {
        let mut config = Config::default();
        config
            .apply_env(env(&[("MAX_FILE_SIZE", "18446744073709551615")]))
            .unwrap();
        config.validate().unwrap();

        assert_eq!(config.document_limits().max_file_size_bytes, u64::MAX);
    }

    #[test]
    fn test_openai_provider_env() {
        let mut config = Config::default();
        config
            .apply_env(env(&[
                ("MODEL_PROVIDER", "openai"),
                ("OPENAI_API_KEY", "sk-openai"),
                ("OPENROUTER_API_KEY", "sk-or"),
            ]))
            .unwrap();

        assert_eq!(config.model.provider, ProviderKind::OpenAi);
        let provider = config.provider_config();
        assert_eq!(provider.api_key, "sk-openai");
        assert_eq!(provider.base_url, OPENAI_BASE_URL);
        assert_eq!(provider.model, "gpt-4.1-nano");
    }

    #[test]
    fn test_blank_env_is_ignored() {
        let mut config = Config::default();
        config.apply_env(env(&[("PROMPT_DIR", "  ")])).unwrap();
        assert_eq!(config.paths.prompt_dir, PathBuf::from("prompts"));
    }

    #[test]
    fn test_invalid_env_values() {
        let mut config = Config::default();
        assert!(config.apply_env(env(&[("MODEL_PROVIDER", "ollama")])).is_err());
        assert!(config.apply_env(env(&[("MODEL_MAX_TOKENS", "many")])).is_err());
        assert!(config.apply_env(env(&[("FAILURE_POLICY", "retry")])).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.model.temperature = 3.5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.limits.max_file_size_mb = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_extractor_config() {
        let mut config = Config::default();
        config.model.system_prompt = Some("Be terse.".to_string());

        let extractor = config.extractor_config();
        assert_eq!(extractor.system_prompt.as_deref(), Some("Be terse."));
        assert_eq!(extractor.instruction_suffix.as_deref(), Some(DEFAULT_INSTRUCTION_SUFFIX));
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/factsheet.toml");
        assert_eq!(Config::from_file(path).unwrap(), Config::default());
    }

    #[test]
    fn test_missing_config_file() {
        let result = Config::from_file("/nonexistent/factsheet.toml");
        assert!(matches!(result, Err(CliError::Config(_))));
    }
}
