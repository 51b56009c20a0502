//! Configuration for the Extractor

use serde::{Deserialize, Serialize};

/// Line appended after each compiled prompt when it is submitted
pub const DEFAULT_INSTRUCTION_SUFFIX: &str = "Please provide the extracted information.";

/// What to do when the model call for one field fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FailurePolicy {
    /// Stop at the first failing field; no partial record is returned
    #[default]
    #[serde(rename = "abort")]
    AbortOnFirstError,
    /// Record the failure, keep going, fail only if every field failed
    #[serde(rename = "continue")]
    ContinueOnError,
}

impl FailurePolicy {
    /// Get the policy name as used in configuration
    pub fn as_str(&self) -> &'static str {
        match self {
            FailurePolicy::AbortOnFirstError => "abort",
            FailurePolicy::ContinueOnError => "continue",
        }
    }
}

impl std::str::FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "abort" => Ok(FailurePolicy::AbortOnFirstError),
            "continue" => Ok(FailurePolicy::ContinueOnError),
            other => Err(format!("Invalid failure policy: {} (expected abort or continue)", other)),
        }
    }
}

/// Configuration for the Extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Behavior when a field fails
    #[serde(default)]
    pub failure_policy: FailurePolicy,

    /// Optional system framing sent with every call
    #[serde(default)]
    pub system_prompt: Option<String>,

    /// Line appended after the compiled prompt at submission time.
    /// A blank value disables it.
    #[serde(default = "default_instruction_suffix")]
    pub instruction_suffix: Option<String>,
}

fn default_instruction_suffix() -> Option<String> {
    Some(DEFAULT_INSTRUCTION_SUFFIX.to_string())
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            failure_policy: FailurePolicy::default(),
            system_prompt: None,
            instruction_suffix: default_instruction_suffix(),
        }
    }
}

impl ExtractorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if matches!(&self.system_prompt, Some(s) if s.trim().is_empty()) {
            return Err("system_prompt must not be blank when set".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }
}
