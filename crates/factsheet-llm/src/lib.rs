//! Factsheet LLM Provider Layer
//!
//! Implementations of the `LlmProvider` trait from `factsheet-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `OpenAiCompatibleProvider`: Chat-completions API (OpenRouter, OpenAI)
//!
//! # Examples
//!
//! ```
//! use factsheet_llm::MockProvider;
//! use factsheet_domain::LlmProvider;
//!
//! let provider = MockProvider::new("Phase I");
//! let result = provider.generate("test prompt", None).unwrap();
//! assert_eq!(result, "Phase I");
//! ```

#![warn(missing_docs)]

pub mod openai;

use factsheet_domain::LlmProvider as LlmProviderTrait;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use openai::{OpenAiCompatibleProvider, ProviderConfig};

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Provider misconfigured (e.g. missing credentials)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Error(String),
}

/// A call recorded by [`MockProvider`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// Prompt received
    pub prompt: String,
    /// System framing received
    pub system: Option<String>,
}

/// Mock LLM provider for deterministic testing
///
/// Returns pre-configured responses without making any network calls. A
/// rule matches when its key is contained in the prompt; the first
/// registered matching rule wins, otherwise the default response is used.
///
/// # Examples
///
/// ```
/// use factsheet_llm::MockProvider;
/// use factsheet_domain::LlmProvider;
///
/// let mut provider = MockProvider::default();
/// provider.add_response("study phase", "Phase I");
/// provider.add_error("BMI");
///
/// assert_eq!(provider.generate("extract the study phase", None).unwrap(), "Phase I");
/// assert!(provider.generate("extract the BMI", None).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    rules: Arc<Mutex<Vec<(String, MockReply)>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    model: String,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            rules: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            model: "mock".to_string(),
        }
    }

    /// Respond with `response` to prompts containing `key`
    pub fn add_response(&mut self, key: impl Into<String>, response: impl Into<String>) {
        self.rules
            .lock()
            .unwrap()
            .push((key.into(), MockReply::Text(response.into())));
    }

    /// Fail on prompts containing `key`
    pub fn add_error(&mut self, key: impl Into<String>) {
        let key = key.into();
        let message = format!("Mock error for '{}'", key);
        self.rules.lock().unwrap().push((key, MockReply::Error(message)));
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Calls received so far, in order
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Forget recorded calls
    pub fn reset_calls(&self) {
        self.calls.lock().unwrap().clear();
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String, Self::Error> {
        self.calls.lock().unwrap().push(RecordedCall {
            prompt: prompt.to_string(),
            system: system.map(str::to_string),
        });

        let rules = self.rules.lock().unwrap();
        match rules.iter().find(|(key, _)| prompt.contains(key.as_str())) {
            Some((_, MockReply::Text(text))) => Ok(text.clone()),
            Some((_, MockReply::Error(message))) => Err(LlmError::Other(message.clone())),
            None => Ok(self.default_response.clone()),
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
